//! # Failure Modes
//!
//! Fail-fast encode/decode and malformed persisted blocks, end to end.

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use block_codec::test_utils::{init_test_tracing, make_test_block, ScriptedItemCodec};
    use block_codec::{
        BlockCodecApi, BlockCodecService, BlockHeader, ChecksummedBincodeCodec, CodecError,
        ItemDecodeError, ItemEncodeError, JsonItemCodec, PersistableBlock,
    };
    use serde_json::{json, Value};

    use crate::integration::fixtures::{
        make_transfer_block, InMemoryBlockStore, RecordingCodec, Transfer,
    };

    #[tokio::test]
    async fn test_bad_signature_rejects_whole_block() {
        init_test_tracing();
        let bad_signature = ItemEncodeError::Rejected("bad signature".to_string());
        let codec = ScriptedItemCodec::new().failing_encode(1, bad_signature.clone());
        let service = BlockCodecService::new(Arc::new(codec));

        let mut block = make_test_block(5, 3);
        block.header = BlockHeader::try_from(json!({ "number": 5 })).unwrap();

        let result = service.encode(&block).await;

        match result {
            Err(err) => {
                assert_eq!(err, CodecError::ItemEncode(bad_signature));
                assert_eq!(err.to_string(), "bad signature");
            }
            Ok(persisted) => panic!("Expected encode failure, got {:?}", persisted),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_encode_failure_position_does_not_matter() {
        for failing in 0..5u64 {
            // Failing item finishes last regardless of its index.
            let codec = (0..5u64).fold(ScriptedItemCodec::new(), |codec, id| {
                let delay = if id == failing { 100 } else { 10 + id };
                codec.with_encode_delay(id, Duration::from_millis(delay))
            });
            let service = BlockCodecService::new(Arc::new(
                codec.failing_encode(failing, ItemEncodeError::Timeout),
            ));

            let result = service.encode(&make_test_block(1, 5)).await;
            assert_eq!(
                result,
                Err(CodecError::ItemEncode(ItemEncodeError::Timeout)),
                "failing index {}",
                failing
            );
        }
    }

    #[tokio::test]
    async fn test_tampered_item_aborts_decode_without_overrun() {
        let codec = Arc::new(RecordingCodec::new(ChecksummedBincodeCodec::<Transfer>::new()));
        let service = BlockCodecService::new(codec.clone());
        let store = InMemoryBlockStore::new();

        let persisted = service.encode(&make_transfer_block(11, 6)).await.unwrap();
        store.put(11, persisted.to_json_vec().unwrap());

        // Flip one payload nibble of transaction 2.
        store.tamper(11, |bytes| {
            let mut value: Value = serde_json::from_slice(bytes).unwrap();
            let item = value["transactions"][2].as_str().unwrap().to_string();
            let mut chars: Vec<char> = item.chars().collect();
            let last = chars.len() - 1;
            chars[last] = if chars[last] == '0' { '1' } else { '0' };
            value["transactions"][2] = Value::String(chars.into_iter().collect());
            *bytes = serde_json::to_vec(&value).unwrap();
        });

        let representation = PersistableBlock::from_json_slice(&store.get(11).unwrap()).unwrap();
        let result = service.decode(representation).await;

        assert!(matches!(
            result,
            Err(CodecError::ItemDecode(ItemDecodeError::ChecksumMismatch { .. }))
        ));
        assert_eq!(codec.decode_attempts(), 3);
    }

    #[tokio::test]
    async fn test_missing_field_aborts_json_decode() {
        let codec = Arc::new(RecordingCodec::new(JsonItemCodec::<Transfer>::new()));
        let service = BlockCodecService::new(codec.clone());

        let mut persisted = service.encode(&make_transfer_block(2, 4)).await.unwrap();
        if let Some(item) = persisted.transactions[1].as_object_mut() {
            item.remove("gasPrice");
        }

        let result = service.decode(persisted).await;
        assert_eq!(
            result,
            Err(CodecError::ItemDecode(ItemDecodeError::MissingField(
                "gasPrice".to_string()
            )))
        );
        assert_eq!(codec.decode_attempts(), 2);
    }

    #[test]
    fn test_malformed_transactions_field_rejected_before_decode() {
        for (raw, expected) in [
            (json!({ "number": "0x1" }), "missing `transactions`"),
            (json!({ "number": "0x1", "transactions": null }), "found null"),
            (json!({ "number": "0x1", "transactions": {} }), "found an object"),
            (json!([]), "block must be an object"),
        ] {
            match PersistableBlock::<Value>::from_json_value(raw) {
                Err(CodecError::MalformedRepresentation(msg)) => {
                    assert!(msg.contains(expected), "{} does not mention {}", msg, expected)
                }
                other => panic!("Expected MalformedRepresentation, got {:?}", other),
            }
        }
    }

    #[tokio::test]
    async fn test_failed_decode_leaves_stored_bytes_usable() {
        // A failure is per call: the same bytes decode fine with a healthy codec.
        let store = InMemoryBlockStore::new();
        let healthy = BlockCodecService::new(Arc::new(ScriptedItemCodec::new()));
        let block = make_test_block(9, 4);
        store.put(9, healthy.encode(&block).await.unwrap().to_json_vec().unwrap());

        let failing = BlockCodecService::new(Arc::new(
            ScriptedItemCodec::new().failing_decode(3, ItemDecodeError::Timeout),
        ));
        let bytes = store.get(9).unwrap();
        assert!(failing
            .decode(PersistableBlock::from_json_slice(&bytes).unwrap())
            .await
            .is_err());

        let restored = healthy
            .decode(PersistableBlock::from_json_slice(&bytes).unwrap())
            .await
            .unwrap();
        assert_eq!(restored, block);
    }
}
