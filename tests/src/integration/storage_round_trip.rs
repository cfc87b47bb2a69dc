//! # Storage Round Trip
//!
//! Block → `PersistableBlock` → JSON bytes → store → bytes → block, through
//! both shipped item codecs.

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use block_codec::test_utils::init_test_tracing;
    use block_codec::{
        BlockCodecApi, BlockCodecService, ChecksummedBincodeCodec, CodecConfig, JsonItemCodec,
        PersistableBlock,
    };
    use serde_json::Value;

    use crate::integration::fixtures::{make_transfer_block, InMemoryBlockStore, Transfer};

    #[tokio::test]
    async fn test_json_codec_round_trip_through_store() {
        init_test_tracing();
        let service = BlockCodecService::new(Arc::new(JsonItemCodec::<Transfer>::new()));
        let store = InMemoryBlockStore::new();
        let block = make_transfer_block(42, 12);

        let persisted = service.encode(&block).await.unwrap();
        store.put(42, persisted.to_json_vec().unwrap());

        let bytes = store.get(42).unwrap();
        let restored = service
            .decode(PersistableBlock::from_json_slice(&bytes).unwrap())
            .await
            .unwrap();

        assert_eq!(restored, block);
    }

    #[tokio::test]
    async fn test_json_layout_is_flat_header_plus_transactions() {
        let service = BlockCodecService::new(Arc::new(JsonItemCodec::<Transfer>::new()));
        let block = make_transfer_block(3, 2);

        let persisted = service.encode(&block).await.unwrap();
        let value: Value = serde_json::from_slice(&persisted.to_json_vec().unwrap()).unwrap();

        assert_eq!(value["number"], "0x3");
        assert_eq!(value["gasLimit"], "0x1312d00f");
        assert_eq!(value["transactions"][1]["nonce"], 1);
        assert_eq!(
            value["transactions"][1]["feeCurrency"],
            crate::integration::fixtures::STABLE_TOKEN
        );
        assert_eq!(value["transactions"].as_array().map(Vec::len), Some(2));
    }

    #[tokio::test]
    async fn test_bincode_codec_round_trip_through_store() {
        let service = BlockCodecService::new(Arc::new(ChecksummedBincodeCodec::<Transfer>::new()));
        let store = InMemoryBlockStore::new();
        let block = make_transfer_block(7, 30);

        let persisted = service.encode(&block).await.unwrap();
        assert!(persisted
            .transactions
            .iter()
            .all(|item| item.chars().all(|c| c.is_ascii_hexdigit())));
        store.put(7, persisted.to_json_vec().unwrap());

        let restored = service
            .decode(PersistableBlock::from_json_slice(&store.get(7).unwrap()).unwrap())
            .await
            .unwrap();

        assert_eq!(restored, block);
    }

    #[tokio::test]
    async fn test_empty_block_keeps_empty_transactions_in_bytes() {
        let service = BlockCodecService::new(Arc::new(JsonItemCodec::<Transfer>::new()));
        let block = make_transfer_block(0, 0);

        let bytes = service.encode(&block).await.unwrap().to_json_vec().unwrap();
        let raw: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(raw["transactions"], Value::Array(vec![]));

        let restored = service
            .decode(PersistableBlock::from_json_slice(&bytes).unwrap())
            .await
            .unwrap();
        assert_eq!(restored.transaction_count(), 0);
        assert_eq!(restored.header, block.header);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_shared_service_across_tasks() {
        let config = CodecConfig::default().with_max_concurrent_encodes(4);
        let service = Arc::new(
            BlockCodecService::with_config(Arc::new(JsonItemCodec::<Transfer>::new()), config)
                .unwrap(),
        );

        let handles: Vec<_> = (0..16u64)
            .map(|number| {
                let service = service.clone();
                tokio::spawn(async move {
                    let block = make_transfer_block(number, number as usize * 3);
                    let persisted = service.encode(&block).await?;
                    let restored = service.decode(persisted).await?;
                    Ok::<_, block_codec::CodecError>((block, restored))
                })
            })
            .collect();

        for result in futures::future::join_all(handles).await {
            let (block, restored) = result.unwrap().unwrap();
            assert_eq!(restored, block);
        }

        let metrics = service.metrics();
        assert_eq!(metrics.blocks_encoded, 16);
        assert_eq!(metrics.blocks_decoded, 16);
        assert_eq!(metrics.items_encoded, (0..16u64).map(|n| n * 3).sum::<u64>());
    }
}
