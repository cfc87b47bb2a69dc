use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::marker::PhantomData;

use crate::domain::errors::{ItemDecodeError, ItemEncodeError};
use crate::ports::outbound::ItemCodec;

const CHECKSUM_LEN: usize = 4;

/// Item codec storing each transaction as hex text of
/// `[crc32 (LE) | bincode payload]`.
///
/// The checksum is verified before the payload is deserialized.
pub struct ChecksummedBincodeCodec<T> {
    _transaction: PhantomData<fn() -> T>,
}

impl<T> ChecksummedBincodeCodec<T> {
    pub fn new() -> Self {
        Self {
            _transaction: PhantomData,
        }
    }
}

impl<T> Default for ChecksummedBincodeCodec<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl<T> ItemCodec for ChecksummedBincodeCodec<T>
where
    T: Serialize + DeserializeOwned + Send + Sync + 'static,
{
    type Transaction = T;
    type Encoded = String;

    async fn encode_item(&self, transaction: &T) -> Result<String, ItemEncodeError> {
        let payload = bincode::serialize(transaction)
            .map_err(|e| ItemEncodeError::Serialization(e.to_string()))?;

        let mut framed = Vec::with_capacity(CHECKSUM_LEN + payload.len());
        framed.extend_from_slice(&crc32fast::hash(&payload).to_le_bytes());
        framed.extend_from_slice(&payload);
        Ok(hex::encode(framed))
    }

    async fn decode_item(&self, encoded: String) -> Result<T, ItemDecodeError> {
        let framed = hex::decode(&encoded).map_err(|e| ItemDecodeError::Malformed(e.to_string()))?;
        if framed.len() < CHECKSUM_LEN {
            return Err(ItemDecodeError::Malformed(format!(
                "{} bytes is shorter than the checksum prefix",
                framed.len()
            )));
        }

        let (prefix, payload) = framed.split_at(CHECKSUM_LEN);
        let expected = u32::from_le_bytes([prefix[0], prefix[1], prefix[2], prefix[3]]);
        let actual = crc32fast::hash(payload);
        if expected != actual {
            return Err(ItemDecodeError::ChecksumMismatch { expected, actual });
        }

        bincode::deserialize(payload).map_err(|e| ItemDecodeError::Malformed(e.to_string()))
    }
}
