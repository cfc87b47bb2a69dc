use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::marker::PhantomData;

use crate::domain::errors::{ItemDecodeError, ItemEncodeError};
use crate::ports::outbound::ItemCodec;

/// Item codec storing each transaction as a JSON value.
pub struct JsonItemCodec<T> {
    _transaction: PhantomData<fn() -> T>,
}

impl<T> JsonItemCodec<T> {
    pub fn new() -> Self {
        Self {
            _transaction: PhantomData,
        }
    }
}

impl<T> Default for JsonItemCodec<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl<T> ItemCodec for JsonItemCodec<T>
where
    T: Serialize + DeserializeOwned + Send + Sync + 'static,
{
    type Transaction = T;
    type Encoded = Value;

    async fn encode_item(&self, transaction: &T) -> Result<Value, ItemEncodeError> {
        serde_json::to_value(transaction).map_err(|e| ItemEncodeError::Serialization(e.to_string()))
    }

    async fn decode_item(&self, encoded: Value) -> Result<T, ItemDecodeError> {
        serde_json::from_value(encoded).map_err(classify_decode_error)
    }
}

/// serde reports missing fields as "missing field `name`".
fn classify_decode_error(err: serde_json::Error) -> ItemDecodeError {
    let message = err.to_string();
    match message
        .strip_prefix("missing field `")
        .and_then(|rest| rest.split('`').next())
    {
        Some(field) => ItemDecodeError::MissingField(field.to_string()),
        None => ItemDecodeError::Malformed(message),
    }
}
