//! # Domain Entities
//!
//! - `BlockHeader`: open set of header fields, opaque to the codec
//! - `Block`: header plus ordered transactions
//! - `PersistableBlock`: header plus ordered persistable transaction forms
//!
//! A persisted block is a single flat object: the header fields sit next to a
//! `transactions` field holding the encoded transactions in block order.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::domain::errors::CodecError;

/// Field holding the transaction sequence in a persisted block.
///
/// Reserved: a header can never carry a field with this name.
pub const TRANSACTIONS_FIELD: &str = "transactions";

/// Block header fields (number, hashes, timestamps, ...).
///
/// The codec never interprets these; they are copied verbatim between a
/// `Block` and its `PersistableBlock`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Map<String, Value>", into = "Map<String, Value>")]
pub struct BlockHeader {
    fields: Map<String, Value>,
}

impl BlockHeader {
    /// Create a header with no fields.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style field insertion.
    pub fn with_field(
        mut self,
        name: impl Into<String>,
        value: impl Into<Value>,
    ) -> Result<Self, CodecError> {
        self.insert(name, value)?;
        Ok(self)
    }

    /// Insert a field, returning the previous value if there was one.
    pub fn insert(
        &mut self,
        name: impl Into<String>,
        value: impl Into<Value>,
    ) -> Result<Option<Value>, CodecError> {
        let name = name.into();
        if name == TRANSACTIONS_FIELD {
            return Err(reserved_field_error());
        }
        Ok(self.fields.insert(name, value.into()))
    }

    /// Look up a field by name.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }

    /// All header fields.
    pub fn fields(&self) -> &Map<String, Value> {
        &self.fields
    }

    /// Number of header fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// True if the header has no fields.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Consume the header, returning its fields.
    pub fn into_fields(self) -> Map<String, Value> {
        self.fields
    }
}

fn reserved_field_error() -> CodecError {
    CodecError::MalformedRepresentation(format!(
        "header cannot carry reserved field `{}`",
        TRANSACTIONS_FIELD
    ))
}

impl TryFrom<Map<String, Value>> for BlockHeader {
    type Error = CodecError;

    fn try_from(fields: Map<String, Value>) -> Result<Self, Self::Error> {
        if fields.contains_key(TRANSACTIONS_FIELD) {
            return Err(reserved_field_error());
        }
        Ok(Self { fields })
    }
}

impl TryFrom<Value> for BlockHeader {
    type Error = CodecError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::Object(fields) => Self::try_from(fields),
            other => Err(CodecError::MalformedRepresentation(format!(
                "header must be an object, found {}",
                json_kind(&other)
            ))),
        }
    }
}

impl From<BlockHeader> for Map<String, Value> {
    fn from(header: BlockHeader) -> Self {
        header.fields
    }
}

/// One chain block: header plus ordered transactions.
///
/// Transaction order is part of block identity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Block<T> {
    pub header: BlockHeader,
    pub transactions: Vec<T>,
}

impl<T> Block<T> {
    pub fn new(header: BlockHeader, transactions: Vec<T>) -> Self {
        Self {
            header,
            transactions,
        }
    }

    /// Header-only block, populated during decode via `push_transaction`.
    pub fn shell(header: BlockHeader) -> Self {
        Self::new(header, Vec::new())
    }

    /// Append a transaction at the end of the block.
    pub fn push_transaction(&mut self, transaction: T) {
        self.transactions.push(transaction);
    }

    pub fn transaction_count(&self) -> usize {
        self.transactions.len()
    }
}

/// Storage-ready form of a block.
///
/// `E` is the item codec's persistable transaction form. `transactions` is
/// always present and has exactly one entry per block transaction.
#[derive(Debug, Clone, PartialEq)]
pub struct PersistableBlock<E> {
    pub header: BlockHeader,
    pub transactions: Vec<E>,
}

impl<E> PersistableBlock<E> {
    pub fn new(header: BlockHeader, transactions: Vec<E>) -> Self {
        Self {
            header,
            transactions,
        }
    }

    pub fn transaction_count(&self) -> usize {
        self.transactions.len()
    }

    /// Split into header and encoded transactions.
    pub fn into_parts(self) -> (BlockHeader, Vec<E>) {
        (self.header, self.transactions)
    }
}

impl<E: Serialize> PersistableBlock<E> {
    /// Flatten into a single JSON object: header fields plus `transactions`.
    pub fn to_json_value(&self) -> Result<Value, CodecError> {
        let transactions = self
            .transactions
            .iter()
            .enumerate()
            .map(|(index, item)| {
                serde_json::to_value(item).map_err(|e| {
                    CodecError::MalformedRepresentation(format!("transaction {}: {}", index, e))
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let mut fields = self.header.fields.clone();
        fields.insert(TRANSACTIONS_FIELD.to_string(), Value::Array(transactions));
        Ok(Value::Object(fields))
    }

    /// JSON bytes of `to_json_value`.
    pub fn to_json_vec(&self) -> Result<Vec<u8>, CodecError> {
        let value = self.to_json_value()?;
        serde_json::to_vec(&value).map_err(|e| CodecError::MalformedRepresentation(e.to_string()))
    }
}

impl<E: DeserializeOwned> PersistableBlock<E> {
    /// Parse a flat JSON object produced by `to_json_value`.
    ///
    /// The value must be an object whose `transactions` field is an array;
    /// every other field becomes part of the header.
    pub fn from_json_value(value: Value) -> Result<Self, CodecError> {
        let mut fields = match value {
            Value::Object(fields) => fields,
            other => {
                return Err(CodecError::MalformedRepresentation(format!(
                    "block must be an object, found {}",
                    json_kind(&other)
                )))
            }
        };

        let items = match fields.remove(TRANSACTIONS_FIELD) {
            Some(Value::Array(items)) => items,
            Some(other) => {
                return Err(CodecError::MalformedRepresentation(format!(
                    "`{}` must be a sequence, found {}",
                    TRANSACTIONS_FIELD,
                    json_kind(&other)
                )))
            }
            None => {
                return Err(CodecError::MalformedRepresentation(format!(
                    "missing `{}` field",
                    TRANSACTIONS_FIELD
                )))
            }
        };

        let transactions = items
            .into_iter()
            .enumerate()
            .map(|(index, item)| {
                serde_json::from_value(item).map_err(|e| {
                    CodecError::MalformedRepresentation(format!("transaction {}: {}", index, e))
                })
            })
            .collect::<Result<Vec<E>, _>>()?;

        Ok(Self {
            header: BlockHeader { fields },
            transactions,
        })
    }

    /// Parse JSON bytes produced by `to_json_vec`.
    pub fn from_json_slice(bytes: &[u8]) -> Result<Self, CodecError> {
        let value: Value = serde_json::from_slice(bytes)
            .map_err(|e| CodecError::MalformedRepresentation(e.to_string()))?;
        Self::from_json_value(value)
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
