//! # Outbound Ports (Driven Ports)
//!
//! The per-transaction codec the block codec is built on. The host
//! application (or a test) supplies the implementation.

use async_trait::async_trait;

use crate::domain::errors::{ItemDecodeError, ItemEncodeError};

/// Encodes and decodes a single transaction.
///
/// ## Calling contract
///
/// - `encode_item` may be invoked concurrently for distinct transactions of
///   the same block. A failure for one item must not affect its siblings.
/// - `decode_item` is invoked for one item at a time, strictly in the order
///   the items appear in the persisted block, and never again after the first
///   failure. Implementations may rely on that order.
#[async_trait]
pub trait ItemCodec: Send + Sync {
    /// In-memory transaction type.
    type Transaction: Send + Sync;

    /// Persistable form of one transaction.
    type Encoded: Send;

    /// Convert one transaction to its persistable form.
    async fn encode_item(
        &self,
        transaction: &Self::Transaction,
    ) -> Result<Self::Encoded, ItemEncodeError>;

    /// Rebuild one transaction from its persistable form.
    async fn decode_item(&self, encoded: Self::Encoded)
        -> Result<Self::Transaction, ItemDecodeError>;
}
