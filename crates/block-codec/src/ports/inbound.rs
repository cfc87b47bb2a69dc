//! # Inbound Ports (Driving Ports)
//!
//! API exposed to the persistence layer.

use async_trait::async_trait;

use crate::domain::entities::{Block, PersistableBlock};
use crate::domain::errors::CodecError;

/// Block codec API (Driving Port)
///
/// Both operations are one-shot: they either return a complete result or a
/// single error, never a partial block or representation.
#[async_trait]
pub trait BlockCodecApi: Send + Sync {
    /// In-memory transaction type.
    type Transaction: Send + Sync;

    /// Persistable form of one transaction.
    type Encoded: Send;

    /// Convert a block to its persistable representation.
    ///
    /// Transactions are encoded concurrently; `transactions[i]` of the result
    /// always corresponds to `block.transactions[i]`. The block is not
    /// modified.
    ///
    /// # Errors
    /// * `CodecError::ItemEncode` - first item failure observed; no
    ///   representation is produced
    /// * `CodecError::TooManyTransactions` - block exceeds the configured limit
    async fn encode(
        &self,
        block: &Block<Self::Transaction>,
    ) -> Result<PersistableBlock<Self::Encoded>, CodecError>;

    /// Rebuild a block from its persistable representation.
    ///
    /// Transactions are decoded one at a time in representation order and
    /// appended to a header-only shell.
    ///
    /// # Errors
    /// * `CodecError::ItemDecode` - first item failure; later items are never
    ///   attempted and no block is returned
    /// * `CodecError::TooManyTransactions` - representation exceeds the
    ///   configured limit
    async fn decode(
        &self,
        representation: PersistableBlock<Self::Encoded>,
    ) -> Result<Block<Self::Transaction>, CodecError>;
}
