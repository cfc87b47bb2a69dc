//! Block Codec Service
//!
//! Implements `BlockCodecApi` on top of an injected `ItemCodec`.
//!
//! ## Encode (fan-out)
//!
//! Transactions are dispatched to the item codec as an indexed set of
//! futures, at most `max_concurrent_encodes` in flight. Each result is written
//! into the slot of the transaction it came from, so completion order never
//! leaks into the representation. The first failure drops the pending set.
//!
//! ## Decode (sequential)
//!
//! A header-only shell is built first, then items are decoded one at a time
//! in representation order and appended. The loop stops at the first failure.

use async_trait::async_trait;
use futures::stream::{self, StreamExt};
use std::sync::Arc;
use tracing::{debug, warn};

use crate::domain::config::CodecConfig;
use crate::domain::entities::{Block, PersistableBlock};
use crate::domain::errors::CodecError;
use crate::metrics::{CodecMetrics, CodecMetricsSnapshot};
use crate::ports::{BlockCodecApi, ItemCodec};

/// Block codec service
///
/// Stateless apart from metrics; a single instance may serve concurrent
/// encode/decode calls for distinct blocks.
pub struct BlockCodecService<C: ItemCodec> {
    /// Per-transaction codec (driven port)
    item_codec: Arc<C>,
    config: CodecConfig,
    metrics: CodecMetrics,
}

impl<C: ItemCodec> BlockCodecService<C> {
    /// Create a service with the default configuration
    pub fn new(item_codec: Arc<C>) -> Self {
        Self {
            item_codec,
            config: CodecConfig::default(),
            metrics: CodecMetrics::new(),
        }
    }

    /// Create a service with a custom configuration
    pub fn with_config(item_codec: Arc<C>, config: CodecConfig) -> Result<Self, CodecError> {
        config.validate()?;
        Ok(Self {
            item_codec,
            config,
            metrics: CodecMetrics::new(),
        })
    }

    pub fn config(&self) -> &CodecConfig {
        &self.config
    }

    pub fn item_codec(&self) -> &Arc<C> {
        &self.item_codec
    }

    pub fn metrics(&self) -> CodecMetricsSnapshot {
        self.metrics.snapshot()
    }

    fn check_transaction_count(&self, count: usize) -> Result<(), CodecError> {
        if count > self.config.max_transactions {
            return Err(CodecError::TooManyTransactions {
                count,
                max: self.config.max_transactions,
            });
        }
        Ok(())
    }

    async fn encode_transactions(
        &self,
        transactions: &[C::Transaction],
    ) -> Result<Vec<C::Encoded>, CodecError> {
        let codec = self.item_codec.as_ref();
        let mut slots: Vec<Option<C::Encoded>> = std::iter::repeat_with(|| None)
            .take(transactions.len())
            .collect();

        let mut pending = stream::iter(0..transactions.len())
            .map(move |index| {
                let transaction = &transactions[index];
                async move { (index, codec.encode_item(transaction).await) }
            })
            .buffer_unordered(self.config.max_concurrent_encodes);

        while let Some((index, result)) = pending.next().await {
            match result {
                Ok(encoded) => slots[index] = Some(encoded),
                Err(err) => {
                    warn!(
                        index,
                        error = %err,
                        "[block-codec] transaction encode failed, discarding block"
                    );
                    return Err(err.into());
                }
            }
        }

        // The stream only ends once every index has reported.
        let encoded: Vec<C::Encoded> = slots.into_iter().flatten().collect();
        debug_assert_eq!(encoded.len(), transactions.len());
        Ok(encoded)
    }
}

#[async_trait]
impl<C: ItemCodec + 'static> BlockCodecApi for BlockCodecService<C> {
    type Transaction = C::Transaction;
    type Encoded = C::Encoded;

    async fn encode(
        &self,
        block: &Block<C::Transaction>,
    ) -> Result<PersistableBlock<C::Encoded>, CodecError> {
        let count = block.transaction_count();
        if let Err(err) = self.check_transaction_count(count) {
            self.metrics.record_encode_failure();
            return Err(err);
        }
        debug!(
            transactions = count,
            concurrency = self.config.max_concurrent_encodes,
            "[block-codec] encoding block"
        );

        match self.encode_transactions(&block.transactions).await {
            Ok(transactions) => {
                self.metrics.record_block_encoded(count);
                Ok(PersistableBlock::new(block.header.clone(), transactions))
            }
            Err(err) => {
                self.metrics.record_encode_failure();
                Err(err)
            }
        }
    }

    async fn decode(
        &self,
        representation: PersistableBlock<C::Encoded>,
    ) -> Result<Block<C::Transaction>, CodecError> {
        let (header, encoded) = representation.into_parts();
        let count = encoded.len();
        if let Err(err) = self.check_transaction_count(count) {
            self.metrics.record_decode_failure();
            return Err(err);
        }
        debug!(transactions = count, "[block-codec] decoding block");

        let mut block = Block::shell(header);
        block.transactions.reserve(count);

        for (index, item) in encoded.into_iter().enumerate() {
            match self.item_codec.decode_item(item).await {
                Ok(transaction) => block.push_transaction(transaction),
                Err(err) => {
                    warn!(
                        index,
                        error = %err,
                        "[block-codec] transaction decode failed, aborting block"
                    );
                    self.metrics.record_decode_failure();
                    return Err(err.into());
                }
            }
        }

        self.metrics.record_block_decoded(count);
        Ok(block)
    }
}
