//! Metrics for block codec operations
//!
//! Thread-safe counters the service records into on every encode/decode.
//!
//! ## Usage
//!
//! ```ignore
//! let service = BlockCodecService::new(Arc::new(JsonItemCodec::<MyTx>::new()));
//! service.encode(&block).await?;
//!
//! let snapshot = service.metrics();
//! assert_eq!(snapshot.blocks_encoded, 1);
//! ```

use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};

/// Metrics collector for block codec operations
#[derive(Debug, Default)]
pub struct CodecMetrics {
    /// Blocks successfully encoded
    pub blocks_encoded: AtomicU64,
    /// Blocks successfully decoded
    pub blocks_decoded: AtomicU64,
    /// Transactions encoded as part of successful blocks
    pub items_encoded: AtomicU64,
    /// Transactions decoded as part of successful blocks
    pub items_decoded: AtomicU64,
    /// Encode operations that failed
    pub encode_failures: AtomicU64,
    /// Decode operations that failed
    pub decode_failures: AtomicU64,
}

impl CodecMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a successful block encode of `items` transactions
    pub fn record_block_encoded(&self, items: usize) {
        self.blocks_encoded.fetch_add(1, Ordering::Relaxed);
        self.items_encoded.fetch_add(items as u64, Ordering::Relaxed);
    }

    /// Record a successful block decode of `items` transactions
    pub fn record_block_decoded(&self, items: usize) {
        self.blocks_decoded.fetch_add(1, Ordering::Relaxed);
        self.items_decoded.fetch_add(items as u64, Ordering::Relaxed);
    }

    pub fn record_encode_failure(&self) {
        self.encode_failures.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_decode_failure(&self) {
        self.decode_failures.fetch_add(1, Ordering::Relaxed);
    }

    /// Get current metrics snapshot
    pub fn snapshot(&self) -> CodecMetricsSnapshot {
        CodecMetricsSnapshot {
            blocks_encoded: self.blocks_encoded.load(Ordering::Relaxed),
            blocks_decoded: self.blocks_decoded.load(Ordering::Relaxed),
            items_encoded: self.items_encoded.load(Ordering::Relaxed),
            items_decoded: self.items_decoded.load(Ordering::Relaxed),
            encode_failures: self.encode_failures.load(Ordering::Relaxed),
            decode_failures: self.decode_failures.load(Ordering::Relaxed),
        }
    }
}

/// Point-in-time copy of `CodecMetrics`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CodecMetricsSnapshot {
    pub blocks_encoded: u64,
    pub blocks_decoded: u64,
    pub items_encoded: u64,
    pub items_decoded: u64,
    pub encode_failures: u64,
    pub decode_failures: u64,
}
