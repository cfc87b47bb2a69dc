//! # Block Codec
//!
//! Converts a block (header plus ordered transactions) into a storage-ready
//! representation and back, delegating each transaction to a pluggable,
//! independently fallible item codec.
//!
//! ## Architecture
//!
//! This crate follows Hexagonal Architecture (Ports & Adapters):
//!
//! - **Domain Layer** (`domain/`): `Block`, `BlockHeader`, `PersistableBlock`,
//!   `CodecConfig`, error types
//! - **Ports Layer** (`ports/`):
//!   - `BlockCodecApi`: Driving port (encode / decode)
//!   - `ItemCodec`: Driven port (per-transaction codec)
//! - **Service Layer** (`service/`): `BlockCodecService` implements `BlockCodecApi`
//! - **Adapters Layer** (`adapters/`): `JsonItemCodec`, `ChecksummedBincodeCodec`
//!
//! ## Invariants
//!
//! | Invariant | Description |
//! |-----------|-------------|
//! | Order | `transactions[i]` of the output always corresponds to input item `i` |
//! | Atomicity | A failed encode/decode returns one error and no partial result |
//! | Fail-fast decode | No item after the first decode failure is attempted |
//! | Presence | A persisted block always carries `transactions`, empty or not |
//!
//! ## Concurrency
//!
//! Encode fans out across transactions (bounded by
//! `CodecConfig::max_concurrent_encodes`). Decode is strictly sequential: the
//! item codec sees items one at a time, in block order.
//!
//! ## Usage
//!
//! ```ignore
//! use block_codec::{BlockCodecApi, BlockCodecService, JsonItemCodec, PersistableBlock};
//! use std::sync::Arc;
//!
//! let service = BlockCodecService::new(Arc::new(JsonItemCodec::<MyTransaction>::new()));
//!
//! let persisted = service.encode(&block).await?;
//! let bytes = persisted.to_json_vec()?;
//!
//! let restored = service.decode(PersistableBlock::from_json_slice(&bytes)?).await?;
//! assert_eq!(restored, block);
//! ```

pub mod adapters;
pub mod domain;
pub mod metrics;
pub mod ports;
pub mod service;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

// Re-exports for convenience
pub use adapters::{ChecksummedBincodeCodec, JsonItemCodec};
pub use domain::{
    Block, BlockHeader, CodecConfig, CodecError, ItemDecodeError, ItemEncodeError,
    PersistableBlock, TRANSACTIONS_FIELD,
};
pub use metrics::{CodecMetrics, CodecMetricsSnapshot};
pub use ports::{BlockCodecApi, ItemCodec};
pub use service::BlockCodecService;
