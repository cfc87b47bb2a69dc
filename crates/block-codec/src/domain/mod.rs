//! # Domain Layer
//!
//! Pure domain types for the block codec.
//!
//! ## Modules
//!
//! - `entities` - Block, BlockHeader, PersistableBlock
//! - `config` - Codec configuration
//! - `errors` - Item and block codec error types

pub mod config;
pub mod entities;
pub mod errors;

pub use config::CodecConfig;
pub use entities::{Block, BlockHeader, PersistableBlock, TRANSACTIONS_FIELD};
pub use errors::{CodecError, ItemDecodeError, ItemEncodeError};
