//! # Ports Layer
//!
//! - `inbound.rs` - Driving port (`BlockCodecApi`, used by the storage layer)
//! - `outbound.rs` - Driven port (`ItemCodec`, the per-transaction codec)

pub mod inbound;
pub mod outbound;

pub use inbound::BlockCodecApi;
pub use outbound::ItemCodec;
