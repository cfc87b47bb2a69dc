//! Item Codec Adapters
//!
//! Ready-made `ItemCodec` implementations.
//!
//! - `json`: transaction as a JSON object
//! - `bincode`: CRC32-checked bincode payload stored as hex text

mod bincode;
mod json;

pub use self::bincode::ChecksummedBincodeCodec;
pub use self::json::JsonItemCodec;
