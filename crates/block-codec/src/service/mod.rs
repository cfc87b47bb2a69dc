//! Service Layer
//!
//! Application service that orchestrates the item codec behind the
//! `BlockCodecApi` port.

pub mod block_codec_service;

pub use block_codec_service::BlockCodecService;
