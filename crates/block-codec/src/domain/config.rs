//! Block codec configuration and validation
//!
//! # Example
//!
//! ```ignore
//! use block_codec::CodecConfig;
//!
//! let config = CodecConfig::default()
//!     .with_max_concurrent_encodes(16)
//!     .with_max_transactions(10_000);
//! config.validate()?;
//! ```

use serde::{Deserialize, Serialize};

use crate::domain::errors::CodecError;

/// Environment variable overriding `max_concurrent_encodes`.
pub const ENV_MAX_CONCURRENT_ENCODES: &str = "BLOCK_CODEC_MAX_CONCURRENT_ENCODES";

/// Environment variable overriding `max_transactions`.
pub const ENV_MAX_TRANSACTIONS: &str = "BLOCK_CODEC_MAX_TRANSACTIONS";

/// Block codec configuration
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CodecConfig {
    /// Upper bound on transaction encodes in flight for a single block.
    ///
    /// Set it to at least the largest block size for unbounded fan-out.
    pub max_concurrent_encodes: usize,
    /// Largest block (in transactions) accepted by encode and decode.
    pub max_transactions: usize,
}

impl Default for CodecConfig {
    fn default() -> Self {
        Self {
            max_concurrent_encodes: 64,
            max_transactions: 100_000,
        }
    }
}

impl CodecConfig {
    /// Create a new configuration with validation
    pub fn new(max_concurrent_encodes: usize, max_transactions: usize) -> Result<Self, CodecError> {
        let config = Self {
            max_concurrent_encodes,
            max_transactions,
        };
        config.validate()?;
        Ok(config)
    }

    /// Defaults overridden by `BLOCK_CODEC_*` environment variables.
    pub fn from_env() -> Result<Self, CodecError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Defaults overridden by whatever `lookup` returns for the `BLOCK_CODEC_*` keys.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, CodecError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        if let Some(raw) = lookup(ENV_MAX_CONCURRENT_ENCODES) {
            config.max_concurrent_encodes = parse_usize(ENV_MAX_CONCURRENT_ENCODES, &raw)?;
        }
        if let Some(raw) = lookup(ENV_MAX_TRANSACTIONS) {
            config.max_transactions = parse_usize(ENV_MAX_TRANSACTIONS, &raw)?;
        }
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), CodecError> {
        if self.max_concurrent_encodes == 0 {
            return Err(CodecError::InvalidConfig(
                "max_concurrent_encodes cannot be 0".to_string(),
            ));
        }

        if self.max_transactions == 0 {
            return Err(CodecError::InvalidConfig(
                "max_transactions cannot be 0".to_string(),
            ));
        }

        Ok(())
    }

    /// Builder-style method to set the encode concurrency bound
    pub fn with_max_concurrent_encodes(mut self, max: usize) -> Self {
        self.max_concurrent_encodes = max;
        self
    }

    /// Builder-style method to set the block size limit
    pub fn with_max_transactions(mut self, max: usize) -> Self {
        self.max_transactions = max;
        self
    }
}

fn parse_usize(key: &str, raw: &str) -> Result<usize, CodecError> {
    raw.trim().parse().map_err(|_| {
        CodecError::InvalidConfig(format!("{} must be a positive integer, got {:?}", key, raw))
    })
}
