//! Test fixtures: a scripted item codec and block builders.
//!
//! `ScriptedItemCodec` lets a test choose per-transaction latency and the
//! transaction at which encode or decode fails, and records the order in
//! which the block codec called it.

use async_trait::async_trait;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use crate::domain::entities::{Block, BlockHeader};
use crate::domain::errors::{ItemDecodeError, ItemEncodeError};
use crate::ports::outbound::ItemCodec;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestTransaction {
    pub id: u64,
    pub payload: String,
}

pub fn make_transactions(count: usize) -> Vec<TestTransaction> {
    (0..count as u64)
        .map(|id| TestTransaction {
            id,
            payload: format!("tx-{}", id),
        })
        .collect()
}

pub fn make_header(number: u64) -> BlockHeader {
    BlockHeader::new()
        .with_field("number", number)
        .and_then(|h| h.with_field("parentHash", format!("0x{:064x}", number.saturating_sub(1))))
        .and_then(|h| h.with_field("timestamp", 1_700_000_000 + number))
        .expect("valid test header")
}

pub fn make_test_block(number: u64, transaction_count: usize) -> Block<TestTransaction> {
    Block::new(make_header(number), make_transactions(transaction_count))
}

/// Install a test-writer subscriber honouring `RUST_LOG` (default `warn`).
///
/// Safe to call from every test; only the first call installs.
pub fn init_test_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_test_writer()
        .try_init();
}

/// Item codec fake driven by a per-transaction script.
///
/// Encoded form is `{"id": .., "payload": ..}`.
#[derive(Default)]
pub struct ScriptedItemCodec {
    encode_delays: HashMap<u64, Duration>,
    decode_delays: HashMap<u64, Duration>,
    encode_failures: HashMap<u64, ItemEncodeError>,
    decode_failures: HashMap<u64, ItemDecodeError>,
    encode_calls: Mutex<Vec<u64>>,
    encode_completions: Mutex<Vec<u64>>,
    decode_calls: Mutex<Vec<u64>>,
    encodes_in_flight: AtomicUsize,
    max_encodes_in_flight: AtomicUsize,
    decodes_in_flight: AtomicUsize,
    max_decodes_in_flight: AtomicUsize,
}

impl ScriptedItemCodec {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_encode_delay(mut self, id: u64, delay: Duration) -> Self {
        self.encode_delays.insert(id, delay);
        self
    }

    pub fn with_decode_delay(mut self, id: u64, delay: Duration) -> Self {
        self.decode_delays.insert(id, delay);
        self
    }

    pub fn failing_encode(mut self, id: u64, error: ItemEncodeError) -> Self {
        self.encode_failures.insert(id, error);
        self
    }

    pub fn failing_decode(mut self, id: u64, error: ItemDecodeError) -> Self {
        self.decode_failures.insert(id, error);
        self
    }

    /// Transaction ids in the order `encode_item` was entered.
    pub fn encode_calls(&self) -> Vec<u64> {
        self.encode_calls.lock().clone()
    }

    /// Transaction ids in the order `encode_item` finished successfully.
    pub fn encode_completions(&self) -> Vec<u64> {
        self.encode_completions.lock().clone()
    }

    /// Transaction ids in the order `decode_item` was entered.
    pub fn decode_calls(&self) -> Vec<u64> {
        self.decode_calls.lock().clone()
    }

    pub fn max_encodes_in_flight(&self) -> usize {
        self.max_encodes_in_flight.load(Ordering::SeqCst)
    }

    pub fn max_decodes_in_flight(&self) -> usize {
        self.max_decodes_in_flight.load(Ordering::SeqCst)
    }
}

fn enter(in_flight: &AtomicUsize, max: &AtomicUsize) {
    let now = in_flight.fetch_add(1, Ordering::SeqCst) + 1;
    max.fetch_max(now, Ordering::SeqCst);
}

async fn pause(delay: Option<&Duration>) {
    match delay {
        Some(delay) => tokio::time::sleep(*delay).await,
        None => tokio::task::yield_now().await,
    }
}

#[async_trait]
impl ItemCodec for ScriptedItemCodec {
    type Transaction = TestTransaction;
    type Encoded = Value;

    async fn encode_item(&self, transaction: &TestTransaction) -> Result<Value, ItemEncodeError> {
        self.encode_calls.lock().push(transaction.id);
        enter(&self.encodes_in_flight, &self.max_encodes_in_flight);

        pause(self.encode_delays.get(&transaction.id)).await;
        self.encodes_in_flight.fetch_sub(1, Ordering::SeqCst);

        if let Some(error) = self.encode_failures.get(&transaction.id) {
            return Err(error.clone());
        }
        self.encode_completions.lock().push(transaction.id);
        Ok(json!({ "id": transaction.id, "payload": transaction.payload }))
    }

    async fn decode_item(&self, encoded: Value) -> Result<TestTransaction, ItemDecodeError> {
        let id = encoded
            .get("id")
            .and_then(Value::as_u64)
            .ok_or_else(|| ItemDecodeError::MissingField("id".to_string()))?;
        self.decode_calls.lock().push(id);
        enter(&self.decodes_in_flight, &self.max_decodes_in_flight);

        pause(self.decode_delays.get(&id)).await;
        self.decodes_in_flight.fetch_sub(1, Ordering::SeqCst);

        if let Some(error) = self.decode_failures.get(&id) {
            return Err(error.clone());
        }
        serde_json::from_value(encoded).map_err(|e| ItemDecodeError::Malformed(e.to_string()))
    }
}
