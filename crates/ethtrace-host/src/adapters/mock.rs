//! Substitute adapters for exercising traversals without a real store or real handlers.
//!
//! - [`CannedTracesAdapter`]: answers `ethstore.fetch_traces` from an in-memory map
//! - [`RecordingHandler`]: records every trace it is invoked with and can be told to fail

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use anyhow::{Context, anyhow};
use async_trait::async_trait;
use ethtrace_effects::{EffectIntent, EffectKind, EffectReceipt};
use ethtrace_store::BlockHeight;
use ethtrace_traces::{Trace, trace_argument};
use tracing::debug;

use super::traits::AsyncEffectAdapter;

const CANNED_ADAPTER_ID: &str = "ethstore.canned";

/// Serves fetch effects from canned traces; unknown blocks yield an empty list.
#[derive(Debug, Default, Clone)]
pub struct CannedTracesAdapter {
    blocks: HashMap<BlockHeight, Vec<Trace>>,
}

impl CannedTracesAdapter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_block(mut self, height: BlockHeight, traces: Vec<Trace>) -> Self {
        self.blocks.insert(height, traces);
        self
    }
}

#[async_trait]
impl<C> AsyncEffectAdapter<C> for CannedTracesAdapter
where
    C: Send + Sync + 'static,
{
    fn kind(&self) -> &str {
        EffectKind::FETCH_TRACES
    }

    async fn execute(&self, _context: Arc<C>, intent: &EffectIntent) -> anyhow::Result<EffectReceipt> {
        let (height,): (BlockHeight,) = intent.params().context("decode fetch_traces params")?;
        let traces = self.blocks.get(&height).cloned().unwrap_or_default();
        debug!(block = %height, traces = traces.len(), "serving canned traces");
        Ok(EffectReceipt::ok(intent, CANNED_ADAPTER_ID, &traces)?)
    }
}

/// Handler that logs the transaction hash of every trace it sees.
#[derive(Clone)]
pub struct RecordingHandler {
    kind: String,
    seen: Arc<Mutex<Vec<String>>>,
    fail_on: HashSet<String>,
    delay: Option<Duration>,
}

impl RecordingHandler {
    pub fn new(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            seen: Arc::new(Mutex::new(Vec::new())),
            fail_on: HashSet::new(),
            delay: None,
        }
    }

    /// Fail invocations for this transaction hash.
    pub fn fail_on(mut self, transaction_hash: impl Into<String>) -> Self {
        self.fail_on.insert(transaction_hash.into());
        self
    }

    /// Sleep before answering, to exercise timeouts.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Transaction hashes in invocation order. Shared with clones.
    pub fn seen(&self) -> Vec<String> {
        self.seen.lock().map(|seen| seen.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl<C> AsyncEffectAdapter<C> for RecordingHandler
where
    C: Send + Sync + 'static,
{
    fn kind(&self) -> &str {
        &self.kind
    }

    async fn execute(&self, _context: Arc<C>, intent: &EffectIntent) -> anyhow::Result<EffectReceipt> {
        let trace = trace_argument(intent)?;
        if let Ok(mut seen) = self.seen.lock() {
            seen.push(trace.transaction_hash.clone());
        }
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        if self.fail_on.contains(&trace.transaction_hash) {
            return Err(anyhow!("handler rejected {}", trace.transaction_hash));
        }
        Ok(EffectReceipt::ok(intent, self.kind.as_str(), &trace.actions.len())?)
    }
}
