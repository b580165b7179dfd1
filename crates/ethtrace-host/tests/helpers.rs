#![allow(dead_code)]

use std::sync::Arc;

use ethtrace_host::adapters::FetchTracesAdapter;
use ethtrace_host::{EffectRuntime, HostConfig};
use ethtrace_store::{BlockHeight, MemTraceStore, RawActionEntry, RawTraceRow};
use ethtrace_traces::{Trace, TraceContext};

pub fn sample_rows(count: u64) -> Vec<RawTraceRow> {
    (0..count)
        .map(|i| {
            let actions = (0..i % 3)
                .map(|j| RawActionEntry::new(format!("0xto{j}"), format!("0xfrom{i}"), format!("0x{i:02x}{j:02x}")))
                .collect();
            RawTraceRow::new(1_650_000_000 + i, format!("0x{i:04x}"), actions)
        })
        .collect()
}

pub fn sample_traces(count: u64) -> Vec<Trace> {
    ethtrace_traces::normalize_rows(sample_rows(count)).expect("sample rows are well formed")
}

pub fn mem_context(blocks: Vec<(u64, Vec<RawTraceRow>)>) -> (Arc<TraceContext>, MemTraceStore) {
    let store = MemTraceStore::new();
    for (height, rows) in blocks {
        store.insert_rows(BlockHeight(height), rows);
    }
    let ctx = Arc::new(TraceContext::new(Arc::new(store.clone())));
    (ctx, store)
}

pub fn store_runtime() -> EffectRuntime<TraceContext> {
    EffectRuntime::<TraceContext>::new(HostConfig::default()).with_adapter(Box::new(FetchTracesAdapter))
}
