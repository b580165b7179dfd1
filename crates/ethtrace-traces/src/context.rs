use ethtrace_store::DynTraceStore;

/// Execution context that can hand out the trace store handle.
pub trait TraceStoreContext: Send + Sync {
    fn ethstore(&self) -> &DynTraceStore;
}

/// Minimal context carrying only the store handle.
#[derive(Clone)]
pub struct TraceContext {
    pub ethstore: DynTraceStore,
}

impl TraceContext {
    pub fn new(ethstore: DynTraceStore) -> Self {
        Self { ethstore }
    }
}

impl TraceStoreContext for TraceContext {
    fn ethstore(&self) -> &DynTraceStore {
        &self.ethstore
    }
}
