use std::sync::Arc;

use anyhow::Context;
use async_trait::async_trait;
use ethtrace_effects::{EffectIntent, EffectKind, EffectReceipt};
use ethtrace_store::BlockHeight;
use ethtrace_traces::{TraceStoreContext, fetch_traces_from_store};

use super::traits::AsyncEffectAdapter;

/// Runs `ethstore.fetch_traces` against the context's store.
///
/// The store read is blocking, so it is moved onto the blocking pool.
pub struct FetchTracesAdapter;

#[async_trait]
impl<C> AsyncEffectAdapter<C> for FetchTracesAdapter
where
    C: TraceStoreContext + 'static,
{
    fn kind(&self) -> &str {
        EffectKind::FETCH_TRACES
    }

    async fn execute(&self, context: Arc<C>, intent: &EffectIntent) -> anyhow::Result<EffectReceipt> {
        let (height,): (BlockHeight,) = intent
            .params()
            .context("decode fetch_traces params")?;
        let store = Arc::clone(context.ethstore());
        let traces = tokio::task::spawn_blocking(move || fetch_traces_from_store(store.as_ref(), height))
            .await
            .context("fetch_traces task")??;
        Ok(EffectReceipt::ok(intent, EffectKind::FETCH_TRACES, &traces)?)
    }
}
