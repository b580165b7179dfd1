use std::future::Future;
use std::sync::Arc;

use anyhow::Context;
use async_trait::async_trait;
use ethtrace_effects::{EffectIntent, EffectReceipt};
use ethtrace_traces::{Trace, trace_argument};
use serde::Serialize;

use super::traits::AsyncEffectAdapter;

/// Binds a caller-supplied async function to a handler kind.
///
/// Whatever the function returns is CBOR-encoded into the receipt; an `Err` is captured
/// by the runtime as an `Error` receipt without being interpreted.
pub struct HandlerAdapter<F> {
    kind: String,
    handler: F,
}

impl<F> HandlerAdapter<F> {
    pub fn new(kind: impl Into<String>, handler: F) -> Self {
        Self {
            kind: kind.into(),
            handler,
        }
    }
}

#[async_trait]
impl<C, F, Fut, R> AsyncEffectAdapter<C> for HandlerAdapter<F>
where
    C: Send + Sync + 'static,
    F: Fn(Arc<C>, Trace) -> Fut + Send + Sync,
    Fut: Future<Output = anyhow::Result<R>> + Send + 'static,
    R: Serialize + Send + 'static,
{
    fn kind(&self) -> &str {
        &self.kind
    }

    async fn execute(&self, context: Arc<C>, intent: &EffectIntent) -> anyhow::Result<EffectReceipt> {
        let trace = trace_argument(intent).context("decode handler trace argument")?;
        let output = (self.handler)(context, trace).await?;
        Ok(EffectReceipt::ok(intent, self.kind.as_str(), &output)?)
    }
}
