use std::sync::Arc;

use async_trait::async_trait;
use ethtrace_effects::{EffectIntent, EffectReceipt};

/// Executes effects of one kind on behalf of the runtime.
#[async_trait]
pub trait AsyncEffectAdapter<C>: Send + Sync
where
    C: Send + Sync + 'static,
{
    fn kind(&self) -> &str;
    async fn execute(&self, context: Arc<C>, intent: &EffectIntent) -> anyhow::Result<EffectReceipt>;
}
