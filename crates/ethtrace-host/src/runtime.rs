use std::collections::HashMap;
use std::sync::Arc;

use ethtrace_effects::{Effect, EffectReceipt, ReceiptStatus};
use tokio::time::timeout;
use tracing::{debug, warn};

use crate::adapters::traits::AsyncEffectAdapter;
use crate::config::HostConfig;

pub const MISSING_ADAPTER_ID: &str = "adapter.missing";

/// Dispatch table from effect kind to the adapter that executes it.
///
/// Every executed effect yields a receipt: adapter errors and timeouts are captured as
/// `Error`/`Timeout` receipts instead of propagating.
pub struct EffectRuntime<C: Send + Sync + 'static> {
    adapters: HashMap<String, Box<dyn AsyncEffectAdapter<C>>>,
    config: HostConfig,
}

impl<C> EffectRuntime<C>
where
    C: Send + Sync + 'static,
{
    pub fn new(config: HostConfig) -> Self {
        Self {
            adapters: HashMap::new(),
            config,
        }
    }

    /// Register an adapter under its kind, replacing any previous one.
    pub fn register(&mut self, adapter: Box<dyn AsyncEffectAdapter<C>>) {
        let kind = adapter.kind().to_string();
        if self.adapters.insert(kind.clone(), adapter).is_some() {
            debug!(%kind, "replaced effect adapter");
        }
    }

    pub fn with_adapter(mut self, adapter: Box<dyn AsyncEffectAdapter<C>>) -> Self {
        self.register(adapter);
        self
    }

    pub fn get(&self, kind: &str) -> Option<&dyn AsyncEffectAdapter<C>> {
        self.adapters.get(kind).map(|b| b.as_ref())
    }

    pub fn config(&self) -> &HostConfig {
        &self.config
    }

    pub async fn execute(&self, effect: &Effect<C>) -> EffectReceipt {
        let intent = &effect.intent;
        let Some(adapter) = self.get(intent.kind.as_str()) else {
            warn!(kind = %intent.kind, "no adapter registered for effect");
            return EffectReceipt::failure(
                intent,
                MISSING_ADAPTER_ID,
                ReceiptStatus::Error,
                format!("no adapter registered for '{}'", intent.kind),
            );
        };

        let run = adapter.execute(Arc::clone(&effect.context), intent);
        match timeout(self.config.effect_timeout, run).await {
            Ok(Ok(receipt)) => {
                debug!(kind = %intent.kind, intent = %intent.hash(), status = ?receipt.status, "effect executed");
                receipt
            }
            Ok(Err(err)) => {
                warn!(kind = %intent.kind, intent = %intent.hash(), error = %format!("{err:#}"), "effect failed");
                EffectReceipt::failure(intent, adapter.kind(), ReceiptStatus::Error, format!("{err:#}"))
            }
            Err(_) => {
                warn!(kind = %intent.kind, timeout = ?self.config.effect_timeout, "effect timed out");
                EffectReceipt::failure(
                    intent,
                    adapter.kind(),
                    ReceiptStatus::Timeout,
                    format!("timed out after {:?}", self.config.effect_timeout),
                )
            }
        }
    }

    /// Execute effects one after another, in the order given.
    pub async fn execute_batch(&self, effects: Vec<Effect<C>>) -> Vec<EffectReceipt> {
        let mut receipts = Vec::with_capacity(effects.len());
        for effect in effects {
            receipts.push(self.execute(&effect).await);
        }
        receipts
    }
}
