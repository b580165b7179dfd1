//! Drivers that step effects through an [`EffectRuntime`].
//!
//! The traversal itself never decides what happens after a failed handler; the
//! [`ErrorPolicy`] passed to [`drive`] does.

use std::sync::Arc;

use ethtrace_effects::{EffectKind, EffectReceipt, ReceiptStatus};
use ethtrace_store::BlockHeight;
use ethtrace_traces::{
    ProcessTraces, Trace, fetch_traces, process_traces, trace_argument, traces_from_receipt,
};
use tracing::{debug, info, warn};

use crate::{EffectRuntime, HostError};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ErrorPolicy {
    /// Stop the traversal at the first failed handler.
    #[default]
    Halt,
    /// Record the failure and keep going.
    Continue,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct DriveOptions {
    pub on_error: ErrorPolicy,
    /// Stop after this many handler invocations.
    pub max_steps: Option<usize>,
}

/// A handler invocation that did not succeed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("handler failed at step {step} for {transaction_hash}: {message}")]
pub struct HandlerInvocationError {
    pub step: usize,
    pub transaction_hash: String,
    pub status: ReceiptStatus,
    pub message: String,
}

#[derive(Debug, Default)]
pub struct TraversalReport {
    /// Handler effects executed.
    pub steps: usize,
    pub receipts: Vec<EffectReceipt>,
    pub failures: Vec<HandlerInvocationError>,
    /// True when the traversal was stopped before every trace was handled.
    pub halted: bool,
}

impl TraversalReport {
    pub fn succeeded(&self) -> usize {
        self.steps - self.failures.len()
    }
}

/// Issue the fetch effect for `height`, execute it, and resume with its outcome.
pub async fn fetch_block<C>(
    runtime: &EffectRuntime<C>,
    context: Arc<C>,
    height: BlockHeight,
) -> Result<Vec<Trace>, HostError>
where
    C: Send + Sync + 'static,
{
    let effect = fetch_traces(context, height)?;
    let receipt = runtime.execute(&effect).await;
    let traces = traces_from_receipt(&receipt)?;
    debug!(block = %height, traces = traces.len(), "fetched block traces");
    Ok(traces)
}

/// Step `traversal` to completion (or until `options` stop it), executing each effect
/// only once the previous one has been answered.
pub async fn drive<C, I>(
    runtime: &EffectRuntime<C>,
    mut traversal: ProcessTraces<C, I>,
    options: DriveOptions,
) -> Result<TraversalReport, HostError>
where
    C: Send + Sync + 'static,
    I: Iterator<Item = Trace>,
{
    let mut report = TraversalReport::default();
    loop {
        if options.max_steps.is_some_and(|max| report.steps >= max) {
            report.halted = traversal.remaining() != (0, Some(0));
            traversal.cancel();
            break;
        }
        let Some(effect) = traversal.next_effect() else {
            break;
        };
        let effect = effect?;
        let step = report.steps;
        let receipt = runtime.execute(&effect).await;
        report.steps += 1;

        let failed = !receipt.is_ok();
        if failed {
            let failure = HandlerInvocationError {
                step,
                transaction_hash: trace_argument(&effect.intent)
                    .map(|trace| trace.transaction_hash)
                    .unwrap_or_default(),
                status: receipt.status,
                message: receipt.failure_message().unwrap_or_default(),
            };
            warn!(%failure, "handler invocation failed");
            report.failures.push(failure);
        }

        traversal.resume(receipt.clone())?;
        report.receipts.push(receipt);

        if failed && options.on_error == ErrorPolicy::Halt {
            report.halted = traversal.remaining() != (0, Some(0));
            traversal.cancel();
            break;
        }
    }
    info!(
        handler = %traversal.handler(),
        steps = report.steps,
        failures = report.failures.len(),
        halted = report.halted,
        "traversal finished"
    );
    Ok(report)
}

/// Fetch a block and drive `handler` over its traces.
pub async fn process_block<C>(
    runtime: &EffectRuntime<C>,
    context: Arc<C>,
    height: BlockHeight,
    handler: impl Into<EffectKind>,
    options: DriveOptions,
) -> Result<TraversalReport, HostError>
where
    C: Send + Sync + 'static,
{
    let traces = fetch_block(runtime, Arc::clone(&context), height).await?;
    drive(runtime, process_traces(context, traces, handler), options).await
}
