use std::sync::Arc;

use ethtrace_effects::{
    Effect, EffectIntent, EffectKind, EffectReceipt, Hash, IntentBuilder, idempotency_key,
};
use tracing::trace;

use crate::{ResumeError, Trace, TraceError};

/// Where a traversal stands between driver requests.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TraversalState {
    /// No effect requested yet.
    Created,
    /// The last yielded effect has been answered; waiting for the next request.
    Suspended,
    /// An effect was handed out and its outcome has not been fed back.
    Yielded,
    /// Every trace has been described, or the driver cancelled.
    Exhausted,
}

/// Lazily describe invoking `handler` with `(context, trace)` for each trace, in order.
///
/// Nothing is pulled from `traces` until the driver asks for the next effect, so dropping
/// the sequence after `k` steps leaves later traces untouched and their handlers unrun.
pub fn process_traces<C, I>(
    context: Arc<C>,
    traces: I,
    handler: impl Into<EffectKind>,
) -> ProcessTraces<C, I::IntoIter>
where
    I: IntoIterator<Item = Trace>,
{
    ProcessTraces {
        context,
        handler: handler.into(),
        traces: traces.into_iter(),
        step: 0,
        state: TraversalState::Created,
        pending: None,
        last_outcome: None,
    }
}

/// Decode the trace argument of a handler effect produced by [`process_traces`].
pub fn trace_argument(intent: &EffectIntent) -> Result<Trace, TraceError> {
    let (trace,): (Trace,) = intent.params()?;
    Ok(trace)
}

/// Single-pass sequence of handler effects. Recreate it to start over.
pub struct ProcessTraces<C, I> {
    context: Arc<C>,
    handler: EffectKind,
    traces: I,
    step: u64,
    state: TraversalState,
    pending: Option<[u8; 32]>,
    last_outcome: Option<EffectReceipt>,
}

impl<C, I> ProcessTraces<C, I>
where
    I: Iterator<Item = Trace>,
{
    /// Describe the next handler invocation, or `None` once the traces run out.
    pub fn next_effect(&mut self) -> Option<Result<Effect<C>, TraceError>> {
        if self.state == TraversalState::Exhausted {
            return None;
        }
        let Some(trace) = self.traces.next() else {
            self.state = TraversalState::Exhausted;
            self.pending = None;
            return None;
        };

        let step = self.step;
        self.step += 1;
        let built = IntentBuilder::new(self.handler.clone(), &(trace,))
            .idempotency_key(idempotency_key(step))
            .build();
        match built {
            Ok(intent) => {
                trace!(step, handler = %self.handler, intent = %intent.hash(), "yielding handler effect");
                self.pending = Some(intent.intent_hash);
                self.state = TraversalState::Yielded;
                Some(Ok(Effect::new(Arc::clone(&self.context), intent)))
            }
            Err(err) => {
                self.pending = None;
                self.state = TraversalState::Suspended;
                Some(Err(err.into()))
            }
        }
    }

    /// Feed back the outcome of the effect most recently yielded.
    ///
    /// Optional: the driver may request the next effect without resuming.
    pub fn resume(&mut self, receipt: EffectReceipt) -> Result<(), ResumeError> {
        let expected = self.pending.ok_or(ResumeError::NothingPending)?;
        if receipt.intent_hash != expected {
            return Err(ResumeError::Mismatch {
                expected: Hash::from(expected),
                actual: Hash::from(receipt.intent_hash),
            });
        }
        self.pending = None;
        self.state = TraversalState::Suspended;
        self.last_outcome = Some(receipt);
        Ok(())
    }

    /// Stop the traversal; no further effects are produced.
    pub fn cancel(&mut self) {
        self.state = TraversalState::Exhausted;
        self.pending = None;
    }

    pub fn state(&self) -> TraversalState {
        self.state
    }

    /// Number of effects yielded so far.
    pub fn steps(&self) -> u64 {
        self.step
    }

    pub fn handler(&self) -> &EffectKind {
        &self.handler
    }

    pub fn last_outcome(&self) -> Option<&EffectReceipt> {
        self.last_outcome.as_ref()
    }

    /// Bounds on the effects still to come.
    pub fn remaining(&self) -> (usize, Option<usize>) {
        match self.state {
            TraversalState::Exhausted => (0, Some(0)),
            _ => self.traces.size_hint(),
        }
    }
}

impl<C, I> Iterator for ProcessTraces<C, I>
where
    I: Iterator<Item = Trace>,
{
    type Item = Result<Effect<C>, TraceError>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_effect()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.remaining()
    }
}

impl<C, I> std::iter::FusedIterator for ProcessTraces<C, I> where I: Iterator<Item = Trace> {}
