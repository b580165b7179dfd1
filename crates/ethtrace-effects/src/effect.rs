use std::sync::Arc;

use crate::{EffectIntent, EffectKind};

/// A pending unit of work: the caller's context plus the intent describing what to run.
///
/// Constructing an effect performs no I/O. Only the runtime that receives it executes it.
#[derive(Debug)]
pub struct Effect<C> {
    pub context: Arc<C>,
    pub intent: EffectIntent,
}

impl<C> Effect<C> {
    pub fn new(context: Arc<C>, intent: EffectIntent) -> Self {
        Self { context, intent }
    }

    pub fn kind(&self) -> &EffectKind {
        &self.intent.kind
    }
}

impl<C> Clone for Effect<C> {
    fn clone(&self) -> Self {
        Self {
            context: Arc::clone(&self.context),
            intent: self.intent.clone(),
        }
    }
}
