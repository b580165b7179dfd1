use ethtrace_effects::{Hash, IntentEncodeError, ReceiptDecodeError, ReceiptStatus};
use ethtrace_store::StoreError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TraceError {
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    MalformedRow(#[from] MalformedRowError),
    #[error(transparent)]
    Encode(#[from] IntentEncodeError),
    #[error("failed to decode effect arguments: {0}")]
    Params(#[from] serde_cbor::Error),
    #[error(transparent)]
    Receipt(#[from] ReceiptDecodeError),
    #[error("effect failed ({status:?} from {adapter_id}): {message}")]
    Effect {
        status: ReceiptStatus,
        adapter_id: String,
        message: String,
    },
}

/// A stored row lacks a field every trace needs.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("row {index} is missing required field '{field}'")]
pub struct MalformedRowError {
    pub index: usize,
    pub field: &'static str,
}

/// Rejected attempt to feed an outcome back into a traversal.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResumeError {
    #[error("no effect is awaiting an outcome")]
    NothingPending,
    #[error("receipt answers {actual}, but the pending effect is {expected}")]
    Mismatch { expected: Hash, actual: Hash },
}
