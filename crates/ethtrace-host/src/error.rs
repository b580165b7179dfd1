use ethtrace_traces::{ResumeError, TraceError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum HostError {
    #[error(transparent)]
    Trace(#[from] TraceError),
    #[error(transparent)]
    Resume(#[from] ResumeError),
}
