//! Canonical trace records and the effect-producing operations over them.
//!
//! - [`normalize`] turns raw store rows into [`Trace`] values.
//! - [`fetch_traces`] describes "read this block's traces" as an [`Effect`](ethtrace_effects::Effect).
//! - [`process_traces`] lazily describes one handler invocation per trace.

mod context;
mod error;
mod fetch;
pub mod normalize;
mod process;
mod types;

pub use context::{TraceContext, TraceStoreContext};
pub use error::{MalformedRowError, ResumeError, TraceError};
pub use fetch::{fetch_traces, fetch_traces_from_store, traces_from_receipt};
pub use normalize::{ValidTraceRow, normalize_rows, validate_row};
pub use process::{ProcessTraces, TraversalState, process_traces, trace_argument};
pub use types::{Action, Trace};

pub use ethtrace_store::BlockHeight;
