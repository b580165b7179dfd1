//! Async interpreter for trace effects plus the drivers that step traversals through it.

pub mod adapters;
pub mod config;
pub mod driver;
pub mod error;
pub mod runtime;

pub use config::{EFFECT_TIMEOUT_ENV, HostConfig};
pub use driver::{
    DriveOptions, ErrorPolicy, HandlerInvocationError, TraversalReport, drive, fetch_block,
    process_block,
};
pub use error::HostError;
pub use runtime::EffectRuntime;
