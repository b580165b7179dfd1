//! Read access to the trace store: query construction, the store handle trait, and
//! SQLite plus in-memory backends.

mod config;
mod mem_store;
mod query;
mod rows;
mod sqlite_store;

pub use config::{DEFAULT_STORE_PATH, STORE_PATH_ENV, StoreConfig};
pub use mem_store::MemTraceStore;
pub use query::{BlockHeight, QueryParam, TraceQuery};
pub use rows::{RawActionEntry, RawTraceRow};
pub use sqlite_store::SqliteTraceStore;

use std::path::PathBuf;
use std::sync::Arc;

use tracing::debug;

pub type StoreResult<T> = Result<T, StoreError>;
pub type DynTraceStore = Arc<dyn TraceStore>;

/// A handle that can run a parameterized query against the trace relation.
///
/// Implementations must tolerate concurrent reads; callers never write through this trait.
pub trait TraceStore: Send + Sync {
    fn execute(&self, query: &TraceQuery) -> StoreResult<Vec<RawTraceRow>>;
}

/// Build the per-block query and run it. Errors are surfaced as-is, never retried.
pub fn query_block_rows(store: &dyn TraceStore, height: BlockHeight) -> StoreResult<Vec<RawTraceRow>> {
    let query = TraceQuery::for_block(height);
    let rows = store.execute(&query)?;
    debug!(block = %height, rows = rows.len(), query = query.name, "queried trace rows");
    Ok(rows)
}

/// Failure reported by a store handle while executing a query.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Carries the SQLite message itself; there is no separate source.
    #[error("sqlite error: {0}")]
    Sqlite(rusqlite::Error),
    #[error("trace store {} does not exist", .0.display())]
    NotFound(PathBuf),
    #[error("unknown query '{0}'")]
    UnknownQuery(String),
    #[error("query '{name}' expects a block number parameter")]
    MissingParam { name: String },
    #[error("block {0} does not fit a signed 64-bit column")]
    BlockOutOfRange(BlockHeight),
    #[error("failed to decode column '{column}': {reason}")]
    Decode { column: &'static str, reason: String },
    #[error("trace store unavailable: {0}")]
    Unavailable(String),
}

impl From<rusqlite::Error> for StoreError {
    fn from(err: rusqlite::Error) -> Self {
        StoreError::Sqlite(err)
    }
}
