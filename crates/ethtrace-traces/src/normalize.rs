//! Raw row → [`Trace`] mapping.
//!
//! Rows are checked for required fields once, up front, by [`validate_row`]. The mapping
//! that follows is a pure field rename: actions keep their order, nothing is filtered or
//! defaulted, and a row with no actions becomes a trace with an empty action list.

use ethtrace_store::{RawActionEntry, RawTraceRow};

use crate::{Action, MalformedRowError, Trace};

/// A row whose required fields are known to be present.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ValidTraceRow {
    pub timestamp: u64,
    pub transaction_hash: String,
    pub traces: Vec<RawActionEntry>,
}

/// Check that `row` (at position `index` in the query result) carries every required field.
///
/// A null `traces` column is treated as malformed rather than as "no actions".
pub fn validate_row(index: usize, row: RawTraceRow) -> Result<ValidTraceRow, MalformedRowError> {
    let missing = |field| MalformedRowError { index, field };
    Ok(ValidTraceRow {
        timestamp: row.timestamp.ok_or_else(|| missing("timestamp"))?,
        transaction_hash: row.transaction_hash.ok_or_else(|| missing("transaction_hash"))?,
        traces: row.traces.ok_or_else(|| missing("traces"))?,
    })
}

/// Normalize a query result. Either every row maps or the first malformed row is reported.
pub fn normalize_rows(rows: Vec<RawTraceRow>) -> Result<Vec<Trace>, MalformedRowError> {
    let valid = rows
        .into_iter()
        .enumerate()
        .map(|(index, row)| validate_row(index, row))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(valid.into_iter().map(Trace::from).collect())
}

impl From<ValidTraceRow> for Trace {
    fn from(row: ValidTraceRow) -> Self {
        Trace {
            transaction_hash: row.transaction_hash,
            timestamp: row.timestamp,
            actions: row.traces.into_iter().map(Action::from).collect(),
        }
    }
}
