use serde::{Deserialize, Serialize};

/// One stored transaction row as read from the trace relation.
///
/// Fields are optional here; required-ness is checked when rows are normalized.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawTraceRow {
    /// Seconds since the Unix epoch.
    pub timestamp: Option<u64>,
    pub transaction_hash: Option<String>,
    pub traces: Option<Vec<RawActionEntry>>,
}

impl RawTraceRow {
    pub fn new(timestamp: u64, transaction_hash: impl Into<String>, traces: Vec<RawActionEntry>) -> Self {
        Self {
            timestamp: Some(timestamp),
            transaction_hash: Some(transaction_hash.into()),
            traces: Some(traces),
        }
    }
}

/// Raw per-call record stored inside a row's `traces` column.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawActionEntry {
    #[serde(default)]
    pub action_to: Option<String>,
    #[serde(default)]
    pub action_from: Option<String>,
    #[serde(default)]
    pub action_input: Option<String>,
}

impl RawActionEntry {
    pub fn new(to: impl Into<String>, from: impl Into<String>, input: impl Into<String>) -> Self {
        Self {
            action_to: Some(to.into()),
            action_from: Some(from.into()),
            action_input: Some(input.into()),
        }
    }
}
