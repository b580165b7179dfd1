use ethtrace_store::RawActionEntry;
use serde::{Deserialize, Serialize};

/// A single contract call inside a transaction.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Action {
    pub to: Option<String>,
    pub from: Option<String>,
    pub input: Option<String>,
}

impl Action {
    pub fn new(to: impl Into<String>, from: impl Into<String>, input: impl Into<String>) -> Self {
        Self {
            to: Some(to.into()),
            from: Some(from.into()),
            input: Some(input.into()),
        }
    }
}

impl From<RawActionEntry> for Action {
    fn from(raw: RawActionEntry) -> Self {
        Self {
            to: raw.action_to,
            from: raw.action_from,
            input: raw.action_input,
        }
    }
}

/// Canonical per-transaction record of executed calls.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Trace {
    pub transaction_hash: String,
    /// Seconds since the Unix epoch.
    pub timestamp: u64,
    pub actions: Vec<Action>,
}
