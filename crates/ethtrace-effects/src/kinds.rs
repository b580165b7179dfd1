use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

/// Identifies the procedure an effect asks the runtime to invoke (e.g. `ethstore.fetch_traces`).
///
/// Handler kinds are chosen by callers; the runtime binds each kind to code at registration.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EffectKind(String);

impl EffectKind {
    pub const FETCH_TRACES: &'static str = "ethstore.fetch_traces";

    pub fn new(kind: impl Into<String>) -> Self {
        Self(kind.into())
    }

    pub fn fetch_traces() -> Self {
        Self::new(Self::FETCH_TRACES)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl<S: Into<String>> From<S> for EffectKind {
    fn from(value: S) -> Self {
        Self::new(value)
    }
}

impl FromStr for EffectKind {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::new(s.to_owned()))
    }
}

impl fmt::Display for EffectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl AsRef<str> for EffectKind {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}
