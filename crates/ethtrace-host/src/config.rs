use std::time::Duration;

use tracing::warn;

pub const EFFECT_TIMEOUT_ENV: &str = "ETHTRACE_EFFECT_TIMEOUT_SECS";

#[derive(Debug, Clone)]
pub struct HostConfig {
    /// Upper bound on a single effect's execution; elapsed effects get a `Timeout` receipt.
    pub effect_timeout: Duration,
}

impl Default for HostConfig {
    fn default() -> Self {
        Self {
            effect_timeout: Duration::from_secs(30),
        }
    }
}

impl HostConfig {
    /// Defaults, overridden by `ETHTRACE_EFFECT_TIMEOUT_SECS` when it parses.
    pub fn from_env() -> Self {
        Self::from_vars(|name| std::env::var(name).ok())
    }

    /// Same as [`HostConfig::from_env`] with a caller-supplied variable lookup.
    /// Invalid or zero timeouts are logged and ignored.
    pub fn from_vars(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();
        if let Some(raw) = lookup(EFFECT_TIMEOUT_ENV) {
            match raw.trim().parse::<u64>() {
                Ok(secs) if secs > 0 => config.effect_timeout = Duration::from_secs(secs),
                _ => warn!(value = %raw, "ignoring invalid {EFFECT_TIMEOUT_ENV}"),
            }
        }
        config
    }

    pub fn with_effect_timeout(mut self, timeout: Duration) -> Self {
        self.effect_timeout = timeout;
        self
    }
}
