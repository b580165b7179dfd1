use std::path::PathBuf;

use crate::{SqliteTraceStore, StoreResult};

pub const DEFAULT_STORE_PATH: &str = "ethstore.sqlite";
pub const STORE_PATH_ENV: &str = "ETHSTORE_PATH";

/// Where the trace store lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    pub path: PathBuf,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from(DEFAULT_STORE_PATH),
        }
    }
}

impl StoreConfig {
    /// Reads `ETHSTORE_PATH`, falling back to [`DEFAULT_STORE_PATH`].
    pub fn from_env() -> Self {
        Self::from_vars(|name| std::env::var(name).ok())
    }

    /// Same as [`StoreConfig::from_env`] with a caller-supplied variable lookup.
    pub fn from_vars(lookup: impl Fn(&str) -> Option<String>) -> Self {
        match lookup(STORE_PATH_ENV) {
            Some(path) if !path.trim().is_empty() => Self {
                path: PathBuf::from(path.trim()),
            },
            _ => Self::default(),
        }
    }

    /// Open the configured store read-only.
    pub fn open(&self) -> StoreResult<SqliteTraceStore> {
        SqliteTraceStore::open(&self.path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vars(pairs: &'static [(&'static str, &'static str)]) -> impl Fn(&str) -> Option<String> {
        move |name: &str| {
            pairs
                .iter()
                .find(|(key, _)| *key == name)
                .map(|(_, value)| value.to_string())
        }
    }

    #[test]
    fn unset_path_uses_default() {
        assert_eq!(StoreConfig::from_vars(vars(&[])), StoreConfig::default());
        assert_eq!(StoreConfig::default().path, PathBuf::from(DEFAULT_STORE_PATH));
    }

    #[test]
    fn blank_path_uses_default() {
        let config = StoreConfig::from_vars(vars(&[(STORE_PATH_ENV, "  ")]));
        assert_eq!(config, StoreConfig::default());
    }

    #[test]
    fn path_comes_from_the_environment() {
        let config = StoreConfig::from_vars(vars(&[(STORE_PATH_ENV, "/data/traces.sqlite")]));
        assert_eq!(config.path, PathBuf::from("/data/traces.sqlite"));
    }
}
