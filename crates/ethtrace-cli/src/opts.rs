//! Global options shared by every command.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Args;
use ethtrace_host::{EffectRuntime, HostConfig, adapters::FetchTracesAdapter};
use ethtrace_store::{SqliteTraceStore, StoreConfig};
use ethtrace_traces::TraceContext;

/// Flags win over the environment. Unset flags defer to `StoreConfig::from_env` and
/// `HostConfig::from_env`, which own `ETHSTORE_PATH` and `ETHTRACE_EFFECT_TIMEOUT_SECS`.
#[derive(Args, Debug, Clone)]
pub struct StoreOpts {
    /// SQLite trace store (default: $ETHSTORE_PATH, then ethstore.sqlite)
    #[arg(long, global = true)]
    pub db: Option<PathBuf>,

    /// Per-effect timeout in seconds (default: $ETHTRACE_EFFECT_TIMEOUT_SECS, then 30)
    #[arg(long, global = true, value_parser = clap::value_parser!(u64).range(1..))]
    pub timeout_secs: Option<u64>,
}

impl StoreOpts {
    pub fn store_config(&self) -> StoreConfig {
        match &self.db {
            Some(path) => StoreConfig { path: path.clone() },
            None => StoreConfig::from_env(),
        }
    }

    pub fn host_config(&self) -> HostConfig {
        match self.timeout_secs {
            Some(secs) => HostConfig::default().with_effect_timeout(Duration::from_secs(secs)),
            None => HostConfig::from_env(),
        }
    }

    /// Open the store and build a runtime that can serve fetch effects from it.
    pub fn open(&self) -> Result<Session> {
        let config = self.store_config();
        let store = Arc::new(
            config
                .open()
                .with_context(|| format!("open trace store {}", config.path.display()))?,
        );
        let context = Arc::new(TraceContext::new(store.clone()));
        let runtime =
            EffectRuntime::<TraceContext>::new(self.host_config()).with_adapter(Box::new(FetchTracesAdapter));
        Ok(Session {
            store,
            context,
            runtime,
        })
    }
}

/// An open store plus the runtime bound to it.
pub struct Session {
    store: Arc<SqliteTraceStore>,
    pub context: Arc<TraceContext>,
    pub runtime: EffectRuntime<TraceContext>,
}

impl Session {
    /// Close the store whatever the command's outcome was. A command error takes
    /// precedence over a close error.
    pub fn finish<T>(self, outcome: Result<T>) -> Result<T> {
        let closed = self.store.close().context("close trace store");
        let value = outcome?;
        closed?;
        Ok(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[derive(Parser, Debug)]
    struct TestCli {
        #[command(flatten)]
        opts: StoreOpts,
    }

    fn seeded_opts(dir: &tempfile::TempDir) -> StoreOpts {
        let path = dir.path().join("ethstore.sqlite");
        SqliteTraceStore::create(&path).unwrap().close().unwrap();
        StoreOpts {
            db: Some(path),
            timeout_secs: None,
        }
    }

    #[test]
    fn zero_timeout_flag_is_rejected() {
        assert!(TestCli::try_parse_from(["ethtrace", "--timeout-secs", "0"]).is_err());
        assert!(TestCli::try_parse_from(["ethtrace", "--timeout-secs", "abc"]).is_err());
    }

    #[test]
    fn timeout_flag_overrides_default() {
        let cli = TestCli::try_parse_from(["ethtrace", "--timeout-secs", "7"]).unwrap();
        assert_eq!(cli.opts.host_config().effect_timeout, Duration::from_secs(7));
    }

    #[test]
    fn db_flag_overrides_store_config() {
        let cli = TestCli::try_parse_from(["ethtrace", "--db", "/tmp/x.sqlite"]).unwrap();
        assert_eq!(cli.opts.store_config().path, PathBuf::from("/tmp/x.sqlite"));
    }

    #[test]
    fn finish_closes_store_on_failure() {
        let dir = tempfile::tempdir().unwrap();
        let session = seeded_opts(&dir).open().unwrap();
        let store = Arc::clone(&session.store);

        let err = session.finish::<()>(Err(anyhow::anyhow!("render failed"))).unwrap_err();

        assert_eq!(err.to_string(), "render failed");
        assert!(!store.is_open());
    }

    #[test]
    fn finish_closes_store_on_success() {
        let dir = tempfile::tempdir().unwrap();
        let session = seeded_opts(&dir).open().unwrap();
        let store = Arc::clone(&session.store);

        assert_eq!(session.finish(Ok(3)).unwrap(), 3);
        assert!(!store.is_open());
    }
}
