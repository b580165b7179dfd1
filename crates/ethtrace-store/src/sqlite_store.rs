use std::path::Path;
use std::sync::Mutex;

use rusqlite::{Connection, OpenFlags, params};
use tracing::{debug, info};

use crate::{
    BlockHeight, QueryParam, RawActionEntry, RawTraceRow, StoreError, StoreResult, TraceQuery,
    TraceStore,
};

const SCHEMA: &str = "
    CREATE TABLE IF NOT EXISTS trace (
        block_number INTEGER NOT NULL,
        timestamp INTEGER,
        transaction_hash TEXT,
        traces TEXT
    );
    CREATE INDEX IF NOT EXISTS trace_block_number ON trace (block_number);
";

/// SQLite-backed trace store.
///
/// The handle has an explicit lifecycle. [`SqliteTraceStore::open`] connects read-only to
/// an existing file and [`SqliteTraceStore::close`] releases the connection. Any query
/// issued after closing fails with [`StoreError::Unavailable`].
///
/// [`SqliteTraceStore::create`] is the only constructor that may create or write a file;
/// it exists to seed stores.
pub struct SqliteTraceStore {
    conn: Mutex<Option<Connection>>,
}

impl std::fmt::Debug for SqliteTraceStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SqliteTraceStore")
            .field("open", &self.is_open())
            .finish()
    }
}

impl SqliteTraceStore {
    /// Open an existing store for reading. A missing file is an error, never created.
    pub fn open(path: impl AsRef<Path>) -> StoreResult<Self> {
        let path = path.as_ref();
        if !path.is_file() {
            return Err(StoreError::NotFound(path.to_path_buf()));
        }
        let conn = Connection::open_with_flags(
            path,
            OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )?;
        info!(path = %path.display(), "opened trace store");
        Ok(Self::from_connection(conn))
    }

    /// Open `path` read-write, creating the file and the `trace` relation if needed.
    pub fn create(path: impl AsRef<Path>) -> StoreResult<Self> {
        let path = path.as_ref();
        let store = Self::from_connection(Connection::open(path)?);
        store.ensure_schema()?;
        info!(path = %path.display(), "created trace store");
        Ok(store)
    }

    pub fn open_in_memory() -> StoreResult<Self> {
        Ok(Self::from_connection(Connection::open_in_memory()?))
    }

    fn from_connection(conn: Connection) -> Self {
        Self {
            conn: Mutex::new(Some(conn)),
        }
    }

    pub fn is_open(&self) -> bool {
        self.conn.lock().map(|guard| guard.is_some()).unwrap_or(false)
    }

    /// Create the `trace` relation if it does not exist yet.
    pub fn ensure_schema(&self) -> StoreResult<()> {
        self.with_conn(|conn| {
            conn.execute_batch(SCHEMA)?;
            Ok(())
        })
    }

    /// Append a row for `block`. Used to seed stores; the read path never writes.
    pub fn insert_row(&self, block: BlockHeight, row: &RawTraceRow) -> StoreResult<()> {
        let block_number = bind_block(block)?;
        let timestamp = row
            .timestamp
            .map(|ts| {
                i64::try_from(ts).map_err(|_| StoreError::Decode {
                    column: "timestamp",
                    reason: format!("{ts} overflows a signed 64-bit column"),
                })
            })
            .transpose()?;
        let traces = row
            .traces
            .as_ref()
            .map(serde_json::to_string)
            .transpose()
            .map_err(|err| StoreError::Decode {
                column: "traces",
                reason: err.to_string(),
            })?;
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO trace (block_number, timestamp, transaction_hash, traces)
                 VALUES (?1, ?2, ?3, ?4)",
                params![block_number, timestamp, row.transaction_hash, traces],
            )?;
            Ok(())
        })
    }

    /// Release the connection. Idempotent.
    pub fn close(&self) -> StoreResult<()> {
        let conn = match self.conn.lock() {
            Ok(mut guard) => guard.take(),
            Err(_) => return Err(StoreError::Unavailable("connection lock poisoned".into())),
        };
        if let Some(conn) = conn {
            conn.close().map_err(|(_, err)| StoreError::Sqlite(err))?;
            info!("closed trace store");
        }
        Ok(())
    }

    fn with_conn<T>(&self, f: impl FnOnce(&Connection) -> StoreResult<T>) -> StoreResult<T> {
        let guard = self
            .conn
            .lock()
            .map_err(|_| StoreError::Unavailable("connection lock poisoned".into()))?;
        match guard.as_ref() {
            Some(conn) => f(conn),
            None => Err(StoreError::Unavailable("store handle is closed".into())),
        }
    }
}

impl TraceStore for SqliteTraceStore {
    fn execute(&self, query: &TraceQuery) -> StoreResult<Vec<RawTraceRow>> {
        let bound = query
            .params
            .iter()
            .map(|param| match param {
                QueryParam::BlockNumber(height) => bind_block(*height),
            })
            .collect::<StoreResult<Vec<i64>>>()?;

        self.with_conn(|conn| {
            let mut stmt = conn.prepare(&query.text)?;
            let mut rows = stmt.query(rusqlite::params_from_iter(bound.iter()))?;
            let mut out = Vec::new();
            while let Some(row) = rows.next()? {
                let timestamp: Option<i64> = row.get(0)?;
                let transaction_hash: Option<String> = row.get(1)?;
                let traces: Option<String> = row.get(2)?;
                out.push(RawTraceRow {
                    timestamp: timestamp.map(decode_timestamp).transpose()?,
                    transaction_hash,
                    traces: traces.as_deref().map(decode_actions).transpose()?,
                });
            }
            debug!(query = query.name, rows = out.len(), "sqlite query finished");
            Ok(out)
        })
    }
}

fn bind_block(height: BlockHeight) -> StoreResult<i64> {
    i64::try_from(height.get()).map_err(|_| StoreError::BlockOutOfRange(height))
}

fn decode_timestamp(raw: i64) -> StoreResult<u64> {
    u64::try_from(raw).map_err(|_| StoreError::Decode {
        column: "timestamp",
        reason: format!("negative timestamp {raw}"),
    })
}

fn decode_actions(raw: &str) -> StoreResult<Vec<RawActionEntry>> {
    serde_json::from_str(raw).map_err(|err| StoreError::Decode {
        column: "traces",
        reason: err.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seeded() -> SqliteTraceStore {
        let store = SqliteTraceStore::open_in_memory().expect("open");
        store.ensure_schema().expect("schema");
        store
    }

    #[test]
    fn rows_come_back_in_insertion_order() {
        let store = seeded();
        let block = BlockHeight(7);
        for hash in ["0x03", "0x01", "0x02"] {
            store
                .insert_row(block, &RawTraceRow::new(1_600_000_000, hash, vec![]))
                .expect("insert");
        }
        store
            .insert_row(BlockHeight(8), &RawTraceRow::new(1, "0xff", vec![]))
            .expect("insert other block");

        let rows = store.execute(&TraceQuery::for_block(block)).expect("query");
        let hashes: Vec<_> = rows
            .iter()
            .map(|row| row.transaction_hash.clone().unwrap())
            .collect();
        assert_eq!(hashes, vec!["0x03", "0x01", "0x02"]);
    }

    #[test]
    fn null_columns_read_as_none() {
        let store = seeded();
        store
            .insert_row(BlockHeight(1), &RawTraceRow::default())
            .expect("insert");
        let rows = store.execute(&TraceQuery::for_block(BlockHeight(1))).expect("query");
        assert_eq!(rows, vec![RawTraceRow::default()]);
    }

    #[test]
    fn oversized_block_is_rejected_before_querying() {
        let store = seeded();
        let err = store
            .execute(&TraceQuery::for_block(BlockHeight(u64::MAX)))
            .unwrap_err();
        assert!(matches!(err, StoreError::BlockOutOfRange(BlockHeight(u64::MAX))));
    }

    #[test]
    fn queries_fail_after_close() {
        let store = seeded();
        store.close().expect("close");
        store.close().expect("second close is a no-op");
        assert!(!store.is_open());
        let err = store.execute(&TraceQuery::for_block(BlockHeight(1))).unwrap_err();
        assert!(matches!(err, StoreError::Unavailable(_)));
    }

    #[test]
    fn missing_relation_is_a_store_error() {
        let store = SqliteTraceStore::open_in_memory().expect("open");
        let err = store.execute(&TraceQuery::for_block(BlockHeight(1))).unwrap_err();
        assert!(matches!(err, StoreError::Sqlite(_)));
        assert_eq!(err.to_string(), "sqlite error: no such table: trace");
        assert!(std::error::Error::source(&err).is_none());
    }

    #[test]
    fn open_never_creates_a_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("typo.sqlite");

        let err = SqliteTraceStore::open(&path).unwrap_err();

        assert!(matches!(&err, StoreError::NotFound(p) if p == &path));
        assert!(!path.exists());
    }

    #[test]
    fn read_handles_reject_writes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ethstore.sqlite");
        SqliteTraceStore::create(&path).unwrap().close().unwrap();

        let store = SqliteTraceStore::open(&path).unwrap();
        let err = store
            .insert_row(BlockHeight(1), &RawTraceRow::new(1, "0x1", vec![]))
            .unwrap_err();

        assert!(matches!(err, StoreError::Sqlite(_)));
        assert!(store.execute(&TraceQuery::for_block(BlockHeight(1))).unwrap().is_empty());
    }
}
