use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, RwLock};

use crate::{BlockHeight, RawTraceRow, StoreError, StoreResult, TraceQuery, TraceStore};

/// In-memory trace store holding canned rows per block.
///
/// Answers only the `get-traces` query. [`MemTraceStore::set_unavailable`] makes every
/// query fail, which stands in for a dropped connection.
#[derive(Clone, Default)]
pub struct MemTraceStore {
    rows: Arc<RwLock<HashMap<BlockHeight, Vec<RawTraceRow>>>>,
    unavailable: Arc<AtomicBool>,
}

impl std::fmt::Debug for MemTraceStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let blocks = self.rows.read().map(|rows| rows.len()).unwrap_or(0);
        f.debug_struct("MemTraceStore")
            .field("blocks", &blocks)
            .field("unavailable", &self.unavailable.load(Ordering::Relaxed))
            .finish()
    }
}

impl MemTraceStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_block(self, block: BlockHeight, rows: Vec<RawTraceRow>) -> Self {
        self.insert_rows(block, rows);
        self
    }

    pub fn insert_rows(&self, block: BlockHeight, rows: Vec<RawTraceRow>) {
        if let Ok(mut guard) = self.rows.write() {
            guard.entry(block).or_default().extend(rows);
        }
    }

    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::Relaxed);
    }
}

impl TraceStore for MemTraceStore {
    fn execute(&self, query: &TraceQuery) -> StoreResult<Vec<RawTraceRow>> {
        if self.unavailable.load(Ordering::Relaxed) {
            return Err(StoreError::Unavailable("connection refused".into()));
        }
        if query.name != TraceQuery::GET_TRACES {
            return Err(StoreError::UnknownQuery(query.name.to_string()));
        }
        let block = query.block_number().ok_or_else(|| StoreError::MissingParam {
            name: query.name.to_string(),
        })?;
        let guard = self
            .rows
            .read()
            .map_err(|_| StoreError::Unavailable("row map lock poisoned".into()))?;
        Ok(guard.get(&block).cloned().unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::RawActionEntry;

    #[test]
    fn answers_only_the_requested_block() {
        let store = MemTraceStore::new()
            .with_block(BlockHeight(1), vec![RawTraceRow::new(10, "0x1", vec![])])
            .with_block(
                BlockHeight(2),
                vec![RawTraceRow::new(20, "0x2", vec![RawActionEntry::new("a", "b", "c")])],
            );
        let rows = store.execute(&TraceQuery::for_block(BlockHeight(2))).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].transaction_hash.as_deref(), Some("0x2"));
        assert!(store.execute(&TraceQuery::for_block(BlockHeight(3))).unwrap().is_empty());
    }

    #[test]
    fn unknown_query_is_rejected() {
        let store = MemTraceStore::new();
        let mut query = TraceQuery::for_block(BlockHeight(1));
        query.name = "get-blocks";
        assert!(matches!(
            store.execute(&query),
            Err(StoreError::UnknownQuery(name)) if name == "get-blocks"
        ));
    }

    #[test]
    fn unavailable_store_fails_every_query() {
        let store = MemTraceStore::new();
        store.set_unavailable(true);
        assert!(matches!(
            store.execute(&TraceQuery::for_block(BlockHeight(1))),
            Err(StoreError::Unavailable(_))
        ));
        store.set_unavailable(false);
        assert!(store.execute(&TraceQuery::for_block(BlockHeight(1))).is_ok());
    }
}
