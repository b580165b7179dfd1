use std::sync::Arc;

use ethtrace_effects::{Effect, EffectKind, EffectReceipt, IntentBuilder};
use ethtrace_store::{BlockHeight, TraceStore, query_block_rows};
use tracing::debug;

use crate::{Trace, TraceError, normalize_rows};

/// Describe reading the traces of `height`. Nothing is queried until a runtime executes it.
///
/// The effect's kind is [`EffectKind::FETCH_TRACES`] and its positional arguments are
/// `[height]`; the store is reached through the context when the effect runs.
pub fn fetch_traces<C>(context: Arc<C>, height: BlockHeight) -> Result<Effect<C>, TraceError> {
    let intent = IntentBuilder::new(EffectKind::fetch_traces(), &(height,)).build()?;
    Ok(Effect::new(context, intent))
}

/// The procedure behind the fetch effect: query the block and normalize its rows.
pub fn fetch_traces_from_store(
    store: &dyn TraceStore,
    height: BlockHeight,
) -> Result<Vec<Trace>, TraceError> {
    let rows = query_block_rows(store, height)?;
    let traces = normalize_rows(rows)?;
    debug!(block = %height, traces = traces.len(), "normalized traces");
    Ok(traces)
}

/// Resume after a fetch effect: decode the traces or surface the captured failure.
pub fn traces_from_receipt(receipt: &EffectReceipt) -> Result<Vec<Trace>, TraceError> {
    if !receipt.is_ok() {
        return Err(TraceError::Effect {
            status: receipt.status,
            adapter_id: receipt.adapter_id.clone(),
            message: receipt.failure_message().unwrap_or_default(),
        });
    }
    Ok(receipt.payload()?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ethtrace_effects::ReceiptStatus;
    use ethtrace_store::{RawTraceRow, StoreResult, TraceQuery};
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Default)]
    struct CountingStore {
        calls: AtomicUsize,
    }

    impl TraceStore for CountingStore {
        fn execute(&self, _query: &TraceQuery) -> StoreResult<Vec<RawTraceRow>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(vec![RawTraceRow::new(5, "0x5", vec![])])
        }
    }

    #[test]
    fn building_the_effect_touches_no_store() {
        let store = Arc::new(CountingStore::default());
        let effect = fetch_traces(Arc::clone(&store), BlockHeight(9)).unwrap();

        assert_eq!(store.calls.load(Ordering::SeqCst), 0);
        assert_eq!(effect.kind().as_str(), EffectKind::FETCH_TRACES);
        let (height,): (BlockHeight,) = effect.intent.params().unwrap();
        assert_eq!(height, BlockHeight(9));
    }

    #[test]
    fn store_procedure_runs_query_and_normalizes() {
        let store = CountingStore::default();
        let traces = fetch_traces_from_store(&store, BlockHeight(9)).unwrap();
        assert_eq!(store.calls.load(Ordering::SeqCst), 1);
        assert_eq!(traces[0].transaction_hash, "0x5");
    }

    #[test]
    fn failed_receipt_surfaces_message() {
        let effect = fetch_traces(Arc::new(()), BlockHeight(1)).unwrap();
        let receipt = EffectReceipt::failure(
            &effect.intent,
            "ethstore.fetch_traces",
            ReceiptStatus::Error,
            "store query failed: connection refused",
        );
        match traces_from_receipt(&receipt).unwrap_err() {
            TraceError::Effect { status, message, .. } => {
                assert_eq!(status, ReceiptStatus::Error);
                assert!(message.contains("connection refused"));
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn ok_receipt_decodes_traces() {
        let effect = fetch_traces(Arc::new(()), BlockHeight(1)).unwrap();
        let traces = vec![Trace {
            transaction_hash: "0x1".into(),
            timestamp: 3,
            actions: vec![],
        }];
        let receipt = EffectReceipt::ok(&effect.intent, "ethstore.fetch_traces", &traces).unwrap();
        assert_eq!(traces_from_receipt(&receipt).unwrap(), traces);
    }
}
