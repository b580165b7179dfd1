//! Effect descriptions exchanged between trace producers and the runtime that interprets them.
//!
//! An [`Effect`] names a procedure ([`EffectKind`]) plus its positional arguments
//! ([`EffectIntent`]) without running anything. Whoever executes it answers with an
//! [`EffectReceipt`].

pub mod cbor;

mod effect;
mod intent;
mod kinds;
mod receipt;

pub use cbor::{Hash, to_canonical_cbor};
pub use effect::Effect;
pub use intent::{EffectIntent, IdempotencyKey, IntentBuilder, IntentEncodeError, idempotency_key};
pub use kinds::EffectKind;
pub use receipt::{EffectReceipt, ReceiptDecodeError, ReceiptFailure, ReceiptStatus};
