use serde::{Deserialize, Serialize, de::DeserializeOwned};
use thiserror::Error;

use crate::{EffectKind, Hash, to_canonical_cbor};

pub type IdempotencyKey = [u8; 32];

/// Derive an idempotency key from a step counter; the counter occupies the trailing eight bytes.
pub fn idempotency_key(step: u64) -> IdempotencyKey {
    let mut key = [0u8; 32];
    key[24..].copy_from_slice(&step.to_be_bytes());
    key
}

/// A request to invoke the procedure named by `kind` with positional arguments.
///
/// Arguments are stored as a canonical CBOR array so intents can be hashed, logged
/// and replayed without knowing the procedure's argument types.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct EffectIntent {
    pub kind: EffectKind,
    #[serde(with = "serde_bytes")]
    pub params_cbor: Vec<u8>,
    pub idempotency_key: IdempotencyKey,
    pub intent_hash: [u8; 32],
}

impl EffectIntent {
    /// Decode the positional arguments, typically into a tuple.
    pub fn params<T: DeserializeOwned>(&self) -> Result<T, serde_cbor::Error> {
        serde_cbor::from_slice(&self.params_cbor)
    }

    pub fn hash(&self) -> Hash {
        Hash::from(self.intent_hash)
    }

    pub fn from_raw_params(
        kind: EffectKind,
        params_cbor: Vec<u8>,
        idempotency_key: IdempotencyKey,
    ) -> Result<Self, IntentEncodeError> {
        let hash = compute_intent_hash(kind.as_str(), &params_cbor, &idempotency_key)?;
        Ok(Self {
            kind,
            params_cbor,
            idempotency_key,
            intent_hash: hash,
        })
    }
}

pub struct IntentBuilder<'a, P> {
    kind: EffectKind,
    params: &'a P,
    idempotency_key: IdempotencyKey,
}

impl<'a, P> IntentBuilder<'a, P> {
    pub fn new(kind: impl Into<EffectKind>, params: &'a P) -> Self {
        Self {
            kind: kind.into(),
            params,
            idempotency_key: [0u8; 32],
        }
    }

    pub fn idempotency_key(mut self, key: IdempotencyKey) -> Self {
        self.idempotency_key = key;
        self
    }

    pub fn build(self) -> Result<EffectIntent, IntentEncodeError>
    where
        P: Serialize,
    {
        let params_cbor = to_canonical_cbor(self.params)?;
        EffectIntent::from_raw_params(self.kind, params_cbor, self.idempotency_key)
    }
}

fn compute_intent_hash(
    kind: &str,
    params_cbor: &[u8],
    idempotency_key: &IdempotencyKey,
) -> Result<[u8; 32], serde_cbor::Error> {
    #[derive(Serialize)]
    struct Envelope<'a> {
        kind: &'a str,
        #[serde(with = "serde_bytes")]
        params: &'a [u8],
        #[serde(with = "serde_bytes")]
        idempotency_key: &'a [u8; 32],
    }

    let bytes = to_canonical_cbor(&Envelope {
        kind,
        params: params_cbor,
        idempotency_key,
    })?;
    Ok(Hash::of_bytes(&bytes).into())
}

#[derive(Debug, Error)]
pub enum IntentEncodeError {
    #[error("failed to encode intent params: {0}")]
    Params(#[from] serde_cbor::Error),
}
