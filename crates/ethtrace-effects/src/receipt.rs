use serde::{Deserialize, Serialize, de::DeserializeOwned};
use thiserror::Error;

use crate::{EffectIntent, to_canonical_cbor};

/// Runtime receipt referencing the intent hash it answers.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct EffectReceipt {
    pub intent_hash: [u8; 32],
    pub adapter_id: String,
    pub status: ReceiptStatus,
    /// Procedure result on `Ok`, a [`ReceiptFailure`] otherwise.
    #[serde(with = "serde_bytes")]
    pub payload_cbor: Vec<u8>,
}

impl EffectReceipt {
    pub fn ok<T: Serialize>(
        intent: &EffectIntent,
        adapter_id: impl Into<String>,
        payload: &T,
    ) -> Result<Self, serde_cbor::Error> {
        Ok(Self {
            intent_hash: intent.intent_hash,
            adapter_id: adapter_id.into(),
            status: ReceiptStatus::Ok,
            payload_cbor: to_canonical_cbor(payload)?,
        })
    }

    pub fn failure(
        intent: &EffectIntent,
        adapter_id: impl Into<String>,
        status: ReceiptStatus,
        message: impl Into<String>,
    ) -> Self {
        let failure = ReceiptFailure {
            message: message.into(),
        };
        Self {
            intent_hash: intent.intent_hash,
            adapter_id: adapter_id.into(),
            status,
            // A single text field always encodes.
            payload_cbor: to_canonical_cbor(&failure).unwrap_or_default(),
        }
    }

    pub fn is_ok(&self) -> bool {
        self.status == ReceiptStatus::Ok
    }

    pub fn payload<T: DeserializeOwned>(&self) -> Result<T, ReceiptDecodeError> {
        serde_cbor::from_slice(&self.payload_cbor).map_err(ReceiptDecodeError::Payload)
    }

    /// Failure message for non-`Ok` receipts.
    pub fn failure_message(&self) -> Option<String> {
        if self.is_ok() {
            return None;
        }
        match serde_cbor::from_slice::<ReceiptFailure>(&self.payload_cbor) {
            Ok(failure) => Some(failure.message),
            Err(_) => Some(format!("{:?} receipt from {}", self.status, self.adapter_id)),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ReceiptStatus {
    Ok,
    Error,
    Timeout,
}

/// Error captured by the runtime when a procedure fails or times out.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ReceiptFailure {
    pub message: String,
}

#[derive(Debug, Error)]
pub enum ReceiptDecodeError {
    #[error("failed to decode receipt payload: {0}")]
    Payload(#[from] serde_cbor::Error),
}
