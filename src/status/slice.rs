//! A single slice of group state, with or without a status envelope.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::envelope::{Envelope, Status};

/// One slice of the top-level state, also used as an action payload.
///
/// Slices are replaced, never mutated in place: every merge function takes
/// `&Slice` and returns a new one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Slice {
    /// `{status, error, payload}`.
    Enveloped(Envelope),
    /// The payload alone, for slices configured without a status envelope.
    Bare(Value),
}

impl Default for Slice {
    fn default() -> Self {
        Slice::Bare(Value::Null)
    }
}

impl Slice {
    /// Wrap `payload` the way this slice is wrapped, with a fresh success status.
    pub fn rewrap(&self, payload: Value) -> Slice {
        match self {
            Slice::Enveloped(_) => Slice::Enveloped(Envelope::success(payload)),
            Slice::Bare(_) => Slice::Bare(payload),
        }
    }

    /// The payload, whether or not it is enveloped.
    pub fn payload(&self) -> &Value {
        match self {
            Slice::Enveloped(envelope) => &envelope.payload,
            Slice::Bare(value) => value,
        }
    }

    pub fn into_payload(self) -> Value {
        match self {
            Slice::Enveloped(envelope) => envelope.payload,
            Slice::Bare(value) => value,
        }
    }

    /// Envelope status. Bare slices report `None`.
    pub fn status(&self) -> Option<Status> {
        match self {
            Slice::Enveloped(envelope) => Some(envelope.status),
            Slice::Bare(_) => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            Slice::Enveloped(envelope) => envelope.error.as_deref(),
            Slice::Bare(_) => None,
        }
    }

    pub fn is_enveloped(&self) -> bool {
        matches!(self, Slice::Enveloped(_))
    }

    pub fn as_envelope(&self) -> Option<&Envelope> {
        match self {
            Slice::Enveloped(envelope) => Some(envelope),
            Slice::Bare(_) => None,
        }
    }
}
