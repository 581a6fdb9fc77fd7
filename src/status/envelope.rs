//! Asynchronous lifecycle tag and the envelope that carries it.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Lifecycle of an asynchronous operation.
///
/// Serialized as its integer code, matching the action wire format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub enum Status {
    /// The transport failed or reported a non-success status.
    Error,
    /// A request is in flight.
    Pending,
    /// The last request completed, or no request has been made yet.
    #[default]
    Success,
}

impl Status {
    /// Integer code used on the wire.
    pub fn code(self) -> u8 {
        match self {
            Status::Error => 0,
            Status::Pending => 1,
            Status::Success => 2,
        }
    }

    pub fn is_pending(self) -> bool {
        matches!(self, Status::Pending)
    }

    pub fn is_error(self) -> bool {
        matches!(self, Status::Error)
    }
}

impl From<Status> for u8 {
    fn from(status: Status) -> Self {
        status.code()
    }
}

impl TryFrom<u8> for Status {
    type Error = String;

    fn try_from(code: u8) -> Result<Self, String> {
        match code {
            0 => Ok(Status::Error),
            1 => Ok(Status::Pending),
            2 => Ok(Status::Success),
            other => Err(format!("unknown status code {}", other)),
        }
    }
}

/// `{status, error, payload}` wrapper.
///
/// Pending and error envelopes travel without a payload; on the wire the
/// field is omitted when it is `null`. Any other field makes an object a
/// bare value, so records with their own `status` survive a round trip.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Envelope {
    pub status: Status,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Value::is_null")]
    pub payload: Value,
}

impl Envelope {
    pub fn pending() -> Self {
        Self {
            status: Status::Pending,
            error: None,
            payload: Value::Null,
        }
    }

    pub fn success(payload: Value) -> Self {
        Self {
            status: Status::Success,
            error: None,
            payload,
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            status: Status::Error,
            error: Some(message.into()),
            payload: Value::Null,
        }
    }

    /// Keep this envelope's payload but adopt the status and error of `other`.
    pub fn with_status_of(&self, other: &Envelope) -> Self {
        Self {
            status: other.status,
            error: other.error.clone(),
            payload: self.payload.clone(),
        }
    }
}

/// Aggregate several in-flight slices into one indicator.
///
/// `Pending` if any input is pending, `Success` otherwise (including for an
/// empty input).
pub fn combine(statuses: &[Status]) -> Status {
    if statuses.iter().any(|s| s.is_pending()) {
        Status::Pending
    } else {
        Status::Success
    }
}

/// Whether a UI should show a busy indicator for this status.
pub fn needs_indicator(status: Status) -> bool {
    status.is_pending()
}
