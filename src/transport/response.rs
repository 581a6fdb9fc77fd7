//! Translation of external response fields into the engine's vocabulary.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::path::key_of;

use super::TransportError;

/// Message used when a failed response carries no readable message.
pub const FALLBACK_ERROR_MESSAGE: &str = "Request failed";

/// Field names the engine reads from a raw response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResponseMap {
    /// Field holding the response status.
    pub status: String,
    /// Field holding a human readable error message.
    pub message: String,
    /// Field holding error details; its presence marks a failure.
    pub errors: String,
    /// Field holding the payload.
    pub data: String,
    /// Value of the status field that means success.
    pub success_value: String,
}

impl Default for ResponseMap {
    fn default() -> Self {
        Self {
            status: "status".to_string(),
            message: "message".to_string(),
            errors: "errors".to_string(),
            data: "data".to_string(),
            success_value: "success".to_string(),
        }
    }
}

/// Partial [`ResponseMap`]: every field present here wins over the base.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResponseMapOverrides {
    pub status: Option<String>,
    pub message: Option<String>,
    pub errors: Option<String>,
    pub data: Option<String>,
    pub success_value: Option<String>,
}

impl ResponseMapOverrides {
    /// Stack `over` on top of `self`.
    pub fn layer(&self, over: &ResponseMapOverrides) -> ResponseMapOverrides {
        ResponseMapOverrides {
            status: over.status.clone().or_else(|| self.status.clone()),
            message: over.message.clone().or_else(|| self.message.clone()),
            errors: over.errors.clone().or_else(|| self.errors.clone()),
            data: over.data.clone().or_else(|| self.data.clone()),
            success_value: over
                .success_value
                .clone()
                .or_else(|| self.success_value.clone()),
        }
    }

    pub fn is_empty(&self) -> bool {
        self == &ResponseMapOverrides::default()
    }

    /// Names of overridden fields that are set to an empty string.
    pub fn blank_fields(&self) -> Vec<&'static str> {
        [
            ("status", &self.status),
            ("message", &self.message),
            ("errors", &self.errors),
            ("data", &self.data),
        ]
        .into_iter()
        .filter(|(_, value)| value.as_deref().is_some_and(|v| v.trim().is_empty()))
        .map(|(name, _)| name)
        .collect()
    }
}

impl ResponseMap {
    pub fn with_overrides(&self, overrides: &ResponseMapOverrides) -> ResponseMap {
        ResponseMap {
            status: overrides.status.clone().unwrap_or_else(|| self.status.clone()),
            message: overrides
                .message
                .clone()
                .unwrap_or_else(|| self.message.clone()),
            errors: overrides.errors.clone().unwrap_or_else(|| self.errors.clone()),
            data: overrides.data.clone().unwrap_or_else(|| self.data.clone()),
            success_value: overrides
                .success_value
                .clone()
                .unwrap_or_else(|| self.success_value.clone()),
        }
    }

    /// Error message if `response` reports a failure.
    ///
    /// A response fails when its status field is present and differs from the
    /// success value, or when its errors field is present and non-empty.
    pub fn failure(&self, response: &Value) -> Option<String> {
        let status_failed = response
            .get(&self.status)
            .filter(|status| !status.is_null())
            .is_some_and(|status| key_of(status).as_deref() != Some(self.success_value.as_str()));
        let has_errors = response.get(&self.errors).is_some_and(is_truthy);

        if status_failed || has_errors {
            Some(self.message_of(response))
        } else {
            None
        }
    }

    /// Payload of a successful response.
    ///
    /// Objects yield their data field (`null` when absent); any other value is
    /// already the payload.
    pub fn payload_of(&self, response: &Value) -> Value {
        match response {
            Value::Object(fields) => fields.get(&self.data).cloned().unwrap_or(Value::Null),
            other => other.clone(),
        }
    }

    /// First readable message among the message field, the errors field and
    /// a plain `error` field.
    pub fn message_of(&self, response: &Value) -> String {
        [self.message.as_str(), self.errors.as_str(), "error"]
            .into_iter()
            .filter_map(|field| response.get(field))
            .find(|value| is_truthy(value))
            .map(text_of)
            .unwrap_or_else(|| match response {
                Value::String(text) if !text.is_empty() => text.clone(),
                _ => FALLBACK_ERROR_MESSAGE.to_string(),
            })
    }

    /// Message for an Error envelope built from a rejected transport call.
    pub fn rejection_message(&self, error: &TransportError) -> String {
        match error {
            TransportError::Rejected(body) => self.message_of(body),
            other => other.to_string(),
        }
    }
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Object(fields) => !fields.is_empty(),
    }
}

fn text_of(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}
