use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::transport::ResponseMapOverrides;

/// Root configuration container.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Engine-wide response field names; groups layer their own on top.
    #[serde(default)]
    pub response_map: ResponseMapOverrides,
    #[serde(default)]
    pub rest: RestConfig,
}

/// Settings of the HTTP transport.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RestConfig {
    /// Scheme and host (e.g., "https://api.example.com").
    #[serde(default)]
    pub base_url: String,
    /// Path prefix appended to the base URL (e.g., "/api/v1").
    #[serde(default)]
    pub api_url: String,
    /// Whole-request timeout in milliseconds (default: 60000).
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
    /// Rejection message when the timeout fires.
    #[serde(default = "default_timeout_message")]
    pub timeout_message: String,
    /// Extra headers sent with every request.
    #[serde(default)]
    pub headers: BTreeMap<String, String>,
    /// Header carrying the saved token verbatim (e.g., "X-USER-TOKEN").
    /// No token header is sent when unset.
    #[serde(default)]
    pub token_header: Option<String>,
    /// Header carrying the application id (e.g., "X-APPLICATION-ID").
    #[serde(default)]
    pub application_id_header: Option<String>,
    /// Initial application id; replaced by `RestClient::set_application_id`.
    #[serde(default)]
    pub application_id: Option<String>,
}

fn default_timeout_ms() -> u64 {
    60_000
}

fn default_timeout_message() -> String {
    "Request timed out".to_string()
}

impl Default for RestConfig {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            api_url: String::new(),
            timeout_ms: default_timeout_ms(),
            timeout_message: default_timeout_message(),
            headers: BTreeMap::new(),
            token_header: None,
            application_id_header: None,
            application_id: None,
        }
    }
}
