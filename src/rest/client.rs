use std::sync::Arc;
use std::time::Duration;

use parking_lot::RwLock;
use reqwest::{Client, Url};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tokio::time::timeout;

use crate::config::RestConfig;
use crate::path::key_of;
use crate::transport::TransportError;

use super::endpoint::RestTransport;

/// Request method of an endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    #[default]
    Get,
    Post,
    Put,
    Delete,
}

impl From<HttpMethod> for reqwest::Method {
    fn from(method: HttpMethod) -> Self {
        match method {
            HttpMethod::Get => reqwest::Method::GET,
            HttpMethod::Post => reqwest::Method::POST,
            HttpMethod::Put => reqwest::Method::PUT,
            HttpMethod::Delete => reqwest::Method::DELETE,
        }
    }
}

#[derive(Debug, Default)]
struct Session {
    token: Option<String>,
    application_id: Option<String>,
}

/// JSON over HTTP client shared by every endpoint of a configuration.
///
/// Clones share the connection pool and the session (token and application
/// id), so a token saved after login applies to every endpoint.
#[derive(Debug, Clone)]
pub struct RestClient {
    client: Client,
    config: Arc<RestConfig>,
    session: Arc<RwLock<Session>>,
}

impl RestClient {
    pub fn new(config: RestConfig) -> Result<Self, TransportError> {
        let client = Client::builder()
            .build()
            .map_err(|e| TransportError::Http(format!("Failed to build HTTP client: {}", e)))?;
        let session = Session {
            token: None,
            application_id: config.application_id.clone(),
        };

        Ok(Self {
            client,
            config: Arc::new(config),
            session: Arc::new(RwLock::new(session)),
        })
    }

    pub fn config(&self) -> &RestConfig {
        &self.config
    }

    pub fn save_token(&self, token: impl Into<String>) {
        self.session.write().token = Some(token.into());
    }

    pub fn clear_token(&self) {
        self.session.write().token = None;
    }

    pub fn set_application_id(&self, id: impl Into<String>) {
        self.session.write().application_id = Some(id.into());
    }

    /// Full URL of `path`: base URL, then API prefix, then path.
    pub fn url(&self, path: &str) -> String {
        format!("{}{}{}", self.config.base_url, self.config.api_url, path)
    }

    /// Transport calling `path` with `method`.
    pub fn endpoint(&self, method: HttpMethod, path: impl Into<String>) -> RestTransport {
        RestTransport::new(self.clone(), method, path)
    }

    pub async fn get(&self, path: &str, params: Option<&Value>) -> Result<Value, TransportError> {
        self.request(HttpMethod::Get, path, params).await
    }

    pub async fn post(&self, path: &str, body: &Value) -> Result<Value, TransportError> {
        self.request(HttpMethod::Post, path, Some(body)).await
    }

    pub async fn put(&self, path: &str, body: &Value) -> Result<Value, TransportError> {
        self.request(HttpMethod::Put, path, Some(body)).await
    }

    pub async fn delete(&self, path: &str, body: Option<&Value>) -> Result<Value, TransportError> {
        self.request(HttpMethod::Delete, path, body).await
    }

    /// Perform one request, racing the configured timeout.
    ///
    /// GET sends an object argument as query parameters; every other method
    /// sends the argument as a JSON body.
    pub async fn request(
        &self,
        method: HttpMethod,
        path: &str,
        data: Option<&Value>,
    ) -> Result<Value, TransportError> {
        let limit = Duration::from_millis(self.config.timeout_ms);

        match timeout(limit, self.do_request(method, path, data)).await {
            Ok(result) => result,
            Err(_) => {
                tracing::warn!(?method, path, timeout_ms = self.config.timeout_ms, "request timed out");
                Err(TransportError::Timeout {
                    message: self.config.timeout_message.clone(),
                })
            }
        }
    }

    async fn do_request(
        &self,
        method: HttpMethod,
        path: &str,
        data: Option<&Value>,
    ) -> Result<Value, TransportError> {
        let mut url = Url::parse(&self.url(path))
            .map_err(|e| TransportError::Http(format!("Invalid URL '{}': {}", self.url(path), e)))?;
        if let (HttpMethod::Get, Some(Value::Object(params))) = (method, data) {
            append_query(&mut url, params);
        }

        let mut builder = self
            .client
            .request(method.into(), url)
            .header("Accept", "application/json")
            .header("Content-Type", "application/json");
        for (name, value) in &self.config.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        for (name, value) in self.session_headers() {
            builder = builder.header(name.as_str(), value);
        }
        if method != HttpMethod::Get {
            if let Some(body) = data {
                builder = builder.json(body);
            }
        }

        tracing::debug!(?method, path, "sending request");
        let response = builder
            .send()
            .await
            .map_err(|e| TransportError::Http(e.to_string()))?;

        let status = response.status();
        let bytes = response
            .bytes()
            .await
            .map_err(|e| TransportError::Http(format!("Failed to read response body: {}", e)))?;
        let body = if bytes.is_empty() {
            Ok(Value::Null)
        } else {
            serde_json::from_slice::<Value>(&bytes)
        };

        if status.is_success() {
            return body.map_err(|e| TransportError::Decode(e.to_string()));
        }
        match body {
            Ok(body) if !body.is_null() => Err(TransportError::Rejected(body)),
            _ => Err(TransportError::Http(format!("Upstream returned {}", status))),
        }
    }

    /// Token and application id under their configured header names.
    fn session_headers(&self) -> Vec<(String, String)> {
        let session = self.session.read();
        let mut headers = Vec::new();
        let application_id = (&self.config.application_id_header, &session.application_id);
        if let (Some(name), Some(id)) = application_id {
            headers.push((name.clone(), id.clone()));
        }
        if let (Some(name), Some(token)) = (&self.config.token_header, &session.token) {
            headers.push((name.clone(), token.clone()));
        }
        headers
    }
}

/// Arrays become repeated `name[]` pairs; nulls are skipped.
fn append_query(url: &mut Url, params: &Map<String, Value>) {
    if params.is_empty() {
        return;
    }
    let mut pairs = url.query_pairs_mut();
    for (name, value) in params {
        match value {
            Value::Array(items) => {
                let name = format!("{}[]", name);
                for item in items {
                    pairs.append_pair(&name, &query_text(item));
                }
            }
            Value::Null => {}
            other => {
                pairs.append_pair(name, &query_text(other));
            }
        }
    }
}

fn query_text(value: &Value) -> String {
    key_of(value).unwrap_or_else(|| value.to_string())
}
