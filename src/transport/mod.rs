//! The asynchronous data source behind an operation.
//!
//! The engine never performs requests itself. It calls a [`Transport`] with
//! the invocation arguments and only inspects the shape of what comes back,
//! through the group's [`ResponseMap`].

mod response;

use std::future::Future;

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

pub use response::{ResponseMap, ResponseMapOverrides, FALLBACK_ERROR_MESSAGE};

/// Errors a transport can reject with.
#[derive(Debug, Clone, Error)]
pub enum TransportError {
    /// The remote side answered with an error body.
    #[error("Request rejected: {0}")]
    Rejected(Value),

    /// The request did not complete in time.
    #[error("{message}")]
    Timeout { message: String },

    /// The request could not be sent or the connection failed.
    #[error("HTTP error: {0}")]
    Http(String),

    /// The response body could not be decoded.
    #[error("Failed to decode response: {0}")]
    Decode(String),
}

/// Single-shot asynchronous call to an external data source.
///
/// Each call resolves or rejects exactly once. The engine neither retries nor
/// cancels; a caller wanting a deadline rejects early and the rejection is
/// handled like any other failure.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Perform the call with the trigger's invocation arguments.
    async fn call(&self, args: Vec<Value>) -> Result<Value, TransportError>;
}

/// [`Transport`] backed by an async closure.
pub struct FnTransport<F>(F);

/// Wrap an async closure as a [`Transport`].
pub fn transport_fn<F, Fut>(f: F) -> FnTransport<F>
where
    F: Fn(Vec<Value>) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<Value, TransportError>> + Send + 'static,
{
    FnTransport(f)
}

#[async_trait]
impl<F, Fut> Transport for FnTransport<F>
where
    F: Fn(Vec<Value>) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<Value, TransportError>> + Send + 'static,
{
    async fn call(&self, args: Vec<Value>) -> Result<Value, TransportError> {
        (self.0)(args).await
    }
}
