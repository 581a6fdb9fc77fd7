//! HTTP [`Transport`](crate::transport::Transport) backed by reqwest.

mod client;
mod endpoint;

pub use client::{HttpMethod, RestClient};
pub use endpoint::RestTransport;
