//! Errors surfaced to the integrator while configuring entity groups.

use thiserror::Error;

use crate::config::ConfigError;

/// Misconfiguration detected while building a group or its actions.
///
/// Always raised synchronously, before any action is dispatched.
#[derive(Debug, Error)]
pub enum ConfigurationError {
    /// Configuration file errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Entity group prefix must not be empty")]
    MissingPrefix,

    #[error("Action name must not be empty")]
    EmptyActionName,

    #[error("Operation key must not be empty")]
    EmptyKey,

    /// Two operations of one group compose the same action type
    #[error("Action type '{action_type}' is already registered")]
    DuplicateAction { action_type: String },

    #[error("Invalid id path: {reason}")]
    InvalidIdPath { reason: String },

    /// Lookup of a trigger by a name the group never registered
    #[error("Action '{name}' is not registered")]
    UnknownAction { name: String },

    /// A group file references an endpoint no transport was built for
    #[error("No transport available for '{name}'")]
    UnknownTransport { name: String },
}
