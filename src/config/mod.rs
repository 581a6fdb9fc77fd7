//! Engine configuration and declarative group files.

mod group_file;
mod loader;
mod types;

pub use group_file::{EndpointEntry, GroupFile, OperationEntry};
pub use loader::ConfigError;
pub use types::{EngineConfig, RestConfig};
