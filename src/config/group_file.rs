//! Declarative entity group definitions.
//!
//! ```toml
//! prefix = "USERS"
//!
//! [default_state]
//! list = {}
//!
//! [endpoints.users]
//! method = "GET"
//! path = "/users"
//!
//! [[operations]]
//! kind = "get"
//! key = "list"
//! name = "LIST"
//! id_path = ["id"]
//! endpoint = "users"
//! ```

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::action::{OperationDescriptor, OperationFlags, OperationKind};
use crate::config::loader::{read_toml, ConfigError};
use crate::config::types::EngineConfig;
use crate::error::ConfigurationError;
use crate::group::{EntityGroup, GroupSettings};
use crate::path::IdPath;
use crate::rest::{HttpMethod, RestClient};
use crate::transport::ResponseMapOverrides;

/// An entity group as written in a TOML file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GroupFile {
    pub prefix: String,
    #[serde(default)]
    pub default_state: Map<String, Value>,
    #[serde(default)]
    pub response_map: ResponseMapOverrides,
    /// Named HTTP endpoints operations can refer to.
    #[serde(default)]
    pub endpoints: BTreeMap<String, EndpointEntry>,
    #[serde(default)]
    pub operations: Vec<OperationEntry>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EndpointEntry {
    #[serde(default)]
    pub method: HttpMethod,
    pub path: String,
}

/// One `[[operations]]` entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OperationEntry {
    pub kind: OperationKind,
    #[serde(default)]
    pub key: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub id_path: IdPath,
    /// Name of an entry in the file's `endpoints` table.
    #[serde(default)]
    pub endpoint: Option<String>,
    #[serde(flatten)]
    pub flags: OperationFlags,
}

impl OperationEntry {
    pub fn descriptor(&self) -> OperationDescriptor {
        let mut descriptor = OperationDescriptor::new(self.kind)
            .id_path(self.id_path.clone())
            .flags(self.flags);
        if let Some(key) = &self.key {
            descriptor = descriptor.key(key.clone());
        }
        if let Some(name) = &self.name {
            descriptor = descriptor.named(name.clone());
        }
        descriptor
    }
}

impl GroupFile {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        read_toml(path)
    }

    pub fn settings(&self) -> GroupSettings {
        GroupSettings {
            prefix: self.prefix.clone(),
            default_state: self.default_state.clone(),
            response_map: self.response_map.clone(),
        }
    }

    /// Build the group, attaching a transport per endpoint when a client is
    /// given.
    ///
    /// Without a client the operations are registered transport-less, which
    /// is enough for reducing recorded actions. Endpoint names are checked
    /// either way.
    pub fn build(
        &self,
        config: &EngineConfig,
        client: Option<&RestClient>,
    ) -> Result<EntityGroup, ConfigurationError> {
        let mut group = EntityGroup::with_config(self.settings(), config)?;

        for entry in &self.operations {
            let mut descriptor = entry.descriptor();
            if let Some(name) = &entry.endpoint {
                let endpoint = self
                    .endpoints
                    .get(name)
                    .ok_or_else(|| ConfigurationError::UnknownTransport { name: name.clone() })?;
                if let Some(client) = client {
                    descriptor =
                        descriptor.transport(client.endpoint(endpoint.method, endpoint.path.clone()));
                }
            }
            group.register(descriptor)?;
        }

        Ok(group)
    }
}
