//! Entity groups: a prefix, a default shape and the operations on it.
//!
//! ```text
//! EntityGroup ──build_actions()──→ ActionSet ──dispatch──┐
//!      │                                                 ▼
//!      └──────build_reducer()──→ GroupReducer ──→ GroupState
//! ```

mod reducer;
mod state;

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::action::{ActionSet, ActionTrigger, ActionType, OperationDescriptor};
use crate::config::{ConfigError, EngineConfig};
use crate::error::ConfigurationError;
use crate::status::{Envelope, Slice};
use crate::transport::{ResponseMap, ResponseMapOverrides};

pub use reducer::GroupReducer;
pub use state::GroupState;

/// Construction parameters of an [`EntityGroup`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GroupSettings {
    /// Suffix of every action type in the group.
    pub prefix: String,
    /// Initial payload per slice key.
    #[serde(default)]
    pub default_state: Map<String, Value>,
    #[serde(default)]
    pub response_map: ResponseMapOverrides,
}

impl GroupSettings {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            ..Default::default()
        }
    }

    pub fn default_value(mut self, key: impl Into<String>, value: Value) -> Self {
        self.default_state.insert(key.into(), value);
        self
    }

    pub fn response_map(mut self, overrides: ResponseMapOverrides) -> Self {
        self.response_map = overrides;
        self
    }
}

/// Operations sharing one prefix and one family of state slices.
///
/// Descriptors are validated on registration; the reducer and the triggers
/// are built from the registered set.
#[derive(Debug, Clone)]
pub struct EntityGroup {
    prefix: String,
    default_state: Map<String, Value>,
    response_map: ResponseMap,
    operations: Vec<Arc<OperationDescriptor>>,
}

impl EntityGroup {
    pub fn new(settings: GroupSettings) -> Result<Self, ConfigurationError> {
        Self::with_config(settings, &EngineConfig::default())
    }

    /// Build a group whose response map layers its own overrides on top of
    /// the engine-wide ones.
    pub fn with_config(
        settings: GroupSettings,
        config: &EngineConfig,
    ) -> Result<Self, ConfigurationError> {
        let prefix = settings.prefix.trim();
        if prefix.is_empty() {
            return Err(ConfigurationError::MissingPrefix);
        }

        let overrides = config.response_map.layer(&settings.response_map);
        if let Some(field) = overrides.blank_fields().first() {
            return Err(ConfigError::ValidationError {
                message: format!("response map field '{}' must not be empty", field),
            }
            .into());
        }

        Ok(Self {
            prefix: prefix.to_string(),
            default_state: settings.default_state,
            response_map: ResponseMap::default().with_overrides(&overrides),
            operations: Vec::new(),
        })
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn response_map(&self) -> &ResponseMap {
        &self.response_map
    }

    pub fn operations(&self) -> impl Iterator<Item = &OperationDescriptor> {
        self.operations.iter().map(Arc::as_ref)
    }

    /// Validate and add an operation, returning its trigger.
    pub fn register(
        &mut self,
        descriptor: OperationDescriptor,
    ) -> Result<ActionTrigger, ConfigurationError> {
        if descriptor.name.trim().is_empty() {
            return Err(ConfigurationError::EmptyActionName);
        }
        if descriptor.key.trim().is_empty() {
            return Err(ConfigurationError::EmptyKey);
        }
        if descriptor.id_path.segments().iter().any(|s| s.is_empty()) {
            return Err(ConfigurationError::InvalidIdPath {
                reason: format!("'{}' has an empty segment", descriptor.id_path),
            });
        }
        if self.operations.iter().any(|op| op.name == descriptor.name) {
            return Err(ConfigurationError::DuplicateAction {
                action_type: self.action_type(&descriptor).to_string(),
            });
        }

        tracing::debug!(
            prefix = %self.prefix,
            action = %self.action_type(&descriptor),
            kind = %descriptor.kind,
            key = %descriptor.key,
            "registered operation"
        );
        let descriptor = Arc::new(descriptor);
        self.operations.push(Arc::clone(&descriptor));
        Ok(self.trigger(descriptor))
    }

    /// Chaining form of [`register`](Self::register).
    pub fn with(mut self, descriptor: OperationDescriptor) -> Result<Self, ConfigurationError> {
        self.register(descriptor)?;
        Ok(self)
    }

    /// Reducer wiring every operation not flagged `skip_reducer`.
    pub fn build_reducer(&self) -> GroupReducer {
        let handlers: HashMap<ActionType, Arc<OperationDescriptor>> = self
            .operations
            .iter()
            .filter(|op| !op.flags.skip_reducer)
            .map(|op| (self.action_type(op), Arc::clone(op)))
            .collect();
        let bare_keys: HashSet<String> = self
            .slice_keys()
            .into_iter()
            .filter(|key| self.is_bare(key))
            .collect();
        GroupReducer::new(handlers, bare_keys)
    }

    pub fn build_actions(&self) -> ActionSet {
        self.operations
            .iter()
            .map(|op| self.trigger(Arc::clone(op)))
            .collect()
    }

    /// Initial state: every default value, plus a slice for each registered
    /// key the defaults do not mention.
    pub fn default_state(&self) -> GroupState {
        let mut keys: Vec<String> = self.default_state.keys().cloned().collect();
        for key in self.slice_keys() {
            if !self.default_state.contains_key(&key) {
                keys.push(key);
            }
        }

        keys.into_iter()
            .map(|key| {
                let value = self.default_for(&key);
                let slice = if self.is_bare(&key) {
                    Slice::Bare(value)
                } else {
                    Slice::Enveloped(Envelope::success(value))
                };
                (key, slice)
            })
            .collect()
    }

    fn trigger(&self, descriptor: Arc<OperationDescriptor>) -> ActionTrigger {
        let clear_default = self.default_for(&descriptor.key);
        ActionTrigger::new(descriptor, &self.prefix, self.response_map.clone(), clear_default)
    }

    fn action_type(&self, descriptor: &OperationDescriptor) -> ActionType {
        ActionType::new(descriptor.kind, descriptor.name.clone(), self.prefix.clone())
    }

    fn default_for(&self, key: &str) -> Value {
        self.default_state.get(key).cloned().unwrap_or(Value::Null)
    }

    /// Distinct operation keys in registration order.
    fn slice_keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = Vec::new();
        for op in &self.operations {
            if !keys.contains(&op.key) {
                keys.push(op.key.clone());
            }
        }
        keys
    }

    /// A slice is bare when the first operation registered for its key
    /// suppresses the envelope.
    fn is_bare(&self, key: &str) -> bool {
        self.operations
            .iter()
            .find(|op| op.key == key)
            .is_some_and(|op| op.flags.suppress_envelope)
    }
}
