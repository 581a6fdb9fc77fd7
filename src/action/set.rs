//! Triggers of one group, addressed by action name.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde_json::Value;

use crate::error::ConfigurationError;
use crate::store::Dispatch;

use super::trigger::{ActionTrigger, Outcome};

/// All triggers built for a group.
#[derive(Debug, Clone, Default)]
pub struct ActionSet {
    triggers: BTreeMap<String, ActionTrigger>,
}

impl ActionSet {
    pub fn get(&self, name: &str) -> Option<&ActionTrigger> {
        self.triggers.get(name)
    }

    /// Registered action names, sorted.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.triggers.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.triggers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.triggers.is_empty()
    }

    /// Pre-bind a dispatcher to every trigger.
    pub fn bind(&self, dispatch: Arc<dyn Dispatch>) -> BoundActions {
        BoundActions {
            actions: self.clone(),
            dispatch,
        }
    }
}

impl FromIterator<ActionTrigger> for ActionSet {
    fn from_iter<I: IntoIterator<Item = ActionTrigger>>(iter: I) -> Self {
        Self {
            triggers: iter
                .into_iter()
                .map(|trigger| (trigger.name().to_string(), trigger))
                .collect(),
        }
    }
}

/// An [`ActionSet`] whose triggers all dispatch into one store.
#[derive(Clone)]
pub struct BoundActions {
    actions: ActionSet,
    dispatch: Arc<dyn Dispatch>,
}

impl BoundActions {
    pub fn actions(&self) -> &ActionSet {
        &self.actions
    }

    /// Invoke the trigger registered under `name`.
    pub async fn invoke(&self, name: &str, args: Vec<Value>) -> Result<Outcome, ConfigurationError> {
        let trigger = self
            .actions
            .get(name)
            .ok_or_else(|| ConfigurationError::UnknownAction {
                name: name.to_string(),
            })?;
        Ok(trigger.invoke(self.dispatch.as_ref(), args).await)
    }
}
