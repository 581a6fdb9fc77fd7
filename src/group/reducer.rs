//! Reducer routing actions to the merge function of their operation.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use serde_json::Value;

use crate::action::{Action, ActionType, OperationDescriptor, WireAction};
use crate::merge;
use crate::status::{Envelope, Slice};
use crate::store::Reducer;

use super::state::GroupState;

/// Built by [`EntityGroup::build_reducer`](super::EntityGroup::build_reducer).
///
/// Actions whose type no operation registered pass through unchanged.
#[derive(Debug, Clone)]
pub struct GroupReducer {
    handlers: HashMap<ActionType, Arc<OperationDescriptor>>,
    wire_types: HashMap<String, ActionType>,
    bare_keys: HashSet<String>,
}

impl GroupReducer {
    pub(crate) fn new(
        handlers: HashMap<ActionType, Arc<OperationDescriptor>>,
        bare_keys: HashSet<String>,
    ) -> Self {
        let wire_types = handlers
            .keys()
            .map(|action_type| (action_type.to_string(), action_type.clone()))
            .collect();
        Self {
            handlers,
            wire_types,
            bare_keys,
        }
    }

    pub fn handles(&self, action_type: &ActionType) -> bool {
        self.handlers.contains_key(action_type)
    }

    /// Fold `action` into the slice its operation owns.
    pub fn apply(&self, state: &GroupState, action: &Action) -> GroupState {
        let Some(op) = self.handlers.get(&action.action_type) else {
            tracing::trace!(action = %action.action_type, "no handler");
            return state.clone();
        };

        let current = state
            .get(&op.key)
            .cloned()
            .unwrap_or_else(|| self.empty_slice(&op.key));
        let next = merge::apply(op, &current, &action.payload);

        let mut state = state.clone();
        state.insert(op.key.clone(), next);
        state
    }

    /// Match a wire action's type string against the registered operations.
    pub fn resolve(&self, wire: &WireAction) -> Option<Action> {
        self.wire_types
            .get(&wire.action_type)
            .map(|action_type| Action::new(action_type.clone(), wire.payload.clone()))
    }

    /// [`apply`](Self::apply) for an action parsed from the wire format.
    pub fn reduce_wire(&self, state: &GroupState, wire: &WireAction) -> GroupState {
        match self.resolve(wire) {
            Some(action) => self.apply(state, &action),
            None => {
                tracing::debug!(action = %wire.action_type, "unknown wire action ignored");
                state.clone()
            }
        }
    }

    fn empty_slice(&self, key: &str) -> Slice {
        if self.bare_keys.contains(key) {
            Slice::default()
        } else {
            Slice::Enveloped(Envelope::success(Value::Null))
        }
    }
}

impl Reducer for GroupReducer {
    type State = GroupState;
    type Action = Action;

    fn reduce(&self, state: &GroupState, action: &Action) -> GroupState {
        self.apply(state, action)
    }
}
