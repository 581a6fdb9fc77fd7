//! Operation kinds, action types and the dispatched action itself.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::status::{Slice, Status};

/// Kind of state transition an operation performs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OperationKind {
    /// Read: replace or union the slice with the response.
    Get,
    /// Create: insert a record.
    #[serde(alias = "create")]
    Add,
    /// Merge fields into an existing record.
    Update,
    /// Remove a record.
    Delete,
    /// Reset the slice.
    Clear,
}

impl OperationKind {
    /// Action name used when an operation is registered without one.
    pub fn default_name(self) -> &'static str {
        match self {
            OperationKind::Get => "GET",
            OperationKind::Add => "CREATE",
            OperationKind::Update => "UPDATE",
            OperationKind::Delete => "DELETE",
            OperationKind::Clear => "CLEAR",
        }
    }
}

impl fmt::Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            OperationKind::Get => "get",
            OperationKind::Add => "add",
            OperationKind::Update => "update",
            OperationKind::Delete => "delete",
            OperationKind::Clear => "clear",
        };
        f.write_str(name)
    }
}

/// Structured action type.
///
/// The wire string `<name>_<prefix>` is only composed at the serialization
/// boundary, through `Display`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ActionType {
    pub kind: OperationKind,
    pub name: String,
    pub prefix: String,
}

impl ActionType {
    pub fn new(kind: OperationKind, name: impl Into<String>, prefix: impl Into<String>) -> Self {
        Self {
            kind,
            name: name.into(),
            prefix: prefix.into(),
        }
    }

    /// `<NAME>_<PREFIX>`, the `type` of the wire form.
    pub fn wire_name(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for ActionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_{}", self.name, self.prefix)
    }
}

/// An action delivered to the hosting store.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(into = "WireAction")]
pub struct Action {
    pub action_type: ActionType,
    pub payload: Slice,
}

impl Action {
    pub fn new(action_type: ActionType, payload: Slice) -> Self {
        Self {
            action_type,
            payload,
        }
    }

    /// Envelope status carried by the payload, if any.
    pub fn status(&self) -> Option<Status> {
        self.payload.status()
    }

    pub fn to_wire(&self) -> WireAction {
        WireAction::from(self.clone())
    }
}

/// `{ "type": "<NAME>_<PREFIX>", "payload": ... }` as it crosses the store
/// boundary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WireAction {
    #[serde(rename = "type")]
    pub action_type: String,
    pub payload: Slice,
}

impl From<Action> for WireAction {
    fn from(action: Action) -> Self {
        Self {
            action_type: action.action_type.wire_name(),
            payload: action.payload,
        }
    }
}
