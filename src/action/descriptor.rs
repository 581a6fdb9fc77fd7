//! Static description of one operation.

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::path::IdPath;
use crate::store::Dispatch;
use crate::transport::Transport;

use super::trigger::Outcome;
use super::types::{ActionType, OperationKind};

/// Slice key used when an operation does not name one.
pub const DEFAULT_KEY: &str = "data";

/// Behavior switches of an operation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OperationFlags {
    /// Use the whole response as payload instead of its data field.
    pub returns_raw_response: bool,
    /// Store the payload without a status envelope.
    pub suppress_envelope: bool,
    /// Merge the invocation argument instead of the response payload.
    pub is_local_update: bool,
    /// Build the trigger only; no merge function is wired for it.
    pub skip_reducer: bool,
}

pub type PrepareFn = Arc<dyn Fn(Value) -> Value + Send + Sync>;
pub type ExtractFn = Arc<dyn Fn(&Value) -> Value + Send + Sync>;
pub type ResponseHook = Arc<dyn Fn(&Value, &dyn Dispatch) + Send + Sync>;

/// Caller-owned replacement for the whole request flow of an operation.
///
/// When set, the trigger dispatches nothing itself: it hands the dispatcher,
/// the arguments and its action type over and returns what this produces.
#[async_trait]
pub trait AlternativeRequest: Send + Sync {
    async fn request(
        &self,
        dispatch: &dyn Dispatch,
        args: Vec<Value>,
        action_type: &ActionType,
    ) -> Outcome;
}

/// Immutable once registered with a group.
#[derive(Clone)]
pub struct OperationDescriptor {
    pub kind: OperationKind,
    pub key: String,
    pub id_path: IdPath,
    pub name: String,
    pub transport: Option<Arc<dyn Transport>>,
    pub flags: OperationFlags,
    /// Transforms the argument of a local write before dispatch.
    pub prepare: Option<PrepareFn>,
    /// Replaces the response map's data-field lookup.
    pub extract: Option<ExtractFn>,
    /// Called with the raw response after the success or error dispatch.
    pub on_response: Option<ResponseHook>,
    pub alternative: Option<Arc<dyn AlternativeRequest>>,
}

impl OperationDescriptor {
    pub fn new(kind: OperationKind) -> Self {
        Self {
            kind,
            key: DEFAULT_KEY.to_string(),
            id_path: IdPath::empty(),
            name: kind.default_name().to_string(),
            transport: None,
            flags: OperationFlags::default(),
            prepare: None,
            extract: None,
            on_response: None,
            alternative: None,
        }
    }

    pub fn get() -> Self {
        Self::new(OperationKind::Get)
    }

    pub fn add() -> Self {
        Self::new(OperationKind::Add)
    }

    pub fn update() -> Self {
        Self::new(OperationKind::Update)
    }

    pub fn delete() -> Self {
        Self::new(OperationKind::Delete)
    }

    pub fn clear() -> Self {
        Self::new(OperationKind::Clear)
    }

    pub fn key(mut self, key: impl Into<String>) -> Self {
        self.key = key.into();
        self
    }

    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn id_path(mut self, path: impl Into<IdPath>) -> Self {
        self.id_path = path.into();
        self
    }

    pub fn transport(self, transport: impl Transport + 'static) -> Self {
        self.shared_transport(Arc::new(transport))
    }

    pub fn shared_transport(mut self, transport: Arc<dyn Transport>) -> Self {
        self.transport = Some(transport);
        self
    }

    pub fn flags(mut self, flags: OperationFlags) -> Self {
        self.flags = flags;
        self
    }

    pub fn returns_raw_response(mut self) -> Self {
        self.flags.returns_raw_response = true;
        self
    }

    pub fn suppress_envelope(mut self) -> Self {
        self.flags.suppress_envelope = true;
        self
    }

    pub fn local_update(mut self) -> Self {
        self.flags.is_local_update = true;
        self
    }

    pub fn skip_reducer(mut self) -> Self {
        self.flags.skip_reducer = true;
        self
    }

    pub fn prepare(mut self, f: impl Fn(Value) -> Value + Send + Sync + 'static) -> Self {
        self.prepare = Some(Arc::new(f));
        self
    }

    pub fn extract(mut self, f: impl Fn(&Value) -> Value + Send + Sync + 'static) -> Self {
        self.extract = Some(Arc::new(f));
        self
    }

    pub fn on_response(
        mut self,
        f: impl Fn(&Value, &dyn Dispatch) + Send + Sync + 'static,
    ) -> Self {
        self.on_response = Some(Arc::new(f));
        self
    }

    pub fn alternative(mut self, request: impl AlternativeRequest + 'static) -> Self {
        self.alternative = Some(Arc::new(request));
        self
    }

    /// Whether a `get` replaces the slice instead of unioning map entries.
    pub fn replaces_on_get(&self) -> bool {
        self.flags.suppress_envelope || self.flags.returns_raw_response
    }

    pub fn is_local(&self) -> bool {
        self.transport.is_none()
    }
}

impl fmt::Debug for OperationDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OperationDescriptor")
            .field("kind", &self.kind)
            .field("key", &self.key)
            .field("id_path", &self.id_path)
            .field("name", &self.name)
            .field("transport", &self.transport.is_some())
            .field("flags", &self.flags)
            .field("alternative", &self.alternative.is_some())
            .finish_non_exhaustive()
    }
}
