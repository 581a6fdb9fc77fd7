//! Declarative entity state engine.
//!
//! An [`EntityGroup`] turns a prefix, a default shape and a set of
//! [`OperationDescriptor`]s into dispatchable triggers and a pure reducer
//! that folds their results into normalized state slices.

pub mod action;
pub mod config;
pub mod error;
pub mod group;
pub mod logging;
pub mod merge;
pub mod path;
pub mod rest;
pub mod status;
pub mod store;
pub mod transport;

pub use action::{
    Action, ActionSet, ActionTrigger, ActionType, AlternativeRequest, BoundActions,
    OperationDescriptor, OperationKind, Outcome, WireAction,
};
pub use config::{EngineConfig, GroupFile};
pub use error::ConfigurationError;
pub use group::{EntityGroup, GroupReducer, GroupSettings, GroupState};
pub use path::IdPath;
pub use status::{combine, needs_indicator, Envelope, Slice, Status};
pub use store::{Dispatch, Reducer, Store};
pub use transport::{transport_fn, ResponseMap, ResponseMapOverrides, Transport, TransportError};
