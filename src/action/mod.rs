//! Operation descriptors and the triggers synthesized from them.
//!
//! A descriptor says what an operation does; its [`ActionTrigger`] performs
//! it, turning one invocation into the action sequence the reducer folds:
//!
//! ```text
//! invoke ──→ Pending ──→ transport ──┬──→ Success(payload)
//!                                    └──→ Error(message)
//! ```

mod descriptor;
mod set;
mod trigger;
mod types;

pub use descriptor::{
    AlternativeRequest, ExtractFn, OperationDescriptor, OperationFlags, PrepareFn, ResponseHook,
    DEFAULT_KEY,
};
pub use set::{ActionSet, BoundActions};
pub use trigger::{ActionTrigger, Outcome};
pub use types::{Action, ActionType, OperationKind, WireAction};
