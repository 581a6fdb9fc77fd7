//! Pure merge functions folding operation results into a state slice.
//!
//! Every function has the shape `(slice, incoming, descriptor) -> slice`:
//!
//! 1. Clone the slice payload; inputs are never mutated.
//! 2. A `Pending` or `Error` envelope only updates status and error.
//! 3. Resolve the id-path in both the clone and the incoming payload.
//! 4. Apply the kind-specific rule at the resolved sub-tree.
//! 5. Re-wrap with `Success` (or leave bare).
//!
//! | Kind   | Map sub-tree               | Array sub-tree              | Absent / scalar     |
//! |--------|----------------------------|-----------------------------|---------------------|
//! | get    | shallow union (or replace) | replace                     | replace             |
//! | add    | insert at id               | append unless id present    | build and insert    |
//! | update | deep merge at id           | merge matching element      | build and insert    |
//! | delete | remove id                  | filter matching elements    | no-op               |
//! | clear  | replace                    | replace                     | replace             |

mod read;
mod shape;
mod write;

use serde_json::Value;

use crate::action::{OperationDescriptor, OperationKind};
use crate::status::{Slice, Status};

pub use read::{apply_clear, apply_get};
pub use shape::{Shape, ShapeMut};
pub use write::{apply_add, apply_delete, apply_update, deep_merge};

/// Run the merge function matching `op.kind`.
pub fn apply(op: &OperationDescriptor, slice: &Slice, incoming: &Slice) -> Slice {
    match op.kind {
        OperationKind::Get => apply_get(slice, incoming, op),
        OperationKind::Add => apply_add(slice, incoming, op),
        OperationKind::Update => apply_update(slice, incoming, op),
        OperationKind::Delete => apply_delete(slice, incoming, op),
        OperationKind::Clear => apply_clear(slice, incoming, op),
    }
}

/// Shared skeleton: status gating, clone, rule, re-wrap.
fn fold(slice: &Slice, incoming: &Slice, rule: impl FnOnce(&mut Value, &Value)) -> Slice {
    if let Slice::Enveloped(action) = incoming {
        if action.status != Status::Success {
            return match slice {
                Slice::Enveloped(current) => Slice::Enveloped(current.with_status_of(action)),
                Slice::Bare(_) => {
                    tracing::debug!(status = ?action.status, "bare slice ignores status envelope");
                    slice.clone()
                }
            };
        }
    }

    let mut next = slice.payload().clone();
    rule(&mut next, incoming.payload());
    slice.rewrap(next)
}
