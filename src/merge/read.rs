//! `get` and `clear`: rules that replace rather than edit records.

use serde_json::{Map, Value};

use crate::action::OperationDescriptor;
use crate::path::index_at;
use crate::status::Slice;

use super::fold;
use super::shape::{Shape, ShapeMut};

/// Fold a read result into the slice.
///
/// With an id-path, an array of records is first indexed into a map. Map
/// sub-trees are unioned with the incoming entries unless the descriptor asks
/// for full replacement; everything else is replaced.
pub fn apply_get(slice: &Slice, incoming: &Slice, op: &OperationDescriptor) -> Slice {
    let union = !op.replaces_on_get();
    fold(slice, incoming, |state, incoming| {
        let incoming = index_at(incoming, &op.id_path);
        overlay(state, &incoming, op.id_path.nesting(), union);
    })
}

/// Replace the payload with the action's payload, whatever its shape.
pub fn apply_clear(slice: &Slice, incoming: &Slice, _op: &OperationDescriptor) -> Slice {
    fold(slice, incoming, |state, incoming| *state = incoming.clone())
}

/// Walk the nesting keys in step with a wrapped response, or down the state
/// alone for a flat one, then settle at the resolved level.
fn overlay(state: &mut Value, incoming: &Value, nesting: &[String], union: bool) {
    let Some((step, rest)) = nesting.split_first() else {
        settle(state, incoming, union);
        return;
    };

    if let Some(inner) = incoming.as_object().and_then(|fields| fields.get(step)) {
        // Wrapped response: sibling fields at this level replace the state's.
        if !state.is_object() {
            *state = Value::Object(Map::new());
        }
        if let (Value::Object(target), Value::Object(fields)) = (&mut *state, incoming) {
            for (name, value) in fields {
                if name != step {
                    target.insert(name.clone(), value.clone());
                }
            }
            let child = target.entry(step.clone()).or_insert(Value::Null);
            overlay(child, inner, rest, union);
        }
        return;
    }

    if let Some(child) = state.get_mut(step.as_str()) {
        overlay(child, incoming, rest, union);
        return;
    }
    settle(state, incoming, union);
}

fn settle(state: &mut Value, incoming: &Value, union: bool) {
    if let (true, ShapeMut::Map(existing), Shape::Map(fresh)) =
        (union, ShapeMut::of(state), Shape::of(incoming))
    {
        existing.extend(fresh.iter().map(|(key, value)| (key.clone(), value.clone())));
        return;
    }
    *state = incoming.clone();
}
