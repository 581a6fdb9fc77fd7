//! `add`, `update` and `delete`: rules that edit individual records.

use serde_json::{Map, Value};

use crate::action::OperationDescriptor;
use crate::path::{key_of, locate, locate_mut, place_under, record_key, IdPath};
use crate::status::Slice;

use super::fold;
use super::shape::{Shape, ShapeMut};

type RecordRule = fn(&mut Value, &Value, &IdPath);

/// Insert the incoming record(s).
///
/// Maps are keyed by the identifying value and naturally idempotent; arrays
/// only append a record whose identifying value is not present yet.
pub fn apply_add(slice: &Slice, incoming: &Slice, op: &OperationDescriptor) -> Slice {
    fold(slice, incoming, |state, incoming| {
        write(state, incoming, &op.id_path, add_record)
    })
}

/// Merge the incoming record(s) into the stored ones with the same id.
///
/// A record that is not stored is a silent no-op.
pub fn apply_update(slice: &Slice, incoming: &Slice, op: &OperationDescriptor) -> Slice {
    fold(slice, incoming, |state, incoming| {
        write(state, incoming, &op.id_path, update_record)
    })
}

/// Remove the record(s) identified by the incoming payload.
///
/// The payload is either a bare id, a record carrying its identifying field,
/// or an array of either.
pub fn apply_delete(slice: &Slice, incoming: &Slice, op: &OperationDescriptor) -> Slice {
    fold(slice, incoming, |state, incoming| {
        let path = &op.id_path;
        let ids: Vec<String> = records(locate(incoming, path))
            .into_iter()
            .filter_map(|value| id_of(value, path))
            .collect();

        let (target, depth) = locate_mut(state, path);
        if depth < path.nesting().len() && target.is_object() {
            tracing::debug!(path = %path, "nothing stored at path, delete skipped");
            return;
        }
        for id in &ids {
            remove_record(target, id, path);
        }
    })
}

/// Deep merge `patch` into `target`: objects recurse, anything else replaces.
pub fn deep_merge(target: &mut Value, patch: &Value) {
    match (target, patch) {
        (Value::Object(existing), Value::Object(fields)) => merge_fields(existing, fields),
        (target, patch) => *target = patch.clone(),
    }
}

fn merge_fields(existing: &mut Map<String, Value>, fields: &Map<String, Value>) {
    for (name, value) in fields {
        match existing.get_mut(name) {
            Some(slot) => deep_merge(slot, value),
            None => {
                existing.insert(name.clone(), value.clone());
            }
        }
    }
}

/// Resolve the target and apply `rule` per incoming record, building the
/// nested containers on first write.
fn write(state: &mut Value, incoming: &Value, path: &IdPath, rule: RecordRule) {
    let source = locate(incoming, path);
    let (target, depth) = locate_mut(state, path);
    let missing = &path.nesting()[depth..];

    if let (Some((step, below)), Value::Object(entries)) = (missing.split_first(), &mut *target) {
        tracing::debug!(path = %path, step = %step, "first write below existing node");
        entries.insert(
            step.clone(),
            place_under(source.clone(), below, path.identifier()),
        );
        return;
    }

    if matches!(Shape::of(target), Shape::Scalar(_)) {
        *target = place_under(source.clone(), missing, path.identifier());
        return;
    }
    for record in records(source) {
        rule(target, record, path);
    }
}

fn add_record(target: &mut Value, record: &Value, path: &IdPath) {
    let field = path.identifier();
    let key = field.and_then(|field| record_key(record, field));

    match ShapeMut::of(target) {
        ShapeMut::Map(entries) => match (key, record) {
            (Some(key), _) => {
                entries.insert(key, record.clone());
            }
            (None, Value::Object(fields)) => {
                entries.extend(fields.iter().map(|(k, v)| (k.clone(), v.clone())));
            }
            (None, _) => tracing::debug!(path = %path, "record without identifying field not added"),
        },
        ShapeMut::Array(items) => {
            let exists = match (field, &key) {
                (Some(field), Some(key)) => items
                    .iter()
                    .any(|item| record_key(item, field).as_ref() == Some(key)),
                _ => false,
            };
            if exists {
                tracing::debug!(path = %path, "record already present, add skipped");
            } else {
                items.push(record.clone());
            }
        }
        ShapeMut::Scalar(slot) => *slot = place_under(record.clone(), &[], field),
    }
}

fn update_record(target: &mut Value, record: &Value, path: &IdPath) {
    let field = path.identifier();
    let key = field.and_then(|field| record_key(record, field));

    match ShapeMut::of(target) {
        ShapeMut::Map(entries) => match key {
            Some(key) => match entries.get_mut(&key) {
                Some(existing) => deep_merge(existing, record),
                None => tracing::debug!(key = %key, "update target not found"),
            },
            None => {
                // No identifying value: stale identifying fields are dropped
                // and the rest merges into the node reached by the path.
                if let Value::Object(fields) = record {
                    let mut fields = fields.clone();
                    fields.retain(|name, _| !path.contains(name));
                    merge_fields(entries, &fields);
                }
            }
        },
        ShapeMut::Array(items) => {
            let (Some(field), Some(key)) = (field, key) else {
                tracing::debug!(path = %path, "array update without identifying value skipped");
                return;
            };
            let mut matched = 0;
            for item in items
                .iter_mut()
                .filter(|item| record_key(item, field).as_deref() == Some(key.as_str()))
            {
                shallow_merge(item, record);
                matched += 1;
            }
            if matched == 0 {
                tracing::debug!(key = %key, "update target not found");
            }
        }
        ShapeMut::Scalar(slot) => *slot = place_under(record.clone(), &[], field),
    }
}

fn remove_record(target: &mut Value, id: &str, path: &IdPath) {
    match ShapeMut::of(target) {
        ShapeMut::Map(entries) => {
            if entries.remove(id).is_none() {
                tracing::debug!(id, "delete target not found");
            }
        }
        ShapeMut::Array(items) => {
            let before = items.len();
            match path.identifier() {
                Some(field) => items.retain(|item| record_key(item, field).as_deref() != Some(id)),
                None => items.retain(|item| key_of(item).as_deref() != Some(id)),
            }
            if items.len() == before {
                tracing::debug!(id, "delete target not found");
            }
        }
        ShapeMut::Scalar(_) => {}
    }
}

fn shallow_merge(item: &mut Value, record: &Value) {
    match (item, record) {
        (Value::Object(existing), Value::Object(fields)) => {
            existing.extend(fields.iter().map(|(k, v)| (k.clone(), v.clone())));
        }
        (item, record) => *item = record.clone(),
    }
}

fn records(source: &Value) -> Vec<&Value> {
    match source {
        Value::Array(items) => items.iter().collect(),
        single => vec![single],
    }
}

/// Identifying value of a delete payload element.
fn id_of(value: &Value, path: &IdPath) -> Option<String> {
    match value {
        Value::Object(_) => path.identifier().and_then(|field| record_key(value, field)),
        other => key_of(other),
    }
}
