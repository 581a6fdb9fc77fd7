//! Id-path resolution inside nested state trees.
//!
//! An [`IdPath`] is an ordered list of property names. Every element but the
//! last is a literal nesting key (`["items", "id"]` addresses `tree.items`);
//! the last element names the identifying field of the records stored there.
//!
//! Resolution is lenient: a missing step stops the walk and the node reached
//! so far is returned, so a flat record and a wrapped response resolve to the
//! same level.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// Ordered property names locating records within a tree.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IdPath(Vec<String>);

impl IdPath {
    pub fn new<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(segments.into_iter().map(Into::into).collect())
    }

    /// A path with no segments: records are merged at the root and have no
    /// identifying field.
    pub fn empty() -> Self {
        Self(Vec::new())
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn segments(&self) -> &[String] {
        &self.0
    }

    /// Name of the identifying field (the last segment).
    pub fn identifier(&self) -> Option<&str> {
        self.0.last().map(String::as_str)
    }

    /// The nesting keys walked before the identifying field.
    pub fn nesting(&self) -> &[String] {
        match self.0.split_last() {
            Some((_, rest)) => rest,
            None => &[],
        }
    }

    /// Whether `name` is one of this path's segments.
    pub fn contains(&self, name: &str) -> bool {
        self.0.iter().any(|segment| segment == name)
    }
}

impl fmt::Display for IdPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.join("."))
    }
}

impl From<Vec<String>> for IdPath {
    fn from(segments: Vec<String>) -> Self {
        Self(segments)
    }
}

impl From<&[&str]> for IdPath {
    fn from(segments: &[&str]) -> Self {
        Self::new(segments.iter().copied())
    }
}

impl<const N: usize> From<[&str; N]> for IdPath {
    fn from(segments: [&str; N]) -> Self {
        Self::new(segments)
    }
}

/// Find the sub-tree `path` points at.
///
/// Walks the nesting keys left to right and stops at the first one the
/// current node does not have. Never descends on the identifying field.
pub fn locate<'a>(tree: &'a Value, path: &IdPath) -> &'a Value {
    let mut node = tree;
    for step in path.nesting() {
        match node.get(step.as_str()) {
            Some(child) if node.is_object() => node = child,
            _ => break,
        }
    }
    node
}

/// Mutable counterpart of [`locate`], also returning how many nesting keys
/// were consumed.
pub fn locate_mut<'a>(tree: &'a mut Value, path: &IdPath) -> (&'a mut Value, usize) {
    let mut node = tree;
    let mut depth = 0;
    for step in path.nesting() {
        let present = node
            .as_object()
            .is_some_and(|map| map.contains_key(step.as_str()));
        if !present {
            break;
        }
        node = &mut node[step.as_str()];
        depth += 1;
    }
    tracing::trace!(path = %path, depth, "located sub-tree");
    (node, depth)
}

/// Build the nested containers that would hold `record` at `path`.
///
/// Used on first write, when the target tree has nothing at the path yet.
/// A record carrying its identifying field is keyed by it; anything else is
/// placed as-is.
pub fn place(record: Value, path: &IdPath) -> Value {
    place_under(record, path.nesting(), path.identifier())
}

/// [`place`] for the nesting keys still missing below an existing node.
pub(crate) fn place_under(record: Value, nesting: &[String], identifier: Option<&str>) -> Value {
    let leaf = match identifier.and_then(|field| record_key(&record, field)) {
        Some(key) if record.is_object() => {
            let mut map = Map::new();
            map.insert(key, record);
            Value::Object(map)
        }
        _ => record,
    };

    nesting.iter().rev().fold(leaf, |inner, step| {
        let mut map = Map::new();
        map.insert(step.clone(), inner);
        Value::Object(map)
    })
}

/// Map key for an id value: strings as-is, numbers and booleans as JSON text.
pub fn key_of(id: &Value) -> Option<String> {
    match id {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Map key of `record`'s identifying `field`, if it has one.
pub fn record_key(record: &Value, field: &str) -> Option<String> {
    record.get(field).and_then(key_of)
}

/// Turn an array of records into a map keyed by the identifying field.
///
/// Records without the field are dropped; later duplicates overwrite earlier
/// ones. Non-array values and paths without an identifier are returned
/// unchanged.
pub fn index_records(records: &Value, path: &IdPath) -> Value {
    let (Some(field), Value::Array(items)) = (path.identifier(), records) else {
        return records.clone();
    };

    let mut map = Map::new();
    for item in items {
        match record_key(item, field) {
            Some(key) => {
                map.insert(key, item.clone());
            }
            None => tracing::debug!(field, "record without identifying field skipped"),
        }
    }
    Value::Object(map)
}

/// Copy of `value` with the array at `path` (if any) indexed by id.
pub fn index_at(value: &Value, path: &IdPath) -> Value {
    let mut copy = value.clone();
    let (node, _) = locate_mut(&mut copy, path);
    if node.is_array() {
        *node = index_records(node, path);
    }
    copy
}
