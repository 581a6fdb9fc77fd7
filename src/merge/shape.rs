//! Container classification of a state sub-tree.

use serde_json::{Map, Value};

/// Read-only view of a sub-tree by container kind.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Shape<'a> {
    /// Object keyed by identifying value.
    Map(&'a Map<String, Value>),
    /// Ordered sequence of records.
    Array(&'a [Value]),
    /// Anything else, `null` included.
    Scalar(&'a Value),
}

impl<'a> Shape<'a> {
    pub fn of(value: &'a Value) -> Self {
        match value {
            Value::Object(map) => Shape::Map(map),
            Value::Array(items) => Shape::Array(items),
            other => Shape::Scalar(other),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Shape::Map(_) => "map",
            Shape::Array(_) => "array",
            Shape::Scalar(_) => "scalar",
        }
    }
}

/// Mutable view of a sub-tree by container kind.
#[derive(Debug)]
pub enum ShapeMut<'a> {
    Map(&'a mut Map<String, Value>),
    Array(&'a mut Vec<Value>),
    Scalar(&'a mut Value),
}

impl<'a> ShapeMut<'a> {
    pub fn of(value: &'a mut Value) -> Self {
        match value {
            Value::Object(map) => ShapeMut::Map(map),
            Value::Array(items) => ShapeMut::Array(items),
            other => ShapeMut::Scalar(other),
        }
    }
}
