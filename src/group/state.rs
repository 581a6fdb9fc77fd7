//! Top-level state of one entity group.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::status::{combine, Slice, Status};

/// One slice per operation key.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GroupState(BTreeMap<String, Slice>);

impl GroupState {
    pub fn get(&self, key: &str) -> Option<&Slice> {
        self.0.get(key)
    }

    pub fn insert(&mut self, key: impl Into<String>, slice: Slice) {
        self.0.insert(key.into(), slice);
    }

    /// Payload of the slice at `key`, envelope stripped.
    pub fn payload(&self, key: &str) -> Option<&Value> {
        self.0.get(key).map(Slice::payload)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    /// Aggregate status of every enveloped slice.
    pub fn status(&self) -> Status {
        let statuses: Vec<Status> = self.0.values().filter_map(Slice::status).collect();
        combine(&statuses)
    }
}

impl FromIterator<(String, Slice)> for GroupState {
    fn from_iter<I: IntoIterator<Item = (String, Slice)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}
