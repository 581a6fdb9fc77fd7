//! Shared test utilities and mock infrastructure.

#![allow(dead_code, unused_imports)]

pub mod mock_backend;

use async_trait::async_trait;
use entity_engine::{Action, Dispatch, Status, Transport, TransportError};
use parking_lot::Mutex;
use serde_json::Value;
use std::collections::VecDeque;
use std::path::PathBuf;
use std::sync::Arc;
use tempfile::TempDir;

/// Dispatcher that records every action it receives.
#[derive(Clone, Default)]
pub struct RecordingDispatch {
    actions: Arc<Mutex<Vec<Action>>>,
}

impl RecordingDispatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn actions(&self) -> Vec<Action> {
        self.actions.lock().clone()
    }

    pub fn statuses(&self) -> Vec<Option<Status>> {
        self.actions.lock().iter().map(Action::status).collect()
    }

    pub fn wire(&self) -> Vec<Value> {
        self.actions
            .lock()
            .iter()
            .map(|a| serde_json::to_value(a).unwrap())
            .collect()
    }
}

impl Dispatch for RecordingDispatch {
    fn dispatch(&self, action: Action) {
        self.actions.lock().push(action);
    }
}

/// Transport answering pre-scripted results in order and recording the
/// arguments of every call.
#[derive(Clone, Default)]
pub struct ScriptedTransport {
    replies: Arc<Mutex<VecDeque<Result<Value, TransportError>>>>,
    calls: Arc<Mutex<Vec<Vec<Value>>>>,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn resolving(value: Value) -> Self {
        let transport = Self::new();
        transport.push(Ok(value));
        transport
    }

    pub fn rejecting(error: TransportError) -> Self {
        let transport = Self::new();
        transport.push(Err(error));
        transport
    }

    pub fn push(&self, reply: Result<Value, TransportError>) {
        self.replies.lock().push_back(reply);
    }

    pub fn calls(&self) -> Vec<Vec<Value>> {
        self.calls.lock().clone()
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn call(&self, args: Vec<Value>) -> Result<Value, TransportError> {
        self.calls.lock().push(args);
        self.replies
            .lock()
            .pop_front()
            .unwrap_or_else(|| Err(TransportError::Http("no scripted reply".into())))
    }
}

/// Write `content` to `name` inside a fresh temp dir.
pub fn temp_file(name: &str, content: &str) -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let path = temp_dir.path().join(name);
    std::fs::write(&path, content).expect("Failed to write temp file");
    (temp_dir, path)
}
