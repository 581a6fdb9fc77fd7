//! Callable trigger synthesized from one operation descriptor.

use std::sync::Arc;

use serde_json::Value;

use crate::path::index_at;
use crate::status::{Envelope, Slice};
use crate::store::Dispatch;
use crate::transport::{ResponseMap, ResponseMapOverrides, TransportError};

use super::descriptor::OperationDescriptor;
use super::types::{Action, ActionType, OperationKind};

/// What an invocation produced, after its dispatches.
#[derive(Debug, Clone)]
pub enum Outcome {
    /// A local write: the single action that was dispatched.
    Dispatched(Action),
    /// The transport resolved with this raw response.
    Resolved(Value),
    /// The transport rejected; the Error envelope was already dispatched.
    Rejected(TransportError),
}

impl Outcome {
    /// Raw value for call-site chaining.
    pub fn into_result(self) -> Result<Value, TransportError> {
        match self {
            Outcome::Dispatched(action) => Ok(action.payload.into_payload()),
            Outcome::Resolved(response) => Ok(response),
            Outcome::Rejected(error) => Err(error),
        }
    }

    pub fn is_rejected(&self) -> bool {
        matches!(self, Outcome::Rejected(_))
    }
}

/// Dispatching wrapper around an [`OperationDescriptor`].
///
/// An [`AlternativeRequest`](super::AlternativeRequest) takes over the whole
/// invocation when set. Otherwise, with a transport, an invocation dispatches `Pending`, awaits the call and
/// dispatches exactly one `Success` or `Error` envelope. Without one, it
/// dispatches a single `Success` write of its argument.
#[derive(Clone)]
pub struct ActionTrigger {
    descriptor: Arc<OperationDescriptor>,
    action_type: ActionType,
    response_map: ResponseMap,
    clear_default: Value,
}

impl ActionTrigger {
    pub(crate) fn new(
        descriptor: Arc<OperationDescriptor>,
        prefix: &str,
        response_map: ResponseMap,
        clear_default: Value,
    ) -> Self {
        let action_type = ActionType::new(descriptor.kind, descriptor.name.clone(), prefix);
        Self {
            descriptor,
            action_type,
            response_map,
            clear_default,
        }
    }

    pub fn action_type(&self) -> &ActionType {
        &self.action_type
    }

    pub fn descriptor(&self) -> &OperationDescriptor {
        &self.descriptor
    }

    pub fn name(&self) -> &str {
        &self.descriptor.name
    }

    /// Invoke with the group's response map.
    pub async fn invoke(&self, dispatch: &dyn Dispatch, args: Vec<Value>) -> Outcome {
        self.invoke_with(dispatch, args, &ResponseMapOverrides::default())
            .await
    }

    /// Invoke with per-call response map overrides layered on the group's.
    pub async fn invoke_with(
        &self,
        dispatch: &dyn Dispatch,
        args: Vec<Value>,
        overrides: &ResponseMapOverrides,
    ) -> Outcome {
        let args = self.with_clear_default(args);
        if let Some(alternative) = &self.descriptor.alternative {
            tracing::debug!(action = %self.action_type, "handing over to alternative request");
            return alternative.request(dispatch, args, &self.action_type).await;
        }
        let Some(transport) = self.descriptor.transport.clone() else {
            return Outcome::Dispatched(self.write_local(dispatch, args));
        };

        let response_map = self.response_map.with_overrides(overrides);
        if !self.descriptor.flags.suppress_envelope {
            self.send(dispatch, Slice::Enveloped(Envelope::pending()));
        }

        let argument = args.first().cloned().unwrap_or(Value::Null);
        match transport.call(args).await {
            Ok(response) => {
                match response_map.failure(&response) {
                    Some(message) => {
                        tracing::warn!(action = %self.action_type, error = %message, "response reported failure");
                        self.send(dispatch, Slice::Enveloped(Envelope::failure(message)));
                    }
                    None => {
                        let payload = self.payload_from(&response, argument, &response_map);
                        self.send(dispatch, self.wrap(payload));
                    }
                }
                self.notify(&response, dispatch);
                Outcome::Resolved(response)
            }
            Err(error) => {
                let message = response_map.rejection_message(&error);
                tracing::warn!(action = %self.action_type, error = %message, "transport rejected");
                self.send(dispatch, Slice::Enveloped(Envelope::failure(message)));
                if let TransportError::Rejected(body) = &error {
                    self.notify(body, dispatch);
                }
                Outcome::Rejected(error)
            }
        }
    }

    fn write_local(&self, dispatch: &dyn Dispatch, args: Vec<Value>) -> Action {
        let argument = args.into_iter().next().unwrap_or(Value::Null);
        let argument = match &self.descriptor.prepare {
            Some(prepare) => prepare(argument),
            None => argument,
        };

        let action = Action::new(self.action_type.clone(), self.wrap(self.normalize(argument)));
        self.deliver(dispatch, action.clone());
        action
    }

    /// A clear called without arguments resets to the group default.
    fn with_clear_default(&self, args: Vec<Value>) -> Vec<Value> {
        if args.is_empty() && self.descriptor.kind == OperationKind::Clear {
            vec![self.clear_default.clone()]
        } else {
            args
        }
    }

    fn payload_from(&self, response: &Value, argument: Value, response_map: &ResponseMap) -> Value {
        let op = &self.descriptor;
        let payload = if op.flags.is_local_update {
            argument
        } else if let Some(extract) = &op.extract {
            extract(response)
        } else if op.flags.returns_raw_response {
            response.clone()
        } else {
            response_map.payload_of(response)
        };
        self.normalize(payload)
    }

    /// Read results with an id path are indexed before dispatch.
    fn normalize(&self, payload: Value) -> Value {
        let op = &self.descriptor;
        if op.kind == OperationKind::Get && !op.id_path.is_empty() {
            index_at(&payload, &op.id_path)
        } else {
            payload
        }
    }

    fn wrap(&self, payload: Value) -> Slice {
        if self.descriptor.flags.suppress_envelope {
            Slice::Bare(payload)
        } else {
            Slice::Enveloped(Envelope::success(payload))
        }
    }

    fn send(&self, dispatch: &dyn Dispatch, payload: Slice) {
        self.deliver(dispatch, Action::new(self.action_type.clone(), payload));
    }

    fn deliver(&self, dispatch: &dyn Dispatch, action: Action) {
        tracing::debug!(action = %action.action_type, status = ?action.status(), "dispatching");
        dispatch.dispatch(action);
    }

    fn notify(&self, response: &Value, dispatch: &dyn Dispatch) {
        if let Some(hook) = &self.descriptor.on_response {
            hook(response, dispatch);
        }
    }
}

impl std::fmt::Debug for ActionTrigger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ActionTrigger")
            .field("action_type", &self.action_type.to_string())
            .field("descriptor", &self.descriptor)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::AlternativeRequest;
    use crate::status::Status;
    use crate::transport::transport_fn;
    use parking_lot::Mutex;
    use serde_json::json;

    fn recorder() -> (Arc<Mutex<Vec<Action>>>, impl Dispatch) {
        let log = Arc::new(Mutex::new(Vec::new()));
        let sink = {
            let log = Arc::clone(&log);
            move |action: Action| log.lock().push(action)
        };
        (log, sink)
    }

    fn trigger(op: OperationDescriptor) -> ActionTrigger {
        ActionTrigger::new(Arc::new(op), "USERS", ResponseMap::default(), json!([]))
    }

    #[tokio::test]
    async fn local_write_dispatches_single_success() {
        let (log, sink) = recorder();
        let trigger = trigger(OperationDescriptor::add().key("list").named("ADD"));
        let outcome = trigger.invoke(&sink, vec![json!({"id": 1})]).await;

        let actions = log.lock().clone();
        assert_eq!(actions.len(), 1);
        assert_eq!(actions[0].action_type.to_string(), "ADD_USERS");
        assert_eq!(actions[0].status(), Some(Status::Success));
        assert!(matches!(outcome, Outcome::Dispatched(_)));
    }

    #[tokio::test]
    async fn local_write_applies_prepare() {
        let (log, sink) = recorder();
        let trigger = trigger(
            OperationDescriptor::update().prepare(|value| json!({"wrapped": value})),
        );
        trigger.invoke(&sink, vec![json!(3)]).await;
        assert_eq!(log.lock()[0].payload.payload(), &json!({"wrapped": 3}));
    }

    #[tokio::test]
    async fn clear_without_arguments_uses_default() {
        let (log, sink) = recorder();
        let trigger = trigger(OperationDescriptor::clear().key("list"));
        trigger.invoke(&sink, Vec::new()).await;
        assert_eq!(log.lock()[0].payload.payload(), &json!([]));
    }

    #[tokio::test]
    async fn clear_over_transport_sends_default() {
        let (log, sink) = recorder();
        let calls = Arc::new(Mutex::new(Vec::new()));
        let op = OperationDescriptor::clear().key("list").local_update().transport({
            let calls = Arc::clone(&calls);
            transport_fn(move |args: Vec<Value>| {
                calls.lock().push(args);
                async move { Ok::<_, TransportError>(json!({"status": "success"})) }
            })
        });
        let trigger = ActionTrigger::new(
            Arc::new(op),
            "USERS",
            ResponseMap::default(),
            json!({"seed": 1}),
        );

        trigger.invoke(&sink, Vec::new()).await;

        assert_eq!(*calls.lock(), vec![vec![json!({"seed": 1})]]);
        let actions = log.lock().clone();
        assert_eq!(actions.len(), 2);
        assert_eq!(actions[1].status(), Some(Status::Success));
        assert_eq!(actions[1].payload.payload(), &json!({"seed": 1}));
    }

    struct Echo;

    #[async_trait::async_trait]
    impl AlternativeRequest for Echo {
        async fn request(
            &self,
            dispatch: &dyn Dispatch,
            args: Vec<Value>,
            action_type: &ActionType,
        ) -> Outcome {
            let action = Action::new(action_type.clone(), Slice::Bare(Value::Array(args)));
            dispatch.dispatch(action.clone());
            Outcome::Dispatched(action)
        }
    }

    #[tokio::test]
    async fn alternative_request_replaces_the_flow() {
        let (log, sink) = recorder();
        let called = Arc::new(Mutex::new(false));
        let trigger = trigger(
            OperationDescriptor::get()
                .named("LIST")
                .alternative(Echo)
                .transport({
                    let called = Arc::clone(&called);
                    transport_fn(move |_args: Vec<Value>| {
                        *called.lock() = true;
                        async move { Ok::<_, TransportError>(json!({})) }
                    })
                }),
        );

        let outcome = trigger.invoke(&sink, vec![json!(1), json!(2)]).await;

        assert!(!*called.lock());
        let actions = log.lock().clone();
        assert_eq!(actions.len(), 1);
        assert_eq!(actions[0].action_type.to_string(), "LIST_USERS");
        assert_eq!(actions[0].payload, Slice::Bare(json!([1, 2])));
        assert_eq!(outcome.into_result().unwrap(), json!([1, 2]));
    }

    #[tokio::test]
    async fn suppressed_envelope_skips_pending() {
        let (log, sink) = recorder();
        let trigger = trigger(
            OperationDescriptor::get()
                .suppress_envelope()
                .transport(transport_fn(|_args: Vec<Value>| async move {
                    Ok::<_, TransportError>(json!({"data": "ok"}))
                })),
        );
        trigger.invoke(&sink, Vec::new()).await;
        let actions = log.lock().clone();
        assert_eq!(actions.len(), 1);
        assert_eq!(actions[0].payload, Slice::Bare(json!("ok")));
    }

    #[tokio::test]
    async fn failure_status_dispatches_error() {
        let (log, sink) = recorder();
        let trigger = trigger(OperationDescriptor::get().transport(transport_fn(
            |_args: Vec<Value>| async move {
                Ok::<_, TransportError>(json!({"status": "fail", "message": "denied"}))
            },
        )));
        let outcome = trigger.invoke(&sink, Vec::new()).await;

        let actions = log.lock().clone();
        assert_eq!(actions.len(), 2);
        assert_eq!(actions[1].status(), Some(Status::Error));
        assert_eq!(actions[1].payload.error(), Some("denied"));
        assert_eq!(outcome.into_result().unwrap()["message"], "denied");
    }

    #[tokio::test]
    async fn local_update_merges_argument() {
        let (log, sink) = recorder();
        let trigger = trigger(OperationDescriptor::update().local_update().transport(
            transport_fn(|_args: Vec<Value>| async move {
                Ok::<_, TransportError>(json!({"status": "success", "data": true}))
            }),
        ));
        trigger.invoke(&sink, vec![json!({"id": 1, "name": "B"})]).await;
        assert_eq!(log.lock()[1].payload.payload(), &json!({"id": 1, "name": "B"}));
    }

    #[tokio::test]
    async fn per_call_overrides_win() {
        let (log, sink) = recorder();
        let trigger = trigger(OperationDescriptor::get().transport(transport_fn(
            |_args: Vec<Value>| async move {
                Ok::<_, TransportError>(json!({"result": [1, 2]}))
            },
        )));
        let overrides = ResponseMapOverrides {
            data: Some("result".into()),
            ..Default::default()
        };
        trigger.invoke_with(&sink, Vec::new(), &overrides).await;
        assert_eq!(log.lock()[1].payload.payload(), &json!([1, 2]));
    }

    #[tokio::test]
    async fn on_response_runs_after_dispatch() {
        let (log, sink) = recorder();
        let seen = Arc::new(Mutex::new(0usize));
        let trigger = trigger(
            OperationDescriptor::get()
                .extract(|response| response["items"].clone())
                .on_response({
                    let seen = Arc::clone(&seen);
                    move |_response, _dispatch| *seen.lock() += 1
                })
                .transport(transport_fn(|_args: Vec<Value>| async move {
                    Ok::<_, TransportError>(json!({"items": ["a"]}))
                })),
        );
        trigger.invoke(&sink, Vec::new()).await;
        assert_eq!(*seen.lock(), 1);
        assert_eq!(log.lock()[1].payload.payload(), &json!(["a"]));
    }
}
