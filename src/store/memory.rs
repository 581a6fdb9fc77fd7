//! In-memory store driving a [`Reducer`].

use parking_lot::Mutex;
use tokio::sync::watch;

use crate::action::Action;

use super::{Dispatch, Reducer};

/// Thread-safe store with subscription support.
///
/// Every reduction publishes the new state on a watch channel; the action log
/// keeps every dispatched action in dispatch order.
pub struct Store<R: Reducer> {
    reducer: R,
    state: watch::Sender<R::State>,
    log: Mutex<Vec<R::Action>>,
}

impl<R> Store<R>
where
    R: Reducer,
    R::Action: Clone,
{
    pub fn new(reducer: R, initial: R::State) -> Self {
        let (state, _) = watch::channel(initial);
        Self {
            reducer,
            state,
            log: Mutex::new(Vec::new()),
        }
    }

    /// Snapshot of the current state.
    pub fn state(&self) -> R::State {
        self.state.borrow().clone()
    }

    /// Receiver notified on every state change.
    pub fn subscribe(&self) -> watch::Receiver<R::State> {
        self.state.subscribe()
    }

    /// Actions applied so far, oldest first.
    pub fn actions(&self) -> Vec<R::Action> {
        self.log.lock().clone()
    }

    /// Reduce `action` into the current state.
    pub fn apply(&self, action: R::Action) {
        // The log lock serializes reductions so log order matches state order.
        let mut log = self.log.lock();
        self.state.send_modify(|state| {
            *state = self.reducer.reduce(state, &action);
        });
        log.push(action);
    }
}

impl<R> Dispatch for Store<R>
where
    R: Reducer<Action = Action>,
{
    fn dispatch(&self, action: Action) {
        tracing::debug!(action = %action.action_type, status = ?action.status(), "dispatch");
        self.apply(action);
    }
}
