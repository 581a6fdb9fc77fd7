//! Reducer and dispatch contracts.

use crate::action::Action;

/// Reducer transforms state based on actions.
///
/// The reducer is the only place where state transitions happen. It must be
/// a pure function of `(state, action)`: the input state is never mutated.
pub trait Reducer: Send + Sync {
    /// The state type this reducer operates on.
    type State: Clone + Send + Sync;

    /// The action type this reducer handles.
    type Action: Send;

    /// Process an action and return the new state.
    fn reduce(&self, state: &Self::State, action: &Self::Action) -> Self::State;
}

/// Delivers actions to a store.
pub trait Dispatch: Send + Sync {
    fn dispatch(&self, action: Action);
}

impl<F> Dispatch for F
where
    F: Fn(Action) + Send + Sync,
{
    fn dispatch(&self, action: Action) {
        self(action)
    }
}
