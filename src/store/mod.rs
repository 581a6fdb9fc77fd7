//! Hosting-store primitives.
//!
//! The engine needs only two things from a store: a pure reducer contract and
//! a way to dispatch actions into it.
//!
//! ```text
//! Trigger ──dispatch──→ Store ──reduce──→ State ──→ subscribers
//! ```

mod memory;
mod reducer;

pub use memory::Store;
pub use reducer::{Dispatch, Reducer};
