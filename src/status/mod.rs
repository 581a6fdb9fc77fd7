//! Status envelope primitives.
//!
//! Every enveloped slice carries a three-state lifecycle tag next to its
//! payload:
//!
//! ```text
//! Pending(1) ──→ Success(2)
//!     │
//!     └────────→ Error(0)
//! ```

mod envelope;
mod slice;

pub use envelope::{combine, needs_indicator, Envelope, Status};
pub use slice::Slice;
