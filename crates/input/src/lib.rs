//! Input snapshots: the controllers never poll devices, they receive one
//! immutable [`InputSnapshot`] per frame.
//!
//! # Invariants
//! - "Pressed this frame" implies "held".
//! - Per-frame accumulators (pointer delta, scroll) reset on `end_frame`.

pub mod collector;
pub mod snapshot;

pub use collector::{InputCollector, RawInput};
pub use snapshot::{InputSnapshot, Key, PointerButton};
