//! Shared types for the augury gameplay controllers.
//!
//! # Invariants
//! - Local +Z is an entity's forward axis, +Y its up axis.
//! - Rays always carry a unit-length direction.

mod layer;
mod ray;
mod types;

pub use layer::{Layer, LayerError, LayerMask};
pub use ray::{CameraView, Projection, Ray, RaycastHit, Viewport};
pub use types::{EntityId, Transform};
