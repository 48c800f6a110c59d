//! Orbit camera: yaw/pitch/zoom around a followed target.
//!
//! # Invariants
//! - Pitch stays within `[min_pitch, max_pitch]` and zoom within
//!   `[min_zoom, max_zoom]` after every update.
//! - After an update the camera sits exactly `zoom` away from the target and
//!   faces it.
//! - The target is read, never written.

mod config;
mod orbit;

pub use config::{CameraConfig, ConfigError};
pub use orbit::{OrbitCamera, OrbitState};
