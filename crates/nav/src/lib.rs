//! Point-and-click navigation.
//!
//! A primary click casts a ray from the camera through the pointer. Hits on
//! the interactable layers win over hits on the walkable layers; either way
//! the hit point becomes the agent's destination. The enhanced tier also
//! shows a pulsing destination marker and fires the struck entity's
//! interaction once the agent arrives.
//!
//! # Invariants
//! - At most one destination marker exists at any time.
//! - A scheduled interaction runs at most once, and only on arrival.
//! - A new click abandons whatever interaction was pending before it.
//! - A click that hits nothing changes nothing.

mod config;
mod host;
mod marker;
mod navigator;

pub use config::{
    ConfigError, INTERACTABLE_LAYERS, MarkerPrefab, NavConfig, NavTier, WALKABLE_LAYERS,
};
pub use host::{MarkerSpawn, NavHost};
pub use marker::{MarkerLook, pulse_scale};
pub use navigator::{MarkerRemoval, NavError, NavEvent, NavRequest, NavState, Navigator};
