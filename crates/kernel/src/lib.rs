//! Reference host for the gameplay controllers.
//!
//! Stands in for the engine services the controllers treat as opaque:
//! transforms, ray intersection, navigation agents and the frame clock.
//!
//! # Invariants
//! - All scene mutations flow through explicit operations and are logged.
//! - Raycasts never report colliders the ray starts inside.
//! - Agents never move past their destination.

pub mod agent;
pub mod interact;
pub mod physics;
pub mod scene;
pub mod time;

pub use agent::{NavAgent, SteeringAgent};
pub use interact::{Interactable, InteractionCounter};
pub use physics::{Collider, RaycastService};
pub use scene::{EntityData, Scene, SceneError, SceneEvent};
pub use time::{FrameClock, Time};
