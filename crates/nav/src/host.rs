use std::sync::Arc;

use augury_common::{EntityId, Transform};
use augury_kernel::{EntityData, Interactable, NavAgent, RaycastService, Scene};
use glam::Vec3;

/// A marker entity to place in the scene.
#[derive(Debug, Clone, PartialEq)]
pub struct MarkerSpawn {
    pub name: String,
    pub position: Vec3,
    pub scale: Vec3,
    pub tint: Option<[f32; 4]>,
}

/// Engine services the navigator drives.
///
/// Markers are visual only: hosts must not give them colliders, or they
/// would intercept the next click.
pub trait NavHost: RaycastService {
    /// The navigation agent attached to `owner`.
    fn nav_agent(&mut self, owner: EntityId) -> Option<&mut dyn NavAgent>;

    /// The interaction capability of `entity`, if it has one.
    fn interactable(&self, entity: EntityId) -> Option<Arc<dyn Interactable>>;

    fn spawn_marker(&mut self, marker: &MarkerSpawn) -> EntityId;

    fn set_marker_scale(&mut self, marker: EntityId, scale: Vec3);

    /// Returns false if the marker was already gone.
    fn despawn_marker(&mut self, marker: EntityId) -> bool;
}

impl NavHost for Scene {
    fn nav_agent(&mut self, owner: EntityId) -> Option<&mut dyn NavAgent> {
        self.agent_mut(owner).map(|a| a as &mut dyn NavAgent)
    }

    fn interactable(&self, entity: EntityId) -> Option<Arc<dyn Interactable>> {
        Scene::interactable(self, entity)
    }

    fn spawn_marker(&mut self, marker: &MarkerSpawn) -> EntityId {
        let mut data = EntityData::new(
            Transform::from_position(marker.position).with_scale(marker.scale),
        )
        .named(marker.name.clone());
        data.tint = marker.tint;
        self.spawn(data)
    }

    fn set_marker_scale(&mut self, marker: EntityId, scale: Vec3) {
        self.set_scale(marker, scale);
    }

    fn despawn_marker(&mut self, marker: EntityId) -> bool {
        self.despawn(marker).is_some()
    }
}
