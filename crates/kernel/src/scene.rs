use augury_common::{EntityId, Layer, LayerMask, Ray, RaycastHit, Transform};
use glam::Vec3;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;

use crate::agent::SteeringAgent;
use crate::interact::Interactable;
use crate::physics::{Collider, RaycastService};

/// An event record produced by every mutation to the scene.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SceneEvent {
    /// Entity was spawned with the given transform.
    Spawned { id: EntityId, transform: Transform },
    /// Entity was despawned. Carries the transform it had.
    Despawned { id: EntityId, transform: Transform },
    /// Entity transform was updated.
    TransformUpdated {
        id: EntityId,
        old: Transform,
        new: Transform,
    },
    /// Agents advanced by `dt` seconds.
    Stepped { tick: u64, dt: f32 },
}

/// Errors from scene operations.
#[derive(Debug, thiserror::Error)]
pub enum SceneError {
    #[error("entity {0:?} not found")]
    EntityNotFound(EntityId),
}

/// Per-entity data stored in the scene.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityData {
    pub name: Option<String>,
    pub transform: Transform,
    #[serde(default)]
    pub layer: Layer,
    #[serde(default)]
    pub collider: Option<Collider>,
    /// RGBA tint for debug rendering.
    #[serde(default)]
    pub tint: Option<[f32; 4]>,
}

impl EntityData {
    pub fn new(transform: Transform) -> Self {
        Self {
            name: None,
            transform,
            layer: Layer::DEFAULT,
            collider: None,
            tint: None,
        }
    }

    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn on_layer(mut self, layer: Layer) -> Self {
        self.layer = layer;
        self
    }

    pub fn with_collider(mut self, collider: Collider) -> Self {
        self.collider = Some(collider);
        self
    }

    pub fn with_tint(mut self, tint: [f32; 4]) -> Self {
        self.tint = Some(tint);
        self
    }
}

/// The host-side scene: entities, their agents and interaction capabilities.
///
/// Uses BTreeMap for deterministic iteration order, so raycast ties and
/// agent stepping resolve the same way on every run.
#[derive(Default)]
pub struct Scene {
    entities: BTreeMap<EntityId, EntityData>,
    agents: BTreeMap<EntityId, SteeringAgent>,
    interactables: BTreeMap<EntityId, Arc<dyn Interactable>>,
    tick: u64,
    /// Append-only event log of all mutations.
    event_log: Vec<SceneEvent>,
}

impl Scene {
    /// Create an empty scene at tick 0.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of agent steps taken.
    pub fn tick(&self) -> u64 {
        self.tick
    }

    /// Number of entities in the scene.
    pub fn entity_count(&self) -> usize {
        self.entities.len()
    }

    /// Drain and return the event log.
    pub fn drain_events(&mut self) -> Vec<SceneEvent> {
        std::mem::take(&mut self.event_log)
    }

    /// Read-only access to the event log.
    pub fn events(&self) -> &[SceneEvent] {
        &self.event_log
    }

    /// Read-only access to all entities.
    pub fn entities(&self) -> &BTreeMap<EntityId, EntityData> {
        &self.entities
    }

    /// Spawn a new entity. Returns its id.
    pub fn spawn(&mut self, data: EntityData) -> EntityId {
        let id = EntityId::new();
        self.spawn_with_id(id, data);
        id
    }

    /// Spawn an entity with a specific id.
    pub fn spawn_with_id(&mut self, id: EntityId, data: EntityData) {
        let transform = data.transform;
        self.entities.insert(id, data);
        self.event_log.push(SceneEvent::Spawned { id, transform });
    }

    /// Remove an entity together with its agent and interaction capability.
    /// Returns the data if it existed.
    pub fn despawn(&mut self, id: EntityId) -> Option<EntityData> {
        let data = self.entities.remove(&id);
        if let Some(ref d) = data {
            self.agents.remove(&id);
            self.interactables.remove(&id);
            self.event_log.push(SceneEvent::Despawned {
                id,
                transform: d.transform,
            });
        }
        data
    }

    /// Get a reference to entity data.
    pub fn get(&self, id: EntityId) -> Option<&EntityData> {
        self.entities.get(&id)
    }

    /// First entity carrying `name`, in id order.
    pub fn find_by_name(&self, name: &str) -> Option<EntityId> {
        self.entities
            .iter()
            .find(|(_, d)| d.name.as_deref() == Some(name))
            .map(|(id, _)| *id)
    }

    /// Update an entity's transform and log the change.
    pub fn set_transform(&mut self, id: EntityId, new: Transform) -> bool {
        if let Some(data) = self.entities.get_mut(&id) {
            let old = data.transform;
            data.transform = new;
            self.event_log
                .push(SceneEvent::TransformUpdated { id, old, new });
            true
        } else {
            false
        }
    }

    /// Update only the scale of an entity.
    pub fn set_scale(&mut self, id: EntityId, scale: Vec3) -> bool {
        match self.entities.get(&id) {
            Some(data) => {
                let t = data.transform.with_scale(scale);
                self.set_transform(id, t)
            }
            None => false,
        }
    }

    /// Attach a navigation agent to an existing entity. The agent is warped
    /// so that the entity keeps its current position.
    pub fn attach_agent(
        &mut self,
        id: EntityId,
        mut agent: SteeringAgent,
    ) -> Result<(), SceneError> {
        let data = self.entities.get(&id).ok_or(SceneError::EntityNotFound(id))?;
        agent.warp(data.transform.position - Vec3::Y * agent.base_offset);
        self.agents.insert(id, agent);
        Ok(())
    }

    pub fn agent(&self, id: EntityId) -> Option<&SteeringAgent> {
        self.agents.get(&id)
    }

    pub fn agent_mut(&mut self, id: EntityId) -> Option<&mut SteeringAgent> {
        self.agents.get_mut(&id)
    }

    /// Expose an interaction capability on an existing entity.
    pub fn attach_interactable(
        &mut self,
        id: EntityId,
        interactable: Arc<dyn Interactable>,
    ) -> Result<(), SceneError> {
        if !self.entities.contains_key(&id) {
            return Err(SceneError::EntityNotFound(id));
        }
        self.interactables.insert(id, interactable);
        Ok(())
    }

    /// The interaction capability of `id`, if it has one.
    pub fn interactable(&self, id: EntityId) -> Option<Arc<dyn Interactable>> {
        self.interactables.get(&id).cloned()
    }

    /// Advance every agent by `dt` seconds and move their entities.
    pub fn step(&mut self, dt: f32) {
        let _span = tracing::trace_span!("scene_step", tick = self.tick).entered();
        let mut moved = Vec::new();
        for (id, agent) in self.agents.iter_mut() {
            if agent.step(dt) {
                moved.push((*id, agent.entity_position()));
            }
        }
        for (id, position) in moved {
            if let Some(data) = self.entities.get(&id) {
                let t = Transform {
                    position,
                    ..data.transform
                };
                self.set_transform(id, t);
            }
        }
        self.tick += 1;
        self.event_log.push(SceneEvent::Stepped {
            tick: self.tick,
            dt,
        });
    }
}

impl RaycastService for Scene {
    fn raycast(&self, ray: &Ray, max_distance: f32, mask: LayerMask) -> Option<RaycastHit> {
        let mut best: Option<RaycastHit> = None;
        for (id, data) in &self.entities {
            if !mask.contains(data.layer) {
                continue;
            }
            let Some(collider) = data.collider else {
                continue;
            };
            let Some(distance) = collider.intersect(&data.transform, ray) else {
                continue;
            };
            if distance > max_distance {
                continue;
            }
            if best.is_none_or(|b| distance < b.distance) {
                best = Some(RaycastHit {
                    entity: *id,
                    layer: data.layer,
                    point: ray.point_at(distance),
                    distance,
                });
            }
        }
        best
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::NavAgent;
    use crate::interact::InteractionCounter;

    fn layer(i: u8) -> Layer {
        Layer::new(i).unwrap()
    }

    fn ground(scene: &mut Scene) -> EntityId {
        scene.spawn(
            EntityData::new(Transform::from_position(Vec3::new(0.0, -0.5, 0.0)))
                .named("ground")
                .on_layer(layer(6))
                .with_collider(Collider::Box {
                    half_extents: [50.0, 0.5, 50.0],
                }),
        )
    }

    fn down_at(x: f32, z: f32) -> Ray {
        Ray::new(Vec3::new(x, 20.0, z), Vec3::NEG_Y).unwrap()
    }

    #[test]
    fn scene_starts_empty() {
        let s = Scene::new();
        assert_eq!(s.tick(), 0);
        assert_eq!(s.entity_count(), 0);
    }

    #[test]
    fn spawn_and_despawn() {
        let mut s = Scene::new();
        let id = s.spawn(EntityData::new(Transform::default()));
        assert_eq!(s.entity_count(), 1);
        assert!(s.get(id).is_some());

        let data = s.despawn(id);
        assert!(data.is_some());
        assert_eq!(s.entity_count(), 0);
        assert!(s.despawn(id).is_none());
        // spawn + despawn, the second despawn logs nothing
        assert_eq!(s.events().len(), 2);
    }

    #[test]
    fn despawn_drops_capabilities() {
        let mut s = Scene::new();
        let id = s.spawn(EntityData::new(Transform::default()));
        s.attach_agent(id, SteeringAgent::default()).unwrap();
        s.attach_interactable(id, Arc::new(InteractionCounter::new("x")))
            .unwrap();
        s.despawn(id);
        assert!(s.agent(id).is_none());
        assert!(s.interactable(id).is_none());
    }

    #[test]
    fn attach_to_missing_entity_fails() {
        let mut s = Scene::new();
        let ghost = EntityId::new();
        assert!(matches!(
            s.attach_agent(ghost, SteeringAgent::default()),
            Err(SceneError::EntityNotFound(_))
        ));
        assert!(
            s.attach_interactable(ghost, Arc::new(InteractionCounter::default()))
                .is_err()
        );
    }

    #[test]
    fn find_by_name() {
        let mut s = Scene::new();
        let g = ground(&mut s);
        assert_eq!(s.find_by_name("ground"), Some(g));
        assert_eq!(s.find_by_name("sky"), None);
    }

    #[test]
    fn set_transform_logs_event() {
        let mut s = Scene::new();
        let id = s.spawn(EntityData::new(Transform::default()));
        assert!(s.set_scale(id, Vec3::splat(2.0)));
        assert_eq!(s.get(id).unwrap().transform.scale, Vec3::splat(2.0));
        assert!(matches!(
            s.events().last(),
            Some(SceneEvent::TransformUpdated { .. })
        ));
        assert!(!s.set_scale(EntityId::new(), Vec3::ONE));
    }

    #[test]
    fn raycast_filters_by_layer() {
        let mut s = Scene::new();
        let g = ground(&mut s);
        let hit = s.raycast(&down_at(1.0, 2.0), 100.0, layer(6).mask()).unwrap();
        assert_eq!(hit.entity, g);
        assert!(hit.point.abs_diff_eq(Vec3::new(1.0, 0.0, 2.0), 1e-4));

        assert!(s.raycast(&down_at(1.0, 2.0), 100.0, layer(7).mask()).is_none());
    }

    #[test]
    fn raycast_respects_max_distance() {
        let mut s = Scene::new();
        ground(&mut s);
        assert!(s.raycast(&down_at(0.0, 0.0), 19.0, LayerMask::ALL).is_none());
        assert!(s.raycast(&down_at(0.0, 0.0), 21.0, LayerMask::ALL).is_some());
    }

    #[test]
    fn raycast_picks_nearest() {
        let mut s = Scene::new();
        ground(&mut s);
        let crate_id = s.spawn(
            EntityData::new(Transform::from_position(Vec3::new(0.0, 0.5, 0.0)))
                .on_layer(layer(6))
                .with_collider(Collider::default()),
        );
        let hit = s.raycast(&down_at(0.0, 0.0), 100.0, LayerMask::ALL).unwrap();
        assert_eq!(hit.entity, crate_id);
        assert!((hit.point.y - 1.0).abs() < 1e-4);
    }

    #[test]
    fn step_moves_agent_entities() {
        let mut s = Scene::new();
        let id = s.spawn(EntityData::new(Transform::from_position(Vec3::new(
            0.0, 1.0, 0.0,
        ))));
        s.attach_agent(id, SteeringAgent::new(Vec3::ZERO, 2.0).with_base_offset(1.0))
            .unwrap();
        assert_eq!(s.agent(id).unwrap().position(), Vec3::ZERO);

        s.agent_mut(id)
            .unwrap()
            .set_destination(Vec3::new(4.0, 0.0, 0.0));
        s.step(1.0);
        assert_eq!(s.tick(), 1);
        let pos = s.get(id).unwrap().transform.position;
        assert!(pos.abs_diff_eq(Vec3::new(2.0, 1.0, 0.0), 1e-5));
    }
}
