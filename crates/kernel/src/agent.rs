use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Navigation agent service.
///
/// Path computation and following are the agent's business; callers only
/// hand over a destination and watch `path_pending` / `remaining_distance`.
pub trait NavAgent {
    fn set_destination(&mut self, destination: Vec3);
    fn path_pending(&self) -> bool;
    fn remaining_distance(&self) -> f32;
    fn stopping_distance(&self) -> f32;
    fn set_stopping_distance(&mut self, distance: f32);
}

/// Straight-line agent used by the reference host.
///
/// Walks on the horizontal plane through its base: destinations are
/// projected onto that plane. A destination set during a frame is "pathed"
/// on the next [`step`], so `path_pending` stays true for the rest of the
/// frame it was issued in. The owning entity sits `base_offset` above the
/// base.
///
/// [`step`]: SteeringAgent::step
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SteeringAgent {
    position: Vec3,
    destination: Option<Vec3>,
    path_pending: bool,
    stopping_distance: f32,
    /// Travel speed in world units per second.
    pub speed: f32,
    pub base_offset: f32,
}

impl Default for SteeringAgent {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            destination: None,
            path_pending: false,
            stopping_distance: 0.0,
            speed: 3.5,
            base_offset: 0.0,
        }
    }
}

impl SteeringAgent {
    pub fn new(position: Vec3, speed: f32) -> Self {
        Self {
            position,
            speed,
            ..Self::default()
        }
    }

    pub fn with_base_offset(mut self, base_offset: f32) -> Self {
        self.base_offset = base_offset;
        self
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    /// Teleport the agent's base, keeping any destination.
    pub fn warp(&mut self, position: Vec3) {
        self.position = position;
    }

    pub fn destination(&self) -> Option<Vec3> {
        self.destination
    }

    /// Position the owning entity should take.
    pub fn entity_position(&self) -> Vec3 {
        self.position + Vec3::Y * self.base_offset
    }

    /// Advance by `dt` seconds. Returns true if the agent moved.
    pub fn step(&mut self, dt: f32) -> bool {
        self.path_pending = false;
        let Some(dest) = self.destination else {
            return false;
        };
        let to_dest = dest - self.position;
        let dist = to_dest.length();
        if dist <= self.stopping_distance || dist <= f32::EPSILON {
            return false;
        }
        let travel = (self.speed * dt).min(dist);
        self.position += to_dest / dist * travel;
        tracing::trace!(travel, remaining = dist - travel, "agent step");
        true
    }
}

impl NavAgent for SteeringAgent {
    fn set_destination(&mut self, destination: Vec3) {
        self.destination = Some(Vec3::new(destination.x, self.position.y, destination.z));
        self.path_pending = true;
    }

    fn path_pending(&self) -> bool {
        self.path_pending
    }

    fn remaining_distance(&self) -> f32 {
        self.destination
            .map(|d| self.position.distance(d))
            .unwrap_or(0.0)
    }

    fn stopping_distance(&self) -> f32 {
        self.stopping_distance
    }

    fn set_stopping_distance(&mut self, distance: f32) {
        self.stopping_distance = distance.max(0.0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn idle_agent_reports_zero_remaining() {
        let a = SteeringAgent::default();
        assert_eq!(a.remaining_distance(), 0.0);
        assert!(!a.path_pending());
    }

    #[test]
    fn path_pending_until_next_step() {
        let mut a = SteeringAgent::new(Vec3::ZERO, 5.0);
        a.set_destination(Vec3::new(10.0, 0.0, 0.0));
        assert!(a.path_pending());
        a.step(0.1);
        assert!(!a.path_pending());
    }

    #[test]
    fn moves_at_speed_toward_destination() {
        let mut a = SteeringAgent::new(Vec3::ZERO, 5.0);
        a.set_destination(Vec3::new(10.0, 0.0, 0.0));
        assert!(a.step(1.0));
        assert!((a.position().x - 5.0).abs() < 1e-5);
        assert!((a.remaining_distance() - 5.0).abs() < 1e-5);
    }

    #[test]
    fn never_overshoots() {
        let mut a = SteeringAgent::new(Vec3::ZERO, 100.0);
        a.set_destination(Vec3::new(3.0, 0.0, 4.0));
        a.step(1.0);
        assert!(a.position().abs_diff_eq(Vec3::new(3.0, 0.0, 4.0), 1e-5));
        assert!(!a.step(1.0));
    }

    #[test]
    fn halts_inside_stopping_distance() {
        let mut a = SteeringAgent::new(Vec3::ZERO, 1.0);
        a.set_stopping_distance(2.0);
        a.set_destination(Vec3::new(1.5, 0.0, 0.0));
        assert!(!a.step(1.0));
        assert_eq!(a.position(), Vec3::ZERO);
    }

    #[test]
    fn destination_is_projected_onto_walk_plane() {
        let mut a = SteeringAgent::new(Vec3::ZERO, 1.0);
        a.set_destination(Vec3::new(3.0, 1.0, 4.0));
        assert_eq!(a.destination(), Some(Vec3::new(3.0, 0.0, 4.0)));
        assert!((a.remaining_distance() - 5.0).abs() < 1e-5);
    }

    #[test]
    fn stopping_distance_is_never_negative() {
        let mut a = SteeringAgent::default();
        a.set_stopping_distance(-1.0);
        assert_eq!(a.stopping_distance(), 0.0);
    }

    #[test]
    fn entity_sits_above_base() {
        let a = SteeringAgent::new(Vec3::new(1.0, 0.0, 1.0), 1.0).with_base_offset(1.0);
        assert_eq!(a.entity_position(), Vec3::new(1.0, 1.0, 1.0));
    }
}
