use glam::{EulerRot, Mat3, Quat, Vec3};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for an entity in the scene.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntityId(pub Uuid);

impl EntityId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// First eight hex digits, for log lines.
    pub fn short(&self) -> String {
        self.0.simple().to_string()[..8].to_string()
    }
}

impl Default for EntityId {
    fn default() -> Self {
        Self::new()
    }
}

/// Spatial transform: position, rotation, scale.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    pub position: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            scale: Vec3::ONE,
        }
    }
}

impl Transform {
    pub fn from_position(position: Vec3) -> Self {
        Self {
            position,
            ..Self::default()
        }
    }

    /// Transform at `position` oriented by Euler angles in degrees,
    /// applied roll, then pitch about X, then yaw about Y.
    pub fn from_euler_degrees(position: Vec3, pitch: f32, yaw: f32) -> Self {
        Self {
            position,
            rotation: Quat::from_euler(
                EulerRot::YXZ,
                yaw.to_radians(),
                pitch.to_radians(),
                0.0,
            ),
            scale: Vec3::ONE,
        }
    }

    pub fn with_scale(mut self, scale: Vec3) -> Self {
        self.scale = scale;
        self
    }

    /// Local +Z in world space.
    pub fn forward(&self) -> Vec3 {
        self.rotation * Vec3::Z
    }

    pub fn right(&self) -> Vec3 {
        self.rotation * Vec3::X
    }

    pub fn up(&self) -> Vec3 {
        self.rotation * Vec3::Y
    }

    /// Rotate so that `forward()` points at `target`.
    ///
    /// Leaves the rotation untouched when `target` coincides with the position.
    pub fn look_at(&mut self, target: Vec3, up: Vec3) {
        let forward = (target - self.position).normalize_or_zero();
        if forward == Vec3::ZERO {
            return;
        }
        let mut right = up.cross(forward);
        if right.length_squared() < 1e-8 {
            // Looking straight along `up`: any perpendicular axis will do.
            right = forward.any_orthonormal_vector();
        }
        let right = right.normalize();
        let up = forward.cross(right);
        self.rotation = Quat::from_mat3(&Mat3::from_cols(right, up, forward)).normalize();
    }

    /// Euler angles in degrees as `(pitch, yaw, roll)`, decomposed in the
    /// same order `from_euler_degrees` composes them.
    pub fn euler_degrees(&self) -> (f32, f32, f32) {
        let (yaw, pitch, roll) = self.rotation.to_euler(EulerRot::YXZ);
        (pitch.to_degrees(), yaw.to_degrees(), roll.to_degrees())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f32 = 1e-4;

    #[test]
    fn entity_id_uniqueness() {
        let a = EntityId::new();
        let b = EntityId::new();
        assert_ne!(a, b);
        assert_eq!(a.short().len(), 8);
    }

    #[test]
    fn transform_default_is_identity() {
        let t = Transform::default();
        assert_eq!(t.position, Vec3::ZERO);
        assert_eq!(t.rotation, Quat::IDENTITY);
        assert_eq!(t.scale, Vec3::ONE);
        assert!(t.forward().abs_diff_eq(Vec3::Z, EPS));
    }

    #[test]
    fn look_at_faces_target() {
        let mut t = Transform::from_position(Vec3::new(3.0, 7.0, -4.0));
        let target = Vec3::new(-1.0, 0.5, 2.0);
        t.look_at(target, Vec3::Y);
        let expected = (target - t.position).normalize();
        assert!(t.forward().abs_diff_eq(expected, EPS));
        // Level horizon: right axis stays in the XZ plane.
        assert!(t.right().y.abs() < EPS);
    }

    #[test]
    fn look_at_straight_down_is_finite() {
        let mut t = Transform::from_position(Vec3::new(0.0, 10.0, 0.0));
        t.look_at(Vec3::ZERO, Vec3::Y);
        assert!(t.forward().abs_diff_eq(Vec3::NEG_Y, EPS));
        assert!(t.rotation.is_finite());
    }

    #[test]
    fn look_at_own_position_keeps_rotation() {
        let mut t = Transform::from_euler_degrees(Vec3::ONE, 30.0, 60.0);
        let before = t.rotation;
        t.look_at(Vec3::ONE, Vec3::Y);
        assert_eq!(t.rotation, before);
    }

    #[test]
    fn euler_round_trips() {
        let t = Transform::from_euler_degrees(Vec3::ZERO, 35.0, 120.0);
        let (pitch, yaw, roll) = t.euler_degrees();
        assert!((pitch - 35.0).abs() < EPS);
        assert!((yaw - 120.0).abs() < EPS);
        assert!(roll.abs() < EPS);
    }

    #[test]
    fn positive_pitch_looks_down() {
        let t = Transform::from_euler_degrees(Vec3::ZERO, 45.0, 0.0);
        assert!(t.forward().y < 0.0);
    }
}
