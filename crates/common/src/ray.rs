use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};

use crate::{EntityId, Layer, Transform};

/// A half-line with a unit-length direction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    direction: Vec3,
}

impl Ray {
    /// Returns `None` for a zero-length direction.
    pub fn new(origin: Vec3, direction: Vec3) -> Option<Self> {
        let direction = direction.try_normalize()?;
        Some(Self { origin, direction })
    }

    pub fn direction(&self) -> Vec3 {
        self.direction
    }

    pub fn point_at(&self, distance: f32) -> Vec3 {
        self.origin + self.direction * distance
    }
}

/// Nearest intersection reported by a ray query.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RaycastHit {
    pub entity: EntityId,
    pub layer: Layer,
    pub point: Vec3,
    pub distance: f32,
}

/// Perspective projection parameters for turning screen points into rays.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Projection {
    /// Vertical field of view in degrees.
    pub fov_y_degrees: f32,
    pub near: f32,
    pub far: f32,
}

impl Default for Projection {
    fn default() -> Self {
        Self {
            fov_y_degrees: 60.0,
            near: 0.3,
            far: 1000.0,
        }
    }
}

/// Screen size in pixels. Screen points have their origin at the top-left.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: 1280.0,
            height: 720.0,
        }
    }
}

impl Viewport {
    pub fn aspect(&self) -> f32 {
        if self.height > 0.0 {
            self.width / self.height
        } else {
            1.0
        }
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.width * 0.5, self.height * 0.5)
    }
}

impl Projection {
    /// Ray from the camera's near plane through `screen_point`.
    pub fn screen_point_to_ray(
        &self,
        camera: &Transform,
        viewport: &Viewport,
        screen_point: Vec2,
    ) -> Ray {
        let w = viewport.width.max(1.0);
        let h = viewport.height.max(1.0);
        let ndc_x = 2.0 * screen_point.x / w - 1.0;
        let ndc_y = 1.0 - 2.0 * screen_point.y / h;
        let half_h = (self.fov_y_degrees.to_radians() * 0.5).tan();
        let half_w = half_h * viewport.aspect();
        let local = Vec3::new(ndc_x * half_w, ndc_y * half_h, 1.0);
        let through = camera.rotation * local;
        let direction = through.normalize();
        Ray {
            origin: camera.position + through * self.near,
            direction,
        }
    }

    /// Screen point of `world` as seen by `camera`, or `None` when it lies
    /// behind the camera.
    pub fn world_to_screen_point(
        &self,
        camera: &Transform,
        viewport: &Viewport,
        world: Vec3,
    ) -> Option<Vec2> {
        let local = camera.rotation.inverse() * (world - camera.position);
        if local.z <= f32::EPSILON {
            return None;
        }
        let half_h = (self.fov_y_degrees.to_radians() * 0.5).tan();
        let half_w = half_h * viewport.aspect();
        let ndc_x = local.x / (local.z * half_w);
        let ndc_y = local.y / (local.z * half_h);
        Some(Vec2::new(
            (ndc_x + 1.0) * 0.5 * viewport.width,
            (1.0 - ndc_y) * 0.5 * viewport.height,
        ))
    }
}

/// A camera as seen by pointer picking: where it is and how it projects.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CameraView {
    pub transform: Transform,
    pub projection: Projection,
    pub viewport: Viewport,
}

impl CameraView {
    pub fn pointer_ray(&self, screen_point: Vec2) -> Ray {
        self.projection
            .screen_point_to_ray(&self.transform, &self.viewport, screen_point)
    }

    pub fn screen_point_of(&self, world: Vec3) -> Option<Vec2> {
        self.projection
            .world_to_screen_point(&self.transform, &self.viewport, world)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f32 = 1e-4;

    #[test]
    fn ray_direction_is_normalized() {
        let r = Ray::new(Vec3::ZERO, Vec3::new(0.0, 0.0, 5.0)).unwrap();
        assert!((r.direction().length() - 1.0).abs() < EPS);
        assert!(r.point_at(2.0).abs_diff_eq(Vec3::new(0.0, 0.0, 2.0), EPS));
        assert!(Ray::new(Vec3::ZERO, Vec3::ZERO).is_none());
    }

    #[test]
    fn screen_center_ray_follows_forward() {
        let mut cam = Transform::from_position(Vec3::new(0.0, 10.0, -10.0));
        cam.look_at(Vec3::ZERO, Vec3::Y);
        let viewport = Viewport::default();
        let ray = Projection::default().screen_point_to_ray(&cam, &viewport, viewport.center());
        assert!(ray.direction().abs_diff_eq(cam.forward(), EPS));
    }

    #[test]
    fn top_left_ray_points_up_and_left() {
        let cam = Transform::default();
        let ray = Projection::default().screen_point_to_ray(
            &cam,
            &Viewport::default(),
            Vec2::ZERO,
        );
        assert!(ray.direction().x < 0.0);
        assert!(ray.direction().y > 0.0);
    }

    #[test]
    fn world_to_screen_inverts_screen_to_ray() {
        let mut cam = Transform::from_position(Vec3::new(4.0, 8.0, -6.0));
        cam.look_at(Vec3::new(1.0, 0.0, 1.0), Vec3::Y);
        let projection = Projection::default();
        let viewport = Viewport::default();
        let world = Vec3::new(2.5, 0.0, 3.0);

        let screen = projection
            .world_to_screen_point(&cam, &viewport, world)
            .unwrap();
        let ray = projection.screen_point_to_ray(&cam, &viewport, screen);
        let expected = (world - ray.origin).normalize();
        assert!(ray.direction().abs_diff_eq(expected, 1e-3));
    }

    #[test]
    fn point_behind_camera_has_no_screen_point() {
        let cam = Transform::default();
        let projection = Projection::default();
        assert!(
            projection
                .world_to_screen_point(&cam, &Viewport::default(), Vec3::new(0.0, 0.0, -3.0))
                .is_none()
        );
    }
}
