use augury_common::{LayerMask, Ray, RaycastHit, Transform};
use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Ray intersection service.
///
/// Returns the nearest hit on a collider whose layer is in `mask`, no
/// farther than `max_distance` along the ray.
pub trait RaycastService {
    fn raycast(&self, ray: &Ray, max_distance: f32, mask: LayerMask) -> Option<RaycastHit>;
}

/// Collision shape, centered on the owning entity's position.
///
/// Shapes are scaled by the entity's scale and ignore its rotation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Collider {
    Box { half_extents: [f32; 3] },
    Sphere { radius: f32 },
}

impl Default for Collider {
    fn default() -> Self {
        Self::Box {
            half_extents: [0.5, 0.5, 0.5],
        }
    }
}

impl Collider {
    /// Distance along `ray` to the entry point, if the ray enters the shape.
    pub fn intersect(&self, transform: &Transform, ray: &Ray) -> Option<f32> {
        match *self {
            Collider::Box { half_extents } => {
                let half = Vec3::from(half_extents) * transform.scale.abs();
                ray_aabb(ray, transform.position - half, transform.position + half)
            }
            Collider::Sphere { radius } => {
                let r = radius * transform.scale.abs().max_element();
                ray_sphere(ray, transform.position, r)
            }
        }
    }
}

fn ray_aabb(ray: &Ray, min: Vec3, max: Vec3) -> Option<f32> {
    let dir = ray.direction();
    let mut t_enter = f32::NEG_INFINITY;
    let mut t_exit = f32::INFINITY;
    for axis in 0..3 {
        let o = ray.origin[axis];
        let d = dir[axis];
        if d.abs() < f32::EPSILON {
            if o < min[axis] || o > max[axis] {
                return None;
            }
            continue;
        }
        let inv = 1.0 / d;
        let mut t0 = (min[axis] - o) * inv;
        let mut t1 = (max[axis] - o) * inv;
        if t0 > t1 {
            std::mem::swap(&mut t0, &mut t1);
        }
        t_enter = t_enter.max(t0);
        t_exit = t_exit.min(t1);
        if t_enter > t_exit {
            return None;
        }
    }
    (t_enter >= 0.0).then_some(t_enter)
}

fn ray_sphere(ray: &Ray, center: Vec3, radius: f32) -> Option<f32> {
    let oc = ray.origin - center;
    let b = oc.dot(ray.direction());
    let c = oc.length_squared() - radius * radius;
    if c < 0.0 {
        // Origin inside the sphere.
        return None;
    }
    let disc = b * b - c;
    if disc < 0.0 {
        return None;
    }
    let t = -b - disc.sqrt();
    (t >= 0.0).then_some(t)
}
