use augury_common::EntityId;
use glam::Vec3;

use crate::config::MarkerPrefab;

const FALLBACK_NAME: &str = "destination_marker";
const FALLBACK_SCALE: Vec3 = Vec3::new(0.5, 0.05, 0.5);
const FALLBACK_LIFT: f32 = 0.025;
const FALLBACK_TINT: [f32; 4] = [1.0, 0.8, 0.0, 0.6];

/// Resolved marker appearance: the configured prefab or the flat fallback disc.
#[derive(Debug, Clone, PartialEq)]
pub struct MarkerLook {
    pub name: String,
    pub scale: Vec3,
    pub y_offset: f32,
    pub tint: Option<[f32; 4]>,
}

impl MarkerLook {
    pub fn fallback() -> Self {
        Self {
            name: FALLBACK_NAME.into(),
            scale: FALLBACK_SCALE,
            y_offset: FALLBACK_LIFT,
            tint: Some(FALLBACK_TINT),
        }
    }

    pub fn resolve(prefab: Option<&MarkerPrefab>) -> Self {
        match prefab {
            Some(p) => Self {
                name: p.name.clone(),
                scale: p.scale,
                y_offset: p.y_offset,
                tint: p.tint,
            },
            None => Self::fallback(),
        }
    }
}

/// Scale of a pulsing marker at time `t`. Only the horizontal axes pulse.
pub fn pulse_scale(base: Vec3, amplitude: f32, frequency: f32, t: f32) -> Vec3 {
    let s = 1.0 + amplitude * (t * frequency).sin();
    Vec3::new(base.x * s, base.y, base.z * s)
}

/// The one live marker owned by a navigator.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct LiveMarker {
    pub id: EntityId,
    pub base_scale: Vec3,
    pub spawned_at: f32,
}

impl LiveMarker {
    pub fn age(&self, now: f32) -> f32 {
        now - self.spawned_at
    }
}
