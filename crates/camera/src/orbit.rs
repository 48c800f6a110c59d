use augury_common::{EntityId, Transform};
use augury_input::{InputSnapshot, Key};
use augury_kernel::Scene;
use glam::{EulerRot, Quat, Vec3};
use serde::Serialize;

use crate::config::{CameraConfig, ConfigError};

const YAW_LEFT: [Key; 2] = [Key::ArrowLeft, Key::A];
const YAW_RIGHT: [Key; 2] = [Key::ArrowRight, Key::D];
const PITCH_UP: [Key; 2] = [Key::ArrowUp, Key::W];
const PITCH_DOWN: [Key; 2] = [Key::ArrowDown, Key::S];

/// Yaw/pitch/zoom of the camera relative to its target.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct OrbitState {
    /// Degrees about world Y, in `[0, 360)`.
    pub yaw: f32,
    /// Degrees about the camera's X axis; positive looks down.
    pub pitch: f32,
    /// Distance from the target.
    pub zoom: f32,
}

impl Default for OrbitState {
    fn default() -> Self {
        Self {
            yaw: 0.0,
            pitch: 45.0,
            zoom: 10.0,
        }
    }
}

impl OrbitState {
    pub fn rotation(&self) -> Quat {
        Quat::from_euler(
            EulerRot::YXZ,
            self.yaw.to_radians(),
            self.pitch.to_radians(),
            0.0,
        )
    }

    /// Offset from target to camera.
    pub fn offset(&self) -> Vec3 {
        self.rotation() * Vec3::new(0.0, 0.0, -self.zoom)
    }

    /// Camera transform looking at `target`.
    pub fn pose(&self, target: Vec3) -> Transform {
        let mut t = Transform::from_position(target + self.offset());
        t.look_at(target, Vec3::Y);
        t
    }
}

/// Third-person orbit camera controller.
///
/// Call [`OrbitCamera::late_update`] once per frame after everything that
/// moves the target has run.
#[derive(Debug, Clone)]
pub struct OrbitCamera {
    config: CameraConfig,
    state: OrbitState,
    initialized: bool,
}

impl OrbitCamera {
    pub fn new(config: CameraConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            config,
            state: OrbitState::default(),
            initialized: false,
        })
    }

    pub fn config(&self) -> &CameraConfig {
        &self.config
    }

    pub fn state(&self) -> OrbitState {
        self.state
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Derive the orbit from the camera's current pose relative to `target`.
    ///
    /// Without a target nothing is derived and the defaults stay in place.
    pub fn initialize(&mut self, camera: &Transform, target: Option<Vec3>) -> bool {
        let Some(target) = target else {
            tracing::debug!("orbit camera has no target; keeping default orbit");
            return false;
        };
        let (pitch, yaw, _) = camera.euler_degrees();
        self.state = OrbitState {
            yaw: wrap_degrees(yaw),
            pitch: pitch.clamp(self.config.min_pitch, self.config.max_pitch),
            zoom: camera
                .position
                .distance(target)
                .clamp(self.config.min_zoom, self.config.max_zoom),
        };
        self.initialized = true;
        tracing::debug!(
            yaw = self.state.yaw,
            pitch = self.state.pitch,
            zoom = self.state.zoom,
            "orbit camera initialized"
        );
        true
    }

    /// Fold one frame of input into the orbit state.
    pub fn apply_input(&mut self, input: &InputSnapshot, dt: f32) {
        let c = &self.config;
        let s = &mut self.state;

        // Non-finite deltas would poison the state through clamp.
        if input.is_held(c.rotate_button) && input.pointer_delta.is_finite() {
            s.yaw += input.pointer_delta.x * c.rotation_speed * dt;
            s.pitch -= input.pointer_delta.y * c.rotation_speed * dt;
            s.pitch = s.pitch.clamp(c.min_pitch, c.max_pitch);
        }

        if c.keyboard_rotation {
            let step = c.key_rotation_speed * dt;
            if input.any_key_held(&YAW_LEFT) {
                s.yaw -= step;
            }
            if input.any_key_held(&YAW_RIGHT) {
                s.yaw += step;
            }
            if input.any_key_held(&PITCH_UP) {
                s.pitch += step;
            }
            if input.any_key_held(&PITCH_DOWN) {
                s.pitch -= step;
            }
        }

        s.pitch = s.pitch.clamp(c.min_pitch, c.max_pitch);
        s.yaw = wrap_degrees(s.yaw);

        if input.scroll.is_finite() {
            s.zoom -= input.scroll * c.scroll_scale * c.zoom_speed;
        }
        s.zoom = s.zoom.clamp(c.min_zoom, c.max_zoom);
    }

    /// Apply input and place `camera` on the orbit around `target`.
    ///
    /// Returns `None` and leaves everything untouched when there is no target.
    pub fn late_update(
        &mut self,
        input: &InputSnapshot,
        dt: f32,
        target: Option<Vec3>,
        camera: &mut Transform,
    ) -> Option<OrbitState> {
        let target = target?;
        if !self.initialized {
            self.initialize(camera, Some(target));
        }
        self.apply_input(input, dt);
        let pose = self.state.pose(target);
        camera.position = pose.position;
        camera.rotation = pose.rotation;
        tracing::trace!(
            yaw = self.state.yaw,
            pitch = self.state.pitch,
            zoom = self.state.zoom,
            "orbit camera updated"
        );
        Some(self.state)
    }

    /// [`late_update`](Self::late_update) against scene entities. Only the
    /// camera entity's transform is written.
    pub fn late_update_in(
        &mut self,
        scene: &mut Scene,
        camera: EntityId,
        target: Option<EntityId>,
        input: &InputSnapshot,
        dt: f32,
    ) -> Option<OrbitState> {
        let target_pos = target
            .and_then(|id| scene.get(id))
            .map(|d| d.transform.position);
        let mut transform = scene.get(camera)?.transform;
        let state = self.late_update(input, dt, target_pos, &mut transform)?;
        scene.set_transform(camera, transform);
        Some(state)
    }
}

/// Wrap into `[0, 360)`.
fn wrap_degrees(deg: f32) -> f32 {
    let w = deg.rem_euclid(360.0);
    // rem_euclid rounds tiny negatives up to exactly 360.
    if w >= 360.0 { 0.0 } else { w }
}
