use augury_input::PointerButton;
use serde::{Deserialize, Serialize};

/// Errors from camera configuration.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid camera config: {0}")]
    Invalid(String),
}

/// Orbit camera tuning. Angles are in degrees, distances in world units.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    /// Button that must be held for pointer motion to rotate the camera.
    pub rotate_button: PointerButton,
    /// Degrees per unit of pointer motion per second.
    pub rotation_speed: f32,
    pub min_pitch: f32,
    pub max_pitch: f32,
    /// Arrow keys and WASD rotate the camera.
    pub keyboard_rotation: bool,
    /// Degrees per second while a rotation key is held.
    pub key_rotation_speed: f32,
    pub zoom_speed: f32,
    /// Scale applied to scroll lines before `zoom_speed`.
    pub scroll_scale: f32,
    pub min_zoom: f32,
    pub max_zoom: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            rotate_button: PointerButton::Middle,
            rotation_speed: 10.0,
            min_pitch: 10.0,
            max_pitch: 80.0,
            keyboard_rotation: true,
            key_rotation_speed: 15.0,
            zoom_speed: 10.0,
            scroll_scale: 0.12,
            min_zoom: 5.0,
            max_zoom: 30.0,
        }
    }
}

impl CameraConfig {
    /// Right-button rotation, no keyboard control.
    pub fn classic() -> Self {
        Self {
            rotate_button: PointerButton::Secondary,
            keyboard_rotation: false,
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !ordered(self.min_pitch, self.max_pitch) {
            return Err(ConfigError::Invalid(format!(
                "min_pitch {} exceeds max_pitch {}",
                self.min_pitch, self.max_pitch
            )));
        }
        if self.min_pitch < -90.0 || self.max_pitch > 90.0 {
            return Err(ConfigError::Invalid(
                "pitch bounds must lie within [-90, 90]".into(),
            ));
        }
        if !ordered(self.min_zoom, self.max_zoom) {
            return Err(ConfigError::Invalid(format!(
                "min_zoom {} exceeds max_zoom {}",
                self.min_zoom, self.max_zoom
            )));
        }
        if self.min_zoom <= 0.0 {
            return Err(ConfigError::Invalid("min_zoom must be positive".into()));
        }
        Ok(())
    }
}

/// `lo <= hi`, false when either is NaN.
fn ordered(lo: f32, hi: f32) -> bool {
    lo <= hi
}
