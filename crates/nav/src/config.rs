use augury_common::LayerMask;
use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Conventional mask for ground the agent can walk on (layer 6).
pub const WALKABLE_LAYERS: LayerMask = LayerMask(1 << 6);
/// Conventional mask for things that can be clicked to interact with (layer 7).
pub const INTERACTABLE_LAYERS: LayerMask = LayerMask(1 << 7);

/// Errors from navigator configuration.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid navigator config: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NavTier {
    /// One raycast over both layer sets, destination only.
    Basic,
    /// Layered raycast, interactions and destination marker.
    #[default]
    Enhanced,
}

/// What a destination marker looks like when spawned.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MarkerPrefab {
    pub name: String,
    pub scale: Vec3,
    /// Lift above the hit point.
    pub y_offset: f32,
    pub tint: Option<[f32; 4]>,
}

impl Default for MarkerPrefab {
    fn default() -> Self {
        Self {
            name: "destination_marker".into(),
            scale: Vec3::ONE,
            y_offset: 0.0,
            tint: None,
        }
    }
}

/// Navigator tuning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NavConfig {
    pub tier: NavTier,
    /// Handed to the agent at start.
    pub stopping_distance: f32,
    pub walkable_layers: LayerMask,
    pub interactable_layers: LayerMask,
    pub max_ray_distance: f32,
    /// Holding the primary button keeps re-issuing the destination.
    pub hold_to_move: bool,
    /// `None` falls back to a flat tinted disc.
    pub marker_prefab: Option<MarkerPrefab>,
    /// Optional cap, in seconds, on how long a marker lives while the agent
    /// is still moving. `None` keeps it until arrival or the next click.
    pub marker_duration: Option<f32>,
    /// Fraction of the base scale the pulse adds or removes, in `[0, 1)`.
    pub pulse_amplitude: f32,
    /// Radians per second of the pulse.
    pub pulse_frequency: f32,
}

impl Default for NavConfig {
    fn default() -> Self {
        Self {
            tier: NavTier::Enhanced,
            stopping_distance: 0.1,
            walkable_layers: WALKABLE_LAYERS,
            interactable_layers: INTERACTABLE_LAYERS,
            max_ray_distance: 100.0,
            hold_to_move: true,
            marker_prefab: None,
            marker_duration: None,
            pulse_amplitude: 0.2,
            pulse_frequency: 5.0,
        }
    }
}

impl NavConfig {
    /// Single click, single raycast, no marker.
    pub fn basic() -> Self {
        Self {
            tier: NavTier::Basic,
            hold_to_move: false,
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.stopping_distance.is_nan() || self.stopping_distance < 0.0 {
            return Err(ConfigError::Invalid(format!(
                "stopping_distance must be non-negative, got {}",
                self.stopping_distance
            )));
        }
        if self.max_ray_distance.is_nan() || self.max_ray_distance <= 0.0 {
            return Err(ConfigError::Invalid(format!(
                "max_ray_distance must be positive, got {}",
                self.max_ray_distance
            )));
        }
        if let Some(d) = self.marker_duration {
            if d.is_nan() || d <= 0.0 {
                return Err(ConfigError::Invalid(format!(
                    "marker_duration must be positive, got {d}"
                )));
            }
        }
        if !(0.0..1.0).contains(&self.pulse_amplitude) {
            return Err(ConfigError::Invalid(format!(
                "pulse_amplitude must be in [0, 1), got {}",
                self.pulse_amplitude
            )));
        }
        if !self.pulse_frequency.is_finite() {
            return Err(ConfigError::Invalid(format!(
                "pulse_frequency must be finite, got {}",
                self.pulse_frequency
            )));
        }
        if (self.walkable_layers | self.interactable_layers).is_empty() {
            return Err(ConfigError::Invalid(
                "walkable and interactable layers are both empty".into(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use augury_common::Layer;

    #[test]
    fn defaults_are_valid() {
        let c = NavConfig::default();
        assert!(c.validate().is_ok());
        assert_eq!(c.tier, NavTier::Enhanced);
        assert_eq!(c.max_ray_distance, 100.0);
        assert_eq!(c.marker_duration, None);
        let capped = NavConfig {
            marker_duration: Some(1.5),
            ..NavConfig::default()
        };
        assert!(capped.validate().is_ok());
        assert!(NavConfig::basic().validate().is_ok());
    }

    #[test]
    fn basic_preset_is_click_only() {
        let c = NavConfig::basic();
        assert_eq!(c.tier, NavTier::Basic);
        assert!(!c.hold_to_move);
    }

    #[test]
    fn rejects_bad_values() {
        let bad = [
            NavConfig {
                stopping_distance: -0.5,
                ..NavConfig::default()
            },
            NavConfig {
                max_ray_distance: 0.0,
                ..NavConfig::default()
            },
            NavConfig {
                marker_duration: Some(f32::NAN),
                ..NavConfig::default()
            },
            NavConfig {
                marker_duration: Some(0.0),
                ..NavConfig::default()
            },
            NavConfig {
                pulse_amplitude: 1.5,
                ..NavConfig::default()
            },
            NavConfig {
                pulse_amplitude: -0.1,
                ..NavConfig::default()
            },
            NavConfig {
                pulse_amplitude: f32::NAN,
                ..NavConfig::default()
            },
            NavConfig {
                pulse_frequency: f32::INFINITY,
                ..NavConfig::default()
            },
            NavConfig {
                walkable_layers: LayerMask::NONE,
                interactable_layers: LayerMask::NONE,
                ..NavConfig::default()
            },
        ];
        for c in bad {
            assert!(c.validate().is_err(), "{c:?}");
        }
    }

    #[test]
    fn yaml_overrides_layers_and_prefab() {
        let c: NavConfig = serde_yaml::from_str(
            "tier: basic\nwalkable_layers: [0, 6]\nmarker_prefab:\n  name: ring\n  scale: [2.0, 0.1, 2.0]\n",
        )
        .unwrap();
        assert_eq!(c.tier, NavTier::Basic);
        assert!(c.walkable_layers.contains(Layer::DEFAULT));
        assert!(c.walkable_layers.contains(Layer::new(6).unwrap()));
        assert!(!c.walkable_layers.contains(Layer::new(7).unwrap()));
        let prefab = c.marker_prefab.unwrap();
        assert_eq!(prefab.name, "ring");
        assert_eq!(prefab.scale, Vec3::new(2.0, 0.1, 2.0));
        assert_eq!(c.stopping_distance, 0.1);
    }
}
