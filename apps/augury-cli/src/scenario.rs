use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use anyhow::Context;
use augury_camera::CameraConfig;
use augury_common::{Layer, Projection, Viewport};
use augury_input::RawInput;
use augury_kernel::Collider;
use augury_nav::{NavConfig, NavState};
use glam::Vec3;
use serde::Deserialize;

/// A scenario file: scene layout, controller configs and scripted input.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Scenario {
    pub name: String,
    /// Seconds per frame.
    pub dt: f32,
    pub frames: u64,
    pub camera: CameraSetup,
    pub navigator: NavConfig,
    pub player: PlayerSetup,
    pub entities: Vec<EntitySetup>,
    pub input: Vec<ScriptedInput>,
    pub expect: Expectations,
}

impl Default for Scenario {
    fn default() -> Self {
        Self {
            name: "unnamed".into(),
            dt: 1.0 / 30.0,
            frames: 300,
            camera: CameraSetup::default(),
            navigator: NavConfig::default(),
            player: PlayerSetup::default(),
            entities: Vec::new(),
            input: Vec::new(),
            expect: Expectations::default(),
        }
    }
}

impl Scenario {
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?;
        let scenario: Scenario = serde_yaml::from_str(&text)
            .with_context(|| format!("parsing {}", path.display()))?;
        scenario.validate()?;
        Ok(scenario)
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        anyhow::ensure!(self.dt > 0.0, "dt must be positive, got {}", self.dt);
        self.camera.config.validate()?;
        self.navigator.validate()?;
        let mut seen = BTreeSet::new();
        for e in &self.entities {
            anyhow::ensure!(
                seen.insert(e.name.as_str()),
                "duplicate entity name {:?}",
                e.name
            );
        }
        for step in &self.input {
            if let Some(name) = &step.click_entity {
                anyhow::ensure!(
                    seen.contains(name.as_str()),
                    "frame {} clicks unknown entity {name:?}",
                    step.frame
                );
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CameraSetup {
    pub config: CameraConfig,
    pub position: Vec3,
    pub projection: Projection,
    pub viewport: Viewport,
}

impl Default for CameraSetup {
    fn default() -> Self {
        Self {
            config: CameraConfig::default(),
            position: Vec3::new(0.0, 10.0, -10.0),
            projection: Projection::default(),
            viewport: Viewport::default(),
        }
    }
}

/// The agent-carrying entity the camera follows.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PlayerSetup {
    /// Position of the agent's base.
    pub position: Vec3,
    pub speed: f32,
    pub base_offset: f32,
}

impl Default for PlayerSetup {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            speed: 3.5,
            base_offset: 1.0,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct EntitySetup {
    pub name: String,
    pub position: Vec3,
    #[serde(default)]
    pub layer: Layer,
    #[serde(default)]
    pub collider: Collider,
    /// Attach an interaction counter.
    #[serde(default)]
    pub interactable: bool,
}

/// Input delivered at the start of `frame`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ScriptedInput {
    pub frame: u64,
    pub events: Vec<RawInput>,
    /// Move the pointer over this world point and press the primary button.
    pub click_point: Option<Vec3>,
    /// Same as `click_point`, aimed at a named entity's position.
    pub click_entity: Option<String>,
    /// Keep the primary button down after a click.
    pub hold: bool,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Expectations {
    pub state: Option<NavState>,
    pub player_at: Option<Vec3>,
    pub tolerance: f32,
    /// Interaction count per entity name.
    pub interactions: BTreeMap<String, usize>,
}

impl Default for Expectations {
    fn default() -> Self {
        Self {
            state: None,
            player_at: None,
            tolerance: 0.2,
            interactions: BTreeMap::new(),
        }
    }
}
