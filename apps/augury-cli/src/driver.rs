use std::collections::BTreeMap;
use std::sync::Arc;

use augury_camera::{OrbitCamera, OrbitState};
use augury_common::{CameraView, EntityId, Projection, Transform, Viewport};
use augury_input::{InputCollector, PointerButton, RawInput};
use augury_kernel::{EntityData, FrameClock, InteractionCounter, Scene, SteeringAgent};
use augury_nav::{MarkerLook, NavEvent, NavState, Navigator};
use glam::Vec3;
use serde::Serialize;

use crate::scenario::{Scenario, ScriptedInput};

/// Outcome of a scenario run.
#[derive(Debug, Serialize)]
pub struct Report {
    pub scenario: String,
    pub frames: u64,
    pub elapsed: f32,
    pub state: NavState,
    pub player: Vec3,
    pub camera: Option<OrbitState>,
    pub camera_distance: f32,
    pub interactions: BTreeMap<String, usize>,
    pub peak_markers: usize,
    pub scene_events: usize,
    pub nav_events: Vec<NavEvent>,
    pub failures: Vec<String>,
}

impl Report {
    pub fn passed(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Owns the scene and both controllers for one scenario.
///
/// Each frame runs input, navigator update, agent step, then the camera's
/// late update, so the camera always sees where the player ended up.
pub struct Driver {
    scene: Scene,
    clock: FrameClock,
    collector: InputCollector,
    camera: OrbitCamera,
    camera_id: EntityId,
    player: EntityId,
    navigator: Navigator,
    projection: Projection,
    viewport: Viewport,
    names: BTreeMap<String, EntityId>,
    counters: BTreeMap<String, Arc<InteractionCounter>>,
    marker_name: String,
    release_primary: bool,
    peak_markers: usize,
    scene_events: usize,
    nav_events: Vec<NavEvent>,
    last_camera: Option<OrbitState>,
}

impl Driver {
    pub fn new(scenario: &Scenario) -> anyhow::Result<Self> {
        let mut scene = Scene::new();
        let mut names = BTreeMap::new();
        let mut counters = BTreeMap::new();
        for e in &scenario.entities {
            let id = scene.spawn(
                EntityData::new(Transform::from_position(e.position))
                    .named(e.name.clone())
                    .on_layer(e.layer)
                    .with_collider(e.collider),
            );
            if e.interactable {
                let counter = Arc::new(InteractionCounter::new(e.name.clone()));
                scene.attach_interactable(id, counter.clone())?;
                counters.insert(e.name.clone(), counter);
            }
            names.insert(e.name.clone(), id);
        }

        let p = &scenario.player;
        let player_pos = p.position + Vec3::Y * p.base_offset;
        let player = scene.spawn(EntityData::new(Transform::from_position(player_pos)).named("player"));
        scene.attach_agent(
            player,
            SteeringAgent::new(p.position, p.speed).with_base_offset(p.base_offset),
        )?;

        let mut camera_transform = Transform::from_position(scenario.camera.position);
        camera_transform.look_at(player_pos, Vec3::Y);
        let camera_id = scene.spawn(EntityData::new(camera_transform).named("camera"));
        let camera = OrbitCamera::new(scenario.camera.config.clone())?;

        let navigator = Navigator::start(scenario.navigator.clone(), player, &mut scene)?;
        let marker_name = MarkerLook::resolve(scenario.navigator.marker_prefab.as_ref()).name;
        tracing::debug!(
            entities = scene.entity_count(),
            interactables = counters.len(),
            "scenario scene built"
        );

        Ok(Self {
            scene,
            clock: FrameClock::new(),
            collector: InputCollector::new(),
            camera,
            camera_id,
            player,
            navigator,
            projection: scenario.camera.projection,
            viewport: scenario.camera.viewport,
            names,
            counters,
            marker_name,
            release_primary: false,
            peak_markers: 0,
            scene_events: 0,
            nav_events: Vec::new(),
            last_camera: None,
        })
    }

    pub fn run(&mut self, scenario: &Scenario) -> anyhow::Result<Report> {
        let _span = tracing::info_span!("scenario", name = %scenario.name).entered();
        for frame in 0..scenario.frames {
            self.feed(scenario.input.iter().filter(|s| s.frame == frame));
            self.frame(scenario.dt)?;
        }
        let report = self.report(scenario);
        tracing::info!(
            frames = report.frames,
            state = ?report.state,
            failures = report.failures.len(),
            "scenario finished"
        );
        Ok(report)
    }

    fn view(&self) -> CameraView {
        CameraView {
            transform: self
                .scene
                .get(self.camera_id)
                .map(|d| d.transform)
                .unwrap_or_default(),
            projection: self.projection,
            viewport: self.viewport,
        }
    }

    fn feed<'a>(&mut self, steps: impl Iterator<Item = &'a ScriptedInput>) {
        if std::mem::take(&mut self.release_primary) {
            self.collector.process(RawInput::Button {
                button: PointerButton::Primary,
                pressed: false,
            });
        }
        for step in steps {
            for event in &step.events {
                self.collector.process(*event);
            }
            let aim = step.click_point.or_else(|| {
                step.click_entity
                    .as_ref()
                    .and_then(|name| self.names.get(name))
                    .and_then(|id| self.scene.get(*id))
                    .map(|d| d.transform.position)
            });
            let Some(world) = aim else {
                continue;
            };
            let Some(screen) = self.view().screen_point_of(world) else {
                tracing::warn!(frame = step.frame, "click target is behind the camera, skipped");
                continue;
            };
            self.collector.process(RawInput::PointerMoved {
                x: screen.x,
                y: screen.y,
            });
            self.collector.process(RawInput::Button {
                button: PointerButton::Primary,
                pressed: true,
            });
            self.release_primary = !step.hold;
        }
    }

    fn frame(&mut self, dt: f32) -> anyhow::Result<()> {
        let input = self.collector.snapshot();
        let time = self.clock.begin_frame(dt);
        let view = self.view();

        self.navigator
            .update(&mut self.scene, &input, &view, &time)?;
        self.scene.step(time.delta);
        if let Some(state) = self.camera.late_update_in(
            &mut self.scene,
            self.camera_id,
            Some(self.player),
            &input,
            time.delta,
        ) {
            self.last_camera = Some(state);
        }

        self.nav_events.extend(self.navigator.drain_events());
        self.scene_events += self.scene.drain_events().len();
        self.peak_markers = self.peak_markers.max(self.marker_count());
        self.collector.end_frame();
        self.clock.end_frame();
        Ok(())
    }

    fn marker_count(&self) -> usize {
        self.scene
            .entities()
            .values()
            .filter(|d| d.name.as_deref() == Some(self.marker_name.as_str()))
            .count()
    }

    fn position_of(&self, id: EntityId) -> Vec3 {
        self.scene
            .get(id)
            .map(|d| d.transform.position)
            .unwrap_or_default()
    }

    fn report(&self, scenario: &Scenario) -> Report {
        let player = self.position_of(self.player);
        let camera_distance = self.position_of(self.camera_id).distance(player);
        let interactions: BTreeMap<String, usize> = self
            .counters
            .iter()
            .map(|(name, c)| (name.clone(), c.count()))
            .collect();

        let mut failures = Vec::new();
        let expect = &scenario.expect;
        if let Some(state) = expect.state {
            if state != self.navigator.state() {
                failures.push(format!(
                    "navigator is {:?}, expected {state:?}",
                    self.navigator.state()
                ));
            }
        }
        if let Some(at) = expect.player_at {
            let off = player.distance(at);
            if off > expect.tolerance {
                failures.push(format!("player at {player}, {off:.3} from expected {at}"));
            }
        }
        for (name, want) in &expect.interactions {
            match interactions.get(name) {
                Some(got) if got == want => {}
                Some(got) => failures.push(format!("{name} interacted {got} times, expected {want}")),
                None => failures.push(format!("no interactable named {name:?}")),
            }
        }
        if let Some(cam) = self.last_camera {
            if (camera_distance - cam.zoom).abs() > 1e-2 {
                failures.push(format!(
                    "camera is {camera_distance:.3} from the player, zoom is {:.3}",
                    cam.zoom
                ));
            }
        }
        if self.peak_markers > 1 {
            failures.push(format!("{} markers alive at once", self.peak_markers));
        }

        Report {
            scenario: scenario.name.clone(),
            frames: scenario.frames,
            elapsed: self.clock.now().elapsed,
            state: self.navigator.state(),
            player,
            camera: self.last_camera,
            camera_distance,
            interactions,
            peak_markers: self.peak_markers,
            scene_events: self.scene_events,
            nav_events: self.nav_events.clone(),
            failures,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scenario::{EntitySetup, Expectations};
    use augury_common::Layer;
    use augury_kernel::Collider;

    fn ground() -> EntitySetup {
        EntitySetup {
            name: "ground".into(),
            position: Vec3::new(0.0, -0.5, 0.0),
            layer: Layer::new(6).unwrap(),
            collider: Collider::Box {
                half_extents: [50.0, 0.5, 50.0],
            },
            interactable: false,
        }
    }

    fn chest(at: Vec3) -> EntitySetup {
        EntitySetup {
            name: "chest".into(),
            position: at,
            layer: Layer::new(7).unwrap(),
            collider: Collider::default(),
            interactable: true,
        }
    }

    #[test]
    fn click_walks_player_and_camera_follows() {
        let scenario = Scenario {
            frames: 120,
            entities: vec![ground()],
            input: vec![ScriptedInput {
                frame: 1,
                click_point: Some(Vec3::new(4.0, 0.0, 3.0)),
                ..ScriptedInput::default()
            }],
            expect: Expectations {
                state: Some(NavState::Idle),
                player_at: Some(Vec3::new(4.0, 1.0, 3.0)),
                ..Expectations::default()
            },
            ..Scenario::default()
        };
        let mut driver = Driver::new(&scenario).unwrap();
        let report = driver.run(&scenario).unwrap();
        assert!(report.passed(), "{:?}", report.failures);
        assert!(report.camera.is_some());
        assert!(report.peak_markers <= 1);
        assert!(
            report
                .nav_events
                .iter()
                .any(|e| matches!(e, NavEvent::Arrived { .. }))
        );
    }

    #[test]
    fn clicking_chest_interacts_once() {
        let scenario = Scenario {
            frames: 150,
            entities: vec![ground(), chest(Vec3::new(-3.0, 0.5, 2.0))],
            input: vec![ScriptedInput {
                frame: 0,
                click_entity: Some("chest".into()),
                ..ScriptedInput::default()
            }],
            expect: Expectations {
                state: Some(NavState::Idle),
                interactions: [("chest".to_string(), 1)].into_iter().collect(),
                ..Expectations::default()
            },
            ..Scenario::default()
        };
        let mut driver = Driver::new(&scenario).unwrap();
        let report = driver.run(&scenario).unwrap();
        assert!(report.passed(), "{:?}", report.failures);
    }

    #[test]
    fn failed_expectations_are_reported() {
        let scenario = Scenario {
            frames: 5,
            entities: vec![ground()],
            expect: Expectations {
                state: Some(NavState::Moving),
                interactions: [("door".to_string(), 1)].into_iter().collect(),
                ..Expectations::default()
            },
            ..Scenario::default()
        };
        let mut driver = Driver::new(&scenario).unwrap();
        let report = driver.run(&scenario).unwrap();
        assert_eq!(report.failures.len(), 2);
        assert!(report.elapsed > 0.0);
        assert!(report.scene_events >= 5);
    }
}
