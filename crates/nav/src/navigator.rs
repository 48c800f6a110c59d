use std::sync::Arc;

use augury_common::{CameraView, EntityId, Ray};
use augury_input::{InputSnapshot, PointerButton};
use augury_kernel::{Interactable, Time};
use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::config::{ConfigError, NavConfig, NavTier};
use crate::host::{MarkerSpawn, NavHost};
use crate::marker::{LiveMarker, MarkerLook, pulse_scale};

/// Errors from the navigator.
#[derive(Debug, thiserror::Error)]
pub enum NavError {
    #[error("entity {0:?} has no navigation agent")]
    MissingAgent(EntityId),
    #[error("navigation agent on {0:?} went away")]
    AgentDetached(EntityId),
    #[error(transparent)]
    Config(#[from] ConfigError),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NavState {
    #[default]
    Idle,
    Moving,
}

/// A destination produced by a click.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct NavRequest {
    pub destination: Vec3,
    /// The click struck the interactable layers.
    pub is_interaction_target: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MarkerRemoval {
    Arrived,
    Replaced,
    Expired,
}

/// Record of what the navigator did, drained by the host.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum NavEvent {
    MoveIssued { request: NavRequest },
    MarkerSpawned { marker: EntityId, position: Vec3 },
    MarkerDestroyed { marker: EntityId, reason: MarkerRemoval },
    Arrived { destination: Vec3 },
    Interacted { target: EntityId },
    /// A newer click replaced the interaction before the agent arrived.
    InteractionAbandoned { target: EntityId },
}

struct PendingInteraction {
    target: EntityId,
    handle: Arc<dyn Interactable>,
}

/// What a click resolved to.
struct Pick {
    request: NavRequest,
    interaction: Option<PendingInteraction>,
}

/// Point-and-click controller for one agent-carrying entity.
pub struct Navigator {
    owner: EntityId,
    config: NavConfig,
    look: MarkerLook,
    state: NavState,
    destination: Option<Vec3>,
    marker: Option<LiveMarker>,
    pending: Option<PendingInteraction>,
    events: Vec<NavEvent>,
}

impl Navigator {
    /// Bind to the agent on `owner` and hand it the configured stopping
    /// distance. Fails if `owner` has no agent.
    pub fn start<H: NavHost + ?Sized>(
        config: NavConfig,
        owner: EntityId,
        host: &mut H,
    ) -> Result<Self, NavError> {
        config.validate()?;
        let Some(agent) = host.nav_agent(owner) else {
            tracing::error!(owner = %owner.short(), "navigator needs a navigation agent");
            return Err(NavError::MissingAgent(owner));
        };
        agent.set_stopping_distance(config.stopping_distance);

        if config.tier == NavTier::Enhanced && config.marker_prefab.is_none() {
            tracing::warn!("no destination marker prefab configured, using fallback marker");
        }
        let look = MarkerLook::resolve(config.marker_prefab.as_ref());
        tracing::debug!(owner = %owner.short(), tier = ?config.tier, "navigator started");

        Ok(Self {
            owner,
            config,
            look,
            state: NavState::Idle,
            destination: None,
            marker: None,
            pending: None,
            events: Vec::new(),
        })
    }

    pub fn owner(&self) -> EntityId {
        self.owner
    }

    pub fn config(&self) -> &NavConfig {
        &self.config
    }

    pub fn state(&self) -> NavState {
        self.state
    }

    pub fn is_moving(&self) -> bool {
        self.state == NavState::Moving
    }

    /// Last destination handed to the agent.
    pub fn destination(&self) -> Option<Vec3> {
        self.destination
    }

    pub fn marker(&self) -> Option<EntityId> {
        self.marker.map(|m| m.id)
    }

    /// Entity whose interaction fires on arrival, if any.
    pub fn pending_interaction(&self) -> Option<EntityId> {
        self.pending.as_ref().map(|p| p.target)
    }

    pub fn events(&self) -> &[NavEvent] {
        &self.events
    }

    pub fn drain_events(&mut self) -> Vec<NavEvent> {
        std::mem::take(&mut self.events)
    }

    /// One frame: pick a destination if the pointer clicked, then check for
    /// arrival and animate the marker.
    pub fn update<H: NavHost + ?Sized>(
        &mut self,
        host: &mut H,
        input: &InputSnapshot,
        view: &CameraView,
        time: &Time,
    ) -> Result<NavState, NavError> {
        let _span = tracing::debug_span!("nav_update", frame = time.frame).entered();
        if self.clicked(input) {
            let ray = view.pointer_ray(input.pointer_position);
            self.click(host, &ray, time)?;
        }
        self.tick(host, time)
    }

    /// Resolve a click ray and, on a hit, send the agent there.
    pub fn click<H: NavHost + ?Sized>(
        &mut self,
        host: &mut H,
        ray: &Ray,
        time: &Time,
    ) -> Result<Option<NavRequest>, NavError> {
        let Some(pick) = self.pick(host, ray) else {
            tracing::trace!("click hit nothing");
            return Ok(None);
        };
        let request = pick.request;

        host.nav_agent(self.owner)
            .ok_or(NavError::AgentDetached(self.owner))?
            .set_destination(request.destination);
        if self.state == NavState::Idle {
            tracing::debug!(destination = ?request.destination, "idle -> moving");
        }
        self.state = NavState::Moving;
        self.destination = Some(request.destination);
        self.events.push(NavEvent::MoveIssued { request });

        self.replace_interaction(pick.interaction);
        if self.config.tier == NavTier::Enhanced {
            self.replace_marker(host, request.destination, time);
        }
        Ok(Some(request))
    }

    /// Arrival check and marker upkeep, without reading input.
    pub fn tick<H: NavHost + ?Sized>(
        &mut self,
        host: &mut H,
        time: &Time,
    ) -> Result<NavState, NavError> {
        if self.state == NavState::Moving {
            let agent = host
                .nav_agent(self.owner)
                .ok_or(NavError::AgentDetached(self.owner))?;
            let arrived =
                !agent.path_pending() && agent.remaining_distance() <= agent.stopping_distance();
            if arrived {
                self.arrive(host);
            }
        }
        self.animate_marker(host, time);
        Ok(self.state)
    }

    fn clicked(&self, input: &InputSnapshot) -> bool {
        input.was_pressed(PointerButton::Primary)
            || (self.config.hold_to_move && input.is_held(PointerButton::Primary))
    }

    fn pick<H: NavHost + ?Sized>(&self, host: &H, ray: &Ray) -> Option<Pick> {
        let max = self.config.max_ray_distance;
        match self.config.tier {
            NavTier::Basic => {
                let mask = self.config.walkable_layers | self.config.interactable_layers;
                let hit = host.raycast(ray, max, mask)?;
                Some(Pick {
                    request: NavRequest {
                        destination: hit.point,
                        is_interaction_target: self.config.interactable_layers.contains(hit.layer),
                    },
                    interaction: None,
                })
            }
            NavTier::Enhanced => {
                if let Some(hit) = host.raycast(ray, max, self.config.interactable_layers) {
                    let interaction = host
                        .interactable(hit.entity)
                        .map(|handle| PendingInteraction {
                            target: hit.entity,
                            handle,
                        });
                    return Some(Pick {
                        request: NavRequest {
                            destination: hit.point,
                            is_interaction_target: true,
                        },
                        interaction,
                    });
                }
                let hit = host.raycast(ray, max, self.config.walkable_layers)?;
                Some(Pick {
                    request: NavRequest {
                        destination: hit.point,
                        is_interaction_target: false,
                    },
                    interaction: None,
                })
            }
        }
    }

    fn replace_interaction(&mut self, next: Option<PendingInteraction>) {
        let next_target = next.as_ref().map(|p| p.target);
        if let Some(old) = self.pending.take() {
            if Some(old.target) != next_target {
                tracing::debug!(target_entity = %old.target.short(), "interaction abandoned");
                self.events
                    .push(NavEvent::InteractionAbandoned { target: old.target });
            }
        }
        if let Some(p) = &next {
            tracing::debug!(
                target_entity = %p.target.short(),
                label = p.handle.label(),
                "interaction scheduled"
            );
        }
        self.pending = next;
    }

    fn replace_marker<H: NavHost + ?Sized>(&mut self, host: &mut H, at: Vec3, time: &Time) {
        self.remove_marker(host, MarkerRemoval::Replaced);
        let position = at + Vec3::Y * self.look.y_offset;
        let id = host.spawn_marker(&MarkerSpawn {
            name: self.look.name.clone(),
            position,
            scale: self.look.scale,
            tint: self.look.tint,
        });
        self.marker = Some(LiveMarker {
            id,
            base_scale: self.look.scale,
            spawned_at: time.elapsed,
        });
        self.events.push(NavEvent::MarkerSpawned {
            marker: id,
            position,
        });
    }

    fn remove_marker<H: NavHost + ?Sized>(&mut self, host: &mut H, reason: MarkerRemoval) {
        let Some(marker) = self.marker.take() else {
            return;
        };
        if !host.despawn_marker(marker.id) {
            tracing::debug!(
                marker = %marker.id.short(),
                ?reason,
                "marker already gone from host"
            );
            return;
        }
        tracing::trace!(marker = %marker.id.short(), ?reason, "marker removed");
        self.events.push(NavEvent::MarkerDestroyed {
            marker: marker.id,
            reason,
        });
    }

    fn arrive<H: NavHost + ?Sized>(&mut self, host: &mut H) {
        self.state = NavState::Idle;
        let destination = self.destination.unwrap_or_default();
        tracing::debug!(?destination, "moving -> idle");
        self.events.push(NavEvent::Arrived { destination });
        self.remove_marker(host, MarkerRemoval::Arrived);
        if let Some(p) = self.pending.take() {
            p.handle.interact();
            self.events.push(NavEvent::Interacted { target: p.target });
        }
    }

    fn animate_marker<H: NavHost + ?Sized>(&mut self, host: &mut H, time: &Time) {
        let Some(marker) = self.marker else {
            return;
        };
        if self.state != NavState::Moving {
            self.remove_marker(host, MarkerRemoval::Arrived);
            return;
        }
        if let Some(limit) = self.config.marker_duration {
            if marker.age(time.elapsed) >= limit {
                self.remove_marker(host, MarkerRemoval::Expired);
                return;
            }
        }
        let scale = pulse_scale(
            marker.base_scale,
            self.config.pulse_amplitude,
            self.config.pulse_frequency,
            time.elapsed,
        );
        host.set_marker_scale(marker.id, scale);
    }
}
