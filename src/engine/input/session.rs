// Per-player input state bound to a fixed set of devices

use super::device::DeviceId;
use super::event::{ActionEvent, ActionPhase};
use glam::Vec2;
use std::collections::BTreeSet;

/// Input state for one joined player.
///
/// A session only listens to the devices it was bound to when the player
/// joined. Events from any other device are dropped. `H` is the handle of the
/// entity spawned for this player.
#[derive(Debug)]
pub struct PlayerInputSession<H> {
    /// Slot index in the player table
    player_index: usize,

    /// Devices this session owns exclusively
    bound_devices: BTreeSet<DeviceId>,

    /// Spawned player entity
    entity: H,

    /// Current movement input
    movement: Vec2,

    /// Whether fire is held
    is_firing: bool,
}

impl<H> PlayerInputSession<H> {
    pub(crate) fn new(player_index: usize, bound_devices: BTreeSet<DeviceId>, entity: H) -> Self {
        Self {
            player_index,
            bound_devices,
            entity,
            movement: Vec2::ZERO,
            is_firing: false,
        }
    }

    pub fn player_index(&self) -> usize {
        self.player_index
    }

    pub fn bound_devices(&self) -> &BTreeSet<DeviceId> {
        &self.bound_devices
    }

    /// Check if this session listens to a device
    pub fn owns(&self, device: DeviceId) -> bool {
        self.bound_devices.contains(&device)
    }

    pub fn entity(&self) -> &H {
        &self.entity
    }

    pub fn movement(&self) -> Vec2 {
        self.movement
    }

    pub fn is_firing(&self) -> bool {
        self.is_firing
    }

    /// Handle a fire event
    pub fn on_fire(&mut self, source: DeviceId, phase: ActionPhase, pressed: bool) {
        if !self.owns(source) {
            return;
        }

        self.is_firing = phase.is_active() && pressed;
    }

    /// Handle a move event
    pub fn on_move(&mut self, source: DeviceId, phase: ActionPhase, value: Vec2) {
        if !self.owns(source) {
            return;
        }

        self.movement = if phase.is_active() { value } else { Vec2::ZERO };
    }

    /// Route an action event to the matching handler
    pub fn dispatch(&mut self, event: ActionEvent) {
        match event {
            ActionEvent::Fire {
                device,
                phase,
                pressed,
            } => self.on_fire(device, phase, pressed),
            ActionEvent::Move {
                device,
                phase,
                value,
            } => self.on_move(device, phase, value),
        }
    }

    /// Distance the player's entity travels over `dt` seconds
    pub fn displacement(&self, speed: f32, dt: f32) -> Vec2 {
        self.movement * (speed * dt)
    }

    /// Start listening to another device
    pub(crate) fn bind(&mut self, device: DeviceId) {
        self.bound_devices.insert(device);
    }

    /// Consume the session, handing back its entity
    pub(crate) fn into_entity(self) -> H {
        self.entity
    }
}
