// Host-facing entry point: lifecycle, signal dispatch and per-tick update

use super::config::{AssignmentConfig, ConfigError};
use super::device::{Device, DeviceChange, DeviceDirectory, DeviceId};
use super::event::InputSignal;
use super::registry::DeviceAssignmentRegistry;
use super::session::PlayerInputSession;
use crate::engine::entity::EntitySpawner;
use log::{debug, info, warn};

/// Owns the device directory, the assignment registry and the spawner, and
/// turns host signals into joins, leaves and player input.
///
/// Signals are only processed between [`start`](Self::start) and
/// [`stop`](Self::stop). Stopping keeps joined players; use
/// [`shutdown`](Self::shutdown) to remove them.
pub struct InputRouter<S: EntitySpawner> {
    config: AssignmentConfig,
    directory: DeviceDirectory,
    registry: DeviceAssignmentRegistry<S::Handle>,
    spawner: S,
    running: bool,
}

impl<S: EntitySpawner> InputRouter<S> {
    pub fn new(config: AssignmentConfig, spawner: S) -> Result<Self, ConfigError> {
        config.validate()?;

        Ok(Self {
            config,
            directory: DeviceDirectory::new(),
            registry: DeviceAssignmentRegistry::new(config.max_players, config.move_speed),
            spawner,
            running: false,
        })
    }

    /// Begin reacting to signals
    pub fn start(&mut self) {
        if !self.running {
            self.running = true;
            info!(
                "Input router started ({} player slots)",
                self.config.max_players
            );
        }
    }

    /// Stop reacting to signals
    pub fn stop(&mut self) {
        if self.running {
            self.running = false;
            info!("Input router stopped");
        }
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Stop and remove every player. Returns how many players left.
    pub fn shutdown(&mut self) -> usize {
        self.stop();
        let count = self.registry.leave_all(&mut self.spawner);
        if count > 0 {
            info!("Removed {} player(s) on shutdown", count);
        }
        count
    }

    /// Process one host signal
    pub fn handle(&mut self, signal: InputSignal) {
        if !self.running {
            debug!("Ignoring {:?} while stopped", signal);
            return;
        }

        match signal {
            InputSignal::DeviceDiscovered { device } => {
                debug!("Discovered {:?} device {}", device.kind, device.id);
                self.directory.register(device);
            }
            InputSignal::DeviceChanged { device, change } => self.on_device_changed(device, change),
            InputSignal::ButtonPressed { device } => self.on_button_pressed(device),
            InputSignal::Action(event) => {
                self.registry.dispatch(event);
            }
        }
    }

    /// Advance every joined player's entity by `dt` seconds of input
    pub fn update(&mut self, dt: f32) {
        if self.running {
            self.registry.update(dt, &mut self.spawner);
        }
    }

    pub fn config(&self) -> &AssignmentConfig {
        &self.config
    }

    pub fn directory(&self) -> &DeviceDirectory {
        &self.directory
    }

    pub fn registry(&self) -> &DeviceAssignmentRegistry<S::Handle> {
        &self.registry
    }

    pub fn spawner(&self) -> &S {
        &self.spawner
    }

    /// Player in a slot
    pub fn player(&self, player_index: usize) -> Option<&PlayerInputSession<S::Handle>> {
        self.registry.session(player_index)
    }

    /// Player that owns a device
    pub fn player_for_device(&self, device: DeviceId) -> Option<&PlayerInputSession<S::Handle>> {
        self.registry
            .slot_of(device)
            .and_then(|index| self.registry.session(index))
    }

    /// All joined players in slot order
    pub fn players(&self) -> impl Iterator<Item = &PlayerInputSession<S::Handle>> {
        self.registry.sessions()
    }

    pub fn player_count(&self) -> usize {
        self.registry.player_count()
    }

    fn on_device_changed(&mut self, device: Device, change: DeviceChange) {
        debug!("Device {} ({:?}) {:?}", device.id, device.kind, change);

        if change.is_arrival() {
            self.directory.register(device);
            if self.registry.can_accept(device.id, &self.directory) {
                self.join(device);
            }
            return;
        }

        if let Some(player_index) = self.registry.leave(device.id, &mut self.spawner) {
            info!("Player {} removed: device {} {:?}", player_index, device.id, change);
        }
        if change == DeviceChange::Removed {
            self.directory.unregister(device.id);
        }
    }

    fn on_button_pressed(&mut self, device: Device) {
        if self.directory.get(device.id).is_none() {
            self.directory.register(device);
        }
        if self.registry.can_accept(device.id, &self.directory) {
            self.join(device);
        }
    }

    fn join(&mut self, device: Device) {
        match self
            .registry
            .try_join(device, &self.directory, &mut self.spawner)
        {
            Ok(outcome) => debug!("Device {} plays as player {}", device.id, outcome.player_index()),
            Err(err) => warn!("Join declined: {}", err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::input::event::ActionEvent;
    use approx::assert_relative_eq;
    use glam::Vec2;
    use std::collections::HashMap;

    /// Spawner that tracks live entity positions
    #[derive(Default)]
    struct Positions {
        next: u32,
        live: HashMap<u32, Vec2>,
    }

    impl EntitySpawner for Positions {
        type Handle = u32;

        fn spawn(&mut self, _player_index: usize) -> u32 {
            self.next += 1;
            self.live.insert(self.next, Vec2::ZERO);
            self.next
        }

        fn despawn(&mut self, handle: u32) {
            self.live.remove(&handle);
        }

        fn translate(&mut self, handle: &u32, delta: Vec2) {
            if let Some(position) = self.live.get_mut(handle) {
                *position += delta;
            }
        }
    }

    fn router(max_players: usize) -> InputRouter<Positions> {
        let config = AssignmentConfig::default().with_max_players(max_players);
        let mut router = InputRouter::new(config, Positions::default()).unwrap();
        router.start();
        router
    }

    fn plug(device: Device, change: DeviceChange) -> InputSignal {
        InputSignal::DeviceChanged { device, change }
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = AssignmentConfig::default().with_max_players(0);
        assert!(InputRouter::new(config, Positions::default()).is_err());
    }

    #[test]
    fn test_signals_ignored_until_started() {
        let config = AssignmentConfig::default();
        let mut router = InputRouter::new(config, Positions::default()).unwrap();
        assert!(!router.is_running());

        router.handle(plug(Device::gamepad(1), DeviceChange::Added));
        assert_eq!(router.player_count(), 0);
        assert!(router.directory().is_empty());

        router.start();
        router.handle(plug(Device::gamepad(1), DeviceChange::Added));
        assert_eq!(router.player_count(), 1);
    }

    #[test]
    fn test_hot_plug_join_and_leave() {
        let mut router = router(4);

        router.handle(plug(Device::gamepad(1), DeviceChange::Added));
        router.handle(plug(Device::gamepad(2), DeviceChange::Reconnected));
        assert_eq!(router.player_count(), 2);

        router.handle(plug(Device::gamepad(1), DeviceChange::Disconnected));
        assert_eq!(router.player_count(), 1);
        assert!(router.player_for_device(DeviceId(1)).is_none());
        // Disconnected devices stay known for a later reconnect
        assert!(router.directory().get(DeviceId(1)).is_some());

        router.handle(plug(Device::gamepad(2), DeviceChange::Removed));
        assert_eq!(router.player_count(), 0);
        assert!(router.directory().get(DeviceId(2)).is_none());
        assert!(router.spawner().live.is_empty());
    }

    #[test]
    fn test_enabled_and_disabled() {
        let mut router = router(4);
        router.handle(plug(Device::gamepad(5), DeviceChange::Enabled));
        assert_eq!(router.player(0).unwrap().player_index(), 0);

        router.handle(plug(Device::gamepad(5), DeviceChange::Disabled));
        assert!(router.player(0).is_none());
    }

    #[test]
    fn test_button_press_joins_unknown_device() {
        let mut router = router(4);
        router.handle(InputSignal::ButtonPressed {
            device: Device::gamepad(9),
        });

        assert_eq!(router.player_count(), 1);
        assert_eq!(router.directory().get(DeviceId(9)), Some(Device::gamepad(9)));
    }

    #[test]
    fn test_keyboard_press_pairs_known_mouse() {
        let mut router = router(4);
        router.handle(plug(Device::mouse(2), DeviceChange::Added));
        assert_eq!(router.player_count(), 1);

        router.handle(InputSignal::ButtonPressed {
            device: Device::keyboard(1),
        });

        // Mouse already owns slot 0, so the keyboard joins that player
        assert_eq!(router.player_count(), 1);
        let player = router.player(0).unwrap();
        assert!(player.owns(DeviceId(1)));
        assert!(player.owns(DeviceId(2)));
    }

    #[test]
    fn test_keyboard_and_mouse_join_as_one() {
        let mut router = router(2);
        router.handle(plug(Device::keyboard(1), DeviceChange::Added));
        // The keyboard joined alone, so the late mouse joins the same player
        router.handle(plug(Device::mouse(2), DeviceChange::Added));
        assert_eq!(router.player_count(), 1);
        assert!(router.registry().can_join());

        let mut router = router_with_pointer_pair();
        router.handle(InputSignal::ButtonPressed {
            device: Device::mouse(2),
        });
        assert_eq!(router.player_count(), 1);
        let player = router.player(0).unwrap();
        assert!(player.owns(DeviceId(1)));
        assert!(player.owns(DeviceId(2)));

        router.handle(plug(Device::keyboard(1), DeviceChange::Removed));
        assert_eq!(router.player_count(), 0);
        assert_eq!(router.directory().keyboard(), None);
        assert_eq!(router.directory().mouse(), Some(DeviceId(2)));
    }

    /// Router with a known keyboard and mouse but no players
    fn router_with_pointer_pair() -> InputRouter<Positions> {
        let mut router = router(1);
        router.handle(plug(Device::keyboard(1), DeviceChange::Added));
        router.handle(plug(Device::mouse(2), DeviceChange::Added));
        router.shutdown();
        router.start();
        router
    }

    #[test]
    fn test_key_before_mouse_activity_stays_one_player() {
        use crate::engine::input::WinitBridge;
        use winit::event::{ElementState, MouseButton};
        use winit::keyboard::KeyCode;

        let mut router = router(4);
        let mut bridge = WinitBridge::<u8>::new();
        let feed = |router: &mut InputRouter<Positions>, signals: Vec<InputSignal>| {
            for signal in signals {
                router.handle(signal);
            }
        };

        feed(&mut router, bridge.key_input(0, KeyCode::Space, ElementState::Pressed, false));
        assert_eq!(router.player_count(), 1);

        feed(&mut router, bridge.mouse_motion(1));
        feed(&mut router, bridge.mouse_input(1, MouseButton::Left, ElementState::Pressed));

        assert_eq!(router.player_count(), 1);
        let player = router.player(0).unwrap();
        assert!(player.owns(DeviceId(1)));
        assert!(player.owns(DeviceId(2)));
        assert!(player.is_firing());
    }

    #[test]
    fn test_discovery_registers_without_joining() {
        let mut router = router(2);
        router.handle(InputSignal::DeviceDiscovered {
            device: Device::mouse(2),
        });
        assert_eq!(router.player_count(), 0);
        assert_eq!(router.directory().mouse(), Some(DeviceId(2)));

        router.handle(InputSignal::ButtonPressed {
            device: Device::keyboard(1),
        });
        let player = router.player(0).unwrap();
        assert!(player.owns(DeviceId(1)));
        assert!(player.owns(DeviceId(2)));
    }

    #[test]
    fn test_full_table_declines_quietly() {
        let mut router = router(1);
        router.handle(plug(Device::gamepad(1), DeviceChange::Added));
        router.handle(plug(Device::gamepad(2), DeviceChange::Added));
        router.handle(InputSignal::ButtonPressed {
            device: Device::gamepad(3),
        });

        assert_eq!(router.player_count(), 1);
        assert!(router.player_for_device(DeviceId(2)).is_none());
        // Known devices are still tracked even without a slot
        assert_eq!(router.directory().len(), 3);
    }

    #[test]
    fn test_actions_move_player() {
        let mut router = router(2);
        router.handle(plug(Device::gamepad(1), DeviceChange::Added));
        router.handle(InputSignal::Action(ActionEvent::movement(
            DeviceId(1),
            Vec2::new(0.0, 1.0),
        )));
        router.handle(InputSignal::Action(ActionEvent::fire(DeviceId(1), true)));

        router.update(0.25);

        let player = router.player(0).unwrap();
        assert!(player.is_firing());
        let position = router.spawner().live[player.entity()];
        assert_relative_eq!(position.x, 0.0);
        assert_relative_eq!(position.y, 2.5);
    }

    #[test]
    fn test_update_paused_while_stopped() {
        let mut router = router(2);
        router.handle(plug(Device::gamepad(1), DeviceChange::Added));
        router.handle(InputSignal::Action(ActionEvent::movement(DeviceId(1), Vec2::X)));
        router.stop();

        router.update(1.0);

        let handle = *router.player(0).unwrap().entity();
        assert_eq!(router.spawner().live[&handle], Vec2::ZERO);
    }

    #[test]
    fn test_shutdown_removes_players() {
        let mut router = router(3);
        router.handle(plug(Device::gamepad(1), DeviceChange::Added));
        router.handle(plug(Device::gamepad(2), DeviceChange::Added));

        assert_eq!(router.shutdown(), 2);
        assert!(!router.is_running());
        assert_eq!(router.player_count(), 0);
        assert!(router.spawner().live.is_empty());
    }
}
