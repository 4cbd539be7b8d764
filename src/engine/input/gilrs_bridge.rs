// Translation of gilrs gamepad events into input signals

use super::device::{Device, DeviceChange};
use super::event::{ActionEvent, Direction, HeldDirections, InputSignal};
use gilrs::{Axis, Button, EventType, GamepadId, Gilrs};
use glam::Vec2;
use log::debug;
use std::collections::HashMap;
use std::hash::Hash;

/// First id handed to gamepads, clear of the ids given to winit devices
pub const GAMEPAD_ID_BASE: u32 = 0x1_0000;

/// Stick deflection below which the d-pad drives movement
const STICK_DEADZONE: f32 = 0.2;

/// Direction bound to a d-pad button
fn direction_for(button: Button) -> Option<Direction> {
    match button {
        Button::DPadLeft => Some(Direction::Left),
        Button::DPadRight => Some(Direction::Right),
        Button::DPadUp => Some(Direction::Up),
        Button::DPadDown => Some(Direction::Down),
        _ => None,
    }
}

/// Per-gamepad state kept between events
#[derive(Debug)]
struct Pad {
    device: Device,
    connected: bool,
    stick: Vec2,
    dpad: HeldDirections,
}

impl Pad {
    fn new(id: u32) -> Self {
        Self {
            device: Device::gamepad(id),
            connected: true,
            stick: Vec2::ZERO,
            dpad: HeldDirections::default(),
        }
    }

    /// Left stick if deflected, else the d-pad
    fn movement(&self) -> Vec2 {
        if self.stick.length() > STICK_DEADZONE {
            self.stick.clamp_length_max(1.0)
        } else {
            self.dpad.vector()
        }
    }
}

/// Maps gilrs gamepad ids to [`DeviceId`](super::DeviceId)s and turns
/// gamepad events into router signals.
///
/// Connecting and disconnecting become hot-plug changes. A gamepad keeps its
/// id across reconnects. The south face button fires; the left stick and the
/// d-pad move.
#[derive(Debug)]
pub struct GilrsBridge<K = GamepadId> {
    pads: HashMap<K, Pad>,
    next_id: u32,
}

impl<K: Copy + Eq + Hash> GilrsBridge<K> {
    pub fn new() -> Self {
        Self {
            pads: HashMap::new(),
            next_id: GAMEPAD_ID_BASE,
        }
    }

    /// Number of gamepads seen so far
    pub fn pad_count(&self) -> usize {
        self.pads.len()
    }

    /// Gamepad that was connected before the bridge existed
    pub fn discover(&mut self, source: K) -> Vec<InputSignal> {
        let mut signals = Vec::new();
        self.resolve(source, &mut signals);
        signals
    }

    /// Gamepad plugged in
    pub fn connected(&mut self, source: K) -> Vec<InputSignal> {
        let mut discovered = Vec::new();
        let pad = self.resolve(source, &mut discovered);

        let change = if !discovered.is_empty() {
            DeviceChange::Added
        } else if pad.connected {
            return Vec::new();
        } else {
            DeviceChange::Reconnected
        };
        pad.connected = true;

        vec![InputSignal::DeviceChanged {
            device: pad.device,
            change,
        }]
    }

    /// Gamepad unplugged. Its id is kept for a later reconnect.
    pub fn disconnected(&mut self, source: K) -> Vec<InputSignal> {
        match self.pads.get_mut(&source) {
            Some(pad) if pad.connected => {
                pad.connected = false;
                pad.stick = Vec2::ZERO;
                pad.dpad = HeldDirections::default();
                vec![InputSignal::DeviceChanged {
                    device: pad.device,
                    change: DeviceChange::Disconnected,
                }]
            }
            _ => Vec::new(),
        }
    }

    /// Gamepad button pressed or released
    pub fn button(&mut self, source: K, button: Button, pressed: bool) -> Vec<InputSignal> {
        let mut signals = Vec::new();
        let pad = self.resolve(source, &mut signals);
        let device = pad.device;

        if pressed {
            signals.push(InputSignal::ButtonPressed { device });
        }

        if button == Button::South {
            signals.push(InputSignal::Action(ActionEvent::fire(device.id, pressed)));
        } else if let Some(direction) = direction_for(button) {
            pad.dpad.set(direction, pressed);
            let value = pad.movement();
            signals.push(InputSignal::Action(ActionEvent::movement(device.id, value)));
        }

        signals
    }

    /// Gamepad axis moved. Only the left stick is mapped.
    pub fn axis(&mut self, source: K, axis: Axis, value: f32) -> Vec<InputSignal> {
        let mut signals = Vec::new();
        if !matches!(axis, Axis::LeftStickX | Axis::LeftStickY) {
            return signals;
        }

        let pad = self.resolve(source, &mut signals);
        let before = pad.movement();
        if axis == Axis::LeftStickX {
            pad.stick.x = value;
        } else {
            pad.stick.y = value;
        }

        let after = pad.movement();
        if after != before {
            signals.push(InputSignal::Action(ActionEvent::movement(pad.device.id, after)));
        }

        signals
    }

    /// Known pad for `source`, registering it on first sight
    fn resolve(&mut self, source: K, signals: &mut Vec<InputSignal>) -> &mut Pad {
        let next_id = &mut self.next_id;
        self.pads.entry(source).or_insert_with(|| {
            let pad = Pad::new(*next_id);
            *next_id += 1;
            signals.push(InputSignal::DeviceDiscovered { device: pad.device });
            pad
        })
    }
}

impl GilrsBridge<GamepadId> {
    /// Discover every gamepad the backend already knows about
    pub fn discover_connected(&mut self, gilrs: &Gilrs) -> Vec<InputSignal> {
        let mut signals = Vec::new();
        for (id, gamepad) in gilrs.gamepads() {
            debug!("Found gamepad {} ({})", id, gamepad.name());
            signals.extend(self.discover(id));
        }
        signals
    }

    /// Translate one gilrs event. Unmapped events yield nothing.
    pub fn event(&mut self, source: GamepadId, event: &EventType) -> Vec<InputSignal> {
        match event {
            EventType::Connected => self.connected(source),
            EventType::Disconnected => self.disconnected(source),
            EventType::ButtonPressed(button, _) => self.button(source, *button, true),
            EventType::ButtonReleased(button, _) => self.button(source, *button, false),
            EventType::AxisChanged(axis, value, _) => self.axis(source, *axis, *value),
            _ => Vec::new(),
        }
    }

    /// Drain every pending gilrs event
    pub fn poll(&mut self, gilrs: &mut Gilrs) -> Vec<InputSignal> {
        let mut signals = Vec::new();
        while let Some(event) = gilrs.next_event() {
            signals.extend(self.event(event.id, &event.event));
        }
        signals
    }
}

impl<K: Copy + Eq + Hash> Default for GilrsBridge<K> {
    fn default() -> Self {
        Self::new()
    }
}
