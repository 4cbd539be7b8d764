// Translation of winit window and device events into input signals

use super::device::{Device, DeviceChange, DeviceId, DeviceKind};
use super::event::{ActionEvent, Direction, HeldDirections, InputSignal};
use log::debug;
use std::collections::HashMap;
use std::hash::Hash;
use winit::event::{DeviceEvent, ElementState, MouseButton, WindowEvent};
use winit::keyboard::{KeyCode, PhysicalKey};

/// Direction bound to a movement key
fn direction_for(code: KeyCode) -> Option<Direction> {
    match code {
        KeyCode::KeyA | KeyCode::ArrowLeft => Some(Direction::Left),
        KeyCode::KeyD | KeyCode::ArrowRight => Some(Direction::Right),
        KeyCode::KeyW | KeyCode::ArrowUp => Some(Direction::Up),
        KeyCode::KeyS | KeyCode::ArrowDown => Some(Direction::Down),
        _ => None,
    }
}

/// Maps winit's opaque device ids to [`DeviceId`]s and turns keyboard and
/// mouse input into router signals.
///
/// winit does not say what kind of device an id belongs to, so the kind is
/// taken from the first event a device produces. Keyboards move with
/// WASD/arrow keys and fire with Space; mice fire with the left button.
#[derive(Debug)]
pub struct WinitBridge<K = winit::event::DeviceId> {
    devices: HashMap<K, Device>,
    held: HashMap<DeviceId, HeldDirections>,
    next_id: u32,
}

impl<K: Copy + Eq + Hash> WinitBridge<K> {
    pub fn new() -> Self {
        Self {
            devices: HashMap::new(),
            held: HashMap::new(),
            next_id: 0,
        }
    }

    /// Number of devices seen so far
    pub fn device_count(&self) -> usize {
        self.devices.len()
    }

    /// Keyboard key pressed or released
    pub fn key_input(
        &mut self,
        source: K,
        code: KeyCode,
        state: ElementState,
        repeat: bool,
    ) -> Vec<InputSignal> {
        let mut signals = Vec::new();
        let device = self.resolve(source, DeviceKind::Keyboard, &mut signals);
        let pressed = state == ElementState::Pressed;

        if pressed && repeat {
            return signals;
        }
        if pressed {
            signals.push(InputSignal::ButtonPressed { device });
        }

        if code == KeyCode::Space {
            signals.push(InputSignal::Action(ActionEvent::fire(device.id, pressed)));
        } else if let Some(direction) = direction_for(code) {
            let held = self.held.entry(device.id).or_default();
            held.set(direction, pressed);
            signals.push(InputSignal::Action(ActionEvent::movement(device.id, held.vector())));
        }

        signals
    }

    /// Mouse button pressed or released
    pub fn mouse_input(
        &mut self,
        source: K,
        button: MouseButton,
        state: ElementState,
    ) -> Vec<InputSignal> {
        let mut signals = Vec::new();
        let device = self.resolve(source, DeviceKind::Mouse, &mut signals);
        let pressed = state == ElementState::Pressed;

        if pressed {
            signals.push(InputSignal::ButtonPressed { device });
        }
        if button == MouseButton::Left {
            signals.push(InputSignal::Action(ActionEvent::fire(device.id, pressed)));
        }

        signals
    }

    /// Pointer activity that is not a button press
    pub fn mouse_motion(&mut self, source: K) -> Vec<InputSignal> {
        let mut signals = Vec::new();
        self.resolve(source, DeviceKind::Mouse, &mut signals);
        signals
    }

    /// Device unplugged
    pub fn device_removed(&mut self, source: K) -> Vec<InputSignal> {
        match self.devices.remove(&source) {
            Some(device) => {
                self.held.remove(&device.id);
                vec![InputSignal::DeviceChanged {
                    device,
                    change: DeviceChange::Removed,
                }]
            }
            None => Vec::new(),
        }
    }

    /// Known device for `source`, registering it with `kind` on first sight
    fn resolve(&mut self, source: K, kind: DeviceKind, signals: &mut Vec<InputSignal>) -> Device {
        if let Some(&device) = self.devices.get(&source) {
            return device;
        }

        self.next_id += 1;
        let device = Device::new(self.next_id, kind);
        self.devices.insert(source, device);
        signals.push(InputSignal::DeviceDiscovered { device });
        device
    }
}

impl WinitBridge<winit::event::DeviceId> {
    /// Translate a window event. Events that carry no device input yield nothing.
    pub fn window_event(&mut self, event: &WindowEvent) -> Vec<InputSignal> {
        match event {
            WindowEvent::KeyboardInput {
                device_id,
                event,
                is_synthetic: false,
            } => match event.physical_key {
                PhysicalKey::Code(code) => self.key_input(*device_id, code, event.state, event.repeat),
                _ => Vec::new(),
            },
            WindowEvent::MouseInput {
                device_id,
                state,
                button,
            } => self.mouse_input(*device_id, *button, *state),
            WindowEvent::CursorMoved { device_id, .. } => self.mouse_motion(*device_id),
            _ => Vec::new(),
        }
    }

    /// Translate a raw device event
    pub fn device_event(
        &mut self,
        device_id: winit::event::DeviceId,
        event: &DeviceEvent,
    ) -> Vec<InputSignal> {
        match event {
            DeviceEvent::Removed => self.device_removed(device_id),
            DeviceEvent::Added => {
                // Kind is unknown until the device produces input
                debug!("Device {:?} added", device_id);
                Vec::new()
            }
            _ => Vec::new(),
        }
    }
}

impl<K: Copy + Eq + Hash> Default for WinitBridge<K> {
    fn default() -> Self {
        Self::new()
    }
}
