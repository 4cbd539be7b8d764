// Device identity, hot-plug changes and the directory of known devices

use std::collections::BTreeMap;
use std::fmt;

/// Identifier of a physical input device, as reported by the host
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DeviceId(pub u32);

impl fmt::Display for DeviceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Broad device category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeviceKind {
    Keyboard,
    Mouse,
    Gamepad,
    Other,
}

/// A device as seen by the assignment layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Device {
    pub id: DeviceId,
    pub kind: DeviceKind,
}

impl Device {
    pub fn new(id: u32, kind: DeviceKind) -> Self {
        Self {
            id: DeviceId(id),
            kind,
        }
    }

    pub fn keyboard(id: u32) -> Self {
        Self::new(id, DeviceKind::Keyboard)
    }

    pub fn mouse(id: u32) -> Self {
        Self::new(id, DeviceKind::Mouse)
    }

    pub fn gamepad(id: u32) -> Self {
        Self::new(id, DeviceKind::Gamepad)
    }
}

/// Hot-plug notification kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeviceChange {
    Added,
    Enabled,
    Reconnected,
    Removed,
    Disabled,
    Disconnected,
}

impl DeviceChange {
    /// True for changes that make a device available for joining
    pub fn is_arrival(self) -> bool {
        matches!(self, Self::Added | Self::Enabled | Self::Reconnected)
    }

    /// True for changes that should make the owning player leave
    pub fn is_departure(self) -> bool {
        !self.is_arrival()
    }
}

/// Known devices plus the designated ("current") keyboard and mouse.
///
/// The designated keyboard and mouse are paired into a single logical input
/// source when a player joins with either of them. The first keyboard (or
/// mouse) registered becomes designated; when it goes away the remaining
/// device of that kind with the lowest id takes over.
#[derive(Debug, Default, Clone)]
pub struct DeviceDirectory {
    devices: BTreeMap<DeviceId, DeviceKind>,
    keyboard: Option<DeviceId>,
    mouse: Option<DeviceId>,
}

impl DeviceDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a device. Re-registering updates its kind.
    pub fn register(&mut self, device: Device) {
        if let Some(previous) = self.devices.insert(device.id, device.kind) {
            if previous != device.kind {
                self.release_designation(device.id);
            }
        }

        match device.kind {
            DeviceKind::Keyboard if self.keyboard.is_none() => self.keyboard = Some(device.id),
            DeviceKind::Mouse if self.mouse.is_none() => self.mouse = Some(device.id),
            _ => {}
        }
    }

    /// Forget a device. Returns the removed device if it was known.
    pub fn unregister(&mut self, id: DeviceId) -> Option<Device> {
        let kind = self.devices.remove(&id)?;
        self.release_designation(id);
        Some(Device { id, kind })
    }

    /// Look up a known device
    pub fn get(&self, id: DeviceId) -> Option<Device> {
        self.devices.get(&id).map(|&kind| Device { id, kind })
    }

    /// Designated keyboard, if any keyboard is known
    pub fn keyboard(&self) -> Option<DeviceId> {
        self.keyboard
    }

    /// Designated mouse, if any mouse is known
    pub fn mouse(&self) -> Option<DeviceId> {
        self.mouse
    }

    /// True if `id` is the designated keyboard or mouse
    pub fn is_pointer_pair(&self, id: DeviceId) -> bool {
        self.keyboard == Some(id) || self.mouse == Some(id)
    }

    pub fn len(&self) -> usize {
        self.devices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.devices.is_empty()
    }

    fn release_designation(&mut self, id: DeviceId) {
        if self.keyboard == Some(id) {
            self.keyboard = self.first_of(DeviceKind::Keyboard);
        }
        if self.mouse == Some(id) {
            self.mouse = self.first_of(DeviceKind::Mouse);
        }
    }

    fn first_of(&self, kind: DeviceKind) -> Option<DeviceId> {
        self.devices
            .iter()
            .find(|&(_, &k)| k == kind)
            .map(|(&id, _)| id)
    }
}
