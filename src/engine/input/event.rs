// Input events delivered by the host to the assignment layer

use super::device::{Device, DeviceChange, DeviceId};
use glam::Vec2;

/// Phase of a game action as reported by the host
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActionPhase {
    /// The action is performed (button held, stick deflected)
    Active,
    /// The action was cancelled or released
    Inactive,
}

impl ActionPhase {
    pub fn is_active(self) -> bool {
        self == Self::Active
    }
}

/// A per-device action event
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ActionEvent {
    Fire {
        device: DeviceId,
        phase: ActionPhase,
        pressed: bool,
    },
    Move {
        device: DeviceId,
        phase: ActionPhase,
        value: Vec2,
    },
}

impl ActionEvent {
    /// Fire pressed (`Active`, true) or released (`Inactive`)
    pub fn fire(device: DeviceId, pressed: bool) -> Self {
        let phase = if pressed {
            ActionPhase::Active
        } else {
            ActionPhase::Inactive
        };
        Self::Fire {
            device,
            phase,
            pressed,
        }
    }

    /// Movement input. A zero vector is reported as a cancelled action.
    pub fn movement(device: DeviceId, value: Vec2) -> Self {
        let phase = if value == Vec2::ZERO {
            ActionPhase::Inactive
        } else {
            ActionPhase::Active
        };
        Self::Move {
            device,
            phase,
            value,
        }
    }

    /// Device that produced the event
    pub fn device(&self) -> DeviceId {
        match *self {
            Self::Fire { device, .. } | Self::Move { device, .. } => device,
        }
    }
}

/// Digital movement direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) enum Direction {
    Left,
    Right,
    Up,
    Down,
}

/// Digital directions (keys or d-pad) currently held on one device
#[derive(Debug, Default, Clone, Copy)]
pub(crate) struct HeldDirections {
    left: bool,
    right: bool,
    up: bool,
    down: bool,
}

impl HeldDirections {
    pub(crate) fn set(&mut self, direction: Direction, held: bool) {
        let slot = match direction {
            Direction::Left => &mut self.left,
            Direction::Right => &mut self.right,
            Direction::Up => &mut self.up,
            Direction::Down => &mut self.down,
        };
        *slot = held;
    }

    /// Normalized movement vector, +y up. Opposite directions cancel out.
    pub(crate) fn vector(&self) -> Vec2 {
        let axis = |negative: bool, positive: bool| match (negative, positive) {
            (true, false) => -1.0,
            (false, true) => 1.0,
            _ => 0.0,
        };
        Vec2::new(axis(self.left, self.right), axis(self.down, self.up)).normalize_or_zero()
    }
}

/// Everything the host can tell the router
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputSignal {
    /// A device that was already connected became known to the host
    DeviceDiscovered { device: Device },
    /// A device was plugged, unplugged, enabled or disabled
    DeviceChanged { device: Device, change: DeviceChange },
    /// Any button was pressed on a device
    ButtonPressed { device: Device },
    /// A mapped game action fired
    Action(ActionEvent),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fire_constructor_phase() {
        let pressed = ActionEvent::fire(DeviceId(1), true);
        assert!(matches!(
            pressed,
            ActionEvent::Fire {
                phase: ActionPhase::Active,
                pressed: true,
                ..
            }
        ));

        let released = ActionEvent::fire(DeviceId(1), false);
        assert!(matches!(
            released,
            ActionEvent::Fire {
                phase: ActionPhase::Inactive,
                ..
            }
        ));
    }

    #[test]
    fn test_zero_movement_is_inactive() {
        let event = ActionEvent::movement(DeviceId(2), Vec2::ZERO);
        assert!(matches!(
            event,
            ActionEvent::Move {
                phase: ActionPhase::Inactive,
                ..
            }
        ));

        let event = ActionEvent::movement(DeviceId(2), Vec2::new(0.0, 1.0));
        assert!(matches!(
            event,
            ActionEvent::Move {
                phase: ActionPhase::Active,
                ..
            }
        ));
    }

    #[test]
    fn test_held_directions() {
        let mut held = HeldDirections::default();
        assert_eq!(held.vector(), Vec2::ZERO);

        held.set(Direction::Down, true);
        assert_eq!(held.vector(), Vec2::NEG_Y);

        held.set(Direction::Up, true);
        assert_eq!(held.vector(), Vec2::ZERO);

        held.set(Direction::Up, false);
        held.set(Direction::Left, true);
        let diagonal = held.vector();
        assert!((diagonal.length() - 1.0).abs() < 1e-6);
        assert!(diagonal.x < 0.0 && diagonal.y < 0.0);
    }

    #[test]
    fn test_event_device() {
        assert_eq!(ActionEvent::fire(DeviceId(7), true).device(), DeviceId(7));
        assert_eq!(
            ActionEvent::movement(DeviceId(8), Vec2::X).device(),
            DeviceId(8)
        );
    }
}
