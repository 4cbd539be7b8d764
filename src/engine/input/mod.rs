// Local multiplayer input assignment
//
// Binds physical input devices to player slots as they are plugged in or
// first used, and routes each device's actions to the player that owns it.
//
// ## Architecture
//
// - `device`: Device ids, hot-plug changes and the directory of known devices
// - `event`: Action events and host signals
// - `session`: Per-player movement/fire state filtered by bound devices
// - `registry`: Fixed slot table and device → slot index
// - `config`: Player count and movement speed settings
// - `router`: Host-facing entry point with start/stop lifecycle
// - `winit_bridge`: Translation of winit window/device events into signals
// - `gilrs_bridge`: Translation of gilrs gamepad events into signals (`gamepad` feature)
//
// ## Usage Example
//
// ```rust
// use engine::input::{AssignmentConfig, Device, DeviceChange, InputRouter, InputSignal};
//
// let mut router = InputRouter::new(AssignmentConfig::default(), avatars);
// router.start();
//
// // Hot-plug notification from the host
// router.handle(InputSignal::DeviceChanged {
//     device: Device::gamepad(7),
//     change: DeviceChange::Added,
// });
//
// // Once per simulation tick
// router.update(dt);
// ```

pub mod config;
pub mod device;
pub mod event;
#[cfg(feature = "gamepad")]
pub mod gilrs_bridge;
pub mod registry;
pub mod router;
pub mod session;
pub mod winit_bridge;

pub use config::{AssignmentConfig, ConfigError};
pub use device::{Device, DeviceChange, DeviceDirectory, DeviceId, DeviceKind};
pub use event::{ActionEvent, ActionPhase, InputSignal};
#[cfg(feature = "gamepad")]
pub use gilrs_bridge::GilrsBridge;
pub use registry::{DeviceAssignmentRegistry, JoinOutcome};
pub use router::InputRouter;
pub use session::PlayerInputSession;
pub use winit_bridge::WinitBridge;

/// Assignment errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AssignmentError {
    #[error("No free player slot for device {device} (max {max_players} players)")]
    CapacityExhausted { device: DeviceId, max_players: usize },
}
