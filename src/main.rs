use anyhow::Result;
use log::info;
use rusted_join::engine::game_loop::FrameClock;
use rusted_join::engine::input::{AssignmentConfig, InputRouter, WinitBridge};
#[cfg(feature = "gamepad")]
use rusted_join::engine::input::{GilrsBridge, InputSignal};
use rusted_join::game::AvatarWorld;
use std::time::{Duration, Instant};
use winit::{
    event::{Event, WindowEvent},
    event_loop::EventLoop,
    window::WindowBuilder,
};

/// How often joined players' positions are logged
const REPORT_INTERVAL: Duration = Duration::from_secs(2);

/// Gamepad backend plus its bridge
#[cfg(feature = "gamepad")]
struct Gamepads {
    gilrs: gilrs::Gilrs,
    bridge: GilrsBridge,
}

#[cfg(feature = "gamepad")]
impl Gamepads {
    /// `None` if the platform has no gamepad support
    fn init() -> Option<Self> {
        match gilrs::Gilrs::new() {
            Ok(gilrs) => {
                info!("Gamepad support initialized");
                Some(Self {
                    gilrs,
                    bridge: GilrsBridge::new(),
                })
            }
            Err(e) => {
                log::warn!(
                    "Failed to initialize gamepad support: {}. Gamepads will not be available.",
                    e
                );
                None
            }
        }
    }

    fn discover(&mut self) -> Vec<InputSignal> {
        self.bridge.discover_connected(&self.gilrs)
    }

    fn poll(&mut self) -> Vec<InputSignal> {
        self.bridge.poll(&mut self.gilrs)
    }
}

fn main() -> Result<()> {
    // Initialize logger
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    info!("Starting Rusted Join...");

    let config = AssignmentConfig::from_env()?;
    let mut router = InputRouter::new(config, AvatarWorld::new())?;
    let mut bridge: WinitBridge = WinitBridge::new();
    let mut clock = FrameClock::new();
    let mut last_report = Instant::now();

    // Create event loop and window
    let event_loop = EventLoop::new()?;
    let window = WindowBuilder::new()
        .with_title("Rusted Join - press any key or click to join")
        .with_inner_size(winit::dpi::LogicalSize::new(800, 450))
        .with_resizable(true)
        .build(&event_loop)?;

    info!("Window created successfully");
    router.start();

    #[cfg(feature = "gamepad")]
    let mut gamepads = Gamepads::init();
    #[cfg(feature = "gamepad")]
    if let Some(pads) = gamepads.as_mut() {
        for signal in pads.discover() {
            router.handle(signal);
        }
    }

    event_loop
        .run(move |event, elwt| match event {
            Event::WindowEvent {
                event: WindowEvent::CloseRequested,
                ..
            } => {
                info!("Close requested, shutting down...");
                router.shutdown();
                elwt.exit();
            }
            Event::WindowEvent { event, .. } => {
                for signal in bridge.window_event(&event) {
                    router.handle(signal);
                }
            }
            Event::DeviceEvent { device_id, event } => {
                for signal in bridge.device_event(device_id, &event) {
                    router.handle(signal);
                }
            }
            Event::AboutToWait => {
                #[cfg(feature = "gamepad")]
                if let Some(pads) = gamepads.as_mut() {
                    for signal in pads.poll() {
                        router.handle(signal);
                    }
                }

                for _ in 0..clock.begin_frame() {
                    router.update(clock.timestep());
                }

                if router.player_count() > 0 && last_report.elapsed() >= REPORT_INTERVAL {
                    info!(
                        "{} player(s): {}",
                        router.player_count(),
                        router.spawner().describe()
                    );
                    last_report = Instant::now();
                }

                // Request another frame
                window.request_redraw();
            }
            _ => {}
        })
        .map_err(|e| anyhow::anyhow!("Event loop error: {}", e))?;

    Ok(())
}
