use std::sync::Arc;
use std::time::{Duration, Instant};

use pixels::Error as PixelsError;
use thiserror::Error;
use tracing::{info, warn};
use winit::dpi::LogicalSize;
use winit::error::{EventLoopError, OsError};
use winit::event::{ElementState, Event, WindowEvent};
use winit::event_loop::{ControlFlow, EventLoop};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::{Fullscreen, WindowBuilder};

use crate::assets::{AssetError, Atlas};
use crate::StartupError;

use super::input::{InputKind, KeyTranslator, RawKey};
use super::metrics::LoopStats;
use super::{Renderer, Simulation};

#[derive(Debug, Clone)]
pub struct LoopConfig {
    pub window_title: String,
    pub window_width: u32,
    pub window_height: u32,
    pub target_tps: u32,
    pub controlled_actor: usize,
    pub start_fullscreen: bool,
    pub metrics_log_interval: Duration,
}

impl Default for LoopConfig {
    fn default() -> Self {
        Self {
            window_title: "Platformer".to_string(),
            window_width: 800,
            window_height: 600,
            target_tps: 65,
            controlled_actor: 0,
            start_fullscreen: true,
            metrics_log_interval: Duration::from_secs(1),
        }
    }
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Startup(#[from] StartupError),
    #[error(transparent)]
    Assets(#[from] AssetError),
    #[error("failed to create event loop: {0}")]
    CreateEventLoop(#[source] EventLoopError),
    #[error("failed to create application window: {0}")]
    CreateWindow(#[source] OsError),
    #[error("failed to initialize renderer: {0}")]
    CreateRenderer(#[source] PixelsError),
    #[error("event loop failed: {0}")]
    EventLoopRun(#[source] EventLoopError),
}

/// Rate limiter for the fixed tick. Fires at most once per call, so a slow
/// frame delays the simulation instead of running catch-up ticks.
#[derive(Debug, Clone, Copy)]
pub struct TickGate {
    interval: Duration,
    last_update: Instant,
}

impl TickGate {
    pub fn new(target_tps: u32, now: Instant) -> Self {
        let interval = Duration::from_secs_f64(1.0 / target_tps.max(1) as f64);
        Self {
            interval,
            last_update: now.checked_sub(interval).unwrap_or(now),
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn should_tick(&mut self, now: Instant) -> bool {
        if now.saturating_duration_since(self.last_update) > self.interval {
            self.last_update = now;
            true
        } else {
            false
        }
    }
}

pub fn run_app(
    config: LoopConfig,
    atlas: Atlas,
    mut simulation: Box<dyn Simulation>,
) -> Result<(), AppError> {
    let event_loop = EventLoop::new().map_err(AppError::CreateEventLoop)?;
    let window = Arc::new(
        WindowBuilder::new()
            .with_title(config.window_title.clone())
            .with_inner_size(LogicalSize::new(
                config.window_width as f64,
                config.window_height as f64,
            ))
            .with_resizable(true)
            .build(&event_loop)
            .map_err(AppError::CreateWindow)?,
    );
    window.set_cursor_visible(false);
    let mut fullscreen = config.start_fullscreen;
    if fullscreen {
        window.set_fullscreen(Some(Fullscreen::Borderless(None)));
    }

    let mut renderer =
        Renderer::new(Arc::clone(&window), atlas).map_err(AppError::CreateRenderer)?;
    let size = window.inner_size();
    simulation.window_resized(size.width, size.height);

    event_loop.set_control_flow(ControlFlow::Poll);

    let translator = KeyTranslator::new(config.controlled_actor);
    let mut tick_gate = TickGate::new(config.target_tps, Instant::now());
    let mut stats = LoopStats::new(
        config.target_tps,
        config.metrics_log_interval,
        Instant::now(),
    );
    info!(
        target_tps = config.target_tps,
        tick_interval_us = tick_gate.interval().as_micros() as u64,
        controlled_actor = translator.actor_index(),
        fullscreen,
        window_width = size.width,
        window_height = size.height,
        "loop_config"
    );

    event_loop
        .run(move |event, window_target| match event {
            Event::WindowEvent { window_id, event } if window_id == window.id() => match event {
                WindowEvent::CloseRequested => {
                    info!(reason = "window_close", "quit_requested");
                    simulation.handle_input(translator.quit_request());
                }
                WindowEvent::Resized(new_size) => {
                    simulation.window_resized(new_size.width, new_size.height);
                    if let Err(error) = renderer.resize(new_size.width, new_size.height) {
                        warn!(error = %error, "renderer_resize_failed");
                        window_target.exit();
                    }
                    info!(
                        width = new_size.width,
                        height = new_size.height,
                        "window_resized"
                    );
                }
                WindowEvent::KeyboardInput { event, .. } => {
                    let key = raw_key_from_physical(event.physical_key);
                    let pressed = event.state == ElementState::Pressed;
                    if key == RawKey::F11 && !pressed {
                        fullscreen = !fullscreen;
                        window.set_fullscreen(fullscreen.then_some(Fullscreen::Borderless(None)));
                        info!(fullscreen, "fullscreen_toggled");
                    }
                    if let Some(input) = translator.translate(key, pressed, event.repeat) {
                        if input.kind == InputKind::QuitGame && input.pressed {
                            info!(reason = "escape_key", "quit_requested");
                        }
                        simulation.handle_input(input);
                    }
                }
                WindowEvent::RedrawRequested => {
                    let now = Instant::now();

                    if tick_gate.should_tick(now) {
                        simulation.update();
                        stats.tick_ran();
                    }

                    if let Err(error) = renderer.render_frame(simulation.as_mut()) {
                        warn!(error = %error, "renderer_draw_failed");
                        window_target.exit();
                    }
                    stats.frame_presented(now);

                    if let Some(snapshot) = stats.take_if_due(now) {
                        info!(
                            fps = snapshot.fps,
                            tps = snapshot.tps,
                            frame_time_ms = snapshot.frame_time_ms,
                            ticks_behind = snapshot.ticks_behind,
                            "loop_metrics"
                        );
                    }
                }
                _ => {}
            },
            Event::AboutToWait => {
                if simulation.running() {
                    window.request_redraw();
                } else {
                    window_target.exit();
                }
            }
            Event::LoopExiting => {
                simulation.shutdown();
                info!("shutdown");
            }
            _ => {}
        })
        .map_err(AppError::EventLoopRun)
}

fn raw_key_from_physical(key: PhysicalKey) -> RawKey {
    match key {
        PhysicalKey::Code(KeyCode::ArrowLeft) => RawKey::Left,
        PhysicalKey::Code(KeyCode::ArrowRight) => RawKey::Right,
        PhysicalKey::Code(KeyCode::ArrowUp) => RawKey::Up,
        PhysicalKey::Code(KeyCode::Space) => RawKey::Space,
        PhysicalKey::Code(KeyCode::ControlLeft) => RawKey::LeftCtrl,
        PhysicalKey::Code(KeyCode::Escape) => RawKey::Escape,
        PhysicalKey::Code(KeyCode::F11) => RawKey::F11,
        _ => RawKey::Other,
    }
}
