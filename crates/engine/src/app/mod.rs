mod audio;
mod camera;
mod input;
mod loop_runner;
mod metrics;
mod rendering;
mod simulation;

pub use audio::{Audio, SilentAudio};
pub use camera::Camera;
pub use input::{InputEvent, InputKind, KeyTranslator, RawKey};
pub use loop_runner::{run_app, AppError, LoopConfig, TickGate};
pub use metrics::LoopMetricsSnapshot;
pub use rendering::{Graphics, Renderer};
pub use simulation::{Rect, Simulation, Vec2i};
