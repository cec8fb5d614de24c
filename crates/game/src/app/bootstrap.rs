use engine::{
    resolve_app_paths, AssetError, Atlas, AtlasAssets, LoopConfig, SilentAudio, StartupError,
};
use thiserror::Error;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use super::gameplay::{
    load_recording, Game, InputRecorder, RecordingError, BARNEY_INDEX, BARNEY_INPUTS_FILE,
};

const RECORD_AI_ENV_VAR: &str = "PLATFORMER_RECORD_AI";
const WINDOWED_ENV_VAR: &str = "PLATFORMER_WINDOWED";

#[derive(Debug, Error)]
pub(crate) enum BootstrapError {
    #[error(transparent)]
    Startup(#[from] StartupError),
    #[error(transparent)]
    Assets(#[from] AssetError),
    #[error(transparent)]
    Recording(#[from] RecordingError),
}

pub(crate) struct AppWiring {
    pub(crate) config: LoopConfig,
    pub(crate) atlas: Atlas,
    pub(crate) game: Game,
}

pub(crate) fn build_app() -> Result<AppWiring, BootstrapError> {
    init_tracing();
    info!("=== Platformer Startup ===");

    let paths = resolve_app_paths()?;
    info!(
        root = %paths.root.display(),
        assets_dir = %paths.assets_dir.display(),
        "app_paths_resolved"
    );
    let record_ai = env_flag(RECORD_AI_ENV_VAR);
    let mut config = LoopConfig {
        start_fullscreen: !env_flag(WINDOWED_ENV_VAR),
        ..LoopConfig::default()
    };

    let mut recorder = InputRecorder::new();
    let recording_output = if record_ai {
        config.controlled_actor = BARNEY_INDEX;
        recorder.start_recording();
        let output = paths.cache_dir.join(BARNEY_INPUTS_FILE);
        info!(path = %output.display(), "ai_recording_enabled");
        Some(output)
    } else {
        let script_path = paths.assets_dir.join(BARNEY_INPUTS_FILE);
        match load_recording(&script_path)? {
            Some(events) => {
                info!(
                    path = %script_path.display(),
                    event_count = events.len(),
                    "ai_inputs_loaded"
                );
                recorder.playback(events);
            }
            None => warn!(path = %script_path.display(), "ai_inputs_missing"),
        }
        None
    };

    let mut assets = AtlasAssets::open(&paths.assets_dir)?;
    let mut game = Game::load(
        &mut assets,
        Box::new(SilentAudio::default()),
        recorder,
        (config.window_width, config.window_height),
    )?
    .with_tracked_actor(config.controlled_actor);
    if let Some(output) = recording_output {
        game = game.with_recording_output(output);
    }
    info!(
        images = assets.loaded_image_count(),
        controlled_actor = config.controlled_actor,
        "bootstrap_complete"
    );

    Ok(AppWiring {
        config,
        atlas: assets.into_atlas(),
        game,
    })
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_names(true)
        .compact()
        .init();
}

fn env_flag(var: &str) -> bool {
    std::env::var(var)
        .map(|raw| parse_flag(&raw))
        .unwrap_or(false)
}

fn parse_flag(raw: &str) -> bool {
    matches!(
        raw.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}
