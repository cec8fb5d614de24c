use std::path::PathBuf;

use engine::{AssetError, AssetLoader, Audio, Camera, Graphics, InputEvent, InputKind, Simulation};
use tracing::{debug, error, info, warn};

use super::actor::{Actor, ActorTuning, Direction};
use super::level::Level;
use super::recorder::{save_recording, InputRecorder};
use super::sprites::ActorSprites;
use super::{
    BARNEY_SPRITE_PREFIX, BARNEY_START_RECT, CLEAR_COLOR, HERO_INDEX, HERO_SPRITE_PREFIX,
    HERO_START_RECT, JUMP_SOUND, LEVEL_PLATFORM_IDS, MUSIC_FADE_IN, MUSIC_SOUND, PLATFORM_COLOR,
};

/// Owns every actor, the level, the camera and the running flag.
pub(crate) struct Game {
    actors: Vec<Actor>,
    level: Level,
    camera: Camera,
    tracked_actor: usize,
    running: bool,
    recorder: InputRecorder,
    recording_output: Option<PathBuf>,
    audio: Box<dyn Audio>,
}

impl Game {
    /// Resolves all assets up front; any missing id aborts startup except the
    /// optional background music.
    pub(crate) fn load(
        assets: &mut dyn AssetLoader,
        mut audio: Box<dyn Audio>,
        recorder: InputRecorder,
        window_size: (u32, u32),
    ) -> Result<Self, AssetError> {
        let level = Level::load(assets, LEVEL_PLATFORM_IDS)?;
        let tuning = ActorTuning::default();
        let hero = Actor::new(
            "gophette",
            assets.load_rectangle(HERO_START_RECT)?.top_left(),
            ActorSprites::load(assets, HERO_SPRITE_PREFIX, JUMP_SOUND)?,
            tuning,
        );
        let barney = Actor::new(
            "barney",
            assets.load_rectangle(BARNEY_START_RECT)?.top_left(),
            ActorSprites::load(assets, BARNEY_SPRITE_PREFIX, JUMP_SOUND)?,
            tuning,
        );
        info!(
            actors = ?[hero.name(), barney.name()],
            platform_count = level.platforms().len(),
            "game_loaded"
        );
        match assets.load_sound(MUSIC_SOUND) {
            Ok(music) => audio.play_music(music, MUSIC_FADE_IN),
            Err(err) => warn!(error = %err, "music_unavailable"),
        }
        let camera = Camera::new(window_size.0, window_size.1);
        Ok(Self::new(vec![hero, barney], level, camera, recorder, audio))
    }

    pub(crate) fn new(
        actors: Vec<Actor>,
        level: Level,
        mut camera: Camera,
        recorder: InputRecorder,
        audio: Box<dyn Audio>,
    ) -> Self {
        if let Some(hero) = actors.get(HERO_INDEX) {
            camera.track(hero.center());
        }
        Self {
            actors,
            level,
            camera,
            tracked_actor: HERO_INDEX,
            running: true,
            recorder,
            recording_output: None,
            audio,
        }
    }

    /// Points the camera at `index` instead of the hero. Unknown indices are
    /// ignored.
    pub(crate) fn with_tracked_actor(mut self, index: usize) -> Self {
        match self.actors.get(index) {
            Some(actor) => {
                self.tracked_actor = index;
                self.camera.track(actor.center());
            }
            None => warn!(actor_index = index, "tracked_actor_unknown"),
        }
        self
    }

    pub(crate) fn with_recording_output(mut self, path: PathBuf) -> Self {
        self.recording_output = Some(path);
        self
    }

    #[cfg(test)]
    pub(crate) fn actors(&self) -> &[Actor] {
        &self.actors
    }

    #[cfg(test)]
    pub(crate) fn camera(&self) -> &Camera {
        &self.camera
    }

    #[cfg(test)]
    pub(crate) fn recorder_mut(&mut self) -> &mut InputRecorder {
        &mut self.recorder
    }

    fn apply_input(&mut self, event: InputEvent) {
        if event.kind == InputKind::QuitGame {
            if event.pressed && self.running {
                self.running = false;
                info!(tick = self.recorder.tick(), "game_stopped");
            }
            return;
        }

        let Some(actor) = self.actors.get_mut(event.actor_index) else {
            debug!(
                actor_index = event.actor_index,
                kind = ?event.kind,
                "input_for_unknown_actor"
            );
            return;
        };
        match (event.kind, event.pressed) {
            (InputKind::GoLeft, true) => actor.accelerate(Direction::Left),
            (InputKind::GoLeft, false) => actor.stop_accelerating(Direction::Left),
            (InputKind::GoRight, true) => actor.accelerate(Direction::Right),
            (InputKind::GoRight, false) => actor.stop_accelerating(Direction::Right),
            (InputKind::Jump, pressed) => actor.set_jump_requested(pressed),
            (InputKind::QuitGame, _) => {}
        }
    }
}

impl Simulation for Game {
    fn running(&self) -> bool {
        self.running
    }

    fn handle_input(&mut self, event: InputEvent) {
        if !self.running {
            return;
        }
        if event.kind != InputKind::QuitGame {
            self.recorder.record(event);
        }
        self.apply_input(event);
    }

    fn update(&mut self) {
        for event in self.recorder.take_due() {
            if event.kind == InputKind::QuitGame {
                debug!(tick = self.recorder.tick(), "playback_quit_ignored");
                continue;
            }
            self.apply_input(event);
        }
        for actor in &mut self.actors {
            actor.update(&self.level, self.audio.as_mut());
        }
        if let Some(tracked) = self.actors.get(self.tracked_actor) {
            self.camera.track(tracked.center());
        }
        self.recorder.advance_tick();
    }

    fn render(&mut self, graphics: &mut dyn Graphics) {
        let (r, g, b) = CLEAR_COLOR;
        graphics.clear_screen(r, g, b);
        for platform in self.level.platforms() {
            let top_left = self.camera.world_to_screen(platform.top_left());
            let mut on_screen = *platform;
            on_screen.x = top_left.x;
            on_screen.y = top_left.y;
            graphics.fill_rect(on_screen, PLATFORM_COLOR);
        }
        for actor in &self.actors {
            actor.render(graphics, &self.camera);
        }
    }

    fn window_resized(&mut self, width: u32, height: u32) {
        self.camera.set_window_size(width, height);
    }

    fn shutdown(&mut self) {
        if !self.recorder.is_recording() {
            return;
        }
        let recorded = self.recorder.stop_recording();
        let Some(path) = self.recording_output.as_deref() else {
            return;
        };
        match save_recording(path, &recorded) {
            Ok(()) => info!(
                path = %path.display(),
                event_count = recorded.len(),
                "recording_saved"
            ),
            Err(err) => error!(error = %err, "recording_save_failed"),
        }
    }
}
