use std::time::Duration;

use tracing::debug;

use crate::assets::Sound;

pub trait Audio {
    fn play_once(&mut self, sound: Sound);
    /// Loops `sound` until the program exits, fading in over `fade_in`.
    fn play_music(&mut self, sound: Sound, fade_in: Duration);
}

/// Stand-in backend used when no mixer is wired up. Playback requests are
/// only logged.
#[derive(Debug, Default)]
pub struct SilentAudio {
    played: u64,
    music: Option<Sound>,
}

impl SilentAudio {
    pub fn played_count(&self) -> u64 {
        self.played
    }

    pub fn music(&self) -> Option<Sound> {
        self.music
    }
}

impl Audio for SilentAudio {
    fn play_once(&mut self, sound: Sound) {
        self.played = self.played.saturating_add(1);
        debug!(
            sound_id = sound.id(),
            length_ms = sound.length().as_millis() as u64,
            "sound_play_once"
        );
    }

    fn play_music(&mut self, sound: Sound, fade_in: Duration) {
        self.music = Some(sound);
        debug!(
            sound_id = sound.id(),
            fade_in_ms = fade_in.as_millis() as u64,
            "music_started"
        );
    }
}
