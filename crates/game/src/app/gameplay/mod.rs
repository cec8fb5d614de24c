use std::time::Duration;

use engine::Vec2i;

mod actor;
mod game;
mod level;
mod recorder;
mod sprites;

pub(crate) use game::Game;
pub(crate) use recorder::{load_recording, InputRecorder, RecordingError};

#[cfg(test)]
use actor::{visible_run_frame, Actor, ActorTuning, AnimationState, Direction};
#[cfg(test)]
use level::Level;
#[cfg(test)]
use recorder::RecordedInput;
#[cfg(test)]
use sprites::ActorSprites;

const HERO_ACCELERATION_X: i32 = 2;
const HERO_DECELERATION_X: i32 = 1;
const HERO_MAX_SPEED_X: i32 = 10;
const HERO_RUN_FRAME_DELAY: i32 = 4;
const GRAVITY_Y: i32 = 1;
const JUMP_SPEED_Y: i32 = 16;
const MAX_FALL_SPEED_Y: i32 = 15;

const CLEAR_COLOR: (u8, u8, u8) = (0, 95, 83);
const PLATFORM_COLOR: [u8; 3] = [92, 64, 51];

pub(crate) const HERO_INDEX: usize = 0;
pub(crate) const BARNEY_INDEX: usize = 1;
const HERO_SPRITE_PREFIX: &str = "gophette";
const BARNEY_SPRITE_PREFIX: &str = "barney";
const HERO_START_RECT: &str = "hero_start";
const BARNEY_START_RECT: &str = "barney_start";
const JUMP_SOUND: &str = "jump";
const MUSIC_SOUND: &str = "music";
const MUSIC_FADE_IN: Duration = Duration::from_millis(500);
const LEVEL_PLATFORM_IDS: &[&str] = &["ground", "ledge_low", "ledge_mid", "ledge_high"];

pub(crate) const BARNEY_INPUTS_FILE: &str = "barney_inputs.json";

fn center_of(position: Vec2i, size: (i32, i32)) -> Vec2i {
    Vec2i::new(position.x + size.0 / 2, position.y + size.1 / 2)
}

#[cfg(test)]
mod tests;
