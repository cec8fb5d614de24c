use engine::{Audio, Camera, Graphics, Image, Rect, Vec2i};

use super::level::Level;
use super::sprites::ActorSprites;
use super::{
    center_of, GRAVITY_Y, HERO_ACCELERATION_X, HERO_DECELERATION_X, HERO_MAX_SPEED_X,
    HERO_RUN_FRAME_DELAY, JUMP_SPEED_Y, MAX_FALL_SPEED_Y,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) enum Direction {
    Left,
    Right,
}

impl Direction {
    pub(crate) const fn index(self) -> usize {
        match self {
            Direction::Left => 0,
            Direction::Right => 1,
        }
    }

    const fn opposite(self) -> Self {
        match self {
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct ActorTuning {
    pub(crate) acceleration_x: i32,
    pub(crate) deceleration_x: i32,
    pub(crate) max_speed_x: i32,
    pub(crate) run_frame_delay: i32,
    pub(crate) gravity_y: i32,
    pub(crate) jump_speed_y: i32,
    pub(crate) max_fall_speed_y: i32,
}

impl Default for ActorTuning {
    fn default() -> Self {
        Self {
            acceleration_x: HERO_ACCELERATION_X,
            deceleration_x: HERO_DECELERATION_X,
            max_speed_x: HERO_MAX_SPEED_X,
            run_frame_delay: HERO_RUN_FRAME_DELAY,
            gravity_y: GRAVITY_Y,
            jump_speed_y: JUMP_SPEED_Y,
            max_fall_speed_y: MAX_FALL_SPEED_Y,
        }
    }
}

/// Run-cycle cursor. `frame_index` walks 0..4 and maps onto three drawn
/// frames through `visible_run_frame`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct AnimationState {
    pub(crate) frame_index: usize,
    pub(crate) ticks_until_next_frame: i32,
}

/// Run images are shown in the order 0,1,0,2 so three frames read as a
/// left-right step cycle.
pub(crate) const fn visible_run_frame(frame_index: usize) -> usize {
    match frame_index % 4 {
        0 | 2 => 0,
        1 => 1,
        _ => 2,
    }
}

/// Held horizontal keys. The most recent press wins while both are held.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct MovementIntent {
    left_held: bool,
    right_held: bool,
    latest: Option<Direction>,
}

impl MovementIntent {
    fn held_mut(&mut self, direction: Direction) -> &mut bool {
        match direction {
            Direction::Left => &mut self.left_held,
            Direction::Right => &mut self.right_held,
        }
    }

    fn press(&mut self, direction: Direction) {
        *self.held_mut(direction) = true;
        self.latest = Some(direction);
    }

    fn release(&mut self, direction: Direction) {
        *self.held_mut(direction) = false;
        if self.latest != Some(direction) {
            return;
        }
        let other = direction.opposite();
        self.latest = (*self.held_mut(other)).then_some(other);
    }
}

#[derive(Debug, Clone)]
pub(crate) struct Actor {
    name: &'static str,
    direction: Direction,
    position: Vec2i,
    speed: Vec2i,
    animation: AnimationState,
    grounded: bool,
    jump_requested: bool,
    intent: MovementIntent,
    tuning: ActorTuning,
    sprites: ActorSprites,
}

impl Actor {
    pub(crate) fn new(
        name: &'static str,
        position: Vec2i,
        sprites: ActorSprites,
        tuning: ActorTuning,
    ) -> Self {
        Self {
            name,
            direction: Direction::Right,
            position,
            speed: Vec2i::ZERO,
            animation: AnimationState::default(),
            grounded: false,
            jump_requested: false,
            intent: MovementIntent::default(),
            tuning,
            sprites,
        }
    }

    pub(crate) fn name(&self) -> &'static str {
        self.name
    }

    #[cfg(test)]
    pub(crate) fn direction(&self) -> Direction {
        self.direction
    }

    #[cfg(test)]
    pub(crate) fn position(&self) -> Vec2i {
        self.position
    }

    #[cfg(test)]
    pub(crate) fn speed(&self) -> Vec2i {
        self.speed
    }

    #[cfg(test)]
    pub(crate) fn animation(&self) -> AnimationState {
        self.animation
    }

    #[cfg(test)]
    pub(crate) fn grounded(&self) -> bool {
        self.grounded
    }

    pub(crate) fn bounds(&self) -> Rect {
        let (w, h) = self.sprites.size();
        Rect::new(self.position.x, self.position.y, w, h)
    }

    pub(crate) fn center(&self) -> Vec2i {
        center_of(self.position, self.sprites.size())
    }

    pub(crate) fn accelerate(&mut self, direction: Direction) {
        self.intent.press(direction);
    }

    pub(crate) fn stop_accelerating(&mut self, direction: Direction) {
        self.intent.release(direction);
    }

    pub(crate) fn set_jump_requested(&mut self, requested: bool) {
        self.jump_requested = requested;
    }

    /// Advances physics and animation by one fixed tick.
    pub(crate) fn update(&mut self, level: &Level, audio: &mut dyn Audio) {
        self.apply_horizontal_intent();

        if self.speed.x < 0 {
            self.direction = Direction::Left;
        }
        if self.speed.x > 0 {
            self.direction = Direction::Right;
        }

        if self.speed.x == 0 {
            self.animation = AnimationState::default();
        } else {
            self.animation.ticks_until_next_frame -= 1;
            if self.animation.ticks_until_next_frame <= 0 {
                self.animation.frame_index = (self.animation.frame_index + 1) % 4;
                self.animation.ticks_until_next_frame = self.tuning.run_frame_delay;
            }
        }

        self.position.x += self.speed.x;
        self.update_vertical(level, audio);
    }

    pub(crate) fn current_frame(&self) -> Image {
        if self.grounded {
            self.sprites
                .run_frame(self.direction, visible_run_frame(self.animation.frame_index))
        } else {
            self.sprites.jump_frame(self.direction)
        }
    }

    pub(crate) fn render(&self, graphics: &mut dyn Graphics, camera: &Camera) {
        let screen = camera.world_to_screen(self.position);
        self.current_frame().draw_at(graphics, screen.x, screen.y);
    }

    fn apply_horizontal_intent(&mut self) {
        let max = self.tuning.max_speed_x;
        self.speed.x = match self.intent.latest {
            Some(Direction::Left) => (self.speed.x - self.tuning.acceleration_x).max(-max),
            Some(Direction::Right) => (self.speed.x + self.tuning.acceleration_x).min(max),
            None => {
                let decel = self.tuning.deceleration_x;
                if self.speed.x > 0 {
                    (self.speed.x - decel).max(0)
                } else {
                    (self.speed.x + decel).min(0)
                }
            }
        };
    }

    fn update_vertical(&mut self, level: &Level, audio: &mut dyn Audio) {
        if self.jump_requested && self.grounded {
            self.jump_requested = false;
            self.grounded = false;
            self.speed.y = -self.tuning.jump_speed_y;
            audio.play_once(self.sprites.jump_sound);
        }

        if self.grounded {
            if !level.supports(self.bounds()) {
                self.grounded = false;
            }
            return;
        }

        self.speed.y = (self.speed.y + self.tuning.gravity_y).min(self.tuning.max_fall_speed_y);
        let previous_bottom = self.bounds().bottom();
        self.position.y += self.speed.y;
        if self.speed.y < 0 {
            return;
        }
        if let Some(top) = level.landing_top(self.bounds(), previous_bottom) {
            self.position.y = top - self.sprites.size().1;
            self.speed.y = 0;
            self.grounded = true;
        }
    }

    #[cfg(test)]
    pub(crate) fn set_speed_x(&mut self, speed_x: i32) {
        self.speed.x = speed_x;
    }

    #[cfg(test)]
    pub(crate) fn set_direction(&mut self, direction: Direction) {
        self.direction = direction;
    }
}
