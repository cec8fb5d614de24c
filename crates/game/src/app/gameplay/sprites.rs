use engine::{AssetError, AssetLoader, Image, Sound};

use super::actor::Direction;

/// Every image and sound an actor needs, resolved once from the asset
/// registry.
#[derive(Debug, Clone, Copy)]
pub(crate) struct ActorSprites {
    pub(crate) run_frames: [[Image; 3]; 2],
    pub(crate) jump_frames: [Image; 2],
    pub(crate) jump_sound: Sound,
}

impl ActorSprites {
    pub(crate) fn load(
        assets: &mut dyn AssetLoader,
        prefix: &str,
        jump_sound_id: &str,
    ) -> Result<Self, AssetError> {
        let mut run = |side: &str, frame: u8| {
            assets.load_image(&format!("{prefix}_{side}_run{frame}"))
        };
        let run_frames = [
            [run("left", 1)?, run("left", 2)?, run("left", 3)?],
            [run("right", 1)?, run("right", 2)?, run("right", 3)?],
        ];
        let jump_frames = [
            assets.load_image(&format!("{prefix}_left_jump"))?,
            assets.load_image(&format!("{prefix}_right_jump"))?,
        ];
        let jump_sound = assets.load_sound(jump_sound_id)?;
        Ok(Self {
            run_frames,
            jump_frames,
            jump_sound,
        })
    }

    pub(crate) fn run_frame(&self, direction: Direction, visible_frame: usize) -> Image {
        self.run_frames[direction.index()][visible_frame]
    }

    pub(crate) fn jump_frame(&self, direction: Direction) -> Image {
        self.jump_frames[direction.index()]
    }

    /// Collision size; taken from the first right-facing run frame.
    pub(crate) fn size(&self) -> (i32, i32) {
        self.run_frames[Direction::Right.index()][0].size()
    }
}
