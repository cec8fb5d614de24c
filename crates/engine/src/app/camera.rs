use super::simulation::Vec2i;

/// Keeps the tracked world anchor centred in the window.
///
/// `offset` is the world position shown at the window's top-left corner, so
/// `screen = world - offset`. It is recomputed whenever the anchor moves or the
/// window is resized.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Camera {
    window_width: u32,
    window_height: u32,
    anchor: Vec2i,
    offset: Vec2i,
}

impl Camera {
    pub fn new(window_width: u32, window_height: u32) -> Self {
        let mut camera = Self {
            window_width,
            window_height,
            anchor: Vec2i::ZERO,
            offset: Vec2i::ZERO,
        };
        camera.recompute_offset();
        camera
    }

    pub fn set_window_size(&mut self, width: u32, height: u32) {
        self.window_width = width;
        self.window_height = height;
        self.recompute_offset();
    }

    pub fn track(&mut self, anchor: Vec2i) {
        self.anchor = anchor;
        self.recompute_offset();
    }

    pub fn offset(&self) -> Vec2i {
        self.offset
    }

    pub fn anchor(&self) -> Vec2i {
        self.anchor
    }

    pub fn window_size(&self) -> (u32, u32) {
        (self.window_width, self.window_height)
    }

    pub fn world_to_screen(&self, world: Vec2i) -> Vec2i {
        world - self.offset
    }

    fn recompute_offset(&mut self) {
        let half_window = Vec2i::new(
            (self.window_width / 2) as i32,
            (self.window_height / 2) as i32,
        );
        self.offset = self.anchor - half_window;
    }
}
