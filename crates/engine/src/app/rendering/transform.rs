use crate::app::Rect;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    pub fn bounds(&self) -> Rect {
        Rect::new(0, 0, self.width as i32, self.height as i32)
    }
}

/// Part of `dest` that lands inside the viewport, if any.
pub fn clip_to_viewport(dest: Rect, viewport: Viewport) -> Option<Rect> {
    dest.intersection(&viewport.bounds())
}
