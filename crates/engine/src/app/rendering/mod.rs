mod renderer;
mod transform;

pub use renderer::{FrameCanvas, Renderer};
pub use transform::{clip_to_viewport, Viewport};

use crate::app::Rect;
use crate::assets::Image;

/// Drawing capability handed to `Simulation::render` once per frame.
/// Coordinates are screen pixels.
pub trait Graphics {
    fn clear_screen(&mut self, r: u8, g: u8, b: u8);
    fn draw_image(&mut self, image: Image, x: i32, y: i32);
    fn fill_rect(&mut self, rect: Rect, color: [u8; 3]);
}
