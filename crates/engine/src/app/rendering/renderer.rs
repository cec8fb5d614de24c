use std::sync::Arc;

use pixels::{Error, Pixels, SurfaceTexture};
use winit::window::Window;

use crate::app::{Rect, Simulation};
use crate::assets::{Atlas, Image};

use super::{clip_to_viewport, Graphics, Viewport};

pub struct Renderer {
    window: Arc<Window>,
    pixels: Pixels<'static>,
    viewport: Viewport,
    atlas: Atlas,
}

impl Renderer {
    pub fn new(window: Arc<Window>, atlas: Atlas) -> Result<Self, Error> {
        let size = window.inner_size();
        let pixels = Self::build_pixels(Arc::clone(&window), size.width, size.height)?;
        Ok(Self {
            window,
            pixels,
            viewport: Viewport {
                width: size.width,
                height: size.height,
            },
            atlas,
        })
    }

    pub fn resize(&mut self, width: u32, height: u32) -> Result<(), Error> {
        if width == 0 || height == 0 {
            return Ok(());
        }
        self.pixels = Self::build_pixels(Arc::clone(&self.window), width, height)?;
        self.viewport = Viewport { width, height };
        Ok(())
    }

    fn build_pixels(
        window: Arc<Window>,
        width: u32,
        height: u32,
    ) -> Result<Pixels<'static>, Error> {
        let surface = SurfaceTexture::new(width, height, window);
        Pixels::new(width, height, surface)
    }

    /// Lets the simulation draw into the frame buffer, then presents it.
    pub fn render_frame(&mut self, simulation: &mut dyn Simulation) -> Result<(), Error> {
        if self.viewport.width == 0 || self.viewport.height == 0 {
            return Ok(());
        }
        let mut canvas = FrameCanvas::new(self.pixels.frame_mut(), self.viewport, &self.atlas);
        simulation.render(&mut canvas);
        self.pixels.render()
    }
}

/// `Graphics` over a borrowed RGBA8 frame. Draws are clipped to the viewport.
pub struct FrameCanvas<'a> {
    frame: &'a mut [u8],
    viewport: Viewport,
    atlas: &'a Atlas,
}

impl<'a> FrameCanvas<'a> {
    pub fn new(frame: &'a mut [u8], viewport: Viewport, atlas: &'a Atlas) -> Self {
        debug_assert!(frame.len() >= viewport.width as usize * viewport.height as usize * 4);
        Self {
            frame,
            viewport,
            atlas,
        }
    }

    fn pixel_offset(&self, x: i32, y: i32) -> usize {
        (y as usize * self.viewport.width as usize + x as usize) * 4
    }
}

impl Graphics for FrameCanvas<'_> {
    fn clear_screen(&mut self, r: u8, g: u8, b: u8) {
        for chunk in self.frame.chunks_exact_mut(4) {
            chunk.copy_from_slice(&[r, g, b, 255]);
        }
    }

    fn draw_image(&mut self, image: Image, x: i32, y: i32) {
        let source = image.source();
        let dest = Rect::new(x, y, source.w, source.h);
        let Some(visible) = clip_to_viewport(dest, self.viewport) else {
            return;
        };
        for out_y in visible.y..visible.bottom() {
            let src_y = source.y + (out_y - y);
            for out_x in visible.x..visible.right() {
                let src_x = source.x + (out_x - x);
                let texel = self.atlas.texel(src_x, src_y);
                let offset = self.pixel_offset(out_x, out_y);
                blend_over(&mut self.frame[offset..offset + 4], texel);
            }
        }
    }

    fn fill_rect(&mut self, rect: Rect, color: [u8; 3]) {
        let Some(visible) = clip_to_viewport(rect, self.viewport) else {
            return;
        };
        let [r, g, b] = color;
        for out_y in visible.y..visible.bottom() {
            let row_start = self.pixel_offset(visible.x, out_y);
            let row_end = self.pixel_offset(visible.right(), out_y);
            for chunk in self.frame[row_start..row_end].chunks_exact_mut(4) {
                chunk.copy_from_slice(&[r, g, b, 255]);
            }
        }
    }
}

fn blend_over(dst: &mut [u8], src: [u8; 4]) {
    let alpha = src[3] as u32;
    match alpha {
        0 => {}
        255 => dst.copy_from_slice(&src),
        _ => {
            for channel in 0..3 {
                let blended =
                    (src[channel] as u32 * alpha + dst[channel] as u32 * (255 - alpha)) / 255;
                dst[channel] = blended as u8;
            }
            dst[3] = 255;
        }
    }
}
