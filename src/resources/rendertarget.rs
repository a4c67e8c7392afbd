//! Offscreen world surface.
//!
//! Always the authored world size, whatever the window does. The render stage
//! draws the scene here and samples it onto the window with the cover
//! transform of [`Viewport`](crate::resources::viewport::Viewport).

use raylib::ffi::{self, TextureFilter};
use raylib::prelude::*;

/// NonSend: `RenderTexture2D` is a GPU resource of the main thread.
pub struct RenderTarget {
    pub texture: RenderTexture2D,
    pub world_width: u32,
    pub world_height: u32,
    smooth: bool,
}

impl RenderTarget {
    /// Create the surface. `smooth` picks bilinear sampling when it is
    /// scaled up; otherwise pixels stay sharp.
    pub fn new(
        rl: &mut RaylibHandle,
        th: &RaylibThread,
        world_width: u32,
        world_height: u32,
        smooth: bool,
    ) -> Result<Self, String> {
        let texture = rl
            .load_render_texture(th, world_width, world_height)
            .map_err(|e| {
                format!(
                    "Failed to create {}x{} world surface: {}",
                    world_width, world_height, e
                )
            })?;
        let filter = if smooth {
            TextureFilter::TEXTURE_FILTER_BILINEAR
        } else {
            TextureFilter::TEXTURE_FILTER_POINT
        };
        unsafe {
            ffi::SetTextureFilter(texture.texture, filter as i32);
        }
        Ok(Self {
            texture,
            world_width,
            world_height,
            smooth,
        })
    }

    pub fn is_smooth(&self) -> bool {
        self.smooth
    }

    pub fn size(&self) -> (f32, f32) {
        (self.world_width as f32, self.world_height as f32)
    }

    /// Whole-surface source rectangle. Height is negative: render textures
    /// are stored upside down.
    pub fn source_rect(&self) -> Rectangle {
        Rectangle {
            x: 0.0,
            y: 0.0,
            width: self.world_width as f32,
            height: -(self.world_height as f32),
        }
    }
}
