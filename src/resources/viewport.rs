//! Window/world size pair and the cover transform between them.
//!
//! The offscreen surface is always the authored world size. It is drawn onto
//! the window with one uniform scale, `max(window_w / world_w, window_h / world_h)`,
//! centered, so the world fills the window and the overflowing axis is cropped
//! evenly on both sides. There are never empty margins.

use bevy_ecs::prelude::Resource;
use raylib::prelude::*;

#[derive(Resource, Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    /// Window (canvas) size in pixels.
    pub window_w: f32,
    pub window_h: f32,
    /// Offscreen surface size in world pixels.
    pub world_w: f32,
    pub world_h: f32,
}

impl Viewport {
    pub fn new(window_w: u32, window_h: u32, world_w: u32, world_h: u32) -> Self {
        Self {
            window_w: window_w.max(1) as f32,
            window_h: window_h.max(1) as f32,
            world_w: world_w.max(1) as f32,
            world_h: world_h.max(1) as f32,
        }
    }

    /// New canvas size. Only the transform changes.
    pub fn resize(&mut self, window_w: u32, window_h: u32) {
        self.window_w = window_w.max(1) as f32;
        self.window_h = window_h.max(1) as f32;
    }

    /// Authored world size of a newly mounted level. The window size stays.
    pub fn set_world_size(&mut self, world_w: u32, world_h: u32) {
        self.world_w = world_w.max(1) as f32;
        self.world_h = world_h.max(1) as f32;
    }

    pub fn world_size(&self) -> (u32, u32) {
        (self.world_w as u32, self.world_h as u32)
    }

    /// Uniform cover scale.
    pub fn scale(&self) -> f32 {
        (self.window_w / self.world_w).max(self.window_h / self.world_h)
    }

    /// Where the whole surface lands in window space. May extend past the
    /// window on one axis.
    pub fn dest_rect(&self) -> Rectangle {
        let s = self.scale();
        let w = self.world_w * s;
        let h = self.world_h * s;
        Rectangle {
            x: (self.window_w - w) * 0.5,
            y: (self.window_h - h) * 0.5,
            width: w,
            height: h,
        }
    }

    pub fn center(&self) -> Vector2 {
        Vector2::new(self.window_w * 0.5, self.window_h * 0.5)
    }

    /// Pointer hit area: the whole canvas, edges included.
    pub fn contains_screen(&self, p: Vector2) -> bool {
        p.x >= 0.0 && p.y >= 0.0 && p.x <= self.window_w && p.y <= self.window_h
    }

    /// Window point to world point, undoing the cover transform and the
    /// camera offset applied in the offscreen pass.
    pub fn screen_to_world(&self, p: Vector2, camera_offset: Vector2) -> Vector2 {
        let dest = self.dest_rect();
        let s = self.scale();
        Vector2::new(
            (p.x - dest.x) / s - camera_offset.x,
            (p.y - dest.y) / s - camera_offset.y,
        )
    }

    pub fn world_to_screen(&self, p: Vector2, camera_offset: Vector2) -> Vector2 {
        let dest = self.dest_rect();
        let s = self.scale();
        Vector2::new(
            dest.x + (p.x + camera_offset.x) * s,
            dest.y + (p.y + camera_offset.y) * s,
        )
    }
}
