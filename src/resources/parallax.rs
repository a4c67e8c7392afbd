//! Pointer-driven camera offset.
//!
//! While the pointer is over the canvas the target offset follows the
//! pointer's signed distance from the canvas center, normalized per axis to
//! `[-1, 1]` and attenuated by `1 - 0.7 * min(distance, 1)`. When the pointer
//! is away, the target shrinks geometrically by `decay` each frame. The
//! applied offset eases toward the target by `lerp` each frame.

use bevy_ecs::prelude::Resource;
use raylib::prelude::Vector2;

use crate::resources::viewport::Viewport;

pub const DEFAULT_MAX_OFFSET: f32 = 12.0;
pub const DEFAULT_LERP: f32 = 0.08;
pub const DEFAULT_DECAY: f32 = 0.9;
/// Attenuation strength at the canvas edge.
const EDGE_ATTENUATION: f32 = 0.7;

#[derive(Resource, Debug, Clone, Copy, PartialEq)]
pub struct Parallax {
    /// Offset applied to the camera this frame (world pixels).
    pub current: Vector2,
    pub target: Vector2,
    pub max_offset: f32,
    pub lerp: f32,
    pub decay: f32,
}

impl Default for Parallax {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_OFFSET, DEFAULT_LERP, DEFAULT_DECAY)
    }
}

impl Parallax {
    pub fn new(max_offset: f32, lerp: f32, decay: f32) -> Self {
        Self {
            current: Vector2::zero(),
            target: Vector2::zero(),
            max_offset,
            lerp: lerp.clamp(0.0, 1.0),
            decay: decay.clamp(0.0, 1.0),
        }
    }

    /// Target for a pointer at window position `p`.
    pub fn target_for(&self, p: Vector2, viewport: &Viewport) -> Vector2 {
        let c = viewport.center();
        let dx = (p.x - c.x) / c.x;
        let dy = (p.y - c.y) / c.y;
        let dist = (dx * dx + dy * dy).sqrt().min(1.0);
        let k = self.max_offset * (1.0 - EDGE_ATTENUATION * dist);
        Vector2::new(dx * k, dy * k)
    }

    /// One frame of parallax.
    pub fn update(&mut self, pointer: Option<Vector2>, viewport: &Viewport) {
        match pointer.filter(|p| viewport.contains_screen(*p)) {
            Some(p) => self.target = self.target_for(p, viewport),
            None => self.target = self.target * self.decay,
        }
        self.current = self.current + (self.target - self.current) * self.lerp;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vp() -> Viewport {
        Viewport::new(1280, 720, 640, 360)
    }

    #[test]
    fn pointer_at_center_targets_zero() {
        let p = Parallax::default();
        let t = p.target_for(Vector2::new(640.0, 360.0), &vp());
        assert_eq!(t, Vector2::zero());
    }

    #[test]
    fn edges_are_attenuated() {
        let p = Parallax::default();
        let right = p.target_for(Vector2::new(1280.0, 360.0), &vp());
        assert!((right.x - 12.0 * 0.3).abs() < 1e-5);
        let half = p.target_for(Vector2::new(960.0, 360.0), &vp());
        assert!((half.x - 0.5 * 12.0 * 0.65).abs() < 1e-5);
        assert_eq!(half.y, 0.0);
    }

    #[test]
    fn current_eases_toward_target() {
        let mut p = Parallax::default();
        p.update(Some(Vector2::new(960.0, 360.0)), &vp());
        let target = p.target.x;
        assert!((p.current.x - target * 0.08).abs() < 1e-5);
        for _ in 0..200 {
            p.update(Some(Vector2::new(960.0, 360.0)), &vp());
        }
        assert!((p.current.x - target).abs() < 1e-3);
    }

    #[test]
    fn target_decays_when_pointer_leaves() {
        let mut p = Parallax::default();
        p.update(Some(Vector2::new(960.0, 360.0)), &vp());
        let t0 = p.target.x;
        p.update(None, &vp());
        assert!((p.target.x - t0 * 0.9).abs() < 1e-5);
        p.update(Some(Vector2::new(-5.0, 10.0)), &vp());
        assert!((p.target.x - t0 * 0.81).abs() < 1e-5);
    }
}
