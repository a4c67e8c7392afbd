//! Frame-cycling tile animation.
//!
//! [`AnimatedTile`] is the record the Animated Tile Updater
//! ([`crate::systems::animatedtile::animated_tile_system`]) mutates. Its
//! timing lives in [`FrameClock`], a small value type advanced through the pure
//! [`FrameClock::advance`] so that readers never observe a half-updated
//! frame.
//!
//! Times are milliseconds of [`WorldTime`](crate::resources::worldtime::WorldTime).
//! The visual back-reference is the [`Sprite`](super::sprite::Sprite) component
//! living on the same entity; character states own their tile directly.

use bevy_ecs::prelude::Component;
use smallvec::SmallVec;

/// Current position in a frame cycle and when it was last changed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameClock {
    pub current_frame: usize,
    pub last_frame_time: f64,
}

impl FrameClock {
    pub fn starting_at(now: f64) -> Self {
        Self {
            current_frame: 0,
            last_frame_time: now,
        }
    }

    /// Returns the clock after `now`, or `None` when no frame is due.
    ///
    /// Every whole `frame_duration` elapsed since `last_frame_time` advances
    /// one frame (wrapping at `frame_count`), and the clock is re-stamped at
    /// `now`. Calling again with the same `now` is therefore a no-op.
    pub fn advance(self, now: f64, frame_duration: f64, frame_count: usize) -> Option<Self> {
        if frame_count == 0 || frame_duration <= 0.0 {
            return None;
        }
        let elapsed = now - self.last_frame_time;
        if elapsed < frame_duration {
            return None;
        }
        let steps = (elapsed / frame_duration).floor() as usize;
        Some(Self {
            current_frame: (self.current_frame + steps) % frame_count,
            last_frame_time: now,
        })
    }
}

/// Tile whose displayed sprite-sheet region cycles through `frames`.
#[derive(Component, Debug, Clone, PartialEq)]
pub struct AnimatedTile {
    /// Sprite-sheet indices, shown in order.
    pub frames: SmallVec<[u32; 8]>,
    /// Milliseconds each frame stays visible.
    pub frame_duration: f64,
    pub clock: FrameClock,
}

impl AnimatedTile {
    pub fn new(frames: impl IntoIterator<Item = u32>, frame_duration: f64) -> Self {
        Self {
            frames: frames.into_iter().collect(),
            frame_duration,
            clock: FrameClock::starting_at(0.0),
        }
    }

    pub fn started_at(mut self, now: f64) -> Self {
        self.clock = FrameClock::starting_at(now);
        self
    }

    pub fn current_frame(&self) -> usize {
        self.clock.current_frame
    }

    pub fn last_frame_time(&self) -> f64 {
        self.clock.last_frame_time
    }

    /// Sprite-sheet index of the frame currently shown.
    pub fn current_frame_id(&self) -> Option<u32> {
        self.frames.get(self.clock.current_frame).copied()
    }

    /// Advance to `now`. Returns `true` when the visible frame changed.
    pub fn advance(&mut self, now: f64) -> bool {
        match self
            .clock
            .advance(now, self.frame_duration, self.frames.len())
        {
            Some(next) => {
                let changed = next.current_frame != self.clock.current_frame;
                self.clock = next;
                changed
            }
            None => false,
        }
    }

    /// Rewind to the first frame.
    pub fn reset(&mut self, now: f64) {
        self.clock = FrameClock::starting_at(now);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_advance_before_duration() {
        let clock = FrameClock::starting_at(0.0);
        assert_eq!(clock.advance(99.9, 100.0, 4), None);
    }

    #[test]
    fn advances_one_frame_per_duration() {
        let mut clock = FrameClock::starting_at(0.0);
        for k in 1..=9 {
            clock = clock.advance(k as f64 * 100.0, 100.0, 4).unwrap();
            assert_eq!(clock.current_frame, k % 4);
        }
    }

    #[test]
    fn catches_up_after_a_long_gap() {
        let clock = FrameClock::starting_at(0.0);
        let next = clock.advance(700.0, 100.0, 4).unwrap();
        assert_eq!(next.current_frame, 3);
        assert_eq!(next.last_frame_time, 700.0);
    }

    #[test]
    fn same_now_twice_is_idempotent() {
        let mut tile = AnimatedTile::new([1, 2, 3], 50.0);
        assert!(tile.advance(50.0));
        let snapshot = tile.clone();
        assert!(!tile.advance(50.0));
        assert_eq!(tile, snapshot);
    }

    #[test]
    fn less_than_a_duration_after_last_update_changes_nothing() {
        let mut tile = AnimatedTile::new([1, 2, 3], 50.0);
        tile.advance(60.0);
        assert!(!tile.advance(109.0));
        assert_eq!(tile.current_frame(), 1);
        assert_eq!(tile.last_frame_time(), 60.0);
    }

    #[test]
    fn degenerate_cycles_never_advance() {
        assert_eq!(FrameClock::starting_at(0.0).advance(1000.0, 0.0, 4), None);
        assert_eq!(FrameClock::starting_at(0.0).advance(1000.0, 10.0, 0), None);
        let mut tile = AnimatedTile::new([], 10.0);
        assert!(!tile.advance(100.0));
        assert_eq!(tile.current_frame_id(), None);
    }

    #[test]
    fn single_frame_cycle_restamps_without_changing() {
        let mut tile = AnimatedTile::new([7], 10.0);
        assert!(!tile.advance(30.0));
        assert_eq!(tile.last_frame_time(), 30.0);
        assert_eq!(tile.current_frame_id(), Some(7));
    }
}
