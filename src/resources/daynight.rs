//! Day/night cycle value handed to the post-process stage.

use bevy_ecs::prelude::Resource;

pub const DEFAULT_CYCLE_SECONDS: f32 = 240.0;

/// `value = elapsed_seconds / cycle_seconds`. It grows without bound; the
/// shader takes the fractional part as the time of day.
#[derive(Resource, Debug, Clone, Copy, PartialEq)]
pub struct DayNightCycle {
    pub cycle_seconds: f32,
    pub value: f32,
}

impl Default for DayNightCycle {
    fn default() -> Self {
        Self::new(DEFAULT_CYCLE_SECONDS)
    }
}

impl DayNightCycle {
    pub fn new(cycle_seconds: f32) -> Self {
        Self {
            cycle_seconds,
            value: 0.0,
        }
    }

    pub fn update(&mut self, elapsed_seconds: f32) {
        self.value = if self.cycle_seconds > 0.0 {
            elapsed_seconds / self.cycle_seconds
        } else {
            0.0
        };
    }

    /// Position within the current day, in `[0, 1)`.
    pub fn phase(&self) -> f32 {
        self.value.fract()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn value_is_elapsed_over_cycle() {
        let mut c = DayNightCycle::new(240.0);
        c.update(60.0);
        assert_eq!(c.value, 0.25);
        c.update(300.0);
        assert_eq!(c.value, 1.25);
        assert!((c.phase() - 0.25).abs() < 1e-6);
    }

    #[test]
    fn zero_cycle_stays_at_zero() {
        let mut c = DayNightCycle::new(0.0);
        c.update(10.0);
        assert_eq!(c.value, 0.0);
    }
}
