use bevy_ecs::prelude::Component;
use raylib::prelude::Vector2;

/// Side of the hit box used when an interactive entity has no collider.
pub const DEFAULT_COLLIDER_SIZE: f32 = 32.0;

/// Axis-aligned box centered on the entity position (plus `offset`).
#[derive(Debug, Clone, Copy, PartialEq, Component)]
pub struct BoxCollider {
    pub size: Vector2,
    pub offset: Vector2,
}

impl Default for BoxCollider {
    fn default() -> Self {
        Self::new(DEFAULT_COLLIDER_SIZE, DEFAULT_COLLIDER_SIZE)
    }
}

impl BoxCollider {
    /// Create a BoxCollider with given size
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            size: Vector2::new(width, height),
            offset: Vector2::zero(),
        }
    }

    /// Modify BoxCollider with given offset
    pub fn with_offset(mut self, offset: Vector2) -> Self {
        self.offset = offset;
        self
    }

    /// Returns (min, max) of the collider AABB for a given entity position.
    /// Handles negative size by normalizing to proper min/max.
    pub fn aabb(&self, position: Vector2) -> (Vector2, Vector2) {
        let center = position + self.offset;
        let half = Vector2::new(self.size.x.abs() * 0.5, self.size.y.abs() * 0.5);
        (center - half, center + half)
    }

    pub fn get_aabb(&self, position: Vector2) -> (f32, f32, f32, f32) {
        let (min, max) = self.aabb(position);
        (min.x, min.y, max.x - min.x, max.y - min.y)
    }

    /// Point containment in world space. Edges count as inside.
    pub fn contains_point(&self, position: Vector2, point: Vector2) -> bool {
        let (min, max) = self.aabb(position);
        point.x >= min.x && point.x <= max.x && point.y >= min.y && point.y <= max.y
    }
}
