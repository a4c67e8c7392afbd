//! Draw order.
//!
//! The render pass sorts by [`ZIndex`] ascending, so higher values land on
//! top. Tile layers take theirs from their position in the level file: the
//! first layer listed is the topmost.

use bevy_ecs::prelude::Component;

#[derive(Component, Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ZIndex(pub i32);

impl ZIndex {
    /// Z of layer `index` out of `count`: `count - index`, strictly
    /// decreasing in file order and never below 1.
    pub fn for_layer(index: usize, count: usize) -> Self {
        ZIndex(count.saturating_sub(index).max(1) as i32)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_layer_is_topmost() {
        let zs: Vec<i32> = (0..3).map(|i| ZIndex::for_layer(i, 3).0).collect();
        assert_eq!(zs, vec![3, 2, 1]);
        assert!(ZIndex::for_layer(0, 3) > ZIndex::for_layer(1, 3));
    }
}
