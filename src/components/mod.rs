//! ECS components for entities.
//!
//! Submodules overview:
//! - [`animatedtile`] – frame-cycling tile record and its pure frame clock
//! - [`animation`] – per-entity animation state machine and its bus binding
//! - [`boxcollider`] – axis-aligned hit box centered on the entity position
//! - [`interactive`] – pointer-interaction tags, flag and callbacks
//! - [`mapposition`] – world-space position (pivot) for an entity
//! - [`signalsubscriptions`] – subscriptions owned by an entity or handler
//! - [`sprite`] – sprite-sheet region drawn for an entity
//! - [`tile`] – placed tile and layer container
//! - [`zindex`] – rendering order hint for 2D drawing

pub mod animatedtile;
pub mod animation;
pub mod boxcollider;
pub mod interactive;
pub mod mapposition;
pub mod signalsubscriptions;
pub mod sprite;
pub mod tile;
pub mod zindex;
