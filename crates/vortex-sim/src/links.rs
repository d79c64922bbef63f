//! Components that reference other entities.
//!
//! Ownership is expressed by handle: the parent holds its children's
//! generational `Entity` handles and the maintenance pass disposes them by
//! lookup. Stale handles are harmless; hecs rejects them.

use hecs::Entity;

use vortex_core::types::Vec2;

/// Entity that fired a bullet or owns a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Owner(pub Entity);

/// Entities disposed together with their parent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Children(pub Vec<Entity>);

/// Position follows the parent at a (possibly orbiting) offset.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Attached {
    pub parent: Entity,
    pub offset: Vec2,
    /// Offset rotation per tick (rad). Zero for rigid attachments.
    pub orbit_speed: f64,
}
