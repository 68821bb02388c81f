//! Entity trait: identity + continuity across state changes.

use crate::id::UserId;

/// Entity marker + minimal interface.
pub trait Entity {
    /// Strongly-typed entity identifier.
    type Id: Clone + Eq + core::hash::Hash + core::fmt::Debug;

    /// Returns the entity identifier.
    fn id(&self) -> &Self::Id;

    /// The user who owns this record. Every query and write is scoped by it.
    fn owner(&self) -> UserId;
}
