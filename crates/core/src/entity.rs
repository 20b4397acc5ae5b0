//! Entity trait: identity + continuity across state changes.

/// Entity marker + minimal interface.
///
/// Participants and expenses are entities: renaming a participant or replacing
/// an expense keeps the same identifier.
pub trait Entity {
    /// Strongly-typed entity identifier.
    type Id: Clone + Eq + core::hash::Hash + core::fmt::Debug;

    /// Returns the entity identifier.
    fn id(&self) -> &Self::Id;
}
