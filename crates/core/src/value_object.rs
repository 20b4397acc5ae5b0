//! Value object trait: equality by value, not identity.
//!
//! A split (`participant + percentage`) or a currency descriptor has no identity
//! of its own. Two splits naming the same participant with the same percentage
//! are interchangeable.

/// Marker trait for value objects.
///
/// Value objects are **immutable** and **compared by value**. To "modify" one,
/// build a new value.
///
/// ```ignore
/// #[derive(Debug, Clone, PartialEq)]
/// struct Split {
///     participant_id: ParticipantId,
///     percentage: f64,
/// }
///
/// impl ValueObject for Split {}
/// ```
pub trait ValueObject: Clone + PartialEq + core::fmt::Debug {}
