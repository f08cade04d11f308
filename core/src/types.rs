//! Shared primitive types used across the whole crate.

/// Zero-based position of a household within a generated batch.
pub type HouseholdIndex = u64;

/// A stable, unique identifier for any generated entity.
pub type EntityId = String;

/// The canonical dataset run identifier.
pub type RunId = String;
