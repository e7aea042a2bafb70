//! Shared primitive types used across the engine.

/// Stable identifier of a generator kind, as declared in the catalog.
pub type GeneratorId = String;

/// Stable identifier of an upgrade, as declared in the catalog.
pub type UpgradeId = String;

/// A Unix-epoch timestamp in milliseconds.
pub type TimestampMs = i64;
