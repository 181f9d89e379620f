/// Deterministic fallback layouts and geometry helpers.
pub mod layout;
/// Immutable graph arena.
pub mod model;
/// Serializable graph descriptions (loader input).
pub mod spec;
