/// Shared value types (ids, colors, geometry).
pub mod core;
/// Error taxonomy.
pub mod error;
