//! Encoding of rendered frames into artifacts.
//!
//! Encoders only produce bytes; persisting them is up to the caller.

/// Animated GIF encoder.
pub mod gif;
/// Single-frame PNG export.
pub mod png;
/// Generic frame sink trait and built-in sinks.
pub mod sink;
