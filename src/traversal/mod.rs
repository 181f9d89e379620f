/// Step-wise search engine.
pub mod engine;
/// Per-step snapshots and node classes.
pub mod state;
