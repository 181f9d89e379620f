//! Graphreel turns graph searches into animations.
//!
//! A search (BFS, DFS or uniform-cost) is stepped one node expansion at a time; every step is
//! rasterized into a frame of a fixed canvas and the frames are encoded into an animated GIF:
//!
//! - Load and validate a [`GraphSpec`] into an immutable [`Graph`]
//! - Step a [`Traversal`] to get one [`TraversalState`] per expansion
//! - Rasterize states with a [`FrameRenderer`]
//! - Stream frames into a [`FrameSink`] such as [`GifEncoder`]
//!
//! [`run_pipeline`] wires all of the above together.
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod foundation;

/// Encoding sinks.
pub mod encode;
/// Graph model, loader and layout.
pub mod graph;
/// Orchestration of traversal, rendering and encoding.
pub mod pipeline;
/// CPU rendering of traversal states.
pub mod render;
/// Step-wise search engine.
pub mod traversal;

pub use crate::foundation::core::{Canvas, NodeId, Point, Rect, Rgba8, Vec2};
pub use crate::foundation::error::{ReelError, ReelResult};

pub use crate::encode::gif::{Animation, GifConfig, GifEncoder};
pub use crate::encode::png::encode_png;
pub use crate::encode::sink::{FrameSink, InMemorySink};
pub use crate::graph::model::{Edge, Graph, Node, build_graph};
pub use crate::graph::spec::{EdgeSpec, GraphSpec, NodeSpec};
pub use crate::pipeline::{
    PipelineConfig, PipelineOutput, PipelineReport, frame_duration_from_fps, render_step_frame,
    render_traversal, render_traversal_gif, resolve_endpoints, run_pipeline,
};
pub use crate::render::cpu::{FrameRenderer, RenderThreading};
pub use crate::render::frame::{FrameRGBA, TimedFrame};
pub use crate::render::labels::format_weight;
pub use crate::render::style::{ClassPalette, LabelStyle, RenderStyle};
pub use crate::traversal::engine::{
    Algorithm, Step, Traversal, TraversalOptions, TraversalOutcome,
};
pub use crate::traversal::state::{NodeClass, TraversalState};
