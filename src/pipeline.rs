use crate::{
    encode::gif::{GifConfig, GifEncoder},
    encode::sink::FrameSink,
    foundation::core::{Canvas, NodeId},
    foundation::error::{ReelError, ReelResult},
    graph::model::Graph,
    graph::spec::GraphSpec,
    render::cpu::{FrameRenderer, RenderThreading},
    render::frame::FrameRGBA,
    render::style::RenderStyle,
    traversal::engine::{Algorithm, Step, Traversal, TraversalOptions, TraversalOutcome},
    traversal::state::TraversalState,
};

/// Frame duration for a frames-per-second rate; rates below 1 are treated as 1.
///
/// The result is at least 1 ms, so rates above 1000 fps still give a valid duration.
pub fn frame_duration_from_fps(fps: u32) -> u32 {
    (1000 / fps.max(1)).max(1)
}

/// Everything the command surface can choose for one run.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Search algorithm.
    pub algorithm: Algorithm,
    /// Display time of each step frame.
    pub frame_duration_ms: u32,
    /// Display time of each result highlight frame.
    pub result_highlight_duration_ms: u32,
    /// How many highlight frames to append after the search ends.
    pub highlight_frames: u32,
    /// Animation repeat count; 0 loops forever.
    pub loop_count: u16,
    /// Defensive ceiling on node expansions.
    pub max_steps: Option<usize>,
    /// Treat an unreachable goal as an error instead of a normal outcome.
    pub require_goal: bool,
    /// Palette quantizer speed for GIF output (1..=30).
    pub quantizer_speed: i32,
    /// Colors and drawing constants.
    pub style: RenderStyle,
    /// Optional parallel rasterization.
    pub threading: RenderThreading,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            algorithm: Algorithm::Bfs,
            frame_duration_ms: 400,
            result_highlight_duration_ms: 2000,
            highlight_frames: 1,
            loop_count: 0,
            max_steps: None,
            require_goal: false,
            quantizer_speed: 10,
            style: RenderStyle::default(),
            threading: RenderThreading::default(),
        }
    }
}

impl PipelineConfig {
    /// Reject values the pipeline cannot honor.
    pub fn validate(&self) -> ReelResult<()> {
        if self.frame_duration_ms == 0 {
            return Err(ReelError::validation("frame_duration_ms must be > 0"));
        }
        if self.result_highlight_duration_ms == 0 {
            return Err(ReelError::validation(
                "result_highlight_duration_ms must be > 0",
            ));
        }
        if self.max_steps == Some(0) {
            return Err(ReelError::validation("max_steps must be >= 1 when set"));
        }
        if self.threading.threads == Some(0) {
            return Err(ReelError::validation(
                "render threading 'threads' must be >= 1 when set",
            ));
        }
        self.style.validate()?;
        self.gif_config().validate()
    }

    /// Traversal limits derived from this config.
    pub fn traversal_options(&self) -> TraversalOptions {
        TraversalOptions {
            max_steps: self.max_steps,
            require_goal: self.require_goal,
        }
    }

    /// GIF encoder settings derived from this config.
    pub fn gif_config(&self) -> GifConfig {
        GifConfig {
            loop_count: self.loop_count,
            background: self.style.background,
            speed: self.quantizer_speed,
        }
    }
}

/// Summary of a finished run.
#[derive(Clone, Debug, PartialEq)]
pub struct PipelineReport {
    /// How the search ended.
    pub outcome: TraversalOutcome,
    /// Frames handed to the sink (steps plus highlight frames).
    pub frames: usize,
    /// Shared frame size.
    pub canvas: Canvas,
    /// Sum of all frame durations.
    pub duration_ms: u64,
}

/// Artifact bytes plus the run summary.
#[derive(Clone, Debug, PartialEq)]
pub struct PipelineOutput {
    /// Finished artifact (empty for sinks that keep frames in memory).
    pub bytes: Vec<u8>,
    /// Run summary.
    pub report: PipelineReport,
}

/// Drive traversal, rendering and encoding into `sink`.
///
/// Every emitted state becomes one frame of `frame_duration_ms`; when the search ends,
/// `highlight_frames` frames of the result highlight are appended with
/// `result_highlight_duration_ms`, then the sink is finished. The first error aborts the run and
/// the sink is never finished, so no partial artifact is produced.
#[tracing::instrument(skip(graph, cfg, sink), fields(algorithm = ?cfg.algorithm))]
pub fn render_traversal(
    graph: &Graph,
    start: NodeId,
    goal: Option<NodeId>,
    cfg: &PipelineConfig,
    sink: &mut dyn FrameSink,
) -> ReelResult<PipelineOutput> {
    cfg.validate()?;
    let renderer = FrameRenderer::new(graph, cfg.style.clone())?;
    let mut traversal = Traversal::new(
        graph,
        cfg.algorithm,
        start,
        goal,
        cfg.traversal_options(),
    )?;

    let mut tally = FrameTally::default();
    if cfg.threading.parallel {
        let (states, _) = traversal.run_to_end()?;
        for frame in renderer.render_many(graph, &states, &cfg.threading)? {
            tally.push(sink, frame, cfg.frame_duration_ms)?;
        }
    } else {
        while let Step::State(state) = traversal.step()? {
            tally.push(sink, renderer.render(graph, &state), cfg.frame_duration_ms)?;
        }
    }

    let (Some(outcome), Some(highlight)) =
        (traversal.outcome().cloned(), traversal.highlight_state())
    else {
        return Err(ReelError::validation(
            "traversal stopped without an outcome (bug)",
        ));
    };

    if cfg.highlight_frames > 0 {
        let frame = renderer.render(graph, &highlight);
        for _ in 0..cfg.highlight_frames {
            tally.push(sink, frame.clone(), cfg.result_highlight_duration_ms)?;
        }
    }

    let bytes = sink.finish()?;
    tracing::debug!(
        frames = tally.frames,
        found = outcome.found,
        steps = outcome.steps,
        bytes = bytes.len(),
        "pipeline finished"
    );

    Ok(PipelineOutput {
        bytes,
        report: PipelineReport {
            outcome,
            frames: tally.frames,
            canvas: renderer.canvas(),
            duration_ms: tally.duration_ms,
        },
    })
}

#[derive(Default)]
struct FrameTally {
    frames: usize,
    duration_ms: u64,
}

impl FrameTally {
    fn push(&mut self, sink: &mut dyn FrameSink, frame: FrameRGBA, ms: u32) -> ReelResult<()> {
        sink.push_frame(frame, ms)?;
        self.frames += 1;
        self.duration_ms += u64::from(ms);
        Ok(())
    }
}

/// Run the pipeline into an animated GIF.
pub fn render_traversal_gif(
    graph: &Graph,
    start: NodeId,
    goal: Option<NodeId>,
    cfg: &PipelineConfig,
) -> ReelResult<PipelineOutput> {
    let mut encoder = GifEncoder::new(cfg.gif_config())?;
    render_traversal(graph, start, goal, cfg, &mut encoder)
}

/// Build the graph from `spec`, resolve node names and render a GIF.
pub fn run_pipeline(
    spec: &GraphSpec,
    start: &str,
    goal: Option<&str>,
    cfg: &PipelineConfig,
) -> ReelResult<PipelineOutput> {
    let graph = spec.build()?;
    let (start, goal) = resolve_endpoints(&graph, start, goal)?;
    render_traversal_gif(&graph, start, goal, cfg)
}

/// Resolve start/goal names against `graph`.
pub fn resolve_endpoints(
    graph: &Graph,
    start: &str,
    goal: Option<&str>,
) -> ReelResult<(NodeId, Option<NodeId>)> {
    let lookup = |name: &str, role: &str| {
        graph
            .node_id(name)
            .ok_or_else(|| ReelError::validation(format!("unknown {role} node '{name}'")))
    };
    let start = lookup(start, "start")?;
    let goal = goal.map(|g| lookup(g, "goal")).transpose()?;
    Ok((start, goal))
}

/// Render the frame for step `index` (0-based) of a run.
///
/// Indices past the last step render the result highlight.
pub fn render_step_frame(
    graph: &Graph,
    start: NodeId,
    goal: Option<NodeId>,
    cfg: &PipelineConfig,
    index: usize,
) -> ReelResult<FrameRGBA> {
    cfg.validate()?;
    let renderer = FrameRenderer::new(graph, cfg.style.clone())?;
    let mut traversal = Traversal::new(
        graph,
        cfg.algorithm,
        start,
        goal,
        cfg.traversal_options(),
    )?;
    let (mut states, _) = traversal.run_to_end()?;

    let state: TraversalState = if index < states.len() {
        states.swap_remove(index)
    } else {
        traversal
            .highlight_state()
            .ok_or_else(|| ReelError::validation("traversal has no highlight state (bug)"))?
    };
    Ok(renderer.render(graph, &state))
}

#[cfg(test)]
#[path = "../tests/unit/pipeline.rs"]
mod tests;
