use std::{
    fs::File,
    io::BufReader,
    path::{Path, PathBuf},
};

use anyhow::Context as _;
use clap::{Parser, Subcommand, ValueEnum};

#[derive(Parser, Debug)]
#[command(name = "graphreel", version)]
struct Cli {
    /// Log pipeline diagnostics to stderr (`RUST_LOG` overrides the level).
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render a whole search as an animated GIF.
    Render(RenderArgs),
    /// Render the frame of a single step as a PNG.
    Frame(FrameArgs),
}

#[derive(Parser, Debug)]
struct SearchArgs {
    /// Input graph JSON.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Name of the start node.
    #[arg(long)]
    start: String,

    /// Name of the goal node; without it the whole reachable component is explored.
    #[arg(long)]
    goal: Option<String>,

    /// Search algorithm (defaults to the config file value, then BFS).
    #[arg(long, value_enum)]
    algorithm: Option<AlgorithmChoice>,

    /// Pipeline config JSON; command-line flags override its values.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Abort with an error after this many node expansions.
    #[arg(long)]
    max_steps: Option<usize>,

    /// Fail when the goal cannot be reached.
    #[arg(long)]
    require_goal: bool,

    /// Draw node names and edge weights with this TrueType/OpenType font.
    #[arg(long)]
    font: Option<PathBuf>,
}

#[derive(Parser, Debug)]
struct RenderArgs {
    #[command(flatten)]
    search: SearchArgs,

    /// Output GIF path.
    #[arg(long)]
    out: PathBuf,

    /// Display time of each step frame.
    #[arg(long, conflicts_with = "fps")]
    frame_ms: Option<u32>,

    /// Step frames per second (alternative to `--frame-ms`).
    #[arg(long)]
    fps: Option<u32>,

    /// Display time of the result highlight frame(s).
    #[arg(long)]
    highlight_ms: Option<u32>,

    /// Number of result highlight frames.
    #[arg(long)]
    highlight_frames: Option<u32>,

    /// Animation repeat count (0 loops forever).
    #[arg(long)]
    loop_count: Option<u16>,

    /// Rasterize frames on a thread pool.
    #[arg(long)]
    parallel: bool,

    /// Worker threads for `--parallel`.
    #[arg(long)]
    threads: Option<usize>,
}

#[derive(Parser, Debug)]
struct FrameArgs {
    #[command(flatten)]
    search: SearchArgs,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,

    /// Step index (0-based); indices past the last step give the result highlight.
    #[arg(long)]
    step: usize,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum AlgorithmChoice {
    Bfs,
    Dfs,
    #[value(alias = "dijkstra")]
    UniformCost,
}

impl From<AlgorithmChoice> for graphreel::Algorithm {
    fn from(choice: AlgorithmChoice) -> Self {
        match choice {
            AlgorithmChoice::Bfs => Self::Bfs,
            AlgorithmChoice::Dfs => Self::Dfs,
            AlgorithmChoice::UniformCost => Self::UniformCost,
        }
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    if cli.verbose {
        init_tracing();
    }
    match cli.cmd {
        Command::Render(args) => cmd_render(args),
        Command::Frame(args) => cmd_frame(args),
    }
}

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("graphreel=debug"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn read_graph_json(path: &Path) -> anyhow::Result<graphreel::GraphSpec> {
    let f = File::open(path).with_context(|| format!("open graph '{}'", path.display()))?;
    let spec = graphreel::GraphSpec::from_reader(BufReader::new(f))
        .with_context(|| format!("parse graph '{}'", path.display()))?;
    Ok(spec)
}

fn read_config(path: Option<&Path>) -> anyhow::Result<graphreel::PipelineConfig> {
    let Some(path) = path else {
        return Ok(graphreel::PipelineConfig::default());
    };
    let f = File::open(path).with_context(|| format!("open config '{}'", path.display()))?;
    let cfg = serde_json::from_reader(BufReader::new(f))
        .with_context(|| format!("parse config '{}'", path.display()))?;
    Ok(cfg)
}

/// Load the graph and config shared by both commands and resolve the endpoints.
fn prepare(
    args: &SearchArgs,
) -> anyhow::Result<(
    graphreel::Graph,
    graphreel::NodeId,
    Option<graphreel::NodeId>,
    graphreel::PipelineConfig,
)> {
    let graph = read_graph_json(&args.in_path)?.build()?;
    let (start, goal) =
        graphreel::resolve_endpoints(&graph, &args.start, args.goal.as_deref())?;

    let mut cfg = read_config(args.config.as_deref())?;
    if let Some(algorithm) = args.algorithm {
        cfg.algorithm = algorithm.into();
    }
    if args.max_steps.is_some() {
        cfg.max_steps = args.max_steps;
    }
    cfg.require_goal |= args.require_goal;
    if let Some(font) = &args.font {
        cfg.style.labels.enabled = true;
        cfg.style.labels.font_path = Some(font.clone());
    }
    Ok((graph, start, goal, cfg))
}

fn create_parent_dir(out: &Path) -> anyhow::Result<()> {
    if let Some(parent) = out.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    Ok(())
}

fn cmd_render(args: RenderArgs) -> anyhow::Result<()> {
    let (graph, start, goal, mut cfg) = prepare(&args.search)?;
    if let Some(ms) = args.frame_ms {
        cfg.frame_duration_ms = ms;
    }
    if let Some(fps) = args.fps {
        cfg.frame_duration_ms = graphreel::frame_duration_from_fps(fps);
    }
    if let Some(ms) = args.highlight_ms {
        cfg.result_highlight_duration_ms = ms;
    }
    if let Some(n) = args.highlight_frames {
        cfg.highlight_frames = n;
    }
    if let Some(n) = args.loop_count {
        cfg.loop_count = n;
    }
    cfg.threading.parallel |= args.parallel;
    if args.threads.is_some() {
        cfg.threading.threads = args.threads;
    }

    let out = graphreel::render_traversal_gif(&graph, start, goal, &cfg)?;

    create_parent_dir(&args.out)?;
    std::fs::write(&args.out, &out.bytes)
        .with_context(|| format!("write gif '{}'", args.out.display()))?;

    let outcome = &out.report.outcome;
    if let Some(goal) = goal {
        if outcome.found {
            let path: Vec<&str> = outcome.path.iter().map(|&id| graph.name(id)).collect();
            eprintln!("goal '{}' reached: {}", graph.name(goal), path.join(" -> "));
        } else {
            eprintln!("goal '{}' not reachable", graph.name(goal));
        }
    }
    eprintln!(
        "wrote {} ({} frames, {} steps, {}x{})",
        args.out.display(),
        out.report.frames,
        outcome.steps,
        out.report.canvas.width,
        out.report.canvas.height
    );
    Ok(())
}

fn cmd_frame(args: FrameArgs) -> anyhow::Result<()> {
    let (graph, start, goal, cfg) = prepare(&args.search)?;
    let frame = graphreel::render_step_frame(&graph, start, goal, &cfg, args.step)?;
    let png = graphreel::encode_png(&frame, cfg.style.background)?;

    create_parent_dir(&args.out)?;
    std::fs::write(&args.out, png)
        .with_context(|| format!("write png '{}'", args.out.display()))?;

    eprintln!("wrote {}", args.out.display());
    Ok(())
}
