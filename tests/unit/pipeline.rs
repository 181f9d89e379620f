use super::*;
use crate::encode::sink::InMemorySink;
use crate::graph::spec::{EdgeSpec, NodeSpec};
use crate::traversal::state::NodeClass;

fn square_spec() -> GraphSpec {
    GraphSpec {
        nodes: vec![
            NodeSpec::at("A", 0.0, 0.0),
            NodeSpec::at("B", 100.0, 0.0),
            NodeSpec::at("C", 0.0, 100.0),
            NodeSpec::at("D", 100.0, 100.0),
            NodeSpec::at("E", 200.0, 200.0),
        ],
        edges: vec![
            EdgeSpec::undirected("A", "B", 1.0),
            EdgeSpec::undirected("A", "C", 1.0),
            EdgeSpec::undirected("B", "D", 1.0),
        ],
    }
}

fn cfg() -> PipelineConfig {
    PipelineConfig {
        frame_duration_ms: 100,
        result_highlight_duration_ms: 900,
        ..PipelineConfig::default()
    }
}

fn run_in_memory(
    start: &str,
    goal: Option<&str>,
    cfg: &PipelineConfig,
) -> (ReelResult<PipelineOutput>, InMemorySink) {
    let graph = square_spec().build().unwrap();
    let (start, goal) = resolve_endpoints(&graph, start, goal).unwrap();
    let mut sink = InMemorySink::new();
    let out = render_traversal(&graph, start, goal, cfg, &mut sink);
    (out, sink)
}

#[test]
fn one_frame_per_step_plus_highlight() {
    let (out, sink) = run_in_memory("A", Some("D"), &cfg());
    let out = out.unwrap();

    assert!(out.report.outcome.found);
    assert_eq!(out.report.outcome.steps, 4);
    assert_eq!(out.report.frames, 5);
    assert_eq!(out.report.duration_ms, 4 * 100 + 900);
    assert!(sink.is_finished());

    let durations: Vec<u32> = sink.frames().iter().map(|f| f.duration_ms).collect();
    assert_eq!(durations, vec![100, 100, 100, 100, 900]);

    let canvas = out.report.canvas;
    for f in sink.frames() {
        assert_eq!((f.frame.width, f.frame.height), (canvas.width, canvas.height));
    }
}

#[test]
fn highlight_frame_count_is_configurable() {
    let cfg = PipelineConfig {
        highlight_frames: 3,
        ..cfg()
    };
    let (out, sink) = run_in_memory("A", Some("D"), &cfg);
    assert_eq!(out.unwrap().report.frames, 7);
    assert_eq!(sink.frames().len(), 7);

    let cfg = PipelineConfig {
        highlight_frames: 0,
        ..cfg
    };
    let (out, _) = run_in_memory("A", Some("D"), &cfg);
    assert_eq!(out.unwrap().report.frames, 4);
}

#[test]
fn unreachable_goal_is_a_normal_outcome_by_default() {
    let (out, sink) = run_in_memory("A", Some("E"), &cfg());
    let out = out.unwrap();
    assert!(!out.report.outcome.found);
    assert!(out.report.outcome.path.is_empty());
    assert_eq!(out.report.outcome.steps, 4);
    assert_eq!(sink.frames().len(), 5);
}

#[test]
fn required_goal_fails_without_finishing_the_sink() {
    let cfg = PipelineConfig {
        require_goal: true,
        ..cfg()
    };
    let (out, sink) = run_in_memory("A", Some("E"), &cfg);
    assert!(matches!(out.unwrap_err(), ReelError::UnreachableGoal(_)));
    assert!(!sink.is_finished());
}

#[test]
fn step_limit_fails_fast() {
    let cfg = PipelineConfig {
        max_steps: Some(2),
        ..cfg()
    };
    let (out, sink) = run_in_memory("A", Some("D"), &cfg);
    assert!(matches!(
        out.unwrap_err(),
        ReelError::StepLimitExceeded { limit: 2 }
    ));
    assert!(!sink.is_finished());
}

#[test]
fn parallel_rendering_matches_sequential() {
    let (_, seq) = run_in_memory("A", None, &cfg());
    let par_cfg = PipelineConfig {
        threading: RenderThreading {
            parallel: true,
            threads: Some(2),
        },
        ..cfg()
    };
    let (_, par) = run_in_memory("A", None, &par_cfg);
    assert_eq!(seq.frames(), par.frames());
}

#[test]
fn invalid_config_is_rejected_before_rendering() {
    for bad in [
        PipelineConfig {
            frame_duration_ms: 0,
            ..cfg()
        },
        PipelineConfig {
            result_highlight_duration_ms: 0,
            ..cfg()
        },
        PipelineConfig {
            max_steps: Some(0),
            ..cfg()
        },
        PipelineConfig {
            quantizer_speed: 99,
            ..cfg()
        },
    ] {
        let (out, sink) = run_in_memory("A", Some("D"), &bad);
        assert!(matches!(out.unwrap_err(), ReelError::Validation(_)));
        assert!(sink.frames().is_empty());
    }
}

#[test]
fn unknown_node_names_are_rejected() {
    let err = run_pipeline(&square_spec(), "Z", None, &cfg()).unwrap_err();
    assert!(err.to_string().contains("unknown start node 'Z'"));
    let err = run_pipeline(&square_spec(), "A", Some("Q"), &cfg()).unwrap_err();
    assert!(err.to_string().contains("unknown goal node 'Q'"));
}

#[test]
fn run_pipeline_produces_a_gif() {
    let out = run_pipeline(&square_spec(), "A", Some("D"), &cfg()).unwrap();
    assert!(out.bytes.starts_with(b"GIF89a"));
    assert_eq!(out.report.frames, 5);
}

#[test]
fn step_frame_matches_streamed_frame() {
    let graph = square_spec().build().unwrap();
    let (start, goal) = resolve_endpoints(&graph, "A", Some("D")).unwrap();
    let mut sink = InMemorySink::new();
    render_traversal(&graph, start, goal, &cfg(), &mut sink).unwrap();

    let second = render_step_frame(&graph, start, goal, &cfg(), 1).unwrap();
    assert_eq!(second, sink.frames()[1].frame);

    let past_end = render_step_frame(&graph, start, goal, &cfg(), 99).unwrap();
    assert_eq!(past_end, sink.frames()[4].frame);
}

#[test]
fn highlight_frame_shows_the_result_path() {
    let graph = square_spec().build().unwrap();
    let (start, goal) = resolve_endpoints(&graph, "A", Some("D")).unwrap();
    let cfg = cfg();
    let frame = render_step_frame(&graph, start, goal, &cfg, usize::MAX).unwrap();

    let renderer = FrameRenderer::new(&graph, cfg.style.clone()).unwrap();
    let d = graph.node(goal.unwrap()).unwrap().position;
    let p = renderer.layout().to_pixel(d);
    let expected = cfg.style.palette.color(NodeClass::OnResultPath).to_premul_array();
    assert_eq!(frame.pixel(p.x as u32, p.y as u32), Some(expected));
}

#[test]
fn fps_converts_to_frame_duration() {
    assert_eq!(frame_duration_from_fps(25), 40);
    assert_eq!(frame_duration_from_fps(1), 1000);
    assert_eq!(frame_duration_from_fps(0), 1000);
    assert_eq!(frame_duration_from_fps(2000), 1);
    assert_eq!(frame_duration_from_fps(u32::MAX), 1);
}

#[test]
fn very_high_fps_still_renders() {
    let cfg = PipelineConfig {
        frame_duration_ms: frame_duration_from_fps(2000),
        ..cfg()
    };
    let out = run_pipeline(&square_spec(), "A", Some("D"), &cfg).unwrap();
    assert_eq!(out.report.frames, 5);
}

#[test]
fn config_parses_with_defaults() {
    let cfg: PipelineConfig =
        serde_json::from_str(r#"{ "algorithm": "dijkstra", "loop_count": 2 }"#).unwrap();
    assert_eq!(cfg.algorithm, Algorithm::UniformCost);
    assert_eq!(cfg.loop_count, 2);
    assert_eq!(cfg.frame_duration_ms, PipelineConfig::default().frame_duration_ms);
    cfg.validate().unwrap();
}
