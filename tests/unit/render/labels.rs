use std::path::PathBuf;

use super::*;
use crate::{
    graph::{
        model::build_graph,
        spec::{EdgeSpec, NodeSpec},
    },
    render::{cpu::FrameRenderer, style::LabelStyle},
    traversal::state::{NodeClass, TraversalState},
};

/// First TrueType font found in the usual system locations, or `GRAPHREEL_TEST_FONT`.
fn find_system_font() -> Option<PathBuf> {
    if let Some(p) = std::env::var_os("GRAPHREEL_TEST_FONT") {
        return Some(PathBuf::from(p));
    }
    let mut dirs: Vec<PathBuf> = [
        "/usr/share/fonts",
        "/usr/local/share/fonts",
        "/System/Library/Fonts",
        "C:\\Windows\\Fonts",
    ]
    .iter()
    .map(PathBuf::from)
    .collect();
    while let Some(dir) = dirs.pop() {
        let Ok(entries) = std::fs::read_dir(&dir) else {
            continue;
        };
        let mut entries: Vec<PathBuf> = entries.filter_map(|e| e.ok().map(|e| e.path())).collect();
        entries.sort();
        for path in entries {
            if path.is_dir() {
                dirs.push(path);
            } else if path
                .extension()
                .is_some_and(|ext| ext.eq_ignore_ascii_case("ttf"))
            {
                return Some(path);
            }
        }
    }
    None
}

fn graph() -> Graph {
    build_graph(
        &[
            NodeSpec::at("Alpha", 0.0, 0.0),
            NodeSpec::at("Beta", 160.0, 0.0),
            NodeSpec::at("Gamma", 160.0, 120.0),
        ],
        &[
            EdgeSpec::undirected("Alpha", "Beta", 1.5),
            EdgeSpec::directed("Beta", "Gamma", 2.675),
        ],
    )
    .unwrap()
}

fn state() -> TraversalState {
    TraversalState {
        step: 1,
        classes: vec![NodeClass::Current, NodeClass::Frontier, NodeClass::Unvisited],
        costs: vec![None; 3],
    }
}

#[test]
fn weights_round_half_up_to_two_places() {
    assert_eq!(format_weight(1.0), "1.0");
    assert_eq!(format_weight(2.5), "2.5");
    assert_eq!(format_weight(1.234), "1.23");
    assert_eq!(format_weight(1.235), "1.24");
    assert_eq!(format_weight(2.675), "2.68");
    assert_eq!(format_weight(0.005), "0.01");
    assert_eq!(format_weight(0.004), "0.0");
    assert_eq!(format_weight(9.999), "10.0");
    assert_eq!(format_weight(12.0), "12.0");
}

#[test]
fn disabled_labels_shape_nothing() {
    let g = graph();
    let style = RenderStyle::default();
    let layout = CanvasLayout::for_graph(&g, &style).unwrap();
    assert!(LabelSet::prepare(&g, &layout, &style).unwrap().is_none());
}

#[test]
fn missing_font_file_is_a_validation_error() {
    let g = graph();
    let style = RenderStyle {
        labels: LabelStyle::with_font("target/no-such-font.ttf"),
        ..RenderStyle::default()
    };
    let err = FrameRenderer::new(&g, style).unwrap_err();
    assert!(matches!(err, ReelError::Validation(_)));
    assert!(err.to_string().contains("no-such-font.ttf"));
}

#[test]
fn labelled_frame_differs_from_unlabelled() {
    let Some(font) = find_system_font() else {
        eprintln!("skipping: no TrueType font found");
        return;
    };
    let g = graph();
    let plain = FrameRenderer::new(&g, RenderStyle::default()).unwrap();
    let labelled = FrameRenderer::new(
        &g,
        RenderStyle {
            labels: LabelStyle::with_font(font),
            ..RenderStyle::default()
        },
    )
    .unwrap();

    assert_eq!(plain.canvas(), labelled.canvas());
    let a = plain.render(&g, &state());
    let b = labelled.render(&g, &state());
    assert_ne!(a.data, b.data);
    assert_eq!(b, labelled.render(&g, &state()));
}

#[test]
fn each_label_kind_can_be_turned_off() {
    let Some(font) = find_system_font() else {
        eprintln!("skipping: no TrueType font found");
        return;
    };
    let g = graph();
    let render = |node_names: bool, edge_weights: bool| {
        let style = RenderStyle {
            labels: LabelStyle {
                node_names,
                edge_weights,
                ..LabelStyle::with_font(font.clone())
            },
            ..RenderStyle::default()
        };
        FrameRenderer::new(&g, style).unwrap().render(&g, &state())
    };

    let none = render(false, false);
    let names = render(true, false);
    let weights = render(false, true);
    let plain = FrameRenderer::new(&g, RenderStyle::default())
        .unwrap()
        .render(&g, &state());

    assert_eq!(none, plain);
    assert_ne!(names.data, none.data);
    assert_ne!(weights.data, none.data);
    assert_ne!(names.data, weights.data);
}
