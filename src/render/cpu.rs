use rayon::prelude::*;
use vello_cpu::kurbo::Shape as _;

use crate::{
    foundation::core::{Canvas, Point, Rgba8, Vec2},
    foundation::error::{ReelError, ReelResult},
    graph::model::Graph,
    render::canvas::CanvasLayout,
    render::frame::FrameRGBA,
    render::labels::LabelSet,
    render::style::RenderStyle,
    traversal::state::TraversalState,
};

/// Threading for [`FrameRenderer::render_many`].
#[derive(Clone, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct RenderThreading {
    /// Render independent snapshots on a rayon pool.
    pub parallel: bool,
    /// Worker count; `None` lets rayon decide.
    pub threads: Option<usize>,
}

/// CPU frame renderer powered by `vello_cpu`.
///
/// Rendering is a pure function of `(graph, state)`: the canvas is fixed at construction and
/// colors come from the style's class palette, so equal inputs give byte-identical frames.
/// Labels, when enabled, are shaped once here and drawn on top of every frame.
#[derive(Clone, Debug)]
pub struct FrameRenderer {
    style: RenderStyle,
    layout: CanvasLayout,
    labels: Option<LabelSet>,
    width: u16,
    height: u16,
}

impl FrameRenderer {
    /// Freeze the canvas for `graph` and prepare drawing.
    pub fn new(graph: &Graph, style: RenderStyle) -> ReelResult<Self> {
        let layout = CanvasLayout::for_graph(graph, &style)?;
        let canvas = layout.canvas();
        let width: u16 = canvas
            .width
            .try_into()
            .map_err(|_| ReelError::validation("canvas width exceeds u16"))?;
        let height: u16 = canvas
            .height
            .try_into()
            .map_err(|_| ReelError::validation("canvas height exceeds u16"))?;
        let labels = LabelSet::prepare(graph, &layout, &style)?;
        Ok(Self {
            style,
            layout,
            labels,
            width,
            height,
        })
    }

    /// Output dimensions shared by every frame of this renderer.
    pub fn canvas(&self) -> Canvas {
        self.layout.canvas()
    }

    /// Graph-space to pixel mapping.
    pub fn layout(&self) -> &CanvasLayout {
        &self.layout
    }

    /// Style in use.
    pub fn style(&self) -> &RenderStyle {
        &self.style
    }

    /// Rasterize one traversal state.
    ///
    /// # Panics
    ///
    /// If `state` does not classify exactly the nodes of `graph` or marks more than one node
    /// `Current`; such a state can only come from a bug in the caller.
    pub fn render(&self, graph: &Graph, state: &TraversalState) -> FrameRGBA {
        assert!(
            state.is_partition_of(graph.node_count()),
            "traversal state does not partition the {} graph nodes",
            graph.node_count()
        );

        let (w, h) = (f64::from(self.width), f64::from(self.height));
        let mut ctx = vello_cpu::RenderContext::new(self.width, self.height);

        ctx.set_paint(cpu_color(self.style.background));
        ctx.fill_rect(&vello_cpu::kurbo::Rect::new(0.0, 0.0, w, h));

        ctx.set_stroke(vello_cpu::kurbo::Stroke::new(self.style.edge_width_px));
        ctx.set_paint(cpu_color(self.style.edge_color));
        for edge in graph.edges() {
            let (Some(from), Some(to)) = (graph.node(edge.from), graph.node(edge.to)) else {
                continue;
            };
            let a = self.layout.to_pixel(from.position);
            let b = self.layout.to_pixel(to.position);

            let mut line = vello_cpu::kurbo::BezPath::new();
            line.move_to(point_to_cpu(a));
            line.line_to(point_to_cpu(b));
            ctx.stroke_path(&line);

            if edge.directed
                && let Some(head) = arrowhead(a, b, self.style.node_radius_px, self.style.arrow_size_px)
            {
                ctx.fill_path(&head);
            }
        }

        for node in graph.nodes() {
            let class = state.class_of(node.id);
            let center = point_to_cpu(self.layout.to_pixel(node.position));
            let circle = vello_cpu::kurbo::Circle::new(center, self.style.node_radius_px);
            ctx.set_paint(cpu_color(self.style.palette.color(class)));
            ctx.fill_path(&circle.to_path(0.1));
        }

        if let Some(labels) = &self.labels {
            labels.draw(&mut ctx);
        }

        ctx.flush();
        let mut pixmap = vello_cpu::Pixmap::new(self.width, self.height);
        ctx.render_to_pixmap(&mut pixmap);

        FrameRGBA {
            width: u32::from(self.width),
            height: u32::from(self.height),
            data: pixmap.data_as_u8_slice().to_vec(),
            premultiplied: true,
        }
    }

    /// Rasterize already-produced snapshots, in order.
    ///
    /// With `threading.parallel` the states are rendered on a rayon pool; the output is the same
    /// as the sequential path.
    pub fn render_many(
        &self,
        graph: &Graph,
        states: &[TraversalState],
        threading: &RenderThreading,
    ) -> ReelResult<Vec<FrameRGBA>> {
        if !threading.parallel || states.len() < 2 {
            return Ok(states.iter().map(|s| self.render(graph, s)).collect());
        }

        let pool = build_thread_pool(threading.threads)?;
        Ok(pool.install(|| states.par_iter().map(|s| self.render(graph, s)).collect()))
    }
}

fn build_thread_pool(threads: Option<usize>) -> ReelResult<rayon::ThreadPool> {
    if let Some(n) = threads
        && n == 0
    {
        return Err(ReelError::validation(
            "render threading 'threads' must be >= 1 when set",
        ));
    }

    let mut builder = rayon::ThreadPoolBuilder::new();
    if let Some(n) = threads {
        builder = builder.num_threads(n);
    }
    builder
        .build()
        .map_err(|e| ReelError::validation(format!("failed to build rayon thread pool: {e}")))
}

/// Triangle pointing at `b`, with its tip on the target node's rim.
fn arrowhead(a: Point, b: Point, radius: f64, size: f64) -> Option<vello_cpu::kurbo::BezPath> {
    let d = b - a;
    let len = d.hypot();
    if size <= 0.0 || len <= radius + size {
        return None;
    }
    let dir = d / len;
    let normal = Vec2::new(-dir.y, dir.x);
    let tip = b - dir * radius;
    let base = tip - dir * size;
    let half = size * 0.5;

    let mut path = vello_cpu::kurbo::BezPath::new();
    path.move_to(point_to_cpu(tip));
    path.line_to(point_to_cpu(base + normal * half));
    path.line_to(point_to_cpu(base - normal * half));
    path.close_path();
    Some(path)
}

fn cpu_color(c: Rgba8) -> vello_cpu::peniko::Color {
    vello_cpu::peniko::Color::from_rgba8(c.r, c.g, c.b, c.a)
}

fn point_to_cpu(p: Point) -> vello_cpu::kurbo::Point {
    vello_cpu::kurbo::Point::new(p.x, p.y)
}

#[cfg(test)]
#[path = "../../tests/unit/render/cpu.rs"]
mod tests;
