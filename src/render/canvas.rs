use crate::{
    foundation::core::{Canvas, Point, Rect},
    foundation::error::{ReelError, ReelResult},
    graph::model::Graph,
    render::style::RenderStyle,
};

/// Mapping from graph space to pixels, frozen for a whole animation.
///
/// The canvas is the layout bounding box scaled by `scale`, padded on every side by
/// `margin_px + node_radius_px` so node circles are never clipped.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CanvasLayout {
    canvas: Canvas,
    origin: Point,
    scale: f64,
    pad: f64,
}

impl CanvasLayout {
    /// Compute the canvas for `graph` under `style`.
    ///
    /// Fails if the style is invalid or the canvas does not fit the rasterizer's `u16` limits.
    pub fn for_graph(graph: &Graph, style: &RenderStyle) -> ReelResult<Self> {
        style.validate()?;
        Self::from_bounds(graph.bounds(), style)
    }

    fn from_bounds(bounds: Rect, style: &RenderStyle) -> ReelResult<Self> {
        let pad = style.margin_px + style.node_radius_px;
        let w = (bounds.width() * style.scale + 2.0 * pad).ceil().max(1.0);
        let h = (bounds.height() * style.scale + 2.0 * pad).ceil().max(1.0);
        let limit = f64::from(u16::MAX);
        if !(w <= limit && h <= limit) {
            return Err(ReelError::validation(format!(
                "canvas {w}x{h} exceeds the {limit}x{limit} limit; reduce scale or margin"
            )));
        }

        Ok(Self {
            canvas: Canvas {
                width: w as u32,
                height: h as u32,
            },
            origin: bounds.origin(),
            scale: style.scale,
            pad,
        })
    }

    /// Frozen output dimensions.
    pub fn canvas(&self) -> Canvas {
        self.canvas
    }

    /// Pixel position of a graph-space point.
    pub fn to_pixel(&self, p: Point) -> Point {
        Point::new(
            (p.x - self.origin.x) * self.scale + self.pad,
            (p.y - self.origin.y) * self.scale + self.pad,
        )
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/canvas.rs"]
mod tests;
