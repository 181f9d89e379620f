use std::{borrow::Cow, path::Path};

use crate::{
    foundation::core::{Point, Rgba8},
    foundation::error::{ReelError, ReelResult},
    graph::model::Graph,
    render::canvas::CanvasLayout,
    render::style::RenderStyle,
};

/// Gap between a node's rim and the top of its name.
const NAME_GAP_PX: f64 = 2.0;

/// Edge weight as printed on frames: rounded half-up to two decimals, always with a fraction.
///
/// Rounding works on the shortest decimal form of the value, so `2.675` prints as `2.68`.
pub fn format_weight(weight: f64) -> String {
    let rounded = round_half_up_2(weight);
    if rounded.fract() == 0.0 {
        format!("{rounded:.1}")
    } else {
        format!("{rounded}")
    }
}

fn round_half_up_2(value: f64) -> f64 {
    let text = format!("{}", value.abs());
    let Some((int, frac)) = text.split_once('.') else {
        return value;
    };
    if frac.len() <= 2 {
        return value;
    }
    let Ok(int) = int.parse::<u128>() else {
        return value;
    };
    let digits = frac.as_bytes();
    let round_up = u128::from(digits[2] >= b'5');
    let cents = int
        .checked_mul(100)
        .and_then(|c| c.checked_add(u128::from(digits[0] - b'0') * 10))
        .and_then(|c| c.checked_add(u128::from(digits[1] - b'0') + round_up));
    match cents {
        Some(cents) => (cents as f64 / 100.0).copysign(value),
        None => value,
    }
}

/// One positioned glyph in canvas pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
struct PlacedGlyph {
    id: u32,
    x: f32,
    y: f32,
}

#[derive(Clone, Debug)]
struct PlacedRun {
    font_size: f32,
    glyphs: Vec<PlacedGlyph>,
}

/// Label glyphs shaped once per renderer.
///
/// Labels do not depend on the traversal state, so every frame reuses the same runs.
#[derive(Clone)]
pub(crate) struct LabelSet {
    font: vello_cpu::peniko::FontData,
    color: Rgba8,
    runs: Vec<PlacedRun>,
}

impl std::fmt::Debug for LabelSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LabelSet")
            .field("color", &self.color)
            .field("runs", &self.runs.len())
            .finish()
    }
}

impl LabelSet {
    /// Shape the labels `style` asks for; `None` when labels are disabled.
    pub(crate) fn prepare(
        graph: &Graph,
        layout: &CanvasLayout,
        style: &RenderStyle,
    ) -> ReelResult<Option<Self>> {
        let labels = &style.labels;
        if !labels.enabled {
            return Ok(None);
        }
        let path = labels
            .font_path
            .as_deref()
            .ok_or_else(|| ReelError::validation("labels are enabled but no font_path is set"))?;
        let font_bytes = read_font(path)?;
        let mut engine = LabelLayoutEngine::new(&font_bytes)?;

        let mut runs = Vec::new();
        if labels.node_names {
            for node in graph.nodes() {
                let center = layout.to_pixel(node.position);
                let text = engine.layout(&node.name, labels.font_size_px);
                let top = Point::new(
                    center.x - f64::from(text.width()) * 0.5,
                    center.y + style.node_radius_px + NAME_GAP_PX,
                );
                runs.extend(place(&text, top));
            }
        }
        if labels.edge_weights {
            for edge in graph.edges() {
                let (Some(from), Some(to)) = (graph.node(edge.from), graph.node(edge.to)) else {
                    continue;
                };
                let mid = layout
                    .to_pixel(from.position)
                    .midpoint(layout.to_pixel(to.position));
                let text = engine.layout(&format_weight(edge.weight), labels.font_size_px);
                let top = Point::new(
                    mid.x - f64::from(text.width()) * 0.5,
                    mid.y - f64::from(text.height()) * 0.5,
                );
                runs.extend(place(&text, top));
            }
        }

        tracing::debug!(runs = runs.len(), family = %engine.family, "shaped labels");
        Ok(Some(Self {
            font: vello_cpu::peniko::FontData::new(vello_cpu::peniko::Blob::from(font_bytes), 0),
            color: labels.color,
            runs,
        }))
    }

    /// Fill every label into `ctx`.
    pub(crate) fn draw(&self, ctx: &mut vello_cpu::RenderContext) {
        let c = self.color;
        ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(c.r, c.g, c.b, c.a));
        for run in &self.runs {
            let glyphs = run.glyphs.iter().map(|g| vello_cpu::Glyph {
                id: g.id,
                x: g.x,
                y: g.y,
            });
            ctx.glyph_run(&self.font)
                .font_size(run.font_size)
                .fill_glyphs(glyphs);
        }
    }
}

fn read_font(path: &Path) -> ReelResult<Vec<u8>> {
    std::fs::read(path)
        .map_err(|e| ReelError::validation(format!("read font '{}': {e}", path.display())))
}

/// Glyph runs of `text` with the layout's top-left corner at `top_left`.
fn place(text: &parley::Layout<()>, top_left: Point) -> Vec<PlacedRun> {
    let (dx, dy) = (top_left.x as f32, top_left.y as f32);
    let mut runs = Vec::new();
    for line in text.lines() {
        for item in line.items() {
            let parley::layout::PositionedLayoutItem::GlyphRun(run) = item else {
                continue;
            };
            runs.push(PlacedRun {
                font_size: run.run().font_size(),
                glyphs: run
                    .glyphs()
                    .map(|g| PlacedGlyph {
                        id: g.id,
                        x: g.x + dx,
                        y: g.y + dy,
                    })
                    .collect(),
            });
        }
    }
    runs
}

/// Parley contexts bound to a single registered font family.
struct LabelLayoutEngine {
    font_ctx: parley::FontContext,
    layout_ctx: parley::LayoutContext<()>,
    family: String,
}

impl LabelLayoutEngine {
    fn new(font_bytes: &[u8]) -> ReelResult<Self> {
        let mut font_ctx = parley::FontContext::default();
        let families = font_ctx
            .collection
            .register_fonts(parley::fontique::Blob::from(font_bytes.to_vec()), None);
        let family_id = families
            .first()
            .map(|(id, _)| *id)
            .ok_or_else(|| ReelError::validation("no font families registered from font bytes"))?;
        let family = font_ctx
            .collection
            .family_name(family_id)
            .ok_or_else(|| ReelError::validation("registered font family has no name"))?
            .to_string();

        Ok(Self {
            font_ctx,
            layout_ctx: parley::LayoutContext::new(),
            family,
        })
    }

    fn layout(&mut self, text: &str, size_px: f32) -> parley::Layout<()> {
        let mut builder = self
            .layout_ctx
            .ranged_builder(&mut self.font_ctx, text, 1.0, true);
        builder.push_default(parley::style::StyleProperty::FontStack(
            parley::style::FontStack::Source(Cow::Owned(self.family.clone())),
        ));
        builder.push_default(parley::style::StyleProperty::FontSize(size_px));

        let mut layout: parley::Layout<()> = builder.build(text);
        layout.break_all_lines(None);
        layout
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/labels.rs"]
mod tests;
