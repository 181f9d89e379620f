use std::path::PathBuf;

use crate::{
    foundation::core::Rgba8,
    foundation::error::{ReelError, ReelResult},
    traversal::state::NodeClass,
};

/// Fixed color per [`NodeClass`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct ClassPalette {
    /// Not discovered yet.
    pub unvisited: Rgba8,
    /// Discovered, waiting for expansion.
    pub frontier: Rgba8,
    /// Already expanded.
    pub visited: Rgba8,
    /// Expanded in this step.
    pub current: Rgba8,
    /// On the reconstructed result path.
    pub on_result_path: Rgba8,
}

impl Default for ClassPalette {
    fn default() -> Self {
        Self {
            unvisited: Rgba8::opaque(200, 204, 212),
            frontier: Rgba8::opaque(245, 166, 35),
            visited: Rgba8::opaque(74, 144, 226),
            current: Rgba8::opaque(220, 53, 69),
            on_result_path: Rgba8::opaque(40, 167, 69),
        }
    }
}

impl ClassPalette {
    /// Color used for `class`.
    pub fn color(&self, class: NodeClass) -> Rgba8 {
        match class {
            NodeClass::Unvisited => self.unvisited,
            NodeClass::Frontier => self.frontier,
            NodeClass::Visited => self.visited,
            NodeClass::Current => self.current,
            NodeClass::OnResultPath => self.on_result_path,
        }
    }
}

/// Text drawn next to nodes and edges.
///
/// Labels need a font file; frames carry no text unless `enabled` is set.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct LabelStyle {
    /// Draw labels at all.
    pub enabled: bool,
    /// TrueType/OpenType font used for every label.
    pub font_path: Option<PathBuf>,
    /// Label text size.
    pub font_size_px: f32,
    /// Label fill.
    pub color: Rgba8,
    /// Node names, centered below each node.
    pub node_names: bool,
    /// Edge weights rounded to two decimals, centered on each edge.
    pub edge_weights: bool,
}

impl Default for LabelStyle {
    fn default() -> Self {
        Self {
            enabled: false,
            font_path: None,
            font_size_px: 12.0,
            color: Rgba8::opaque(33, 37, 41),
            node_names: true,
            edge_weights: true,
        }
    }
}

impl LabelStyle {
    /// Labels from the font at `path`, with every other setting at its default.
    pub fn with_font(path: impl Into<PathBuf>) -> Self {
        Self {
            enabled: true,
            font_path: Some(path.into()),
            ..Self::default()
        }
    }

    fn validate(&self) -> ReelResult<()> {
        if !self.font_size_px.is_finite() || self.font_size_px <= 0.0 {
            return Err(ReelError::validation(
                "label font_size_px must be finite and > 0",
            ));
        }
        if self.enabled && self.font_path.is_none() {
            return Err(ReelError::validation("labels are enabled but no font_path is set"));
        }
        Ok(())
    }
}

/// Drawing constants for frames. All lengths are in pixels except `scale`.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct RenderStyle {
    /// Canvas fill.
    pub background: Rgba8,
    /// Stroke color for every edge, regardless of state.
    pub edge_color: Rgba8,
    /// Node fill per class.
    pub palette: ClassPalette,
    /// Empty border around the layout bounding box (added to the node radius).
    pub margin_px: f64,
    /// Node circle radius.
    pub node_radius_px: f64,
    /// Edge stroke width.
    pub edge_width_px: f64,
    /// Length of arrowheads on directed edges; 0 disables them.
    pub arrow_size_px: f64,
    /// Graph-space to pixel-space factor.
    pub scale: f64,
    /// Node name and edge weight text.
    pub labels: LabelStyle,
}

impl Default for RenderStyle {
    fn default() -> Self {
        Self {
            background: Rgba8::opaque(255, 255, 255),
            edge_color: Rgba8::opaque(120, 124, 134),
            palette: ClassPalette::default(),
            margin_px: 16.0,
            node_radius_px: 10.0,
            edge_width_px: 2.0,
            arrow_size_px: 7.0,
            scale: 1.0,
            labels: LabelStyle::default(),
        }
    }
}

impl RenderStyle {
    /// Reject non-finite or out-of-range drawing constants.
    pub fn validate(&self) -> ReelResult<()> {
        for (name, value, allow_zero) in [
            ("margin_px", self.margin_px, true),
            ("node_radius_px", self.node_radius_px, false),
            ("edge_width_px", self.edge_width_px, false),
            ("arrow_size_px", self.arrow_size_px, true),
            ("scale", self.scale, false),
        ] {
            let ok = value.is_finite() && (value > 0.0 || (allow_zero && value == 0.0));
            if !ok {
                let bound = if allow_zero { ">= 0" } else { "> 0" };
                return Err(ReelError::validation(format!(
                    "render style {name} must be finite and {bound}"
                )));
            }
        }
        self.labels.validate()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/style.rs"]
mod tests;
