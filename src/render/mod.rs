/// Graph-space to pixel mapping.
pub mod canvas;
/// CPU rasterizer for traversal states.
pub mod cpu;
/// Pixel buffers.
pub mod frame;
/// Node name and edge weight text.
pub mod labels;
/// Colors and drawing constants.
pub mod style;
