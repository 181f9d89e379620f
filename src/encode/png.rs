use image::ImageEncoder as _;

use crate::{
    encode::gif::flatten_to_opaque_rgba8,
    foundation::core::Rgba8,
    foundation::error::ReelResult,
    render::frame::FrameRGBA,
};

/// Encode a single frame as an opaque PNG, flattening alpha over `background`.
pub fn encode_png(frame: &FrameRGBA, background: Rgba8) -> ReelResult<Vec<u8>> {
    frame.validate()?;
    let mut opaque = vec![0u8; frame.data.len()];
    flatten_to_opaque_rgba8(
        &mut opaque,
        &frame.data,
        frame.premultiplied,
        background.to_array(),
    )?;

    let mut out = Vec::new();
    image::codecs::png::PngEncoder::new(&mut out).write_image(
        &opaque,
        frame.width,
        frame.height,
        image::ExtendedColorType::Rgba8,
    )?;
    Ok(out)
}

#[cfg(test)]
#[path = "../../tests/unit/encode/png.rs"]
mod tests;
