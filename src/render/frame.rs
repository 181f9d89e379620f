use crate::foundation::error::{ReelError, ReelResult};

/// A rendered frame as RGBA8 pixels.
///
/// Frames produced by [`crate::FrameRenderer`] are **premultiplied alpha**; the flag keeps that
/// explicit at API boundaries.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FrameRGBA {
    /// Frame width in pixels.
    pub width: u32,
    /// Frame height in pixels.
    pub height: u32,
    /// RGBA8 bytes, tightly packed, row-major.
    pub data: Vec<u8>,
    /// Whether the `data` is premultiplied alpha.
    pub premultiplied: bool,
}

impl FrameRGBA {
    /// Check that `data` holds exactly `width * height` pixels.
    pub fn validate(&self) -> ReelResult<()> {
        if self.width == 0 || self.height == 0 {
            return Err(ReelError::validation("frame width/height must be non-zero"));
        }
        let expected = (self.width as usize) * (self.height as usize) * 4;
        if self.data.len() != expected {
            return Err(ReelError::validation(format!(
                "frame.data has {} bytes, expected {expected} for {}x{}",
                self.data.len(),
                self.width,
                self.height
            )));
        }
        Ok(())
    }

    /// RGBA bytes of the pixel at `(x, y)`.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = ((y as usize) * (self.width as usize) + (x as usize)) * 4;
        let px = self.data.get(i..i + 4)?;
        Some([px[0], px[1], px[2], px[3]])
    }
}

/// A frame together with how long it stays on screen.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TimedFrame {
    /// Pixels.
    pub frame: FrameRGBA,
    /// Display duration in milliseconds (> 0).
    pub duration_ms: u32,
}

#[cfg(test)]
#[path = "../../tests/unit/render/frame.rs"]
mod tests;
