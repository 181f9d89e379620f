use image::codecs::gif::Repeat;

use crate::{
    encode::sink::FrameSink,
    foundation::core::Rgba8,
    foundation::error::{ReelError, ReelResult},
    render::frame::{FrameRGBA, TimedFrame},
};

/// GIF delays are stored in 10 ms units.
pub const GIF_DELAY_UNIT_MS: u32 = 10;

/// Settings for [`GifEncoder`].
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct GifConfig {
    /// How many times the animation repeats; 0 loops forever.
    pub loop_count: u16,
    /// Color that translucent pixels are flattened over.
    pub background: Rgba8,
    /// Palette quantizer speed, 1 (best) to 30 (fastest).
    pub speed: i32,
}

impl Default for GifConfig {
    fn default() -> Self {
        Self {
            loop_count: 0,
            background: Rgba8::opaque(255, 255, 255),
            speed: 10,
        }
    }
}

impl GifConfig {
    /// Reject out-of-range settings.
    pub fn validate(&self) -> ReelResult<()> {
        if !(1..=30).contains(&self.speed) {
            return Err(ReelError::validation("gif speed must be within 1..=30"));
        }
        Ok(())
    }
}

/// Ordered frames plus loop metadata, all sharing one size.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Animation {
    frames: Vec<TimedFrame>,
    loop_count: u16,
}

impl Animation {
    /// Frames in display order.
    pub fn frames(&self) -> &[TimedFrame] {
        &self.frames
    }

    /// Repeat count (0 = infinite).
    pub fn loop_count(&self) -> u16 {
        self.loop_count
    }

    /// Shared `(width, height)`, once a frame has been added.
    pub fn size(&self) -> Option<(u32, u32)> {
        self.frames.first().map(|f| (f.frame.width, f.frame.height))
    }

    /// Total display time in milliseconds.
    pub fn duration_ms(&self) -> u64 {
        self.frames.iter().map(|f| u64::from(f.duration_ms)).sum()
    }
}

/// Accumulates frames and produces an animated GIF exactly once.
///
/// Palette quantization, alpha flattening and loop metadata are all done in
/// [`GifEncoder::finalize`], so the bytes depend only on the ordered `(frame, duration)` sequence
/// and the [`GifConfig`].
#[derive(Debug)]
pub struct GifEncoder {
    cfg: GifConfig,
    animation: Option<Animation>,
}

impl GifEncoder {
    /// Create an empty, open encoder.
    pub fn new(cfg: GifConfig) -> ReelResult<Self> {
        cfg.validate()?;
        let animation = Animation {
            frames: Vec::new(),
            loop_count: cfg.loop_count,
        };
        Ok(Self {
            cfg,
            animation: Some(animation),
        })
    }

    /// Frames accumulated so far; `None` once finalized.
    pub fn animation(&self) -> Option<&Animation> {
        self.animation.as_ref()
    }

    /// Whether [`GifEncoder::finalize`] has been called.
    pub fn is_closed(&self) -> bool {
        self.animation.is_none()
    }

    /// Append a frame shown for `duration_ms` milliseconds.
    pub fn add_frame(&mut self, frame: FrameRGBA, duration_ms: u32) -> ReelResult<()> {
        let Some(animation) = self.animation.as_mut() else {
            return Err(ReelError::closed("cannot add a frame after finalize"));
        };
        if duration_ms == 0 {
            return Err(ReelError::validation("frame duration must be > 0 ms"));
        }
        if let Some((w, h)) = animation.size()
            && (frame.width != w || frame.height != h)
        {
            return Err(ReelError::FrameSizeMismatch {
                expected_w: w,
                expected_h: h,
                got_w: frame.width,
                got_h: frame.height,
            });
        }
        frame.validate()?;
        if frame.width > u32::from(u16::MAX) || frame.height > u32::from(u16::MAX) {
            return Err(ReelError::validation("gif frames are limited to 65535x65535"));
        }

        animation.frames.push(TimedFrame { frame, duration_ms });
        Ok(())
    }

    /// Close the animation and return the GIF bytes.
    ///
    /// The encoder is closed even if encoding fails; a second call fails with
    /// [`ReelError::EncoderClosed`].
    #[tracing::instrument(skip(self))]
    pub fn finalize(&mut self) -> ReelResult<Vec<u8>> {
        let Some(animation) = self.animation.take() else {
            return Err(ReelError::closed("finalize was already called"));
        };
        if animation.frames.is_empty() {
            return Err(ReelError::validation("cannot encode an animation without frames"));
        }

        let repeat = match animation.loop_count {
            0 => Repeat::Infinite,
            n => Repeat::Finite(n),
        };
        let bg = self.cfg.background.to_array();
        let frame_count = animation.frames.len();

        let mut out = Vec::new();
        {
            let mut enc = image::codecs::gif::GifEncoder::new_with_speed(&mut out, self.cfg.speed);
            enc.set_repeat(repeat)?;
            for timed in animation.frames {
                let TimedFrame { frame, duration_ms } = timed;
                let mut opaque = vec![0u8; frame.data.len()];
                flatten_to_opaque_rgba8(&mut opaque, &frame.data, frame.premultiplied, bg)?;
                let buffer = image::RgbaImage::from_raw(frame.width, frame.height, opaque)
                    .ok_or_else(|| ReelError::encode("frame buffer does not match its size"))?;
                let delay = image::Delay::from_numer_denom_ms(gif_delay_ms(duration_ms), 1);
                enc.encode_frame(image::Frame::from_parts(buffer, 0, 0, delay))?;
            }
        }

        tracing::debug!(frames = frame_count, bytes = out.len(), "gif finalized");
        Ok(out)
    }
}

impl FrameSink for GifEncoder {
    fn push_frame(&mut self, frame: FrameRGBA, duration_ms: u32) -> ReelResult<()> {
        self.add_frame(frame, duration_ms)
    }

    fn finish(&mut self) -> ReelResult<Vec<u8>> {
        self.finalize()
    }
}

/// Round `duration_ms` up to the GIF delay unit, so no frame ends up with a zero delay.
pub fn gif_delay_ms(duration_ms: u32) -> u32 {
    let max = u32::from(u16::MAX) * GIF_DELAY_UNIT_MS;
    duration_ms
        .div_ceil(GIF_DELAY_UNIT_MS)
        .max(1)
        .saturating_mul(GIF_DELAY_UNIT_MS)
        .min(max)
}

pub(crate) fn flatten_to_opaque_rgba8(
    dst: &mut [u8],
    src: &[u8],
    src_is_premul: bool,
    bg_rgba: [u8; 4],
) -> ReelResult<()> {
    if dst.len() != src.len() || !dst.len().is_multiple_of(4) {
        return Err(ReelError::validation(
            "flatten_to_opaque_rgba8 expects equal-length rgba8 buffers",
        ));
    }

    let bg_r = bg_rgba[0] as u16;
    let bg_g = bg_rgba[1] as u16;
    let bg_b = bg_rgba[2] as u16;

    for (d, s) in dst.chunks_exact_mut(4).zip(src.chunks_exact(4)) {
        let a = s[3] as u16;
        if a == 255 {
            d.copy_from_slice(s);
            continue;
        }

        let inv = 255u16 - a;
        let (r, g, b) = if src_is_premul {
            (
                s[0] as u16 + mul_div255(bg_r, inv),
                s[1] as u16 + mul_div255(bg_g, inv),
                s[2] as u16 + mul_div255(bg_b, inv),
            )
        } else {
            (
                mul_div255(s[0] as u16, a) + mul_div255(bg_r, inv),
                mul_div255(s[1] as u16, a) + mul_div255(bg_g, inv),
                mul_div255(s[2] as u16, a) + mul_div255(bg_b, inv),
            )
        };

        d[0] = r.min(255) as u8;
        d[1] = g.min(255) as u8;
        d[2] = b.min(255) as u8;
        d[3] = 255;
    }

    Ok(())
}

fn mul_div255(x: u16, y: u16) -> u16 {
    (((u32::from(x) * u32::from(y)) + 127) / 255) as u16
}

#[cfg(test)]
#[path = "../../tests/unit/encode/gif.rs"]
mod tests;
