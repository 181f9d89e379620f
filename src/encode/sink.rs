use crate::{
    foundation::error::{ReelError, ReelResult},
    render::frame::{FrameRGBA, TimedFrame},
};

/// Sink contract for consuming rendered frames in display order.
///
/// `push_frame` is called once per frame in order; `finish` is called exactly once at the end
/// and returns the artifact bytes. Implementations reject frames after `finish`.
pub trait FrameSink {
    /// Append one frame shown for `duration_ms` milliseconds.
    fn push_frame(&mut self, frame: FrameRGBA, duration_ms: u32) -> ReelResult<()>;
    /// Close the sink and return the finished artifact.
    fn finish(&mut self) -> ReelResult<Vec<u8>>;
}

/// In-memory sink for tests and debugging; `finish` returns no bytes.
#[derive(Debug, Default)]
pub struct InMemorySink {
    frames: Vec<TimedFrame>,
    finished: bool,
}

impl InMemorySink {
    /// Create a new in-memory sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Borrow the captured frames.
    pub fn frames(&self) -> &[TimedFrame] {
        &self.frames
    }

    /// Whether `finish` has been called.
    pub fn is_finished(&self) -> bool {
        self.finished
    }
}

impl FrameSink for InMemorySink {
    fn push_frame(&mut self, frame: FrameRGBA, duration_ms: u32) -> ReelResult<()> {
        if self.finished {
            return Err(ReelError::closed("in-memory sink is already finished"));
        }
        self.frames.push(TimedFrame { frame, duration_ms });
        Ok(())
    }

    fn finish(&mut self) -> ReelResult<Vec<u8>> {
        if self.finished {
            return Err(ReelError::closed("in-memory sink is already finished"));
        }
        self.finished = true;
        Ok(Vec::new())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/encode/sink.rs"]
mod tests;
