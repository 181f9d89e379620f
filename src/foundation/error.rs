/// Convenience result type used across graphreel.
pub type ReelResult<T> = Result<T, ReelError>;

/// Top-level error taxonomy used by the pipeline and its components.
#[derive(thiserror::Error, Debug)]
pub enum ReelError {
    /// Bad input topology: unknown endpoints, duplicates, self-loops, invalid weights.
    #[error("malformed graph: {0}")]
    MalformedGraph(String),

    /// The goal could not be reached and the run was configured to require it.
    #[error("unreachable goal: {0}")]
    UnreachableGoal(String),

    /// A frame did not match the dimensions of the first frame of the animation.
    #[error("frame size mismatch: got {got_w}x{got_h}, expected {expected_w}x{expected_h}")]
    FrameSizeMismatch {
        /// Width of the first frame.
        expected_w: u32,
        /// Height of the first frame.
        expected_h: u32,
        /// Width of the rejected frame.
        got_w: u32,
        /// Height of the rejected frame.
        got_h: u32,
    },

    /// The encoder was already finalized.
    #[error("encoder closed: {0}")]
    EncoderClosed(String),

    /// The traversal did more steps than allowed.
    #[error("step limit exceeded: traversal did not finish within {limit} steps")]
    StepLimitExceeded {
        /// Configured ceiling.
        limit: usize,
    },

    /// Invalid user-provided configuration or arguments.
    #[error("validation error: {0}")]
    Validation(String),

    /// Errors raised by an image codec.
    #[error("encode error: {0}")]
    Encode(String),

    /// Errors when serializing or deserializing data structures.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ReelError {
    /// Build a [`ReelError::MalformedGraph`] value.
    pub fn malformed(msg: impl Into<String>) -> Self {
        Self::MalformedGraph(msg.into())
    }

    /// Build a [`ReelError::UnreachableGoal`] value.
    pub fn unreachable(msg: impl Into<String>) -> Self {
        Self::UnreachableGoal(msg.into())
    }

    /// Build a [`ReelError::EncoderClosed`] value.
    pub fn closed(msg: impl Into<String>) -> Self {
        Self::EncoderClosed(msg.into())
    }

    /// Build a [`ReelError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`ReelError::Encode`] value.
    pub fn encode(msg: impl Into<String>) -> Self {
        Self::Encode(msg.into())
    }

    /// Build a [`ReelError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }
}

impl From<image::ImageError> for ReelError {
    fn from(err: image::ImageError) -> Self {
        Self::Encode(err.to_string())
    }
}

impl From<serde_json::Error> for ReelError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serde(err.to_string())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
