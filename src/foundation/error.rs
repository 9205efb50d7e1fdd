/// Convenience result type used across iconmotion.
pub type IconMotionResult<T> = Result<T, IconMotionError>;

/// Top-level error taxonomy for the load/validate boundary.
///
/// The controller state machine itself never fails: interrupted animations, unknown animation
/// names and stale continuations are all absorbed internally. Errors only surface when
/// user-authored data (wrapper options, variant maps, scenarios) is rejected.
#[derive(thiserror::Error, Debug)]
pub enum IconMotionError {
    /// Invalid user-provided data.
    #[error("validation error: {0}")]
    Validation(String),

    /// Wrapper option values that cannot be interpreted.
    #[error("config error: {0}")]
    Config(String),

    /// Errors when serializing or deserializing data structures.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl IconMotionError {
    /// Build a [`IconMotionError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`IconMotionError::Config`] value.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Build a [`IconMotionError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }
}

impl From<serde_json::Error> for IconMotionError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serde(err.to_string())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
