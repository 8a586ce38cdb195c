//! Error types for shape construction and configuration.

/// A collider was built with parameters that do not describe a real shape.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ShapeError {
    /// Radius is zero, negative, NaN or infinite.
    #[error("invalid radius {0}: must be finite and > 0")]
    Radius(f32),

    /// Cylinder height is zero, negative, NaN or infinite.
    #[error("invalid height {0}: must be finite and > 0")]
    Height(f32),

    /// One or more box half-extents is zero, negative, NaN or infinite.
    #[error("invalid half extents {0:?}: every axis must be finite and > 0")]
    HalfExtents([f32; 3]),
}

/// Errors that can occur when loading, saving, or validating configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the config file from disk.
    #[error("failed to read config: {0}")]
    ReadError(#[source] std::io::Error),

    /// Failed to write the config file to disk.
    #[error("failed to write config: {0}")]
    WriteError(#[source] std::io::Error),

    /// Failed to parse RON content.
    #[error("failed to parse config: {0}")]
    ParseError(#[source] ron::error::SpannedError),

    /// Failed to serialize config to RON.
    #[error("failed to serialize config: {0}")]
    SerializeError(#[source] ron::Error),

    /// A tuning value is out of range.
    #[error("invalid config value `{field}`: {reason}")]
    Invalid {
        field: &'static str,
        reason: &'static str,
    },
}

/// A scripted input string could not be parsed.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ScriptError {
    /// Segment has no `:seconds` part.
    #[error("segment `{0}` is missing `:seconds`")]
    MissingDuration(String),

    /// Seconds are not a finite non-negative number.
    #[error("segment `{0}` has an invalid duration")]
    BadDuration(String),

    /// Intent name is not one of left/right/forward/back/jump/idle.
    #[error("unknown intent `{0}`")]
    UnknownIntent(String),
}
