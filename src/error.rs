use thiserror::Error;

/// Errors surfaced by detector construction and parameter parsing.
///
/// Extraction itself is infallible once a [`crate::Scoreboard`] exists:
/// numeric edge cases (parallel intersections, zero-length segments) are
/// absorbed by downstream distance checks rather than reported.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Raster dimensions exceed the 16-bit coordinate space used by the
    /// pending queue and the accumulator.
    #[error("image dimensions {width}x{height} exceed the supported maximum of 65535")]
    InvalidImageFormat { width: usize, height: usize },

    /// A required key is absent from the parameter map.
    #[error("missing required parameter `{0}`")]
    MissingParameter(&'static str),

    /// A parameter value is present but not of the required integer type.
    #[error("parameter `{0}` is not an integer of the required range")]
    ParameterTypeMismatch(&'static str),
}
