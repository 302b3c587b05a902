//! Configuration errors surfaced at the point of use.

use thiserror::Error;

/// A parameter or catalog lookup the core refuses to run with.
#[derive(Debug, Clone, PartialEq, Error)]
pub(crate) enum ConfigError {
    /// Palette id is not in the catalog.
    #[error("unknown palette: {0}")]
    UnknownPalette(String),

    /// Preset name is not in the catalog.
    #[error("unknown preset: {0}")]
    UnknownPreset(String),

    /// A frame must run at least one integrator step.
    #[error("steps per frame must be at least 1")]
    ZeroSteps,

    /// A numeric parameter is NaN or infinite.
    #[error("parameter {name} is not finite: {value}")]
    NotFinite {
        /// Parameter name.
        name: &'static str,
        /// Offending value.
        value: f32,
    },

    /// Grid dimensions must both be non-zero.
    #[error("grid must be at least 1x1, got {width}x{height}")]
    EmptyGrid { width: usize, height: usize },

    /// Grid dimensions overflow or exceed the cell cap.
    #[error("grid {width}x{height} is too large")]
    GridTooLarge { width: usize, height: usize },

    /// Noise probability outside [0, 1].
    #[error("noise probability must be within [0, 1], got {0}")]
    NoiseOutOfRange(f32),

    /// Zoom percentage of zero leaves nothing to draw.
    #[error("zoom must be greater than 0")]
    ZeroZoom,
}
