//! Error types for the pointer-field core.
//!
//! The simulation itself never fails: degenerate geometry and numeric edge
//! cases degrade to a rest-state frame. These errors cover the surfaces
//! around it (field lookup, colour parsing, parameter objects, host I/O).

use thiserror::Error;

/// Errors produced around field construction and rendering.
#[derive(Debug, Error)]
pub enum FieldError {
    /// A field name passed to a registry was not recognized.
    #[error("unknown field: {0}")]
    UnknownField(String),

    /// A color string could not be parsed.
    #[error("invalid color: {0}")]
    InvalidColor(String),

    /// A palette could not be constructed from the given colors.
    #[error("invalid palette: {0}")]
    InvalidPalette(String),

    /// A parameter value was present but unusable.
    #[error("invalid parameter '{name}': {reason}")]
    InvalidParam { name: String, reason: String },

    /// The host could not provide a drawing surface or context.
    #[error("drawing surface unavailable: {0}")]
    SurfaceUnavailable(String),

    /// Writing an output artifact failed.
    #[error("i/o error: {0}")]
    Io(String),
}
