//! Host boundary errors
//!
//! The geometry itself never fails: every numeric input is clamped or wrapped.
//! Errors only surface where the host hands us identifiers or buffers.

/// Errors reported at the host boundary
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PolyGenError {
    /// A parameter index outside the parameter table
    UnknownParameter(u8),
    /// A routing parameter points past the buses the host supplied
    BusOutOfRange { bus: i16, available: usize },
    /// The bus slice is not a whole number of `num_frames` channels
    FrameCountMismatch { expected: usize, actual: usize },
}

impl std::fmt::Display for PolyGenError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PolyGenError::UnknownParameter(index) => {
                write!(f, "Unknown parameter index {}", index)
            }
            PolyGenError::BusOutOfRange { bus, available } => {
                write!(f, "Bus {} out of range ({} buses available)", bus, available)
            }
            PolyGenError::FrameCountMismatch { expected, actual } => write!(
                f,
                "Bus length {} is not a multiple of {} frames",
                actual, expected
            ),
        }
    }
}

impl std::error::Error for PolyGenError {}
