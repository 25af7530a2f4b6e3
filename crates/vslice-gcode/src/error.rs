//! Error types for G-code generation.

use thiserror::Error;

/// Errors that can occur while translating a pattern into G-code.
///
/// Every error is fatal for the job-profile pair it occurred in; the same
/// pattern can still be translated against other profiles.
#[derive(Error, Debug)]
pub enum GcodeError {
    /// A profile field is missing or invalid.
    #[error("invalid profile configuration: {0}")]
    Config(String),

    /// A template referenced by the profile is not registered.
    #[error("unknown template \"{0}\"")]
    MissingTemplate(String),

    /// The job contains no paths.
    #[error("job contains no paths")]
    EmptyJob,

    /// A path in the job is unusable.
    #[error("path {index}: {reason}")]
    InvalidPath {
        /// Zero-based path index within the job.
        index: usize,
        /// What went wrong.
        reason: String,
    },

    /// A computed quantity is non-finite or negative where it must not be.
    ///
    /// Never silently clamped: a wrong number here means a physically wrong
    /// toolpath.
    #[error("numeric error in path {index}: {reason}")]
    Numeric {
        /// Zero-based path index within the job.
        index: usize,
        /// What went wrong.
        reason: String,
    },

    /// A converted position falls outside the configured build volume.
    #[error("position ({x:.3}, {y:.3}, {z:.3}) is outside the build volume")]
    OutOfBounds {
        /// X coordinate (mm).
        x: f64,
        /// Y coordinate (mm).
        y: f64,
        /// Z coordinate (mm).
        z: f64,
    },
}

/// Result type for G-code generation.
pub type Result<T> = std::result::Result<T, GcodeError>;
