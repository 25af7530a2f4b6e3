//! Error types for pattern reading.

use thiserror::Error;

/// Errors that can occur while reading slicer output.
#[derive(Error, Debug)]
pub enum PatternError {
    /// An input file could not be read.
    #[error("failed to read {path}: {source}")]
    Io {
        /// Path of the file that failed to read.
        path: String,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// A required header key is absent from the slicer output.
    #[error("missing key \"{0}\" in slicer output header")]
    MissingKey(String),

    /// A header key matched more than one line.
    #[error("multiple matches for key \"{0}\" in slicer output header")]
    AmbiguousKey(String),

    /// A header value could not be parsed.
    #[error("invalid value for key \"{key}\": {value:?}")]
    InvalidValue {
        /// The header key.
        key: String,
        /// The raw value that failed to parse.
        value: String,
    },

    /// A path line could not be parsed into coordinates.
    #[error("malformed path {path_index} in layer {layer_index}: {reason}")]
    MalformedPath {
        /// Zero-based layer index.
        layer_index: usize,
        /// Zero-based path index within the layer.
        path_index: usize,
        /// What went wrong.
        reason: String,
    },

    /// The pattern contains no printable paths.
    #[error("pattern contains no printable paths")]
    EmptyPattern,
}

/// Result type for pattern operations.
pub type Result<T> = std::result::Result<T, PatternError>;
