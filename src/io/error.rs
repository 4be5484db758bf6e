//! Error types and context management for extraction and solving

use std::fmt;
use std::path::PathBuf;

/// Main error type for all tilemap, pattern and solver operations
#[derive(Debug)]
pub enum WfcError {
    /// The host region contained no tiles at all
    EmptyInput,

    /// Occupied host cells do not form a hole-free rectangle
    MalformedInput {
        /// Width of the bounding box of occupied cells
        width: usize,
        /// Height of the bounding box of occupied cells
        height: usize,
        /// Number of occupied cells actually found
        found: usize,
    },

    /// Parameter validation failed
    InvalidParameter {
        /// Name of the invalid parameter
        parameter: &'static str,
        /// Provided value that failed validation
        value: String,
        /// Explanation of why the value is invalid
        reason: String,
    },

    /// No undetermined cell has a candidate left
    ///
    /// Occurs when propagation emptied the candidate set of every remaining
    /// undetermined cell, so the solver cannot pick anything to collapse.
    NoCandidate {
        /// Solve attempt during which the contradiction happened
        attempt: usize,
        /// Number of cells still undetermined
        undetermined: usize,
    },

    /// A saved pattern id is not a candidate of the cell it targets
    UnknownPatternId {
        /// Linear index of the cell being restored
        index: usize,
        /// Saved pattern id
        id: i64,
    },

    /// Source data doesn't meet algorithm requirements
    InvalidSourceData {
        /// Description of what's wrong with the source data
        reason: String,
    },

    /// Failed to load a tile sheet from the filesystem
    ImageLoad {
        /// Path to the image file
        path: PathBuf,
        /// Underlying image loading error
        source: image::ImageError,
    },

    /// Failed to save a generated image to disk
    ImageExport {
        /// Path where export was attempted
        path: PathBuf,
        /// Underlying image export error
        source: image::ImageError,
    },

    /// General file system operation failure
    FileSystem {
        /// Path involved in the operation
        path: PathBuf,
        /// Description of the operation that failed
        operation: &'static str,
        /// Underlying I/O error
        source: std::io::Error,
    },

    /// Saved state could not be encoded or decoded
    Serialization {
        /// File involved, if any
        path: Option<PathBuf>,
        /// Underlying JSON error
        source: serde_json::Error,
    },
}

impl fmt::Display for WfcError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyInput => write!(f, "No tiles found in input"),
            Self::MalformedInput {
                width,
                height,
                found,
            } => {
                write!(
                    f,
                    "Input must be a rectangle without holes or outliers: expected {} tiles ({width}x{height}), found {found}",
                    width * height
                )
            }
            Self::InvalidParameter {
                parameter,
                value,
                reason,
            } => {
                write!(f, "Invalid parameter '{parameter}' = '{value}': {reason}")
            }
            Self::NoCandidate {
                attempt,
                undetermined,
            } => {
                write!(
                    f,
                    "No candidate cell left in attempt {attempt} ({undetermined} cells undetermined)"
                )
            }
            Self::UnknownPatternId { index, id } => {
                write!(f, "Pattern id {id} is not a candidate of cell {index}")
            }
            Self::InvalidSourceData { reason } => {
                write!(f, "Invalid source data: {reason}")
            }
            Self::ImageLoad { path, source } => {
                write!(f, "Failed to load image '{}': {source}", path.display())
            }
            Self::ImageExport { path, source } => {
                write!(
                    f,
                    "Failed to export image to '{}': {source}",
                    path.display()
                )
            }
            Self::FileSystem {
                path,
                operation,
                source,
            } => {
                write!(
                    f,
                    "File system error during {operation} on '{}': {source}",
                    path.display()
                )
            }
            Self::Serialization { path, source } => match path {
                Some(path) => write!(
                    f,
                    "Failed to (de)serialize saved state '{}': {source}",
                    path.display()
                ),
                None => write!(f, "Failed to (de)serialize saved state: {source}"),
            },
        }
    }
}

impl std::error::Error for WfcError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::ImageLoad { source, .. } | Self::ImageExport { source, .. } => Some(source),
            Self::FileSystem { source, .. } => Some(source),
            Self::Serialization { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl WfcError {
    /// Whether the solve loop may recover from this error by retrying
    pub const fn is_contradiction(&self) -> bool {
        matches!(self, Self::NoCandidate { .. })
    }
}

/// Convenience type alias for crate results
pub type Result<T> = std::result::Result<T, WfcError>;

/// Additional context to enrich error messages
#[derive(Debug, Clone, Copy, Default)]
pub struct ErrorContext {
    /// Solve attempt the error was raised in
    pub attempt: Option<usize>,
    /// Operation being performed
    pub operation: Option<&'static str>,
}

/// Enriches error messages with solver state information
pub trait WithContext<T> {
    /// Add error context to a Result
    ///
    /// # Errors
    ///
    /// Propagates the original error with additional context applied
    fn with_context(self, context: ErrorContext) -> Result<T>;

    /// Add just the attempt number
    ///
    /// # Errors
    ///
    /// Propagates the original error with the attempt applied
    fn with_attempt(self, attempt: usize) -> Result<T>;
}

impl<T, E> WithContext<T> for std::result::Result<T, E>
where
    E: Into<WfcError>,
{
    fn with_context(self, context: ErrorContext) -> Result<T> {
        self.map_err(|e| {
            let mut error = e.into();
            // Only contradictions carry an attempt counter
            if let WfcError::NoCandidate { attempt, .. } = &mut error {
                if let Some(current) = context.attempt {
                    *attempt = current;
                }
            }
            error
        })
    }

    fn with_attempt(self, attempt: usize) -> Result<T> {
        self.with_context(ErrorContext {
            attempt: Some(attempt),
            ..Default::default()
        })
    }
}

impl From<image::ImageError> for WfcError {
    fn from(err: image::ImageError) -> Self {
        Self::ImageLoad {
            path: PathBuf::from("<unknown>"),
            source: err,
        }
    }
}

impl From<std::io::Error> for WfcError {
    fn from(err: std::io::Error) -> Self {
        Self::FileSystem {
            path: PathBuf::from("<unknown>"),
            operation: "unknown",
            source: err,
        }
    }
}

impl From<serde_json::Error> for WfcError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization {
            path: None,
            source: err,
        }
    }
}

/// Create an invalid parameter error
pub fn invalid_parameter(
    parameter: &'static str,
    value: &impl ToString,
    reason: &impl ToString,
) -> WfcError {
    WfcError::InvalidParameter {
        parameter,
        value: value.to_string(),
        reason: reason.to_string(),
    }
}
