//! Error types for inference and matrix I/O operations

use std::fmt;
use std::path::PathBuf;

/// Main error type for all inference operations
#[derive(Debug)]
pub enum InferenceError {
    /// Failed to read a matrix file from the filesystem
    MatrixLoad {
        /// Path to the matrix file
        path: PathBuf,
        /// Underlying I/O error
        source: std::io::Error,
    },

    /// Matrix file contents could not be interpreted
    MatrixParse {
        /// Path to the matrix file
        path: PathBuf,
        /// Description of what was malformed
        reason: String,
    },

    /// Failed to write the result matrix to disk
    MatrixExport {
        /// Path where the export was attempted
        path: PathBuf,
        /// Underlying I/O error
        source: std::io::Error,
    },

    /// Scalar parameter validation failed
    InvalidParameter {
        /// Name of the invalid parameter
        parameter: &'static str,
        /// Provided value that failed validation
        value: String,
        /// Explanation of why the value is invalid
        reason: String,
    },

    /// Two related matrices (or a matrix and the scalar parameters) disagree
    /// in shape
    DimensionMismatch {
        /// Name of the matrix whose shape is wrong
        matrix: &'static str,
        /// Shape required by the parameters or the sibling matrix
        expected: String,
        /// Shape actually provided
        actual: String,
    },

    /// Candidate index exceeds the dictionary
    InvalidPatchIndex {
        /// The out-of-range dictionary index
        index: usize,
        /// Number of patches in the dictionary
        dictionary_size: usize,
    },

    /// Dictionary pixel value outside the 8-bit grayscale range
    InvalidPixelValue {
        /// The offending pixel value
        value: i32,
    },

    /// A message or posterior collapsed to all zeros during normalization
    ///
    /// Arises only when priors or every pairwise potential along an edge are
    /// zero, an input-data pathology; the run is aborted rather than
    /// dividing by zero.
    DegenerateDistribution {
        /// Normalization operation that detected the collapse
        operation: &'static str,
    },

    /// Failed to save the rendered image to disk
    ImageExport {
        /// Path where the export was attempted
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

    /// Numerical computation produced an invalid result
    Computation {
        /// Name of the computation that failed
        operation: &'static str,
        /// Description of the failure
        reason: String,
    },
}

impl fmt::Display for InferenceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MatrixLoad { path, source } => {
                write!(f, "Failed to load matrix '{}': {source}", path.display())
            }
            Self::MatrixParse { path, reason } => {
                write!(f, "Malformed matrix '{}': {reason}", path.display())
            }
            Self::MatrixExport { path, source } => {
                write!(
                    f,
                    "Failed to export matrix to '{}': {source}",
                    path.display()
                )
            }
            Self::InvalidParameter {
                parameter,
                value,
                reason,
            } => {
                write!(f, "Invalid parameter '{parameter}' = '{value}': {reason}")
            }
            Self::DimensionMismatch {
                matrix,
                expected,
                actual,
            } => {
                write!(
                    f,
                    "Matrix '{matrix}' has the wrong shape: expected {expected}, got {actual}"
                )
            }
            Self::InvalidPatchIndex {
                index,
                dictionary_size,
            } => {
                write!(
                    f,
                    "Candidate index {index} is out of bounds for a dictionary of {dictionary_size} patches"
                )
            }
            Self::InvalidPixelValue { value } => {
                write!(f, "Dictionary pixel value {value} is outside the range 0-255")
            }
            Self::DegenerateDistribution { operation } => {
                write!(
                    f,
                    "Degenerate distribution during {operation}: all elements are zero"
                )
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
            Self::Computation { operation, reason } => {
                write!(f, "Computation error in {operation}: {reason}")
            }
        }
    }
}

impl std::error::Error for InferenceError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::MatrixLoad { source, .. }
            | Self::MatrixExport { source, .. }
            | Self::FileSystem { source, .. } => Some(source),
            Self::ImageExport { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// Convenience type alias for inference results
pub type Result<T> = std::result::Result<T, InferenceError>;

/// Create an invalid parameter error
pub fn invalid_parameter(
    parameter: &'static str,
    value: &impl ToString,
    reason: &impl ToString,
) -> InferenceError {
    InferenceError::InvalidParameter {
        parameter,
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

/// Create a computation error
pub fn computation_error(operation: &'static str, reason: &impl ToString) -> InferenceError {
    InferenceError::Computation {
        operation,
        reason: reason.to_string(),
    }
}
