//! Whitespace-separated text matrix reading and writing
//!
//! The interchange format of the engine: one matrix row per line, values
//! separated by whitespace. Readers only need the column count up front;
//! line breaks are not significant, matching what plain-text producers such
//! as `numpy.savetxt` emit.

use crate::io::error::{InferenceError, Result, invalid_parameter};
use ndarray::Array2;
use num_traits::Num;
use std::fmt::Display;
use std::fs;
use std::path::Path;
use std::str::FromStr;

/// Read a matrix of `cols`-wide rows from a text file
///
/// # Errors
///
/// Returns an error when `cols` is zero, when the file cannot be read, when
/// a token fails to parse as `T`, or when the token count does not divide
/// evenly into rows of `cols` values.
pub fn read_matrix<T>(path: &Path, cols: usize) -> Result<Array2<T>>
where
    T: Num + FromStr,
    <T as FromStr>::Err: Display,
{
    if cols == 0 {
        return Err(invalid_parameter(
            "cols",
            &cols,
            &"matrix rows need at least one column",
        ));
    }

    let contents = fs::read_to_string(path).map_err(|error| InferenceError::MatrixLoad {
        path: path.to_path_buf(),
        source: error,
    })?;

    let mut values = Vec::new();
    for token in contents.split_whitespace() {
        let value = token
            .parse::<T>()
            .map_err(|error| InferenceError::MatrixParse {
                path: path.to_path_buf(),
                reason: format!("invalid value '{token}': {error}"),
            })?;
        values.push(value);
    }

    if values.len() % cols != 0 {
        return Err(InferenceError::MatrixParse {
            path: path.to_path_buf(),
            reason: format!(
                "{} values do not fill complete rows of {cols} columns",
                values.len()
            ),
        });
    }

    let rows = values.len() / cols;
    Array2::from_shape_vec((rows, cols), values).map_err(|error| InferenceError::MatrixParse {
        path: path.to_path_buf(),
        reason: error.to_string(),
    })
}

/// Write a matrix as space-separated lines of values
///
/// # Errors
///
/// Returns an error when the file cannot be written.
pub fn write_matrix(path: &Path, matrix: &Array2<f64>) -> Result<()> {
    let mut contents = String::new();
    for row in matrix.rows() {
        let line: Vec<String> = row.iter().map(ToString::to_string).collect();
        contents.push_str(&line.join(" "));
        contents.push('\n');
    }

    fs::write(path, contents).map_err(|error| InferenceError::MatrixExport {
        path: path.to_path_buf(),
        source: error,
    })
}
