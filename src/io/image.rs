//! Grayscale PNG rendering of the maximum a posteriori patch assembly
//!
//! Turns the inference result back into pixels: each grid cell contributes
//! its most probable candidate patch, painted at stride
//! `patch_size - overlap_width` so neighboring patches overwrite each other
//! in the shared border strips.

use crate::io::error::{InferenceError, Result};
use image::{ImageBuffer, Luma};
use ndarray::Array2;
use std::cmp::Ordering;
use std::path::Path;

fn argmax(row: &[f64]) -> usize {
    row.iter()
        .enumerate()
        .max_by(|a, b| a.1.partial_cmp(b.1).unwrap_or(Ordering::Equal))
        .map_or(0, |(index, _)| index)
}

/// Render the argmax patch of every node into a grayscale PNG
///
/// `dictionary_pixels` is the same matrix the engine was built from;
/// `candidates` and `posteriors` have one row per node in grid order.
///
/// # Errors
///
/// Returns an error when a candidate index falls outside the dictionary,
/// when the parent directory cannot be created, or when the image cannot be
/// saved.
pub fn render_map_image(
    dictionary_pixels: &Array2<i32>,
    candidates: &Array2<usize>,
    posteriors: &Array2<f64>,
    grid_rows: usize,
    grid_cols: usize,
    patch_size: usize,
    overlap_width: usize,
    output_path: &Path,
) -> Result<()> {
    let stride = patch_size - overlap_width;
    let width = grid_cols.saturating_sub(1) * stride + patch_size;
    let height = grid_rows.saturating_sub(1) * stride + patch_size;

    let mut img = ImageBuffer::new(width as u32, height as u32);

    for (node, (posterior_row, candidate_row)) in posteriors
        .rows()
        .into_iter()
        .zip(candidates.rows())
        .enumerate()
    {
        let grid_row = node / grid_cols.max(1);
        let grid_col = node % grid_cols.max(1);
        if grid_row >= grid_rows {
            break;
        }

        let best = argmax(posterior_row.to_slice().unwrap_or(&[]));
        let Some(&patch_index) = candidate_row.get(best) else {
            continue;
        };
        if patch_index >= dictionary_pixels.nrows() {
            return Err(InferenceError::InvalidPatchIndex {
                index: patch_index,
                dictionary_size: dictionary_pixels.nrows(),
            });
        }

        for py in 0..patch_size {
            for px in 0..patch_size {
                let value = dictionary_pixels
                    .get((patch_index, py * patch_size + px))
                    .copied()
                    .unwrap_or(0)
                    .clamp(0, 255) as u8;
                let x = (grid_col * stride + px) as u32;
                let y = (grid_row * stride + py) as u32;
                if x < width as u32 && y < height as u32 {
                    img.put_pixel(x, y, Luma([value]));
                }
            }
        }
    }

    if let Some(parent) = output_path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent).map_err(|error| InferenceError::FileSystem {
            path: parent.to_path_buf(),
            operation: "create directory",
            source: error,
        })?;
    }

    img.save(output_path)
        .map_err(|error| InferenceError::ImageExport {
            path: output_path.to_path_buf(),
            source: error,
        })?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{argmax, render_map_image};
    use ndarray::Array2;

    #[test]
    fn test_argmax_picks_largest_element() {
        assert_eq!(argmax(&[0.1, 0.7, 0.2]), 1);
        assert_eq!(argmax(&[0.9]), 0);
        assert_eq!(argmax(&[]), 0);
    }

    #[test]
    fn test_render_writes_expected_dimensions() {
        let dir = tempfile::tempdir().unwrap_or_else(|_| unreachable!("tempdir available"));
        let path = dir.path().join("map.png");

        // Two 2x2 patches, 1x2 grid, overlap 1: image is 2 tall, 3 wide
        let dictionary =
            Array2::from_shape_vec((2, 4), vec![0, 0, 0, 0, 255, 255, 255, 255])
                .unwrap_or_default();
        let candidates = Array2::from_shape_vec((2, 2), vec![0, 1, 0, 1]).unwrap_or_default();
        let posteriors =
            Array2::from_shape_vec((2, 2), vec![0.9, 0.1, 0.2, 0.8]).unwrap_or_default();

        let result = render_map_image(&dictionary, &candidates, &posteriors, 1, 2, 2, 1, &path);
        assert!(result.is_ok());

        let Ok(rendered) = image::open(&path) else {
            unreachable!("rendered PNG must reopen");
        };
        assert_eq!(rendered.width(), 3);
        assert_eq!(rendered.height(), 2);
    }

    #[test]
    fn test_render_rejects_out_of_range_candidate() {
        let dir = tempfile::tempdir().unwrap_or_else(|_| unreachable!("tempdir available"));
        let path = dir.path().join("bad.png");

        let dictionary = Array2::from_shape_vec((1, 4), vec![0, 0, 0, 0]).unwrap_or_default();
        let candidates = Array2::from_shape_vec((1, 1), vec![9]).unwrap_or_default();
        let posteriors = Array2::from_shape_vec((1, 1), vec![1.0]).unwrap_or_default();

        let result = render_map_image(&dictionary, &candidates, &posteriors, 1, 1, 2, 1, &path);
        assert!(result.is_err());
    }
}
