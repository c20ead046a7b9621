//! Dictionary patches and border overlap distances
//!
//! A dictionary patch stores only what the pairwise potentials need: the four
//! border pixel strips of width `overlap_width`. Facing borders of two
//! patches are laid out row-major so that corresponding positions line up
//! index-for-index between direction `d` of one patch and `d.opposite()` of
//! the other.

use crate::mrf::direction::Direction;
use ndarray::{Array2, ArrayView1};

/// Squared pixel difference normalized into `[0, 1]`
fn pixel_distance(a: i32, b: i32) -> f64 {
    let difference = f64::from(a - b);
    (difference * difference) / (255.0 * 255.0)
}

/// One fixed candidate patch, reduced to its four border strips
///
/// Created once at load time and never mutated; owned by the engine for the
/// duration of a run.
#[derive(Clone, Debug)]
pub struct DictionaryPatch {
    borders: [Vec<i32>; 4],
}

impl DictionaryPatch {
    /// Extract the four border strips from a flattened `patch_size²` pixel
    /// vector
    ///
    /// Top and bottom strips span the full patch width at height
    /// `overlap_width`; left and right strips span the full height at width
    /// `overlap_width`. Callers must guarantee
    /// `0 < overlap_width < patch_size`; the engine validates this before any
    /// patch is built.
    pub fn from_pixels(
        pixels: ArrayView1<'_, i32>,
        patch_size: usize,
        overlap_width: usize,
    ) -> Self {
        let mut borders: [Vec<i32>; 4] = [Vec::new(), Vec::new(), Vec::new(), Vec::new()];

        for direction in Direction::ALL {
            let (row_start, row_count, col_start, col_count) = match direction {
                Direction::Top => (0, overlap_width, 0, patch_size),
                Direction::Right => (0, patch_size, patch_size - overlap_width, overlap_width),
                Direction::Bottom => (patch_size - overlap_width, overlap_width, 0, patch_size),
                Direction::Left => (0, patch_size, 0, overlap_width),
            };

            let mut strip = Vec::with_capacity(row_count * col_count);
            for row in row_start..row_start + row_count {
                for col in col_start..col_start + col_count {
                    strip.push(pixels.get(row * patch_size + col).copied().unwrap_or(0));
                }
            }

            if let Some(slot) = borders.get_mut(direction.index()) {
                *slot = strip;
            }
        }

        Self { borders }
    }

    /// Border strip pixels for one direction
    pub fn border(&self, direction: Direction) -> &[i32] {
        self.borders
            .get(direction.index())
            .map_or(&[], Vec::as_slice)
    }

    /// Mean normalized squared pixel difference between this patch's
    /// `direction` border and the facing border of `other`
    ///
    /// `other` is understood to sit in `direction` of this patch, so its
    /// facing border is the one in `direction.opposite()`. Pure and
    /// deterministic; the result is in `[0, 1]` and zero exactly when the
    /// overlapping pixels agree.
    pub fn overlap_distance(&self, other: &Self, direction: Direction) -> f64 {
        let own = self.border(direction);
        let facing = other.border(direction.opposite());

        let count = own.len().min(facing.len());
        if count == 0 {
            return 0.0;
        }

        let sum: f64 = own
            .iter()
            .zip(facing)
            .map(|(&a, &b)| pixel_distance(a, b))
            .sum();
        sum / count as f64
    }
}

/// Build the patch dictionary from a matrix of flattened pixel rows
pub fn prepare_dictionary(
    patch_vectors: &Array2<i32>,
    patch_size: usize,
    overlap_width: usize,
) -> Vec<DictionaryPatch> {
    patch_vectors
        .rows()
        .into_iter()
        .map(|row| DictionaryPatch::from_pixels(row, patch_size, overlap_width))
        .collect()
}
