//! Pairwise compatibility functions over border overlap distances
//!
//! The potential maps a normalized border distance to a compatibility score.
//! It sits behind a trait so alternative shapes (truncated or robust
//! potentials) can be substituted without touching the message-update math.

/// A pairwise compatibility function of the overlap distance
pub trait PotentialFn {
    /// Compatibility of two candidate patches whose facing borders differ by
    /// `distance`
    ///
    /// Must be monotonically non-increasing in `distance` for the inference
    /// to prefer well-matching patches.
    fn potential(&self, distance: f64) -> f64;
}

/// The closed-form exponential potential `exp(-distance / two_sigma_squared)`
///
/// Always in `(0, 1]`; a distance of zero (perfect border match) yields
/// potential 1. Smaller temperatures sharpen the preference for matching
/// borders.
#[derive(Clone, Copy, Debug)]
pub struct ExponentialPotential {
    /// Temperature of the potential, the `2σ²` of a Gaussian kernel
    pub two_sigma_squared: f64,
}

impl PotentialFn for ExponentialPotential {
    fn potential(&self, distance: f64) -> f64 {
        (-distance / self.two_sigma_squared).exp()
    }
}
