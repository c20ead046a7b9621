//! Probability-like message vectors exchanged between neighboring nodes
//!
//! A message summarizes the influence of the sender's subgraph on the
//! receiver: element `i` is the relative likelihood of the receiver's `i`-th
//! candidate. Messages are unnormalized until one of the normalization
//! operations is applied.

use crate::io::error::{InferenceError, Result};

/// A fixed-length vector of non-negative relative likelihoods
#[derive(Clone, Debug, PartialEq)]
pub struct Message {
    elements: Vec<f64>,
}

impl Message {
    /// Create a message with every element set to `value`
    pub fn filled(length: usize, value: f64) -> Self {
        Self {
            elements: vec![value; length],
        }
    }

    /// Create the identity message (all ones), neutral under multiplication
    pub fn identity(length: usize) -> Self {
        Self::filled(length, 1.0)
    }

    /// Create a message from explicit elements, e.g. a prior vector
    pub const fn from_elements(elements: Vec<f64>) -> Self {
        Self { elements }
    }

    /// Number of elements, equal to the receiver's candidate count
    pub const fn len(&self) -> usize {
        self.elements.len()
    }

    /// Whether the message has no elements
    pub const fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Borrow the elements
    pub const fn elements(&self) -> &[f64] {
        self.elements.as_slice()
    }

    /// Consume the message, yielding its elements
    pub fn into_elements(self) -> Vec<f64> {
        self.elements
    }

    /// Multiply elementwise with another message of the same length, in place
    ///
    /// No normalization is performed; extra elements of a longer operand are
    /// ignored so lengths must match for a meaningful result.
    pub fn multiply(&mut self, other: &Self) {
        for (element, factor) in self.elements.iter_mut().zip(&other.elements) {
            *element *= factor;
        }
    }

    /// Divide every element by the sum of all elements
    ///
    /// # Errors
    ///
    /// Returns [`InferenceError::DegenerateDistribution`] when the sum is
    /// zero or not finite, which only happens when priors or all pairwise
    /// potentials have collapsed to zero.
    pub fn normalize_sum(&mut self) -> Result<()> {
        let sum: f64 = self.elements.iter().sum();
        if sum <= 0.0 || !sum.is_finite() {
            return Err(InferenceError::DegenerateDistribution {
                operation: "normalize_sum",
            });
        }
        for element in &mut self.elements {
            *element /= sum;
        }
        Ok(())
    }

    /// Divide every element by the maximum element, mapping into `[0, 1]`
    ///
    /// # Errors
    ///
    /// Returns [`InferenceError::DegenerateDistribution`] when the maximum is
    /// zero or not finite.
    pub fn normalize_max(&mut self) -> Result<()> {
        let max = self.elements.iter().copied().fold(0.0_f64, f64::max);
        if max <= 0.0 || !max.is_finite() {
            return Err(InferenceError::DegenerateDistribution {
                operation: "normalize_max",
            });
        }
        for element in &mut self.elements {
            *element /= max;
        }
        Ok(())
    }
}
