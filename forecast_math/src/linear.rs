//! Linear scoring of feature rows
//!
//! A pre-trained linear model reduces to a weight vector and an intercept.
//! Training happens elsewhere; this module only evaluates
//! `intercept + Σ wᵢ·xᵢ` for each row.

use crate::{MathError, Result};
use serde::{Deserialize, Serialize};

/// Fixed weights and intercept of a linear model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinearScorer {
    weights: Vec<f64>,
    intercept: f64,
}

impl LinearScorer {
    /// Create a scorer, rejecting non-finite weights
    pub fn new(weights: Vec<f64>, intercept: f64) -> Result<Self> {
        if weights.iter().any(|w| !w.is_finite()) || !intercept.is_finite() {
            return Err(MathError::InvalidInput(
                "Weights and intercept must be finite".to_string(),
            ));
        }

        Ok(Self { weights, intercept })
    }

    /// Number of inputs each row must have
    pub fn arity(&self) -> usize {
        self.weights.len()
    }

    /// Score a single row
    pub fn score(&self, row: &[f64]) -> Result<f64> {
        if row.len() != self.weights.len() {
            return Err(MathError::DimensionMismatch {
                expected: self.weights.len(),
                actual: row.len(),
            });
        }

        Ok(self
            .weights
            .iter()
            .zip(row)
            .fold(self.intercept, |acc, (w, x)| acc + w * x))
    }

    /// Score every row, failing on the first malformed one
    pub fn score_rows<R: AsRef<[f64]>>(&self, rows: &[R]) -> Result<Vec<f64>> {
        rows.iter().map(|row| self.score(row.as_ref())).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_score() {
        let scorer = LinearScorer::new(vec![2.0, -1.0, 0.5], 10.0).unwrap();
        assert_eq!(scorer.arity(), 3);

        // 10 + 2*3 - 1*4 + 0.5*2 = 13
        assert_relative_eq!(scorer.score(&[3.0, 4.0, 2.0]).unwrap(), 13.0);
    }

    #[test]
    fn test_dimension_mismatch() {
        let scorer = LinearScorer::new(vec![1.0, 1.0], 0.0).unwrap();
        let err = scorer.score(&[1.0]).unwrap_err();
        assert_eq!(
            err,
            MathError::DimensionMismatch {
                expected: 2,
                actual: 1
            }
        );
    }

    #[test]
    fn test_score_rows() {
        let scorer = LinearScorer::new(vec![1.0], 5.0).unwrap();
        let rows = vec![vec![1.0], vec![2.0], vec![3.0]];
        assert_eq!(scorer.score_rows(&rows).unwrap(), vec![6.0, 7.0, 8.0]);
    }

    #[test]
    fn test_rejects_non_finite_weights() {
        assert!(LinearScorer::new(vec![f64::NAN], 0.0).is_err());
        assert!(LinearScorer::new(vec![1.0], f64::INFINITY).is_err());
    }
}
