//! Population covariance between two equally sized samples.
//!
//! Computed as `mean(x·y) − mean(x)·mean(y)`, in a single pass. Three entry
//! points accept the data as raw buffers with an explicit length, as slices,
//! or as single-column matrices; they agree exactly on equivalent input.

use serde::{Deserialize, Serialize};

/// A dense matrix with a single column.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ColumnMatrix {
    data: Vec<f64>,
}

impl ColumnMatrix {
    pub fn new(data: Vec<f64>) -> Self {
        Self { data }
    }

    pub fn rows(&self) -> usize {
        self.data.len()
    }

    pub fn get(&self, row: usize) -> Option<f64> {
        self.data.get(row).copied()
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }
}

impl From<Vec<f64>> for ColumnMatrix {
    fn from(data: Vec<f64>) -> Self {
        Self::new(data)
    }
}

impl FromIterator<f64> for ColumnMatrix {
    fn from_iter<I: IntoIterator<Item = f64>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

fn population_covariance(x: &[f64], y: &[f64]) -> f64 {
    debug_assert_eq!(x.len(), y.len());
    let n = x.len() as f64;
    let (sum_x, sum_y, sum_xy) = x
        .iter()
        .zip(y)
        .fold((0.0_f64, 0.0_f64, 0.0_f64), |(a, b, c), (xi, yi)| {
            (a + xi, b + yi, c + xi * yi)
        });
    sum_xy / n - (sum_x / n) * (sum_y / n)
}

/// Covariance of the first `n` elements of two buffers.
///
/// # Panics
///
/// Panics if `n` is zero or either buffer holds fewer than `n` elements.
pub fn covariance_n(x: &[f64], y: &[f64], n: usize) -> f64 {
    assert!(n > 0, "covariance needs at least one sample");
    assert!(
        x.len() >= n && y.len() >= n,
        "buffers shorter than the requested {n} samples"
    );
    population_covariance(&x[..n], &y[..n])
}

/// Covariance of two equally long samples.
///
/// # Panics
///
/// Panics if the samples are empty or differ in length.
pub fn covariance(x: &[f64], y: &[f64]) -> f64 {
    assert!(!x.is_empty(), "covariance needs at least one sample");
    assert_eq!(x.len(), y.len(), "samples must have the same length");
    population_covariance(x, y)
}

/// Covariance of two single-column matrices.
///
/// # Panics
///
/// Panics if the matrices are empty or differ in row count.
pub fn covariance_columns(x: &ColumnMatrix, y: &ColumnMatrix) -> f64 {
    assert!(x.rows() > 0, "covariance needs at least one sample");
    assert_eq!(x.rows(), y.rows(), "columns must have the same row count");
    population_covariance(x.as_slice(), y.as_slice())
}

/// Population variance, i.e. the covariance of a sample with itself.
pub fn variance(x: &[f64]) -> f64 {
    covariance(x, x)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_values() {
        let x = [1.0, 2.0, 3.0, 4.0];
        let y = [2.0, 4.0, 6.0, 8.0];
        // mean(xy) = 15, mean(x)·mean(y) = 2.5·5
        assert_eq!(covariance(&x, &y), 2.5);
        assert_eq!(variance(&x), 1.25);
    }

    #[test]
    fn anti_correlated_samples_are_negative() {
        let x = [1.0, 2.0, 3.0];
        let y = [3.0, 2.0, 1.0];
        assert!(covariance(&x, &y) < 0.0);
    }

    #[test]
    fn explicit_length_ignores_the_tail() {
        let x = [1.0, 2.0, 3.0, 100.0];
        let y = [1.0, 2.0, 3.0, -50.0];
        assert_eq!(covariance_n(&x, &y, 3), covariance(&x[..3], &y[..3]));
    }

    #[test]
    fn single_sample_has_zero_covariance() {
        assert_eq!(covariance(&[4.0], &[7.0]), 0.0);
    }

    #[test]
    #[should_panic(expected = "at least one sample")]
    fn empty_input_panics() {
        covariance(&[], &[]);
    }

    #[test]
    #[should_panic(expected = "same length")]
    fn mismatched_input_panics() {
        covariance(&[1.0, 2.0], &[1.0]);
    }

    #[test]
    #[should_panic(expected = "same row count")]
    fn mismatched_columns_panic() {
        covariance_columns(&ColumnMatrix::new(vec![1.0]), &ColumnMatrix::new(vec![1.0, 2.0]));
    }
}
