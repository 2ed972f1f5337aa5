//! Mean shape estimation by generalized Procrustes analysis.
//!
//! Starting from the first training shape, every round
//! 1. aligns each training shape onto the current mean with [`procrustes::solve`],
//! 2. averages the aligned shapes pointwise,
//! 3. normalizes the average with [`normalize`] so scale and rotation cannot
//!    drift between rounds.
//!
//! The estimator works on its own copies of the training shapes; the
//! caller's shapes are never modified.

use crate::config::{AlignmentConfig, MeanShapeOptions};
use crate::error::{Error, Result};
use crate::normalize::normalize;
use crate::procrustes;
use crate::transform::Translation;
use crate::types::Shape;

/// Alignment rounds run when no other count is given.
pub const DEFAULT_ITERATIONS: usize = 10;

/// Result of a mean shape estimation.
#[derive(Debug, Clone, PartialEq)]
pub struct MeanShapeEstimate {
    /// The normalized consensus shape.
    pub shape: Shape,
    /// Alignment rounds actually performed.
    pub iterations_run: usize,
    /// Largest landmark movement of the mean during the last round, or
    /// `None` if no round ran.
    pub last_displacement: Option<f64>,
}

/// Builder-style front end for mean shape estimation.
///
/// # Usage
///
/// ```
/// use landmark_align::{AlignmentConfig, MeanShapeEstimator, Point, Shape};
///
/// let shapes = vec![
///     Shape::new(vec![Point::new(0.0, 0.0), Point::new(2.0, 0.0), Point::new(1.0, 2.0)]),
///     Shape::new(vec![Point::new(5.0, 5.0), Point::new(9.0, 5.0), Point::new(7.0, 9.0)]),
/// ];
/// let estimate = MeanShapeEstimator::new(AlignmentConfig::five_point())
///     .iterations(20)
///     .convergence_threshold(1e-9)
///     .estimate(&shapes)
///     .unwrap();
/// assert_eq!(estimate.shape.num_landmarks(), 3);
/// ```
#[derive(Debug, Clone)]
pub struct MeanShapeEstimator {
    config: AlignmentConfig,
    options: MeanShapeOptions,
}

impl MeanShapeEstimator {
    pub fn new(config: AlignmentConfig) -> Self {
        Self {
            config,
            options: MeanShapeOptions::default(),
        }
    }

    pub fn with_options(config: AlignmentConfig, options: MeanShapeOptions) -> Self {
        Self { config, options }
    }

    /// Maximum number of alignment rounds.
    pub fn iterations(mut self, iterations: usize) -> Self {
        self.options.iterations = iterations;
        self
    }

    /// Stop once the mean moves by less than `threshold` in a round.
    pub fn convergence_threshold(mut self, threshold: f64) -> Self {
        self.options.convergence_threshold = Some(threshold);
        self
    }

    pub fn options(&self) -> &MeanShapeOptions {
        &self.options
    }

    /// Estimate the mean shape of `shapes`, leaving them untouched.
    pub fn estimate(&self, shapes: &[Shape]) -> Result<MeanShapeEstimate> {
        self.estimate_owned(shapes.to_vec())
    }

    /// Estimate the mean shape, using `shapes` as the working set.
    ///
    /// # Panics
    ///
    /// Panics if the shapes have different landmark counts.
    pub fn estimate_owned(&self, mut shapes: Vec<Shape>) -> Result<MeanShapeEstimate> {
        let first = shapes.first().ok_or(Error::EmptyTrainingSet)?;
        let num_landmarks = first.num_landmarks();
        assert!(
            shapes.iter().all(|s| s.num_landmarks() == num_landmarks),
            "all training shapes must have the same number of landmarks"
        );
        self.config.validate(num_landmarks)?;

        let mut mean = first.clone();
        let mut estimate = MeanShapeEstimate {
            shape: Shape::default(),
            iterations_run: 0,
            last_displacement: None,
        };

        for iteration in 0..self.options.iterations {
            for shape in shapes.iter_mut() {
                let tform = procrustes::solve(&mean, shape)?;
                tform.apply(shape, Translation::Apply);
            }

            let mut next = Shape::mean_of(&shapes).ok_or(Error::EmptyTrainingSet)?;
            normalize(&mut next, &self.config)?;
            if !next.is_finite() {
                return Err(Error::NonFiniteResult("mean shape"));
            }

            let displacement = next.max_displacement(&mean);
            mean = next;
            estimate.iterations_run = iteration + 1;
            estimate.last_displacement = Some(displacement);
            log::debug!(
                "mean shape iteration {}/{}: max landmark displacement {:.3e}",
                iteration + 1,
                self.options.iterations,
                displacement
            );

            if let Some(threshold) = self.options.convergence_threshold {
                if displacement < threshold {
                    log::info!(
                        "mean shape converged after {} iterations (displacement {:.3e} < {:.3e})",
                        iteration + 1,
                        displacement,
                        threshold
                    );
                    break;
                }
            }
        }

        if let (Some(threshold), Some(displacement)) =
            (self.options.convergence_threshold, estimate.last_displacement)
        {
            if displacement >= threshold {
                log::warn!(
                    "mean shape did not converge within {} iterations (displacement {:.3e}, threshold {:.3e})",
                    self.options.iterations,
                    displacement,
                    threshold
                );
            }
        }

        estimate.shape = mean;
        Ok(estimate)
    }
}

/// Mean shape of `shapes` after `iterations` fixed alignment rounds.
///
/// With zero iterations the first shape is returned unchanged.
pub fn compute_mean_shape(
    shapes: &[Shape],
    config: &AlignmentConfig,
    iterations: usize,
) -> Result<Shape> {
    MeanShapeEstimator::new(*config)
        .iterations(iterations)
        .estimate(shapes)
        .map(|estimate| estimate.shape)
}
