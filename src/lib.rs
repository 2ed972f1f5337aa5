//! # landmark-align
//!
//! Shape alignment algebra for training facial landmark regressors.
//!
//! This crate provides:
//! - **Procrustes alignment**: closed-form least-squares similarity transform
//!   (scale, rotation, translation) between two landmark shapes
//! - **Normalization**: centering a shape and fixing its scale and rotation
//!   from two eye landmarks
//! - **Mean shape estimation**: generalized Procrustes analysis over a
//!   training set, producing the canonical reference shape a cascade
//!   regressor starts from
//! - **Supporting math**: shape arithmetic, remapping between face windows,
//!   population covariance
//!
//! Everything is pure, single-threaded computation over in-memory values.
//! Degenerate geometry (coincident eyes, collapsed shapes) is reported as an
//! [`Error`] instead of leaking NaN into the trainer.
//!
//! ## Quick Start
//!
//! ```rust
//! use landmark_align::{compute_mean_shape, procrustes, AlignmentConfig, Point, Shape};
//!
//! // Two annotations of the same 5-point face at different positions and sizes
//! let a = Shape::new(vec![
//!     Point::new(30.0, 30.0), // left eye
//!     Point::new(70.0, 30.0), // right eye
//!     Point::new(50.0, 55.0), // nose tip
//!     Point::new(35.0, 75.0), // left mouth corner
//!     Point::new(65.0, 75.0), // right mouth corner
//! ]);
//! let mut b = a.clone();
//! b.translate(Point::new(120.0, 40.0));
//!
//! let config = AlignmentConfig::five_point();
//! let mean = compute_mean_shape(&[a.clone(), b], &config, 10).unwrap();
//!
//! // Map a raw annotation onto the mean shape
//! let tform = procrustes::solve(&mean, &a).unwrap();
//! let aligned = tform.transformed(&a);
//! assert!(procrustes::sum_squared_distance(&mean, &aligned) < 1e-12);
//! ```

mod config;
mod error;
pub mod linalg;
pub mod mean_shape;
pub mod normalize;
pub mod procrustes;
pub mod stats;
mod transform;
mod types;
pub mod window;

pub use config::{AlignmentConfig, EyeAxisAngle, MeanShapeOptions};
pub use error::{Error, Result};
pub use mean_shape::{compute_mean_shape, MeanShapeEstimate, MeanShapeEstimator};
pub use normalize::{normalize, normalized};
pub use stats::{covariance, covariance_columns, covariance_n, variance, ColumnMatrix};
pub use transform::{Matrix2, SimilarityTransform, Translation};
pub use types::{BoundingBox, Point, Shape};
pub use window::{remap, remap_point};
