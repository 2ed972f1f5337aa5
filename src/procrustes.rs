//! Closed-form least-squares similarity alignment of two shapes.
//!
//! Given shapes `x` and `y` with corresponding landmarks, [`solve`] finds the
//! scale `s`, rotation `θ` and translation `t` minimizing
//!
//! ```text
//! Σ_i ‖x_i − (M·y_i + t)‖²,   M = [s·cosθ, −s·sinθ; s·sinθ, s·cosθ]
//! ```
//!
//! Writing `a = s·cosθ` and `b = s·sinθ` turns the problem into a linear
//! system in `(a, b, tx, ty)`:
//!
//! ```text
//! [ X2  -Y2   W    0 ] [a ]   [X1]
//! [ Y2   X2   0    W ] [b ] = [Y1]
//! [ Z     0   X2  Y2 ] [tx]   [C1]
//! [ 0     Z  -Y2  X2 ] [ty]   [C2]
//! ```
//!
//! with `X1 = Σx.x`, `Y1 = Σx.y`, `X2 = Σy.x`, `Y2 = Σy.y`, `W` the landmark
//! count, `Z = Σ(y.x² + y.y²)`, `C1 = Σ(x.x·y.x + x.y·y.y)` and
//! `C2 = Σ(x.y·y.x − x.x·y.y)`.
//!
//! The sums are taken over `x` and `y` relative to their own centroids, with
//! `y` further divided by its RMS radius. In that frame `X1 = Y1 = X2 = Y2 = 0`
//! and `Z = W`, so the system is equally well conditioned for a face of a few
//! pixels far from the image origin as for a unit face at the origin. The
//! full transform is recovered from the centroids and radius afterwards.

use crate::error::{Error, Result};
use crate::linalg::solve4;
use crate::transform::{Matrix2, SimilarityTransform};
use crate::types::{Point, Shape, RELATIVE_EPSILON};

/// Running sums that make up the normal equations.
#[derive(Debug, Default)]
struct Moments {
    x1: f64,
    y1: f64,
    x2: f64,
    y2: f64,
    z: f64,
    c1: f64,
    c2: f64,
    w: f64,
}

impl Moments {
    /// Sums over `x - x_center` and `(y - y_center) / y_radius`.
    fn accumulate(
        x: &Shape,
        x_center: Point,
        y: &Shape,
        y_center: Point,
        y_radius: f64,
    ) -> Self {
        let mut m = Self {
            w: x.num_landmarks() as f64,
            ..Self::default()
        };
        let inv_radius = 1.0 / y_radius;
        for (p, q) in x.iter().zip(y.iter()) {
            let p = *p - x_center;
            let q = (*q - y_center) * inv_radius;
            m.x1 += p.x;
            m.y1 += p.y;
            m.x2 += q.x;
            m.y2 += q.y;
            m.z += q.x * q.x + q.y * q.y;
            m.c1 += p.x * q.x + p.y * q.y;
            m.c2 += p.y * q.x - p.x * q.y;
        }
        m
    }
}

/// Similarity transform that maps `y` onto `x` with the least total squared
/// landmark displacement.
///
/// Returns [`Error::SingularSystem`] when `y` has no spatial extent: its RMS
/// radius vanishes relative to its distance from the origin, so its
/// landmarks coincide up to rounding.
///
/// # Panics
///
/// Panics if the shapes are empty or have different landmark counts.
pub fn solve(x: &Shape, y: &Shape) -> Result<SimilarityTransform> {
    assert_eq!(
        x.num_landmarks(),
        y.num_landmarks(),
        "shapes must have the same number of landmarks"
    );
    assert!(!x.is_empty(), "cannot align empty shapes");

    let x_center = x.centroid();
    let y_center = y.centroid();
    let y_radius = y.rms_radius();
    if !(y_radius > RELATIVE_EPSILON * (y_center.norm() + y_radius)) {
        return Err(Error::SingularSystem);
    }

    let m = Moments::accumulate(x, x_center, y, y_center, y_radius);
    let lhs = [
        [m.x2, -m.y2, m.w, 0.0],
        [m.y2, m.x2, 0.0, m.w],
        [m.z, 0.0, m.x2, m.y2],
        [0.0, m.z, -m.y2, m.x2],
    ];
    let rhs = [m.x1, m.y1, m.c1, m.c2];

    let [a, b, tx, ty] = solve4(&lhs, &rhs).ok_or(Error::SingularSystem)?;

    // Undo the radius division, then move the translation back out of the
    // centered frame: x ≈ M·(y − ȳ) + t_c + x̄.
    let (a, b) = (a / y_radius, b / y_radius);
    let scale_rotation = Matrix2::new(a, -b, b, a);
    let translation = x_center + Point::new(tx, ty) - scale_rotation.mul_point(y_center);

    let tform = SimilarityTransform::new(scale_rotation, translation);
    log::trace!(
        "procrustes: scale={:.6} rotation={:.6} translation=({:.4}, {:.4})",
        tform.scale(),
        tform.rotation(),
        translation.x,
        translation.y
    );
    Ok(tform)
}

/// Total squared distance between corresponding landmarks.
pub fn sum_squared_distance(x: &Shape, y: &Shape) -> f64 {
    assert_eq!(
        x.num_landmarks(),
        y.num_landmarks(),
        "shapes must have the same number of landmarks"
    );
    x.iter()
        .zip(y.iter())
        .map(|(p, q)| {
            let d = *p - *q;
            d.x * d.x + d.y * d.y
        })
        .sum()
}
