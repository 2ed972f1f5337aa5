use serde::{Deserialize, Serialize};

use crate::types::{Point, Shape, RELATIVE_EPSILON};

/// A 2x2 matrix stored row-major.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Matrix2 {
    pub m: [[f64; 2]; 2],
}

impl Matrix2 {
    pub const fn new(m00: f64, m01: f64, m10: f64, m11: f64) -> Self {
        Self {
            m: [[m00, m01], [m10, m11]],
        }
    }

    pub const fn identity() -> Self {
        Self::new(1.0, 0.0, 0.0, 1.0)
    }

    /// Combined uniform scale and counter-clockwise rotation by `theta`.
    pub fn scale_rotation(scale: f64, theta: f64) -> Self {
        let (sin, cos) = theta.sin_cos();
        Self::new(scale * cos, -scale * sin, scale * sin, scale * cos)
    }

    pub fn determinant(&self) -> f64 {
        self.m[0][0] * self.m[1][1] - self.m[0][1] * self.m[1][0]
    }

    pub fn mul_point(&self, p: Point) -> Point {
        Point::new(
            self.m[0][0] * p.x + self.m[0][1] * p.y,
            self.m[1][0] * p.x + self.m[1][1] * p.y,
        )
    }

    /// `None` when the matrix collapses the plane, judged relative to the
    /// size of its entries so tiny scales stay invertible.
    pub fn inverse(&self) -> Option<Self> {
        let det = self.determinant();
        let largest = self.m.iter().flatten().fold(0.0_f64, |acc, v| acc.max(v.abs()));
        if !(det.abs() > RELATIVE_EPSILON * largest * largest) || !det.is_finite() {
            return None;
        }
        let inv = 1.0 / det;
        Some(Self::new(
            self.m[1][1] * inv,
            -self.m[0][1] * inv,
            -self.m[1][0] * inv,
            self.m[0][0] * inv,
        ))
    }

    pub fn is_finite(&self) -> bool {
        self.m.iter().flatten().all(|v| v.is_finite())
    }
}

impl std::ops::Mul for Matrix2 {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self::Output {
        let a = &self.m;
        let b = &rhs.m;
        Self::new(
            a[0][0] * b[0][0] + a[0][1] * b[1][0],
            a[0][0] * b[0][1] + a[0][1] * b[1][1],
            a[1][0] * b[0][0] + a[1][1] * b[1][0],
            a[1][0] * b[0][1] + a[1][1] * b[1][1],
        )
    }
}

/// Whether [`SimilarityTransform::apply`] adds the translation after the
/// linear part.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Translation {
    Apply,
    Skip,
}

/// Uniform scale and rotation (`scale_rotation`) followed by a translation.
///
/// Transforms built by this crate keep `scale_rotation` in the form
/// `[a, -b; b, a]`, where `a = s·cosθ` and `b = s·sinθ`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SimilarityTransform {
    pub scale_rotation: Matrix2,
    pub translation: Point,
}

impl SimilarityTransform {
    pub const fn new(scale_rotation: Matrix2, translation: Point) -> Self {
        Self {
            scale_rotation,
            translation,
        }
    }

    pub const fn identity() -> Self {
        Self::new(Matrix2::identity(), Point::zero())
    }

    /// Scale and rotation about the origin, with no translation.
    pub fn from_scale_rotation(scale: f64, theta: f64) -> Self {
        Self::new(Matrix2::scale_rotation(scale, theta), Point::zero())
    }

    /// Uniform scale factor encoded by the linear part.
    pub fn scale(&self) -> f64 {
        let m = &self.scale_rotation.m;
        m[0][0].hypot(m[1][0])
    }

    /// Counter-clockwise rotation angle in radians, in `(-π, π]`.
    pub fn rotation(&self) -> f64 {
        let m = &self.scale_rotation.m;
        m[1][0].atan2(m[0][0])
    }

    /// Map a single point: `M·p + t`.
    pub fn apply_to_point(&self, p: Point) -> Point {
        self.scale_rotation.mul_point(p) + self.translation
    }

    /// Transform every landmark of `shape` in place.
    ///
    /// The linear part is always applied before the translation. With
    /// [`Translation::Skip`] the shape is only scaled and rotated about the
    /// origin.
    pub fn apply(&self, shape: &mut Shape, translation: Translation) {
        for p in &mut shape.points {
            *p = self.scale_rotation.mul_point(*p);
            if translation == Translation::Apply {
                *p += self.translation;
            }
        }
    }

    /// Copying variant of [`apply`](Self::apply) with the translation included.
    pub fn transformed(&self, shape: &Shape) -> Shape {
        shape.iter().map(|p| self.apply_to_point(*p)).collect()
    }

    /// The transform that applies `inner` first and then `self`.
    pub fn compose(&self, inner: &SimilarityTransform) -> SimilarityTransform {
        SimilarityTransform::new(
            self.scale_rotation * inner.scale_rotation,
            self.scale_rotation.mul_point(inner.translation) + self.translation,
        )
    }

    pub fn inverse(&self) -> Option<SimilarityTransform> {
        let inv = self.scale_rotation.inverse()?;
        let translation = inv.mul_point(self.translation) * -1.0;
        Some(SimilarityTransform::new(inv, translation))
    }

    pub fn is_finite(&self) -> bool {
        self.scale_rotation.is_finite() && self.translation.is_finite()
    }
}

impl Default for SimilarityTransform {
    fn default() -> Self {
        Self::identity()
    }
}
