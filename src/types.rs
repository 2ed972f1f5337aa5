use serde::{Deserialize, Serialize};

/// Relative tolerance below which a length counts as zero when compared
/// against the extent of the shape it was measured on.
pub(crate) const RELATIVE_EPSILON: f64 = 1e-10;

/// A 2D point with floating-point coordinates.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub const fn zero() -> Self {
        Self { x: 0.0, y: 0.0 }
    }

    /// Euclidean length of the point seen as a vector from the origin.
    pub fn norm(&self) -> f64 {
        self.x.hypot(self.y)
    }

    pub fn distance(&self, other: &Point) -> f64 {
        (*self - *other).norm()
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl std::ops::Add for Point {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self {
            x: self.x + rhs.x,
            y: self.y + rhs.y,
        }
    }
}

impl std::ops::AddAssign for Point {
    fn add_assign(&mut self, rhs: Self) {
        self.x += rhs.x;
        self.y += rhs.y;
    }
}

impl std::ops::Sub for Point {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        Self {
            x: self.x - rhs.x,
            y: self.y - rhs.y,
        }
    }
}

impl std::ops::SubAssign for Point {
    fn sub_assign(&mut self, rhs: Self) {
        self.x -= rhs.x;
        self.y -= rhs.y;
    }
}

impl std::ops::Mul<f64> for Point {
    type Output = Self;

    fn mul(self, rhs: f64) -> Self::Output {
        Self {
            x: self.x * rhs,
            y: self.y * rhs,
        }
    }
}

/// An axis-aligned rectangle defined by its top-left corner, width, and height.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl BoundingBox {
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Express an image point in this window's unit frame, where the
    /// window spans `[0, 1]` on both axes. Points outside the window map
    /// outside that range.
    pub fn to_unit(&self, p: Point) -> Point {
        Point::new((p.x - self.x) / self.width, (p.y - self.y) / self.height)
    }

    /// Inverse of [`to_unit`](Self::to_unit).
    pub fn from_unit(&self, p: Point) -> Point {
        Point::new(self.x + p.x * self.width, self.y + p.y * self.height)
    }
}

/// A facial shape represented as an ordered collection of landmark points.
///
/// Index `i` denotes the same landmark across every shape of a data set, so
/// all arithmetic here is elementwise and requires equal landmark counts.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Shape {
    pub points: Vec<Point>,
}

impl Shape {
    pub fn new(points: Vec<Point>) -> Self {
        Self { points }
    }

    pub fn num_landmarks(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Create a zeroed shape with n landmarks.
    pub fn zeros(n: usize) -> Self {
        Self {
            points: vec![Point::zero(); n],
        }
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Point> {
        self.points.iter()
    }

    /// Elementwise `self[i] - other[i]`.
    ///
    /// # Panics
    ///
    /// Panics if the shapes have different landmark counts.
    pub fn difference(&self, other: &Shape) -> Shape {
        assert_landmark_counts(self, other);
        self.points
            .iter()
            .zip(&other.points)
            .map(|(a, b)| *a - *b)
            .collect()
    }

    /// Elementwise `self[i] + offset[i]`; used to apply a learned residual
    /// onto a base shape.
    ///
    /// # Panics
    ///
    /// Panics if the shapes have different landmark counts.
    pub fn addition(&self, offset: &Shape) -> Shape {
        assert_landmark_counts(self, offset);
        self.points
            .iter()
            .zip(&offset.points)
            .map(|(a, b)| *a + *b)
            .collect()
    }

    /// Add another shape's deltas to this shape.
    pub fn add_delta(&mut self, delta: &Shape) {
        assert_landmark_counts(self, delta);
        for (p, d) in self.points.iter_mut().zip(delta.points.iter()) {
            *p += *d;
        }
    }

    /// Shift every landmark by the same offset.
    pub fn translate(&mut self, offset: Point) {
        for p in &mut self.points {
            *p += offset;
        }
    }

    /// Mean position of all landmarks. The centroid of an empty shape is the
    /// origin.
    pub fn centroid(&self) -> Point {
        if self.points.is_empty() {
            return Point::zero();
        }
        let sum = self
            .points
            .iter()
            .fold(Point::zero(), |acc, p| acc + *p);
        sum * (1.0 / self.points.len() as f64)
    }

    /// Pointwise average of a set of shapes, or `None` for an empty set.
    ///
    /// # Panics
    ///
    /// Panics if the shapes have different landmark counts.
    pub fn mean_of(shapes: &[Shape]) -> Option<Shape> {
        let (first, rest) = shapes.split_first()?;
        let mut mean = first.clone();
        for shape in rest {
            mean.add_delta(shape);
        }
        let inv = 1.0 / shapes.len() as f64;
        for p in &mut mean.points {
            *p = *p * inv;
        }
        Some(mean)
    }

    /// Largest distance between corresponding landmarks of two shapes.
    pub fn max_displacement(&self, other: &Shape) -> f64 {
        assert_landmark_counts(self, other);
        self.points
            .iter()
            .zip(&other.points)
            .map(|(a, b)| a.distance(b))
            .fold(0.0, f64::max)
    }

    pub fn is_finite(&self) -> bool {
        self.points.iter().all(Point::is_finite)
    }

    /// Root-mean-square distance of the landmarks from their centroid; the
    /// natural length scale of a shape regardless of where it sits.
    pub fn rms_radius(&self) -> f64 {
        if self.points.is_empty() {
            return 0.0;
        }
        let centroid = self.centroid();
        let sum_sq: f64 = self
            .points
            .iter()
            .map(|p| {
                let d = *p - centroid;
                d.x * d.x + d.y * d.y
            })
            .sum();
        (sum_sq / self.points.len() as f64).sqrt()
    }
}

fn assert_landmark_counts(a: &Shape, b: &Shape) {
    assert_eq!(
        a.num_landmarks(),
        b.num_landmarks(),
        "shapes must have the same number of landmarks"
    );
}

impl FromIterator<Point> for Shape {
    fn from_iter<I: IntoIterator<Item = Point>>(iter: I) -> Self {
        Self {
            points: iter.into_iter().collect(),
        }
    }
}

impl From<Vec<Point>> for Shape {
    fn from(points: Vec<Point>) -> Self {
        Self { points }
    }
}

impl<'a> IntoIterator for &'a Shape {
    type Item = &'a Point;
    type IntoIter = std::slice::Iter<'a, Point>;

    fn into_iter(self) -> Self::IntoIter {
        self.points.iter()
    }
}

impl std::ops::Sub for &Shape {
    type Output = Shape;

    fn sub(self, rhs: Self) -> Self::Output {
        self.difference(rhs)
    }
}

impl std::ops::Add for &Shape {
    type Output = Shape;

    fn add(self, rhs: Self) -> Self::Output {
        self.addition(rhs)
    }
}

impl std::ops::Index<usize> for Shape {
    type Output = Point;

    fn index(&self, idx: usize) -> &Self::Output {
        &self.points[idx]
    }
}

impl std::ops::IndexMut<usize> for Shape {
    fn index_mut(&mut self, idx: usize) -> &mut Self::Output {
        &mut self.points[idx]
    }
}
