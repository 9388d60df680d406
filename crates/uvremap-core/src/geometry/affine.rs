//! Affine maps in degrees, on top of [`kurbo::Affine`].

use std::ops::Mul;

use kurbo::{Affine, Point};

/// A 2D affine map: rotation, scale, skew and translation.
///
/// The coefficients `[a, b, c, d, e, f]` stand for
/// ```text
/// | a  c  e |
/// | b  d  f |
/// | 0  0  1 |
/// ```
/// which is the layout of the vector-drawing `matrix(a, b, c, d, e, f)` token.
/// Composition is matrix multiplication and is not commutative:
/// `(p * q).transform_point(x) == p.transform_point(q.transform_point(x))`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AffineMatrix(pub Affine);

impl AffineMatrix {
    pub const IDENTITY: AffineMatrix = AffineMatrix(Affine::IDENTITY);

    /// Build from the six coefficients of a `matrix(a, b, c, d, e, f)` token.
    pub fn new(a: f64, b: f64, c: f64, d: f64, e: f64, f: f64) -> Self {
        Self(Affine::new([a, b, c, d, e, f]))
    }

    pub fn translate(tx: f64, ty: f64) -> Self {
        Self(Affine::translate((tx, ty)))
    }

    pub fn scale(sx: f64, sy: f64) -> Self {
        Self(Affine::scale_non_uniform(sx, sy))
    }

    /// Rotation about the origin by `angle_degrees`.
    pub fn rotate(angle_degrees: f64) -> Self {
        Self(Affine::rotate(angle_degrees.to_radians()))
    }

    /// Rotation about `(cx, cy)`, same as
    /// `translate(cx, cy) * rotate(angle) * translate(-cx, -cy)`.
    pub fn rotate_about(angle_degrees: f64, cx: f64, cy: f64) -> Self {
        Self(Affine::rotate_about(
            angle_degrees.to_radians(),
            Point::new(cx, cy),
        ))
    }

    /// Horizontal skew by `angle_degrees`.
    pub fn skew_x(angle_degrees: f64) -> Self {
        Self(Affine::skew(angle_degrees.to_radians().tan(), 0.0))
    }

    /// Vertical skew by `angle_degrees`.
    pub fn skew_y(angle_degrees: f64) -> Self {
        Self(Affine::skew(0.0, angle_degrees.to_radians().tan()))
    }

    /// `[a, b, c, d, e, f]`
    pub fn coeffs(&self) -> [f64; 6] {
        self.0.as_coeffs()
    }

    /// The inverse map. Singular maps give non-finite coefficients.
    pub fn inverse(&self) -> Self {
        Self(self.0.inverse())
    }

    /// Map a point (translation applies).
    pub fn transform_point(&self, (x, y): (f64, f64)) -> (f64, f64) {
        let p = self.0 * Point::new(x, y);
        (p.x, p.y)
    }

    /// Map a direction (translation ignored).
    pub fn transform_vector(&self, (x, y): (f64, f64)) -> (f64, f64) {
        let [a, b, c, d, _, _] = self.coeffs();
        (a * x + c * y, b * x + d * y)
    }

    /// Lengths of the first two columns: how much the map stretches the
    /// x and y axes.
    pub fn axis_scales(&self) -> (f64, f64) {
        let [a, b, c, d, _, _] = self.coeffs();
        (a.hypot(b), c.hypot(d))
    }

    /// Coefficient-wise comparison within `epsilon`.
    pub fn approx_eq(&self, other: &AffineMatrix, epsilon: f64) -> bool {
        self.coeffs()
            .iter()
            .zip(other.coeffs().iter())
            .all(|(a, b)| (a - b).abs() <= epsilon)
    }
}

impl Default for AffineMatrix {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl From<Affine> for AffineMatrix {
    fn from(affine: Affine) -> Self {
        Self(affine)
    }
}

impl Mul for AffineMatrix {
    type Output = AffineMatrix;

    fn mul(self, rhs: AffineMatrix) -> AffineMatrix {
        Self(self.0 * rhs.0)
    }
}
