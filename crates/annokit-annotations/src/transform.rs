//! 2-D affine transform helper.
//!
//! Persisted transforms use the `[a, b, c, d, tx, ty]` convention:
//! `x' = a*x + c*y + tx`, `y' = b*x + d*y + ty`.

use annokit_core::AnnotationError;
use nalgebra::{Matrix3, Matrix4};
use serde::{Deserialize, Serialize};

use crate::model::Point;

/// Affine transform matrix stored as its six free coefficients.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f64; 6]", into = "[f64; 6]")]
pub struct TransformMatrix {
    pub a: f64,
    pub b: f64,
    pub c: f64,
    pub d: f64,
    pub tx: f64,
    pub ty: f64,
}

impl Default for TransformMatrix {
    fn default() -> Self {
        Self::identity()
    }
}

impl TransformMatrix {
    pub fn new(a: f64, b: f64, c: f64, d: f64, tx: f64, ty: f64) -> Self {
        Self { a, b, c, d, tx, ty }
    }

    pub fn identity() -> Self {
        Self::new(1.0, 0.0, 0.0, 1.0, 0.0, 0.0)
    }

    pub fn translation(tx: f64, ty: f64) -> Self {
        Self::new(1.0, 0.0, 0.0, 1.0, tx, ty)
    }

    pub fn scale(sx: f64, sy: f64) -> Self {
        Self::new(sx, 0.0, 0.0, sy, 0.0, 0.0)
    }

    /// Counter-clockwise rotation by `degrees` about the origin.
    pub fn rotation(degrees: f64) -> Self {
        let (sin, cos) = degrees.to_radians().sin_cos();
        Self::new(cos, sin, -sin, cos, 0.0, 0.0)
    }

    /// Reads a persisted coefficient list. Anything but six finite numbers
    /// is rejected.
    pub fn from_slice(values: &[f64]) -> Result<Self, AnnotationError> {
        match values {
            [a, b, c, d, tx, ty] if values.iter().all(|v| v.is_finite()) => {
                Ok(Self::new(*a, *b, *c, *d, *tx, *ty))
            }
            _ => Err(AnnotationError::invalid_operand(
                "transform",
                format!("{:?}", values),
            )),
        }
    }

    pub fn to_array(&self) -> [f64; 6] {
        [self.a, self.b, self.c, self.d, self.tx, self.ty]
    }

    pub fn is_identity(&self) -> bool {
        *self == Self::identity()
    }

    pub fn to_matrix3(&self) -> Matrix3<f64> {
        Matrix3::new(
            self.a, self.c, self.tx, //
            self.b, self.d, self.ty, //
            0.0, 0.0, 1.0,
        )
    }

    pub fn from_matrix3(m: &Matrix3<f64>) -> Self {
        Self::new(m[(0, 0)], m[(1, 0)], m[(0, 1)], m[(1, 1)], m[(0, 2)], m[(1, 2)])
    }

    /// Homogeneous 3-D form used by the csgrs sketch transform (z untouched).
    pub fn to_matrix4(&self) -> Matrix4<f64> {
        Matrix4::new(
            self.a, self.c, 0.0, self.tx, //
            self.b, self.d, 0.0, self.ty, //
            0.0, 0.0, 1.0, 0.0, //
            0.0, 0.0, 0.0, 1.0,
        )
    }

    /// `self` followed by `next`.
    pub fn then(&self, next: &TransformMatrix) -> Self {
        Self::from_matrix3(&(next.to_matrix3() * self.to_matrix3()))
    }

    /// Inverse, if the linear part is not singular.
    pub fn inverse(&self) -> Option<Self> {
        let det = self.a * self.d - self.b * self.c;
        if det.abs() < f64::EPSILON {
            return None;
        }
        self.to_matrix3()
            .try_inverse()
            .map(|m| Self::from_matrix3(&m))
    }

    pub fn apply(&self, point: Point) -> Point {
        Point::new(
            self.a * point.x + self.c * point.y + self.tx,
            self.b * point.x + self.d * point.y + self.ty,
        )
    }

    /// Applies only the linear part, for handles and deltas.
    pub fn apply_vector(&self, vector: Point) -> Point {
        Point::new(
            self.a * vector.x + self.c * vector.y,
            self.b * vector.x + self.d * vector.y,
        )
    }

    /// The linear part without translation.
    pub fn linear(&self) -> Self {
        Self::new(self.a, self.b, self.c, self.d, 0.0, 0.0)
    }
}

impl From<[f64; 6]> for TransformMatrix {
    fn from(v: [f64; 6]) -> Self {
        Self::new(v[0], v[1], v[2], v[3], v[4], v[5])
    }
}

impl From<TransformMatrix> for [f64; 6] {
    fn from(m: TransformMatrix) -> Self {
        m.to_array()
    }
}
