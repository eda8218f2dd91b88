//! Affine transform math for 2D scene coordinates.
//!
//! Matrix layout (column vectors, row-major storage):
//!
//! ```text
//! | a  b  tx |   | x |
//! | c  d  ty | * | y |
//! | 0  0  1  |   | 1 |
//! ```
//!
//! so a point maps as `x' = a*x + b*y + tx`, `y' = c*x + d*y + ty`.

use serde::{Deserialize, Serialize};

use crate::error::{EngineError, Result};

/// Determinants with absolute value below this are treated as degenerate.
pub const EPSILON: f64 = 1e-9;

/// A 2D point in either local or scene coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    /// Creates a new point.
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another point.
    pub fn distance_to(self, other: Point) -> f64 {
        ((self.x - other.x).powi(2) + (self.y - other.y).powi(2)).sqrt()
    }

    /// Reflects `other` through this point: `2*self - other`.
    ///
    /// Used by the pen tool to derive the symmetric partner of a dragged
    /// bezier handle.
    pub fn mirror(self, other: Point) -> Point {
        Point::new(2.0 * self.x - other.x, 2.0 * self.y - other.y)
    }
}

/// 2D affine transformation matrix.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    pub a: f64,
    pub b: f64,
    pub c: f64,
    pub d: f64,
    pub tx: f64,
    pub ty: f64,
}

impl Transform {
    /// The identity transform.
    pub fn identity() -> Self {
        Self {
            a: 1.0,
            b: 0.0,
            c: 0.0,
            d: 1.0,
            tx: 0.0,
            ty: 0.0,
        }
    }

    /// A pure translation.
    pub fn translate(tx: f64, ty: f64) -> Self {
        Self {
            a: 1.0,
            b: 0.0,
            c: 0.0,
            d: 1.0,
            tx,
            ty,
        }
    }

    /// A scale about the origin.
    pub fn scale(sx: f64, sy: f64) -> Self {
        Self {
            a: sx,
            b: 0.0,
            c: 0.0,
            d: sy,
            tx: 0.0,
            ty: 0.0,
        }
    }

    /// A rotation about the origin (angle in radians).
    ///
    /// With the canvas convention of Y pointing down, a positive angle
    /// appears clockwise on screen.
    pub fn rotate(angle: f64) -> Self {
        let cos = angle.cos();
        let sin = angle.sin();
        Self {
            a: cos,
            b: -sin,
            c: sin,
            d: cos,
            tx: 0.0,
            ty: 0.0,
        }
    }

    /// Composes two transforms: the result applies `inner` first, then
    /// `outer`.
    ///
    /// This is the single composition convention used everywhere in the
    /// engine: `compose(outer, inner).apply(p) == outer.apply(inner.apply(p))`.
    /// Matrix multiplication is not commutative; call sites must not assume
    /// otherwise.
    pub fn compose(outer: &Transform, inner: &Transform) -> Transform {
        Transform {
            a: outer.a * inner.a + outer.b * inner.c,
            b: outer.a * inner.b + outer.b * inner.d,
            c: outer.c * inner.a + outer.d * inner.c,
            d: outer.c * inner.b + outer.d * inner.d,
            tx: outer.a * inner.tx + outer.b * inner.ty + outer.tx,
            ty: outer.c * inner.tx + outer.d * inner.ty + outer.ty,
        }
    }

    /// Applies `inner` first, then `self`. Method form of [`Transform::compose`].
    pub fn then(&self, inner: &Transform) -> Transform {
        Transform::compose(self, inner)
    }

    /// The determinant `a*d - b*c`.
    pub fn determinant(&self) -> f64 {
        self.a * self.d - self.b * self.c
    }

    /// Computes the inverse transform.
    ///
    /// Fails with [`EngineError::DegenerateTransform`] when the determinant
    /// is within [`EPSILON`] of zero.
    pub fn invert(&self) -> Result<Transform> {
        let det = self.determinant();
        if det.abs() < EPSILON {
            return Err(EngineError::DegenerateTransform { determinant: det });
        }
        let inv_det = 1.0 / det;
        Ok(Transform {
            a: self.d * inv_det,
            b: -self.b * inv_det,
            c: -self.c * inv_det,
            d: self.a * inv_det,
            tx: (self.b * self.ty - self.d * self.tx) * inv_det,
            ty: (self.c * self.tx - self.a * self.ty) * inv_det,
        })
    }

    /// Maps a point through this transform.
    pub fn apply(&self, p: Point) -> Point {
        Point::new(
            self.a * p.x + self.b * p.y + self.tx,
            self.c * p.x + self.d * p.y + self.ty,
        )
    }

    /// Maps a point through the inverse of this transform.
    pub fn apply_inverse(&self, p: Point) -> Result<Point> {
        Ok(self.invert()?.apply(p))
    }

    /// Builds `translate(pivot) ∘ core ∘ translate(-pivot)`: the given
    /// transform performed about an arbitrary fixed point.
    ///
    /// The pivot itself is a fixed point of the result.
    pub fn around_pivot(pivot: Point, core: &Transform) -> Transform {
        let to_origin = Transform::translate(-pivot.x, -pivot.y);
        let from_origin = Transform::translate(pivot.x, pivot.y);
        Transform::compose(&from_origin, &Transform::compose(core, &to_origin))
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::identity()
    }
}
