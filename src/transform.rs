//! 2D transformation matrices for placing Form XObjects on a sheet.

use crate::units::*;

/// A transformation matrix for positioning Form XObjects on a page.
///
/// Uses the standard PDF transformation matrix where (0,0) is at the bottom-left.
/// The matrix is represented as [a, b, c, d, e, f] corresponding to:
/// ```text
/// | a  b  0 |
/// | c  d  0 |
/// | e  f  1 |
/// ```
///
/// Transforms are chained with [`then`](Transform::then) or the builder methods
/// [`with_translate`](Transform::with_translate) and [`with_scale`](Transform::with_scale),
/// and apply in the order they are chained.
///
/// ```
/// use liedblatt::{Transform, Pt};
///
/// // shrink a logical page to 70%, then move it into the right half of the sheet
/// let transform = Transform::scale(0.7, 0.7)
///     .with_translate(Pt(421.0), Pt(0.0));
/// assert_eq!(transform.apply(Pt(0.0), Pt(0.0)), (Pt(421.0), Pt(0.0)));
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub a: f32,
    pub b: f32,
    pub c: f32,
    pub d: f32,
    pub e: f32,
    pub f: f32,
}

impl Default for Transform {
    fn default() -> Self {
        Self::identity()
    }
}

impl Transform {
    pub fn identity() -> Self {
        Transform {
            a: 1.0,
            b: 0.0,
            c: 0.0,
            d: 1.0,
            e: 0.0,
            f: 0.0,
        }
    }

    pub fn translate(x: Pt, y: Pt) -> Self {
        Transform {
            e: *x,
            f: *y,
            ..Transform::identity()
        }
    }

    pub fn scale(sx: f32, sy: f32) -> Self {
        Transform {
            a: sx,
            d: sy,
            ..Transform::identity()
        }
    }

    /// Combine this transform with another (self * other)
    pub fn then(self, other: Transform) -> Self {
        Transform {
            a: self.a * other.a + self.b * other.c,
            b: self.a * other.b + self.b * other.d,
            c: self.c * other.a + self.d * other.c,
            d: self.c * other.b + self.d * other.d,
            e: self.e * other.a + self.f * other.c + other.e,
            f: self.e * other.b + self.f * other.d + other.f,
        }
    }

    pub fn with_translate(self, x: Pt, y: Pt) -> Self {
        self.then(Transform::translate(x, y))
    }

    pub fn with_scale(self, sx: f32, sy: f32) -> Self {
        self.then(Transform::scale(sx, sy))
    }

    /// Map a point through the transform
    pub fn apply(&self, x: Pt, y: Pt) -> (Pt, Pt) {
        (
            Pt(self.a * *x + self.c * *y + self.e),
            Pt(self.b * *x + self.d * *y + self.f),
        )
    }

    /// The six operands of the `cm` operator
    pub fn to_array(&self) -> [f32; 6] {
        [self.a, self.b, self.c, self.d, self.e, self.f]
    }
}
