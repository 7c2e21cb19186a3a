//! Small 2D vector and affine transform helpers shared across the engine.

pub type Point = [f32; 2];

/// Vectors shorter than this are treated as zero-length when normalizing.
pub const EPSILON: f32 = 1e-6;

#[inline]
pub fn sub(a: Point, b: Point) -> Point {
    [a[0] - b[0], a[1] - b[1]]
}

#[inline]
pub fn length(v: Point) -> f32 {
    (v[0] * v[0] + v[1] * v[1]).sqrt()
}

#[inline]
pub fn distance(a: Point, b: Point) -> f32 {
    length(sub(a, b))
}

/// Unit vector in the direction of `v`, or `None` if `v` is (nearly) zero.
#[inline]
pub fn normalized(v: Point) -> Option<Point> {
    let len = length(v);
    if len <= EPSILON {
        return None;
    }
    Some([v[0] / len, v[1] / len])
}

/// Counter-clockwise perpendicular of a unit vector.
#[inline]
pub fn perp(v: Point) -> Point {
    [-v[1], v[0]]
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Transform2D {
    // Affine 2D: [a, b, c, d, e, f] for matrix [[a c e],[b d f],[0 0 1]]
    pub m: [f32; 6],
}

impl Transform2D {
    pub fn identity() -> Self {
        Self {
            m: [1.0, 0.0, 0.0, 1.0, 0.0, 0.0],
        }
    }

    pub fn translate(tx: f32, ty: f32) -> Self {
        Self {
            m: [1.0, 0.0, 0.0, 1.0, tx, ty],
        }
    }

    pub fn scale(sx: f32, sy: f32) -> Self {
        Self {
            m: [sx, 0.0, 0.0, sy, 0.0, 0.0],
        }
    }

    /// Compose two transforms: self ∘ other (apply `other`, then `self`).
    pub fn concat(self, other: Self) -> Self {
        let [a1, b1, c1, d1, e1, f1] = self.m;
        let [a2, b2, c2, d2, e2, f2] = other.m;
        Self {
            m: [
                a1 * a2 + c1 * b2,
                b1 * a2 + d1 * b2,
                a1 * c2 + c1 * d2,
                b1 * c2 + d1 * d2,
                a1 * e2 + c1 * f2 + e1,
                b1 * e2 + d1 * f2 + f1,
            ],
        }
    }

    /// Map a point through this transform.
    pub fn apply(&self, p: Point) -> Point {
        let [a, b, c, d, e, f] = self.m;
        [a * p[0] + c * p[1] + e, b * p[0] + d * p[1] + f]
    }

    /// Inverse transform, or `None` when the linear part is singular.
    pub fn invert(&self) -> Option<Self> {
        let [a, b, c, d, e, f] = self.m;
        let det = a * d - b * c;
        if det.abs() <= EPSILON {
            return None;
        }
        let inv_det = 1.0 / det;
        let ia = d * inv_det;
        let ib = -b * inv_det;
        let ic = -c * inv_det;
        let id = a * inv_det;
        Some(Self {
            m: [
                ia,
                ib,
                ic,
                id,
                -(ia * e + ic * f),
                -(ib * e + id * f),
            ],
        })
    }
}
