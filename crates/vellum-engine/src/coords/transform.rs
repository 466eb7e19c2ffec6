use super::{Rect, Vec2};

/// 2D affine transform.
///
/// Maps `(x, y)` to `(a*x + c*y + e, b*x + d*y + f)`, with the coefficients
/// stored as `[a, b, c, d, e, f]`.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Transform {
    pub m: [f32; 6],
}

impl Transform {
    pub const IDENTITY: Transform = Transform { m: [1.0, 0.0, 0.0, 1.0, 0.0, 0.0] };

    #[inline]
    pub const fn new(m: [f32; 6]) -> Self {
        Self { m }
    }

    #[inline]
    pub const fn translate(tx: f32, ty: f32) -> Self {
        Self { m: [1.0, 0.0, 0.0, 1.0, tx, ty] }
    }

    #[inline]
    pub const fn scale(sx: f32, sy: f32) -> Self {
        Self { m: [sx, 0.0, 0.0, sy, 0.0, 0.0] }
    }

    /// Rotation by `degrees`, clockwise on screen (+Y down).
    #[inline]
    pub fn rotate(degrees: f32) -> Self {
        let (s, c) = degrees.to_radians().sin_cos();
        Self { m: [c, s, -s, c, 0.0, 0.0] }
    }

    /// Returns the transform that applies `self` first and `next` afterwards.
    pub fn then(self, next: Transform) -> Transform {
        let [a0, b0, c0, d0, e0, f0] = self.m;
        let [a1, b1, c1, d1, e1, f1] = next.m;
        Transform {
            m: [
                a1 * a0 + c1 * b0,
                b1 * a0 + d1 * b0,
                a1 * c0 + c1 * d0,
                b1 * c0 + d1 * d0,
                a1 * e0 + c1 * f0 + e1,
                b1 * e0 + d1 * f0 + f1,
            ],
        }
    }

    #[inline]
    pub fn apply(self, p: Vec2) -> Vec2 {
        let [a, b, c, d, e, f] = self.m;
        Vec2::new(a * p.x + c * p.y + e, b * p.x + d * p.y + f)
    }

    /// Inverse transform, `None` when the transform collapses area.
    pub fn invert(self) -> Option<Transform> {
        let [a, b, c, d, e, f] = self.m;
        let det = a * d - b * c;
        if det.abs() <= f32::EPSILON * f32::EPSILON || !det.is_finite() {
            return None;
        }

        let inv = 1.0 / det;
        Some(Transform {
            m: [
                d * inv,
                -b * inv,
                -c * inv,
                a * inv,
                (c * f - d * e) * inv,
                (b * e - a * f) * inv,
            ],
        })
    }

    #[inline]
    pub fn is_identity(self) -> bool {
        self == Self::IDENTITY
    }

    /// Axis-aligned bounds of `rect` after transformation.
    pub fn transform_bounds(self, rect: Rect) -> Rect {
        let min = rect.min();
        let max = rect.max();
        let corners = [
            self.apply(min),
            self.apply(Vec2::new(max.x, min.y)),
            self.apply(max),
            self.apply(Vec2::new(min.x, max.y)),
        ];

        let lo = corners.iter().fold(corners[0], |acc, &p| acc.min(p));
        let hi = corners.iter().fold(corners[0], |acc, &p| acc.max(p));
        Rect::from_points(lo, hi)
    }

    /// Uniform scale approximation: the square root of the absolute determinant.
    #[inline]
    pub fn scale_factor(self) -> f32 {
        let [a, b, c, d, _, _] = self.m;
        (a * d - b * c).abs().sqrt()
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}
