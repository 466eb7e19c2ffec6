use super::Vec2;

/// Axis-aligned rectangle (top-left origin, +Y down).
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct Rect {
    pub origin: Vec2,
    pub size: Vec2,
}

impl Rect {
    #[inline]
    pub const fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self {
            origin: Vec2::new(x, y),
            size: Vec2::new(w, h),
        }
    }

    /// Smallest rectangle containing both corner points, in any order.
    #[inline]
    pub fn from_points(a: Vec2, b: Vec2) -> Self {
        let min = a.min(b);
        let max = a.max(b);
        Self::new(min.x, min.y, max.x - min.x, max.y - min.y)
    }

    #[inline]
    pub fn min(self) -> Vec2 {
        self.origin
    }

    #[inline]
    pub fn max(self) -> Vec2 {
        self.origin + self.size
    }

    #[inline]
    pub fn is_empty(self) -> bool {
        self.size.x <= 0.0 || self.size.y <= 0.0
    }

    #[inline]
    pub fn is_finite(self) -> bool {
        self.origin.is_finite() && self.size.is_finite()
    }

    /// Normalizes the rectangle so width/height are non-negative.
    #[inline]
    pub fn normalized(self) -> Self {
        Rect::from_points(self.min(), self.max())
    }

    /// Grows the rectangle by `d` on every side.
    #[inline]
    pub fn inflate(self, d: f32) -> Self {
        let r = self.normalized();
        Rect::new(r.origin.x - d, r.origin.y - d, r.size.x + 2.0 * d, r.size.y + 2.0 * d)
    }

    /// Half-open containment: [min, max).
    #[inline]
    pub fn contains(self, p: Vec2) -> bool {
        let r = self.normalized();
        let max = r.max();
        p.x >= r.origin.x && p.y >= r.origin.y && p.x < max.x && p.y < max.y
    }

    /// Overlapping area of both rectangles, `None` when they only touch or are disjoint.
    #[inline]
    pub fn intersect(self, other: Rect) -> Option<Rect> {
        let a = self.normalized();
        let b = other.normalized();

        let min = a.min().max(b.min());
        let max = a.max().min(b.max());

        if max.x <= min.x || max.y <= min.y {
            None
        } else {
            Some(Rect::from_points(min, max))
        }
    }

    /// Smallest rectangle covering both inputs. Empty inputs are ignored.
    #[inline]
    pub fn union(self, other: Rect) -> Rect {
        match (self.is_empty(), other.is_empty()) {
            (true, _) => other,
            (_, true) => self,
            _ => {
                let a = self.normalized();
                let b = other.normalized();
                Rect::from_points(a.min().min(b.min()), a.max().max(b.max()))
            }
        }
    }
}
