//! Premultiplied color used by shape fills and render targets.

/// Linear premultiplied RGBA color.
///
/// Invariant:
/// - `rgb` components are already multiplied by `a`.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct Color {
    pub r: f32, // premultiplied
    pub g: f32, // premultiplied
    pub b: f32, // premultiplied
    pub a: f32,
}

impl Color {
    pub const TRANSPARENT: Color = Color::from_premul(0.0, 0.0, 0.0, 0.0);
    pub const BLACK: Color = Color::from_premul(0.0, 0.0, 0.0, 1.0);
    pub const WHITE: Color = Color::from_premul(1.0, 1.0, 1.0, 1.0);

    /// Creates a premultiplied color from premultiplied components.
    #[inline]
    pub const fn from_premul(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Creates a premultiplied color from straight alpha components in `[0, 1]`.
    #[inline]
    pub fn from_straight(r: f32, g: f32, b: f32, a: f32) -> Self {
        let a = a.clamp(0.0, 1.0);
        Self {
            r: r.clamp(0.0, 1.0) * a,
            g: g.clamp(0.0, 1.0) * a,
            b: b.clamp(0.0, 1.0) * a,
            a,
        }
    }

    /// Creates a premultiplied color from straight 8-bit channels, e.g. a hex literal.
    #[inline]
    pub fn from_srgb_u8(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self::from_straight(
            r as f32 / 255.0,
            g as f32 / 255.0,
            b as f32 / 255.0,
            a as f32 / 255.0,
        )
    }

    /// Scales every channel by an 8-bit opacity. Stays premultiplied.
    #[inline]
    pub fn with_opacity(self, opacity: u8) -> Self {
        let k = opacity as f32 / 255.0;
        Self::from_premul(self.r * k, self.g * k, self.b * k, self.a * k)
    }

    #[inline]
    pub fn is_transparent(self) -> bool {
        self.a <= 0.0
    }

    /// Returns a straight-alpha representation. For `a == 0`, RGB is returned as 0.
    #[inline]
    pub fn to_straight(self) -> (f32, f32, f32, f32) {
        if self.a <= 0.0 {
            (0.0, 0.0, 0.0, 0.0)
        } else {
            let inv = 1.0 / self.a;
            (self.r * inv, self.g * inv, self.b * inv, self.a)
        }
    }

    /// Quantizes to premultiplied 8-bit channels.
    #[inline]
    pub fn to_rgba8(self) -> [u8; 4] {
        let q = |v: f32| (v.clamp(0.0, 1.0) * 255.0 + 0.5) as u8;
        [q(self.r), q(self.g), q(self.b), q(self.a)]
    }
}
