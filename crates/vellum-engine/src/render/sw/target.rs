use bytemuck::{Pod, Zeroable};

use crate::color::Color;
use crate::coords::Rect;

/// One premultiplied RGBA8 pixel, laid out as in memory.
#[repr(C)]
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Pod, Zeroable)]
pub struct Pixel {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Pixel {
    #[inline]
    pub fn from_color(color: Color) -> Self {
        let [r, g, b, a] = color.to_rgba8();
        Self { r, g, b, a }
    }

    #[inline]
    pub fn to_color(self) -> Color {
        Color::from_premul(
            self.r as f32 / 255.0,
            self.g as f32 / 255.0,
            self.b as f32 / 255.0,
            self.a as f32 / 255.0,
        )
    }
}

/// CPU render target, row-major with no padding.
#[derive(Debug, Clone, PartialEq)]
pub struct Framebuffer {
    width: u32,
    height: u32,
    pixels: Vec<Pixel>,
}

impl Framebuffer {
    /// Allocates a fully transparent target.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![Pixel::zeroed(); width as usize * height as usize],
        }
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Target area in device pixels.
    #[inline]
    pub fn bounds(&self) -> Rect {
        Rect::new(0.0, 0.0, self.width as f32, self.height as f32)
    }

    #[inline]
    pub fn pixels(&self) -> &[Pixel] {
        &self.pixels
    }

    #[inline]
    pub fn pixel(&self, x: u32, y: u32) -> Option<Pixel> {
        self.index(x, y).map(|i| self.pixels[i])
    }

    pub fn fill(&mut self, color: Color) {
        self.pixels.fill(Pixel::from_color(color));
    }

    /// Source-over composite of `src` scaled by `coverage` onto one pixel.
    pub(crate) fn blend(&mut self, x: u32, y: u32, src: Color, coverage: f32) {
        let Some(i) = self.index(x, y) else {
            return;
        };

        let k = coverage.clamp(0.0, 1.0);
        let dst = self.pixels[i].to_color();
        let inv = 1.0 - src.a * k;
        self.pixels[i] = Pixel::from_color(Color::from_premul(
            src.r * k + dst.r * inv,
            src.g * k + dst.g * inv,
            src.b * k + dst.b * inv,
            src.a * k + dst.a * inv,
        ));
    }

    /// Raw premultiplied bytes, 4 per pixel.
    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.pixels)
    }

    /// Straight-alpha RGBA8 copy, the layout image encoders expect.
    pub fn to_straight_rgba8(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.pixels.len() * 4);
        for p in &self.pixels {
            let (r, g, b, a) = p.to_color().to_straight();
            out.extend_from_slice(&Color::from_premul(r, g, b, a).to_rgba8());
        }
        out
    }

    #[inline]
    fn index(&self, x: u32, y: u32) -> Option<usize> {
        (x < self.width && y < self.height).then(|| y as usize * self.width as usize + x as usize)
    }
}
