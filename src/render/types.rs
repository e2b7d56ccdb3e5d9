//! Core types for the render surface

use serde::{Deserialize, Serialize};

/// RGBA color (0-255 per channel)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const BLACK: Color = Color { r: 0, g: 0, b: 0, a: 255 };
    pub const WHITE: Color = Color { r: 255, g: 255, b: 255, a: 255 };

    pub fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub fn with_alpha(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Convert to [u8; 4] for framebuffer
    pub fn to_bytes(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }
}

/// Screen-space quadrilateral with two horizontal edges.
///
/// The road renderer only ever emits quads whose near and far edges sit on
/// single pixel rows, so the shape is encoded directly: two y rows plus the
/// x extents of each edge. `y_bottom` is the nearer edge (larger y, lower on
/// screen).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Trapezoid {
    pub y_bottom: f32,
    pub y_top: f32,
    pub bottom_left: f32,
    pub bottom_right: f32,
    pub top_left: f32,
    pub top_right: f32,
}

impl Trapezoid {
    /// Corners in bottom-left, bottom-right, top-right, top-left order.
    pub fn new(
        bottom_left: (f32, f32),
        bottom_right: (f32, f32),
        top_right: (f32, f32),
        top_left: (f32, f32),
    ) -> Self {
        Self {
            y_bottom: bottom_left.1,
            y_top: top_left.1,
            bottom_left: bottom_left.0,
            bottom_right: bottom_right.0,
            top_left: top_left.0,
            top_right: top_right.0,
        }
    }
}

/// Simple texture (array of colors)
#[derive(Debug, Clone)]
pub struct Texture {
    pub width: usize,
    pub height: usize,
    pub pixels: Vec<Color>,
}

impl Texture {
    /// Load texture from an image file
    pub fn from_file<P: AsRef<std::path::Path>>(path: P) -> Result<Self, String> {
        use image::GenericImageView;

        let path = path.as_ref();
        let img = image::open(path)
            .map_err(|e| format!("Failed to load {}: {}", path.display(), e))?;

        let (width, height) = img.dimensions();
        let rgba = img.to_rgba8();

        let pixels: Vec<Color> = rgba
            .pixels()
            .map(|p| Color::with_alpha(p[0], p[1], p[2], p[3]))
            .collect();

        Ok(Self {
            width: width as usize,
            height: height as usize,
            pixels,
        })
    }

    /// Sample texture at UV coordinates (nearest neighbor, no filtering)
    pub fn sample(&self, u: f32, v: f32) -> Color {
        let tx = ((u * self.width as f32) as usize).min(self.width - 1);
        let ty = ((v * self.height as f32) as usize).min(self.height - 1);
        self.pixels[ty * self.width + tx]
    }
}
