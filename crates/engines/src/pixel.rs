//! CPU rasterizer: an RGBA8 pixel buffer that implements [`Painter`].
//!
//! This module is always available (no feature gate) so headless renders
//! and tests can draw a field without a browser. Discs get a one-pixel
//! coverage ramp at the edge and are composited source-over onto an opaque
//! background.

use glam::DVec2;
use pointer_field_core::color::Srgb;
use pointer_field_core::render::Painter;
use pointer_field_core::surface::Surface;

/// Opaque RGBA8 image in device pixels.
#[derive(Debug, Clone, PartialEq)]
pub struct PixelBuffer {
    width: u32,
    height: u32,
    scale: f64,
    data: Vec<u8>,
}

impl PixelBuffer {
    /// Allocates a black buffer sized to the surface's device pixels.
    pub fn new(surface: &Surface) -> Self {
        let width = surface.pixel_width();
        let height = surface.pixel_height();
        let mut data = vec![0u8; width as usize * height as usize * 4];
        for px in data.chunks_exact_mut(4) {
            px[3] = 255;
        }
        Self {
            width,
            height,
            scale: surface.scale(),
            data,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Raw RGBA bytes, row-major, `width * height * 4` long.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn into_data(self) -> Vec<u8> {
        self.data
    }

    /// The RGBA value at device pixel `(x, y)`, or `None` out of bounds.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = (y as usize * self.width as usize + x as usize) * 4;
        Some([self.data[i], self.data[i + 1], self.data[i + 2], self.data[i + 3]])
    }

    fn blend(&mut self, x: u32, y: u32, rgb: [u8; 3], alpha: f64) {
        let i = (y as usize * self.width as usize + x as usize) * 4;
        for c in 0..3 {
            let dst = self.data[i + c] as f64;
            let src = rgb[c] as f64;
            self.data[i + c] = (src * alpha + dst * (1.0 - alpha)).round().clamp(0.0, 255.0) as u8;
        }
    }
}

impl Painter for PixelBuffer {
    fn clear(&mut self, color: Srgb) {
        let [r, g, b] = color.to_rgb8();
        for px in self.data.chunks_exact_mut(4) {
            px.copy_from_slice(&[r, g, b, 255]);
        }
    }

    fn fill_disc(&mut self, center: DVec2, radius: f64, color: Srgb, alpha: f64) {
        let alpha = if alpha.is_finite() { alpha.clamp(0.0, 1.0) } else { 0.0 };
        if alpha == 0.0 || !center.is_finite() || !radius.is_finite() || radius <= 0.0 {
            return;
        }
        let c = center * self.scale;
        let r = radius * self.scale;

        // Pixel centers within r + 0.5 of the disc center.
        let reach = r + 0.5;
        let x0 = (c.x - reach).floor().max(0.0);
        let y0 = (c.y - reach).floor().max(0.0);
        let x1 = (c.x + reach).ceil().min(self.width as f64 - 1.0);
        let y1 = (c.y + reach).ceil().min(self.height as f64 - 1.0);
        if x0 > x1 || y0 > y1 {
            return;
        }

        let rgb = color.to_rgb8();
        for y in y0 as u32..=y1 as u32 {
            for x in x0 as u32..=x1 as u32 {
                let p = DVec2::new(x as f64 + 0.5, y as f64 + 0.5);
                let coverage = (r + 0.5 - p.distance(c)).clamp(0.0, 1.0);
                if coverage > 0.0 {
                    self.blend(x, y, rgb, alpha * coverage);
                }
            }
        }
    }
}
