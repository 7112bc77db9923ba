//! Drawing surface geometry: logical size plus device-pixel scale.

use serde::{Deserialize, Serialize};

/// Logical size of the drawing area and its device-pixel ratio.
///
/// Degenerate input is sanitized on construction: non-finite or negative
/// dimensions become 0 and a non-positive scale becomes 1.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Surface {
    width: f64,
    height: f64,
    scale: f64,
}

impl Surface {
    pub fn new(width: f64, height: f64, scale: f64) -> Self {
        let dim = |v: f64| if v.is_finite() { v.max(0.0) } else { 0.0 };
        let scale = if scale.is_finite() && scale > 0.0 {
            scale
        } else {
            1.0
        };
        Self {
            width: dim(width),
            height: dim(height),
            scale,
        }
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn height(&self) -> f64 {
        self.height
    }

    pub fn scale(&self) -> f64 {
        self.scale
    }

    /// Backing-store width in device pixels, at least 1.
    pub fn pixel_width(&self) -> u32 {
        Self::to_pixels(self.width * self.scale)
    }

    /// Backing-store height in device pixels, at least 1.
    pub fn pixel_height(&self) -> u32 {
        Self::to_pixels(self.height * self.scale)
    }

    /// Whether `other` has the same logical size; the scale may differ.
    pub fn same_extent(&self, other: &Surface) -> bool {
        self.width == other.width && self.height == other.height
    }

    fn to_pixels(v: f64) -> u32 {
        v.round().clamp(1.0, u32::MAX as f64) as u32
    }
}

impl Default for Surface {
    fn default() -> Self {
        Self::new(0.0, 0.0, 1.0)
    }
}
