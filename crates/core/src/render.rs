//! The drawing seam between a field and whatever owns the pixels.

use glam::DVec2;

use crate::color::Srgb;

/// Immediate-mode 2D drawing target in logical coordinates.
///
/// Implemented by the browser's Canvas2D context and by the CPU rasterizer
/// used for headless snapshots. Device-pixel scaling is the painter's job.
pub trait Painter {
    /// Fills the whole surface with an opaque color.
    fn clear(&mut self, color: Srgb);

    /// Fills a disc, blending with `alpha` in [0, 1].
    fn fill_disc(&mut self, center: DVec2, radius: f64, color: Srgb, alpha: f64);
}

/// Painter that records calls, for tests.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct RecordingPainter {
    pub clears: Vec<Srgb>,
    pub discs: Vec<Disc>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Disc {
    pub center: DVec2,
    pub radius: f64,
    pub color: Srgb,
    pub alpha: f64,
}

impl RecordingPainter {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Painter for RecordingPainter {
    fn clear(&mut self, color: Srgb) {
        self.clears.push(color);
        self.discs.clear();
    }

    fn fill_disc(&mut self, center: DVec2, radius: f64, color: Srgb, alpha: f64) {
        self.discs.push(Disc {
            center,
            radius,
            color,
            alpha,
        });
    }
}
