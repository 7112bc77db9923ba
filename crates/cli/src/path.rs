//! Scripted pointer paths for headless renders.

use clap::ValueEnum;
use glam::DVec2;
use pointer_field_core::surface::Surface;
use std::f64::consts::TAU;

/// How the synthetic pointer moves across the frames of a render.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum PointerPath {
    /// One loop around the surface center at a third of the short side.
    Circle,
    /// Left to right across the middle row.
    Sweep,
    /// No pointer at all; the field renders its rest state.
    None,
}

impl PointerPath {
    /// Pointer position at `frame` of `frames`, or `None` for no pointer.
    pub fn position(self, frame: usize, frames: usize, surface: &Surface) -> Option<DVec2> {
        let t = if frames > 1 {
            frame as f64 / (frames - 1) as f64
        } else {
            0.0
        };
        let (w, h) = (surface.width(), surface.height());
        match self {
            PointerPath::Circle => {
                let center = DVec2::new(w / 2.0, h / 2.0);
                let radius = w.min(h) / 3.0;
                Some(center + DVec2::from_angle(t * TAU) * radius)
            }
            PointerPath::Sweep => Some(DVec2::new(t * w, h / 2.0)),
            PointerPath::None => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn surface() -> Surface {
        Surface::new(300.0, 150.0, 1.0)
    }

    #[test]
    fn sweep_runs_edge_to_edge() {
        let s = surface();
        assert_eq!(PointerPath::Sweep.position(0, 11, &s), Some(DVec2::new(0.0, 75.0)));
        assert_eq!(PointerPath::Sweep.position(10, 11, &s), Some(DVec2::new(300.0, 75.0)));
    }

    #[test]
    fn circle_stays_on_its_radius() {
        let s = surface();
        for frame in 0..20 {
            let p = PointerPath::Circle.position(frame, 20, &s).unwrap();
            let r = p.distance(DVec2::new(150.0, 75.0));
            assert!((r - 50.0).abs() < 1e-9, "radius {r}");
        }
    }

    #[test]
    fn none_never_moves() {
        assert_eq!(PointerPath::None.position(3, 10, &surface()), None);
    }

    #[test]
    fn single_frame_uses_path_start() {
        assert_eq!(PointerPath::Sweep.position(0, 1, &surface()), Some(DVec2::new(0.0, 75.0)));
    }
}
