//! Scalar and vector helpers for influence forces.
//!
//! Everything here is pure. Distances go through [`safe_distance`] so a
//! particle sitting exactly on a source never divides by zero.

use glam::DVec2;
use serde::{Deserialize, Serialize};

/// Floor applied to distances before normalization.
pub const DISTANCE_EPSILON: f64 = 1e-6;

/// `max(|d|, ε)`.
pub fn safe_distance(d: DVec2) -> f64 {
    d.length().max(DISTANCE_EPSILON)
}

/// `d / max(|d|, ε)`: unit direction, or the zero vector when `d` is zero.
pub fn direction(d: DVec2) -> DVec2 {
    d / safe_distance(d)
}

/// Shape of the force curve between a source (1.0) and its radius (0.0).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Falloff {
    /// `(1 - r)^2`
    #[default]
    Quadratic,
    /// `1 - r`
    Linear,
    /// `1 - smoothstep(r)`
    Smoothstep,
}

impl Falloff {
    pub const NAMES: &'static [&'static str] = &["quadratic", "linear", "smoothstep"];

    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "quadratic" => Some(Falloff::Quadratic),
            "linear" => Some(Falloff::Linear),
            "smoothstep" => Some(Falloff::Smoothstep),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Falloff::Quadratic => "quadratic",
            Falloff::Linear => "linear",
            Falloff::Smoothstep => "smoothstep",
        }
    }

    /// Falloff weight in [0, 1] for `dist` against `radius`.
    ///
    /// Exactly zero at and beyond the radius (hard cutoff), and for a
    /// non-positive radius.
    pub fn weight(self, dist: f64, radius: f64) -> f64 {
        if radius <= 0.0 || dist.is_nan() || dist >= radius {
            return 0.0;
        }
        let r = (dist / radius).max(0.0);
        match self {
            Falloff::Quadratic => (1.0 - r) * (1.0 - r),
            Falloff::Linear => 1.0 - r,
            Falloff::Smoothstep => 1.0 - r * r * (3.0 - 2.0 * r),
        }
    }
}

/// Repulsive force on a particle at `particle` from a source at `source`.
///
/// `strength * falloff * weight`, directed from the source toward the
/// particle. Zero outside `radius`.
pub fn repulsion(
    particle: DVec2,
    source: DVec2,
    weight: f64,
    radius: f64,
    strength: f64,
    falloff: Falloff,
) -> DVec2 {
    let d = particle - source;
    let dist = safe_distance(d);
    let f = falloff.weight(dist, radius);
    if f == 0.0 {
        return DVec2::ZERO;
    }
    direction(d) * (strength * f * weight)
}
