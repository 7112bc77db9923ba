//! Particle data and the store that owns a field's population.
//!
//! A particle's capabilities are carried by its optional fields: lattice
//! particles have a `home` and live for as long as the field does, spark
//! particles have a `life` that drains to zero and are pruned afterwards.

use glam::DVec2;

use crate::color::Srgb;
use crate::palette::Palette;
use crate::prng::Xorshift64;

/// Most columns (and rows) a lattice may have, bounding a population at
/// `MAX_LATTICE_SIDE²` particles.
pub const MAX_LATTICE_SIDE: usize = 1024;

/// Remaining life of an ephemeral particle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Lifetime {
    /// In (0, 1] while alive; starts at 1.0.
    pub remaining: f64,
    /// Lifetime length in nominal frames; scales the per-frame decay.
    pub max_life: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Particle {
    pub position: DVec2,
    pub velocity: DVec2,
    /// Rest position, pulled toward by the spring term.
    pub home: Option<DVec2>,
    pub life: Option<Lifetime>,
    /// Disc radius in logical units.
    pub size: f64,
    pub color: Srgb,
}

impl Particle {
    /// A resting lattice particle.
    pub fn at_home(home: DVec2, size: f64, color: Srgb) -> Self {
        Self {
            position: home,
            velocity: DVec2::ZERO,
            home: Some(home),
            life: None,
            size,
            color,
        }
    }

    pub fn has_home(&self) -> bool {
        self.home.is_some()
    }

    /// Lattice particles are always alive; sparks while `remaining > 0`.
    pub fn is_alive(&self) -> bool {
        self.life.map_or(true, |l| l.remaining > 0.0)
    }

    /// Draw opacity: full for lattice particles, remaining life for sparks.
    pub fn alpha(&self) -> f64 {
        self.life.map_or(1.0, |l| l.remaining.clamp(0.0, 1.0))
    }

    /// Where the renderer draws this particle under reduced motion.
    pub fn rest_position(&self) -> DVec2 {
        self.home.unwrap_or(self.position)
    }

    /// Snaps a lattice particle back onto its home with zero velocity.
    pub fn settle(&mut self) {
        if let Some(home) = self.home {
            self.position = home;
            self.velocity = DVec2::ZERO;
        }
    }
}

/// Randomization ranges for spawned sparks.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpawnShape {
    /// Fraction of the pointer velocity a spark inherits.
    pub inherit: f64,
    /// Uniform velocity jitter amplitude per axis.
    pub speed: f64,
    /// Lifetime range in nominal frames.
    pub max_life: (f64, f64),
    pub size: (f64, f64),
    /// Hue range in degrees.
    pub hue: (f64, f64),
    pub saturation: f64,
    pub lightness: f64,
}

/// Owns a field's particles and the generator used to place and spawn them.
#[derive(Debug, Clone)]
pub struct ParticleStore {
    particles: Vec<Particle>,
    rng: Xorshift64,
}

impl ParticleStore {
    pub fn new(seed: u64) -> Self {
        Self {
            particles: Vec::new(),
            rng: Xorshift64::new(seed),
        }
    }

    /// Lattice dimensions `(cols, rows)` for a surface, between 1×1 and
    /// [`MAX_LATTICE_SIDE`]×[`MAX_LATTICE_SIDE`].
    ///
    /// Spacing below 1 is treated as 1. Negative or non-finite dimensions
    /// collapse to a single column/row; oversized ones stop at the side cap,
    /// leaving the far part of the surface empty.
    pub fn lattice_dims(width: f64, height: f64, spacing: f64) -> (usize, usize) {
        let spacing = if spacing.is_finite() {
            spacing.max(1.0)
        } else {
            1.0
        };
        let count = |extent: f64| {
            let n = (extent / spacing).floor();
            if n.is_finite() {
                n.clamp(1.0, MAX_LATTICE_SIDE as f64) as usize
            } else {
                1
            }
        };
        (count(width), count(height))
    }

    /// Replaces the population with a jittered lattice covering the surface.
    ///
    /// Produces exactly `cols * rows` particles (see [`Self::lattice_dims`]).
    /// Home positions sit at cell centres offset by uniform jitter in
    /// `[-jitter, +jitter]` on each axis; colors cycle `palette` row-major.
    pub fn populate(
        &mut self,
        width: f64,
        height: f64,
        spacing: f64,
        jitter: f64,
        size: f64,
        palette: &Palette,
    ) -> &[Particle] {
        let (cols, rows) = Self::lattice_dims(width, height, spacing);
        let spacing = if spacing.is_finite() {
            spacing.max(1.0)
        } else {
            1.0
        };
        let jitter = if jitter.is_finite() { jitter.abs() } else { 0.0 };

        self.particles.clear();
        self.particles.reserve(cols * rows);
        for row in 0..rows {
            for col in 0..cols {
                let cell = DVec2::new(
                    (col as f64 + 0.5) * spacing,
                    (row as f64 + 0.5) * spacing,
                );
                let offset = DVec2::new(
                    self.rng.next_signed(jitter),
                    self.rng.next_signed(jitter),
                );
                let index = row * cols + col;
                self.particles
                    .push(Particle::at_home(cell + offset, size, palette.cycle(index)));
            }
        }
        log::debug!("populated {cols}x{rows} lattice ({} particles)", self.particles.len());
        &self.particles
    }

    /// Spawns one spark at `position`.
    ///
    /// Velocity is the inherited share of `velocity_hint` plus uniform jitter;
    /// life starts at 1.0 and lifetime, size and hue are drawn from `shape`.
    pub fn spawn(&mut self, position: DVec2, velocity_hint: DVec2, shape: &SpawnShape) -> &Particle {
        let jitter = DVec2::new(
            self.rng.next_signed(shape.speed),
            self.rng.next_signed(shape.speed),
        );
        let max_life = self
            .rng
            .next_range(shape.max_life.0, shape.max_life.1)
            .max(1.0);
        let size = self.rng.next_range(shape.size.0, shape.size.1);
        let hue = self.rng.next_range(shape.hue.0, shape.hue.1);

        self.particles.push(Particle {
            position,
            velocity: velocity_hint * shape.inherit + jitter,
            home: None,
            life: Some(Lifetime {
                remaining: 1.0,
                max_life,
            }),
            size,
            color: Srgb::from_hsl(hue, shape.saturation, shape.lightness),
        });
        let last = self.particles.len() - 1;
        &self.particles[last]
    }

    /// Removes every particle whose life has run out. Returns how many went.
    pub fn prune(&mut self) -> usize {
        let before = self.particles.len();
        self.particles.retain(Particle::is_alive);
        before - self.particles.len()
    }

    pub fn clear(&mut self) {
        self.particles.clear();
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn particles_mut(&mut self) -> &mut [Particle] {
        &mut self.particles
    }
}
