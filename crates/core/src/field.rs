//! The generic pointer-reactive particle field.
//!
//! One [`ParticleField`] drives both the home-seeking lattice and the spark
//! emitter; the [`Population`] chosen in [`FieldConfig`] decides whether
//! particles carry a home (spring term, regenerated on resize) or a
//! lifetime (spawned on pointer moves, pruned when exhausted).
//!
//! Events only mutate state. Nothing is drawn until [`ParticleField::render`]
//! runs, so [`ParticleField::step`] can be driven directly from tests.

use std::collections::VecDeque;

use glam::DVec2;

use crate::color::Srgb;
use crate::event::InputEvent;
use crate::influence::{InfluenceEntry, InfluenceParams, InfluenceSources};
use crate::integrator::{integrate_all, ForceParams};
use crate::palette::Palette;
use crate::particle::{ParticleStore, SpawnShape};
use crate::render::Painter;
use crate::surface::Surface;

/// Largest frame step accepted by [`ParticleField::step`], in nominal frames.
///
/// Long stalls (background tabs, debugger pauses) would otherwise integrate
/// one huge step.
pub const MAX_FRAME_STEP: f64 = 4.0;

/// Pointer moves waiting to emit; older ones are dropped past this.
pub const MAX_PENDING_EMISSIONS: usize = 64;

/// Spawning behaviour for an emitter population.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EmitterParams {
    /// Sparks spawned per pointer move.
    pub sparks_per_move: usize,
    /// Spawning stops while the store holds this many particles.
    pub max_particles: usize,
    pub shape: SpawnShape,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Population {
    /// Persistent particles on a jittered lattice, each with a home.
    Lattice { spacing: f64, jitter: f64, size: f64 },
    /// Ephemeral sparks spawned along the pointer trail.
    Emitter(EmitterParams),
}

#[derive(Debug, Clone, PartialEq)]
pub struct FieldConfig {
    pub population: Population,
    pub forces: ForceParams,
    pub influence: InfluenceParams,
    pub palette: Palette,
    pub background: Srgb,
    pub seed: u64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Emission {
    position: DVec2,
    velocity: DVec2,
}

#[derive(Debug, Clone)]
pub struct ParticleField {
    config: FieldConfig,
    surface: Surface,
    store: ParticleStore,
    sources: InfluenceSources,
    pending: VecDeque<Emission>,
    last_pointer: Option<DVec2>,
    reduced_motion: bool,
}

impl ParticleField {
    /// Builds a field sized to `surface`. Lattices are populated at once.
    pub fn new(config: FieldConfig, surface: Surface) -> Self {
        let mut field = Self {
            store: ParticleStore::new(config.seed),
            sources: InfluenceSources::new(config.influence),
            config,
            surface,
            pending: VecDeque::new(),
            last_pointer: None,
            reduced_motion: false,
        };
        field.repopulate();
        field
    }

    pub fn handle(&mut self, event: &InputEvent) {
        match *event {
            InputEvent::PointerMove { x, y } => self.pointer_move(DVec2::new(x, y)),
            InputEvent::PointerLeave => {
                self.sources.record_pointer_leave();
                self.last_pointer = None;
            }
            InputEvent::PointerEnter => {
                self.sources.record_pointer_enter();
                self.last_pointer = None;
            }
            InputEvent::Resize {
                width,
                height,
                scale,
            } => self.resize(Surface::new(width, height, scale)),
            InputEvent::ReducedMotion(reduce) => self.set_reduced_motion(reduce),
            // Pausing is the frame loop's business.
            InputEvent::Visibility(_) => {}
        }
    }

    fn pointer_move(&mut self, position: DVec2) {
        if !position.is_finite() {
            return;
        }
        self.sources.record_pointer_move(position);
        let velocity = self
            .last_pointer
            .map_or(DVec2::ZERO, |last| position - last);
        self.last_pointer = Some(position);

        if matches!(self.config.population, Population::Emitter(_)) && !self.reduced_motion {
            self.pending.push_back(Emission { position, velocity });
            while self.pending.len() > MAX_PENDING_EMISSIONS {
                self.pending.pop_front();
            }
        }
    }

    /// Lattices are rebuilt only when the logical extent changes; a new
    /// device scale alone leaves every particle where it is.
    fn resize(&mut self, surface: Surface) {
        let moved = !self.surface.same_extent(&surface);
        self.surface = surface;
        if moved && matches!(self.config.population, Population::Lattice { .. }) {
            self.repopulate();
        }
    }

    fn repopulate(&mut self) {
        if let Population::Lattice {
            spacing,
            jitter,
            size,
        } = self.config.population
        {
            self.store.populate(
                self.surface.width(),
                self.surface.height(),
                spacing,
                jitter,
                size,
                &self.config.palette,
            );
            if self.reduced_motion {
                self.settle();
            }
        }
    }

    pub fn set_reduced_motion(&mut self, reduce: bool) {
        if reduce != self.reduced_motion {
            log::debug!("reduced motion {}", if reduce { "on" } else { "off" });
        }
        self.reduced_motion = reduce;
        if reduce {
            self.settle();
        }
    }

    /// Puts every particle at rest: lattice points home, sparks gone.
    fn settle(&mut self) {
        self.pending.clear();
        match self.config.population {
            Population::Lattice { .. } => {
                for particle in self.store.particles_mut() {
                    particle.settle();
                }
            }
            Population::Emitter(_) => self.store.clear(),
        }
    }

    /// Advances the simulation by `dt` nominal frames.
    ///
    /// Non-finite or negative steps count as zero; steps above
    /// [`MAX_FRAME_STEP`] are clamped. Under reduced motion no physics runs.
    pub fn step(&mut self, dt: f64) {
        if self.reduced_motion {
            self.settle();
            return;
        }
        let dt = clamp_step(dt);

        self.sources.decay_step(dt);
        self.emit();

        let active: Vec<InfluenceEntry> = self.sources.active().collect();
        integrate_all(self.store.particles_mut(), &active, &self.config.forces, dt);

        if matches!(self.config.population, Population::Emitter(_)) {
            self.store.prune();
        }
    }

    fn emit(&mut self) {
        let Population::Emitter(emitter) = self.config.population else {
            return;
        };
        while let Some(emission) = self.pending.pop_front() {
            for _ in 0..emitter.sparks_per_move {
                if self.store.len() >= emitter.max_particles {
                    break;
                }
                self.store
                    .spawn(emission.position, emission.velocity, &emitter.shape);
            }
        }
    }

    /// Clears to the background and draws every particle as a disc.
    pub fn render(&self, painter: &mut dyn Painter) {
        painter.clear(self.config.background);
        for particle in self.store.particles() {
            let center = if self.reduced_motion {
                particle.rest_position()
            } else {
                particle.position
            };
            painter.fill_disc(center, particle.size, particle.color, particle.alpha());
        }
    }

    /// One display frame: [`Self::step`] then [`Self::render`].
    pub fn frame(&mut self, dt: f64, painter: &mut dyn Painter) {
        self.step(dt);
        self.render(painter);
    }

    pub fn config(&self) -> &FieldConfig {
        &self.config
    }

    pub fn surface(&self) -> Surface {
        self.surface
    }

    pub fn store(&self) -> &ParticleStore {
        &self.store
    }

    pub fn sources(&self) -> &InfluenceSources {
        &self.sources
    }

    pub fn particle_count(&self) -> usize {
        self.store.len()
    }

    pub fn reduced_motion(&self) -> bool {
        self.reduced_motion
    }

    pub fn pending_emissions(&self) -> usize {
        self.pending.len()
    }
}

/// Sanitizes a frame step into `[0, MAX_FRAME_STEP]`.
pub fn clamp_step(dt: f64) -> f64 {
    if dt.is_finite() {
        dt.clamp(0.0, MAX_FRAME_STEP)
    } else {
        0.0
    }
}
