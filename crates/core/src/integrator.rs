//! Per-frame force accumulation and position update.
//!
//! The order is fixed: repulsion from every active source, spring toward
//! home, damping applied after the force is added, then position. Sparks
//! additionally lose life and pass through a second friction stage.
//! `dt` is measured in nominal 60 Hz frames, so `dt = 1` is one frame and
//! every multiplicative factor is raised to `dt`.

use glam::DVec2;

use crate::influence::InfluenceEntry;
use crate::math::{repulsion, Falloff};
use crate::particle::Particle;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ForceParams {
    /// Distance at which a source stops pushing.
    pub influence_radius: f64,
    /// Repulsion strength at zero distance.
    pub repulsion: f64,
    /// Spring constant toward home; ignored for particles without one.
    pub spring: f64,
    /// Per-frame velocity multiplier, strictly below 1 for stability.
    pub damping: f64,
    /// Extra per-frame velocity multiplier for particles with a lifetime.
    pub friction: f64,
    /// Life lost per frame is `base_decay / max_life`.
    pub base_decay: f64,
    pub falloff: Falloff,
}

impl Default for ForceParams {
    fn default() -> Self {
        Self {
            influence_radius: 120.0,
            repulsion: 0.85,
            spring: 0.045,
            damping: 0.88,
            friction: 1.0,
            base_decay: 1.0,
            falloff: Falloff::Quadratic,
        }
    }
}

/// What happened to a particle during [`integrate`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    Moved,
    /// Position or velocity went non-finite and the particle was put back
    /// at rest (home) or killed (spark).
    Recovered,
}

/// Sum of repulsion from every source plus the spring term.
pub fn accumulate_force(particle: &Particle, sources: &[InfluenceEntry], params: &ForceParams) -> DVec2 {
    let mut force = DVec2::ZERO;
    for source in sources {
        force += repulsion(
            particle.position,
            source.position,
            source.weight,
            params.influence_radius,
            params.repulsion,
            params.falloff,
        );
    }
    if let Some(home) = particle.home {
        force += (home - particle.position) * params.spring;
    }
    force
}

/// Advances one particle by `dt` frames.
pub fn integrate(
    particle: &mut Particle,
    sources: &[InfluenceEntry],
    params: &ForceParams,
    dt: f64,
) -> StepOutcome {
    let force = accumulate_force(particle, sources, params);

    particle.velocity = (particle.velocity + force * dt) * params.damping.powf(dt);
    particle.position += particle.velocity * dt;

    if let Some(life) = particle.life.as_mut() {
        life.remaining -= params.base_decay / life.max_life * dt;
        particle.velocity *= params.friction.powf(dt);
    }

    if particle.position.is_finite() && particle.velocity.is_finite() {
        return StepOutcome::Moved;
    }

    match (particle.home, particle.life.as_mut()) {
        (_, Some(life)) => {
            life.remaining = 0.0;
            if !particle.position.is_finite() {
                particle.position = particle.home.unwrap_or(DVec2::ZERO);
            }
            particle.velocity = DVec2::ZERO;
        }
        (Some(home), None) => {
            particle.position = home;
            particle.velocity = DVec2::ZERO;
        }
        (None, None) => {
            particle.position = DVec2::ZERO;
            particle.velocity = DVec2::ZERO;
        }
    }
    StepOutcome::Recovered
}

/// Integrates every particle and returns how many had to be recovered.
pub fn integrate_all(
    particles: &mut [Particle],
    sources: &[InfluenceEntry],
    params: &ForceParams,
    dt: f64,
) -> usize {
    let mut recovered = 0;
    for particle in particles.iter_mut() {
        if integrate(particle, sources, params, dt) == StepOutcome::Recovered {
            recovered += 1;
        }
    }
    if recovered > 0 {
        log::warn!("{recovered} particle(s) went non-finite and were reset");
    }
    recovered
}
