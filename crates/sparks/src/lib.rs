#![deny(unsafe_code)]
//! Pointer-trail spark emitter.
//!
//! Every pointer move queues a small burst of sparks at the pointer. Sparks
//! inherit part of the pointer's motion, drift under damping and friction,
//! are nudged apart by the pointer trail, and fade out over a randomized
//! lifetime before being pruned. Resizing leaves live sparks alone.

use pointer_field_core::color::Srgb;
use pointer_field_core::error::FieldError;
use pointer_field_core::event::InputEvent;
use pointer_field_core::field::{EmitterParams, FieldConfig, ParticleField, Population};
use pointer_field_core::influence::{InfluenceParams, MAX_HISTORY_CAP};
use pointer_field_core::integrator::ForceParams;
use pointer_field_core::math::Falloff;
use pointer_field_core::palette::Palette;
use pointer_field_core::params::{
    param_f64_in, param_string, param_usize, schema_choice, schema_integer, schema_number,
};
use pointer_field_core::particle::SpawnShape;
use pointer_field_core::render::Painter;
use pointer_field_core::surface::Surface;
use pointer_field_core::Engine;
use serde_json::{json, Value};

const DEFAULT_SPARKS_PER_MOVE: usize = 3;
const DEFAULT_MAX_PARTICLES: usize = 600;
/// Velocity jitter amplitude per axis.
const DEFAULT_SPEED: f64 = 1.2;
/// Share of pointer velocity a spark inherits.
const DEFAULT_INHERIT: f64 = 0.25;
const DEFAULT_MIN_LIFE: f64 = 30.0;
const DEFAULT_MAX_LIFE: f64 = 60.0;
const DEFAULT_BASE_DECAY: f64 = 1.0;
const DEFAULT_FRICTION: f64 = 0.96;
const DEFAULT_DAMPING: f64 = 0.98;
const DEFAULT_INFLUENCE_RADIUS: f64 = 80.0;
const DEFAULT_REPULSION: f64 = 0.3;
const DEFAULT_MIN_SIZE: f64 = 1.0;
const DEFAULT_MAX_SIZE: f64 = 3.0;
const DEFAULT_MIN_HUE: f64 = 180.0;
const DEFAULT_MAX_HUE: f64 = 300.0;
const DEFAULT_SATURATION: f64 = 0.9;
const DEFAULT_LIGHTNESS: f64 = 0.65;
const DEFAULT_HISTORY_CAP: usize = 8;
const DEFAULT_DECAY: f64 = 0.7;
const DEFAULT_BACKGROUND: &str = "#05060a";

const MAX_SPARKS_PER_MOVE: usize = 32;
const MAX_PARTICLES: usize = 20_000;
const MAX_DAMPING: f64 = 0.999;

/// Tunable constants for the spark trail.
#[derive(Debug, Clone, PartialEq)]
pub struct SparkParams {
    pub sparks_per_move: usize,
    pub max_particles: usize,
    pub speed: f64,
    pub inherit: f64,
    pub min_life: f64,
    pub max_life: f64,
    pub base_decay: f64,
    pub friction: f64,
    pub damping: f64,
    pub influence_radius: f64,
    pub repulsion: f64,
    pub min_size: f64,
    pub max_size: f64,
    pub min_hue: f64,
    pub max_hue: f64,
    pub saturation: f64,
    pub lightness: f64,
    pub history_cap: usize,
    pub decay: f64,
    pub falloff: Falloff,
    pub background: String,
}

impl Default for SparkParams {
    fn default() -> Self {
        Self {
            sparks_per_move: DEFAULT_SPARKS_PER_MOVE,
            max_particles: DEFAULT_MAX_PARTICLES,
            speed: DEFAULT_SPEED,
            inherit: DEFAULT_INHERIT,
            min_life: DEFAULT_MIN_LIFE,
            max_life: DEFAULT_MAX_LIFE,
            base_decay: DEFAULT_BASE_DECAY,
            friction: DEFAULT_FRICTION,
            damping: DEFAULT_DAMPING,
            influence_radius: DEFAULT_INFLUENCE_RADIUS,
            repulsion: DEFAULT_REPULSION,
            min_size: DEFAULT_MIN_SIZE,
            max_size: DEFAULT_MAX_SIZE,
            min_hue: DEFAULT_MIN_HUE,
            max_hue: DEFAULT_MAX_HUE,
            saturation: DEFAULT_SATURATION,
            lightness: DEFAULT_LIGHTNESS,
            history_cap: DEFAULT_HISTORY_CAP,
            decay: DEFAULT_DECAY,
            falloff: Falloff::Quadratic,
            background: DEFAULT_BACKGROUND.to_string(),
        }
    }
}

impl SparkParams {
    /// Extracts parameters from a JSON object, falling back to defaults.
    ///
    /// Range pairs are reordered so `min_* <= max_*` always holds.
    pub fn from_json(params: &Value) -> Self {
        let falloff = Falloff::from_name(&param_string(params, "falloff", "quadratic"))
            .unwrap_or_default();
        let min_life = param_f64_in(params, "min_life", DEFAULT_MIN_LIFE, 1.0, 10_000.0);
        let max_life = param_f64_in(params, "max_life", DEFAULT_MAX_LIFE, 1.0, 10_000.0);
        let min_size = param_f64_in(params, "min_size", DEFAULT_MIN_SIZE, 0.1, 32.0);
        let max_size = param_f64_in(params, "max_size", DEFAULT_MAX_SIZE, 0.1, 32.0);
        let min_hue = param_f64_in(params, "min_hue", DEFAULT_MIN_HUE, 0.0, 720.0);
        let max_hue = param_f64_in(params, "max_hue", DEFAULT_MAX_HUE, 0.0, 720.0);
        Self {
            sparks_per_move: param_usize(
                params,
                "sparks_per_move",
                DEFAULT_SPARKS_PER_MOVE,
                MAX_SPARKS_PER_MOVE,
            ),
            max_particles: param_usize(params, "max_particles", DEFAULT_MAX_PARTICLES, MAX_PARTICLES),
            speed: param_f64_in(params, "speed", DEFAULT_SPEED, 0.0, 50.0),
            inherit: param_f64_in(params, "inherit", DEFAULT_INHERIT, 0.0, 2.0),
            min_life: min_life.min(max_life),
            max_life: min_life.max(max_life),
            base_decay: param_f64_in(params, "base_decay", DEFAULT_BASE_DECAY, 0.0, 100.0),
            friction: param_f64_in(params, "friction", DEFAULT_FRICTION, 0.0, 1.0),
            damping: param_f64_in(params, "damping", DEFAULT_DAMPING, 0.0, MAX_DAMPING),
            influence_radius: param_f64_in(
                params,
                "influence_radius",
                DEFAULT_INFLUENCE_RADIUS,
                0.0,
                2048.0,
            ),
            repulsion: param_f64_in(params, "repulsion", DEFAULT_REPULSION, 0.0, 10.0),
            min_size: min_size.min(max_size),
            max_size: min_size.max(max_size),
            min_hue: min_hue.min(max_hue),
            max_hue: min_hue.max(max_hue),
            saturation: param_f64_in(params, "saturation", DEFAULT_SATURATION, 0.0, 1.0),
            lightness: param_f64_in(params, "lightness", DEFAULT_LIGHTNESS, 0.0, 1.0),
            history_cap: param_usize(params, "history_cap", DEFAULT_HISTORY_CAP, MAX_HISTORY_CAP),
            decay: param_f64_in(params, "decay", DEFAULT_DECAY, 0.0, 1.0),
            falloff,
            background: param_string(params, "background", DEFAULT_BACKGROUND),
        }
    }

    /// Resolves the background color into a field configuration.
    pub fn to_config(&self, seed: u64) -> Result<FieldConfig, FieldError> {
        Ok(FieldConfig {
            population: Population::Emitter(EmitterParams {
                sparks_per_move: self.sparks_per_move,
                max_particles: self.max_particles,
                shape: SpawnShape {
                    inherit: self.inherit,
                    speed: self.speed,
                    max_life: (self.min_life, self.max_life),
                    size: (self.min_size, self.max_size),
                    hue: (self.min_hue, self.max_hue),
                    saturation: self.saturation,
                    lightness: self.lightness,
                },
            }),
            forces: ForceParams {
                influence_radius: self.influence_radius,
                repulsion: self.repulsion,
                spring: 0.0,
                damping: self.damping,
                friction: self.friction,
                base_decay: self.base_decay,
                falloff: self.falloff,
            },
            influence: InfluenceParams {
                history_cap: self.history_cap,
                decay: self.decay,
            },
            // Sparks take their color from the hue range, not a palette.
            palette: Palette::default(),
            background: Srgb::from_hex(&self.background)?,
            seed,
        })
    }
}

/// Fading sparks that follow the pointer.
#[derive(Debug, Clone)]
pub struct SparkTrail {
    field: ParticleField,
    params: SparkParams,
}

impl SparkTrail {
    /// Creates an empty trail on `surface`.
    pub fn new(surface: Surface, seed: u64, params: SparkParams) -> Result<Self, FieldError> {
        let field = ParticleField::new(params.to_config(seed)?, surface);
        Ok(Self { field, params })
    }

    pub fn from_json(surface: Surface, seed: u64, json_params: &Value) -> Result<Self, FieldError> {
        Self::new(surface, seed, SparkParams::from_json(json_params))
    }

    pub fn field(&self) -> &ParticleField {
        &self.field
    }

    pub fn spark_params(&self) -> &SparkParams {
        &self.params
    }
}

impl Engine for SparkTrail {
    fn handle(&mut self, event: &InputEvent) {
        self.field.handle(event);
    }

    fn step(&mut self, dt: f64) {
        self.field.step(dt);
    }

    fn render(&self, painter: &mut dyn Painter) {
        self.field.render(painter);
    }

    fn particle_count(&self) -> usize {
        self.field.particle_count()
    }

    fn surface(&self) -> Surface {
        self.field.surface()
    }

    fn params(&self) -> Value {
        json!({
            "sparks_per_move": self.params.sparks_per_move,
            "max_particles": self.params.max_particles,
            "speed": self.params.speed,
            "inherit": self.params.inherit,
            "min_life": self.params.min_life,
            "max_life": self.params.max_life,
            "base_decay": self.params.base_decay,
            "friction": self.params.friction,
            "damping": self.params.damping,
            "influence_radius": self.params.influence_radius,
            "repulsion": self.params.repulsion,
            "min_size": self.params.min_size,
            "max_size": self.params.max_size,
            "min_hue": self.params.min_hue,
            "max_hue": self.params.max_hue,
            "saturation": self.params.saturation,
            "lightness": self.params.lightness,
            "history_cap": self.params.history_cap,
            "decay": self.params.decay,
            "falloff": self.params.falloff.name(),
            "background": self.params.background,
        })
    }

    fn param_schema(&self) -> Value {
        json!({
            "sparks_per_move": schema_integer(DEFAULT_SPARKS_PER_MOVE, 0, MAX_SPARKS_PER_MOVE, "Sparks spawned per pointer move"),
            "max_particles": schema_integer(DEFAULT_MAX_PARTICLES, 0, MAX_PARTICLES, "Spawning pauses at this many live sparks"),
            "speed": schema_number(DEFAULT_SPEED, 0.0, 50.0, "Random velocity amplitude per axis"),
            "inherit": schema_number(DEFAULT_INHERIT, 0.0, 2.0, "Share of pointer velocity inherited at spawn"),
            "min_life": schema_number(DEFAULT_MIN_LIFE, 1.0, 10_000.0, "Shortest lifetime in frames"),
            "max_life": schema_number(DEFAULT_MAX_LIFE, 1.0, 10_000.0, "Longest lifetime in frames"),
            "base_decay": schema_number(DEFAULT_BASE_DECAY, 0.0, 100.0, "Life lost per frame, divided by lifetime"),
            "friction": schema_number(DEFAULT_FRICTION, 0.0, 1.0, "Extra per-frame velocity multiplier"),
            "damping": schema_number(DEFAULT_DAMPING, 0.0, MAX_DAMPING, "Per-frame velocity multiplier"),
            "influence_radius": schema_number(DEFAULT_INFLUENCE_RADIUS, 0.0, 2048.0, "Distance at which the trail stops pushing"),
            "repulsion": schema_number(DEFAULT_REPULSION, 0.0, 10.0, "Repulsion strength at zero distance"),
            "min_size": schema_number(DEFAULT_MIN_SIZE, 0.1, 32.0, "Smallest spark radius"),
            "max_size": schema_number(DEFAULT_MAX_SIZE, 0.1, 32.0, "Largest spark radius"),
            "min_hue": schema_number(DEFAULT_MIN_HUE, 0.0, 720.0, "Lower hue bound in degrees"),
            "max_hue": schema_number(DEFAULT_MAX_HUE, 0.0, 720.0, "Upper hue bound in degrees"),
            "saturation": schema_number(DEFAULT_SATURATION, 0.0, 1.0, "HSL saturation"),
            "lightness": schema_number(DEFAULT_LIGHTNESS, 0.0, 1.0, "HSL lightness"),
            "history_cap": schema_integer(DEFAULT_HISTORY_CAP, 0, MAX_HISTORY_CAP, "Pointer trail length"),
            "decay": schema_number(DEFAULT_DECAY, 0.0, 1.0, "Per-frame trail weight multiplier"),
            "falloff": schema_choice("quadratic", Falloff::NAMES, "Repulsion falloff curve"),
            "background": {
                "type": "string",
                "default": DEFAULT_BACKGROUND,
                "description": "Background color as #rrggbb"
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::DVec2;
    use pointer_field_core::render::RecordingPainter;

    fn trail(params: SparkParams) -> SparkTrail {
        SparkTrail::new(Surface::new(480.0, 480.0, 1.0), 42, params).unwrap()
    }

    fn swipe(t: &mut SparkTrail, moves: usize) {
        for i in 0..moves {
            t.handle(&InputEvent::pointer_move(DVec2::new(100.0 + 5.0 * i as f64, 200.0)));
        }
    }

    #[test]
    fn starts_empty() {
        let t = trail(SparkParams::default());
        assert_eq!(t.particle_count(), 0);
    }

    #[test]
    fn each_move_spawns_a_burst_on_next_step() {
        let mut t = trail(SparkParams::default());
        swipe(&mut t, 4);
        assert_eq!(t.particle_count(), 0);
        t.step(1.0);
        assert_eq!(t.particle_count(), 4 * DEFAULT_SPARKS_PER_MOVE);
    }

    #[test]
    fn sparks_are_gone_after_max_life() {
        let mut t = trail(SparkParams::default());
        swipe(&mut t, 5);
        t.handle(&InputEvent::PointerLeave);
        // One spawning step plus the longest lifetime.
        for _ in 0..=(DEFAULT_MAX_LIFE as usize + 1) {
            t.step(1.0);
        }
        assert_eq!(t.particle_count(), 0);
    }

    #[test]
    fn rendered_alpha_fades() {
        let mut t = trail(SparkParams::default());
        swipe(&mut t, 1);
        t.step(1.0);
        let mut painter = RecordingPainter::new();
        t.render(&mut painter);
        let first: Vec<f64> = painter.discs.iter().map(|d| d.alpha).collect();
        for _ in 0..10 {
            t.step(1.0);
        }
        t.render(&mut painter);
        let later: Vec<f64> = painter.discs.iter().map(|d| d.alpha).collect();
        assert_eq!(first.len(), later.len());
        assert!(first.iter().zip(&later).all(|(a, b)| b < a));
    }

    #[test]
    fn trail_history_is_capped_within_one_frame() {
        let mut t = trail(SparkParams::default());
        swipe(&mut t, 50);
        assert_eq!(t.field().sources().history().len(), DEFAULT_HISTORY_CAP);
        t.handle(&InputEvent::PointerLeave);
        assert!(t.field().sources().history().is_empty());
    }

    #[test]
    fn particle_cap_holds() {
        let params = SparkParams {
            max_particles: 20,
            sparks_per_move: 8,
            ..SparkParams::default()
        };
        let mut t = trail(params);
        for _ in 0..10 {
            swipe(&mut t, 10);
            t.step(1.0);
            assert!(t.particle_count() <= 20);
        }
    }

    #[test]
    fn resize_keeps_live_sparks() {
        let mut t = trail(SparkParams::default());
        swipe(&mut t, 3);
        t.step(1.0);
        let n = t.particle_count();
        t.handle(&InputEvent::Resize {
            width: 1920.0,
            height: 1080.0,
            scale: 2.0,
        });
        assert_eq!(t.particle_count(), n);
        assert_eq!(t.surface().pixel_width(), 3840);
    }

    #[test]
    fn sparks_inherit_pointer_direction() {
        let params = SparkParams {
            speed: 0.0,
            inherit: 0.5,
            repulsion: 0.0,
            ..SparkParams::default()
        };
        let mut t = trail(params);
        t.handle(&InputEvent::pointer_move(DVec2::new(100.0, 100.0)));
        t.handle(&InputEvent::pointer_move(DVec2::new(120.0, 100.0)));
        t.step(1.0);
        // The second burst inherits half of the 20-unit move.
        let moving = t
            .field()
            .store()
            .particles()
            .iter()
            .filter(|p| p.velocity.x > 0.0)
            .count();
        assert_eq!(moving, DEFAULT_SPARKS_PER_MOVE);
    }

    #[test]
    fn from_json_orders_ranges() {
        let p = SparkParams::from_json(&json!({"min_life": 90, "max_life": 10, "min_hue": 300, "max_hue": 100}));
        assert_eq!((p.min_life, p.max_life), (10.0, 90.0));
        assert_eq!((p.min_hue, p.max_hue), (100.0, 300.0));
    }

    #[test]
    fn bad_background_is_an_error() {
        let result = SparkTrail::from_json(Surface::new(10.0, 10.0, 1.0), 1, &json!({"background": "red"}));
        assert!(matches!(result, Err(FieldError::InvalidColor(_))));
    }

    #[test]
    fn params_round_trip_through_json() {
        let t = trail(SparkParams::default());
        assert_eq!(&SparkParams::from_json(&t.params()), t.spark_params());
        let schema = t.param_schema();
        for key in t.params().as_object().unwrap().keys() {
            assert!(schema.get(key).is_some(), "schema missing {key}");
        }
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn every_live_spark_is_alive_and_finite(
                path in proptest::collection::vec((0.0_f64..480.0, 0.0_f64..480.0), 1..30),
                idle in 0usize..80,
            ) {
                let mut t = trail(SparkParams::default());
                for (x, y) in path {
                    t.handle(&InputEvent::pointer_move(DVec2::new(x, y)));
                    t.step(1.0);
                }
                for _ in 0..idle {
                    t.step(1.0);
                }
                for p in t.field().store().particles() {
                    prop_assert!(p.is_alive());
                    prop_assert!(p.position.is_finite());
                    let life = p.life.unwrap().remaining;
                    prop_assert!(life > 0.0 && life <= 1.0);
                }
            }
        }
    }
}
