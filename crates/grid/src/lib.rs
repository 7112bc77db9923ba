#![deny(unsafe_code)]
//! Home-seeking repulsion grid.
//!
//! A jittered lattice of points covers the surface. Each point is pulled
//! back toward its home by a spring and pushed away from the pointer and
//! its recent trail with a quadratic falloff, then damped. The lattice is
//! rebuilt from scratch whenever the surface size changes.

use pointer_field_core::color::Srgb;
use pointer_field_core::error::FieldError;
use pointer_field_core::event::InputEvent;
use pointer_field_core::field::{FieldConfig, ParticleField, Population};
use pointer_field_core::influence::{InfluenceParams, MAX_HISTORY_CAP};
use pointer_field_core::integrator::ForceParams;
use pointer_field_core::math::Falloff;
use pointer_field_core::palette::Palette;
use pointer_field_core::params::{
    param_f64_in, param_string, param_usize, schema_choice, schema_integer, schema_number,
};
use pointer_field_core::render::Painter;
use pointer_field_core::surface::Surface;
use pointer_field_core::Engine;
use serde_json::{json, Value};

/// Lattice cell size in logical units.
const DEFAULT_SPACING: f64 = 48.0;
/// Home jitter amplitude per axis.
const DEFAULT_JITTER: f64 = 6.0;
/// Dot radius.
const DEFAULT_SIZE: f64 = 1.6;
const DEFAULT_INFLUENCE_RADIUS: f64 = 120.0;
const DEFAULT_REPULSION: f64 = 0.85;
const DEFAULT_SPRING: f64 = 0.045;
const DEFAULT_DAMPING: f64 = 0.88;
/// Trail length; a fast pointer leaves a short shrinking tail.
const DEFAULT_HISTORY_CAP: usize = 5;
const DEFAULT_DECAY: f64 = 0.65;
const DEFAULT_PALETTE: &str = "dusk";
const DEFAULT_BACKGROUND: &str = "#05060a";

/// Damping must stay below 1 or the lattice never settles.
const MAX_DAMPING: f64 = 0.999;

/// Tunable constants for the grid.
#[derive(Debug, Clone, PartialEq)]
pub struct GridParams {
    pub spacing: f64,
    pub jitter: f64,
    pub size: f64,
    pub influence_radius: f64,
    pub repulsion: f64,
    pub spring: f64,
    pub damping: f64,
    pub history_cap: usize,
    pub decay: f64,
    pub falloff: Falloff,
    pub palette: String,
    pub background: String,
}

impl Default for GridParams {
    fn default() -> Self {
        Self {
            spacing: DEFAULT_SPACING,
            jitter: DEFAULT_JITTER,
            size: DEFAULT_SIZE,
            influence_radius: DEFAULT_INFLUENCE_RADIUS,
            repulsion: DEFAULT_REPULSION,
            spring: DEFAULT_SPRING,
            damping: DEFAULT_DAMPING,
            history_cap: DEFAULT_HISTORY_CAP,
            decay: DEFAULT_DECAY,
            falloff: Falloff::Quadratic,
            palette: DEFAULT_PALETTE.to_string(),
            background: DEFAULT_BACKGROUND.to_string(),
        }
    }
}

impl GridParams {
    /// Extracts parameters from a JSON object, falling back to defaults and
    /// clamping into stable ranges.
    pub fn from_json(params: &Value) -> Self {
        let falloff = Falloff::from_name(&param_string(params, "falloff", "quadratic"))
            .unwrap_or_default();
        Self {
            spacing: param_f64_in(params, "spacing", DEFAULT_SPACING, 1.0, 512.0),
            jitter: param_f64_in(params, "jitter", DEFAULT_JITTER, 0.0, 64.0),
            size: param_f64_in(params, "size", DEFAULT_SIZE, 0.1, 16.0),
            influence_radius: param_f64_in(
                params,
                "influence_radius",
                DEFAULT_INFLUENCE_RADIUS,
                0.0,
                2048.0,
            ),
            repulsion: param_f64_in(params, "repulsion", DEFAULT_REPULSION, 0.0, 10.0),
            spring: param_f64_in(params, "spring", DEFAULT_SPRING, 0.0, 1.0),
            damping: param_f64_in(params, "damping", DEFAULT_DAMPING, 0.0, MAX_DAMPING),
            history_cap: param_usize(params, "history_cap", DEFAULT_HISTORY_CAP, MAX_HISTORY_CAP),
            decay: param_f64_in(params, "decay", DEFAULT_DECAY, 0.0, 1.0),
            falloff,
            palette: param_string(params, "palette", DEFAULT_PALETTE),
            background: param_string(params, "background", DEFAULT_BACKGROUND),
        }
    }

    /// Resolves names and colors into a field configuration.
    ///
    /// Returns `FieldError::InvalidPalette` or `FieldError::InvalidColor`
    /// for unknown palette names and malformed background colors.
    pub fn to_config(&self, seed: u64) -> Result<FieldConfig, FieldError> {
        Ok(FieldConfig {
            population: Population::Lattice {
                spacing: self.spacing,
                jitter: self.jitter,
                size: self.size,
            },
            forces: ForceParams {
                influence_radius: self.influence_radius,
                repulsion: self.repulsion,
                spring: self.spring,
                damping: self.damping,
                friction: 1.0,
                base_decay: 0.0,
                falloff: self.falloff,
            },
            influence: InfluenceParams {
                history_cap: self.history_cap,
                decay: self.decay,
            },
            palette: Palette::from_name(&self.palette)?,
            background: Srgb::from_hex(&self.background)?,
            seed,
        })
    }
}

/// Pointer-repelled lattice that springs back home.
#[derive(Debug, Clone)]
pub struct RepulsionGrid {
    field: ParticleField,
    params: GridParams,
}

impl RepulsionGrid {
    /// Creates a grid covering `surface`, populated immediately.
    pub fn new(surface: Surface, seed: u64, params: GridParams) -> Result<Self, FieldError> {
        let field = ParticleField::new(params.to_config(seed)?, surface);
        Ok(Self { field, params })
    }

    /// Creates a grid from a JSON params object.
    pub fn from_json(surface: Surface, seed: u64, json_params: &Value) -> Result<Self, FieldError> {
        Self::new(surface, seed, GridParams::from_json(json_params))
    }

    /// The underlying generic field.
    pub fn field(&self) -> &ParticleField {
        &self.field
    }

    pub fn grid_params(&self) -> &GridParams {
        &self.params
    }
}

impl Engine for RepulsionGrid {
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
            "spacing": self.params.spacing,
            "jitter": self.params.jitter,
            "size": self.params.size,
            "influence_radius": self.params.influence_radius,
            "repulsion": self.params.repulsion,
            "spring": self.params.spring,
            "damping": self.params.damping,
            "history_cap": self.params.history_cap,
            "decay": self.params.decay,
            "falloff": self.params.falloff.name(),
            "palette": self.params.palette,
            "background": self.params.background,
        })
    }

    fn param_schema(&self) -> Value {
        json!({
            "spacing": schema_number(DEFAULT_SPACING, 1.0, 512.0, "Lattice cell size in logical pixels"),
            "jitter": schema_number(DEFAULT_JITTER, 0.0, 64.0, "Uniform home-position jitter per axis"),
            "size": schema_number(DEFAULT_SIZE, 0.1, 16.0, "Dot radius"),
            "influence_radius": schema_number(DEFAULT_INFLUENCE_RADIUS, 0.0, 2048.0, "Distance at which the pointer stops pushing"),
            "repulsion": schema_number(DEFAULT_REPULSION, 0.0, 10.0, "Repulsion strength at zero distance"),
            "spring": schema_number(DEFAULT_SPRING, 0.0, 1.0, "Spring constant pulling dots home"),
            "damping": schema_number(DEFAULT_DAMPING, 0.0, MAX_DAMPING, "Per-frame velocity multiplier"),
            "history_cap": schema_integer(DEFAULT_HISTORY_CAP, 0, MAX_HISTORY_CAP, "Pointer trail length; 0 uses only the live pointer"),
            "decay": schema_number(DEFAULT_DECAY, 0.0, 1.0, "Per-frame trail weight multiplier"),
            "falloff": schema_choice("quadratic", Falloff::NAMES, "Repulsion falloff curve"),
            "palette": schema_choice(DEFAULT_PALETTE, Palette::list_names(), "Dot color palette"),
            "background": {
                "type": "string",
                "default": DEFAULT_BACKGROUND,
                "description": "Background color as #rrggbb"
            }
        })
    }
}
