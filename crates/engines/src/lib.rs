#![deny(unsafe_code)]
//! Field registry: maps field names to implementations and provides CPU-side
//! snapshot rendering.
//!
//! This crate sits between `pointer-field-core` (which defines the `Engine`
//! trait) and the individual field crates (`pointer-field-grid`,
//! `pointer-field-sparks`). Both the CLI and the WASM host depend on it to
//! avoid duplicating dispatch logic.

pub mod pixel;

#[cfg(feature = "png")]
pub mod snapshot;

use pointer_field_core::error::FieldError;
use pointer_field_core::event::InputEvent;
use pointer_field_core::render::Painter;
use pointer_field_core::surface::Surface;
use pointer_field_core::Engine;
use pointer_field_grid::RepulsionGrid;
use pointer_field_sparks::SparkTrail;
use serde_json::Value;

/// All available field names.
const FIELD_NAMES: &[&str] = &["grid", "sparks"];

/// Every available pointer field.
///
/// Wraps each implementation and delegates `Engine` trait methods.
/// Use [`FieldKind::from_name`] for string-based construction (CLI, WASM).
#[derive(Debug, Clone)]
pub enum FieldKind {
    /// Home-seeking lattice.
    Grid(RepulsionGrid),
    /// Pointer-trail sparks.
    Sparks(SparkTrail),
}

impl FieldKind {
    /// Constructs a field by name.
    ///
    /// Returns `FieldError::UnknownField` if the name is not recognized, or
    /// the field's own error for unusable params.
    pub fn from_name(
        name: &str,
        surface: Surface,
        seed: u64,
        params: &Value,
    ) -> Result<Self, FieldError> {
        let kind = match name {
            "grid" => FieldKind::Grid(RepulsionGrid::from_json(surface, seed, params)?),
            "sparks" => FieldKind::Sparks(SparkTrail::from_json(surface, seed, params)?),
            _ => return Err(FieldError::UnknownField(name.to_string())),
        };
        log::info!(
            "created {name} field at {}x{} (scale {})",
            surface.width(),
            surface.height(),
            surface.scale()
        );
        Ok(kind)
    }

    /// Returns a slice of all recognized field names.
    pub fn list_fields() -> &'static [&'static str] {
        FIELD_NAMES
    }

    pub fn name(&self) -> &'static str {
        match self {
            FieldKind::Grid(_) => "grid",
            FieldKind::Sparks(_) => "sparks",
        }
    }
}

impl Engine for FieldKind {
    fn handle(&mut self, event: &InputEvent) {
        match self {
            FieldKind::Grid(f) => f.handle(event),
            FieldKind::Sparks(f) => f.handle(event),
        }
    }

    fn step(&mut self, dt: f64) {
        match self {
            FieldKind::Grid(f) => f.step(dt),
            FieldKind::Sparks(f) => f.step(dt),
        }
    }

    fn render(&self, painter: &mut dyn Painter) {
        match self {
            FieldKind::Grid(f) => f.render(painter),
            FieldKind::Sparks(f) => f.render(painter),
        }
    }

    fn particle_count(&self) -> usize {
        match self {
            FieldKind::Grid(f) => f.particle_count(),
            FieldKind::Sparks(f) => f.particle_count(),
        }
    }

    fn surface(&self) -> Surface {
        match self {
            FieldKind::Grid(f) => f.surface(),
            FieldKind::Sparks(f) => f.surface(),
        }
    }

    fn params(&self) -> Value {
        match self {
            FieldKind::Grid(f) => f.params(),
            FieldKind::Sparks(f) => f.params(),
        }
    }

    fn param_schema(&self) -> Value {
        match self {
            FieldKind::Grid(f) => f.param_schema(),
            FieldKind::Sparks(f) => f.param_schema(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::DVec2;
    use pointer_field_core::render::RecordingPainter;
    use serde_json::json;

    fn surface() -> Surface {
        Surface::new(480.0, 480.0, 1.0)
    }

    #[test]
    fn from_name_builds_every_listed_field() {
        for name in FieldKind::list_fields() {
            let field = FieldKind::from_name(name, surface(), 42, &json!({})).unwrap();
            assert_eq!(field.name(), *name);
        }
    }

    #[test]
    fn from_name_unknown_returns_error() {
        let result = FieldKind::from_name("nonexistent", surface(), 42, &json!({}));
        assert!(matches!(result, Err(FieldError::UnknownField(_))));
    }

    #[test]
    fn from_name_propagates_param_errors() {
        let result = FieldKind::from_name("grid", surface(), 42, &json!({"palette": "plaid"}));
        assert!(matches!(result, Err(FieldError::InvalidPalette(_))));
    }

    #[test]
    fn trait_delegation_grid() {
        let mut field =
            FieldKind::from_name("grid", surface(), 42, &json!({"spacing": 48, "jitter": 0})).unwrap();
        assert_eq!(field.particle_count(), 100);
        field.handle(&InputEvent::Resize {
            width: 960.0,
            height: 480.0,
            scale: 1.0,
        });
        assert_eq!(field.particle_count(), 200);
        assert_eq!(field.surface().pixel_width(), 960);
    }

    #[test]
    fn trait_delegation_sparks() {
        let mut field = FieldKind::from_name("sparks", surface(), 42, &json!({})).unwrap();
        field.handle(&InputEvent::pointer_move(DVec2::new(50.0, 50.0)));
        let mut painter = RecordingPainter::new();
        field.frame(1.0, &mut painter);
        assert_eq!(field.particle_count(), 3);
        assert_eq!(painter.discs.len(), 3);
    }

    #[test]
    fn trait_delegation_params_and_schema() {
        let field = FieldKind::from_name("grid", surface(), 42, &json!({})).unwrap();
        assert!(field.params().get("spacing").is_some());
        assert!(field.param_schema().get("spacing").is_some());
        let field = FieldKind::from_name("sparks", surface(), 42, &json!({})).unwrap();
        assert!(field.params().get("max_particles").is_some());
        assert!(field.param_schema().get("max_particles").is_some());
    }

    #[test]
    fn determinism_same_seed() {
        let run = || {
            let mut field = FieldKind::from_name("sparks", surface(), 99, &json!({})).unwrap();
            let mut buffer = pixel::PixelBuffer::new(&surface());
            for i in 0..20 {
                field.handle(&InputEvent::pointer_move(DVec2::new(100.0 + 8.0 * i as f64, 240.0)));
                field.frame(1.0, &mut buffer);
            }
            buffer.into_data()
        };
        assert_eq!(run(), run());
    }

    #[test]
    fn object_safety() {
        let field = FieldKind::from_name("grid", surface(), 42, &json!({})).unwrap();
        let boxed: Box<dyn Engine> = Box::new(field);
        assert!(boxed.particle_count() > 0);
    }
}
