//! The `Engine` trait every pointer-reactive field implements.
//!
//! The trait is object-safe so hosts can hold a `Box<dyn Engine>` and switch
//! fields at runtime.

use serde_json::Value;

use crate::event::InputEvent;
use crate::render::Painter;
use crate::surface::Surface;

/// A frame-driven particle field.
///
/// Input handlers only update state; drawing happens in [`Engine::render`].
pub trait Engine {
    /// Applies one input event. Never draws.
    fn handle(&mut self, event: &InputEvent);

    /// Advances the simulation by `dt` nominal 60 Hz frames.
    fn step(&mut self, dt: f64);

    /// Draws the current state.
    fn render(&self, painter: &mut dyn Painter);

    /// Steps then renders.
    fn frame(&mut self, dt: f64, painter: &mut dyn Painter) {
        self.step(dt);
        self.render(painter);
    }

    fn particle_count(&self) -> usize;

    fn surface(&self) -> Surface;

    /// Current parameter values as a JSON object.
    fn params(&self) -> Value;

    /// Schema describing all available parameters, their types, ranges, and defaults.
    fn param_schema(&self) -> Value;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Srgb;
    use crate::render::RecordingPainter;
    use glam::DVec2;
    use serde_json::json;

    /// Minimal engine used to verify trait object safety.
    struct MockEngine {
        steps: usize,
        last_dt: f64,
        events: usize,
    }

    impl MockEngine {
        fn new() -> Self {
            Self {
                steps: 0,
                last_dt: 0.0,
                events: 0,
            }
        }
    }

    impl Engine for MockEngine {
        fn handle(&mut self, _event: &InputEvent) {
            self.events += 1;
        }

        fn step(&mut self, dt: f64) {
            self.steps += 1;
            self.last_dt = dt;
        }

        fn render(&self, painter: &mut dyn Painter) {
            painter.clear(Srgb::BLACK);
            for i in 0..self.steps {
                painter.fill_disc(DVec2::splat(i as f64), 1.0, Srgb::WHITE, 1.0);
            }
        }

        fn particle_count(&self) -> usize {
            self.steps
        }

        fn surface(&self) -> Surface {
            Surface::new(4.0, 4.0, 1.0)
        }

        fn params(&self) -> Value {
            json!({"steps": self.steps})
        }

        fn param_schema(&self) -> Value {
            json!({
                "steps": {
                    "type": "integer",
                    "default": 0,
                    "description": "Number of steps executed"
                }
            })
        }
    }

    #[test]
    fn engine_trait_is_object_safe() {
        let engine: Box<dyn Engine> = Box::new(MockEngine::new());
        assert_eq!(engine.surface().pixel_width(), 4);
    }

    #[test]
    fn default_frame_steps_then_renders() {
        let mut engine = MockEngine::new();
        let mut painter = RecordingPainter::new();
        engine.frame(0.5, &mut painter);
        engine.frame(1.0, &mut painter);
        assert_eq!(engine.steps, 2);
        assert_eq!(engine.last_dt, 1.0);
        assert_eq!(painter.clears.len(), 2);
        assert_eq!(painter.discs.len(), 2);
    }

    #[test]
    fn handle_does_not_draw() {
        let mut engine = MockEngine::new();
        engine.handle(&InputEvent::PointerLeave);
        assert_eq!(engine.events, 1);
        assert_eq!(engine.steps, 0);
    }

    #[test]
    fn dyn_engine_mut_reference_works() {
        let mut engine = MockEngine::new();
        let engine_ref: &mut dyn Engine = &mut engine;
        engine_ref.step(1.0);
        assert_eq!(engine_ref.params()["steps"], 1);
        assert_eq!(engine_ref.param_schema()["steps"]["type"], "integer");
    }
}
