//! Inbound host events, already translated into logical surface coordinates.

use glam::DVec2;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    PointerMove { x: f64, y: f64 },
    PointerLeave,
    PointerEnter,
    Resize { width: f64, height: f64, scale: f64 },
    /// `true` while the host prefers reduced motion.
    ReducedMotion(bool),
    /// `false` while the page is hidden.
    Visibility(bool),
}

impl InputEvent {
    pub fn pointer_move(position: DVec2) -> Self {
        InputEvent::PointerMove {
            x: position.x,
            y: position.y,
        }
    }
}
