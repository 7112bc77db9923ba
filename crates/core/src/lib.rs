#![deny(unsafe_code)]
//! Core types and traits for pointer-field, a pointer-reactive particle field.
//!
//! Provides the `Engine` trait, the generic [`ParticleField`] with its
//! particle store, influence sources and integrator, the `FrameLoop` state
//! machine and the `Mount` lifecycle hosts build on, the `Painter` drawing
//! seam, `Srgb`/`Palette` colors, the `Xorshift64` PRNG, and parameter
//! helpers.

pub mod color;
pub mod engine;
pub mod error;
pub mod event;
pub mod field;
pub mod frame;
pub mod influence;
pub mod integrator;
pub mod lifecycle;
pub mod math;
pub mod palette;
pub mod params;
pub mod particle;
pub mod prng;
pub mod render;
pub mod surface;

pub use color::Srgb;
pub use engine::Engine;
pub use error::FieldError;
pub use event::InputEvent;
pub use field::{EmitterParams, FieldConfig, ParticleField, Population};
pub use frame::{FrameLoop, FrameScheduler, LoopState};
pub use influence::{InfluenceEntry, InfluenceParams, InfluenceSources, Pointer};
pub use integrator::ForceParams;
pub use lifecycle::{Listener, ListenerTarget, Mount, Mounted};
pub use math::Falloff;
pub use palette::Palette;
pub use particle::{Lifetime, Particle, ParticleStore, SpawnShape};
pub use prng::Xorshift64;
pub use render::Painter;
pub use surface::Surface;
