//! # Plume
//!
//! Short-lived point particles emitted from a moving source, simulated on the
//! CPU and handed to the GPU as a depth-sorted point-sprite buffer.
//!
//! Plume owns the particle lifecycle only. Windowing, cameras, shaders and
//! the draw pipeline stay with the host; each frame the host supplies a time
//! step, a view matrix, the source pose and a random source, and gets back a
//! back-to-front buffer of `{x, y, z, normalized_age}` records.
//!
//! ## Quick Start
//!
//! ```ignore
//! use plume::prelude::*;
//!
//! let mut system = ParticleSystem::new(ParticleConfig::default())?;
//! let mut rng = plume::random::seeded(7);
//! let mut sink = VecSink::new(system.config().max_capacity);
//!
//! system.emit(ship_pose, &mut rng)?;          // 64 particles in a cone
//! system.frame(1.0 / 60.0, &view, &mut sink)?; // sweep, integrate, project, upload
//! ```
//!
//! ## Frame Order
//!
//! | Phase | Where |
//! |-------|-------|
//! | Emit (on trigger) | [`ConeEmitter::trigger`] / [`ParticleSystem::emit`] |
//! | Sweep expired | [`ParticleStore::sweep_expired`] |
//! | Integrate | [`integrator::integrate`] |
//! | Project + sort | [`Projector::project`] |
//! | Upload + draw | [`RenderSink`], [`gpu::SpriteBuffer`] |
//!
//! Sweeping runs before integration, so a particle that crosses its life span
//! in one step is removed at the start of the next. In between it is skipped
//! by the projector.
//!
//! ## Capacity
//!
//! The store grows freely; the render sink does not. The per-frame output is
//! clamped to [`ParticleConfig::max_capacity`] according to
//! [`OverflowPolicy`], and clamping is reported as
//! [`ParticleError::CapacityExceeded`] after the clamped frame is uploaded.

pub mod config;
pub mod emitter;
pub mod error;
pub mod gpu;
pub mod integrator;
pub mod lifecycle;
mod particle;
pub mod projector;
pub mod random;
mod simulation;
pub mod sink;
pub mod time;

pub use bytemuck;
pub use config::{EmitterConfig, OverflowPolicy, ParticleConfig};
pub use emitter::ConeEmitter;
pub use error::ParticleError;
pub use glam::{Mat4, Quat, Vec3};
pub use lifecycle::ParticleStore;
pub use particle::{Particle, SpriteRecord};
pub use projector::{Projection, Projector};
pub use random::RandomSource;
pub use simulation::{ParticleSystem, StepStats};
pub use sink::{RenderSink, VecSink};
pub use time::FrameClock;

/// Prelude module for convenient imports.
///
/// ```ignore
/// use plume::prelude::*;
/// ```
pub mod prelude {
    pub use crate::config::{EmitterConfig, OverflowPolicy, ParticleConfig};
    pub use crate::emitter::ConeEmitter;
    pub use crate::error::ParticleError;
    pub use crate::gpu::SpriteBuffer;
    pub use crate::lifecycle::ParticleStore;
    pub use crate::particle::{Particle, SpriteRecord};
    pub use crate::projector::Projector;
    pub use crate::random::RandomSource;
    pub use crate::simulation::{ParticleSystem, StepStats};
    pub use crate::sink::{RenderSink, VecSink};
    pub use crate::time::FrameClock;
    pub use crate::{Mat4, Quat, Vec3};
}
