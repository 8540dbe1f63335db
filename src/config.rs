//! Particle system configuration.
//!
//! Configuration is plain data: build it with the `with_*` chain or
//! deserialize it from any serde format, then hand it to
//! [`ParticleSystem::new`](crate::ParticleSystem::new), which validates it.
//!
//! ```ignore
//! let config = ParticleConfig::new()
//!     .with_max_capacity(20_000)
//!     .with_overflow(OverflowPolicy::KeepOldest)
//!     .with_emitter(EmitterConfig::jet(25.0, 0.99));
//! ```

use crate::error::ParticleError;
use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};
use std::f32::consts::FRAC_PI_2;

/// Record limit of the render sink when none is configured.
pub const DEFAULT_MAX_CAPACITY: usize = 10_000;

/// What to do when the live population exceeds the sink capacity.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OverflowPolicy {
    /// Draw the youngest `max_capacity` particles.
    #[default]
    KeepNewest,
    /// Draw the oldest `max_capacity` particles.
    KeepOldest,
    /// Refuse spawns that would push the population past `max_capacity`.
    RejectSpawns,
}

/// Cone emitter parameters.
///
/// Directions are sampled around the local `+Y` axis, rotated by
/// `orientation`, then by the source pose's rotation.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EmitterConfig {
    /// Initial speed of every emitted particle.
    pub speed: f32,
    /// Life span given to every particle of a batch, in seconds.
    pub life_span: f32,
    /// Lower bound of the sampled polar-angle cosine.
    pub cos_min: f32,
    /// Upper bound of the sampled polar-angle cosine.
    pub cos_max: f32,
    /// Emission point in the source's local frame.
    pub offset: Vec3,
    /// Local rotation applied to the cone before the source rotation.
    pub orientation: Quat,
    /// Particles spawned per trigger by [`ParticleSystem::emit`](crate::ParticleSystem::emit).
    pub batch: u32,
}

impl EmitterConfig {
    /// Engine exhaust: a narrow jet out of the source's `+X` side.
    pub fn exhaust() -> Self {
        Self {
            speed: 10.0,
            life_span: 1.0,
            cos_min: 0.95,
            cos_max: 1.0,
            offset: Vec3::new(18.0, 3.0, 0.0),
            orientation: Quat::from_rotation_z(-FRAC_PI_2),
            batch: 64,
        }
    }

    /// Jet along the source's local `+Y` axis from its origin.
    ///
    /// `spread_cos` is the smallest polar-angle cosine; `1.0` is a laser.
    pub fn jet(speed: f32, spread_cos: f32) -> Self {
        Self {
            speed,
            cos_min: spread_cos,
            offset: Vec3::ZERO,
            orientation: Quat::IDENTITY,
            ..Self::exhaust()
        }
    }

    /// Set the particle speed.
    pub fn with_speed(mut self, speed: f32) -> Self {
        self.speed = speed;
        self
    }

    /// Set the life span given to emitted particles.
    pub fn with_life_span(mut self, life_span: f32) -> Self {
        self.life_span = life_span;
        self
    }

    /// Set the sampled polar-angle cosine band.
    pub fn with_cos_band(mut self, cos_min: f32, cos_max: f32) -> Self {
        self.cos_min = cos_min;
        self.cos_max = cos_max;
        self
    }

    /// Set the local emission point.
    pub fn with_offset(mut self, offset: Vec3) -> Self {
        self.offset = offset;
        self
    }

    /// Set the local cone orientation.
    pub fn with_orientation(mut self, orientation: Quat) -> Self {
        self.orientation = orientation;
        self
    }

    /// Set the batch size used per trigger.
    pub fn with_batch(mut self, batch: u32) -> Self {
        self.batch = batch;
        self
    }

    /// Check every field is in range.
    pub fn validate(&self) -> Result<(), ParticleError> {
        if !(self.speed.is_finite() && self.speed >= 0.0) {
            return Err(invalid(format!("speed {} must be finite and >= 0", self.speed)));
        }
        if !(self.life_span > 0.0) {
            return Err(ParticleError::InvalidLifeSpan {
                life_span: self.life_span,
            });
        }
        let band = -1.0..=1.0;
        if !band.contains(&self.cos_min) || !band.contains(&self.cos_max) || self.cos_min > self.cos_max {
            return Err(invalid(format!(
                "cosine band [{}, {}] must lie within [-1, 1] with min <= max",
                self.cos_min, self.cos_max
            )));
        }
        if !self.offset.is_finite() {
            return Err(invalid("emission offset must be finite".into()));
        }
        if !self.orientation.is_normalized() {
            return Err(invalid("cone orientation must be a unit quaternion".into()));
        }
        Ok(())
    }
}

impl Default for EmitterConfig {
    fn default() -> Self {
        Self::exhaust()
    }
}

/// Top-level particle system configuration.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParticleConfig {
    /// Fixed record limit of the render sink.
    pub max_capacity: usize,
    /// Overflow handling once the population exceeds `max_capacity`.
    pub overflow: OverflowPolicy,
    /// Emitter parameters.
    pub emitter: EmitterConfig,
}

impl ParticleConfig {
    /// Create a configuration with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the sink record limit.
    pub fn with_max_capacity(mut self, max_capacity: usize) -> Self {
        self.max_capacity = max_capacity;
        self
    }

    /// Set the overflow policy.
    pub fn with_overflow(mut self, overflow: OverflowPolicy) -> Self {
        self.overflow = overflow;
        self
    }

    /// Set the emitter parameters.
    pub fn with_emitter(mut self, emitter: EmitterConfig) -> Self {
        self.emitter = emitter;
        self
    }

    /// Check every field is in range.
    pub fn validate(&self) -> Result<(), ParticleError> {
        if self.max_capacity == 0 {
            return Err(invalid("max_capacity must be greater than zero".into()));
        }
        self.emitter.validate()
    }
}

impl Default for ParticleConfig {
    fn default() -> Self {
        Self {
            max_capacity: DEFAULT_MAX_CAPACITY,
            overflow: OverflowPolicy::default(),
            emitter: EmitterConfig::default(),
        }
    }
}

fn invalid(message: String) -> ParticleError {
    ParticleError::InvalidConfig(message)
}
