//! Error types for Plume.
//!
//! Every fallible operation in the crate returns [`ParticleError`]. None of
//! these conditions is fatal to the host: the worst outcome is a rejected call
//! or a clamped frame of particles.

use thiserror::Error;

/// Errors raised by the particle store, integrator, emitter and render boundary.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParticleError {
    /// Spawn requested with a life span that is zero, negative or NaN.
    #[error("invalid life span {life_span}: must be greater than zero")]
    InvalidLifeSpan {
        /// The rejected life span in seconds.
        life_span: f32,
    },

    /// Negative (or NaN) time step passed to the integrator.
    #[error("invalid time step {dt}: must be zero or positive")]
    InvalidDuration {
        /// The rejected time step in seconds.
        dt: f32,
    },

    /// Removal of a particle that does not exist.
    #[error("particle index {index} out of range for {len} live particles")]
    IndexOutOfRange {
        /// Requested index.
        index: usize,
        /// Live particle count at the time of the call.
        len: usize,
    },

    /// The live population does not fit the sink's fixed buffer.
    ///
    /// Raised after the overflow policy has been applied; the frame that
    /// reported it was still drawn with `capacity` records.
    #[error("{live} live particles exceed sink capacity {capacity}")]
    CapacityExceeded {
        /// Particles that wanted to be drawn (or spawned).
        live: usize,
        /// Fixed record limit of the sink.
        capacity: usize,
    },

    /// Source pose is non-finite or its rotation is not orthonormal.
    #[error("emitter source pose is not a rigid transform")]
    DegenerateSourcePose,

    /// A configuration value is out of range.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

impl ParticleError {
    /// Whether the host should stop because of this error.
    ///
    /// Always `false`: particle errors drop or clamp work, they never corrupt
    /// the particle sequence.
    pub fn is_fatal(&self) -> bool {
        false
    }
}
