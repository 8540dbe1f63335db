//! Particle system context and frame driver.
//!
//! [`ParticleSystem`] owns everything one effect needs between frames: the
//! particle store, the emitter, and the projector's scratch buffers. The
//! frame-driving caller owns the system and passes in whatever changes per
//! frame (time step, view, source pose, random source, render sink).
//!
//! # Frame
//!
//! ```ignore
//! let mut system = ParticleSystem::new(ParticleConfig::default())?;
//! let mut rng = plume::random::from_entropy();
//!
//! loop {
//!     if thrusting {
//!         system.emit(ship_pose, &mut rng)?;
//!     }
//!     match system.frame(clock.tick(), &camera.view(), &mut sink) {
//!         Ok(_) => {}
//!         Err(err) if !err.is_fatal() => {} // clamped, already logged
//!         Err(err) => return Err(err.into()),
//!     }
//! }
//! ```

use crate::config::{OverflowPolicy, ParticleConfig};
use crate::emitter::ConeEmitter;
use crate::error::ParticleError;
use crate::integrator::{integrate, validate_dt};
use crate::lifecycle::ParticleStore;
use crate::particle::Particle;
use crate::projector::Projector;
use crate::random::RandomSource;
use crate::sink::RenderSink;
use glam::Mat4;
use tracing::{trace, warn};

/// Outcome of one simulation step.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct StepStats {
    /// Particles removed by the sweep.
    pub expired: usize,
    /// Particles stored after integration.
    pub particles: usize,
}

/// A particle effect: store, emitter and projector under one configuration.
#[derive(Clone, Debug)]
pub struct ParticleSystem {
    config: ParticleConfig,
    store: ParticleStore,
    emitter: ConeEmitter,
    projector: Projector,
}

impl ParticleSystem {
    /// Create a system, rejecting invalid configuration.
    pub fn new(config: ParticleConfig) -> Result<Self, ParticleError> {
        config.validate()?;
        let emitter = ConeEmitter::new(config.emitter.clone())?;
        let projector = Projector::new(config.max_capacity, config.overflow);
        Ok(Self {
            store: ParticleStore::with_capacity(config.max_capacity),
            emitter,
            projector,
            config,
        })
    }

    /// Active configuration.
    pub fn config(&self) -> &ParticleConfig {
        &self.config
    }

    /// Particle store.
    pub fn store(&self) -> &ParticleStore {
        &self.store
    }

    /// Emitter.
    pub fn emitter(&self) -> &ConeEmitter {
        &self.emitter
    }

    /// Stored particle count (see [`ParticleStore::len`]).
    pub fn len(&self) -> usize {
        self.store.len()
    }

    /// True if no particles are stored.
    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    /// Spawn a single particle.
    ///
    /// Under [`OverflowPolicy::RejectSpawns`] a full system refuses with
    /// [`ParticleError::CapacityExceeded`].
    pub fn spawn(&mut self, particle: Particle) -> Result<(), ParticleError> {
        if self.spawn_room() == Some(0) {
            return Err(self.refused(1));
        }
        self.store.spawn(particle)
    }

    /// Remove the particle at `index`.
    pub fn kill(&mut self, index: usize) -> Result<Particle, ParticleError> {
        self.store.kill(index)
    }

    /// Emit one configured batch from `source_pose`.
    pub fn emit<R: RandomSource + ?Sized>(
        &mut self,
        source_pose: Mat4,
        rng: &mut R,
    ) -> Result<usize, ParticleError> {
        self.trigger(source_pose, self.config.emitter.batch as usize, rng)
    }

    /// Emit `count` particles from `source_pose`.
    ///
    /// Under [`OverflowPolicy::RejectSpawns`] only the particles that fit are
    /// spawned and the shortfall is reported as `CapacityExceeded`.
    pub fn trigger<R: RandomSource + ?Sized>(
        &mut self,
        source_pose: Mat4,
        count: usize,
        rng: &mut R,
    ) -> Result<usize, ParticleError> {
        match self.spawn_room() {
            Some(room) if room < count => {
                self.emitter.trigger(&mut self.store, source_pose, room, rng)?;
                let err = self.refused(count - room);
                warn!(requested = count, spawned = room, "particle batch cut at capacity");
                Err(err)
            }
            _ => self.emitter.trigger(&mut self.store, source_pose, count, rng),
        }
    }

    /// Sweep expired particles, then advance the survivors by `dt`.
    ///
    /// A bad `dt` rejects the whole step; nothing is swept or moved.
    pub fn step(&mut self, dt: f32) -> Result<StepStats, ParticleError> {
        validate_dt(dt)?;
        let expired = self.store.sweep_expired();
        integrate(self.store.as_mut_slice(), dt)?;
        Ok(StepStats {
            expired,
            particles: self.store.len(),
        })
    }

    /// Project, sort and upload this frame's particles into `sink`.
    ///
    /// Returns how many records were uploaded. If the population had to be
    /// clamped, the clamped frame is still uploaded and `CapacityExceeded` is
    /// returned afterwards.
    pub fn render<S: RenderSink + ?Sized>(
        &mut self,
        view: &Mat4,
        sink: &mut S,
    ) -> Result<usize, ParticleError> {
        let limit = self.config.max_capacity.min(sink.capacity());
        if self.projector.capacity() != limit {
            self.projector.set_capacity(limit);
        }

        let projection = self.projector.project(self.store.as_slice(), view);
        sink.submit(projection.records)?;

        let drawn = projection.records.len();
        trace!(drawn, live = projection.live, "rendered particle frame");
        match projection.overflow() {
            Some(err) => {
                warn!(dropped = projection.dropped(), capacity = limit, "particle frame clamped to sink capacity");
                Err(err)
            }
            None => Ok(drawn),
        }
    }

    /// [`step`](Self::step) then [`render`](Self::render).
    pub fn frame<S: RenderSink + ?Sized>(
        &mut self,
        dt: f32,
        view: &Mat4,
        sink: &mut S,
    ) -> Result<usize, ParticleError> {
        self.step(dt)?;
        self.render(view, sink)
    }

    /// Remove every particle.
    pub fn clear(&mut self) {
        self.store.clear();
    }

    /// Free spawn slots, or `None` when spawns are never refused.
    fn spawn_room(&self) -> Option<usize> {
        match self.config.overflow {
            OverflowPolicy::RejectSpawns => Some(
                self.config
                    .max_capacity
                    .saturating_sub(self.store.live_count()),
            ),
            OverflowPolicy::KeepNewest | OverflowPolicy::KeepOldest => None,
        }
    }

    fn refused(&self, extra: usize) -> ParticleError {
        ParticleError::CapacityExceeded {
            live: self.store.live_count() + extra,
            capacity: self.config.max_capacity,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EmitterConfig;
    use crate::random::seeded;
    use crate::sink::VecSink;
    use glam::Vec3;

    fn small(capacity: usize, overflow: OverflowPolicy) -> ParticleSystem {
        let config = ParticleConfig::new()
            .with_max_capacity(capacity)
            .with_overflow(overflow)
            .with_emitter(EmitterConfig::jet(1.0, 0.95).with_batch(4));
        ParticleSystem::new(config).unwrap()
    }

    #[test]
    fn test_new_rejects_invalid_config() {
        let config = ParticleConfig::new().with_max_capacity(0);
        assert!(matches!(ParticleSystem::new(config), Err(ParticleError::InvalidConfig(_))));
    }

    #[test]
    fn test_step_rejects_negative_dt_without_sweeping() {
        let mut system = small(8, OverflowPolicy::KeepNewest);
        system.spawn(Particle::new(Vec3::ZERO, Vec3::X, 1.0)).unwrap();
        system.step(0.6).unwrap();
        system.step(0.6).unwrap();
        assert_eq!(system.len(), 1);

        assert!(system.step(-0.1).is_err());
        assert_eq!(system.len(), 1);
        assert_eq!(system.store().get(0).unwrap().age, 1.2);
    }

    #[test]
    fn test_emit_uses_batch_size() {
        let mut system = small(8, OverflowPolicy::KeepNewest);
        let mut rng = seeded(5);
        assert_eq!(system.emit(Mat4::IDENTITY, &mut rng).unwrap(), 4);
        assert_eq!(system.len(), 4);
    }

    #[test]
    fn test_reject_spawns_cuts_batch() {
        let mut system = small(6, OverflowPolicy::RejectSpawns);
        let mut rng = seeded(5);
        system.emit(Mat4::IDENTITY, &mut rng).unwrap();

        let err = system.emit(Mat4::IDENTITY, &mut rng).unwrap_err();
        assert_eq!(err, ParticleError::CapacityExceeded { live: 8, capacity: 6 });
        assert_eq!(system.len(), 6);

        assert!(system.spawn(Particle::new(Vec3::ZERO, Vec3::ZERO, 1.0)).is_err());
        assert_eq!(system.len(), 6);
    }

    #[test]
    fn test_render_clamps_to_smaller_sink() {
        let mut system = small(8, OverflowPolicy::KeepNewest);
        let mut rng = seeded(5);
        system.trigger(Mat4::IDENTITY, 6, &mut rng).unwrap();

        let mut sink = VecSink::new(4);
        let err = system.render(&Mat4::IDENTITY, &mut sink).unwrap_err();
        assert_eq!(err, ParticleError::CapacityExceeded { live: 6, capacity: 4 });
        assert_eq!(sink.records().len(), 4);
    }

    #[test]
    fn test_frame_reports_drawn_count() {
        let mut system = small(8, OverflowPolicy::KeepNewest);
        let mut rng = seeded(5);
        system.emit(Mat4::IDENTITY, &mut rng).unwrap();

        let mut sink = VecSink::new(8);
        assert_eq!(system.frame(0.1, &Mat4::IDENTITY, &mut sink).unwrap(), 4);
        assert!(sink.records().iter().all(|r| (r.normalized_age - 0.1).abs() < 1e-6));
    }
}
