//! Particle store and lifecycle management.
//!
//! [`ParticleStore`] owns the live particles in a growable sequence. It has no
//! capacity of its own; the fixed limit belongs to the render sink and is
//! applied by [`ParticleSystem`](crate::ParticleSystem) and the
//! [`Projector`](crate::Projector).
//!
//! # Frame order
//!
//! ```ignore
//! store.sweep_expired();              // drop every particle with age > life_span
//! integrate(store.as_mut_slice(), dt) // then advance the survivors
//! ```
//!
//! Sweeping first means a particle that crossed its life span during the
//! previous step is removed before it can be advanced again, but it may still
//! be drawn for the frame in which it crossed.

use crate::error::ParticleError;
use crate::particle::Particle;
use tracing::debug;

/// Live particle storage.
///
/// Element order has no simulation meaning, but it is the order particles are
/// projected in before sorting, and sweeping preserves it.
#[derive(Clone, Debug, Default)]
pub struct ParticleStore {
    particles: Vec<Particle>,
}

impl ParticleStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty store with room for `capacity` particles before reallocating.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            particles: Vec::with_capacity(capacity),
        }
    }

    /// Append a particle, resetting its age to zero.
    ///
    /// Fails with [`ParticleError::InvalidLifeSpan`] if `life_span <= 0`
    /// (or NaN); the store is left untouched in that case.
    pub fn spawn(&mut self, particle: Particle) -> Result<(), ParticleError> {
        if !(particle.life_span > 0.0) {
            return Err(ParticleError::InvalidLifeSpan {
                life_span: particle.life_span,
            });
        }
        self.particles.push(Particle { age: 0.0, ..particle });
        Ok(())
    }

    /// Remove the particle at `index`, shifting later particles down.
    pub fn kill(&mut self, index: usize) -> Result<Particle, ParticleError> {
        if index >= self.particles.len() {
            return Err(ParticleError::IndexOutOfRange {
                index,
                len: self.particles.len(),
            });
        }
        Ok(self.particles.remove(index))
    }

    /// Remove every particle with `age > life_span` in one stable pass.
    ///
    /// Returns how many particles were removed. Adjacent expired particles are
    /// all removed; survivors keep their relative order.
    pub fn sweep_expired(&mut self) -> usize {
        let before = self.particles.len();
        self.particles.retain(|p| !p.is_expired());
        let removed = before - self.particles.len();
        if removed > 0 {
            debug!(removed, live = self.particles.len(), "swept expired particles");
        }
        removed
    }

    /// Number of stored particles, including any expired ones awaiting the next sweep.
    #[inline]
    pub fn len(&self) -> usize {
        self.particles.len()
    }

    /// Number of stored particles that have not yet passed their life span.
    ///
    /// Differs from [`len`](Self::len) only between an integration step and
    /// the next sweep.
    pub fn live_count(&self) -> usize {
        self.particles.iter().filter(|p| !p.is_expired()).count()
    }

    /// True if no particles are stored.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    /// Particle at `index`, if any.
    pub fn get(&self, index: usize) -> Option<&Particle> {
        self.particles.get(index)
    }

    /// Iterate live particles in store order.
    pub fn iter(&self) -> std::slice::Iter<'_, Particle> {
        self.particles.iter()
    }

    /// Live particles as a slice.
    pub fn as_slice(&self) -> &[Particle] {
        &self.particles
    }

    /// Live particles as a mutable slice, for the integrator.
    ///
    /// The slice cannot grow or shrink the store, so spawn and kill stay the
    /// only ways to change the population.
    pub fn as_mut_slice(&mut self) -> &mut [Particle] {
        &mut self.particles
    }

    /// Remove all particles.
    pub fn clear(&mut self) {
        self.particles.clear();
    }
}

impl<'a> IntoIterator for &'a ParticleStore {
    type Item = &'a Particle;
    type IntoIter = std::slice::Iter<'a, Particle>;

    fn into_iter(self) -> Self::IntoIter {
        self.particles.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    fn aged(age: f32, life_span: f32, tag: f32) -> Particle {
        Particle {
            position: Vec3::splat(tag),
            velocity: Vec3::ZERO,
            age,
            life_span,
        }
    }

    #[test]
    fn test_spawn_resets_age() {
        let mut store = ParticleStore::new();
        store.spawn(aged(5.0, 1.0, 0.0)).unwrap();
        assert_eq!(store.len(), 1);
        assert_eq!(store.get(0).unwrap().age, 0.0);
    }

    #[test]
    fn test_spawn_rejects_bad_life_span() {
        let mut store = ParticleStore::new();
        for life_span in [0.0, -1.0, f32::NAN] {
            let err = store.spawn(aged(0.0, life_span, 0.0)).unwrap_err();
            assert!(matches!(err, ParticleError::InvalidLifeSpan { .. }));
        }
        assert!(store.is_empty());
    }

    #[test]
    fn test_kill_removes_and_shifts() {
        let mut store = ParticleStore::new();
        for tag in 0..3 {
            store.spawn(aged(0.0, 1.0, tag as f32)).unwrap();
        }
        let killed = store.kill(1).unwrap();
        assert_eq!(killed.position, Vec3::splat(1.0));
        assert_eq!(store.get(1).unwrap().position, Vec3::splat(2.0));
    }

    #[test]
    fn test_kill_out_of_range() {
        let mut store = ParticleStore::new();
        assert_eq!(
            store.kill(0),
            Err(ParticleError::IndexOutOfRange { index: 0, len: 0 })
        );
    }

    #[test]
    fn test_sweep_removes_adjacent_expired() {
        let mut store = ParticleStore::new();
        for tag in 0..6 {
            store.spawn(aged(0.0, 1.0, tag as f32)).unwrap();
        }
        // Expire 1, 2, 3 (adjacent) and 5 (last).
        for i in [1, 2, 3, 5] {
            store.as_mut_slice()[i].age = 1.5;
        }

        assert_eq!(store.sweep_expired(), 4);
        let tags: Vec<f32> = store.iter().map(|p| p.position.x).collect();
        assert_eq!(tags, vec![0.0, 4.0]);
        assert!(store.iter().all(|p| p.age <= p.life_span));
    }

    #[test]
    fn test_sweep_keeps_particle_at_exact_life_span() {
        let mut store = ParticleStore::new();
        store.spawn(aged(0.0, 1.0, 0.0)).unwrap();
        store.as_mut_slice()[0].age = 1.0;
        assert_eq!(store.sweep_expired(), 0);
        assert_eq!(store.len(), 1);
    }
}
