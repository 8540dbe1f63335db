//! View-space projection and back-to-front ordering.
//!
//! Alpha-blended point sprites composite correctly only when drawn
//! farthest-first. The projector moves every live particle into view space,
//! packs it with its normalized age, clamps the batch to the sink capacity,
//! and sorts by depth.
//!
//! View space looks down `-z`, so ascending `z` is back-to-front: for every
//! `i < j` in the output, `records[i].depth() <= records[j].depth()`.
//!
//! The output and index buffers are kept between frames so steady-state
//! projection does not allocate.

use crate::config::OverflowPolicy;
use crate::error::ParticleError;
use crate::particle::{Particle, SpriteRecord};
use glam::Mat4;

/// Reusable projection and depth-sort stage.
#[derive(Clone, Debug)]
pub struct Projector {
    capacity: usize,
    policy: OverflowPolicy,
    records: Vec<SpriteRecord>,
    kept: Vec<usize>,
}

/// Result of one projection pass.
#[derive(Debug)]
pub struct Projection<'a> {
    /// Back-to-front records, at most `capacity` long.
    pub records: &'a [SpriteRecord],
    /// Unexpired particles that were offered for projection.
    pub live: usize,
    /// Record limit the batch was clamped to.
    pub capacity: usize,
}

impl Projection<'_> {
    /// Particles left out of this frame's output.
    pub fn dropped(&self) -> usize {
        self.live - self.records.len()
    }

    /// [`ParticleError::CapacityExceeded`] if anything was dropped.
    pub fn overflow(&self) -> Option<ParticleError> {
        (self.dropped() > 0).then_some(ParticleError::CapacityExceeded {
            live: self.live,
            capacity: self.capacity,
        })
    }
}

impl Projector {
    /// Create a projector that emits at most `capacity` records per frame.
    ///
    /// `RejectSpawns` keeps the newest particles if the population still
    /// overflows.
    pub fn new(capacity: usize, policy: OverflowPolicy) -> Self {
        Self {
            capacity,
            policy,
            records: Vec::with_capacity(capacity),
            kept: Vec::new(),
        }
    }

    /// Record limit per frame.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Change the record limit, keeping the scratch buffers.
    pub fn set_capacity(&mut self, capacity: usize) {
        self.capacity = capacity;
    }

    /// Project `particles` through `view` and sort them back-to-front.
    ///
    /// Particles already past their life span are skipped; they wait in the
    /// store for the next sweep but are never drawn.
    pub fn project(&mut self, particles: &[Particle], view: &Mat4) -> Projection<'_> {
        self.kept.clear();
        self.kept
            .extend((0..particles.len()).filter(|&i| !particles[i].is_expired()));
        let live = self.kept.len();
        if live > self.capacity {
            self.select_survivors(particles);
        }

        self.records.clear();
        self.records
            .extend(self.kept.iter().map(|&i| pack(&particles[i], view)));
        self.records
            .sort_unstable_by(|a, b| a.depth().total_cmp(&b.depth()));

        Projection {
            records: &self.records,
            live,
            capacity: self.capacity,
        }
    }

    /// Shrink `kept` to the `capacity` particles the overflow policy prefers.
    fn select_survivors(&mut self, particles: &[Particle]) {
        let keep = self.capacity;
        if keep == 0 {
            self.kept.clear();
            return;
        }
        match self.policy {
            OverflowPolicy::KeepOldest => {
                self.kept
                    .select_nth_unstable_by(keep - 1, |&a, &b| particles[b].age.total_cmp(&particles[a].age));
            }
            OverflowPolicy::KeepNewest | OverflowPolicy::RejectSpawns => {
                self.kept
                    .select_nth_unstable_by(keep - 1, |&a, &b| particles[a].age.total_cmp(&particles[b].age));
            }
        }
        self.kept.truncate(keep);
    }
}

fn pack(particle: &Particle, view: &Mat4) -> SpriteRecord {
    SpriteRecord::new(view.transform_point3(particle.position), particle.normalized_age())
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    fn at(z: f32, age: f32) -> Particle {
        Particle {
            position: Vec3::new(0.0, 0.0, z),
            velocity: Vec3::ZERO,
            age,
            life_span: 2.0,
        }
    }

    #[test]
    fn test_sorted_back_to_front() {
        let particles = [at(-1.0, 0.0), at(-10.0, 0.0), at(3.0, 0.0), at(-5.0, 0.0)];
        let mut projector = Projector::new(16, OverflowPolicy::KeepNewest);
        let projection = projector.project(&particles, &Mat4::IDENTITY);

        let depths: Vec<f32> = projection.records.iter().map(|r| r.depth()).collect();
        assert_eq!(depths, vec![-10.0, -5.0, -1.0, 3.0]);
        assert!(projection.overflow().is_none());
    }

    #[test]
    fn test_view_transform_and_age_ratio() {
        let eye = Vec3::new(0.0, 0.0, 10.0);
        let view = Mat4::look_at_rh(eye, Vec3::ZERO, Vec3::Y);
        let particles = [at(0.0, 1.0), at(5.0, 0.5)];
        let mut projector = Projector::new(16, OverflowPolicy::KeepNewest);
        let projection = projector.project(&particles, &view);

        // Origin is 10 units in front of the eye, z = 5 is 5 units in front.
        assert!((projection.records[0].depth() + 10.0).abs() < 1e-5);
        assert!((projection.records[0].normalized_age - 0.5).abs() < 1e-6);
        assert!((projection.records[1].depth() + 5.0).abs() < 1e-5);
        assert!((projection.records[1].normalized_age - 0.25).abs() < 1e-6);
    }

    #[test]
    fn test_keep_newest_clamps() {
        let particles: Vec<Particle> = (0..10).map(|i| at(i as f32, i as f32 * 0.1)).collect();
        let mut projector = Projector::new(4, OverflowPolicy::KeepNewest);
        let projection = projector.project(&particles, &Mat4::IDENTITY);

        assert_eq!(projection.records.len(), 4);
        assert_eq!(projection.dropped(), 6);
        let depths: Vec<f32> = projection.records.iter().map(|r| r.depth()).collect();
        assert_eq!(depths, vec![0.0, 1.0, 2.0, 3.0]);
        assert_eq!(
            projection.overflow(),
            Some(ParticleError::CapacityExceeded { live: 10, capacity: 4 })
        );
    }

    #[test]
    fn test_keep_oldest_clamps() {
        let particles: Vec<Particle> = (0..10).map(|i| at(i as f32, i as f32 * 0.1)).collect();
        let mut projector = Projector::new(3, OverflowPolicy::KeepOldest);
        let projection = projector.project(&particles, &Mat4::IDENTITY);

        let depths: Vec<f32> = projection.records.iter().map(|r| r.depth()).collect();
        assert_eq!(depths, vec![7.0, 8.0, 9.0]);
    }

    #[test]
    fn test_expired_particles_not_drawn() {
        let mut expired = at(-3.0, 0.0);
        expired.age = 2.5;
        let particles = [at(-1.0, 2.0), expired, at(-2.0, 0.5)];
        let mut projector = Projector::new(16, OverflowPolicy::KeepNewest);
        let projection = projector.project(&particles, &Mat4::IDENTITY);

        assert_eq!(projection.live, 2);
        assert_eq!(projection.records.len(), 2);
        assert!(projection.records.iter().all(|r| (0.0..=1.0).contains(&r.normalized_age)));
        assert_eq!(projection.records[1].normalized_age, 1.0);
    }

    #[test]
    fn test_scratch_reused_between_frames() {
        let particles: Vec<Particle> = (0..8).map(|i| at(-(i as f32), 0.0)).collect();
        let mut projector = Projector::new(8, OverflowPolicy::KeepNewest);
        projector.project(&particles, &Mat4::IDENTITY);
        let ptr = projector.records.as_ptr();
        projector.project(&particles[..5], &Mat4::IDENTITY);
        assert_eq!(projector.records.as_ptr(), ptr);
        assert_eq!(projector.records.len(), 5);
    }
}
