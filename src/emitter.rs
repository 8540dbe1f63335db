//! Cone emitter driven by a moving source.
//!
//! Each trigger spawns a batch of particles at the source's emission point
//! with velocities drawn from a cone:
//!
//! 1. azimuth `theta` uniform in `[0, 2pi]`
//! 2. polar cosine `u` uniform in `[cos_min, cos_max]` (default `[0.95, 1.0]`)
//! 3. local direction `(sqrt(1 - u^2) cos theta, u, sqrt(1 - u^2) sin theta)`
//!    around `+Y`, scaled by `speed`
//! 4. rotated by the configured cone orientation, then by the source pose's
//!    rotation (translation is ignored for velocities)
//!
//! Sampling `u` instead of the angle itself keeps directions clustered near
//! the axis while still spreading them around it.
//!
//! # Example
//!
//! ```ignore
//! let emitter = ConeEmitter::new(EmitterConfig::exhaust())?;
//! let mut rng = plume::random::seeded(3);
//! emitter.trigger(&mut store, ship_pose, 64, &mut rng)?;
//! ```

use crate::config::EmitterConfig;
use crate::error::ParticleError;
use crate::lifecycle::ParticleStore;
use crate::particle::Particle;
use crate::random::RandomSource;
use glam::{Mat4, Vec3, Vec4};
use std::f32::consts::TAU;
use tracing::debug;

const ORTHONORMAL_TOLERANCE: f32 = 1e-3;

/// Spawns batches of particles in a cone around the source's forward axis.
#[derive(Clone, Debug)]
pub struct ConeEmitter {
    config: EmitterConfig,
}

impl ConeEmitter {
    /// Create an emitter, rejecting out-of-range parameters.
    pub fn new(config: EmitterConfig) -> Result<Self, ParticleError> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Emitter parameters.
    pub fn config(&self) -> &EmitterConfig {
        &self.config
    }

    /// One unit direction in the cone's local frame (axis `+Y`).
    pub fn sample_direction<R: RandomSource + ?Sized>(&self, rng: &mut R) -> Vec3 {
        let theta = rng.uniform(0.0, TAU);
        let u = rng.uniform(self.config.cos_min, self.config.cos_max);
        let radial = (1.0 - u * u).max(0.0).sqrt();
        Vec3::new(radial * theta.cos(), u, radial * theta.sin())
    }

    /// Cone axis in world space for the given source pose.
    pub fn world_axis(&self, source_pose: &Mat4) -> Vec3 {
        source_pose.transform_vector3(self.config.orientation * Vec3::Y)
    }

    /// World-space emission point for the given source pose.
    pub fn emission_point(&self, source_pose: &Mat4) -> Vec3 {
        source_pose.transform_point3(self.config.offset)
    }

    /// Spawn `count` particles from the source's current pose.
    ///
    /// Returns the number spawned. A degenerate pose spawns nothing.
    pub fn trigger<R: RandomSource + ?Sized>(
        &self,
        store: &mut ParticleStore,
        source_pose: Mat4,
        count: usize,
        rng: &mut R,
    ) -> Result<usize, ParticleError> {
        check_pose(&source_pose)?;

        let origin = self.emission_point(&source_pose);
        for _ in 0..count {
            let local = self.config.orientation * self.sample_direction(rng) * self.config.speed;
            let velocity = source_pose.transform_vector3(local);
            store.spawn(Particle::new(origin, velocity, self.config.life_span))?;
        }

        debug!(count, origin = ?origin, "emitted particle batch");
        Ok(count)
    }
}

/// Check that `pose` is finite, affine, and has an orthonormal rotation.
pub fn check_pose(pose: &Mat4) -> Result<(), ParticleError> {
    if !pose.is_finite() || !pose.row(3).abs_diff_eq(Vec4::W, ORTHONORMAL_TOLERANCE) {
        return Err(ParticleError::DegenerateSourcePose);
    }

    let [x, y, z] = [pose.x_axis.truncate(), pose.y_axis.truncate(), pose.z_axis.truncate()];
    let unit = [x, y, z]
        .iter()
        .all(|axis| (axis.length_squared() - 1.0).abs() <= ORTHONORMAL_TOLERANCE);
    let orthogonal = [x.dot(y), y.dot(z), z.dot(x)]
        .iter()
        .all(|d| d.abs() <= ORTHONORMAL_TOLERANCE);

    if unit && orthogonal {
        Ok(())
    } else {
        Err(ParticleError::DegenerateSourcePose)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random::seeded;
    use glam::Quat;

    fn jet() -> ConeEmitter {
        ConeEmitter::new(EmitterConfig::jet(5.0, 0.95)).unwrap()
    }

    #[test]
    fn test_directions_stay_in_cone() {
        let emitter = jet();
        let mut rng = seeded(9);
        for _ in 0..500 {
            let dir = emitter.sample_direction(&mut rng);
            assert!((dir.length() - 1.0).abs() < 1e-5);
            assert!(dir.y >= 0.95 - 1e-6);
        }
    }

    #[test]
    fn test_trigger_uses_pose() {
        let emitter = ConeEmitter::new(EmitterConfig::jet(2.0, 1.0).with_offset(Vec3::new(1.0, 0.0, 0.0))).unwrap();
        let pose = Mat4::from_rotation_translation(Quat::from_rotation_z(std::f32::consts::FRAC_PI_2), Vec3::new(0.0, 0.0, 5.0));
        let mut store = ParticleStore::new();
        let mut rng = seeded(1);

        assert_eq!(emitter.trigger(&mut store, pose, 3, &mut rng).unwrap(), 3);

        for p in &store {
            // Local +X offset rotated to +Y, then translated.
            assert!((p.position - Vec3::new(0.0, 1.0, 5.0)).length() < 1e-5);
            // Laser cone along +Y rotated a quarter turn about Z points along -X.
            assert!((p.velocity - Vec3::new(-2.0, 0.0, 0.0)).length() < 1e-5);
            assert_eq!(p.age, 0.0);
        }
    }

    #[test]
    fn test_exhaust_axis_follows_source() {
        let emitter = ConeEmitter::new(EmitterConfig::exhaust()).unwrap();
        let axis = emitter.world_axis(&Mat4::IDENTITY);
        assert!((axis - Vec3::X).length() < 1e-6);
        assert_eq!(emitter.emission_point(&Mat4::IDENTITY), Vec3::new(18.0, 3.0, 0.0));
    }

    #[test]
    fn test_degenerate_pose_spawns_nothing() {
        let emitter = jet();
        let mut store = ParticleStore::new();
        let mut rng = seeded(1);

        for pose in [
            Mat4::from_scale(Vec3::splat(2.0)),
            Mat4::ZERO,
            Mat4::from_cols_array(&[f32::NAN; 16]),
        ] {
            assert_eq!(
                emitter.trigger(&mut store, pose, 8, &mut rng),
                Err(ParticleError::DegenerateSourcePose)
            );
        }
        assert!(store.is_empty());
    }

    #[test]
    fn test_rigid_pose_accepted() {
        let pose = Mat4::from_rotation_translation(Quat::from_euler(glam::EulerRot::XYZ, 0.3, -1.2, 2.0), Vec3::splat(-4.0));
        assert!(check_pose(&pose).is_ok());
    }
}
