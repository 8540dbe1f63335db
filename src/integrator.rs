//! Constant-velocity integration.

use crate::error::ParticleError;
use crate::particle::Particle;

/// Reject a time step that is negative or not finite.
pub fn validate_dt(dt: f32) -> Result<(), ParticleError> {
    if dt.is_finite() && dt >= 0.0 {
        Ok(())
    } else {
        Err(ParticleError::InvalidDuration { dt })
    }
}

/// Advance every particle by `dt` seconds.
///
/// `position += velocity * dt` and `age += dt`; velocity is left unchanged.
/// A bad `dt` is rejected before any particle is touched. `dt == 0` leaves
/// every particle exactly as it was.
///
/// Callers sweep expired particles first so nothing is advanced past its own
/// expiry.
pub fn integrate(particles: &mut [Particle], dt: f32) -> Result<(), ParticleError> {
    validate_dt(dt)?;
    if dt == 0.0 {
        return Ok(());
    }
    for p in particles.iter_mut() {
        p.position += p.velocity * dt;
        p.age += dt;
    }
    Ok(())
}
