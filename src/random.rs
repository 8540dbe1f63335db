//! Injected randomness for emitters.
//!
//! Emitters never reach for a global generator; they take a `&mut impl
//! RandomSource`. Any [`rand::Rng`] works, so a seeded [`SmallRng`] gives
//! reproducible batches in tests:
//!
//! ```ignore
//! let mut rng = plume::random::seeded(7);
//! emitter.trigger(&mut store, Mat4::IDENTITY, 64, &mut rng)?;
//! ```

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

/// Uniform sampler over a closed real interval.
pub trait RandomSource {
    /// Sample uniformly from `[min, max]`.
    ///
    /// Returns `min` when the interval is empty or a single point.
    fn uniform(&mut self, min: f32, max: f32) -> f32;
}

impl<R: Rng + ?Sized> RandomSource for R {
    #[inline]
    fn uniform(&mut self, min: f32, max: f32) -> f32 {
        if !(min < max) {
            return min;
        }
        self.gen_range(min..=max)
    }
}

/// Deterministic generator for a fixed seed.
pub fn seeded(seed: u64) -> SmallRng {
    SmallRng::seed_from_u64(seed)
}

/// Generator seeded from the operating system, different every run.
pub fn from_entropy() -> SmallRng {
    SmallRng::from_entropy()
}
