//! Render sink boundary.
//!
//! A render sink takes the back-to-front records of one frame, uploads them
//! into storage of fixed size, and draws exactly that many points. The core
//! never hands a sink more than [`RenderSink::capacity`] records; a sink
//! handed more must refuse the whole upload rather than overrun its storage.

use crate::error::ParticleError;
use crate::particle::SpriteRecord;

/// Consumer of the per-frame sprite buffer.
pub trait RenderSink {
    /// Fixed number of records the sink can hold.
    fn capacity(&self) -> usize;

    /// Replace the sink's contents with `records`.
    fn submit(&mut self, records: &[SpriteRecord]) -> Result<(), ParticleError>;
}

/// Returns `CapacityExceeded` if `records` does not fit `capacity`.
pub fn check_fits(records: &[SpriteRecord], capacity: usize) -> Result<(), ParticleError> {
    if records.len() > capacity {
        Err(ParticleError::CapacityExceeded {
            live: records.len(),
            capacity,
        })
    } else {
        Ok(())
    }
}

/// CPU-side sink that keeps the last submitted frame.
///
/// Useful for headless hosts, tests, and debugging what would be uploaded.
#[derive(Clone, Debug)]
pub struct VecSink {
    capacity: usize,
    records: Vec<SpriteRecord>,
    submissions: u64,
}

impl VecSink {
    /// Create a sink holding at most `capacity` records.
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            records: Vec::with_capacity(capacity),
            submissions: 0,
        }
    }

    /// Records from the last accepted submission.
    pub fn records(&self) -> &[SpriteRecord] {
        &self.records
    }

    /// Number of accepted submissions.
    pub fn submissions(&self) -> u64 {
        self.submissions
    }
}

impl RenderSink for VecSink {
    fn capacity(&self) -> usize {
        self.capacity
    }

    fn submit(&mut self, records: &[SpriteRecord]) -> Result<(), ParticleError> {
        check_fits(records, self.capacity)?;
        self.records.clear();
        self.records.extend_from_slice(records);
        self.submissions += 1;
        Ok(())
    }
}
