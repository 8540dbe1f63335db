//! wgpu render sink.
//!
//! [`SpriteBuffer`] owns a vertex buffer sized for a fixed number of
//! [`SpriteRecord`]s. Each frame the records are written through the queue and
//! drawn as one point list:
//!
//! ```ignore
//! let mut sprites = SpriteBuffer::new(&device, config.max_capacity);
//!
//! // per frame
//! let result = system.render(view, &mut sprites.sink(&queue));
//! sprites.draw(&mut pass); // caller has set a PointList pipeline
//! ```
//!
//! The pipeline and shader belong to the host; use [`SpriteRecord::layout`],
//! [`SpriteBuffer::primitive`] and [`SpriteBuffer::BLEND`] when building it.

use crate::error::ParticleError;
use crate::particle::SpriteRecord;
use crate::sink::{check_fits, RenderSink};
use tracing::trace;

/// Fixed-capacity GPU buffer of sprite records.
pub struct SpriteBuffer {
    buffer: wgpu::Buffer,
    capacity: usize,
    count: u32,
}

impl SpriteBuffer {
    /// Straight alpha blending, correct for back-to-front sprites.
    pub const BLEND: wgpu::BlendState = wgpu::BlendState::ALPHA_BLENDING;

    /// Allocate a buffer for `capacity` records.
    pub fn new(device: &wgpu::Device, capacity: usize) -> Self {
        let buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Particle Sprite Buffer"),
            size: Self::byte_size(capacity),
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        Self {
            buffer,
            capacity,
            count: 0,
        }
    }

    /// Bytes needed for `capacity` records.
    pub fn byte_size(capacity: usize) -> wgpu::BufferAddress {
        (capacity * std::mem::size_of::<SpriteRecord>()) as wgpu::BufferAddress
    }

    /// Primitive state for drawing one point per record.
    pub fn primitive() -> wgpu::PrimitiveState {
        wgpu::PrimitiveState {
            topology: wgpu::PrimitiveTopology::PointList,
            ..Default::default()
        }
    }

    /// Record limit.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Records uploaded by the last accepted submission.
    pub fn count(&self) -> u32 {
        self.count
    }

    /// Underlying vertex buffer.
    pub fn buffer(&self) -> &wgpu::Buffer {
        &self.buffer
    }

    /// Sink that uploads through `queue` for this frame.
    pub fn sink<'a>(&'a mut self, queue: &'a wgpu::Queue) -> QueueSink<'a> {
        QueueSink { target: self, queue }
    }

    /// Bind the buffer and draw every uploaded record as a point.
    pub fn draw(&self, pass: &mut wgpu::RenderPass<'_>) {
        if self.count == 0 {
            return;
        }
        pass.set_vertex_buffer(0, self.buffer.slice(..Self::byte_size(self.count as usize)));
        pass.draw(0..self.count, 0..1);
    }
}

/// [`RenderSink`] writing into a [`SpriteBuffer`] through a queue.
pub struct QueueSink<'a> {
    target: &'a mut SpriteBuffer,
    queue: &'a wgpu::Queue,
}

impl RenderSink for QueueSink<'_> {
    fn capacity(&self) -> usize {
        self.target.capacity
    }

    fn submit(&mut self, records: &[SpriteRecord]) -> Result<(), ParticleError> {
        check_fits(records, self.target.capacity)?;
        if !records.is_empty() {
            self.queue
                .write_buffer(&self.target.buffer, 0, bytemuck::cast_slice(records));
        }
        self.target.count = records.len() as u32;
        trace!(count = records.len(), "uploaded particle sprites");
        Ok(())
    }
}
