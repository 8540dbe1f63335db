//! Particle records.
//!
//! [`Particle`] is the CPU-side simulation state. [`SpriteRecord`] is the
//! fixed-layout record handed to the render sink, one per drawn point.

use bytemuck::{Pod, Zeroable};
use glam::Vec3;

/// A short-lived point particle.
///
/// A particle is live while `age <= life_span`. Once `age` exceeds
/// `life_span` the next sweep removes it.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Particle {
    /// World-space position.
    pub position: Vec3,
    /// World-space velocity in units per second.
    pub velocity: Vec3,
    /// Seconds since spawn.
    pub age: f32,
    /// Seconds until expiry.
    pub life_span: f32,
}

impl Particle {
    /// Create a fresh particle with `age = 0`.
    pub fn new(position: Vec3, velocity: Vec3, life_span: f32) -> Self {
        Self {
            position,
            velocity,
            age: 0.0,
            life_span,
        }
    }

    /// True once the particle has outlived its life span.
    #[inline]
    pub fn is_expired(&self) -> bool {
        self.age > self.life_span
    }

    /// `age / life_span`, in `[0, 1]` for live particles.
    #[inline]
    pub fn normalized_age(&self) -> f32 {
        self.age / self.life_span
    }
}

/// GPU record for one point sprite: view-space position plus normalized age.
///
/// Layout matches a single `vec4<f32>` vertex attribute, so a slice of
/// records uploads verbatim with [`bytemuck::cast_slice`].
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct SpriteRecord {
    /// View-space position. The viewer looks down `-z`.
    pub position: [f32; 3],
    /// Age ratio in `[0, 1]`; the shader derives size and opacity from it.
    pub normalized_age: f32,
}

impl SpriteRecord {
    const ATTRIBUTES: [wgpu::VertexAttribute; 1] = wgpu::vertex_attr_array![0 => Float32x4];

    /// Pack a view-space position and age ratio.
    pub fn new(view_position: Vec3, normalized_age: f32) -> Self {
        Self {
            position: view_position.to_array(),
            normalized_age,
        }
    }

    /// View-space depth used for ordering (more negative is farther away).
    #[inline]
    pub fn depth(&self) -> f32 {
        self.position[2]
    }

    /// Vertex buffer layout for a point-list pipeline reading these records.
    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<SpriteRecord>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRIBUTES,
        }
    }
}
