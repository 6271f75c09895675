//! Fluid particles for PIC/FLIP simulation
//!
//! Particles live in fixed-capacity structure-of-arrays storage. Slot `i`
//! keeps its identity for the lifetime of the simulation; the solver moves
//! particles but never creates or removes them.

use glam::{Vec2, Vec3};

use crate::error::{FlipError, Result};

/// Color of a freshly seeded particle.
pub const DEFAULT_PARTICLE_COLOR: Vec3 = Vec3::new(0.0, 0.0, 1.0);

/// Fixed-capacity particle store.
#[derive(Clone, Debug)]
pub struct Particles {
    pub(crate) positions: Vec<Vec2>,
    pub(crate) velocities: Vec<Vec2>,
    pub(crate) colors: Vec<Vec3>,
    capacity: usize,
}

impl Particles {
    /// Create an empty store that can hold `capacity` particles.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            positions: Vec::with_capacity(capacity),
            velocities: Vec::with_capacity(capacity),
            colors: Vec::with_capacity(capacity),
            capacity,
        }
    }

    /// Add a particle. Fails once the store is full.
    pub fn push(&mut self, position: Vec2, velocity: Vec2) -> Result<usize> {
        if self.positions.len() >= self.capacity {
            return Err(FlipError::CapacityExceeded { capacity: self.capacity });
        }
        self.positions.push(position);
        self.velocities.push(velocity);
        self.colors.push(DEFAULT_PARTICLE_COLOR);
        Ok(self.positions.len() - 1)
    }

    /// Number of active particles.
    #[inline]
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Remove every particle, keeping the capacity.
    pub fn clear(&mut self) {
        self.positions.clear();
        self.velocities.clear();
        self.colors.clear();
    }

    pub fn positions(&self) -> &[Vec2] {
        &self.positions
    }

    pub fn velocities(&self) -> &[Vec2] {
        &self.velocities
    }

    pub fn colors(&self) -> &[Vec3] {
        &self.colors
    }

    /// Positions as interleaved `x, y` floats, ready for a vertex buffer.
    pub fn positions_flat(&self) -> &[f32] {
        bytemuck::cast_slice(&self.positions)
    }

    /// Colors as interleaved `r, g, b` floats, ready for a vertex buffer.
    pub fn colors_flat(&self) -> &[f32] {
        bytemuck::cast_slice(&self.colors)
    }
}
