//! Diagnostic measurements for tests and drivers.

use super::{pressure, FlipSimulation};

impl FlipSimulation {
    /// Total kinetic energy of particles: KE = 1/2 * sum(|v|^2).
    /// Each particle is assumed to have unit mass.
    pub fn kinetic_energy(&self) -> f32 {
        self.particles
            .velocities()
            .iter()
            .map(|v| 0.5 * v.length_squared())
            .sum()
    }

    /// Get maximum particle speed (for CFL checking)
    pub fn max_speed(&self) -> f32 {
        self.particles
            .velocities()
            .iter()
            .map(|v| v.length())
            .fold(0.0f32, f32::max)
    }

    /// Compute CFL number: CFL = v_max * dt / h
    /// Should stay below 1 for the bilinear transfer to remain stable.
    pub fn compute_cfl(&self, dt: f32) -> f32 {
        self.max_speed() * dt / self.grid.h
    }

    /// Largest absolute face-velocity divergence over fluid cells.
    pub fn max_divergence(&self) -> f32 {
        pressure::max_divergence(&self.grid)
    }

    pub fn fluid_cell_count(&self) -> usize {
        self.grid.fluid_cell_count()
    }

    /// Axis-aligned bounds of all particles, or `None` without particles.
    pub fn particle_bounds(&self) -> Option<(glam::Vec2, glam::Vec2)> {
        let positions = self.particles.positions();
        let first = *positions.first()?;
        Some(
            positions
                .iter()
                .fold((first, first), |(lo, hi), &p| (lo.min(p), hi.max(p))),
        )
    }
}
