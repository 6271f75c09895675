//! PIC/FLIP (Particle-In-Cell / Fluid-Implicit-Particle) simulation
//!
//! This module ties together particles and grid for fluid simulation.
//! One tick runs:
//! 1. Carve the obstacle into the grid
//! 2. Integrate gravity and drag, advect particles
//! 3. Push overlapping particles apart
//! 4. Collide with obstacle and walls
//! 5. Transfer particle velocities to grid (P2G), classifying cells
//! 6. Splat particle density, calibrate rest density once
//! 7. Pressure projection
//! 8. Transfer grid velocities back to particles (G2P with PIC/FLIP blend)
//! 9. Collide again
//! 10. Recolor particles and cells

mod diagnostics;

pub mod collision;
pub mod color;
pub mod integrate;
pub mod pressure;
pub mod separation;
pub mod transfer;

use glam::Vec2;

use crate::error::Result;
use crate::grid::Grid;
use crate::params::{FluidConfig, Obstacle, StepParams};
use crate::particle::Particles;
use crate::spatial_hash::SpatialHash;

use pressure::PressureSolve;
use transfer::TransferBuffers;

/// FLIP simulation state
#[derive(Clone, Debug)]
pub struct FlipSimulation {
    config: FluidConfig,
    grid: Grid,
    particles: Particles,
    // Rebuilt each tick from particle positions
    hash: SpatialHash,
    // Pre-allocated P2G weight accumulators
    buffers: TransferBuffers,
    frame: u64,
}

impl FlipSimulation {
    /// Allocate grid, particle store and hash for `config`.
    ///
    /// The store starts empty; seed it with [`FlipSimulation::seed_particles`]
    /// or build a whole scene with [`crate::scene::DamBreak`].
    pub fn new(config: FluidConfig) -> Result<Self> {
        config.validate()?;

        let (num_x, num_y, h) = config.grid_dimensions()?;
        let grid = Grid::new(num_x, num_y, h);
        let hash = SpatialHash::new(
            config.width,
            config.height,
            config.particle_radius,
            config.max_particles,
        );
        let buffers = TransferBuffers::new(&grid);

        log::debug!(
            "flip grid {}x{} (h = {}), hash {}x{}, capacity {}",
            num_x,
            num_y,
            h,
            hash.num_x,
            hash.num_y,
            config.max_particles
        );

        Ok(Self {
            config,
            grid,
            particles: Particles::with_capacity(config.max_particles),
            hash,
            buffers,
            frame: 0,
        })
    }

    /// Reinitialize every array for a new configuration.
    ///
    /// Particles are dropped and the rest density returns to unset. On error
    /// the current state is left untouched.
    pub fn reset(&mut self, config: FluidConfig) -> Result<()> {
        *self = Self::new(config)?;
        Ok(())
    }

    /// Add one particle. Fails once the store is full.
    pub fn add_particle(&mut self, position: Vec2, velocity: Vec2) -> Result<usize> {
        self.particles.push(position, velocity)
    }

    /// Add resting particles at `positions`, returning how many were added.
    ///
    /// Stops at the first particle that does not fit and reports the error;
    /// particles added before it stay.
    pub fn seed_particles<I>(&mut self, positions: I) -> Result<usize>
    where
        I: IntoIterator<Item = Vec2>,
    {
        let mut added = 0;
        for position in positions {
            self.particles.push(position, Vec2::ZERO)?;
            added += 1;
        }
        Ok(added)
    }

    /// Carve `obstacle` into the grid's open fractions.
    ///
    /// Called by every tick with the tick's obstacle; callers only need it to
    /// inspect cell state before the first tick.
    pub fn set_obstacle(&mut self, obstacle: &Obstacle) {
        self.grid.carve_obstacle(obstacle);
    }

    /// Run one simulation tick
    pub fn step(&mut self, params: &StepParams) {
        let flip_ratio = params.clamped_flip_ratio();
        let r = self.config.particle_radius;

        self.set_obstacle(&params.obstacle);

        integrate::integrate_particles(&mut self.particles, params.dt, params.gravity, params.damping);

        if params.separate_particles {
            separation::push_particles_apart(
                &mut self.particles,
                &mut self.hash,
                r,
                params.num_particle_iters,
            );
        }

        collision::handle_collisions(
            &mut self.particles,
            &self.grid,
            &params.obstacle,
            r,
            params.vertical_boundary,
        );

        transfer::particles_to_grid(&mut self.grid, &self.particles, &mut self.buffers);

        self.grid.update_particle_density(self.particles.positions());
        if let Some(rest_density) = self.grid.calibrate_rest_density() {
            log::info!(
                "rest density calibrated to {:.4} at frame {}",
                rest_density,
                self.frame
            );
        }

        pressure::solve_incompressibility(
            &mut self.grid,
            &PressureSolve {
                num_iters: params.num_pressure_iters,
                dt: params.dt,
                over_relaxation: params.over_relaxation,
                compensate_drift: params.compensate_drift,
                density: self.config.density,
            },
        );

        transfer::grid_to_particles(&self.grid, &mut self.particles, flip_ratio);

        collision::handle_collisions(
            &mut self.particles,
            &self.grid,
            &params.obstacle,
            r,
            params.vertical_boundary,
        );

        color::update_particle_colors(&mut self.particles, &self.grid);
        color::update_cell_colors(&mut self.grid);

        self.frame += 1;
        log::trace!(
            "frame {}: {} particles, {} fluid cells",
            self.frame,
            self.particles.len(),
            self.grid.fluid_cell_count()
        );
    }

    // ========== Read access ==========

    pub fn config(&self) -> &FluidConfig {
        &self.config
    }

    pub fn particles(&self) -> &Particles {
        &self.particles
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    /// Cell size
    pub fn h(&self) -> f32 {
        self.grid.h
    }

    pub fn num_x(&self) -> usize {
        self.grid.num_x
    }

    pub fn num_y(&self) -> usize {
        self.grid.num_y
    }

    pub fn particle_radius(&self) -> f32 {
        self.config.particle_radius
    }

    /// Number of ticks run since construction or the last reset.
    pub fn frame(&self) -> u64 {
        self.frame
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FlipError;

    fn small_config() -> FluidConfig {
        FluidConfig {
            density: 1000.0,
            width: 10.0,
            height: 10.0,
            spacing: 1.1,
            particle_radius: 0.3,
            max_particles: 16,
        }
    }

    #[test]
    fn test_new_rejects_invalid_config() {
        let config = FluidConfig { max_particles: 0, ..small_config() };
        assert_eq!(FlipSimulation::new(config).err(), Some(FlipError::ZeroCapacity));
    }

    #[test]
    fn test_new_rejects_oversized_config_without_allocating() {
        let config = FluidConfig { spacing: 1e-30, ..small_config() };
        assert!(matches!(
            FlipSimulation::new(config),
            Err(FlipError::GridTooLarge { .. })
        ));

        let config = FluidConfig { max_particles: usize::MAX, ..small_config() };
        assert!(matches!(
            FlipSimulation::new(config),
            Err(FlipError::CapacityTooLarge { .. })
        ));
    }

    #[test]
    fn test_new_sizes_grid_from_spacing() {
        let sim = FlipSimulation::new(small_config()).unwrap();
        assert_eq!((sim.num_x(), sim.num_y()), (10, 10));
        assert_eq!(sim.h(), 1.0);
        assert!(sim.particles().is_empty());
        assert_eq!(sim.grid().rest_density(), 0.0);
    }

    #[test]
    fn test_seed_stops_at_capacity() {
        let config = FluidConfig { max_particles: 2, ..small_config() };
        let mut sim = FlipSimulation::new(config).unwrap();
        let result = sim.seed_particles([Vec2::splat(3.0), Vec2::splat(4.0), Vec2::splat(5.0)]);
        assert_eq!(result, Err(FlipError::CapacityExceeded { capacity: 2 }));
        assert_eq!(sim.particles().len(), 2);
    }

    #[test]
    fn test_reset_clears_particles_and_rest_density() {
        let mut sim = FlipSimulation::new(small_config()).unwrap();
        sim.seed_particles([Vec2::new(5.0, 5.0), Vec2::new(5.5, 5.0)]).unwrap();
        sim.step(&StepParams::default());
        assert!(sim.grid().rest_density() > 0.0);
        assert_eq!(sim.frame(), 1);

        let config = FluidConfig { spacing: 0.5, ..small_config() };
        sim.reset(config).unwrap();
        assert!(sim.particles().is_empty());
        assert_eq!(sim.grid().rest_density(), 0.0);
        assert_eq!(sim.num_x(), 21);
        assert_eq!(sim.frame(), 0);
    }

    #[test]
    fn test_failed_reset_keeps_state() {
        let mut sim = FlipSimulation::new(small_config()).unwrap();
        sim.add_particle(Vec2::new(5.0, 5.0), Vec2::ZERO).unwrap();
        let bad = FluidConfig { width: -1.0, ..small_config() };
        assert!(sim.reset(bad).is_err());
        assert_eq!(sim.particles().len(), 1);
    }

    #[test]
    fn test_set_obstacle_carves_solid_cells() {
        let mut sim = FlipSimulation::new(small_config()).unwrap();
        sim.set_obstacle(&Obstacle::new(Vec2::new(5.0, 5.0), 1.0));
        let grid = sim.grid();
        assert_eq!(grid.open_fraction()[grid.cell_index(4, 4)], 0.0);
        assert_eq!(grid.open_fraction()[grid.cell_index(2, 2)], 1.0);
    }
}
