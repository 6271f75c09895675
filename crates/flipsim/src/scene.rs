//! Dam-break scene setup.
//!
//! A block of water fills the lower-left part of a closed tank and collapses
//! under gravity. Particles are hex packed, every other row shifted by one
//! radius, and the particle capacity is sized to exactly the block.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::error::{FlipError, Result};
use crate::flip::FlipSimulation;
use crate::params::FluidConfig;

/// Tank and water block description.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DamBreak {
    /// Tank width in world units.
    pub tank_width: f32,
    /// Tank height in world units.
    pub tank_height: f32,
    /// Grid cells along the tank height.
    pub resolution: usize,
    /// Fraction of the tank width initially filled.
    pub rel_water_width: f32,
    /// Fraction of the tank height initially filled.
    pub rel_water_height: f32,
    /// Fluid density.
    pub density: f32,
}

impl Default for DamBreak {
    fn default() -> Self {
        Self {
            tank_width: 4.0,
            tank_height: 3.0,
            resolution: 100,
            rel_water_width: 0.6,
            rel_water_height: 0.8,
            density: 1000.0,
        }
    }
}

/// Layout derived from a [`DamBreak`] before anything is allocated.
#[derive(Clone, Copy, Debug, PartialEq)]
struct Layout {
    h: f32,
    r: f32,
    dx: f32,
    dy: f32,
    num_x: usize,
    num_y: usize,
}

impl DamBreak {
    /// Requested cell size.
    pub fn spacing(&self) -> f32 {
        self.tank_height / self.resolution as f32
    }

    /// Particle radius, 0.3 of a cell.
    pub fn particle_radius(&self) -> f32 {
        0.3 * self.spacing()
    }

    fn validate(&self) -> Result<()> {
        for (name, value) in [("tank_width", self.tank_width), ("tank_height", self.tank_height)] {
            if !(value.is_finite() && value > 0.0) {
                return Err(FlipError::NonPositive { name, value });
            }
        }
        if self.resolution == 0 {
            return Err(FlipError::NonPositive {
                name: "resolution",
                value: 0.0,
            });
        }
        for (name, value) in [
            ("rel_water_width", self.rel_water_width),
            ("rel_water_height", self.rel_water_height),
        ] {
            if !(value > 0.0 && value <= 1.0) {
                return Err(FlipError::InvalidSceneFraction { name, value });
            }
        }
        Ok(())
    }

    fn layout(&self) -> Layout {
        let h = self.spacing();
        let r = self.particle_radius();
        let dx = 2.0 * r;
        let dy = 3.0f32.sqrt() / 2.0 * dx;

        let fill_x = self.rel_water_width * self.tank_width - 2.0 * h - 2.0 * r;
        let fill_y = self.rel_water_height * self.tank_height - 2.0 * h - 2.0 * r;
        Layout {
            h,
            r,
            dx,
            dy,
            num_x: (fill_x / dx).floor().max(0.0) as usize,
            num_y: (fill_y / dy).floor().max(0.0) as usize,
        }
    }

    /// Number of particles the block holds.
    pub fn particle_count(&self) -> usize {
        let layout = self.layout();
        layout.num_x.saturating_mul(layout.num_y)
    }

    /// Construction parameters of the tank.
    pub fn fluid_config(&self) -> FluidConfig {
        FluidConfig {
            density: self.density,
            width: self.tank_width,
            height: self.tank_height,
            spacing: self.spacing(),
            particle_radius: self.particle_radius(),
            max_particles: self.particle_count(),
        }
    }

    /// Hex-packed particle positions, row by row from the floor up.
    pub fn particle_positions(&self) -> Vec<Vec2> {
        let Layout { h, r, dx, dy, num_x, num_y } = self.layout();
        let mut positions = Vec::with_capacity(num_x * num_y);
        for i in 0..num_x {
            for j in 0..num_y {
                let shift = if j % 2 == 0 { 0.0 } else { r };
                positions.push(Vec2::new(
                    h + r + dx * i as f32 + shift,
                    h + r + dy * j as f32,
                ));
            }
        }
        positions
    }

    /// Build the simulation with the water block in place and at rest.
    pub fn build(&self) -> Result<FlipSimulation> {
        self.validate()?;
        let mut sim = FlipSimulation::new(self.fluid_config())?;
        let added = sim.seed_particles(self.particle_positions())?;
        log::debug!(
            "dam break: {} particles in a {}x{} tank",
            added,
            self.tank_width,
            self.tank_height
        );
        Ok(sim)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small() -> DamBreak {
        DamBreak {
            tank_width: 2.0,
            tank_height: 1.5,
            resolution: 20,
            ..DamBreak::default()
        }
    }

    #[test]
    fn test_block_fills_capacity_exactly() {
        let scene = small();
        let sim = scene.build().unwrap();
        assert_eq!(sim.particles().len(), scene.particle_count());
        assert_eq!(sim.particles().capacity(), scene.particle_count());
        assert!(scene.particle_count() > 100);
    }

    #[test]
    fn test_block_sits_inside_its_fraction_of_the_tank() {
        let scene = small();
        let sim = scene.build().unwrap();
        let (lo, hi) = sim.particle_bounds().unwrap();
        let wall = sim.h() + sim.particle_radius();
        assert!(lo.x >= wall && lo.y >= wall, "block starts at {:?}", lo);
        assert!(hi.x <= scene.rel_water_width * scene.tank_width);
        assert!(hi.y <= scene.rel_water_height * scene.tank_height);
    }

    #[test]
    fn test_odd_rows_are_shifted() {
        let scene = small();
        let positions = scene.particle_positions();
        let r = scene.particle_radius();
        assert!((positions[1].x - positions[0].x - r).abs() < 1e-6);
        assert!(positions[1].y > positions[0].y);
    }

    #[test]
    fn test_oversized_scene_is_rejected() {
        let scene = DamBreak { resolution: usize::MAX, ..small() };
        assert!(scene.build().is_err());
    }

    #[test]
    fn test_rejects_bad_fractions() {
        let scene = DamBreak { rel_water_width: 1.5, ..small() };
        assert!(matches!(
            scene.build(),
            Err(FlipError::InvalidSceneFraction { name: "rel_water_width", .. })
        ));
        let scene = DamBreak { rel_water_height: 0.0, ..small() };
        assert!(scene.build().is_err());
        let scene = DamBreak { resolution: 0, ..small() };
        assert!(scene.build().is_err());
    }

    #[test]
    fn test_block_too_thin_for_a_row_is_rejected() {
        let scene = DamBreak { rel_water_width: 0.01, ..small() };
        assert_eq!(scene.particle_count(), 0);
        assert_eq!(scene.build().err(), Some(FlipError::ZeroCapacity));
    }
}
