//! Construction and per-tick parameters.
//!
//! `FluidConfig` sizes the simulation once; `StepParams` is handed to every
//! tick by the caller. Both are plain serde values so a driver can load them
//! from a file.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::error::{FlipError, Result};
use crate::physics;

/// Construction parameters for a simulation.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FluidConfig {
    /// Fluid density, used to scale the diagnostic pressure field.
    pub density: f32,
    /// Domain width in world units.
    pub width: f32,
    /// Domain height in world units.
    pub height: f32,
    /// Requested cell spacing. The actual cell size is derived from it.
    pub spacing: f32,
    /// Particle radius in world units.
    pub particle_radius: f32,
    /// Fixed particle capacity.
    pub max_particles: usize,
}

impl Default for FluidConfig {
    fn default() -> Self {
        Self {
            density: 1000.0,
            width: 2.0,
            height: 1.0,
            spacing: 0.02,
            particle_radius: 0.006,
            max_particles: 20_000,
        }
    }
}

/// Cells per axis, `floor(extent / cell_size) + 1`, for a domain of
/// `width` by `height`. `None` once the total passes [`physics::MAX_CELLS`].
pub(crate) fn cell_counts(width: f32, height: f32, cell_size: f32) -> Option<(usize, usize)> {
    let along = |extent: f32| {
        let cells = (extent / cell_size).floor();
        if cells < physics::MAX_CELLS as f32 {
            (cells as usize).checked_add(1)
        } else {
            None
        }
    };
    let num_x = along(width)?;
    let num_y = along(height)?;
    num_x
        .checked_mul(num_y)
        .filter(|&cells| cells <= physics::MAX_CELLS)
        .map(|_| (num_x, num_y))
}

impl FluidConfig {
    /// Grid dimensions `(num_x, num_y, h)` derived from the requested spacing.
    ///
    /// The cell count is `floor(extent / spacing) + 1` per axis and `h` is the
    /// larger of the two per-axis cell sizes, so the grid always covers the
    /// whole domain.
    pub fn grid_dimensions(&self) -> Result<(usize, usize, f32)> {
        let (num_x, num_y) = cell_counts(self.width, self.height, self.spacing).ok_or(
            FlipError::GridTooLarge {
                name: "grid",
                max_cells: physics::MAX_CELLS,
            },
        )?;
        let h = (self.width / num_x as f32).max(self.height / num_y as f32);
        Ok((num_x, num_y, h))
    }

    /// Side length of a spatial hash cell.
    pub fn hash_spacing(&self) -> f32 {
        physics::HASH_SPACING_FACTOR * self.particle_radius
    }

    /// Reject degenerate configurations before anything is allocated.
    pub fn validate(&self) -> Result<()> {
        let positive = [
            ("density", self.density),
            ("width", self.width),
            ("height", self.height),
            ("spacing", self.spacing),
            ("particle_radius", self.particle_radius),
        ];
        for (name, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(FlipError::NonPositive { name, value });
            }
        }
        if self.max_particles == 0 {
            return Err(FlipError::ZeroCapacity);
        }
        if self.max_particles > physics::MAX_PARTICLES {
            return Err(FlipError::CapacityTooLarge {
                capacity: self.max_particles,
                max: physics::MAX_PARTICLES,
            });
        }
        let (num_x, num_y, _) = self.grid_dimensions()?;
        if num_x < 3 || num_y < 3 {
            return Err(FlipError::GridTooSmall { num_x, num_y });
        }
        if cell_counts(self.width, self.height, self.hash_spacing()).is_none() {
            return Err(FlipError::GridTooLarge {
                name: "spatial hash",
                max_cells: physics::MAX_CELLS,
            });
        }
        Ok(())
    }
}

/// How particles crossing the top or bottom of the domain are handled.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum VerticalBoundary {
    /// Clamp into the domain and zero vertical velocity, like the side walls.
    #[default]
    Clamp,
    /// Periodic: leaving through the floor re-enters at the ceiling and vice versa.
    Wrap,
}

/// Circular obstacle the caller can drag through the fluid.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Obstacle {
    pub position: Vec2,
    /// Radius in world units. Zero disables the obstacle.
    pub radius: f32,
    /// Velocity imparted to particles it touches.
    pub velocity: Vec2,
    /// Repulsion coefficient applied to the squared penetration depth.
    pub repulsion: f32,
}

impl Default for Obstacle {
    fn default() -> Self {
        Self::none()
    }
}

impl Obstacle {
    /// A resting obstacle at `position`.
    pub fn new(position: Vec2, radius: f32) -> Self {
        Self {
            position,
            radius,
            velocity: Vec2::ZERO,
            repulsion: physics::OBSTACLE_REPULSION,
        }
    }

    /// An obstacle that touches nothing.
    pub fn none() -> Self {
        Self::new(Vec2::ZERO, 0.0)
    }

    #[inline]
    pub fn is_active(&self) -> bool {
        self.radius > 0.0
    }

    /// Move to `position`, deriving velocity from the displacement over `dt`.
    pub fn drag_to(&mut self, position: Vec2, dt: f32) {
        self.velocity = if dt > 0.0 {
            (position - self.position) / dt
        } else {
            Vec2::ZERO
        };
        self.position = position;
    }

    /// Jump to `position` without imparting any velocity.
    pub fn teleport(&mut self, position: Vec2) {
        self.position = position;
        self.velocity = Vec2::ZERO;
    }
}

/// Parameters supplied with every tick.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StepParams {
    pub dt: f32,
    /// Vertical acceleration (negative pulls toward y = 0).
    pub gravity: f32,
    /// FLIP/PIC blend in [0, 1].
    pub flip_ratio: f32,
    pub num_pressure_iters: usize,
    pub num_particle_iters: usize,
    pub over_relaxation: f32,
    /// Bias the pressure solve against over-compressed cells.
    pub compensate_drift: bool,
    /// Run the particle push-apart pass.
    pub separate_particles: bool,
    pub obstacle: Obstacle,
    /// Quadratic velocity damping coefficient, applied per axis.
    pub damping: f32,
    pub vertical_boundary: VerticalBoundary,
}

impl Default for StepParams {
    fn default() -> Self {
        Self {
            dt: physics::DEFAULT_DT,
            gravity: physics::GRAVITY,
            flip_ratio: physics::DEFAULT_FLIP_RATIO,
            num_pressure_iters: physics::DEFAULT_PRESSURE_ITERS,
            num_particle_iters: physics::DEFAULT_PARTICLE_ITERS,
            over_relaxation: physics::DEFAULT_OVER_RELAXATION,
            compensate_drift: true,
            separate_particles: true,
            obstacle: Obstacle::none(),
            damping: 0.0,
            vertical_boundary: VerticalBoundary::Clamp,
        }
    }
}

impl StepParams {
    /// FLIP ratio clamped into [0, 1]. NaN falls back to the default ratio.
    pub fn clamped_flip_ratio(&self) -> f32 {
        if self.flip_ratio.is_nan() {
            log::warn!("flip_ratio is NaN, using {}", physics::DEFAULT_FLIP_RATIO);
            return physics::DEFAULT_FLIP_RATIO;
        }
        if !(0.0..=1.0).contains(&self.flip_ratio) {
            log::warn!("flip_ratio {} outside [0, 1], clamping", self.flip_ratio);
        }
        self.flip_ratio.clamp(0.0, 1.0)
    }
}
