//! MAC (Marker-and-Cell) grid for PIC/FLIP fluid simulation
//!
//! Uses staggered grid layout:
//! - u (horizontal velocity) stored on the left face of each cell
//! - v (vertical velocity) stored on the bottom face of each cell
//! - pressure, open fraction and cell type stored at cell centers
//!
//! Every field is a flat array of `num_x * num_y` entries indexed
//! `i * num_y + j`, so a whole column is contiguous.

mod density;

use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};

use crate::params::Obstacle;

/// Cell classification, recomputed every tick.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default, Serialize, Deserialize)]
pub enum CellType {
    /// Wall or carved obstacle (no flow)
    Solid,
    /// Contains at least one particle
    Fluid,
    /// Empty
    #[default]
    Air,
}

/// Staggered MAC grid plus the per-cell particle density.
#[derive(Clone, Debug)]
pub struct Grid {
    pub num_x: usize,
    pub num_y: usize,
    /// Cell size
    pub h: f32,
    pub inv_spacing: f32,

    pub(crate) u: Vec<f32>,
    pub(crate) v: Vec<f32>,
    /// Grid velocities before the last scatter / projection
    pub(crate) prev_u: Vec<f32>,
    pub(crate) prev_v: Vec<f32>,
    /// Pressure, accumulated by the projection for display only
    pub(crate) p: Vec<f32>,
    /// Open fraction: 0 = solid, 1 = open
    pub(crate) s: Vec<f32>,
    pub(crate) cell_type: Vec<CellType>,
    pub(crate) cell_color: Vec<Vec3>,

    /// Bilinear particle count splatted onto cell centers
    pub(crate) particle_density: Vec<f32>,
    /// Mean density over fluid cells, fixed on first calibration (0 = unset)
    pub(crate) particle_rest_density: f32,
}

impl Grid {
    /// Create a grid whose border cells are solid and interior is open.
    pub fn new(num_x: usize, num_y: usize, h: f32) -> Self {
        let cell_count = num_x * num_y;
        let mut grid = Self {
            num_x,
            num_y,
            h,
            inv_spacing: 1.0 / h,
            u: vec![0.0; cell_count],
            v: vec![0.0; cell_count],
            prev_u: vec![0.0; cell_count],
            prev_v: vec![0.0; cell_count],
            p: vec![0.0; cell_count],
            s: vec![0.0; cell_count],
            cell_type: vec![CellType::Air; cell_count],
            cell_color: vec![Vec3::ZERO; cell_count],
            particle_density: vec![0.0; cell_count],
            particle_rest_density: 0.0,
        };
        grid.reset_open_fractions();
        grid
    }

    #[inline]
    pub fn cell_index(&self, i: usize, j: usize) -> usize {
        i * self.num_y + j
    }

    #[inline]
    pub fn num_cells(&self) -> usize {
        self.num_x * self.num_y
    }

    #[inline]
    pub fn is_boundary(&self, i: usize, j: usize) -> bool {
        i == 0 || j == 0 || i == self.num_x - 1 || j == self.num_y - 1
    }

    /// Domain extent covered by the grid.
    pub fn world_size(&self) -> Vec2 {
        Vec2::new(self.num_x as f32 * self.h, self.num_y as f32 * self.h)
    }

    /// Cell containing `pos`, clamped into the grid.
    #[inline]
    pub fn cell_of(&self, pos: Vec2) -> (usize, usize) {
        let i = ((pos.x * self.inv_spacing).floor().max(0.0) as usize).min(self.num_x - 1);
        let j = ((pos.y * self.inv_spacing).floor().max(0.0) as usize).min(self.num_y - 1);
        (i, j)
    }

    /// Set border cells to solid and every interior cell to open.
    pub fn reset_open_fractions(&mut self) {
        for i in 0..self.num_x {
            for j in 0..self.num_y {
                let idx = self.cell_index(i, j);
                self.s[idx] = if self.is_boundary(i, j) { 0.0 } else { 1.0 };
            }
        }
    }

    /// Carve the obstacle into the open fraction field.
    ///
    /// Interior cells whose center lies inside the obstacle become solid and
    /// their faces take the obstacle velocity; all other interior cells are
    /// reopened.
    pub fn carve_obstacle(&mut self, obstacle: &Obstacle) {
        let r2 = obstacle.radius * obstacle.radius;
        for i in 1..self.num_x - 1 {
            for j in 1..self.num_y - 1 {
                let idx = self.cell_index(i, j);
                self.s[idx] = 1.0;
                if !obstacle.is_active() {
                    continue;
                }
                let center = Vec2::new((i as f32 + 0.5) * self.h, (j as f32 + 0.5) * self.h);
                if center.distance_squared(obstacle.position) < r2 {
                    let right = self.cell_index(i + 1, j);
                    self.s[idx] = 0.0;
                    self.u[idx] = obstacle.velocity.x;
                    self.u[right] = obstacle.velocity.x;
                    self.v[idx] = obstacle.velocity.y;
                    self.v[idx + 1] = obstacle.velocity.y;
                }
            }
        }
    }

    /// Classify cells from geometry and particle occupancy.
    ///
    /// Border cells and carved cells (`s == 0`) are solid, a non-solid cell
    /// holding at least one particle is fluid, everything else is air.
    pub fn classify_cells(&mut self, positions: &[Vec2]) {
        for i in 0..self.num_x {
            for j in 0..self.num_y {
                let idx = self.cell_index(i, j);
                self.cell_type[idx] = if self.is_boundary(i, j) || self.s[idx] == 0.0 {
                    CellType::Solid
                } else {
                    CellType::Air
                };
            }
        }

        for &pos in positions {
            let (i, j) = self.cell_of(pos);
            let idx = self.cell_index(i, j);
            if self.cell_type[idx] == CellType::Air {
                self.cell_type[idx] = CellType::Fluid;
            }
        }
    }

    /// Number of cells currently classified as fluid.
    pub fn fluid_cell_count(&self) -> usize {
        self.cell_type.iter().filter(|&&t| t == CellType::Fluid).count()
    }

    // ========== Read access ==========

    pub fn u(&self) -> &[f32] {
        &self.u
    }

    pub fn v(&self) -> &[f32] {
        &self.v
    }

    pub fn pressure(&self) -> &[f32] {
        &self.p
    }

    pub fn open_fraction(&self) -> &[f32] {
        &self.s
    }

    pub fn cell_types(&self) -> &[CellType] {
        &self.cell_type
    }

    pub fn cell_colors(&self) -> &[Vec3] {
        &self.cell_color
    }

    /// Cell colors as interleaved `r, g, b` floats.
    pub fn cell_colors_flat(&self) -> &[f32] {
        bytemuck::cast_slice(&self.cell_color)
    }

    pub fn particle_density(&self) -> &[f32] {
        &self.particle_density
    }

    /// Calibrated rest density, or 0 before the first fluid cell appeared.
    pub fn rest_density(&self) -> f32 {
        self.particle_rest_density
    }
}
