//! Pressure projection for 2D incompressible flow.
//!
//! Gauss-Seidel sweep with over-relaxation, updating face velocities in
//! place. Each fluid cell's divergence is distributed over its four faces in
//! proportion to the neighbors' open fractions, so solid faces never move.

use crate::grid::{CellType, Grid};
use crate::physics::DRIFT_STIFFNESS;

/// Settings for one projection.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PressureSolve {
    pub num_iters: usize,
    pub dt: f32,
    pub over_relaxation: f32,
    /// Subtract the local over-compression from the divergence.
    pub compensate_drift: bool,
    /// Fluid density, scales the diagnostic pressure.
    pub density: f32,
}

/// Make the velocity field approximately divergence free.
///
/// Snapshots `u` / `v` into `prev_u` / `prev_v` first, so the gather that
/// follows sees the velocity change made here as the FLIP delta. The sweep
/// visits interior cells column by column in a fixed order.
pub fn solve_incompressibility(grid: &mut Grid, solve: &PressureSolve) {
    grid.p.fill(0.0);
    grid.prev_u.copy_from_slice(&grid.u);
    grid.prev_v.copy_from_slice(&grid.v);

    let n = grid.num_y;
    let cp = if solve.dt > 0.0 {
        solve.density * grid.h / solve.dt
    } else {
        0.0
    };
    let rest_density = grid.particle_rest_density;

    for _ in 0..solve.num_iters {
        for i in 1..grid.num_x - 1 {
            for j in 1..grid.num_y - 1 {
                let center = i * n + j;
                if grid.cell_type[center] != CellType::Fluid {
                    continue;
                }

                let left = center - n;
                let right = center + n;
                let bottom = center - 1;
                let top = center + 1;

                let sx0 = grid.s[left];
                let sx1 = grid.s[right];
                let sy0 = grid.s[bottom];
                let sy1 = grid.s[top];
                let s = sx0 + sx1 + sy0 + sy1;
                if s == 0.0 {
                    continue;
                }

                let mut div = grid.u[right] - grid.u[center] + grid.v[top] - grid.v[center];

                if solve.compensate_drift && rest_density > 0.0 {
                    let compression = grid.particle_density[center] - rest_density;
                    if compression > 0.0 {
                        div -= DRIFT_STIFFNESS * compression;
                    }
                }

                let p = -div / s * solve.over_relaxation;
                grid.p[center] += cp * p;

                grid.u[center] -= sx0 * p;
                grid.u[right] += sx1 * p;
                grid.v[center] -= sy0 * p;
                grid.v[top] += sy1 * p;
            }
        }
    }
}

/// Largest absolute divergence over fluid cells.
pub fn max_divergence(grid: &Grid) -> f32 {
    let n = grid.num_y;
    let mut max_div = 0.0f32;
    for i in 1..grid.num_x - 1 {
        for j in 1..grid.num_y - 1 {
            let center = i * n + j;
            if grid.cell_type[center] != CellType::Fluid {
                continue;
            }
            let div = grid.u[center + n] - grid.u[center] + grid.v[center + 1] - grid.v[center];
            max_div = max_div.max(div.abs());
        }
    }
    max_div
}
