//! Particle-Grid transfer functions for 2D PIC/FLIP.
//!
//! P2G: Scatter particle velocities to the staggered faces with bilinear weights.
//! G2P: Gather face velocities back, blending PIC and FLIP.
//!
//! `u` samples sit at `(i h, (j + 0.5) h)` and `v` samples at
//! `((i + 0.5) h, j h)`, so each component shifts the particle position by
//! half a cell along the other axis before finding its 2x2 stencil.

use glam::Vec2;

use crate::grid::{CellType, Grid};
use crate::particle::Particles;

/// Pre-allocated weight accumulators for P2G (avoids allocation each frame).
#[derive(Clone, Debug)]
pub struct TransferBuffers {
    pub du: Vec<f32>,
    pub dv: Vec<f32>,
}

impl TransferBuffers {
    /// Create buffers sized for the given grid.
    pub fn new(grid: &Grid) -> Self {
        Self {
            du: vec![0.0; grid.num_cells()],
            dv: vec![0.0; grid.num_cells()],
        }
    }

    /// Clear all buffers to zero.
    pub fn clear(&mut self) {
        self.du.fill(0.0);
        self.dv.fill(0.0);
    }
}

/// Velocity component on the staggered grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Component {
    U,
    V,
}

impl Component {
    /// Sample offset of this component's faces relative to cell corners.
    fn offset(self, h: f32) -> Vec2 {
        match self {
            Component::U => Vec2::new(0.0, 0.5 * h),
            Component::V => Vec2::new(0.5 * h, 0.0),
        }
    }

    /// Index step to the cell on the other side of this component's face.
    fn neighbor_stride(self, grid: &Grid) -> usize {
        match self {
            Component::U => grid.num_y,
            Component::V => 1,
        }
    }

    fn of(self, vel: Vec2) -> f32 {
        match self {
            Component::U => vel.x,
            Component::V => vel.y,
        }
    }
}

/// Grid dimensions, copied out so the velocity fields can be borrowed mutably.
#[derive(Clone, Copy, Debug)]
struct Geometry {
    num_x: usize,
    num_y: usize,
    h: f32,
    inv_spacing: f32,
}

impl Geometry {
    fn of(grid: &Grid) -> Self {
        Self {
            num_x: grid.num_x,
            num_y: grid.num_y,
            h: grid.h,
            inv_spacing: grid.inv_spacing,
        }
    }
}

/// Bilinear 2x2 stencil: node indices and weights, in the order
/// `(x0, y0)`, `(x1, y0)`, `(x1, y1)`, `(x0, y1)`.
struct Stencil {
    nodes: [usize; 4],
    weights: [f32; 4],
}

impl Stencil {
    fn new(grid: Geometry, pos: Vec2, offset: Vec2) -> Self {
        let h = grid.h;
        let h1 = grid.inv_spacing;
        let n = grid.num_y;

        let x = pos.x.clamp(h, (grid.num_x - 1) as f32 * h);
        let y = pos.y.clamp(h, (grid.num_y - 1) as f32 * h);

        let x0 = (((x - offset.x) * h1).floor() as usize).min(grid.num_x - 2);
        let tx = (x - offset.x - x0 as f32 * h) * h1;
        let x1 = (x0 + 1).min(grid.num_x - 2);

        let y0 = (((y - offset.y) * h1).floor() as usize).min(grid.num_y - 2);
        let ty = (y - offset.y - y0 as f32 * h) * h1;
        let y1 = (y0 + 1).min(grid.num_y - 2);

        let sx = 1.0 - tx;
        let sy = 1.0 - ty;

        Self {
            nodes: [x0 * n + y0, x1 * n + y0, x1 * n + y1, x0 * n + y1],
            weights: [sx * sy, tx * sy, tx * ty, sx * ty],
        }
    }
}

/// Transfer particle velocities to grid (P2G).
///
/// Classifies cells first. Faces with zero accumulated weight end up at 0;
/// faces touching a solid cell keep their value from before the scatter, so
/// walls stay at rest and carved obstacle faces keep the obstacle velocity.
pub fn particles_to_grid(grid: &mut Grid, particles: &Particles, buffers: &mut TransferBuffers) {
    grid.prev_u.copy_from_slice(&grid.u);
    grid.prev_v.copy_from_slice(&grid.v);
    grid.u.fill(0.0);
    grid.v.fill(0.0);
    buffers.clear();

    grid.classify_cells(&particles.positions);

    let geometry = Geometry::of(grid);
    for component in [Component::U, Component::V] {
        let offset = component.offset(geometry.h);
        let (field, weights) = match component {
            Component::U => (&mut grid.u, &mut buffers.du),
            Component::V => (&mut grid.v, &mut buffers.dv),
        };

        for (&pos, &vel) in particles.positions.iter().zip(&particles.velocities) {
            let stencil = Stencil::new(geometry, pos, offset);
            let pv = component.of(vel);
            for (&node, &w) in stencil.nodes.iter().zip(&stencil.weights) {
                field[node] += pv * w;
                weights[node] += w;
            }
        }
    }

    normalize(&mut grid.u, &buffers.du);
    normalize(&mut grid.v, &buffers.dv);
    restore_solid_faces(grid);
}

fn normalize(field: &mut [f32], weights: &[f32]) {
    for (value, &w) in field.iter_mut().zip(weights) {
        if w > 0.0 {
            *value /= w;
        }
    }
}

fn restore_solid_faces(grid: &mut Grid) {
    let n = grid.num_y;
    for i in 0..grid.num_x {
        for j in 0..grid.num_y {
            let idx = i * n + j;
            let solid = grid.cell_type[idx] == CellType::Solid;
            if solid || (i > 0 && grid.cell_type[idx - n] == CellType::Solid) {
                grid.u[idx] = grid.prev_u[idx];
            }
            if solid || (j > 0 && grid.cell_type[idx - 1] == CellType::Solid) {
                grid.v[idx] = grid.prev_v[idx];
            }
        }
    }
}

/// Transfer grid velocities back to particles (G2P) with PIC/FLIP blending.
///
/// A face contributes only when one of the two cells sharing it is not air.
/// The FLIP part adds the grid velocity change since `prev_u` / `prev_v` to
/// the particle's own velocity. A particle with no valid face keeps its
/// velocity component unchanged.
pub fn grid_to_particles(grid: &Grid, particles: &mut Particles, flip_ratio: f32) {
    let geometry = Geometry::of(grid);
    for component in [Component::U, Component::V] {
        let offset = component.offset(geometry.h);
        let stride = component.neighbor_stride(grid);
        let (field, prev) = match component {
            Component::U => (&grid.u, &grid.prev_u),
            Component::V => (&grid.v, &grid.prev_v),
        };

        for (&pos, vel) in particles.positions.iter().zip(particles.velocities.iter_mut()) {
            let stencil = Stencil::new(geometry, pos, offset);

            let mut d_sum = 0.0;
            let mut pic = 0.0;
            let mut corr = 0.0;
            for (&node, &w) in stencil.nodes.iter().zip(&stencil.weights) {
                let valid = grid.cell_type[node] != CellType::Air
                    || node
                        .checked_sub(stride)
                        .is_some_and(|other| grid.cell_type[other] != CellType::Air);
                if !valid {
                    continue;
                }
                d_sum += w;
                pic += w * field[node];
                corr += w * (field[node] - prev[node]);
            }

            if d_sum > 0.0 {
                let pic_v = pic / d_sum;
                let corr = corr / d_sum;
                let slot = match component {
                    Component::U => &mut vel.x,
                    Component::V => &mut vel.y,
                };
                let flip_v = *slot + corr;
                *slot = (1.0 - flip_ratio) * pic_v + flip_ratio * flip_v;
            }
        }
    }
}
