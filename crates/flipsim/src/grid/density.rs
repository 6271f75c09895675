//! Particle density estimation and rest-density calibration.

use glam::Vec2;

use super::{CellType, Grid};

impl Grid {
    /// Splat one unit per particle onto cell centers with bilinear weights.
    pub fn update_particle_density(&mut self, positions: &[Vec2]) {
        let n = self.num_y;
        let h = self.h;
        let h1 = self.inv_spacing;
        let h2 = 0.5 * h;
        let max_x = (self.num_x - 1) as f32 * h;
        let max_y = (self.num_y - 1) as f32 * h;

        self.particle_density.fill(0.0);

        for &pos in positions {
            let x = pos.x.clamp(h, max_x);
            let y = pos.y.clamp(h, max_y);

            let x0 = ((x - h2) * h1).floor() as usize;
            let tx = (x - h2 - x0 as f32 * h) * h1;
            let x1 = (x0 + 1).min(self.num_x - 2);

            let y0 = ((y - h2) * h1).floor() as usize;
            let ty = (y - h2 - y0 as f32 * h) * h1;
            let y1 = (y0 + 1).min(self.num_y - 2);

            let sx = 1.0 - tx;
            let sy = 1.0 - ty;

            self.particle_density[x0 * n + y0] += sx * sy;
            self.particle_density[x1 * n + y0] += tx * sy;
            self.particle_density[x1 * n + y1] += tx * ty;
            self.particle_density[x0 * n + y1] += sx * ty;
        }
    }

    /// Fix the rest density to the mean density over fluid cells.
    ///
    /// Only the first call that sees a fluid cell has an effect; the value
    /// never changes afterwards. Returns the new value when it was just set.
    pub fn calibrate_rest_density(&mut self) -> Option<f32> {
        if self.particle_rest_density != 0.0 {
            return None;
        }

        let mut sum = 0.0;
        let mut num_fluid_cells = 0usize;
        for (density, cell_type) in self.particle_density.iter().zip(&self.cell_type) {
            if *cell_type == CellType::Fluid {
                sum += density;
                num_fluid_cells += 1;
            }
        }

        if num_fluid_cells == 0 {
            return None;
        }
        self.particle_rest_density = sum / num_fluid_cells as f32;
        Some(self.particle_rest_density)
    }
}
