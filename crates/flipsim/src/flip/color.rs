//! Visualization colors for particles and cells.

use glam::Vec3;

use crate::grid::{CellType, Grid};
use crate::particle::Particles;
use crate::physics::{
    BUBBLE_BRIGHTNESS, BUBBLE_DENSITY_RATIO, CELL_COLOR_MAX_DENSITY, COLOR_FADE, SOLID_CELL_GRAY,
};

/// Fade particle colors toward blue and brighten particles in sparse cells.
///
/// Once a rest density exists, a particle whose cell sits below
/// `BUBBLE_DENSITY_RATIO` of it is drawn as a light bubble.
pub fn update_particle_colors(particles: &mut Particles, grid: &Grid) {
    let h1 = grid.inv_spacing;
    let rest_density = grid.particle_rest_density;

    for (pos, color) in particles.positions.iter().zip(particles.colors.iter_mut()) {
        color.x = (color.x - COLOR_FADE).clamp(0.0, 1.0);
        color.y = (color.y - COLOR_FADE).clamp(0.0, 1.0);
        color.z = (color.z + COLOR_FADE).clamp(0.0, 1.0);

        if rest_density <= 0.0 {
            continue;
        }

        let xi = ((pos.x * h1).floor().max(1.0) as usize).min(grid.num_x - 1);
        let yi = ((pos.y * h1).floor().max(1.0) as usize).min(grid.num_y - 1);
        let relative = grid.particle_density[xi * grid.num_y + yi] / rest_density;
        if relative < BUBBLE_DENSITY_RATIO {
            *color = Vec3::new(BUBBLE_BRIGHTNESS, BUBBLE_BRIGHTNESS, 1.0);
        }
    }
}

/// Color cells by type: gray solids, density ramp for fluid, black air.
pub fn update_cell_colors(grid: &mut Grid) {
    let rest_density = grid.particle_rest_density;

    for idx in 0..grid.num_cells() {
        grid.cell_color[idx] = match grid.cell_type[idx] {
            CellType::Solid => Vec3::splat(SOLID_CELL_GRAY),
            CellType::Fluid => {
                let mut d = grid.particle_density[idx];
                if rest_density > 0.0 {
                    d /= rest_density;
                }
                sci_color(d, 0.0, CELL_COLOR_MAX_DENSITY)
            }
            CellType::Air => Vec3::ZERO,
        };
    }
}

/// Four-band scientific color ramp: blue, cyan, green, yellow, red.
///
/// `val` is clamped into `[min, max)` and normalized; a degenerate range maps
/// everything to the middle of the ramp.
pub fn sci_color(val: f32, min: f32, max: f32) -> Vec3 {
    let val = val.max(min).min(max - 0.0001);
    let d = max - min;
    let val = if d == 0.0 { 0.5 } else { (val - min) / d };

    let m = 0.25;
    let band = (val / m).floor();
    let s = (val - band * m) / m;

    match band as i32 {
        0 => Vec3::new(0.0, s, 1.0),
        1 => Vec3::new(0.0, 1.0, 1.0 - s),
        2 => Vec3::new(s, 1.0, 0.0),
        _ => Vec3::new(1.0, 1.0 - s, 0.0),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec2;

    fn close(a: Vec3, b: Vec3) -> bool {
        (a - b).abs().max_element() < 1e-4
    }

    #[test]
    fn test_sci_color_band_edges() {
        assert!(close(sci_color(0.0, 0.0, 1.0), Vec3::new(0.0, 0.0, 1.0)));
        assert!(close(sci_color(0.25, 0.0, 1.0), Vec3::new(0.0, 1.0, 1.0)));
        assert!(close(sci_color(0.5, 0.0, 1.0), Vec3::new(0.0, 1.0, 0.0)));
        assert!(close(sci_color(0.75, 0.0, 1.0), Vec3::new(1.0, 1.0, 0.0)));
        // top of the range stays in the last band
        assert!(close(sci_color(5.0, 0.0, 1.0), Vec3::new(1.0, 0.0, 0.0)));
        assert!(close(sci_color(-1.0, 0.0, 1.0), Vec3::new(0.0, 0.0, 1.0)));
    }

    #[test]
    fn test_sci_color_degenerate_range_is_mid_ramp() {
        assert!(close(sci_color(3.0, 1.0, 1.0), Vec3::new(0.0, 1.0, 0.0)));
    }

    #[test]
    fn test_particles_fade_toward_blue() {
        let grid = Grid::new(6, 6, 1.0);
        let mut particles = Particles::with_capacity(1);
        particles.push(Vec2::new(2.5, 2.5), Vec2::ZERO).unwrap();
        particles.colors[0] = Vec3::new(1.0, 0.005, 0.995);

        update_particle_colors(&mut particles, &grid);

        assert!(close(particles.colors()[0], Vec3::new(0.99, 0.0, 1.0)));
    }

    #[test]
    fn test_sparse_particle_becomes_bubble() {
        let mut grid = Grid::new(6, 6, 1.0);
        grid.particle_rest_density = 2.0;
        let cell = grid.cell_index(2, 2);
        grid.particle_density[cell] = 1.0;
        let mut particles = Particles::with_capacity(1);
        particles.push(Vec2::new(2.5, 2.5), Vec2::ZERO).unwrap();

        update_particle_colors(&mut particles, &grid);

        assert_eq!(
            particles.colors()[0],
            Vec3::new(BUBBLE_BRIGHTNESS, BUBBLE_BRIGHTNESS, 1.0)
        );
    }

    #[test]
    fn test_cell_colors_by_type() {
        let mut grid = Grid::new(6, 6, 1.0);
        let positions = [Vec2::new(2.5, 2.5)];
        grid.classify_cells(&positions);
        grid.update_particle_density(&positions);
        grid.calibrate_rest_density();

        update_cell_colors(&mut grid);

        assert_eq!(grid.cell_color[grid.cell_index(0, 0)], Vec3::splat(SOLID_CELL_GRAY));
        assert_eq!(grid.cell_color[grid.cell_index(3, 3)], Vec3::ZERO);
        // density equal to rest sits in the middle of the ramp
        assert!(close(grid.cell_color[grid.cell_index(2, 2)], Vec3::new(0.0, 1.0, 0.0)));
    }
}
