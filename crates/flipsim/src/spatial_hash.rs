//! Uniform-grid spatial hash for particle neighbor queries.
//!
//! Built with a counting sort: a per-cell histogram, a prefix sum, then a
//! fill pass. Every hash cell owns one contiguous run of particle indices,
//! and the order inside a run only depends on particle order, so queries are
//! deterministic.

use glam::Vec2;

use crate::physics::HASH_SPACING_FACTOR;

/// Counting-sort bucket grid at particle resolution.
#[derive(Clone, Debug)]
pub struct SpatialHash {
    pub num_x: usize,
    pub num_y: usize,
    pub inv_spacing: f32,
    num_cell_particles: Vec<usize>,
    /// Start of each cell's run; entry `num_cells` is the total count
    first_cell_particle: Vec<usize>,
    cell_particle_ids: Vec<usize>,
}

impl SpatialHash {
    /// Hash covering a `width` x `height` domain with cells of
    /// `2.2 * particle_radius`.
    ///
    /// Allocates without bounds checks; `FluidConfig::validate` caps the
    /// cell count and capacity before a simulation calls this.
    pub fn new(width: f32, height: f32, particle_radius: f32, capacity: usize) -> Self {
        let spacing = HASH_SPACING_FACTOR * particle_radius;
        let inv_spacing = 1.0 / spacing;
        let num_x = (width / spacing).floor() as usize + 1;
        let num_y = (height / spacing).floor() as usize + 1;
        let cell_count = num_x * num_y;
        Self {
            num_x,
            num_y,
            inv_spacing,
            num_cell_particles: vec![0; cell_count],
            first_cell_particle: vec![0; cell_count + 1],
            cell_particle_ids: vec![0; capacity],
        }
    }

    #[inline]
    pub fn num_cells(&self) -> usize {
        self.num_x * self.num_y
    }

    /// Hash cell of `pos`, clamped into the grid.
    #[inline]
    pub fn cell_coords(&self, pos: Vec2) -> (usize, usize) {
        let xi = ((pos.x * self.inv_spacing).floor().max(0.0) as usize).min(self.num_x - 1);
        let yi = ((pos.y * self.inv_spacing).floor().max(0.0) as usize).min(self.num_y - 1);
        (xi, yi)
    }

    #[inline]
    fn cell_nr(&self, xi: usize, yi: usize) -> usize {
        xi * self.num_y + yi
    }

    /// Rebuild the buckets from the current particle positions.
    pub fn build(&mut self, positions: &[Vec2]) {
        if self.cell_particle_ids.len() < positions.len() {
            self.cell_particle_ids.resize(positions.len(), 0);
        }

        // histogram
        self.num_cell_particles.fill(0);
        for &pos in positions {
            let (xi, yi) = self.cell_coords(pos);
            let cell_nr = self.cell_nr(xi, yi);
            self.num_cell_particles[cell_nr] += 1;
        }

        // prefix sums, pointing one past the end of each run
        let mut first = 0;
        for cell_nr in 0..self.num_cells() {
            first += self.num_cell_particles[cell_nr];
            self.first_cell_particle[cell_nr] = first;
        }
        let num_cells = self.num_cells();
        self.first_cell_particle[num_cells] = first;

        // fill, walking each run's cursor back to its start
        for (id, &pos) in positions.iter().enumerate() {
            let (xi, yi) = self.cell_coords(pos);
            let cell_nr = self.cell_nr(xi, yi);
            self.first_cell_particle[cell_nr] -= 1;
            self.cell_particle_ids[self.first_cell_particle[cell_nr]] = id;
        }
    }

    /// Particle indices bucketed in hash cell `(xi, yi)`.
    #[inline]
    pub fn cell_particles(&self, xi: usize, yi: usize) -> &[usize] {
        let cell_nr = self.cell_nr(xi, yi);
        let first = self.first_cell_particle[cell_nr];
        let last = self.first_cell_particle[cell_nr + 1];
        &self.cell_particle_ids[first..last]
    }

    /// Inclusive hash-cell range `(x0, x1, y0, y1)` of the 3x3 block around `pos`.
    #[inline]
    pub fn neighborhood(&self, pos: Vec2) -> (usize, usize, usize, usize) {
        let (xi, yi) = self.cell_coords(pos);
        (
            xi.saturating_sub(1),
            (xi + 1).min(self.num_x - 1),
            yi.saturating_sub(1),
            (yi + 1).min(self.num_y - 1),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_particle_lands_in_exactly_one_bucket() {
        let mut hash = SpatialHash::new(1.0, 1.0, 0.05, 8);
        let positions = [
            Vec2::new(0.1, 0.1),
            Vec2::new(0.12, 0.11),
            Vec2::new(0.9, 0.5),
            Vec2::new(-1.0, 5.0),
        ];
        hash.build(&positions);

        let mut seen = vec![0; positions.len()];
        for xi in 0..hash.num_x {
            for yi in 0..hash.num_y {
                for &id in hash.cell_particles(xi, yi) {
                    seen[id] += 1;
                }
            }
        }
        assert_eq!(seen, vec![1; positions.len()]);
    }

    #[test]
    fn test_nearby_particles_share_a_bucket() {
        let mut hash = SpatialHash::new(1.0, 1.0, 0.05, 4);
        let positions = [Vec2::new(0.5, 0.5), Vec2::new(0.51, 0.5), Vec2::new(0.9, 0.9)];
        hash.build(&positions);

        let (xi, yi) = hash.cell_coords(positions[0]);
        let mut bucket = hash.cell_particles(xi, yi).to_vec();
        bucket.sort_unstable();
        assert_eq!(bucket, vec![0, 1]);
    }

    #[test]
    fn test_out_of_range_positions_are_clamped() {
        let mut hash = SpatialHash::new(1.0, 1.0, 0.05, 2);
        hash.build(&[Vec2::new(-0.5, -0.5), Vec2::new(10.0, 10.0)]);
        assert_eq!(hash.cell_particles(0, 0), &[0]);
        assert_eq!(hash.cell_particles(hash.num_x - 1, hash.num_y - 1), &[1]);
    }

    #[test]
    fn test_neighborhood_stays_in_bounds() {
        let hash = SpatialHash::new(1.0, 1.0, 0.05, 1);
        assert_eq!(hash.neighborhood(Vec2::ZERO), (0, 1, 0, 1));
        let (_, x1, _, y1) = hash.neighborhood(Vec2::new(5.0, 5.0));
        assert_eq!((x1, y1), (hash.num_x - 1, hash.num_y - 1));
    }

    #[test]
    fn test_grows_past_initial_capacity() {
        let mut hash = SpatialHash::new(1.0, 1.0, 0.1, 1);
        hash.build(&[Vec2::splat(0.2), Vec2::splat(0.3), Vec2::splat(0.4)]);
        let total: usize = (0..hash.num_x)
            .flat_map(|xi| (0..hash.num_y).map(move |yi| (xi, yi)))
            .map(|(xi, yi)| hash.cell_particles(xi, yi).len())
            .sum();
        assert_eq!(total, 3);
    }
}
