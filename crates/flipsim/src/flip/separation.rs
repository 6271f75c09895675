//! Position-based particle separation.
//!
//! Algorithm from Matthias Müller's "Ten Minute Physics" FLIP demo:
//! - Bucket particles into a hash grid of cell size 2.2 * radius
//! - For each pair closer than 2 * radius, push both apart along their
//!   center line by half the overlap
//! - Diffuse the pair's colors slightly toward their mean
//!
//! The hash is built once per call; later passes reuse the buckets even
//! though particles have moved, which only affects which pairs are checked.

use crate::particle::Particles;
use crate::physics::COLOR_DIFFUSION;
use crate::spatial_hash::SpatialHash;

/// Push overlapping particles apart, `num_iters` passes.
pub fn push_particles_apart(
    particles: &mut Particles,
    hash: &mut SpatialHash,
    particle_radius: f32,
    num_iters: usize,
) {
    if num_iters == 0 || particles.is_empty() {
        return;
    }

    hash.build(&particles.positions);

    let min_dist = 2.0 * particle_radius;
    let min_dist2 = min_dist * min_dist;

    for _ in 0..num_iters {
        for i in 0..particles.len() {
            let (x0, x1, y0, y1) = hash.neighborhood(particles.positions[i]);

            for xi in x0..=x1 {
                for yi in y0..=y1 {
                    for &id in hash.cell_particles(xi, yi) {
                        if id == i {
                            continue;
                        }

                        let delta = particles.positions[id] - particles.positions[i];
                        let d2 = delta.length_squared();
                        // coincident particles have no separation direction
                        if d2 > min_dist2 || d2 == 0.0 {
                            continue;
                        }
                        let d = d2.sqrt();
                        let s = 0.5 * (min_dist - d) / d;
                        let push = delta * s;
                        particles.positions[i] -= push;
                        particles.positions[id] += push;

                        let c0 = particles.colors[i];
                        let c1 = particles.colors[id];
                        let mean = (c0 + c1) * 0.5;
                        particles.colors[i] = c0 + (mean - c0) * COLOR_DIFFUSION;
                        particles.colors[id] = c1 + (mean - c1) * COLOR_DIFFUSION;
                    }
                }
            }
        }
    }
}
