//! Particle collision against the moving obstacle and the tank walls.

use glam::Vec2;

use crate::grid::Grid;
use crate::params::{Obstacle, VerticalBoundary};
use crate::particle::Particles;

/// Resolve obstacle contact, then keep every particle inside the walls.
pub fn handle_collisions(
    particles: &mut Particles,
    grid: &Grid,
    obstacle: &Obstacle,
    particle_radius: f32,
    vertical: VerticalBoundary,
) {
    if obstacle.is_active() {
        collide_obstacle(particles, obstacle, particle_radius);
    }
    collide_walls(particles, grid, particle_radius, vertical);
}

/// Push particles out of the obstacle.
///
/// A touching particle picks up the obstacle velocity, is moved onto the
/// contact surface along the normal, and gets an extra kick of
/// `repulsion * penetration^2` along the same normal.
pub fn collide_obstacle(particles: &mut Particles, obstacle: &Obstacle, particle_radius: f32) {
    let min_dist = obstacle.radius + particle_radius;

    for (pos, vel) in particles.positions.iter_mut().zip(particles.velocities.iter_mut()) {
        let offset = *pos - obstacle.position;
        let d = offset.length();
        if d >= min_dist {
            continue;
        }

        let normal = if d > 0.0 { offset / d } else { Vec2::Y };
        let penetration = min_dist - d;

        *vel += obstacle.velocity;
        *pos = surface_point(obstacle.position, normal, min_dist);
        *vel += normal * (obstacle.repulsion * penetration * penetration);
    }
}

/// Point at distance `min_dist` from `center` along `normal`.
///
/// Rounding can leave `center + normal * min_dist` just inside the surface;
/// the reach grows by relative epsilon steps until the point is clear.
fn surface_point(center: Vec2, normal: Vec2, min_dist: f32) -> Vec2 {
    let mut reach = min_dist;
    let mut point = center + normal * reach;
    while point.distance(center) < min_dist {
        reach *= 1.0 + f32::EPSILON;
        point = center + normal * reach;
    }
    point
}

/// Clamp particles into the open interior of the tank.
///
/// The horizontal range is `[h + r, (num_x - 1) h - r]`; crossing it zeroes the
/// horizontal velocity. Vertically the same clamp applies unless the boundary
/// wraps, in which case the particle re-enters from the opposite side with
/// its velocity intact.
pub fn collide_walls(
    particles: &mut Particles,
    grid: &Grid,
    particle_radius: f32,
    vertical: VerticalBoundary,
) {
    let h = grid.h;
    let r = particle_radius;
    let min_x = h + r;
    let max_x = (grid.num_x - 1) as f32 * h - r;
    let min_y = h + r;
    let max_y = (grid.num_y - 1) as f32 * h - r;
    let span_y = max_y - min_y;

    for (pos, vel) in particles.positions.iter_mut().zip(particles.velocities.iter_mut()) {
        if pos.x < min_x {
            pos.x = min_x;
            vel.x = 0.0;
        }
        if pos.x > max_x {
            pos.x = max_x;
            vel.x = 0.0;
        }

        match vertical {
            VerticalBoundary::Clamp => {
                if pos.y < min_y {
                    pos.y = min_y;
                    vel.y = 0.0;
                }
                if pos.y > max_y {
                    pos.y = max_y;
                    vel.y = 0.0;
                }
            }
            VerticalBoundary::Wrap => {
                if (pos.y < min_y || pos.y > max_y) && span_y > 0.0 {
                    pos.y = min_y + (pos.y - min_y).rem_euclid(span_y);
                } else if span_y <= 0.0 {
                    pos.y = min_y;
                }
            }
        }
    }
}
