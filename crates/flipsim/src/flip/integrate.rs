//! Explicit particle integration: gravity, quadratic drag, then advection.

use crate::particle::Particles;

/// Advance particle velocities and positions by one timestep.
///
/// Gravity acts on the vertical component. Damping removes `v * |v| * damping`
/// from each axis separately, so the drag grows with the square of the speed
/// and always opposes the motion.
pub fn integrate_particles(particles: &mut Particles, dt: f32, gravity: f32, damping: f32) {
    for (pos, vel) in particles.positions.iter_mut().zip(particles.velocities.iter_mut()) {
        vel.y += dt * gravity;
        if damping != 0.0 {
            vel.x -= vel.x * vel.x.abs() * damping;
            vel.y -= vel.y * vel.y.abs() * damping;
        }
        *pos += *vel * dt;
    }
}
