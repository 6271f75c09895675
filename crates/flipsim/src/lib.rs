//! 2D PIC/FLIP Fluid Simulation
//!
//! A real-time hybrid Particle-In-Cell / Fluid-Implicit-Particle solver:
//! Lagrangian particles carry the fluid, a staggered MAC grid enforces
//! near-incompressibility every tick, and a circular obstacle can be dragged
//! through the tank.
//!
//! The solver is single-threaded and deterministic. Rendering, input and
//! scene management are left to the caller, which drives [`FlipSimulation::step`]
//! once per frame and reads particle and cell state back.
//!
//! # Example
//!
//! ```
//! use flipsim::{DamBreak, StepParams};
//!
//! let scene = DamBreak {
//!     tank_width: 2.0,
//!     tank_height: 1.0,
//!     resolution: 20,
//!     ..DamBreak::default()
//! };
//! let mut sim = scene.build().unwrap();
//!
//! let params = StepParams::default();
//! for _ in 0..10 {
//!     sim.step(&params);
//! }
//!
//! assert_eq!(sim.particles().len(), scene.particle_count());
//! let colors: &[f32] = sim.particles().colors_flat();
//! assert_eq!(colors.len(), 3 * sim.particles().len());
//! ```

pub mod error;
pub mod flip;
pub mod grid;
pub mod params;
pub mod particle;
pub mod physics;
pub mod scene;
pub mod spatial_hash;

pub use error::{FlipError, Result};
pub use flip::FlipSimulation;
pub use glam::{Vec2, Vec3};
pub use grid::{CellType, Grid};
pub use params::{FluidConfig, Obstacle, StepParams, VerticalBoundary};
pub use particle::Particles;
pub use scene::DamBreak;
pub use spatial_hash::SpatialHash;
