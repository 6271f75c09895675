//! Physics constants and tuning defaults for the FLIP solver.
//!
//! Step parameters default to these values; subsystems that need a fixed
//! coefficient (color diffusion, drift stiffness) read them from here instead
//! of defining their own.

/// Default gravity along +y in domain units per second squared.
pub const GRAVITY: f32 = -9.81;

/// Default timestep (one animation frame at 60 Hz).
pub const DEFAULT_DT: f32 = 1.0 / 60.0;

/// Default FLIP/PIC blend (0 = pure PIC, 1 = pure FLIP).
pub const DEFAULT_FLIP_RATIO: f32 = 0.9;

/// Default number of Gauss-Seidel pressure sweeps per tick.
pub const DEFAULT_PRESSURE_ITERS: usize = 50;

/// Default number of particle separation passes per tick.
pub const DEFAULT_PARTICLE_ITERS: usize = 2;

/// Default over-relaxation factor for the pressure sweep.
///
/// Values in (1, 2) speed up convergence; close to 2 the sweep loses its
/// stability margin.
pub const DEFAULT_OVER_RELAXATION: f32 = 1.9;

/// Spatial hash cell size as a multiple of the particle radius.
pub const HASH_SPACING_FACTOR: f32 = 2.2;

/// Fraction of the pairwise color difference exchanged per separation contact.
pub const COLOR_DIFFUSION: f32 = 0.001;

/// Stiffness of the drift compensation term in the pressure solve.
pub const DRIFT_STIFFNESS: f32 = 1.0;

/// Default obstacle repulsion, scaled by squared penetration depth.
pub const OBSTACLE_REPULSION: f32 = 10.0;

/// Per-tick color fade of particles toward blue.
pub const COLOR_FADE: f32 = 0.01;

/// Relative density below which a particle is drawn as a bubble.
pub const BUBBLE_DENSITY_RATIO: f32 = 0.7;

/// Brightness of bubble particles (red and green channels).
pub const BUBBLE_BRIGHTNESS: f32 = 0.8;

/// Upper bound of the normalized density range mapped by the cell color ramp.
pub const CELL_COLOR_MAX_DENSITY: f32 = 2.0;

/// Gray level of solid cells.
pub const SOLID_CELL_GRAY: f32 = 0.5;

/// Largest cell count accepted for the MAC grid or the spatial hash.
pub const MAX_CELLS: usize = 1 << 22;

/// Largest particle capacity accepted at construction.
pub const MAX_PARTICLES: usize = 1 << 24;
