//! Error types.
//!
//! Only construction and seeding can fail. A tick never returns an error:
//! indices are clamped and divisions are guarded inside the solver.

use thiserror::Error;

/// Errors raised when building or seeding a simulation.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FlipError {
    #[error("{name} must be a positive finite number, got {value}")]
    NonPositive { name: &'static str, value: f32 },

    #[error("particle capacity must be at least 1")]
    ZeroCapacity,

    #[error("grid of {num_x}x{num_y} cells has no interior cell (need at least 3x3)")]
    GridTooSmall { num_x: usize, num_y: usize },

    #[error("{name} needs more than {max_cells} cells")]
    GridTooLarge { name: &'static str, max_cells: usize },

    #[error("particle capacity {capacity} exceeds the limit of {max}")]
    CapacityTooLarge { capacity: usize, max: usize },

    #[error("particle store is full (capacity {capacity})")]
    CapacityExceeded { capacity: usize },

    #[error("scene fraction {name} must lie in (0, 1], got {value}")]
    InvalidSceneFraction { name: &'static str, value: f32 },
}

pub type Result<T> = std::result::Result<T, FlipError>;
