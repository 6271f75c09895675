//! Pressure projection tests
//!
//! Runs whole ticks of a dam break and inspects the projected grid.

use flipsim::{CellType, DamBreak, FlipSimulation, StepParams};

fn dam_break() -> FlipSimulation {
    DamBreak {
        tank_width: 2.0,
        tank_height: 1.5,
        resolution: 20,
        ..DamBreak::default()
    }
    .build()
    .unwrap()
}

fn params(num_pressure_iters: usize) -> StepParams {
    StepParams {
        num_pressure_iters,
        compensate_drift: false,
        ..StepParams::default()
    }
}

/// More sweeps leave less divergence behind
#[test]
fn test_projection_reduces_divergence() {
    let mut unprojected = dam_break();
    unprojected.step(&params(0));
    let before = unprojected.max_divergence();
    assert!(before > 0.0, "falling column should start divergent");

    let mut projected = dam_break();
    projected.step(&params(50));
    let after = projected.max_divergence();

    assert!(
        after < 0.5 * before,
        "divergence should drop: {} unprojected vs {} projected",
        before,
        after
    );
}

/// A column landing on the floor builds pressure at the bottom
#[test]
fn test_pressure_grows_with_depth() {
    let mut sim = dam_break();
    sim.step(&params(50));

    let grid = sim.grid();
    let i = 4;
    let top = (1..grid.num_y - 1)
        .filter(|&j| grid.cell_types()[grid.cell_index(i, j)] == CellType::Fluid)
        .max()
        .expect("column should hold fluid");
    let bottom_p = grid.pressure()[grid.cell_index(i, 1)];
    let top_p = grid.pressure()[grid.cell_index(i, top)];

    assert!(
        bottom_p > top_p,
        "pressure at the floor ({}) should exceed the surface ({})",
        bottom_p,
        top_p
    );
}

/// Without fluid cells the sweep has nothing to do
#[test]
fn test_empty_tank_has_no_pressure() {
    let mut sim = dam_break();
    let params = params(50);
    sim.step(&params);
    assert!(sim.grid().pressure().iter().any(|&p| p != 0.0));

    let config = *sim.config();
    sim.reset(config).unwrap();
    sim.step(&params);
    assert!(sim.grid().pressure().iter().all(|&p| p == 0.0));
}
