//! The wavefront driver.
//!
//! Repeatedly drains the current priority buffer, applies the planar-wave
//! update to each cell, and rotates the buffers. When a pass produces no
//! below-threshold cells, the threshold is raised and the overflow buffer is
//! promoted. Terminates when the buffers drain, the cycle budget runs out,
//! or the start cell is reached.

use glam::UVec2;
use log::debug;

use crate::grid::PotentialGrid;
use crate::types::{COST_NEUTRAL, POT_HIGH};
use crate::wave::queue::{PriorityBuffers, Slot};
use crate::wave::update::{update_cell, update_cell_astar};

/// Counters from one propagation run.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PropagationStats {
    /// Passes executed.
    pub cycles: usize,
    /// Cells placed into priority buffers over the whole run.
    pub cells_visited: usize,
    /// Largest single pass.
    pub max_pass: usize,
    /// Lethal cells in the field at propagation time.
    pub obstacles: usize,
}

/// Breadth-first propagation. Returns whether the run terminated before
/// exhausting its cycle budget.
pub(crate) fn propagate_dijkstra(
    grid: &mut PotentialGrid,
    queues: &mut PriorityBuffers,
    start_cell: usize,
    cycles: usize,
    stop_at_start: bool,
    increment: f32,
) -> (bool, PropagationStats) {
    run_passes(grid, queues, cycles, increment, update_cell, |grid| {
        stop_at_start && grid.pot[start_cell] < POT_HIGH
    })
}

/// Best-first propagation with the Euclidean-to-start heuristic. Returns
/// whether the start cell was reached.
pub(crate) fn propagate_astar(
    grid: &mut PotentialGrid,
    queues: &mut PriorityBuffers,
    goal: UVec2,
    start: UVec2,
    cycles: usize,
    increment: f32,
) -> (bool, PropagationStats) {
    let dist = (goal.x as f32 - start.x as f32).hypot(goal.y as f32 - start.y as f32);
    queues.threshold += dist * COST_NEUTRAL as f32;

    let start_cell = grid.index(start);
    let (_, stats) = run_passes(
        grid,
        queues,
        cycles,
        increment,
        |grid, queues, n| update_cell_astar(grid, queues, n, start),
        |grid| grid.pot[start_cell] < POT_HIGH,
    );
    (grid.pot[start_cell] < POT_HIGH, stats)
}

fn run_passes<U, S>(
    grid: &mut PotentialGrid,
    queues: &mut PriorityBuffers,
    cycles: usize,
    increment: f32,
    mut update: U,
    stop: S,
) -> (bool, PropagationStats)
where
    U: FnMut(&mut PotentialGrid, &mut PriorityBuffers, usize),
    S: Fn(&PotentialGrid) -> bool,
{
    let mut stats = PropagationStats {
        obstacles: grid.obstacle_count(),
        ..Default::default()
    };
    let mut terminated = false;

    for _ in 0..cycles {
        if queues.is_empty(Slot::Current) && queues.is_empty(Slot::Next) {
            terminated = true;
            break;
        }
        stats.cycles += 1;

        let cells = queues.begin_pass();
        stats.cells_visited += cells.len();
        stats.max_pass = stats.max_pass.max(cells.len());

        for &n in &cells {
            grid.pending.set(n, false);
        }
        for &n in &cells {
            update(grid, queues, n);
        }
        queues.end_pass(cells);

        if queues.is_empty(Slot::Current) {
            queues.promote_overflow(increment);
        }

        if stop(grid) {
            terminated = true;
            break;
        }
    }

    let free = grid.size().saturating_sub(stats.obstacles).max(1);
    debug!(
        "propagation: {} cycles, {} cells visited ({}%), max pass {}",
        stats.cycles,
        stats.cells_visited,
        stats.cells_visited * 100 / free,
        stats.max_pass
    );
    (terminated, stats)
}
