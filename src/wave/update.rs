//! The planar-wave cell update.
//!
//! Recomputes one cell's potential from its two lowest 4-neighbors using a
//! quadratic approximation of the continuous eikonal update, then enqueues
//! any neighbor the new value could still improve. Three phases: gather,
//! compute, dispatch. The Dijkstra and A* variants share gather and compute
//! and differ only in the dispatch key.

use glam::UVec2;

use crate::grid::PotentialGrid;
use crate::types::{COST_NEUTRAL, COST_OBS};
use crate::wave::queue::{PriorityBuffers, Slot};

/// Conservative edge length of a planar-wave step onto a neighbor.
const INV_SQRT2: f32 = 0.707106781;

/// 4-neighbor potentials of a cell, read once per update.
struct PlanarNeighbors {
    left: f32,
    right: f32,
    up: f32,
    down: f32,
}

fn gather(grid: &PotentialGrid, n: usize) -> PlanarNeighbors {
    let nx = grid.stride();
    PlanarNeighbors {
        left: grid.pot[n - 1],
        right: grid.pot[n + 1],
        up: grid.pot[n - nx],
        down: grid.pot[n + nx],
    }
}

/// Quadratic planar-wave approximation of the new potential.
///
/// With the lower axis minimum `ta` and the cross-axis minimum `tc`, a
/// spread `dc = tc - ta` at or above the cell cost `hf` degenerates to the
/// one-neighbor update `ta + hf`. Below that, the interpolated wavefront
/// arrival is `ta + hf * v(dc/hf)` with `v` fit to the continuous solution.
fn planar_potential(nbh: &PlanarNeighbors, hf: f32) -> f32 {
    let tc = nbh.left.min(nbh.right);
    let ta = nbh.up.min(nbh.down);
    let (ta, dc) = if tc < ta { (tc, ta - tc) } else { (ta, tc - ta) };

    if dc >= hf {
        ta + hf
    } else {
        let d = dc / hf;
        let v = -0.2301 * d * d + 0.5307 * d + 0.7040;
        ta + hf * v
    }
}

/// Commit the improved potential and enqueue neighbors it could improve.
///
/// `key` decides the bucket: below the threshold the neighbors go to *next*,
/// otherwise to *overflow*. Dijkstra keys on the potential itself; A* adds
/// the start heuristic.
fn dispatch(
    grid: &mut PotentialGrid,
    queues: &mut PriorityBuffers,
    n: usize,
    nbh: &PlanarNeighbors,
    pot: f32,
    key: f32,
) {
    let nx = grid.stride() as isize;
    let n = n as isize;

    let edge_left = INV_SQRT2 * grid.cost[(n - 1) as usize] as f32;
    let edge_right = INV_SQRT2 * grid.cost[(n + 1) as usize] as f32;
    let edge_up = INV_SQRT2 * grid.cost[(n - nx) as usize] as f32;
    let edge_down = INV_SQRT2 * grid.cost[(n + nx) as usize] as f32;

    grid.pot[n as usize] = pot;

    let slot = if key < queues.threshold {
        Slot::Next
    } else {
        Slot::Overflow
    };
    if nbh.left > key + edge_left {
        queues.push(slot, n - 1, grid);
    }
    if nbh.right > key + edge_right {
        queues.push(slot, n + 1, grid);
    }
    if nbh.up > key + edge_up {
        queues.push(slot, n - nx, grid);
    }
    if nbh.down > key + edge_down {
        queues.push(slot, n + nx, grid);
    }
}

/// Dijkstra-variant update of cell `n`.
pub(crate) fn update_cell(grid: &mut PotentialGrid, queues: &mut PriorityBuffers, n: usize) {
    if grid.cost[n] >= COST_OBS {
        return;
    }
    let nbh = gather(grid, n);
    let pot = planar_potential(&nbh, grid.cost[n] as f32);
    if pot < grid.pot[n] {
        dispatch(grid, queues, n, &nbh, pot, pot);
    }
}

/// A*-variant update of cell `n`: the stored potential stays the true
/// cost-to-goal; only the dispatch key carries the Euclidean-to-start
/// heuristic.
pub(crate) fn update_cell_astar(
    grid: &mut PotentialGrid,
    queues: &mut PriorityBuffers,
    n: usize,
    start: UVec2,
) {
    if grid.cost[n] >= COST_OBS {
        return;
    }
    let nbh = gather(grid, n);
    let pot = planar_potential(&nbh, grid.cost[n] as f32);
    if pot < grid.pot[n] {
        let nx = grid.stride();
        let x = (n % nx) as f32;
        let y = (n / nx) as f32;
        let dist = (x - start.x as f32).hypot(y - start.y as f32) * COST_NEUTRAL as f32;
        dispatch(grid, queues, n, &nbh, pot, pot + dist);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{POT_HIGH, PRIORITY_BUF_SIZE};

    fn setup() -> (PotentialGrid, PriorityBuffers) {
        let mut grid = PotentialGrid::new(8, 8).unwrap();
        grid.reset_for_propagation();
        let mut queues = PriorityBuffers::new(PRIORITY_BUF_SIZE);
        queues.reset(COST_OBS as f32);
        (grid, queues)
    }

    #[test]
    fn one_neighbor_update_past_goal() {
        let (mut grid, mut queues) = setup();
        let goal = grid.index(glam::UVec2::new(4, 4));
        grid.pot[goal] = 0.0;

        let n = goal + 1;
        update_cell(&mut grid, &mut queues, n);
        // all other neighbors unreached: dc >= hf, so pot = ta + hf
        assert_eq!(grid.pot[n], 50.0);
    }

    #[test]
    fn quadratic_interpolation_value() {
        let (mut grid, mut queues) = setup();
        let n = grid.index(glam::UVec2::new(4, 4));
        let nx = grid.stride();
        grid.pot[n - 1] = 0.0;
        grid.pot[n - nx] = 40.0;

        update_cell(&mut grid, &mut queues, n);
        // ta = 0, dc = 40, d = 0.8: v = -0.2301*0.64 + 0.5307*0.8 + 0.7040
        let v = -0.2301f32 * 0.64 + 0.5307 * 0.8 + 0.7040;
        assert!((grid.pot[n] - 50.0 * v).abs() < 1e-4);
    }

    #[test]
    fn symmetric_under_axis_swaps() {
        let (mut grid, mut queues) = setup();
        let nx = grid.stride();
        let a = grid.index(glam::UVec2::new(2, 2));
        let b = grid.index(glam::UVec2::new(5, 5));

        grid.pot[a - 1] = 10.0;
        grid.pot[a + 1] = 90.0;
        grid.pot[a - nx] = 25.0;
        grid.pot[a + nx] = 70.0;

        // mirrored: left/right swapped, up/down swapped
        grid.pot[b - 1] = 90.0;
        grid.pot[b + 1] = 10.0;
        grid.pot[b - nx] = 70.0;
        grid.pot[b + nx] = 25.0;

        update_cell(&mut grid, &mut queues, a);
        update_cell(&mut grid, &mut queues, b);
        assert_eq!(grid.pot[a], grid.pot[b]);
    }

    #[test]
    fn updates_only_decrease() {
        let (mut grid, mut queues) = setup();
        let n = grid.index(glam::UVec2::new(3, 3));
        grid.pot[n - 1] = 100.0;

        update_cell(&mut grid, &mut queues, n);
        let first = grid.pot[n];
        assert!(first < POT_HIGH);

        // worse neighbors change nothing
        update_cell(&mut grid, &mut queues, n);
        assert_eq!(grid.pot[n], first);

        // better neighbors lower it
        grid.pot[n - 1] = 10.0;
        update_cell(&mut grid, &mut queues, n);
        assert!(grid.pot[n] < first);
    }

    #[test]
    fn obstacle_cells_never_update() {
        let (mut grid, mut queues) = setup();
        let n = grid.index(glam::UVec2::new(3, 3));
        grid.cost[n] = COST_OBS;
        grid.pot[n - 1] = 0.0;

        update_cell(&mut grid, &mut queues, n);
        assert_eq!(grid.pot[n], POT_HIGH);
        assert_eq!(grid.pending.count_ones(), 0);
    }

    #[test]
    fn astar_stores_true_cost() {
        let (mut grid, mut queues) = setup();
        let n = grid.index(glam::UVec2::new(4, 4));
        grid.pot[n - 1] = 0.0;

        update_cell_astar(&mut grid, &mut queues, n, glam::UVec2::new(1, 1));
        // heuristic shifts only the bucket decision, not the stored value
        assert_eq!(grid.pot[n], 50.0);
    }
}
