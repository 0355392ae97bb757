//! Gradient-descent path extraction.
//!
//! Walks downhill from the start in continuous sub-cell coordinates,
//! bilinearly interpolating the potential gradient over the 2x2 cell block
//! under the current position. Near potential discontinuities (unreached
//! cells, obstacles) or when the emitted path starts oscillating, falls back
//! to a discrete 8-neighbor descent step and resets the sub-cell offset so
//! interpolation never straddles the discontinuity.

use glam::{UVec2, Vec2};
use log::debug;

use crate::grid::PotentialGrid;
use crate::path::gradient::grad_cell;
use crate::types::{COST_NEUTRAL, POT_HIGH};

/// Bounds-tolerant potential read; anything off the field is unreached.
fn pot_at(grid: &PotentialGrid, n: isize) -> f32 {
    if n < 0 || n as usize >= grid.size() {
        POT_HIGH
    } else {
        grid.pot[n as usize]
    }
}

/// Trace a path of at most `max_len` points from `start_cell` down the
/// potential field to `goal`.
///
/// Returns an empty path on any failure: leaving the field interior, an
/// inescapable potential plateau, a zero interpolated gradient, or an
/// exhausted length budget.
pub(crate) fn trace_path(
    grid: &mut PotentialGrid,
    goal: UVec2,
    start_cell: usize,
    max_len: usize,
    path_step: f32,
) -> Vec<Vec2> {
    let nx = grid.stride() as isize;
    let ns = grid.size() as isize;

    let mut stc = start_cell as isize;
    let mut dx = 0.0f32;
    let mut dy = 0.0f32;
    let mut path: Vec<Vec2> = Vec::new();

    for _ in 0..max_len {
        // near enough that only the goal cell itself sits below the
        // neutral step cost
        let nearest =
            (stc + dx.round() as isize + nx * dy.round() as isize).clamp(0, ns - 1);
        if grid.pot[nearest as usize] < COST_NEUTRAL as f32 {
            path.push(goal.as_vec2());
            return path;
        }

        if stc < nx || stc > ns - nx {
            debug!("trace: left the field interior at {stc}");
            return Vec::new();
        }

        path.push(Vec2::new(
            (stc % nx) as f32 + dx,
            (stc / nx) as f32 + dy,
        ));

        let len = path.len();
        let oscillation = len > 2 && path[len - 1] == path[len - 3];
        if oscillation {
            debug!("trace: oscillation detected, following grid");
        }

        let down = stc + nx;
        let up = stc - nx;
        let near_discontinuity = pot_at(grid, stc) >= POT_HIGH
            || pot_at(grid, stc + 1) >= POT_HIGH
            || pot_at(grid, stc - 1) >= POT_HIGH
            || pot_at(grid, down) >= POT_HIGH
            || pot_at(grid, down + 1) >= POT_HIGH
            || pot_at(grid, down - 1) >= POT_HIGH
            || pot_at(grid, up) >= POT_HIGH
            || pot_at(grid, up + 1) >= POT_HIGH
            || pot_at(grid, up - 1) >= POT_HIGH;

        if near_discontinuity || oscillation {
            // discrete descent: hop to the lowest of the eight neighbors
            let mut minc = stc;
            let mut minp = pot_at(grid, stc);
            for cand in [
                up - 1,
                up,
                up + 1,
                stc - 1,
                stc + 1,
                down - 1,
                down,
                down + 1,
            ] {
                let p = pot_at(grid, cand);
                if p < minp {
                    minp = p;
                    minc = cand;
                }
            }
            stc = minc;
            dx = 0.0;
            dy = 0.0;

            if pot_at(grid, stc) >= POT_HIGH {
                debug!("trace: no path, high potential around {stc}");
                return Vec::new();
            }
        } else {
            grad_cell(grid, stc as usize);
            grad_cell(grid, (stc + 1) as usize);
            grad_cell(grid, down as usize);
            grad_cell(grid, (down + 1) as usize);

            let x1 = (1.0 - dx) * grid.gradx[stc as usize] + dx * grid.gradx[(stc + 1) as usize];
            let x2 =
                (1.0 - dx) * grid.gradx[down as usize] + dx * grid.gradx[(down + 1) as usize];
            let x = (1.0 - dy) * x1 + dy * x2;
            let y1 = (1.0 - dx) * grid.grady[stc as usize] + dx * grid.grady[(stc + 1) as usize];
            let y2 =
                (1.0 - dx) * grid.grady[down as usize] + dx * grid.grady[(down + 1) as usize];
            let y = (1.0 - dy) * y1 + dy * y2;

            if x == 0.0 && y == 0.0 {
                debug!("trace: zero gradient");
                return Vec::new();
            }

            let ss = path_step / x.hypot(y);
            dx += x * ss;
            dy += y * ss;

            // carry whole-cell motion into the cell index until the
            // offsets are back inside [-1, 1]
            while dx > 1.0 {
                stc += 1;
                dx -= 1.0;
            }
            while dx < -1.0 {
                stc -= 1;
                dx += 1.0;
            }
            while dy > 1.0 {
                stc += nx;
                dy -= 1.0;
            }
            while dy < -1.0 {
                stc -= nx;
                dy += 1.0;
            }
        }
    }

    debug!("trace: no path found, path too long");
    Vec::new()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::PRIORITY_BUF_SIZE;
    use crate::wave::propagate::propagate_dijkstra;
    use crate::wave::queue::{PriorityBuffers, Slot};

    fn propagated(width: u32, height: u32, goal: UVec2) -> PotentialGrid {
        let mut grid = PotentialGrid::new(width, height).unwrap();
        grid.reset_for_propagation();
        let mut queues = PriorityBuffers::new(PRIORITY_BUF_SIZE);
        queues.reset(crate::types::COST_OBS as f32);

        let k = grid.index(goal) as isize;
        grid.pot[k as usize] = 0.0;
        let nx = grid.stride() as isize;
        for m in [k + 1, k - 1, k - nx, k + nx] {
            queues.push(Slot::Current, m, &mut grid);
        }
        propagate_dijkstra(&mut grid, &mut queues, 0, 10_000, false, 100.0);
        grid
    }

    #[test]
    fn descends_to_goal() {
        let goal = UVec2::new(8, 8);
        let mut grid = propagated(12, 12, goal);
        let start = grid.index(UVec2::new(2, 2));

        let path = trace_path(&mut grid, goal, start, 200, 0.5);
        assert!(!path.is_empty());
        assert_eq!(*path.last().unwrap(), goal.as_vec2());
        let first = path[0];
        assert!((first.x - 2.0).abs() < 1e-5 && (first.y - 2.0).abs() < 1e-5);
    }

    #[test]
    fn start_at_goal_short_circuits() {
        let goal = UVec2::new(5, 5);
        let mut grid = propagated(12, 12, goal);
        let start = grid.index(goal);

        let path = trace_path(&mut grid, goal, start, 10, 0.5);
        assert_eq!(path, vec![goal.as_vec2()]);
    }

    #[test]
    fn unreached_start_fails() {
        let goal = UVec2::new(8, 8);
        let mut grid = PotentialGrid::new(12, 12).unwrap();
        grid.reset_for_propagation();
        // no propagation at all: everything is POT_HIGH
        let goal_idx = grid.index(goal);
        grid.pot[goal_idx] = 0.0;
        let start = grid.index(UVec2::new(2, 2));

        let path = trace_path(&mut grid, goal, start, 200, 0.5);
        assert!(path.is_empty());
    }

    #[test]
    fn budget_exhaustion_fails() {
        let goal = UVec2::new(8, 8);
        let mut grid = propagated(12, 12, goal);
        let start = grid.index(UVec2::new(2, 2));

        let path = trace_path(&mut grid, goal, start, 3, 0.5);
        assert!(path.is_empty());
    }
}
