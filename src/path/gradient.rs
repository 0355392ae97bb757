//! Local gradient of the potential field.

use crate::grid::PotentialGrid;
use crate::types::{COST_OBS, POT_HIGH};

/// Compute the unit gradient at cell `n`, store it in the gradient buffers,
/// and return its pre-normalization magnitude.
///
/// Positive components point toward decreasing potential (toward the goal).
/// Cells in the top or bottom border row have no gradient. Unreached cells
/// get a fixed-magnitude vector pointing at whichever neighbor the wavefront
/// did reach, steering the tracer out of obstacles.
pub(crate) fn grad_cell(grid: &mut PotentialGrid, n: usize) -> f32 {
    if grid.gradx[n] + grid.grady[n] > 0.0 {
        return 1.0;
    }

    let nx = grid.stride();
    let ns = grid.size();
    if n < nx || n >= ns - nx {
        return 0.0;
    }

    let cv = grid.pot[n];
    let mut dx = 0.0f32;
    let mut dy = 0.0f32;

    if cv >= POT_HIGH {
        if grid.pot[n - 1] < POT_HIGH {
            dx = -(COST_OBS as f32);
        } else if grid.pot[n + 1] < POT_HIGH {
            dx = COST_OBS as f32;
        }
        if grid.pot[n - nx] < POT_HIGH {
            dy = -(COST_OBS as f32);
        } else if grid.pot[n + nx] < POT_HIGH {
            dy = COST_OBS as f32;
        }
    } else {
        // two-sided differences, one-sided against unreached neighbors
        if grid.pot[n - 1] < POT_HIGH {
            dx += grid.pot[n - 1] - cv;
        }
        if grid.pot[n + 1] < POT_HIGH {
            dx += cv - grid.pot[n + 1];
        }
        if grid.pot[n - nx] < POT_HIGH {
            dy += grid.pot[n - nx] - cv;
        }
        if grid.pot[n + nx] < POT_HIGH {
            dy += cv - grid.pot[n + nx];
        }
    }

    let norm = dx.hypot(dy);
    if norm > 0.0 {
        grid.gradx[n] = dx / norm;
        grid.grady[n] = dy / norm;
    }
    norm
}
