//! Translation of external cost grids onto the internal cost scale.
//!
//! Incoming values map as:
//! - `0..COST_OBS_ROS` → `COST_NEUTRAL + COST_FACTOR * v`, capped below
//!   [`COST_OBS`],
//! - `COST_UNKNOWN_EXT` → barely passable (`COST_OBS - 1`) when unknown space
//!   is allowed,
//! - everything else → [`COST_OBS`].

use crate::grid::PotentialGrid;
use crate::types::{
    NavFieldError, COST_FACTOR, COST_NEUTRAL, COST_OBS, COST_OBS_ROS, COST_UNKNOWN_EXT,
};

/// How the external grid encodes occupancy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CostEncoding {
    /// ROS-style costmap values (0..=252 graded, 253 inscribed, 254 lethal,
    /// 255 unknown).
    Ros,
    /// Raw grayscale values, e.g. from a PGM. Unknown cells are always
    /// passable and a 7-cell perimeter is forced to [`COST_OBS`].
    Raw,
}

/// Width of the perimeter sealed in [`CostEncoding::Raw`] mode.
const RAW_BORDER: usize = 7;

/// Translate `external` into the grid's internal cost buffer.
///
/// The external grid must have exactly one value per cell.
pub(crate) fn apply_costmap(
    grid: &mut PotentialGrid,
    external: &[u8],
    encoding: CostEncoding,
    allow_unknown: bool,
) -> Result<(), NavFieldError> {
    if external.len() != grid.size() {
        return Err(NavFieldError::SizeMismatch(format!(
            "cost grid has {} cells, field has {}",
            external.len(),
            grid.size()
        )));
    }

    let nx = grid.stride();
    let ny = grid.size() / nx;
    match encoding {
        CostEncoding::Ros => {
            for (cell, &v) in grid.cost.iter_mut().zip(external) {
                *cell = translate_value(v, allow_unknown);
            }
        }
        CostEncoding::Raw => {
            for y in 0..ny {
                for x in 0..nx {
                    let k = y * nx + x;
                    grid.cost[k] = if x < RAW_BORDER
                        || x >= nx.saturating_sub(RAW_BORDER)
                        || y < RAW_BORDER
                        || y >= ny.saturating_sub(RAW_BORDER)
                    {
                        COST_OBS
                    } else {
                        translate_value(external[k], true)
                    };
                }
            }
        }
    }
    Ok(())
}

fn translate_value(v: u8, allow_unknown: bool) -> u8 {
    if v < COST_OBS_ROS {
        let scaled = COST_NEUTRAL as f32 + COST_FACTOR * v as f32;
        (scaled as u8).min(COST_OBS - 1)
    } else if v == COST_UNKNOWN_EXT && allow_unknown {
        COST_OBS - 1
    } else {
        COST_OBS
    }
}
