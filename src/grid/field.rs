//! Owned flat buffers for one planning field: traversal costs, the scalar
//! potential, its gradient, and the pending bitmap used by the priority
//! buffers.
//!
//! Buffers are allocated once per `(width, height)` pair and reused across
//! plans; [`PotentialGrid::reset_for_propagation`] returns them to a clean
//! pre-propagation state without reallocating.

use bitvec::prelude::*;
use glam::UVec2;

use crate::types::{NavFieldError, COST_NEUTRAL, COST_OBS, POT_HIGH};

/// Flat cell buffers for one planning field.
///
/// A cell `(x, y)` lives at linear index `y * width + x`. The outer border is
/// sealed with [`COST_OBS`] during propagation setup, so interior cells can
/// read all four neighbors without bounds checks.
#[derive(Debug, Clone)]
pub struct PotentialGrid {
    nx: usize,
    ny: usize,
    ns: usize,
    /// Traversal cost per cell, on the internal scale.
    pub(crate) cost: Vec<u8>,
    /// Navigation potential per cell; [`POT_HIGH`] means unreached.
    pub(crate) pot: Vec<f32>,
    /// Unit gradient of the potential, filled lazily by the path tracer.
    pub(crate) gradx: Vec<f32>,
    pub(crate) grady: Vec<f32>,
    /// One bit per cell: true iff the cell sits in some priority buffer.
    pub(crate) pending: BitVec,
}

impl PotentialGrid {
    pub fn new(width: u32, height: u32) -> Result<Self, NavFieldError> {
        if width == 0 || height == 0 {
            return Err(NavFieldError::InvalidDimensions(format!(
                "grid must be non-empty, got {width}x{height}"
            )));
        }
        let nx = width as usize;
        let ny = height as usize;
        let ns = nx * ny;
        Ok(Self {
            nx,
            ny,
            ns,
            cost: vec![COST_NEUTRAL; ns],
            pot: vec![POT_HIGH; ns],
            gradx: vec![0.0; ns],
            grady: vec![0.0; ns],
            pending: bitvec![0; ns],
        })
    }

    pub fn width(&self) -> u32 {
        self.nx as u32
    }

    pub fn height(&self) -> u32 {
        self.ny as u32
    }

    /// Grid width in cells, as the stride used for linear indexing.
    pub(crate) fn stride(&self) -> usize {
        self.nx
    }

    /// Total number of cells.
    pub fn size(&self) -> usize {
        self.ns
    }

    pub fn index(&self, cell: UVec2) -> usize {
        (cell.y as usize) * self.nx + (cell.x as usize)
    }

    pub fn contains(&self, cell: UVec2) -> bool {
        (cell.x as usize) < self.nx && (cell.y as usize) < self.ny
    }

    pub fn cost_at(&self, cell: UVec2) -> Option<u8> {
        self.contains(cell).then(|| self.cost[self.index(cell)])
    }

    pub fn potential_at(&self, cell: UVec2) -> Option<f32> {
        self.contains(cell).then(|| self.pot[self.index(cell)])
    }

    pub fn cost_data(&self) -> &[u8] {
        &self.cost
    }

    pub fn potential_data(&self) -> &[f32] {
        &self.pot
    }

    /// Reset the potential, gradient, and pending buffers for a new
    /// propagation and seal the outer border as obstacles.
    ///
    /// Costs written by the translator survive, except on the border.
    pub(crate) fn reset_for_propagation(&mut self) {
        self.pot.fill(POT_HIGH);
        self.gradx.fill(0.0);
        self.grady.fill(0.0);
        self.pending.fill(false);
        self.seal_border();
    }

    /// Mark every cell of the outermost ring as a lethal obstacle.
    fn seal_border(&mut self) {
        let (nx, ny) = (self.nx, self.ny);
        for x in 0..nx {
            self.cost[x] = COST_OBS;
            self.cost[(ny - 1) * nx + x] = COST_OBS;
        }
        for y in 0..ny {
            self.cost[y * nx] = COST_OBS;
            self.cost[y * nx + nx - 1] = COST_OBS;
        }
    }

    /// Number of lethal cells, for propagation statistics.
    pub(crate) fn obstacle_count(&self) -> usize {
        self.cost.iter().filter(|&&c| c >= COST_OBS).count()
    }
}
