//! The two-level bucketed priority queue driving the wavefront.
//!
//! Three fixed-capacity index buffers rotate through the roles *current*,
//! *next*, and *overflow*. Cells whose tentative potential stays below the
//! threshold go to *next* and are processed in the following pass; the rest
//! wait in *overflow* until the threshold is raised. Buffer storage never
//! moves; only the role indices rotate.

use crate::grid::PotentialGrid;
use crate::types::COST_OBS;

/// Role a buffer currently plays.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Slot {
    Current,
    Next,
    Overflow,
}

#[derive(Debug)]
pub(crate) struct PriorityBuffers {
    bufs: [Vec<usize>; 3],
    /// `roles[slot]` names the buffer currently playing that role.
    roles: [usize; 3],
    /// Ceiling separating *next* from *overflow*.
    pub(crate) threshold: f32,
    capacity: usize,
}

impl PriorityBuffers {
    pub(crate) fn new(capacity: usize) -> Self {
        Self {
            bufs: [
                Vec::with_capacity(capacity),
                Vec::with_capacity(capacity),
                Vec::with_capacity(capacity),
            ],
            roles: [0, 1, 2],
            threshold: 0.0,
            capacity,
        }
    }

    pub(crate) fn reset(&mut self, threshold: f32) {
        for buf in &mut self.bufs {
            buf.clear();
        }
        self.roles = [0, 1, 2];
        self.threshold = threshold;
    }

    pub(crate) fn len(&self, slot: Slot) -> usize {
        self.bufs[self.roles[slot as usize]].len()
    }

    pub(crate) fn is_empty(&self, slot: Slot) -> bool {
        self.len(slot) == 0
    }

    /// Admit cell `n` into the buffer playing `slot`.
    ///
    /// Admission requires: in-range index, not already buffered, not an
    /// obstacle, and free capacity. A full buffer drops the push; the cell
    /// can re-enter later through another neighbor.
    pub(crate) fn push(&mut self, slot: Slot, n: isize, grid: &mut PotentialGrid) {
        if n < 0 || n as usize >= grid.size() {
            return;
        }
        let n = n as usize;
        if grid.pending[n] || grid.cost[n] >= COST_OBS {
            return;
        }
        let buf = &mut self.bufs[self.roles[slot as usize]];
        if buf.len() >= self.capacity {
            return;
        }
        buf.push(n);
        grid.pending.set(n, true);
    }

    /// Take the current buffer's cells for processing, leaving it empty.
    pub(crate) fn begin_pass(&mut self) -> Vec<usize> {
        std::mem::take(&mut self.bufs[self.roles[Slot::Current as usize]])
    }

    /// Return storage taken by [`Self::begin_pass`] and swap current/next.
    pub(crate) fn end_pass(&mut self, mut storage: Vec<usize>) {
        storage.clear();
        self.bufs[self.roles[Slot::Current as usize]] = storage;
        self.roles
            .swap(Slot::Current as usize, Slot::Next as usize);
    }

    /// Raise the threshold and promote the overflow buffer to current.
    pub(crate) fn promote_overflow(&mut self, increment: f32) {
        self.threshold += increment;
        self.roles
            .swap(Slot::Current as usize, Slot::Overflow as usize);
    }

    /// Total buffered cells across all three roles.
    #[cfg(test)]
    pub(crate) fn total_len(&self) -> usize {
        self.bufs.iter().map(Vec::len).sum()
    }
}
