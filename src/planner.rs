//! The planner facade: owns the field buffers and the priority queues,
//! wires the translator, propagator, and tracer together, and exposes the
//! synchronous planning API.

use glam::{UVec2, Vec2};
use log::debug;

use crate::grid::PotentialGrid;
use crate::path::tracer::trace_path;
use crate::translate::{apply_costmap, CostEncoding};
use crate::types::{NavFieldError, COST_NEUTRAL, COST_OBS, POT_HIGH, PRIORITY_BUF_SIZE};
use crate::wave::propagate::{propagate_astar, propagate_dijkstra, PropagationStats};
use crate::wave::queue::{PriorityBuffers, Slot};

/// Tuning knobs for planning. Defaults match the classic navigation
/// function parameters.
#[derive(Debug, Clone)]
pub struct PlannerConfig {
    /// Step length of the gradient descent, in cells.
    pub path_step: f32,
    /// Amount the bucket threshold rises when a priority level drains.
    pub priority_increment: f32,
    /// Capacity of each of the three priority buffers.
    pub priority_buf_size: usize,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            path_step: 0.5,
            priority_increment: 2.0 * COST_NEUTRAL as f32,
            priority_buf_size: PRIORITY_BUF_SIZE,
        }
    }
}

/// A navigation function planner over a 2D cost grid.
///
/// The planner computes a potential field describing the cost-to-goal of
/// every reachable cell, then extracts a path by descending the field's
/// gradient from the start. Buffers are reused across plans; keep the value
/// alive to amortize allocation.
///
/// # Example
///
/// ```
/// use navfield::{CostEncoding, NavFieldPlanner};
///
/// let mut planner = NavFieldPlanner::new(10, 10).unwrap();
/// planner.set_costmap(&[0u8; 100], CostEncoding::Ros, true).unwrap();
/// planner.set_goal(8, 8).unwrap();
/// planner.set_start(1, 1).unwrap();
/// assert!(planner.plan_astar());
/// assert!(!planner.path().is_empty());
/// ```
#[derive(Debug)]
pub struct NavFieldPlanner {
    grid: PotentialGrid,
    queues: PriorityBuffers,
    config: PlannerConfig,
    goal: UVec2,
    start: UVec2,
    path: Vec<Vec2>,
    last_path_cost: f32,
    stats: PropagationStats,
}

impl NavFieldPlanner {
    pub fn new(width: u32, height: u32) -> Result<Self, NavFieldError> {
        Self::with_config(width, height, PlannerConfig::default())
    }

    pub fn with_config(
        width: u32,
        height: u32,
        config: PlannerConfig,
    ) -> Result<Self, NavFieldError> {
        let grid = PotentialGrid::new(width, height)?;
        let queues = PriorityBuffers::new(config.priority_buf_size);
        Ok(Self {
            grid,
            queues,
            config,
            goal: UVec2::ZERO,
            start: UVec2::ZERO,
            path: Vec::new(),
            last_path_cost: POT_HIGH,
            stats: PropagationStats::default(),
        })
    }

    /// Reallocate the field for new dimensions. A no-op when the size is
    /// unchanged, preserving the buffers for reuse.
    pub fn resize(&mut self, width: u32, height: u32) -> Result<(), NavFieldError> {
        if width == self.grid.width() && height == self.grid.height() {
            return Ok(());
        }
        self.grid = PotentialGrid::new(width, height)?;
        self.path.clear();
        Ok(())
    }

    pub fn width(&self) -> u32 {
        self.grid.width()
    }

    pub fn height(&self) -> u32 {
        self.grid.height()
    }

    /// Translate an external cost grid into the field.
    pub fn set_costmap(
        &mut self,
        external: &[u8],
        encoding: CostEncoding,
        allow_unknown: bool,
    ) -> Result<(), NavFieldError> {
        apply_costmap(&mut self.grid, external, encoding, allow_unknown)
    }

    /// Set the goal cell. The potential field measures cost to reach this
    /// cell, so propagation grows outward from here.
    pub fn set_goal(&mut self, x: u32, y: u32) -> Result<(), NavFieldError> {
        self.goal = self.checked_cell(x, y)?;
        debug!("goal set to {},{}", x, y);
        Ok(())
    }

    pub fn set_start(&mut self, x: u32, y: u32) -> Result<(), NavFieldError> {
        self.start = self.checked_cell(x, y)?;
        debug!("start set to {},{}", x, y);
        Ok(())
    }

    pub fn goal(&self) -> UVec2 {
        self.goal
    }

    pub fn start(&self) -> UVec2 {
        self.start
    }

    /// Breadth-first plan: propagate for at most `cycles` passes, then trace.
    ///
    /// With `stop_at_start`, propagation ends as soon as the wavefront
    /// reaches the start cell. Returns whether a path was found; on failure
    /// [`Self::path`] is empty.
    pub fn plan_dijkstra(&mut self, cycles: usize, stop_at_start: bool) -> bool {
        self.path.clear();
        if !self.setup_propagation() {
            return false;
        }

        let start_cell = self.grid.index(self.start);
        let (_, stats) = propagate_dijkstra(
            &mut self.grid,
            &mut self.queues,
            start_cell,
            cycles,
            stop_at_start,
            self.config.priority_increment,
        );
        self.stats = stats;

        let max_len = self.grid.size() / 2;
        self.path = trace_path(
            &mut self.grid,
            self.goal,
            start_cell,
            max_len,
            self.config.path_step,
        );
        !self.path.is_empty()
    }

    /// Best-first plan with the default cycle budget.
    ///
    /// Records the start cell's potential as [`Self::last_path_cost`].
    pub fn plan_astar(&mut self) -> bool {
        self.path.clear();
        if !self.setup_propagation() {
            return false;
        }

        let default_cycles = self.default_cycles();
        let (_, stats) = propagate_astar(
            &mut self.grid,
            &mut self.queues,
            self.goal,
            self.start,
            default_cycles,
            self.config.priority_increment,
        );
        self.stats = stats;

        let start_cell = self.grid.index(self.start);
        self.last_path_cost = self.grid.pot[start_cell];

        let max_len = self.grid.width() as usize * 4;
        self.path = trace_path(
            &mut self.grid,
            self.goal,
            start_cell,
            max_len,
            self.config.path_step,
        );
        !self.path.is_empty()
    }

    /// Re-trace a path over the last computed potential field from an
    /// arbitrary start cell, without propagating again.
    pub fn trace_from(
        &mut self,
        x: u32,
        y: u32,
        max_len: usize,
    ) -> Result<&[Vec2], NavFieldError> {
        let cell = self.checked_cell(x, y)?;
        let start_cell = self.grid.index(cell);
        self.path = trace_path(
            &mut self.grid,
            self.goal,
            start_cell,
            max_len,
            self.config.path_step,
        );
        Ok(&self.path)
    }

    /// The classic propagation budget: a twentieth of the field, floored at
    /// one grid circumference.
    pub fn default_cycles(&self) -> usize {
        (self.grid.size() / 20).max((self.grid.width() + self.grid.height()) as usize)
    }

    /// The last computed path, start to goal, in sub-cell grid coordinates.
    /// Empty means no path was found.
    pub fn path(&self) -> &[Vec2] {
        &self.path
    }

    /// Potential at the start cell when the last A* propagation ended.
    pub fn last_path_cost(&self) -> f32 {
        self.last_path_cost
    }

    /// Counters from the last propagation run.
    pub fn stats(&self) -> &PropagationStats {
        &self.stats
    }

    pub fn cost_at(&self, x: u32, y: u32) -> Option<u8> {
        self.grid.cost_at(UVec2::new(x, y))
    }

    pub fn potential_at(&self, x: u32, y: u32) -> Option<f32> {
        self.grid.potential_at(UVec2::new(x, y))
    }

    pub fn cost_data(&self) -> &[u8] {
        self.grid.cost_data()
    }

    pub fn potential_data(&self) -> &[f32] {
        self.grid.potential_data()
    }

    /// Reset the field, seal the border, and seed the goal. False when the
    /// goal sits on an obstacle: no wave can end there.
    fn setup_propagation(&mut self) -> bool {
        self.grid.reset_for_propagation();
        self.queues.reset(COST_OBS as f32);

        let k = self.grid.index(self.goal);
        if self.grid.cost[k] >= COST_OBS {
            debug!("goal cell is an obstacle, refusing to plan");
            return false;
        }

        self.seed_goal(k, 0.0);
        true
    }

    /// Give the goal cell its initial potential and queue its neighbors.
    fn seed_goal(&mut self, k: usize, value: f32) {
        self.grid.pot[k] = value;
        let k = k as isize;
        let nx = self.grid.stride() as isize;
        for m in [k + 1, k - 1, k - nx, k + nx] {
            self.queues.push(Slot::Current, m, &mut self.grid);
        }
    }

    fn checked_cell(&self, x: u32, y: u32) -> Result<UVec2, NavFieldError> {
        let cell = UVec2::new(x, y);
        if !self.grid.contains(cell) {
            return Err(NavFieldError::OutOfBounds(format!(
                "cell ({x}, {y}) outside {}x{} field",
                self.grid.width(),
                self.grid.height()
            )));
        }
        Ok(cell)
    }
}
