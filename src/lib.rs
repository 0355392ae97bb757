//! Grid navigation function planning.
//!
//! Computes a potential field over a 2D cost grid by propagating a planar
//! wavefront outward from the goal, then extracts a smooth path by
//! descending the field's gradient from the start.

pub mod grid;
mod path;
pub mod planner;
pub mod snapshot;
pub mod translate;
pub mod types;
pub mod wave;

pub use grid::PotentialGrid;
pub use planner::{NavFieldPlanner, PlannerConfig};
pub use snapshot::save_snapshot;
pub use translate::CostEncoding;
pub use types::NavFieldError;
pub use wave::PropagationStats;
