/// Nominal per-step cost of free space.
pub const COST_NEUTRAL: u8 = 50;
/// Lethal obstacle; cells at or above this value never propagate.
pub const COST_OBS: u8 = 254;
/// Incoming "inscribed inflated obstacle" threshold (ROS encoding).
pub const COST_OBS_ROS: u8 = 253;
/// Incoming "unknown" marker (ROS encoding).
pub const COST_UNKNOWN_EXT: u8 = 255;
/// Scale applied to incoming cost values before the neutral offset.
pub const COST_FACTOR: f32 = 0.8;

/// Potential sentinel for cells the wavefront has not reached.
pub const POT_HIGH: f32 = 1.0e10;

/// Default capacity of each priority buffer.
pub const PRIORITY_BUF_SIZE: usize = 10_000;
