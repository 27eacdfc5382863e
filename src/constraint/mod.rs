//! Kinematic constraints
//!
//! Constraint value types and the pure solver that projects proposed motion
//! onto each constraint's degree of freedom.

pub mod solver;
pub mod types;

pub use solver::{ConstraintSolver, SolveResult, MIN_SPRING_STRENGTH};
pub use types::{
    normalize_axis, Constraint, ConstraintKind, Delta, Limit, ValueRange, DEFAULT_SNAP_THRESHOLD,
    DEFAULT_SPRING_STRENGTH, LIMIT_EPSILON, MIN_LEVER_ARM, SPRING_REST_EPSILON,
};
