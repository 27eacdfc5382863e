//! Math utilities module
//!
//! Provides convenient re-exports from glam and the Euler-degree transform used by parts.

mod transform;

pub use transform::{euler_degrees_to_quat, quat_to_euler_degrees, Transform};

// Re-export commonly used glam types
pub use glam::{Mat4, Quat, Vec3, Vec4};
