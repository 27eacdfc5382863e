//! Convenience constructors for common part kinds.
//!
//! These only assemble definitions; validation happens in [`super::interactive`].

use super::definition::{ConstraintDefinition, PartDefinition};
use super::shape::Shape;

pub fn fixed_part(id: impl Into<String>, shape: Shape) -> PartDefinition {
    PartDefinition::new(id, shape, ConstraintDefinition::fixed())
}

pub fn hinge_part(
    id: impl Into<String>,
    shape: Shape,
    axis: [f32; 3],
    pivot: [f32; 3],
    range: Option<[f32; 2]>,
) -> PartDefinition {
    let mut constraint = ConstraintDefinition::hinge(axis, pivot);
    constraint.range = range;
    PartDefinition::new(id, shape, constraint)
}

pub fn slider_part(
    id: impl Into<String>,
    shape: Shape,
    axis: [f32; 3],
    range: Option<[f32; 2]>,
) -> PartDefinition {
    let mut constraint = ConstraintDefinition::slider(axis);
    constraint.range = range;
    PartDefinition::new(id, shape, constraint)
}

/// Ball joint about `pivot`; `max_angle` limits the total rotation in degrees.
pub fn ball_joint_part(
    id: impl Into<String>,
    shape: Shape,
    pivot: [f32; 3],
    max_angle: Option<f32>,
) -> PartDefinition {
    let mut constraint = ConstraintDefinition::ball(pivot);
    constraint.range = max_angle.map(|max| [0.0, max]);
    PartDefinition::new(id, shape, constraint)
}

/// Part driven by `drive_id`: every delta applied to the driver reaches this
/// part scaled by `ratio`.
pub fn linked_part(
    id: impl Into<String>,
    shape: Shape,
    drive_id: impl Into<String>,
    ratio: f32,
    constraint: ConstraintDefinition,
) -> PartDefinition {
    PartDefinition::new(id, shape, constraint).linked_to(drive_id, ratio)
}
