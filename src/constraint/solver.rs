use super::types::{
    Constraint, ConstraintKind, Delta, Limit, LIMIT_EPSILON, MIN_LEVER_ARM, SPRING_REST_EPSILON,
};
use crate::math::{euler_degrees_to_quat, Transform};
use glam::{Quat, Vec3};

/// Spring strengths below this are raised to it so spring-back always terminates.
pub const MIN_SPRING_STRENGTH: f32 = 0.01;
/// Reference frame length the spring strength is expressed against.
const SPRING_FRAME_MS: f32 = 1000.0 / 60.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SolveResult {
    pub transform: Transform,
    pub value: f32,
}

impl SolveResult {
    fn unchanged(transform: &Transform, value: f32) -> Self {
        Self {
            transform: *transform,
            value,
        }
    }

    pub fn is_finite(&self) -> bool {
        self.transform.is_finite() && self.value.is_finite()
    }
}

/// Stateless kinematic solver.
pub struct ConstraintSolver;

impl ConstraintSolver {
    pub fn apply_constraint(
        constraint: &Constraint,
        current: &Transform,
        delta: &Delta,
        current_value: f32,
    ) -> SolveResult {
        match constraint.kind {
            ConstraintKind::Fixed => SolveResult::unchanged(current, 0.0),
            ConstraintKind::Hinge { axis, pivot } => {
                Self::solve_hinge(constraint, axis, pivot, current, delta, current_value)
            }
            ConstraintKind::Slider { axis } => {
                Self::solve_slider(constraint, axis, current, delta, current_value)
            }
            ConstraintKind::Ball { pivot, rest } => {
                Self::solve_ball(constraint, pivot, rest, current, delta, current_value)
            }
            ConstraintKind::Piston { axis } => {
                let mut result = Self::solve_slider(constraint, axis, current, delta, current_value);
                if let Some(rotation) = delta.rotation {
                    result.transform.rotation += axis * rotation.dot(axis);
                }
                result
            }
            ConstraintKind::Planar { normal } => {
                let mut transform = *current;
                if let Some(offset) = delta.position {
                    transform.position += offset - normal * offset.dot(normal);
                }
                SolveResult {
                    transform,
                    value: current_value,
                }
            }
            ConstraintKind::Free => {
                let mut transform = *current;
                if let Some(offset) = delta.position {
                    transform.position += offset;
                }
                if let Some(rotation) = delta.rotation {
                    transform.rotation += rotation;
                }
                SolveResult {
                    transform,
                    value: current_value,
                }
            }
        }
    }

    /// Re-poses a part so its scalar value becomes `target` (clamped to the range).
    ///
    /// Used for snapping and spring-back; damping is not applied.
    pub fn drive_to(
        constraint: &Constraint,
        current: &Transform,
        current_value: f32,
        target: f32,
    ) -> SolveResult {
        let target = constraint.range.map_or(target, |r| r.clamp(target));
        let diff = target - current_value;
        if diff == 0.0 {
            return SolveResult::unchanged(current, current_value);
        }

        match constraint.kind {
            ConstraintKind::Hinge { axis, pivot } => SolveResult {
                transform: rotate_about(current, axis, pivot, diff),
                value: target,
            },
            ConstraintKind::Slider { axis } | ConstraintKind::Piston { axis } => {
                let mut transform = *current;
                transform.position += axis * diff;
                SolveResult {
                    transform,
                    value: target,
                }
            }
            ConstraintKind::Ball { pivot, rest } => {
                let q_current = current.rotation_quat();
                let rv_current = rotation_vector(q_current * rest.inverse());
                let angle = rv_current.length();
                let rv_target = if angle > f32::EPSILON {
                    rv_current * (target.max(0.0).to_radians() / angle)
                } else {
                    Vec3::ZERO
                };
                SolveResult {
                    transform: reorient_about(current, pivot, q_current, rest, rv_target),
                    value: target.max(0.0),
                }
            }
            ConstraintKind::Fixed | ConstraintKind::Planar { .. } | ConstraintKind::Free => {
                SolveResult::unchanged(current, current_value)
            }
        }
    }

    pub fn value_delta(constraint: &Constraint, amount: f32) -> Delta {
        match constraint.kind {
            ConstraintKind::Hinge { axis, .. } => Delta::rotation(axis * amount),
            ConstraintKind::Slider { axis } | ConstraintKind::Piston { axis } => {
                Delta::translation(axis * amount)
            }
            _ => Delta::default(),
        }
    }

    /// Decays exponentially with elapsed time and lands exactly on
    /// `initial_value` once within [`SPRING_REST_EPSILON`] of it.
    pub fn apply_spring_back(
        constraint: &Constraint,
        current_value: f32,
        initial_value: f32,
        dt_ms: f32,
    ) -> f32 {
        if (current_value - initial_value).abs() < SPRING_REST_EPSILON {
            return initial_value;
        }
        if dt_ms <= 0.0 || !dt_ms.is_finite() {
            return current_value;
        }

        let strength = constraint.spring_strength.clamp(MIN_SPRING_STRENGTH, 1.0);
        let retained = (1.0 - strength).powf(dt_ms / SPRING_FRAME_MS);
        let next = initial_value + (current_value - initial_value) * retained;

        if (next - initial_value).abs() < SPRING_REST_EPSILON {
            initial_value
        } else {
            next
        }
    }

    pub fn is_at_limit(constraint: &Constraint, value: f32) -> Option<Limit> {
        let range = constraint.range?;
        if value <= range.min + LIMIT_EPSILON {
            Some(Limit::Min)
        } else if value >= range.max - LIMIT_EPSILON {
            Some(Limit::Max)
        } else {
            None
        }
    }

    /// First snap point (in declaration order) within the snap threshold, else `value`.
    pub fn apply_snap(constraint: &Constraint, value: f32) -> f32 {
        constraint
            .snap_points
            .iter()
            .copied()
            .find(|point| (value - point).abs() <= constraint.snap_threshold)
            .unwrap_or(value)
    }

    fn settle(constraint: &Constraint, current_value: f32, proposed: f32) -> f32 {
        let clamped = constraint.range.map_or(proposed, |r| r.clamp(proposed));
        if constraint.damping <= 0.0 {
            return clamped;
        }
        current_value + (clamped - current_value) * (1.0 - constraint.damping)
    }

    fn solve_hinge(
        constraint: &Constraint,
        axis: Vec3,
        pivot: Vec3,
        current: &Transform,
        delta: &Delta,
        current_value: f32,
    ) -> SolveResult {
        let angle = if let Some(rotation) = delta.rotation {
            signed_angle_about(euler_degrees_to_quat(rotation), axis)
        } else if let Some(offset) = delta.position {
            position_to_hinge_angle(axis, pivot, current.position, offset)
        } else {
            0.0
        };

        let value = Self::settle(constraint, current_value, current_value + angle);
        SolveResult {
            transform: rotate_about(current, axis, pivot, value - current_value),
            value,
        }
    }

    fn solve_slider(
        constraint: &Constraint,
        axis: Vec3,
        current: &Transform,
        delta: &Delta,
        current_value: f32,
    ) -> SolveResult {
        let distance = delta.position.map_or(0.0, |offset| offset.dot(axis));
        let value = Self::settle(constraint, current_value, current_value + distance);

        let mut transform = *current;
        transform.position += axis * (value - current_value);
        SolveResult { transform, value }
    }

    fn solve_ball(
        constraint: &Constraint,
        pivot: Vec3,
        rest: Quat,
        current: &Transform,
        delta: &Delta,
        current_value: f32,
    ) -> SolveResult {
        let Some(rotation) = delta.rotation else {
            return SolveResult::unchanged(current, current_value);
        };

        let q_current = current.rotation_quat();
        let rv_current = rotation_vector(q_current * rest.inverse());
        let mut proposed = rv_current + rotation_vector(euler_degrees_to_quat(rotation));

        if let Some(range) = constraint.range {
            let max = range.max.max(0.0).to_radians();
            let total = proposed.length();
            if total > max {
                proposed = if total > f32::EPSILON {
                    proposed * (max / total)
                } else {
                    Vec3::ZERO
                };
            }
        }

        let rv = rv_current + (proposed - rv_current) * (1.0 - constraint.damping);
        SolveResult {
            transform: reorient_about(current, pivot, q_current, rest, rv),
            value: rv.length().to_degrees(),
        }
    }
}

fn rotate_about(current: &Transform, axis: Vec3, pivot: Vec3, degrees: f32) -> Transform {
    if degrees == 0.0 {
        return *current;
    }
    let q = Quat::from_axis_angle(axis, degrees.to_radians());
    let mut transform = *current;
    transform.position = pivot + q * (current.position - pivot);
    transform.with_rotation_quat(q * current.rotation_quat())
}

/// Poses a part turned by `rv` (axis * angle, radians) away from `rest` about `pivot`.
fn reorient_about(
    current: &Transform,
    pivot: Vec3,
    q_current: Quat,
    rest: Quat,
    rv: Vec3,
) -> Transform {
    let q_new = Quat::from_scaled_axis(rv) * rest;
    let local_offset = q_current.inverse() * (current.position - pivot);
    let mut transform = *current;
    transform.position = pivot + q_new * local_offset;
    transform.with_rotation_quat(q_new)
}

fn rotation_vector(q: Quat) -> Vec3 {
    let q = q.normalize();
    if q.w < 0.0 {
        (-q).to_scaled_axis()
    } else {
        q.to_scaled_axis()
    }
}

/// Signed angle of `q` about `axis` in degrees, in `(-360, 360)` so large deltas do not wrap.
fn signed_angle_about(q: Quat, axis: Vec3) -> f32 {
    let q = q.normalize();
    (2.0 * q.xyz().dot(axis).atan2(q.w)).to_degrees()
}

/// `atan(chord / lever_arm)` of the in-plane drag, signed by the turning direction.
fn position_to_hinge_angle(axis: Vec3, pivot: Vec3, position: Vec3, offset: Vec3) -> f32 {
    let in_plane = offset - axis * offset.dot(axis);
    let chord = in_plane.length();
    let lever = position - pivot;
    let lever_arm = lever.length();
    if lever_arm < MIN_LEVER_ARM || chord <= f32::EPSILON {
        return 0.0;
    }

    let radial = lever - axis * lever.dot(axis);
    let reference = if radial.length_squared() < 1e-8 {
        axis.any_orthonormal_vector()
    } else {
        radial
    };
    let sign = if reference.cross(in_plane).dot(axis) >= 0.0 {
        1.0
    } else {
        -1.0
    };

    sign * (chord / lever_arm).atan().to_degrees()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constraint::types::ValueRange;

    fn approx(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-3
    }

    #[test]
    fn test_hinge_rotation_delta_accumulates_and_clamps() {
        let hinge = Constraint::hinge(Vec3::X, Vec3::ZERO).with_range(0.0, 90.0);
        let start = Transform::IDENTITY;

        let first = ConstraintSolver::apply_constraint(
            &hinge,
            &start,
            &Delta::rotation(Vec3::new(45.0, 0.0, 0.0)),
            0.0,
        );
        assert!(approx(first.value, 45.0));

        let second = ConstraintSolver::apply_constraint(
            &hinge,
            &first.transform,
            &Delta::rotation(Vec3::new(60.0, 0.0, 0.0)),
            first.value,
        );
        assert_eq!(second.value, 90.0);
        assert!(approx(second.transform.rotation.x, 90.0));
    }

    #[test]
    fn test_hinge_rotates_position_about_pivot() {
        let hinge = Constraint::hinge(Vec3::Z, Vec3::ZERO);
        let start = Transform::from_position(Vec3::X);
        let result = ConstraintSolver::apply_constraint(
            &hinge,
            &start,
            &Delta::rotation(Vec3::new(0.0, 0.0, 90.0)),
            0.0,
        );
        assert!(result.transform.position.abs_diff_eq(Vec3::Y, 1e-4));
        assert!(approx(result.value, 90.0));
    }

    #[test]
    fn test_hinge_position_delta_uses_lever_arm() {
        let hinge = Constraint::hinge(Vec3::Z, Vec3::ZERO);
        let start = Transform::from_position(Vec3::X);
        // Drag the tip one unit "up": atan(1 / 1) = 45 degrees counter-clockwise.
        let result = ConstraintSolver::apply_constraint(
            &hinge,
            &start,
            &Delta::translation(Vec3::Y),
            0.0,
        );
        assert!(approx(result.value, 45.0));

        let down = ConstraintSolver::apply_constraint(
            &hinge,
            &start,
            &Delta::translation(Vec3::NEG_Y),
            0.0,
        );
        assert!(approx(down.value, -45.0));
    }

    #[test]
    fn test_hinge_ignores_position_delta_at_pivot() {
        let hinge = Constraint::hinge(Vec3::Z, Vec3::ZERO);
        let result = ConstraintSolver::apply_constraint(
            &hinge,
            &Transform::IDENTITY,
            &Delta::translation(Vec3::Y),
            0.0,
        );
        assert_eq!(result.value, 0.0);
        assert_eq!(result.transform, Transform::IDENTITY);
    }

    #[test]
    fn test_damping_scales_change() {
        let slider = Constraint::slider(Vec3::Y).with_damping(0.5);
        let result = ConstraintSolver::apply_constraint(
            &slider,
            &Transform::IDENTITY,
            &Delta::translation(Vec3::new(3.0, 10.0, 0.0)),
            0.0,
        );
        assert!(approx(result.value, 5.0));
        assert!(result.transform.position.abs_diff_eq(Vec3::new(0.0, 5.0, 0.0), 1e-5));
    }

    #[test]
    fn test_slider_clamps_to_range() {
        let slider = Constraint::slider(Vec3::Y).with_range(0.0, 50.0);
        let result = ConstraintSolver::apply_constraint(
            &slider,
            &Transform::IDENTITY,
            &Delta::translation(Vec3::new(0.0, 80.0, 0.0)),
            0.0,
        );
        assert_eq!(result.value, 50.0);
        assert_eq!(result.transform.position, Vec3::new(0.0, 50.0, 0.0));
    }

    #[test]
    fn test_ball_limits_total_angle() {
        let ball = Constraint::ball(Vec3::ZERO).with_range(0.0, 30.0);
        let start = Transform::from_position(Vec3::Y);
        let result = ConstraintSolver::apply_constraint(
            &ball,
            &start,
            &Delta::rotation(Vec3::new(50.0, 0.0, 0.0)),
            0.0,
        );
        assert!(approx(result.value, 30.0));
        assert!(approx(result.transform.rotation.x, 30.0));
        let expected = Quat::from_rotation_x(30f32.to_radians()) * Vec3::Y;
        assert!(result.transform.position.abs_diff_eq(expected, 1e-4));
    }

    #[test]
    fn test_ball_position_is_absolute_in_accumulated_rotation() {
        let ball = Constraint::ball(Vec3::ZERO);
        let start = Transform::from_position(Vec3::Y);
        let mut state = SolveResult::unchanged(&start, 0.0);
        for _ in 0..3 {
            state = ConstraintSolver::apply_constraint(
                &ball,
                &state.transform,
                &Delta::rotation(Vec3::new(0.0, 0.0, 30.0)),
                state.value,
            );
        }
        assert!(approx(state.value, 90.0));
        assert!(state.transform.position.abs_diff_eq(Vec3::NEG_X, 1e-4));
    }

    #[test]
    fn test_hinge_rotation_delta_past_half_turn_does_not_wrap() {
        let hinge = Constraint::hinge(Vec3::Z, Vec3::ZERO).with_range(-90.0, 270.0);
        let start = Transform::from_position(Vec3::X);

        let wide = ConstraintSolver::apply_constraint(
            &hinge,
            &start,
            &Delta::rotation(Vec3::new(0.0, 0.0, 200.0)),
            0.0,
        );
        assert!(approx(wide.value, 200.0), "got {}", wide.value);
        let expected = Quat::from_rotation_z(200f32.to_radians()) * Vec3::X;
        assert!(wide.transform.position.abs_diff_eq(expected, 1e-4));

        let narrow = ConstraintSolver::apply_constraint(
            &hinge,
            &start,
            &Delta::rotation(Vec3::new(0.0, 0.0, 179.0)),
            0.0,
        );
        assert!(approx(narrow.value, 179.0));

        let backwards = ConstraintSolver::apply_constraint(
            &Constraint::hinge(Vec3::Z, Vec3::ZERO),
            &start,
            &Delta::rotation(Vec3::new(0.0, 0.0, -200.0)),
            0.0,
        );
        assert!(approx(backwards.value, -200.0));
    }

    #[test]
    fn test_ball_angle_is_measured_from_rest_orientation() {
        let rest = Transform::new(Vec3::Y, Vec3::new(40.0, 0.0, 0.0), Vec3::ONE);
        let ball = Constraint::ball(Vec3::ZERO)
            .with_range(0.0, 45.0)
            .with_rest_rotation(rest.rotation_quat());

        let tilted = ConstraintSolver::apply_constraint(
            &ball,
            &rest,
            &Delta::rotation(Vec3::new(10.0, 0.0, 0.0)),
            0.0,
        );
        assert!(approx(tilted.value, 10.0), "got {}", tilted.value);
        assert!(approx(tilted.transform.rotation.x, 50.0));
        assert!(approx(tilted.transform.rotation.y, 0.0));
        let expected = Quat::from_rotation_x(10f32.to_radians()) * Vec3::Y;
        assert!(tilted.transform.position.abs_diff_eq(expected, 1e-4));

        let clamped = ConstraintSolver::apply_constraint(
            &ball,
            &tilted.transform,
            &Delta::rotation(Vec3::new(60.0, 0.0, 0.0)),
            tilted.value,
        );
        assert!(approx(clamped.value, 45.0));
        assert!(approx(clamped.transform.rotation.x, 85.0));

        let back = ConstraintSolver::drive_to(&ball, &clamped.transform, clamped.value, 0.0);
        assert_eq!(back.value, 0.0);
        assert!(approx(back.transform.rotation.x, 40.0));
        assert!(back.transform.position.abs_diff_eq(Vec3::Y, 1e-4));
    }

    #[test]
    fn test_piston_translates_and_spins() {
        let piston = Constraint::piston(Vec3::Z);
        let delta = Delta {
            position: Some(Vec3::new(1.0, 1.0, 2.0)),
            rotation: Some(Vec3::new(10.0, 0.0, 15.0)),
        };
        let result =
            ConstraintSolver::apply_constraint(&piston, &Transform::IDENTITY, &delta, 0.0);
        assert!(approx(result.value, 2.0));
        assert_eq!(result.transform.position, Vec3::new(0.0, 0.0, 2.0));
        assert_eq!(result.transform.rotation, Vec3::new(0.0, 0.0, 15.0));
    }

    #[test]
    fn test_planar_removes_normal_component() {
        let planar = Constraint::planar(Vec3::Y);
        let result = ConstraintSolver::apply_constraint(
            &planar,
            &Transform::IDENTITY,
            &Delta::translation(Vec3::new(1.0, 5.0, -2.0)),
            0.0,
        );
        assert_eq!(result.transform.position, Vec3::new(1.0, 0.0, -2.0));
    }

    #[test]
    fn test_drive_to_hinge_and_ball() {
        let hinge = Constraint::hinge(Vec3::Z, Vec3::ZERO);
        let start = Transform::from_position(Vec3::X);
        let driven = ConstraintSolver::drive_to(&hinge, &start, 0.0, 90.0);
        assert_eq!(driven.value, 90.0);
        assert!(driven.transform.position.abs_diff_eq(Vec3::Y, 1e-4));

        let ball = Constraint::ball(Vec3::ZERO);
        let tilted = ConstraintSolver::apply_constraint(
            &ball,
            &Transform::from_position(Vec3::Y),
            &Delta::rotation(Vec3::new(40.0, 0.0, 0.0)),
            0.0,
        );
        let back = ConstraintSolver::drive_to(&ball, &tilted.transform, tilted.value, 0.0);
        assert_eq!(back.value, 0.0);
        assert!(back.transform.position.abs_diff_eq(Vec3::Y, 1e-4));
    }

    #[test]
    fn test_spring_back_snaps_within_epsilon() {
        let slider = Constraint::slider(Vec3::Y).with_spring_back(0.5);
        assert_eq!(ConstraintSolver::apply_spring_back(&slider, 0.05, 0.0, 16.0), 0.0);
        let next = ConstraintSolver::apply_spring_back(&slider, 40.0, 0.0, SPRING_FRAME_MS);
        assert!(approx(next, 20.0));
        assert_eq!(ConstraintSolver::apply_spring_back(&slider, 40.0, 0.0, 0.0), 40.0);
    }

    #[test]
    fn test_spring_back_with_zero_strength_still_terminates() {
        let slider = Constraint::slider(Vec3::Y).with_spring_back(0.0);
        let mut value = 10.0;
        let mut ticks = 0;
        while value != 0.0 {
            value = ConstraintSolver::apply_spring_back(&slider, value, 0.0, 100.0);
            ticks += 1;
            assert!(ticks < 10_000);
        }
    }

    #[test]
    fn test_is_at_limit() {
        let c = Constraint::hinge(Vec3::Z, Vec3::ZERO).with_range(0.0, 90.0);
        assert_eq!(ConstraintSolver::is_at_limit(&c, 0.0), Some(Limit::Min));
        assert_eq!(ConstraintSolver::is_at_limit(&c, 90.0), Some(Limit::Max));
        assert_eq!(ConstraintSolver::is_at_limit(&c, 45.0), None);
        assert_eq!(ConstraintSolver::is_at_limit(&Constraint::free(), 0.0), None);
    }

    #[test]
    fn test_apply_snap() {
        let c = Constraint::hinge(Vec3::Z, Vec3::ZERO).with_snap_points(vec![0.0, 90.0, 180.0], 5.0);
        assert_eq!(ConstraintSolver::apply_snap(&c, 92.0), 90.0);
        assert_eq!(ConstraintSolver::apply_snap(&c, 70.0), 70.0);
    }

    #[test]
    fn test_snap_first_match_wins() {
        let c = Constraint::slider(Vec3::Y).with_snap_points(vec![10.0, 8.0], 5.0);
        assert_eq!(ConstraintSolver::apply_snap(&c, 8.0), 10.0);
    }

    #[test]
    fn test_value_range_clamp() {
        let r = ValueRange::new(-10.0, 10.0);
        assert_eq!(r.clamp(20.0), 10.0);
        assert_eq!(r.clamp(-20.0), -10.0);
        assert!(r.contains(0.0));
    }
}
