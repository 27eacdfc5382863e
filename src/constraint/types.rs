use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};

pub const DEFAULT_SNAP_THRESHOLD: f32 = 5.0;
pub const DEFAULT_SPRING_STRENGTH: f32 = 0.3;
/// Tolerance used when deciding whether a value rests on a range limit.
pub const LIMIT_EPSILON: f32 = 0.01;
/// Distance from the rest value at which spring-back snaps and stops.
pub const SPRING_REST_EPSILON: f32 = 0.1;
/// Hinge lever arms shorter than this skip the position-to-angle conversion.
pub const MIN_LEVER_ARM: f32 = 0.01;

/// Closed interval a constraint value is clamped to.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ValueRange {
    pub min: f32,
    pub max: f32,
}

impl ValueRange {
    pub fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    pub fn clamp(&self, value: f32) -> f32 {
        value.max(self.min).min(self.max)
    }

    pub fn contains(&self, value: f32) -> bool {
        value >= self.min && value <= self.max
    }
}

/// Degree of freedom and its geometric parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ConstraintKind {
    Fixed,
    /// Rotation about `axis` through `pivot`; value is an angle in degrees.
    Hinge { axis: Vec3, pivot: Vec3 },
    /// Translation along `axis`; value is a distance.
    Slider { axis: Vec3 },
    /// Free rotation about `pivot`; value is the angle turned away from `rest`, in degrees.
    Ball { pivot: Vec3, rest: Quat },
    /// Slider translation plus spin about the same axis.
    Piston { axis: Vec3 },
    /// Translation confined to the plane with the given normal.
    Planar { normal: Vec3 },
    Free,
}

impl ConstraintKind {
    pub fn name(&self) -> &'static str {
        match self {
            ConstraintKind::Fixed => "fixed",
            ConstraintKind::Hinge { .. } => "hinge",
            ConstraintKind::Slider { .. } => "slider",
            ConstraintKind::Ball { .. } => "ball",
            ConstraintKind::Piston { .. } => "piston",
            ConstraintKind::Planar { .. } => "planar",
            ConstraintKind::Free => "free",
        }
    }

    /// Axis a scalar value is measured along or about, if the kind has one.
    pub fn axis(&self) -> Option<Vec3> {
        match *self {
            ConstraintKind::Hinge { axis, .. }
            | ConstraintKind::Slider { axis }
            | ConstraintKind::Piston { axis } => Some(axis),
            ConstraintKind::Planar { normal } => Some(normal),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Constraint {
    pub kind: ConstraintKind,
    pub range: Option<ValueRange>,
    /// Fraction of each proposed change that is discarded, in `[0, 1]`.
    pub damping: f32,
    pub spring_back: bool,
    pub spring_strength: f32,
    pub snap_points: Vec<f32>,
    pub snap_threshold: f32,
}

impl Constraint {
    pub fn new(kind: ConstraintKind) -> Self {
        Self {
            kind,
            range: None,
            damping: 0.0,
            spring_back: false,
            spring_strength: DEFAULT_SPRING_STRENGTH,
            snap_points: Vec::new(),
            snap_threshold: DEFAULT_SNAP_THRESHOLD,
        }
    }

    pub fn fixed() -> Self {
        Self::new(ConstraintKind::Fixed)
    }

    pub fn hinge(axis: Vec3, pivot: Vec3) -> Self {
        Self::new(ConstraintKind::Hinge {
            axis: normalize_axis(axis, Vec3::Z),
            pivot,
        })
    }

    pub fn slider(axis: Vec3) -> Self {
        Self::new(ConstraintKind::Slider {
            axis: normalize_axis(axis, Vec3::Y),
        })
    }

    pub fn ball(pivot: Vec3) -> Self {
        Self::new(ConstraintKind::Ball {
            pivot,
            rest: Quat::IDENTITY,
        })
    }

    pub fn piston(axis: Vec3) -> Self {
        Self::new(ConstraintKind::Piston {
            axis: normalize_axis(axis, Vec3::Z),
        })
    }

    pub fn planar(normal: Vec3) -> Self {
        Self::new(ConstraintKind::Planar {
            normal: normalize_axis(normal, Vec3::Y),
        })
    }

    pub fn free() -> Self {
        Self::new(ConstraintKind::Free)
    }

    pub fn with_range(mut self, min: f32, max: f32) -> Self {
        self.range = Some(ValueRange::new(min, max));
        self
    }

    pub fn with_damping(mut self, damping: f32) -> Self {
        self.damping = damping.clamp(0.0, 1.0);
        self
    }

    pub fn with_spring_back(mut self, strength: f32) -> Self {
        self.spring_back = true;
        self.spring_strength = strength.clamp(0.0, 1.0);
        self
    }

    pub fn with_snap_points(mut self, points: impl Into<Vec<f32>>, threshold: f32) -> Self {
        self.snap_points = points.into();
        self.snap_threshold = threshold;
        self
    }

    /// Sets the orientation a ball joint measures its angle from. Other kinds are unchanged.
    pub fn with_rest_rotation(mut self, rotation: Quat) -> Self {
        if let ConstraintKind::Ball { ref mut rest, .. } = self.kind {
            *rest = rotation.normalize();
        }
        self
    }

    pub fn is_fixed(&self) -> bool {
        matches!(self.kind, ConstraintKind::Fixed)
    }
}

/// Normalizes `axis`, falling back to `fallback` for zero-length or non-finite input.
pub fn normalize_axis(axis: Vec3, fallback: Vec3) -> Vec3 {
    let normalized = axis.normalize_or_zero();
    if normalized.length_squared() < 0.0001 {
        fallback
    } else {
        normalized
    }
}

/// Unconstrained world-space change proposed for a part.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Delta {
    pub position: Option<Vec3>,
    /// Euler degrees.
    pub rotation: Option<Vec3>,
}

impl Delta {
    pub fn translation(position: Vec3) -> Self {
        Self {
            position: Some(position),
            rotation: None,
        }
    }

    pub fn rotation(rotation: Vec3) -> Self {
        Self {
            position: None,
            rotation: Some(rotation),
        }
    }

    pub fn scaled(&self, ratio: f32) -> Self {
        Self {
            position: self.position.map(|p| p * ratio),
            rotation: self.rotation.map(|r| r * ratio),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.position.is_none() && self.rotation.is_none()
    }
}

/// Which end of a range a value rests on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Limit {
    Min,
    Max,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_axis_falls_back_to_kind_default() {
        let c = Constraint::slider(Vec3::ZERO);
        assert_eq!(c.kind, ConstraintKind::Slider { axis: Vec3::Y });

        let c = Constraint::hinge(Vec3::ZERO, Vec3::ZERO);
        assert_eq!(c.kind.axis(), Some(Vec3::Z));
    }

    #[test]
    fn test_axis_is_normalized() {
        let c = Constraint::piston(Vec3::new(0.0, 0.0, 4.0));
        assert_eq!(c.kind.axis(), Some(Vec3::Z));
    }

    #[test]
    fn test_builder_clamps_unit_parameters() {
        let c = Constraint::free().with_damping(2.0).with_spring_back(-1.0);
        assert_eq!(c.damping, 1.0);
        assert_eq!(c.spring_strength, 0.0);
        assert!(c.spring_back);
    }

    #[test]
    fn test_rest_rotation_only_applies_to_ball() {
        let q = Quat::from_rotation_x(0.5);
        let ball = Constraint::ball(Vec3::Y).with_rest_rotation(q);
        let ConstraintKind::Ball { pivot, rest } = ball.kind else {
            panic!("expected a ball joint, got {:?}", ball.kind);
        };
        assert_eq!(pivot, Vec3::Y);
        assert!(rest.abs_diff_eq(q, 1e-6));

        let hinge = Constraint::hinge(Vec3::Z, Vec3::ZERO).with_rest_rotation(q);
        assert_eq!(hinge, Constraint::hinge(Vec3::Z, Vec3::ZERO));
    }

    #[test]
    fn test_delta_scaled() {
        let d = Delta::rotation(Vec3::new(0.0, 0.0, 30.0)).scaled(-0.5);
        assert_eq!(d.rotation, Some(Vec3::new(0.0, 0.0, -15.0)));
        assert!(d.position.is_none());
    }
}
