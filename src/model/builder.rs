use super::definition::{
    ConstraintDefinition, ModelDefinition, ModelMetadata, PartDefinition, TransformDefinition,
};
use super::shape::Shape;
use crate::constraint::{
    normalize_axis, Constraint, ConstraintKind, ValueRange, DEFAULT_SNAP_THRESHOLD,
    DEFAULT_SPRING_STRENGTH,
};
use crate::error::{ModelError, ModelResult};
use crate::math::{Quat, Transform, Vec3};
use std::collections::HashSet;

/// Validated coupling to a driving part.
#[derive(Debug, Clone, PartialEq)]
pub struct Link {
    pub part_id: String,
    pub ratio: f32,
}

/// A part of a validated model. Immutable once built.
#[derive(Debug, Clone, PartialEq)]
pub struct InteractivePart {
    pub id: String,
    pub shape: Shape,
    pub constraint: Constraint,
    pub initial_transform: Transform,
    pub linked_to: Option<Link>,
    pub color: Option<[f32; 3]>,
    pub visible: bool,
}

impl InteractivePart {
    /// Fixed and hidden parts never take part in hit-testing.
    pub fn is_pickable(&self) -> bool {
        self.visible && !self.constraint.is_fixed()
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct InteractiveModel {
    parts: Vec<InteractivePart>,
    metadata: Option<ModelMetadata>,
}

impl InteractiveModel {
    pub fn parts(&self) -> &[InteractivePart] {
        &self.parts
    }

    pub fn part(&self, id: &str) -> Option<&InteractivePart> {
        self.parts.iter().find(|p| p.id == id)
    }

    pub fn metadata(&self) -> Option<&ModelMetadata> {
        self.metadata.as_ref()
    }

    pub fn len(&self) -> usize {
        self.parts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }
}

/// Validates and normalizes a declarative model.
///
/// Fails on the first problem found; no partially built model is returned.
pub fn interactive(definition: ModelDefinition) -> ModelResult<InteractiveModel> {
    let mut seen = HashSet::with_capacity(definition.parts.len());
    for (index, part) in definition.parts.iter().enumerate() {
        if part.id.is_empty() {
            return Err(ModelError::EmptyId { index });
        }
        if !seen.insert(part.id.as_str()) {
            return Err(ModelError::DuplicateId(part.id.clone()));
        }
    }

    for part in &definition.parts {
        if let Some(link) = &part.linked_to {
            if !seen.contains(link.part_id.as_str()) {
                return Err(ModelError::DanglingLink {
                    part: part.id.clone(),
                    target: link.part_id.clone(),
                });
            }
        }
    }

    let parts = definition
        .parts
        .into_iter()
        .map(build_part)
        .collect::<ModelResult<Vec<_>>>()?;

    log::debug!("built interactive model with {} parts", parts.len());

    Ok(InteractiveModel {
        parts,
        metadata: definition.metadata,
    })
}

fn build_part(part: PartDefinition) -> ModelResult<InteractivePart> {
    let initial_transform = build_transform(part.initial_transform.unwrap_or_default());
    let constraint = build_constraint(&part.id, &part.constraint)?
        .with_rest_rotation(initial_transform.rotation_quat());
    Ok(InteractivePart {
        constraint,
        initial_transform,
        linked_to: part.linked_to.map(|link| Link {
            part_id: link.part_id,
            ratio: link.ratio,
        }),
        id: part.id,
        shape: part.shape,
        color: part.color,
        visible: part.visible,
    })
}

pub(crate) fn build_constraint(
    part_id: &str,
    definition: &ConstraintDefinition,
) -> ModelResult<Constraint> {
    let axis = definition.axis.map(Vec3::from).unwrap_or(Vec3::ZERO);
    let pivot = definition.pivot.map(Vec3::from).unwrap_or(Vec3::ZERO);

    let kind = match definition.kind.as_str() {
        "fixed" => ConstraintKind::Fixed,
        "hinge" => ConstraintKind::Hinge {
            axis: normalize_axis(axis, Vec3::Z),
            pivot,
        },
        "slider" => ConstraintKind::Slider {
            axis: normalize_axis(axis, Vec3::Y),
        },
        "ball" => ConstraintKind::Ball {
            pivot,
            rest: Quat::IDENTITY,
        },
        "piston" => ConstraintKind::Piston {
            axis: normalize_axis(axis, Vec3::Z),
        },
        "planar" => ConstraintKind::Planar {
            normal: normalize_axis(axis, Vec3::Y),
        },
        "free" => ConstraintKind::Free,
        other => {
            return Err(ModelError::InvalidConstraintType {
                part: part_id.to_string(),
                kind: other.to_string(),
            })
        }
    };

    let range = match definition.range {
        Some([min, max]) if min > max => {
            return Err(ModelError::Range {
                part: part_id.to_string(),
                min,
                max,
            })
        }
        Some([min, max]) => Some(ValueRange::new(min, max)),
        None => None,
    };

    Ok(Constraint {
        kind,
        range,
        damping: unit(definition.damping.unwrap_or(0.0)),
        spring_back: definition.spring_back,
        spring_strength: unit(definition.spring_strength.unwrap_or(DEFAULT_SPRING_STRENGTH)),
        snap_points: definition.snap_points.clone(),
        snap_threshold: definition
            .snap_threshold
            .filter(|t| t.is_finite() && *t >= 0.0)
            .unwrap_or(DEFAULT_SNAP_THRESHOLD),
    })
}

fn unit(value: f32) -> f32 {
    if value.is_finite() {
        value.clamp(0.0, 1.0)
    } else {
        0.0
    }
}

fn build_transform(definition: TransformDefinition) -> Transform {
    Transform::new(
        definition.position.map(Vec3::from).unwrap_or(Vec3::ZERO),
        definition.rotation.map(Vec3::from).unwrap_or(Vec3::ZERO),
        definition.scale.map(Vec3::from).unwrap_or(Vec3::ONE),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn part(id: &str, constraint: ConstraintDefinition) -> PartDefinition {
        PartDefinition::new(id, Shape::default(), constraint)
    }

    #[test]
    fn test_defaults_are_filled_in() {
        let model = interactive(ModelDefinition::new(vec![
            part("lid", ConstraintDefinition::of_kind("hinge")),
            part("tray", ConstraintDefinition::of_kind("slider")),
        ]))
        .unwrap();

        let lid = model.part("lid").unwrap();
        assert_eq!(
            lid.constraint.kind,
            ConstraintKind::Hinge {
                axis: Vec3::Z,
                pivot: Vec3::ZERO
            }
        );
        assert_eq!(lid.initial_transform, Transform::IDENTITY);
        assert_eq!(lid.constraint.snap_threshold, DEFAULT_SNAP_THRESHOLD);
        assert_eq!(
            model.part("tray").unwrap().constraint.kind,
            ConstraintKind::Slider { axis: Vec3::Y }
        );
    }

    #[test]
    fn test_axis_normalized_and_parameters_clamped() {
        let def = ConstraintDefinition::slider([3.0, 0.0, 4.0])
            .with_damping(1.5)
            .with_spring_back(-0.2);
        let c = build_constraint("p", &def).unwrap();
        let axis = c.kind.axis().unwrap();
        assert!(axis.abs_diff_eq(Vec3::new(0.6, 0.0, 0.8), 1e-6));
        assert_eq!(c.damping, 1.0);
        assert_eq!(c.spring_strength, 0.0);
    }

    #[test]
    fn test_zero_axis_uses_kind_default() {
        let c = build_constraint("p", &ConstraintDefinition::hinge([0.0; 3], [1.0, 0.0, 0.0]))
            .unwrap();
        assert_eq!(
            c.kind,
            ConstraintKind::Hinge {
                axis: Vec3::Z,
                pivot: Vec3::X
            }
        );
    }

    #[test]
    fn test_empty_id_rejected() {
        let err = interactive(ModelDefinition::new(vec![part("", ConstraintDefinition::free())]))
            .unwrap_err();
        assert_eq!(err, ModelError::EmptyId { index: 0 });
    }

    #[test]
    fn test_unknown_kind_rejected() {
        let err = interactive(ModelDefinition::new(vec![part(
            "p",
            ConstraintDefinition::of_kind("telescope"),
        )]))
        .unwrap_err();
        assert!(matches!(err, ModelError::InvalidConstraintType { ref kind, .. } if kind == "telescope"));
    }

    #[test]
    fn test_inverted_range_rejected() {
        let err = interactive(ModelDefinition::new(vec![part(
            "p",
            ConstraintDefinition::slider([0.0, 1.0, 0.0]).with_range(10.0, 0.0),
        )]))
        .unwrap_err();
        assert!(matches!(err, ModelError::Range { .. }));
    }

    #[test]
    fn test_fixed_and_hidden_parts_not_pickable() {
        let model = interactive(ModelDefinition::new(vec![
            part("base", ConstraintDefinition::fixed()),
            part("ghost", ConstraintDefinition::free()).hidden(),
            part("knob", ConstraintDefinition::free()),
        ]))
        .unwrap();
        let pickable: Vec<_> = model
            .parts()
            .iter()
            .filter(|p| p.is_pickable())
            .map(|p| p.id.as_str())
            .collect();
        assert_eq!(pickable, vec!["knob"]);
    }

    #[test]
    fn test_ball_rest_follows_initial_rotation() {
        let model = interactive(ModelDefinition::new(vec![part(
            "stick",
            ConstraintDefinition::ball([0.0; 3]),
        )
        .with_transform(TransformDefinition::at([0.0, 1.0, 0.0]).with_rotation([40.0, 0.0, 0.0]))]))
        .unwrap();

        let stick = model.part("stick").unwrap();
        let ConstraintKind::Ball { rest, .. } = stick.constraint.kind else {
            panic!("expected a ball joint, got {:?}", stick.constraint.kind);
        };
        assert!(rest.abs_diff_eq(stick.initial_transform.rotation_quat(), 1e-6));
    }
}
