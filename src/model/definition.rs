use super::shape::Shape;
use serde::{Deserialize, Serialize};

/// Declarative constraint description, as authored by hand or loaded from JSON.
///
/// `kind` is free text here; it is resolved to a [`crate::constraint::ConstraintKind`]
/// by [`crate::model::interactive`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConstraintDefinition {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub axis: Option<[f32; 3]>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pivot: Option<[f32; 3]>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub range: Option<[f32; 2]>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub damping: Option<f32>,
    #[serde(default)]
    pub spring_back: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub spring_strength: Option<f32>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub snap_points: Vec<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub snap_threshold: Option<f32>,
}

impl ConstraintDefinition {
    pub fn of_kind(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            ..Default::default()
        }
    }

    pub fn fixed() -> Self {
        Self::of_kind("fixed")
    }

    pub fn hinge(axis: [f32; 3], pivot: [f32; 3]) -> Self {
        Self {
            axis: Some(axis),
            pivot: Some(pivot),
            ..Self::of_kind("hinge")
        }
    }

    pub fn slider(axis: [f32; 3]) -> Self {
        Self {
            axis: Some(axis),
            ..Self::of_kind("slider")
        }
    }

    pub fn ball(pivot: [f32; 3]) -> Self {
        Self {
            pivot: Some(pivot),
            ..Self::of_kind("ball")
        }
    }

    pub fn piston(axis: [f32; 3]) -> Self {
        Self {
            axis: Some(axis),
            ..Self::of_kind("piston")
        }
    }

    pub fn planar(normal: [f32; 3]) -> Self {
        Self {
            axis: Some(normal),
            ..Self::of_kind("planar")
        }
    }

    pub fn free() -> Self {
        Self::of_kind("free")
    }

    pub fn with_range(mut self, min: f32, max: f32) -> Self {
        self.range = Some([min, max]);
        self
    }

    pub fn with_damping(mut self, damping: f32) -> Self {
        self.damping = Some(damping);
        self
    }

    pub fn with_spring_back(mut self, strength: f32) -> Self {
        self.spring_back = true;
        self.spring_strength = Some(strength);
        self
    }

    pub fn with_snap_points(mut self, points: impl Into<Vec<f32>>, threshold: f32) -> Self {
        self.snap_points = points.into();
        self.snap_threshold = Some(threshold);
        self
    }
}

/// Initial placement; missing fields take identity defaults.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct TransformDefinition {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<[f32; 3]>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rotation: Option<[f32; 3]>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scale: Option<[f32; 3]>,
}

impl TransformDefinition {
    pub fn at(position: [f32; 3]) -> Self {
        Self {
            position: Some(position),
            ..Default::default()
        }
    }

    pub fn with_rotation(mut self, rotation: [f32; 3]) -> Self {
        self.rotation = Some(rotation);
        self
    }

    pub fn with_scale(mut self, scale: [f32; 3]) -> Self {
        self.scale = Some(scale);
        self
    }
}

/// Motion coupling: the owning part follows `part_id` at `ratio`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkDefinition {
    pub part_id: String,
    pub ratio: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PartDefinition {
    pub id: String,
    pub shape: Shape,
    pub constraint: ConstraintDefinition,
    pub initial_transform: Option<TransformDefinition>,
    pub linked_to: Option<LinkDefinition>,
    pub color: Option<[f32; 3]>,
    pub visible: bool,
}

impl PartDefinition {
    pub fn new(id: impl Into<String>, shape: Shape, constraint: ConstraintDefinition) -> Self {
        Self {
            id: id.into(),
            shape,
            constraint,
            initial_transform: None,
            linked_to: None,
            color: None,
            visible: true,
        }
    }

    pub fn at(mut self, position: [f32; 3]) -> Self {
        let transform = self.initial_transform.unwrap_or_default();
        self.initial_transform = Some(TransformDefinition {
            position: Some(position),
            ..transform
        });
        self
    }

    pub fn with_transform(mut self, transform: TransformDefinition) -> Self {
        self.initial_transform = Some(transform);
        self
    }

    pub fn with_color(mut self, color: [f32; 3]) -> Self {
        self.color = Some(color);
        self
    }

    pub fn hidden(mut self) -> Self {
        self.visible = false;
        self
    }

    pub fn linked_to(mut self, part_id: impl Into<String>, ratio: f32) -> Self {
        self.linked_to = Some(LinkDefinition {
            part_id: part_id.into(),
            ratio,
        });
        self
    }

    pub fn map_constraint(
        mut self,
        f: impl FnOnce(ConstraintDefinition) -> ConstraintDefinition,
    ) -> Self {
        self.constraint = f(self.constraint);
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ModelMetadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ModelDefinition {
    pub parts: Vec<PartDefinition>,
    pub metadata: Option<ModelMetadata>,
}

impl ModelDefinition {
    pub fn new(parts: Vec<PartDefinition>) -> Self {
        Self {
            parts,
            metadata: None,
        }
    }

    pub fn with_metadata(mut self, metadata: ModelMetadata) -> Self {
        self.metadata = Some(metadata);
        self
    }
}
