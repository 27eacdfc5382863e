//! Declarative model building
//!
//! Part definitions, validation into an immutable [`InteractiveModel`],
//! convenience part helpers and parametric presets.

pub mod builder;
pub mod definition;
pub mod parts;
pub mod presets;
pub mod shape;

pub use builder::{interactive, InteractiveModel, InteractivePart, Link};
pub use definition::{
    ConstraintDefinition, LinkDefinition, ModelDefinition, ModelMetadata, PartDefinition,
    TransformDefinition,
};
pub use parts::{ball_joint_part, fixed_part, hinge_part, linked_part, slider_part};
pub use presets::{create_box_with_lid, create_drawer, BoxWithLidOptions, DrawerOptions};
pub use shape::{MeshData, PrimitiveShapes, Shape, ShapeFactory};
