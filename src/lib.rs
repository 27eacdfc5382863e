//! # interactive-parts
//!
//! Click-and-drag manipulation of mechanical parts (hinges, sliders, ball
//! joints, linked parts) under kinematic constraints.
//!
//! ## Features
//! - Pure constraint solver: clamping, damping, snapping, spring-back
//! - Declarative model definitions validated into an immutable model
//! - Interaction manager: hit-testing, drag sessions, highlight, events
//! - Versioned JSON snapshots of interaction state
//! - Renderer-agnostic scene capability with a CPU implementation
//!
//! ## Example
//! ```rust,ignore
//! use interactive_parts::interaction::InteractionManager;
//! use interactive_parts::model::{create_box_with_lid, BoxWithLidOptions, PrimitiveShapes};
//! use interactive_parts::viewport::HeadlessScene;
//! use interactive_parts::constraint::Delta;
//! use glam::Vec3;
//!
//! let model = create_box_with_lid(BoxWithLidOptions::default())(&PrimitiveShapes::default())?;
//! let mut manager = InteractionManager::new(HeadlessScene::new());
//! manager.load_model(&model);
//!
//! manager.apply_delta("lid", &Delta::rotation(Vec3::new(-45.0, 0.0, 0.0)));
//! println!("lid at {}°", manager.part_state("lid").unwrap().value);
//! ```

pub mod constraint;
pub mod error;
pub mod interaction;
pub mod math;
pub mod model;
pub mod viewport;

pub use constraint::{Constraint, ConstraintKind, ConstraintSolver, Delta, Limit, SolveResult};
pub use error::{ModelError, ModelResult, StateError};
pub use interaction::{
    CommandQueue, InteractionConfig, InteractionEvents, InteractionManager, PartState,
    SerializedModelState,
};
pub use math::Transform;
pub use model::{interactive, InteractiveModel, InteractivePart, ModelDefinition, PartDefinition};
pub use viewport::{Camera, HeadlessScene, PointerEvent, SceneBackend};
