//! Parametric model templates.
//!
//! Each preset captures its dimensions up front and returns a closure that
//! builds the model from whatever [`ShapeFactory`] the caller supplies.

use super::builder::{interactive, InteractiveModel};
use super::definition::{ModelDefinition, ModelMetadata};
use super::parts::{fixed_part, hinge_part, slider_part};
use super::shape::ShapeFactory;
use crate::error::ModelResult;
use glam::Vec3;

#[derive(Debug, Clone, Copy)]
pub struct BoxWithLidOptions {
    pub width: f32,
    pub height: f32,
    pub depth: f32,
    pub lid_thickness: f32,
    /// Fully open lid angle in degrees.
    pub max_angle: f32,
    pub spring_back: bool,
}

impl Default for BoxWithLidOptions {
    fn default() -> Self {
        Self {
            width: 2.0,
            height: 1.0,
            depth: 1.5,
            lid_thickness: 0.1,
            max_angle: 110.0,
            spring_back: false,
        }
    }
}

/// A fixed box with a lid hinged along its back top edge. Positive angles
/// swing the lid up and back.
pub fn create_box_with_lid(
    options: BoxWithLidOptions,
) -> impl Fn(&dyn ShapeFactory) -> ModelResult<InteractiveModel> {
    move |shapes| {
        let o = options;
        let base = fixed_part(
            "base",
            shapes.cuboid(Vec3::new(o.width, o.height, o.depth)),
        )
        .at([0.0, o.height / 2.0, 0.0])
        .with_color([0.55, 0.4, 0.25]);

        let mut lid = hinge_part(
            "lid",
            shapes.cuboid(Vec3::new(o.width, o.lid_thickness, o.depth)),
            [-1.0, 0.0, 0.0],
            [0.0, o.height, -o.depth / 2.0],
            Some([0.0, o.max_angle]),
        )
        .at([0.0, o.height + o.lid_thickness / 2.0, 0.0])
        .with_color([0.65, 0.5, 0.3]);
        if o.spring_back {
            lid = lid.map_constraint(|c| c.with_spring_back(0.3));
        }

        interactive(ModelDefinition::new(vec![base, lid]).with_metadata(ModelMetadata {
            name: Some("Box with lid".to_string()),
            ..Default::default()
        }))
    }
}

#[derive(Debug, Clone, Copy)]
pub struct DrawerOptions {
    pub width: f32,
    pub height: f32,
    pub depth: f32,
    /// Fraction of the drawer depth that can be pulled out.
    pub max_extension: f32,
    pub snap_closed: bool,
}

impl Default for DrawerOptions {
    fn default() -> Self {
        Self {
            width: 1.2,
            height: 0.4,
            depth: 1.0,
            max_extension: 0.8,
            snap_closed: true,
        }
    }
}

/// A fixed cabinet with a drawer sliding out along +Z.
pub fn create_drawer(
    options: DrawerOptions,
) -> impl Fn(&dyn ShapeFactory) -> ModelResult<InteractiveModel> {
    move |shapes| {
        let o = options;
        let travel = o.depth * o.max_extension;
        let cabinet = fixed_part(
            "cabinet",
            shapes.cuboid(Vec3::new(o.width * 1.1, o.height * 1.2, o.depth)),
        )
        .at([0.0, o.height * 0.6, 0.0])
        .with_color([0.45, 0.45, 0.5]);

        let mut drawer = slider_part(
            "drawer",
            shapes.cuboid(Vec3::new(o.width, o.height, o.depth * 0.95)),
            [0.0, 0.0, 1.0],
            Some([0.0, travel]),
        )
        .at([0.0, o.height * 0.6, 0.05])
        .with_color([0.7, 0.6, 0.45]);
        if o.snap_closed {
            drawer = drawer.map_constraint(|c| c.with_snap_points(vec![0.0, travel], travel * 0.05));
        }

        interactive(
            ModelDefinition::new(vec![cabinet, drawer]).with_metadata(ModelMetadata {
                name: Some("Drawer".to_string()),
                ..Default::default()
            }),
        )
    }
}
