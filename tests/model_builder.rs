use glam::{Quat, Vec3};
use interactive_parts::constraint::{ConstraintKind, ValueRange};
use interactive_parts::error::ModelError;
use interactive_parts::interaction::InteractionManager;
use interactive_parts::model::{
    create_drawer, fixed_part, interactive, linked_part, slider_part, ConstraintDefinition,
    DrawerOptions, ModelDefinition, PartDefinition, PrimitiveShapes, Shape, ShapeFactory,
    TransformDefinition,
};
use interactive_parts::viewport::HeadlessScene;
use interactive_parts::Delta;

fn cube() -> Shape {
    PrimitiveShapes::default().cuboid(Vec3::ONE)
}

#[test]
fn test_duplicate_id_is_rejected() {
    let result = interactive(ModelDefinition::new(vec![
        fixed_part("a", cube()),
        fixed_part("a", cube()),
    ]));
    assert_eq!(result.unwrap_err(), ModelError::DuplicateId("a".to_string()));
}

#[test]
fn test_dangling_link_is_rejected() {
    let result = interactive(ModelDefinition::new(vec![linked_part(
        "gear",
        cube(),
        "motor",
        2.0,
        ConstraintDefinition::hinge([0.0, 0.0, 1.0], [0.0; 3]),
    )]));
    assert_eq!(
        result.unwrap_err(),
        ModelError::DanglingLink {
            part: "gear".to_string(),
            target: "motor".to_string(),
        }
    );
}

#[test]
fn test_first_error_aborts_whole_model() {
    let result = interactive(ModelDefinition::new(vec![
        fixed_part("base", cube()),
        slider_part("drawer", cube(), [0.0, 0.0, 1.0], Some([1.0, 0.0])),
        PartDefinition::new("spinner", cube(), ConstraintDefinition::of_kind("spin")),
    ]));
    assert!(matches!(result, Err(ModelError::Range { ref part, .. }) if part == "drawer"));
}

#[test]
fn test_constraints_load_from_json() {
    let json = r#"[
        {"type": "hinge", "axis": [0, 0, 2], "range": [0, 120], "springBack": true, "springStrength": 1.5},
        {"type": "slider", "axis": [0, 0, 0], "snapPoints": [0, 0.5], "snapThreshold": 0.05},
        {"type": "ball", "pivot": [0, 1, 0], "damping": 0.25}
    ]"#;
    let definitions: Vec<ConstraintDefinition> = serde_json::from_str(json).unwrap();

    let model = interactive(ModelDefinition::new(vec![
        PartDefinition::new("door", cube(), definitions[0].clone()),
        PartDefinition::new("tray", cube(), definitions[1].clone())
            .with_transform(TransformDefinition::at([0.0, 1.0, 0.0]).with_scale([2.0, 1.0, 1.0])),
        PartDefinition::new("joystick", cube(), definitions[2].clone()),
    ]))
    .unwrap();

    let door = &model.part("door").unwrap().constraint;
    assert_eq!(
        door.kind,
        ConstraintKind::Hinge {
            axis: Vec3::Z,
            pivot: Vec3::ZERO
        }
    );
    assert_eq!(door.range, Some(ValueRange::new(0.0, 120.0)));
    assert!(door.spring_back);
    assert_eq!(door.spring_strength, 1.0);

    let tray = model.part("tray").unwrap();
    assert_eq!(tray.constraint.kind, ConstraintKind::Slider { axis: Vec3::Y });
    assert_eq!(tray.constraint.snap_points, vec![0.0, 0.5]);
    assert_eq!(tray.constraint.snap_threshold, 0.05);
    assert_eq!(tray.initial_transform.position, Vec3::Y);
    assert_eq!(tray.initial_transform.scale, Vec3::new(2.0, 1.0, 1.0));

    let joystick = &model.part("joystick").unwrap().constraint;
    assert_eq!(
        joystick.kind,
        ConstraintKind::Ball {
            pivot: Vec3::Y,
            rest: Quat::IDENTITY
        }
    );
    assert_eq!(joystick.damping, 0.25);
    assert_eq!(joystick.snap_threshold, 5.0);
}

#[test]
fn test_missing_type_is_rejected_by_serde() {
    let parsed: Result<ConstraintDefinition, _> = serde_json::from_str(r#"{"axis": [1, 0, 0]}"#);
    assert!(parsed.is_err());
}

#[test]
fn test_drawer_preset_snaps_closed() {
    let model = create_drawer(DrawerOptions::default())(&PrimitiveShapes::default()).unwrap();
    let mut manager = InteractionManager::new(HeadlessScene::new());
    manager.load_model(&model);
    assert_eq!(manager.part_count(), 2);

    manager.apply_delta("drawer", &Delta::translation(Vec3::new(0.0, 0.0, 0.5)));
    assert!((manager.part_state("drawer").unwrap().value - 0.5).abs() < 1e-5);

    manager.apply_delta("drawer", &Delta::translation(Vec3::new(0.0, 0.0, -0.48)));
    assert_eq!(manager.part_state("drawer").unwrap().value, 0.0);

    manager.apply_delta("cabinet", &Delta::translation(Vec3::X));
    let cabinet = manager.part_state("cabinet").unwrap();
    assert_eq!(cabinet.transform, model.part("cabinet").unwrap().initial_transform);
}
