use super::config::InteractionConfig;
use super::drag::DragSession;
use super::events::{Command, CommandQueue, InteractionEvents};
use super::state::{PartState, SerializedModelState, SerializedPart};
use crate::constraint::{Constraint, ConstraintSolver, Delta, SolveResult};
use crate::error::StateError;
use crate::math::Transform;
use crate::model::{InteractiveModel, InteractivePart, ModelMetadata};
use crate::viewport::{Camera, Highlight, MeshId, PointerEvent, PointerKind, Ray, SceneBackend};
use glam::{Vec2, Vec3};
use std::collections::{BTreeMap, BTreeSet, HashMap};

struct PartSlot {
    part: InteractivePart,
    mesh: MeshId,
    highlight: Highlight,
}

/// Owns live part state and turns pointer input into constrained motion.
///
/// Idle → Hovering → Dragging → (spring-back) → Idle. Listener callbacks run
/// synchronously; manager operations they request through
/// [`CommandQueue`] are applied before the triggering call returns.
pub struct InteractionManager<S: SceneBackend> {
    scene: S,
    camera: Camera,
    viewport: Vec2,
    config: InteractionConfig,
    events: InteractionEvents,
    commands: CommandQueue,
    parts: Vec<PartSlot>,
    states: Vec<PartState>,
    index: HashMap<String, usize>,
    mesh_lookup: HashMap<MeshId, usize>,
    metadata: Option<ModelMetadata>,
    selected: Option<usize>,
    hovered: Option<usize>,
    drag: Option<DragSession>,
    animating: BTreeSet<usize>,
    enabled: bool,
    disposed: bool,
    flushing: bool,
}

impl<S: SceneBackend> InteractionManager<S> {
    pub fn new(scene: S) -> Self {
        Self::with_config(scene, InteractionConfig::default())
    }

    pub fn with_config(scene: S, config: InteractionConfig) -> Self {
        Self {
            scene,
            camera: Camera::default(),
            viewport: Vec2::new(800.0, 600.0),
            config,
            events: InteractionEvents::default(),
            commands: CommandQueue::new(),
            parts: Vec::new(),
            states: Vec::new(),
            index: HashMap::new(),
            mesh_lookup: HashMap::new(),
            metadata: None,
            selected: None,
            hovered: None,
            drag: None,
            animating: BTreeSet::new(),
            enabled: true,
            disposed: false,
            flushing: false,
        }
    }

    pub fn set_events(&mut self, events: InteractionEvents) {
        if !self.disposed {
            self.events = events;
        }
    }

    pub fn commands(&self) -> CommandQueue {
        self.commands.clone()
    }

    pub fn config(&self) -> &InteractionConfig {
        &self.config
    }

    pub fn scene(&self) -> &S {
        &self.scene
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn camera_mut(&mut self) -> &mut Camera {
        &mut self.camera
    }

    pub fn viewport(&self) -> Vec2 {
        self.viewport
    }

    pub fn set_viewport_size(&mut self, width: f32, height: f32) {
        self.viewport = Vec2::new(width.max(1.0), height.max(1.0));
        self.camera.set_aspect(self.viewport.x / self.viewport.y);
    }

    pub fn load_model(&mut self, model: &InteractiveModel) {
        if self.disposed {
            log::warn!("load_model called on a disposed interaction manager");
            return;
        }
        self.clear();
        self.metadata = model.metadata().cloned();
        for part in model.parts() {
            self.insert_part(part.clone());
        }
        log::debug!("loaded model with {} parts", self.parts.len());
    }

    pub fn add_part(&mut self, part: InteractivePart) {
        if self.disposed {
            return;
        }
        self.insert_part(part);
    }

    /// Removes all parts and their meshes. No events fire.
    pub fn clear(&mut self) {
        for slot in self.parts.drain(..) {
            self.scene.remove_mesh(slot.mesh);
        }
        self.states.clear();
        self.index.clear();
        self.mesh_lookup.clear();
        self.animating.clear();
        self.metadata = None;
        self.selected = None;
        self.hovered = None;
        self.drag = None;
    }

    fn insert_part(&mut self, part: InteractivePart) {
        if self.index.contains_key(&part.id) {
            log::warn!("part '{}' is already loaded, ignoring duplicate", part.id);
            return;
        }

        let mesh = self.scene.add_mesh(part.shape.mesh(), part.color);
        self.scene.set_transform(mesh, &part.initial_transform);
        if !part.visible {
            self.scene.set_visible(mesh, false);
        }

        let index = self.parts.len();
        log::trace!("part '{}' ({}) -> {:?}", part.id, part.constraint.kind.name(), mesh);
        self.index.insert(part.id.clone(), index);
        self.mesh_lookup.insert(mesh, index);
        self.states
            .push(PartState::new(part.id.clone(), part.initial_transform));
        self.parts.push(PartSlot {
            part,
            mesh,
            highlight: Highlight::None,
        });
    }

    pub fn part_count(&self) -> usize {
        self.parts.len()
    }

    pub fn part(&self, part_id: &str) -> Option<&InteractivePart> {
        self.index.get(part_id).map(|&i| &self.parts[i].part)
    }

    pub fn part_state(&self, part_id: &str) -> Option<&PartState> {
        self.index.get(part_id).map(|&i| &self.states[i])
    }

    pub fn states(&self) -> &[PartState] {
        &self.states
    }

    pub fn mesh_id(&self, part_id: &str) -> Option<MeshId> {
        self.index.get(part_id).map(|&i| self.parts[i].mesh)
    }

    pub fn selected(&self) -> Option<&str> {
        self.selected.map(|i| self.parts[i].part.id.as_str())
    }

    pub fn hovered(&self) -> Option<&str> {
        self.hovered.map(|i| self.parts[i].part.id.as_str())
    }

    pub fn dragging(&self) -> Option<&str> {
        self.drag.map(|d| self.parts[d.part].part.id.as_str())
    }

    pub fn model_metadata(&self) -> Option<&ModelMetadata> {
        self.metadata.as_ref()
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled && !self.disposed
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed
    }

    pub fn has_active_animations(&self) -> bool {
        !self.animating.is_empty()
    }

    /// Unknown ids are ignored.
    pub fn apply_delta(&mut self, part_id: &str, delta: &Delta) {
        if self.disposed {
            return;
        }
        let Some(&index) = self.index.get(part_id) else {
            log::trace!("apply_delta: unknown part '{}'", part_id);
            return;
        };
        self.apply_at(index, delta, true);
        self.flush_commands();
    }

    pub fn update_linked_part(&mut self, source_id: &str, delta: &Delta) {
        if self.disposed {
            return;
        }
        let Some(&index) = self.index.get(source_id) else {
            return;
        };
        self.propagate(index, delta);
        self.flush_commands();
    }

    fn apply_at(&mut self, index: usize, delta: &Delta, propagate: bool) {
        let constraint = &self.parts[index].part.constraint;
        let state = &self.states[index];

        let solved =
            ConstraintSolver::apply_constraint(constraint, &state.transform, delta, state.value);
        if !solved.is_finite() {
            log::warn!(
                "discarding non-finite solve for part '{}' ({})",
                state.id,
                constraint.kind.name()
            );
            return;
        }

        let previous_limit = ConstraintSolver::is_at_limit(constraint, state.value);
        let limit = ConstraintSolver::is_at_limit(constraint, solved.value)
            .filter(|&l| Some(l) != previous_limit);

        let snapped = ConstraintSolver::apply_snap(constraint, solved.value);
        let (result, snap) = if snapped != solved.value {
            let result =
                ConstraintSolver::drive_to(constraint, &solved.transform, solved.value, snapped);
            (result, Some(result.value))
        } else {
            (solved, None)
        };

        self.commit(index, result);

        if let Some(limit) = limit {
            log::debug!("part '{}' reached {:?} limit", self.states[index].id, limit);
            self.events.limit_reached(&self.states[index].id, limit);
        }
        if let Some(value) = snap {
            self.events.snap(&self.states[index].id, value);
        }
        self.emit_transform(index);
        if propagate {
            self.propagate(index, delta);
        }
    }

    /// One hop only: linked parts move with propagation disabled, so a pair
    /// of parts linked to each other cannot bounce deltas back and forth.
    fn propagate(&mut self, source: usize, delta: &Delta) {
        let source_id = &self.parts[source].part.id;
        let targets: Vec<(usize, f32)> = self
            .parts
            .iter()
            .enumerate()
            .filter(|&(i, _)| i != source)
            .filter_map(|(i, slot)| {
                let link = slot.part.linked_to.as_ref()?;
                (link.part_id == *source_id).then_some((i, link.ratio))
            })
            .collect();

        for (target, ratio) in targets {
            self.apply_at(target, &delta.scaled(ratio), false);
        }
    }

    fn commit(&mut self, index: usize, result: SolveResult) {
        let state = &mut self.states[index];
        state.transform = result.transform;
        state.value = result.value;
        self.scene.set_transform(self.parts[index].mesh, &result.transform);
    }

    fn emit_transform(&mut self, index: usize) {
        let state = &self.states[index];
        self.events
            .transform_change(&state.id, &state.transform, state.value);
    }

    pub fn reset_part(&mut self, part_id: &str) {
        if self.disposed {
            return;
        }
        self.reset_part_now(part_id);
        self.flush_commands();
    }

    pub fn reset_all(&mut self) {
        if self.disposed {
            return;
        }
        self.reset_all_now();
        self.flush_commands();
    }

    fn reset_part_now(&mut self, part_id: &str) {
        let Some(&index) = self.index.get(part_id) else {
            return;
        };
        let initial = self.parts[index].part.initial_transform;
        self.restore(index, initial, 0.0);
        self.emit_transform(index);
    }

    fn reset_all_now(&mut self) {
        for index in 0..self.parts.len() {
            let initial = self.parts[index].part.initial_transform;
            self.restore(index, initial, 0.0);
        }
        self.events.state_change(&self.states);
    }

    /// Hard-sets a part, interrupting any drag or animation on it.
    fn restore(&mut self, index: usize, transform: Transform, value: f32) {
        if self.drag.is_some_and(|d| d.part == index) {
            self.end_drag(false);
        }
        self.stop_animation(index);
        self.commit(index, SolveResult { transform, value });
    }

    pub fn serialize_state(&self) -> SerializedModelState {
        let parts: BTreeMap<String, SerializedPart> = self
            .states
            .iter()
            .map(|s| {
                (
                    s.id.clone(),
                    SerializedPart {
                        value: s.value,
                        transform: s.transform,
                    },
                )
            })
            .collect();
        SerializedModelState::new(parts)
    }

    /// Restores part values and transforms from a snapshot.
    ///
    /// Ids not currently loaded are skipped. Returns how many parts were restored.
    pub fn deserialize_state(&mut self, snapshot: &SerializedModelState) -> Result<usize, StateError> {
        snapshot.check_version()?;
        if self.disposed {
            return Ok(0);
        }

        let mut restored = 0;
        for (id, saved) in &snapshot.parts {
            let Some(&index) = self.index.get(id) else {
                log::warn!("snapshot references unknown part '{}', skipping", id);
                continue;
            };
            if !saved.value.is_finite() || !saved.transform.is_finite() {
                log::warn!("snapshot for part '{}' is not finite, skipping", id);
                continue;
            }
            self.restore(index, saved.transform, saved.value);
            restored += 1;
        }

        log::debug!("restored {} of {} parts", restored, snapshot.parts.len());
        self.events.state_change(&self.states);
        self.flush_commands();
        Ok(restored)
    }

    /// Disabling ends any drag, stops animations and clears selection and hover.
    pub fn set_enabled(&mut self, enabled: bool) {
        if self.disposed {
            return;
        }
        self.set_enabled_now(enabled);
        self.flush_commands();
    }

    fn set_enabled_now(&mut self, enabled: bool) {
        if self.enabled == enabled {
            return;
        }
        self.enabled = enabled;
        if !enabled {
            self.end_drag(false);
            self.stop_all_animations();
            self.set_hovered(None);
            self.set_selected(None);
        }
        log::debug!("interaction {}", if enabled { "enabled" } else { "disabled" });
    }

    /// Detaches listeners, removes every mesh and turns later calls into no-ops.
    pub fn dispose(&mut self) {
        if self.disposed {
            return;
        }
        self.events = InteractionEvents::default();
        self.commands.clear();
        self.clear();
        self.enabled = false;
        self.disposed = true;
        log::debug!("interaction manager disposed");
    }

    pub fn handle_pointer(&mut self, event: PointerEvent) {
        if self.disposed || !self.enabled {
            return;
        }
        match event.kind {
            PointerKind::Down => self.pointer_down(event.x, event.y),
            PointerKind::Move => self.pointer_move(event.x, event.y),
            PointerKind::Up => self.end_drag(true),
            PointerKind::Leave => {
                self.end_drag(true);
                self.set_hovered(None);
            }
        }
        self.flush_commands();
    }

    fn pointer_ray(&self, x: f32, y: f32) -> Ray {
        self.camera.pixel_to_ray(x, y, self.viewport)
    }

    fn pick(&self, ray: &Ray) -> Option<(usize, Vec3)> {
        self.scene.raycast(ray).into_iter().find_map(|hit| {
            let index = *self.mesh_lookup.get(&hit.mesh)?;
            self.parts[index]
                .part
                .is_pickable()
                .then_some((index, hit.world_point))
        })
    }

    fn pointer_down(&mut self, x: f32, y: f32) {
        self.end_drag(true);

        let ray = self.pointer_ray(x, y);
        let Some((index, point)) = self.pick(&ray) else {
            self.set_selected(None);
            return;
        };

        self.stop_animation(index);
        self.set_selected(Some(index));
        self.drag = Some(DragSession::new(index, point, self.camera.forward()));
        self.states[index].is_dragging = true;
        log::debug!("drag start on '{}'", self.states[index].id);
        self.events.drag_start(&self.states[index].id);
    }

    fn pointer_move(&mut self, x: f32, y: f32) {
        let ray = self.pointer_ray(x, y);

        if let Some(drag) = self.drag.as_mut() {
            let index = drag.part;
            if let Some(offset) = drag.advance(&ray) {
                self.apply_at(index, &Delta::translation(offset), true);
            }
            return;
        }

        if self.config.hover_enabled {
            let hovered = self.pick(&ray).map(|(index, _)| index);
            self.set_hovered(hovered);
        }
    }

    /// Ends the active drag, if any. `release` starts spring-back when the
    /// part's constraint asks for it.
    fn end_drag(&mut self, release: bool) {
        let Some(drag) = self.drag.take() else {
            return;
        };
        let index = drag.part;
        self.states[index].is_dragging = false;
        log::debug!("drag end on '{}'", self.states[index].id);
        self.events.drag_end(&self.states[index].id);

        if release && self.parts[index].part.constraint.spring_back {
            self.start_animation(index);
        }
    }

    fn set_selected(&mut self, selected: Option<usize>) {
        if self.selected == selected {
            return;
        }
        let previous = std::mem::replace(&mut self.selected, selected);
        self.refresh_highlight(previous);
        self.refresh_highlight(selected);
        self.events
            .select(selected.map(|i| self.parts[i].part.id.as_str()));
    }

    fn set_hovered(&mut self, hovered: Option<usize>) {
        if self.hovered == hovered {
            return;
        }
        let previous = std::mem::replace(&mut self.hovered, hovered);
        self.refresh_highlight(previous);
        self.refresh_highlight(hovered);
    }

    fn refresh_highlight(&mut self, index: Option<usize>) {
        let Some(index) = index else {
            return;
        };
        let desired = Highlight::resolve(self.selected == Some(index), self.hovered == Some(index));
        let slot = &mut self.parts[index];
        if slot.highlight != desired {
            slot.highlight = desired;
            self.scene.set_highlight(slot.mesh, desired);
        }
    }

    /// `dt_ms` is clamped to `max_tick_ms`.
    pub fn tick(&mut self, dt_ms: f32) {
        if self.disposed || self.animating.is_empty() {
            return;
        }
        let dt = self.config.clamp_tick(dt_ms);
        let active: Vec<usize> = self.animating.iter().copied().collect();

        for index in active {
            if !self.animating.contains(&index) {
                continue;
            }
            let constraint = &self.parts[index].part.constraint;
            let state = &self.states[index];
            let rest = rest_value(constraint);

            let next = ConstraintSolver::apply_spring_back(constraint, state.value, rest, dt);
            let result = ConstraintSolver::drive_to(constraint, &state.transform, state.value, next);
            if !result.is_finite() {
                log::warn!("spring-back for part '{}' diverged, stopping", state.id);
                self.stop_animation(index);
                continue;
            }

            let moved = ConstraintSolver::value_delta(constraint, result.value - state.value);
            let settled = result.value == rest;
            self.commit(index, result);
            self.emit_transform(index);
            self.propagate(index, &moved);

            if settled {
                log::debug!("part '{}' settled at {}", self.states[index].id, rest);
                self.stop_animation(index);
            }
        }

        self.flush_commands();
    }

    fn start_animation(&mut self, index: usize) {
        let rest = rest_value(&self.parts[index].part.constraint);
        if self.states[index].value == rest {
            return;
        }
        self.animating.insert(index);
        self.states[index].is_animating = true;
        log::trace!("spring-back started for '{}'", self.states[index].id);
    }

    fn stop_animation(&mut self, index: usize) {
        if self.animating.remove(&index) {
            self.states[index].is_animating = false;
        }
    }

    fn stop_all_animations(&mut self) {
        for index in std::mem::take(&mut self.animating) {
            self.states[index].is_animating = false;
        }
    }

    fn flush_commands(&mut self) {
        if self.flushing {
            return;
        }
        self.flushing = true;

        for _ in 0..self.config.max_command_rounds {
            let pending = self.commands.drain();
            if pending.is_empty() {
                break;
            }
            for command in pending {
                if self.disposed {
                    break;
                }
                log::trace!("applying listener command {:?}", command);
                match command {
                    Command::ResetPart(id) => self.reset_part_now(&id),
                    Command::ResetAll => self.reset_all_now(),
                    Command::SetEnabled(enabled) => self.set_enabled_now(enabled),
                    Command::Deselect => self.set_selected(None),
                }
            }
        }

        if !self.commands.is_empty() {
            log::warn!(
                "dropping {} listener commands after {} rounds",
                self.commands.len(),
                self.config.max_command_rounds
            );
            self.commands.clear();
        }
        self.flushing = false;
    }
}

/// Value spring-back returns to: zero, or the nearest in-range value.
fn rest_value(constraint: &Constraint) -> f32 {
    constraint.range.map_or(0.0, |r| r.clamp(0.0))
}
