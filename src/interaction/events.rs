use super::state::PartState;
use crate::constraint::Limit;
use crate::math::Transform;
use std::cell::RefCell;
use std::collections::VecDeque;
use std::fmt;
use std::rc::Rc;

type SelectFn = Box<dyn FnMut(Option<&str>)>;
type PartFn = Box<dyn FnMut(&str)>;
type TransformFn = Box<dyn FnMut(&str, &Transform, f32)>;
type LimitFn = Box<dyn FnMut(&str, Limit)>;
type SnapFn = Box<dyn FnMut(&str, f32)>;
type StatesFn = Box<dyn FnMut(&[PartState])>;

/// Optional listeners. Each fires synchronously and is never awaited.
#[derive(Default)]
pub struct InteractionEvents {
    on_select: Option<SelectFn>,
    on_drag_start: Option<PartFn>,
    on_drag_end: Option<PartFn>,
    on_transform_change: Option<TransformFn>,
    on_limit_reached: Option<LimitFn>,
    on_snap: Option<SnapFn>,
    on_state_change: Option<StatesFn>,
}

impl InteractionEvents {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_select(mut self, f: impl FnMut(Option<&str>) + 'static) -> Self {
        self.on_select = Some(Box::new(f));
        self
    }

    pub fn on_drag_start(mut self, f: impl FnMut(&str) + 'static) -> Self {
        self.on_drag_start = Some(Box::new(f));
        self
    }

    pub fn on_drag_end(mut self, f: impl FnMut(&str) + 'static) -> Self {
        self.on_drag_end = Some(Box::new(f));
        self
    }

    pub fn on_transform_change(mut self, f: impl FnMut(&str, &Transform, f32) + 'static) -> Self {
        self.on_transform_change = Some(Box::new(f));
        self
    }

    pub fn on_limit_reached(mut self, f: impl FnMut(&str, Limit) + 'static) -> Self {
        self.on_limit_reached = Some(Box::new(f));
        self
    }

    pub fn on_snap(mut self, f: impl FnMut(&str, f32) + 'static) -> Self {
        self.on_snap = Some(Box::new(f));
        self
    }

    pub fn on_state_change(mut self, f: impl FnMut(&[PartState]) + 'static) -> Self {
        self.on_state_change = Some(Box::new(f));
        self
    }

    pub(crate) fn select(&mut self, part_id: Option<&str>) {
        if let Some(f) = self.on_select.as_mut() {
            f(part_id);
        }
    }

    pub(crate) fn drag_start(&mut self, part_id: &str) {
        if let Some(f) = self.on_drag_start.as_mut() {
            f(part_id);
        }
    }

    pub(crate) fn drag_end(&mut self, part_id: &str) {
        if let Some(f) = self.on_drag_end.as_mut() {
            f(part_id);
        }
    }

    pub(crate) fn transform_change(&mut self, part_id: &str, transform: &Transform, value: f32) {
        if let Some(f) = self.on_transform_change.as_mut() {
            f(part_id, transform, value);
        }
    }

    pub(crate) fn limit_reached(&mut self, part_id: &str, limit: Limit) {
        if let Some(f) = self.on_limit_reached.as_mut() {
            f(part_id, limit);
        }
    }

    pub(crate) fn snap(&mut self, part_id: &str, value: f32) {
        if let Some(f) = self.on_snap.as_mut() {
            f(part_id, value);
        }
    }

    pub(crate) fn state_change(&mut self, states: &[PartState]) {
        if let Some(f) = self.on_state_change.as_mut() {
            f(states);
        }
    }
}

impl fmt::Debug for InteractionEvents {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InteractionEvents")
            .field("on_select", &self.on_select.is_some())
            .field("on_drag_start", &self.on_drag_start.is_some())
            .field("on_drag_end", &self.on_drag_end.is_some())
            .field("on_transform_change", &self.on_transform_change.is_some())
            .field("on_limit_reached", &self.on_limit_reached.is_some())
            .field("on_snap", &self.on_snap.is_some())
            .field("on_state_change", &self.on_state_change.is_some())
            .finish()
    }
}

/// Manager operations a listener may request while an event is being delivered.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    ResetPart(String),
    ResetAll,
    SetEnabled(bool),
    Deselect,
}

/// Shared queue listeners push [`Command`]s into.
///
/// Listeners cannot borrow the manager while it is emitting, so they capture
/// a clone of this queue instead. The manager applies queued commands before
/// the public call that emitted the event returns.
#[derive(Debug, Clone, Default)]
pub struct CommandQueue {
    inner: Rc<RefCell<VecDeque<Command>>>,
}

impl CommandQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, command: Command) {
        self.inner.borrow_mut().push_back(command);
    }

    pub fn reset_part(&self, part_id: impl Into<String>) {
        self.push(Command::ResetPart(part_id.into()));
    }

    pub fn reset_all(&self) {
        self.push(Command::ResetAll);
    }

    pub fn set_enabled(&self, enabled: bool) {
        self.push(Command::SetEnabled(enabled));
    }

    pub fn deselect(&self) {
        self.push(Command::Deselect);
    }

    pub fn len(&self) -> usize {
        self.inner.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.borrow().is_empty()
    }

    pub(crate) fn drain(&self) -> Vec<Command> {
        self.inner.borrow_mut().drain(..).collect()
    }

    pub(crate) fn clear(&self) {
        self.inner.borrow_mut().clear();
    }
}
