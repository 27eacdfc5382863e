use winit::event::{ElementState, MouseButton, WindowEvent};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerKind {
    Down,
    Move,
    Up,
    Leave,
}

/// Primary-pointer event in device pixels, origin at the top-left corner.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerEvent {
    pub kind: PointerKind,
    pub x: f32,
    pub y: f32,
}

impl PointerEvent {
    pub fn new(kind: PointerKind, x: f32, y: f32) -> Self {
        Self { kind, x, y }
    }

    pub fn down(x: f32, y: f32) -> Self {
        Self::new(PointerKind::Down, x, y)
    }

    pub fn moved(x: f32, y: f32) -> Self {
        Self::new(PointerKind::Move, x, y)
    }

    pub fn up(x: f32, y: f32) -> Self {
        Self::new(PointerKind::Up, x, y)
    }

    pub fn leave(x: f32, y: f32) -> Self {
        Self::new(PointerKind::Leave, x, y)
    }
}

/// Turns winit window events into [`PointerEvent`]s.
///
/// winit reports button presses without a position, so the last cursor
/// position is tracked here.
#[derive(Debug, Default, Clone, Copy)]
pub struct PointerTracker {
    cursor: (f32, f32),
}

impl PointerTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cursor(&self) -> (f32, f32) {
        self.cursor
    }

    pub fn translate(&mut self, event: &WindowEvent) -> Option<PointerEvent> {
        match event {
            WindowEvent::CursorMoved { position, .. } => {
                self.cursor = (position.x as f32, position.y as f32);
                Some(PointerEvent::moved(self.cursor.0, self.cursor.1))
            }
            WindowEvent::MouseInput {
                state,
                button: MouseButton::Left,
                ..
            } => {
                let kind = match state {
                    ElementState::Pressed => PointerKind::Down,
                    ElementState::Released => PointerKind::Up,
                };
                Some(PointerEvent::new(kind, self.cursor.0, self.cursor.1))
            }
            WindowEvent::CursorLeft { .. } => {
                Some(PointerEvent::leave(self.cursor.0, self.cursor.1))
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use winit::dpi::PhysicalPosition;
    use winit::event::DeviceId;

    fn device() -> DeviceId {
        // SAFETY: the dummy id is only compared, never passed back to winit.
        unsafe { DeviceId::dummy() }
    }

    #[test]
    fn test_press_uses_last_cursor_position() {
        let mut tracker = PointerTracker::new();
        let moved = tracker.translate(&WindowEvent::CursorMoved {
            device_id: device(),
            position: PhysicalPosition::new(12.0, 34.0),
        });
        assert_eq!(moved, Some(PointerEvent::moved(12.0, 34.0)));

        let down = tracker.translate(&WindowEvent::MouseInput {
            device_id: device(),
            state: ElementState::Pressed,
            button: MouseButton::Left,
        });
        assert_eq!(down, Some(PointerEvent::down(12.0, 34.0)));

        let up = tracker.translate(&WindowEvent::MouseInput {
            device_id: device(),
            state: ElementState::Released,
            button: MouseButton::Left,
        });
        assert_eq!(up, Some(PointerEvent::up(12.0, 34.0)));
    }

    #[test]
    fn test_other_buttons_and_leave() {
        let mut tracker = PointerTracker::new();
        let right = tracker.translate(&WindowEvent::MouseInput {
            device_id: device(),
            state: ElementState::Pressed,
            button: MouseButton::Right,
        });
        assert!(right.is_none());

        let leave = tracker.translate(&WindowEvent::CursorLeft {
            device_id: device(),
        });
        assert_eq!(leave.map(|e| e.kind), Some(PointerKind::Leave));
    }
}
