use crate::action::Action;
use glam::Vec2;
use walkroom_locomotion::MoveDirection;
use winit::keyboard::KeyCode;

/// Movement binding for a physical key, if it has one.
///
/// WASD and the arrow keys both drive movement.
pub fn binding(key: KeyCode) -> Option<MoveDirection> {
    match key {
        KeyCode::KeyW | KeyCode::ArrowUp => Some(MoveDirection::Forward),
        KeyCode::KeyS | KeyCode::ArrowDown => Some(MoveDirection::Backward),
        KeyCode::KeyA | KeyCode::ArrowLeft => Some(MoveDirection::Left),
        KeyCode::KeyD | KeyCode::ArrowRight => Some(MoveDirection::Right),
        _ => None,
    }
}

/// Convert a cursor position in window pixels (origin top-left) to
/// normalized device coordinates (x right, y up, both in [-1, 1]).
pub fn cursor_to_ndc(cursor: Vec2, viewport: Vec2) -> Vec2 {
    let size = viewport.max(Vec2::ONE);
    Vec2::new(cursor.x / size.x * 2.0 - 1.0, -(cursor.y / size.y) * 2.0 + 1.0)
}

/// Stateful mapping from window events to actions.
///
/// Tracks whether the pointer is captured, since that decides where a
/// click picks: the cursor while free, the screen centre (crosshair) while
/// captured.
#[derive(Debug, Default)]
pub struct InputMapper {
    pointer_locked: bool,
}

impl InputMapper {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pointer_locked(&self) -> bool {
        self.pointer_locked
    }

    pub fn set_pointer_locked(&mut self, locked: bool) {
        if self.pointer_locked != locked {
            tracing::debug!(locked, "pointer lock changed");
        }
        self.pointer_locked = locked;
    }

    pub fn key(&self, key: KeyCode, pressed: bool) -> Action {
        if let Some(direction) = binding(key) {
            return Action::Move { direction, pressed };
        }
        if !pressed {
            return Action::Noop;
        }
        match key {
            KeyCode::Escape if self.pointer_locked => Action::UnlockPointer,
            KeyCode::F1 => Action::ToggleHud,
            _ => Action::Noop,
        }
    }

    /// Map a primary-button click. `cursor` is the last known cursor position
    /// in pixels; without one the click goes through the screen centre.
    pub fn click(&self, cursor: Option<Vec2>, viewport: Vec2) -> Action {
        if self.pointer_locked {
            return Action::Pick { ndc: Vec2::ZERO };
        }
        let ndc = cursor
            .map(|c| cursor_to_ndc(c, viewport))
            .unwrap_or(Vec2::ZERO);
        Action::LockAndPick { ndc }
    }
}
