use glam::Vec2;
use walkroom_locomotion::{Intent, MoveDirection};

/// A high-level action produced from raw window input.
///
/// The driver consumes actions, never raw key codes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Action {
    /// A movement key was pressed or released.
    Move {
        direction: MoveDirection,
        pressed: bool,
    },
    /// Cast a pick ray through the given point in normalized device coordinates.
    Pick { ndc: Vec2 },
    /// Capture the pointer, then pick through the clicked point.
    LockAndPick { ndc: Vec2 },
    /// Release the captured pointer.
    UnlockPointer,
    /// Show or hide the overlay.
    ToggleHud,
    /// Input with no binding.
    Noop,
}

impl Action {
    /// Apply a movement action to the intent. Other actions leave it alone.
    ///
    /// Returns whether the intent was affected.
    pub fn apply(&self, intent: &mut Intent) -> bool {
        match *self {
            Action::Move { direction, pressed } => {
                intent.set(direction, pressed);
                true
            }
            _ => false,
        }
    }
}
