use serde::{Deserialize, Serialize};

/// One of the four movement intents a key can drive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MoveDirection {
    Forward,
    Backward,
    Left,
    Right,
}

impl MoveDirection {
    pub const ALL: [MoveDirection; 4] = [
        MoveDirection::Forward,
        MoveDirection::Backward,
        MoveDirection::Left,
        MoveDirection::Right,
    ];
}

/// The four movement flags derived from currently held keys.
///
/// Flags are independent: forward and backward may both be set, in which
/// case they cancel out.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Intent {
    pub forward: bool,
    pub backward: bool,
    pub left: bool,
    pub right: bool,
}

impl Intent {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set or clear a single flag.
    pub fn set(&mut self, direction: MoveDirection, held: bool) {
        match direction {
            MoveDirection::Forward => self.forward = held,
            MoveDirection::Backward => self.backward = held,
            MoveDirection::Left => self.left = held,
            MoveDirection::Right => self.right = held,
        }
    }

    pub fn get(&self, direction: MoveDirection) -> bool {
        match direction {
            MoveDirection::Forward => self.forward,
            MoveDirection::Backward => self.backward,
            MoveDirection::Left => self.left,
            MoveDirection::Right => self.right,
        }
    }

    /// Whether any movement key is held.
    pub fn any(&self) -> bool {
        self.forward || self.backward || self.left || self.right
    }

    /// Release every key, e.g. when the window loses focus.
    pub fn clear(&mut self) {
        *self = Self::default();
    }
}
