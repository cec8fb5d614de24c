use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InputKind {
    GoLeft,
    GoRight,
    Jump,
    QuitGame,
}

/// A semantic press or release edge aimed at one actor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct InputEvent {
    pub kind: InputKind,
    pub pressed: bool,
    pub actor_index: usize,
}

impl InputEvent {
    pub const fn new(kind: InputKind, pressed: bool, actor_index: usize) -> Self {
        Self {
            kind,
            pressed,
            actor_index,
        }
    }

    pub const fn press(kind: InputKind, actor_index: usize) -> Self {
        Self::new(kind, true, actor_index)
    }

    pub const fn release(kind: InputKind, actor_index: usize) -> Self {
        Self::new(kind, false, actor_index)
    }
}

/// Platform keys the translator cares about. Everything else is `Other`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RawKey {
    Left,
    Right,
    Up,
    Space,
    LeftCtrl,
    Escape,
    F11,
    Other,
}

/// Stateless key-to-intent mapping. Up, Space and LeftCtrl all alias `Jump`
/// with no per-key bookkeeping, so releasing any of them releases `Jump`.
#[derive(Debug, Clone, Copy)]
pub struct KeyTranslator {
    actor_index: usize,
}

impl KeyTranslator {
    pub fn new(actor_index: usize) -> Self {
        Self { actor_index }
    }

    pub fn actor_index(&self) -> usize {
        self.actor_index
    }

    pub fn translate(&self, key: RawKey, pressed: bool, repeat: bool) -> Option<InputEvent> {
        if pressed && repeat {
            return None;
        }
        let kind = match key {
            RawKey::Left => InputKind::GoLeft,
            RawKey::Right => InputKind::GoRight,
            RawKey::Up | RawKey::Space | RawKey::LeftCtrl => InputKind::Jump,
            RawKey::Escape => InputKind::QuitGame,
            RawKey::F11 | RawKey::Other => return None,
        };
        Some(InputEvent::new(kind, pressed, self.actor_index))
    }

    pub fn quit_request(&self) -> InputEvent {
        InputEvent::press(InputKind::QuitGame, self.actor_index)
    }
}
