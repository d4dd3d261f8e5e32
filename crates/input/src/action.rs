use crate::Key;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A high-level action the camera and host react to.
///
/// Consumers poll actions, never raw keys, so rebinding never touches
/// camera or scene code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Action {
    MoveForward,
    MoveBackward,
    StrafeLeft,
    StrafeRight,
    MoveUp,
    MoveDown,
    YawLeft,
    YawRight,
    PitchUp,
    PitchDown,
    /// Put the scene's dynamic bodies back where they started.
    ResetBodies,
}

/// Action → keys mapping. An action is held when any of its keys is held.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bindings {
    map: BTreeMap<Action, Vec<Key>>,
}

impl Default for Bindings {
    fn default() -> Self {
        let mut map = BTreeMap::new();
        map.insert(Action::MoveForward, vec![Key::W]);
        map.insert(Action::MoveBackward, vec![Key::S]);
        map.insert(Action::StrafeLeft, vec![Key::A]);
        map.insert(Action::StrafeRight, vec![Key::D]);
        map.insert(Action::MoveUp, vec![Key::E, Key::Shift]);
        map.insert(Action::MoveDown, vec![Key::Q, Key::Control]);
        map.insert(Action::YawLeft, vec![Key::ArrowLeft]);
        map.insert(Action::YawRight, vec![Key::ArrowRight]);
        map.insert(Action::PitchUp, vec![Key::ArrowUp]);
        map.insert(Action::PitchDown, vec![Key::ArrowDown]);
        map.insert(Action::ResetBodies, vec![Key::R]);
        Self { map }
    }
}

impl Bindings {
    /// Bindings with no keys mapped.
    pub fn empty() -> Self {
        Self {
            map: BTreeMap::new(),
        }
    }

    /// Replace the keys bound to `action`.
    pub fn bind(&mut self, action: Action, keys: Vec<Key>) {
        tracing::debug!(?action, ?keys, "rebinding action");
        self.map.insert(action, keys);
    }

    pub fn keys(&self, action: Action) -> &[Key] {
        self.map.get(&action).map(Vec::as_slice).unwrap_or(&[])
    }
}
