use crate::{Action, Bindings, Key};
use std::collections::HashSet;

/// Which keys are currently held, plus the bindings used to read actions.
///
/// The host feeds key transitions in with [`press`](Self::press) and
/// [`release`](Self::release); everything else only reads.
#[derive(Debug, Clone, Default)]
pub struct InputState {
    held: HashSet<Key>,
    bindings: Bindings,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_bindings(bindings: Bindings) -> Self {
        Self {
            held: HashSet::new(),
            bindings,
        }
    }

    pub fn press(&mut self, key: Key) {
        self.held.insert(key);
    }

    pub fn release(&mut self, key: Key) {
        self.held.remove(&key);
    }

    /// Record a key transition.
    pub fn set(&mut self, key: Key, pressed: bool) {
        if pressed {
            self.press(key);
        } else {
            self.release(key);
        }
    }

    /// Release everything, e.g. when the window loses focus.
    pub fn clear(&mut self) {
        self.held.clear();
    }

    pub fn is_key_held(&self, key: Key) -> bool {
        self.held.contains(&key)
    }

    pub fn is_action_held(&self, action: Action) -> bool {
        self.bindings
            .keys(action)
            .iter()
            .any(|k| self.held.contains(k))
    }

    pub fn bindings(&self) -> &Bindings {
        &self.bindings
    }

    pub fn bindings_mut(&mut self) -> &mut Bindings {
        &mut self.bindings
    }
}
