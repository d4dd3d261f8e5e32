use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Keys the engine knows how to poll.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Key {
    W,
    A,
    S,
    D,
    Q,
    E,
    R,
    Shift,
    Control,
    Space,
    Escape,
    ArrowUp,
    ArrowDown,
    ArrowLeft,
    ArrowRight,
}

impl Key {
    pub const ALL: [Key; 15] = [
        Key::W,
        Key::A,
        Key::S,
        Key::D,
        Key::Q,
        Key::E,
        Key::R,
        Key::Shift,
        Key::Control,
        Key::Space,
        Key::Escape,
        Key::ArrowUp,
        Key::ArrowDown,
        Key::ArrowLeft,
        Key::ArrowRight,
    ];

    /// Lower-case name, as accepted by [`Key::from_str`].
    pub fn name(self) -> &'static str {
        match self {
            Key::W => "w",
            Key::A => "a",
            Key::S => "s",
            Key::D => "d",
            Key::Q => "q",
            Key::E => "e",
            Key::R => "r",
            Key::Shift => "shift",
            Key::Control => "control",
            Key::Space => "space",
            Key::Escape => "escape",
            Key::ArrowUp => "arrowup",
            Key::ArrowDown => "arrowdown",
            Key::ArrowLeft => "arrowleft",
            Key::ArrowRight => "arrowright",
        }
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown key name `{0}`")]
pub struct UnknownKey(pub String);

impl FromStr for Key {
    type Err = UnknownKey;

    /// Case-insensitive; `ctrl` and `esc` are accepted as aliases.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_ascii_lowercase();
        let alias = match lower.as_str() {
            "ctrl" => "control",
            "esc" => "escape",
            other => other,
        };
        Key::ALL
            .into_iter()
            .find(|k| k.name() == alias)
            .ok_or_else(|| UnknownKey(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_round_trip_case_insensitively() {
        for key in Key::ALL {
            assert_eq!(key.name().to_uppercase().parse::<Key>(), Ok(key));
        }
    }

    #[test]
    fn aliases() {
        assert_eq!("Ctrl".parse::<Key>(), Ok(Key::Control));
        assert_eq!("ESC".parse::<Key>(), Ok(Key::Escape));
    }

    #[test]
    fn unknown_name_is_an_error() {
        assert_eq!("f13".parse::<Key>(), Err(UnknownKey("f13".into())));
    }
}
