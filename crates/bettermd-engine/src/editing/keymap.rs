use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum KeyChordError {
    #[error("Empty key chord")]
    Empty,
    #[error("Unknown modifier '{0}'")]
    UnknownModifier(String),
    #[error("Invalid key '{0}'")]
    InvalidKey(String),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Modifiers {
    pub ctrl: bool,
    pub alt: bool,
    pub shift: bool,
}

/// A key press with modifiers, e.g. `Ctrl+B`.
///
/// Letter keys are stored lowercase so `Ctrl+b` and `Ctrl+B` are the same chord.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct KeyChord {
    pub modifiers: Modifiers,
    pub key: char,
}

impl KeyChord {
    pub fn new(modifiers: Modifiers, key: char) -> Self {
        Self {
            modifiers,
            key: key.to_ascii_lowercase(),
        }
    }

    pub fn ctrl(key: char) -> Self {
        Self::new(
            Modifiers {
                ctrl: true,
                ..Modifiers::default()
            },
            key,
        )
    }
}

impl FromStr for KeyChord {
    type Err = KeyChordError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err(KeyChordError::Empty);
        }

        // `Ctrl++` binds the plus key itself.
        let (mods, key) = match s.strip_suffix("++") {
            Some(mods) => (Some(mods), "+"),
            None => match s.rsplit_once('+') {
                Some((mods, key)) => (Some(mods), key),
                None => (None, s),
            },
        };

        let mut modifiers = Modifiers::default();
        for part in mods.into_iter().flat_map(|m| m.split('+')) {
            match part.trim().to_ascii_lowercase().as_str() {
                "ctrl" | "control" => modifiers.ctrl = true,
                "alt" | "option" => modifiers.alt = true,
                "shift" => modifiers.shift = true,
                _ => return Err(KeyChordError::UnknownModifier(part.to_string())),
            }
        }

        let mut chars = key.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Ok(Self::new(modifiers, c)),
            _ => Err(KeyChordError::InvalidKey(key.to_string())),
        }
    }
}

impl fmt::Display for KeyChord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.modifiers.ctrl {
            write!(f, "Ctrl+")?;
        }
        if self.modifiers.alt {
            write!(f, "Alt+")?;
        }
        if self.modifiers.shift {
            write!(f, "Shift+")?;
        }
        write!(f, "{}", self.key.to_ascii_uppercase())
    }
}

/// Key chord to command name bindings.
#[derive(Debug, Clone)]
pub struct Keymap {
    bindings: HashMap<KeyChord, String>,
}

impl Keymap {
    /// An empty keymap.
    pub fn new() -> Self {
        Self {
            bindings: HashMap::new(),
        }
    }

    /// Bind `chord` to `command`, replacing any previous binding for the chord.
    pub fn bind(&mut self, chord: KeyChord, command: impl Into<String>) {
        self.bindings.insert(chord, command.into());
    }

    pub fn lookup(&self, chord: &KeyChord) -> Option<&str> {
        self.bindings.get(chord).map(String::as_str)
    }

    /// All bindings sorted by chord.
    pub fn bindings(&self) -> Vec<(KeyChord, &str)> {
        let mut out: Vec<_> = self
            .bindings
            .iter()
            .map(|(chord, cmd)| (*chord, cmd.as_str()))
            .collect();
        out.sort();
        out
    }
}

impl Default for Keymap {
    fn default() -> Self {
        let mut keymap = Self::new();
        keymap.bind(KeyChord::ctrl('b'), "toggle-bold");
        keymap.bind(KeyChord::ctrl('i'), "toggle-italic");
        keymap.bind(KeyChord::ctrl('`'), "toggle-code");
        keymap.bind(KeyChord::ctrl('1'), "set-heading-1");
        keymap.bind(KeyChord::ctrl('2'), "set-heading-2");
        keymap.bind(KeyChord::ctrl('3'), "set-heading-3");
        keymap
    }
}
