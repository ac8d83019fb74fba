//! Input events delivered by the host engine.
//!
//! The toolkit never polls devices. The host translates its own pointer and
//! keyboard callbacks into these types and hands them to widgets.

#![allow(missing_docs)]

use crate::geometry::Vec2;

/// Mouse button.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum MouseButton {
    /// Left mouse button (primary pointer).
    #[default]
    Left,
    /// Right mouse button.
    Right,
    /// Middle mouse button (scroll wheel click).
    Middle,
}

/// Keyboard key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    /// Escape key.
    Escape,
    /// Enter/Return key.
    Enter,
    /// Tab key.
    Tab,
    /// Backspace key.
    Backspace,
    /// Delete key.
    Delete,
    /// Arrow up.
    Up,
    /// Arrow down.
    Down,
    /// Arrow left.
    Left,
    /// Arrow right.
    Right,
    /// Home key.
    Home,
    /// End key.
    End,
    /// Page up.
    PageUp,
    /// Page down.
    PageDown,
    /// Space bar.
    Space,
    /// Minus / hyphen.
    Minus,
    /// Period / decimal point.
    Period,
    /// Alphabetic keys.
    A, B, C, D, E, F, G, H, I, J, K, L, M,
    /// More alphabetic keys.
    N, O, P, Q, R, S, T, U, V, W, X, Y, Z,
    /// Number keys.
    Num0, Num1, Num2, Num3, Num4, Num5, Num6, Num7, Num8, Num9,
    /// Any other key producing a character.
    Other,
}

impl Key {
    /// Returns true for the keys that activate a focused button (Space, Enter).
    #[must_use]
    pub const fn is_activation(self) -> bool {
        matches!(self, Self::Space | Self::Enter)
    }

    /// Maps a typed character to the key that usually produces it.
    #[must_use]
    pub fn from_char(c: char) -> Self {
        const LETTERS: [Key; 26] = [
            Key::A, Key::B, Key::C, Key::D, Key::E, Key::F, Key::G, Key::H, Key::I,
            Key::J, Key::K, Key::L, Key::M, Key::N, Key::O, Key::P, Key::Q, Key::R,
            Key::S, Key::T, Key::U, Key::V, Key::W, Key::X, Key::Y, Key::Z,
        ];
        const DIGITS: [Key; 10] = [
            Key::Num0, Key::Num1, Key::Num2, Key::Num3, Key::Num4,
            Key::Num5, Key::Num6, Key::Num7, Key::Num8, Key::Num9,
        ];

        match c {
            ' ' => Self::Space,
            '-' => Self::Minus,
            '.' => Self::Period,
            'a'..='z' => LETTERS[(c as u8 - b'a') as usize],
            'A'..='Z' => LETTERS[(c as u8 - b'A') as usize],
            '0'..='9' => DIGITS[(c as u8 - b'0') as usize],
            _ => Self::Other,
        }
    }
}

/// Modifier keys state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Modifiers {
    /// Shift key is held.
    pub shift: bool,
    /// Control key is held.
    pub ctrl: bool,
    /// Alt key is held.
    pub alt: bool,
    /// Super/Command key is held.
    pub super_key: bool,
}

impl Modifiers {
    /// Only shift held.
    pub const SHIFT: Self = Self {
        shift: true,
        ctrl: false,
        alt: false,
        super_key: false,
    };
}

/// Kind of pointer event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PointerEventKind {
    /// Pointer entered the widget's bounds.
    Enter,
    /// Pointer left the widget's bounds.
    Leave,
    /// Button pressed over the widget.
    Down,
    /// Button released.
    Up,
    /// Pointer moved while over (or while pressing) the widget.
    Move,
}

/// A pointer event in world-space coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerEvent {
    /// Event type.
    pub kind: PointerEventKind,
    /// World-space position of the pointer.
    pub position: Vec2,
    /// Button involved (meaningful for Down/Up).
    pub button: MouseButton,
}

impl PointerEvent {
    /// Creates a pointer event for the primary button.
    #[must_use]
    pub fn new(kind: PointerEventKind, position: impl Into<Vec2>) -> Self {
        Self {
            kind,
            position: position.into(),
            button: MouseButton::Left,
        }
    }

    /// Sets the button.
    #[must_use]
    pub const fn with_button(mut self, button: MouseButton) -> Self {
        self.button = button;
        self
    }
}

/// A keyboard event.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KeyEvent {
    /// Key identifier.
    pub key: Key,
    /// Literal character for character-producing keys.
    pub character: Option<char>,
    /// Modifier state at the time of the event.
    pub modifiers: Modifiers,
}

impl KeyEvent {
    /// Creates an event for a non-character key.
    #[must_use]
    pub const fn new(key: Key) -> Self {
        Self {
            key,
            character: None,
            modifiers: Modifiers {
                shift: false,
                ctrl: false,
                alt: false,
                super_key: false,
            },
        }
    }

    /// Creates an event for a typed character.
    #[must_use]
    pub fn character(c: char) -> Self {
        Self {
            key: Key::from_char(c),
            character: Some(c),
            modifiers: Modifiers::default(),
        }
    }

    /// Sets the modifier state.
    #[must_use]
    pub const fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_from_char() {
        assert_eq!(Key::from_char('a'), Key::A);
        assert_eq!(Key::from_char('Z'), Key::Z);
        assert_eq!(Key::from_char('7'), Key::Num7);
        assert_eq!(Key::from_char('-'), Key::Minus);
        assert_eq!(Key::from_char('é'), Key::Other);
    }

    #[test]
    fn test_character_event_keeps_literal() {
        let event = KeyEvent::character(' ');
        assert_eq!(event.key, Key::Space);
        assert_eq!(event.character, Some(' '));
        assert!(event.key.is_activation());
    }
}
