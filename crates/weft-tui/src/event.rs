//! Event types for terminal input.

use std::fmt;

/// A terminal event.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Event {
    /// A key was pressed.
    Key(KeyEvent),
    /// A mouse event occurred.
    Mouse(MouseEvent),
    /// The terminal was resized to (columns, rows).
    Resize(u16, u16),
}

/// A keyboard event.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct KeyEvent {
    /// The key code.
    pub code: KeyCode,
    /// Active modifiers.
    pub modifiers: Modifiers,
}

impl KeyEvent {
    /// Create a new key event.
    pub const fn new(code: KeyCode, modifiers: Modifiers) -> Self {
        Self { code, modifiers }
    }

    /// Create a plain key event with no modifiers.
    pub const fn plain(code: KeyCode) -> Self {
        Self {
            code,
            modifiers: Modifiers::NONE,
        }
    }

    /// Check if Ctrl is held.
    pub const fn ctrl(&self) -> bool {
        self.modifiers.contains(Modifiers::CTRL)
    }

    /// Check if Alt is held.
    pub const fn alt(&self) -> bool {
        self.modifiers.contains(Modifiers::ALT)
    }

    /// Check if Shift is held.
    pub const fn shift(&self) -> bool {
        self.modifiers.contains(Modifiers::SHIFT)
    }
}

/// A key code.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum KeyCode {
    /// A character key.
    Char(char),
    /// Enter / Return.
    Enter,
    /// Tab.
    Tab,
    /// Backspace.
    Backspace,
    /// Delete.
    Delete,
    /// Escape.
    Escape,
    /// Arrow up.
    Up,
    /// Arrow down.
    Down,
    /// Arrow left.
    Left,
    /// Arrow right.
    Right,
    /// Home.
    Home,
    /// End.
    End,
    /// Page up.
    PageUp,
    /// Page down.
    PageDown,
    /// Insert.
    Insert,
    /// Function key (F1-F12).
    F(u8),
}

/// Keyboard modifier flags.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Modifiers(u8);

impl Modifiers {
    /// No modifiers.
    pub const NONE: Self = Self(0);
    /// Shift modifier.
    pub const SHIFT: Self = Self(1);
    /// Alt/Option modifier.
    pub const ALT: Self = Self(2);
    /// Ctrl modifier.
    pub const CTRL: Self = Self(4);

    /// Check if this modifier set contains the given modifier.
    pub const fn contains(self, other: Self) -> bool {
        (self.0 & other.0) == other.0 && other.0 != 0
    }

    /// Returns true if no modifiers are set.
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Decode the xterm CSI modifier parameter (`1 + shift + 2*alt + 4*ctrl`).
    pub fn from_csi_param(param: u16) -> Self {
        let bits = param.saturating_sub(1);
        let mut m = Self::NONE;
        if bits & 1 != 0 {
            m = m | Self::SHIFT;
        }
        if bits & 2 != 0 {
            m = m | Self::ALT;
        }
        if bits & 4 != 0 {
            m = m | Self::CTRL;
        }
        m
    }

    /// Encode as the xterm CSI modifier parameter.
    pub fn to_csi_param(self) -> u16 {
        let mut bits = 0u16;
        if self.contains(Self::SHIFT) {
            bits |= 1;
        }
        if self.contains(Self::ALT) {
            bits |= 2;
        }
        if self.contains(Self::CTRL) {
            bits |= 4;
        }
        1 + bits
    }
}

impl std::ops::BitOr for Modifiers {
    type Output = Self;
    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

/// The kind of mouse event.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MouseEventKind {
    /// A button was pressed.
    Press(MouseButton),
    /// A button was released.
    Release,
    /// The mouse moved while a button was held.
    Drag(MouseButton),
    /// The mouse moved with no button held.
    Move,
    /// Scroll wheel up.
    ScrollUp,
    /// Scroll wheel down.
    ScrollDown,
}

/// A mouse button.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MouseButton {
    /// Left button.
    Left,
    /// Middle button.
    Middle,
    /// Right button.
    Right,
}

/// A mouse event.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MouseEvent {
    /// The kind of mouse event.
    pub kind: MouseEventKind,
    /// Column position (0-based).
    pub x: u16,
    /// Row position (0-based).
    pub y: u16,
    /// Active modifiers.
    pub modifiers: Modifiers,
}

impl fmt::Display for KeyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KeyCode::Char(c) => write!(f, "{c}"),
            KeyCode::Enter => write!(f, "Enter"),
            KeyCode::Tab => write!(f, "Tab"),
            KeyCode::Backspace => write!(f, "Backspace"),
            KeyCode::Delete => write!(f, "Delete"),
            KeyCode::Escape => write!(f, "Escape"),
            KeyCode::Up => write!(f, "Up"),
            KeyCode::Down => write!(f, "Down"),
            KeyCode::Left => write!(f, "Left"),
            KeyCode::Right => write!(f, "Right"),
            KeyCode::Home => write!(f, "Home"),
            KeyCode::End => write!(f, "End"),
            KeyCode::PageUp => write!(f, "PageUp"),
            KeyCode::PageDown => write!(f, "PageDown"),
            KeyCode::Insert => write!(f, "Insert"),
            KeyCode::F(n) => write!(f, "F{n}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_event_plain() {
        let k = KeyEvent::plain(KeyCode::Char('a'));
        assert!(!k.ctrl());
        assert!(!k.alt());
        assert!(!k.shift());
    }

    #[test]
    fn key_event_with_modifiers() {
        let k = KeyEvent::new(KeyCode::Char('c'), Modifiers::CTRL);
        assert!(k.ctrl());
        assert!(!k.alt());
    }

    #[test]
    fn modifier_union() {
        let m = Modifiers::CTRL | Modifiers::SHIFT;
        assert!(m.contains(Modifiers::CTRL));
        assert!(m.contains(Modifiers::SHIFT));
        assert!(!m.contains(Modifiers::ALT));
    }

    #[test]
    fn csi_param_roundtrip() {
        for shift in [false, true] {
            for alt in [false, true] {
                for ctrl in [false, true] {
                    let mut m = Modifiers::NONE;
                    if shift {
                        m = m | Modifiers::SHIFT;
                    }
                    if alt {
                        m = m | Modifiers::ALT;
                    }
                    if ctrl {
                        m = m | Modifiers::CTRL;
                    }
                    assert_eq!(Modifiers::from_csi_param(m.to_csi_param()), m);
                }
            }
        }
    }

    #[test]
    fn csi_param_ctrl_is_five() {
        assert_eq!(Modifiers::CTRL.to_csi_param(), 5);
        assert_eq!(Modifiers::from_csi_param(5), Modifiers::CTRL);
    }

    #[test]
    fn keycode_display() {
        assert_eq!(format!("{}", KeyCode::Char('a')), "a");
        assert_eq!(format!("{}", KeyCode::Enter), "Enter");
        assert_eq!(format!("{}", KeyCode::F(1)), "F1");
    }

    #[test]
    fn resize_event_matches() {
        let e = Event::Resize(80, 24);
        assert!(matches!(e, Event::Resize(80, 24)));
    }
}
