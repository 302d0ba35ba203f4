//! Visual style: colors and text attributes for a terminal cell.

use crate::color::Color;

/// Visual style attributes applied to rendered cells.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Style {
    /// Foreground color. `None` leaves the terminal default.
    pub fg: Option<Color>,
    /// Background color. `None` leaves the terminal default.
    pub bg: Option<Color>,
    /// Bold text (SGR 1).
    pub bold: bool,
    /// Dim/faint text (SGR 2).
    pub dim: bool,
    /// Italic text (SGR 3).
    pub italic: bool,
    /// Underlined text (SGR 4).
    pub underline: bool,
    /// Blinking text (SGR 5).
    pub blink: bool,
    /// Reverse video (SGR 7).
    pub reverse: bool,
    /// Strikethrough text (SGR 9).
    pub strikethrough: bool,
}

impl Style {
    /// Create an empty style with no attributes.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the foreground color.
    #[must_use]
    pub fn fg(mut self, color: Color) -> Self {
        self.fg = Some(color);
        self
    }

    /// Set the background color.
    #[must_use]
    pub fn bg(mut self, color: Color) -> Self {
        self.bg = Some(color);
        self
    }

    /// Set bold.
    #[must_use]
    pub fn bold(mut self, val: bool) -> Self {
        self.bold = val;
        self
    }

    /// Set dim.
    #[must_use]
    pub fn dim(mut self, val: bool) -> Self {
        self.dim = val;
        self
    }

    /// Set italic.
    #[must_use]
    pub fn italic(mut self, val: bool) -> Self {
        self.italic = val;
        self
    }

    /// Set underline.
    #[must_use]
    pub fn underline(mut self, val: bool) -> Self {
        self.underline = val;
        self
    }

    /// Set blink.
    #[must_use]
    pub fn blink(mut self, val: bool) -> Self {
        self.blink = val;
        self
    }

    /// Set reverse video.
    #[must_use]
    pub fn reverse(mut self, val: bool) -> Self {
        self.reverse = val;
        self
    }

    /// Set strikethrough.
    #[must_use]
    pub fn strikethrough(mut self, val: bool) -> Self {
        self.strikethrough = val;
        self
    }

    /// Merge another style on top of this one. The `other` style's set
    /// values take priority; unset colors fall through to this style.
    #[must_use]
    pub fn merge(&self, other: &Style) -> Style {
        Style {
            fg: other.fg.or(self.fg),
            bg: other.bg.or(self.bg),
            bold: other.bold || self.bold,
            dim: other.dim || self.dim,
            italic: other.italic || self.italic,
            underline: other.underline || self.underline,
            blink: other.blink || self.blink,
            reverse: other.reverse || self.reverse,
            strikethrough: other.strikethrough || self.strikethrough,
        }
    }

    /// Returns true if no attributes are set.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Returns true if any boolean attribute set in `self` is cleared
    /// in `next`. Turning an attribute off requires a full SGR reset.
    pub fn loses_attribute(&self, next: &Style) -> bool {
        (self.bold && !next.bold)
            || (self.dim && !next.dim)
            || (self.italic && !next.italic)
            || (self.underline && !next.underline)
            || (self.blink && !next.blink)
            || (self.reverse && !next.reverse)
            || (self.strikethrough && !next.strikethrough)
    }
}
