//! Cell type — a single terminal cell.

use unicode_width::UnicodeWidthStr;

use crate::style::Style;

/// A single cell in the screen buffer.
///
/// A double-width glyph occupies two cells: the primary cell holds the
/// glyph with `width == 2`, the cell to its right is a *continuation*
/// (empty glyph, `width == 0`) carrying the same style.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Cell {
    /// The glyph (grapheme cluster) displayed in this cell. Empty for
    /// continuation cells.
    pub glyph: String,
    /// The style of this cell.
    pub style: Style,
    /// Display width: 1 for most glyphs, 2 for CJK/emoji, 0 for continuations.
    pub width: u8,
}

impl Cell {
    /// Create a new cell, measuring the glyph's display width.
    ///
    /// Zero-width input (combining marks, ZWJ fragments) yields a
    /// zero-width cell, which callers should treat as unplaceable.
    pub fn new(glyph: impl Into<String>, style: Style) -> Self {
        let glyph = glyph.into();
        let width = UnicodeWidthStr::width(glyph.as_str()).min(2) as u8;
        Self {
            glyph,
            style,
            width,
        }
    }

    /// A blank cell: space, default style, width 1.
    pub fn blank() -> Self {
        Self::space(Style::default())
    }

    /// A space cell carrying the given style (used for background fills
    /// and for the orphaned half of an overwritten wide glyph).
    pub fn space(style: Style) -> Self {
        Self {
            glyph: " ".into(),
            style,
            width: 1,
        }
    }

    /// The continuation half of a wide glyph, sharing its style.
    pub fn continuation(style: Style) -> Self {
        Self {
            glyph: String::new(),
            style,
            width: 0,
        }
    }

    /// Returns true if this cell is empty: a space with default style,
    /// or a bare continuation placeholder.
    pub fn is_blank(&self) -> bool {
        (self.glyph == " " || self.glyph.is_empty()) && self.style.is_empty()
    }

    /// Returns true if this is the primary cell of a wide glyph.
    pub fn is_wide(&self) -> bool {
        self.width > 1
    }

    /// Returns true if this is a continuation cell.
    pub fn is_continuation(&self) -> bool {
        self.width == 0
    }
}

impl Default for Cell {
    fn default() -> Self {
        Self::blank()
    }
}
