//! ANSI renderer — turns cell changes into minimal escape sequences.
//!
//! Tracks the cursor position and the active SGR state across a change
//! list so adjacent cells need no cursor move and same-styled cells no
//! style change. Sequences are byte-exact: cursor moves are
//! `ESC[row;colH` (1-indexed), colors use `38;5;n` / `38;2;r;g;b`, and
//! a flush that set any attribute ends with `ESC[0m`.

use std::fmt::Write;

use crate::buffer::CellChange;
use crate::color::{Color, ColorSupport};
use crate::style::Style;

/// Renders cell changes into ANSI escape sequences.
pub struct Renderer {
    color_support: ColorSupport,
    synchronized: bool,
}

impl Renderer {
    /// Create a renderer for the given color support level. When
    /// `synchronized` is set, output is wrapped in `ESC[?2026h/l`.
    pub fn new(color_support: ColorSupport, synchronized: bool) -> Self {
        Self {
            color_support,
            synchronized,
        }
    }

    /// Render a change list into one output string.
    ///
    /// `row_offset` shifts every row; inline mode uses it to target the
    /// reserved strip at the bottom of the terminal.
    pub fn render(&self, changes: &[CellChange], row_offset: u16) -> String {
        if changes.is_empty() {
            return String::new();
        }

        let mut out = String::with_capacity(changes.len() * 12);
        if self.synchronized {
            out.push_str("\x1b[?2026h");
        }

        // Position the cursor sits at after the previous write.
        let mut cursor: Option<(u16, u16)> = None;
        let mut current = Style::default();
        let mut styled = false;

        for change in changes {
            // Continuation cells are emitted implicitly by their primary.
            if change.cell.is_continuation() {
                continue;
            }

            if cursor != Some((change.x, change.y)) {
                let row = u32::from(change.y) + u32::from(row_offset) + 1;
                let _ = write!(out, "\x1b[{};{}H", row, change.x + 1);
            }

            if change.cell.style != current {
                self.write_transition(&mut out, &current, &change.cell.style);
                current = change.cell.style;
                styled = styled || !current.is_empty();
            }

            out.push_str(&change.cell.glyph);
            cursor = Some((change.x + u16::from(change.cell.width), change.y));
        }

        if styled && !current.is_empty() {
            out.push_str("\x1b[0m");
        }
        if self.synchronized {
            out.push_str("\x1b[?2026l");
        }

        tracing::trace!(changes = changes.len(), bytes = out.len(), "rendered frame delta");
        out
    }

    /// Emit the minimal SGR transition from `prev` to `next`.
    ///
    /// Clearing an attribute has no individual off-code in the
    /// vocabulary used here, so losing one forces a reset followed by a
    /// full re-apply.
    fn write_transition(&self, out: &mut String, prev: &Style, next: &Style) {
        if prev.loses_attribute(next) {
            out.push_str("\x1b[0m");
            self.write_full(out, next);
            return;
        }

        if prev.fg != next.fg {
            match next.fg {
                Some(color) => self.write_fg(out, color),
                None => out.push_str("\x1b[39m"),
            }
        }
        if prev.bg != next.bg {
            match next.bg {
                Some(color) => self.write_bg(out, color),
                None => out.push_str("\x1b[49m"),
            }
        }
        if !prev.bold && next.bold {
            out.push_str("\x1b[1m");
        }
        if !prev.dim && next.dim {
            out.push_str("\x1b[2m");
        }
        if !prev.italic && next.italic {
            out.push_str("\x1b[3m");
        }
        if !prev.underline && next.underline {
            out.push_str("\x1b[4m");
        }
        if !prev.blink && next.blink {
            out.push_str("\x1b[5m");
        }
        if !prev.reverse && next.reverse {
            out.push_str("\x1b[7m");
        }
        if !prev.strikethrough && next.strikethrough {
            out.push_str("\x1b[9m");
        }
    }

    fn write_full(&self, out: &mut String, style: &Style) {
        if let Some(color) = style.fg {
            self.write_fg(out, color);
        }
        if let Some(color) = style.bg {
            self.write_bg(out, color);
        }
        if style.bold {
            out.push_str("\x1b[1m");
        }
        if style.dim {
            out.push_str("\x1b[2m");
        }
        if style.italic {
            out.push_str("\x1b[3m");
        }
        if style.underline {
            out.push_str("\x1b[4m");
        }
        if style.blink {
            out.push_str("\x1b[5m");
        }
        if style.reverse {
            out.push_str("\x1b[7m");
        }
        if style.strikethrough {
            out.push_str("\x1b[9m");
        }
    }

    fn write_fg(&self, out: &mut String, color: Color) {
        match color.downgrade(self.color_support) {
            Color::Rgb(r, g, b) => {
                let _ = write!(out, "\x1b[38;2;{r};{g};{b}m");
            }
            Color::Indexed(i) => {
                let _ = write!(out, "\x1b[38;5;{i}m");
            }
            Color::Reset => out.push_str("\x1b[39m"),
        }
    }

    fn write_bg(&self, out: &mut String, color: Color) {
        match color.downgrade(self.color_support) {
            Color::Rgb(r, g, b) => {
                let _ = write!(out, "\x1b[48;2;{r};{g};{b}m");
            }
            Color::Indexed(i) => {
                let _ = write!(out, "\x1b[48;5;{i}m");
            }
            Color::Reset => out.push_str("\x1b[49m"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cell::Cell;

    fn change(x: u16, y: u16, cell: Cell) -> CellChange {
        CellChange { x, y, cell }
    }

    fn plain(x: u16, y: u16, glyph: &str) -> CellChange {
        change(x, y, Cell::new(glyph, Style::default()))
    }

    fn renderer() -> Renderer {
        Renderer::new(ColorSupport::TrueColor, false)
    }

    #[test]
    fn empty_changes_render_nothing() {
        assert!(renderer().render(&[], 0).is_empty());
    }

    #[test]
    fn cursor_position_is_one_indexed() {
        let out = renderer().render(&[plain(5, 3, "A")], 0);
        assert!(out.contains("\x1b[4;6H"));
        assert!(out.contains('A'));
    }

    #[test]
    fn adjacent_cells_move_once() {
        let out = renderer().render(&[plain(0, 0, "A"), plain(1, 0, "B")], 0);
        assert_eq!(out.matches("\x1b[").count(), 1);
        assert!(out.contains("AB"));
    }

    #[test]
    fn gap_forces_second_move() {
        let out = renderer().render(&[plain(0, 0, "A"), plain(5, 0, "B")], 0);
        assert!(out.contains("\x1b[1;1H"));
        assert!(out.contains("\x1b[1;6H"));
    }

    #[test]
    fn wide_cell_advances_cursor_by_two() {
        let style = Style::default();
        let out = renderer().render(
            &[
                change(0, 0, Cell::new("\u{4e16}", style)),
                change(1, 0, Cell::continuation(style)),
                plain(2, 0, "A"),
            ],
            0,
        );
        // Continuation skipped, and "A" at x=2 follows the wide glyph
        // without a second cursor move.
        assert_eq!(out.matches("\x1b[").count(), 1);
        assert!(out.contains("\u{4e16}A"));
    }

    #[test]
    fn style_change_emitted_once_per_run() {
        let style = Style::new().fg(Color::RED);
        let out = renderer().render(
            &[
                change(0, 0, Cell::new("A", style)),
                change(1, 0, Cell::new("B", style)),
            ],
            0,
        );
        assert_eq!(out.matches("\x1b[38;5;1m").count(), 1);
    }

    #[test]
    fn truecolor_fg_and_bg() {
        let style = Style::new().fg(Color::Rgb(255, 128, 0)).bg(Color::Rgb(0, 128, 255));
        let out = renderer().render(&[change(0, 0, Cell::new("X", style))], 0);
        assert!(out.contains("\x1b[38;2;255;128;0m"));
        assert!(out.contains("\x1b[48;2;0;128;255m"));
    }

    #[test]
    fn attributes_emit_expected_codes() {
        let style = Style::new().bold(true).italic(true).blink(true);
        let out = renderer().render(&[change(0, 0, Cell::new("X", style))], 0);
        assert!(out.contains("\x1b[1m"));
        assert!(out.contains("\x1b[3m"));
        assert!(out.contains("\x1b[5m"));
    }

    #[test]
    fn losing_attribute_resets_then_reapplies() {
        let bold_red = Style::new().bold(true).fg(Color::RED);
        let red = Style::new().fg(Color::RED);
        let out = renderer().render(
            &[
                change(0, 0, Cell::new("A", bold_red)),
                change(1, 0, Cell::new("B", red)),
            ],
            0,
        );
        // Reset appears mid-stream (before B) and again at the end.
        assert_eq!(out.matches("\x1b[0m").count(), 2);
    }

    #[test]
    fn ends_with_reset_when_styled() {
        let out = renderer().render(&[change(0, 0, Cell::new("X", Style::new().bold(true)))], 0);
        assert!(out.ends_with("\x1b[0m"));
    }

    #[test]
    fn no_reset_for_default_style() {
        let out = renderer().render(&[plain(0, 0, "X")], 0);
        assert!(!out.contains("\x1b[0m"));
    }

    #[test]
    fn synchronized_wrapping() {
        let r = Renderer::new(ColorSupport::TrueColor, true);
        let out = r.render(&[plain(0, 0, "A")], 0);
        assert!(out.starts_with("\x1b[?2026h"));
        assert!(out.ends_with("\x1b[?2026l"));
    }

    #[test]
    fn row_offset_shifts_cursor_rows() {
        let out = renderer().render(&[plain(0, 0, "A")], 20);
        assert!(out.contains("\x1b[21;1H"));
    }

    #[test]
    fn downgraded_color_in_256_mode() {
        let r = Renderer::new(ColorSupport::Extended256, false);
        let style = Style::new().fg(Color::Rgb(255, 0, 0));
        let out = r.render(&[change(0, 0, Cell::new("X", style))], 0);
        assert!(out.contains("\x1b[38;5;196m"));
        assert!(!out.contains("\x1b[38;2;"));
    }

    #[test]
    fn clearing_color_emits_default_code() {
        let red = Style::new().fg(Color::RED);
        let out = renderer().render(
            &[
                change(0, 0, Cell::new("A", red)),
                change(1, 0, Cell::new("B", Style::default())),
            ],
            0,
        );
        assert!(out.contains("\x1b[39m"));
    }
}
