//! Painter — renders an element subtree into the back buffer.
//!
//! Per element, in order: background fill, border (with optional
//! title), text content, then children. Everything is clipped to the
//! buffer; out-of-bounds writes are silently dropped.

use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthStr;

use crate::buffer::ScreenBuffer;
use crate::cell::Cell;
use crate::element::{ElementId, TextAlign};
use crate::geometry::Rect;
use crate::style::Style;
use crate::tree::ElementTree;

/// Paint the subtree rooted at `root` into `buf`.
///
/// Visual styles inherit: an element's unset colors fall through to
/// the nearest ancestor that sets them.
pub fn paint_tree(tree: &ElementTree, root: ElementId, buf: &mut ScreenBuffer) {
    paint(tree, root, buf, Style::default());
}

fn paint(tree: &ElementTree, id: ElementId, buf: &mut ScreenBuffer, inherited: Style) {
    let Some(el) = tree.get(id) else { return };
    let style = inherited.merge(&el.visual);
    let rect = el.rect;

    if rect.is_empty() {
        // Zero-area elements paint nothing, but children keep their
        // deterministic positions; recurse so their state stays warm.
        for &child in &el.children {
            paint(tree, child, buf, style);
        }
        return;
    }

    // 1. Background.
    if el.visual.bg.is_some() {
        fill_rect(buf, rect, style);
    }

    // 2. Border.
    if let Some(border) = el.border {
        draw_border(buf, rect, border, style);
        if let Some(title) = el.title.as_deref() {
            draw_title(buf, rect, title, el.title_align, style);
        }
    }

    // 3. Text content.
    if let Some(text) = el.text.as_deref() {
        draw_text(buf, el.content_rect, text, el.text_align, style);
    }

    // 4. Children, in order.
    for &child in &el.children {
        paint(tree, child, buf, style);
    }
}

fn fill_rect(buf: &mut ScreenBuffer, rect: Rect, style: Style) {
    let right = rect.right().min(buf.width());
    let bottom = rect.bottom().min(buf.height());
    for y in rect.y..bottom {
        for x in rect.x..right {
            buf.set(x, y, Cell::space(style));
        }
    }
}

fn draw_border(
    buf: &mut ScreenBuffer,
    rect: Rect,
    border: crate::element::BorderStyle,
    style: Style,
) {
    if rect.width < 2 || rect.height < 2 {
        return;
    }
    let g = border.glyphs();
    let x1 = rect.x;
    let y1 = rect.y;
    let x2 = rect.right() - 1;
    let y2 = rect.bottom() - 1;

    buf.set(x1, y1, Cell::new(g.top_left, style));
    buf.set(x2, y1, Cell::new(g.top_right, style));
    buf.set(x1, y2, Cell::new(g.bottom_left, style));
    buf.set(x2, y2, Cell::new(g.bottom_right, style));

    for x in (x1 + 1)..x2 {
        buf.set(x, y1, Cell::new(g.top, style));
        buf.set(x, y2, Cell::new(g.bottom, style));
    }
    for y in (y1 + 1)..y2 {
        buf.set(x1, y, Cell::new(g.left, style));
        buf.set(x2, y, Cell::new(g.right, style));
    }
}

fn draw_title(buf: &mut ScreenBuffer, rect: Rect, title: &str, align: TextAlign, style: Style) {
    if rect.width < 3 {
        return;
    }
    let max = rect.width - 2;
    let (truncated, width) = truncate_to_width(title, max);
    if width == 0 {
        return;
    }
    let offset = match align {
        TextAlign::Left => 0,
        TextAlign::Center => (max - width) / 2,
        TextAlign::Right => max - width,
    };
    place_glyphs(buf, rect.x + 1 + offset, rect.y, rect.x + 1 + max, &truncated, style);
}

fn draw_text(buf: &mut ScreenBuffer, content: Rect, text: &str, align: TextAlign, style: Style) {
    if content.is_empty() {
        return;
    }
    let right = content.right();
    for (i, line) in text.lines().enumerate() {
        if i as u16 >= content.height {
            break;
        }
        let y = content.y + i as u16;
        let line_width = (UnicodeWidthStr::width(line) as u16).min(content.width);
        let offset = match align {
            TextAlign::Left => 0,
            TextAlign::Center => (content.width - line_width) / 2,
            TextAlign::Right => content.width - line_width,
        };
        place_glyphs(buf, content.x + offset, y, right, line, style);
    }
}

/// Write a run of glyphs left to right, stopping at `right`. A wide
/// glyph that would straddle the boundary is replaced with a space.
fn place_glyphs(buf: &mut ScreenBuffer, start_x: u16, y: u16, right: u16, text: &str, style: Style) {
    let mut x = start_x;
    for glyph in text.graphemes(true) {
        let width = UnicodeWidthStr::width(glyph) as u16;
        if width == 0 {
            continue;
        }
        if x >= right {
            break;
        }
        if x + width > right {
            buf.set(x, y, Cell::space(style));
            break;
        }
        buf.set(x, y, Cell::new(glyph, style));
        x += width;
    }
}

/// Truncate a string to at most `max` display columns, returning the
/// kept prefix and its width.
fn truncate_to_width(text: &str, max: u16) -> (String, u16) {
    let mut out = String::new();
    let mut width: u16 = 0;
    for glyph in text.graphemes(true) {
        let w = UnicodeWidthStr::width(glyph) as u16;
        if width + w > max {
            break;
        }
        out.push_str(glyph);
        width += w;
    }
    (out, width)
}
