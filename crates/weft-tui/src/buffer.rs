//! Screen buffer — a row-major grid of cells with dirty-row tracking.

use crate::cell::Cell;
use crate::geometry::Size;

/// A 2D grid of terminal cells representing one frame of content.
///
/// Writes go through [`ScreenBuffer::set`], which keeps wide-character
/// pairs consistent: a primary cell and its continuation are written
/// and cleared together, so the grid never holds half a glyph.
#[derive(Clone, Debug)]
pub struct ScreenBuffer {
    cells: Vec<Cell>,
    dirty_rows: Vec<bool>,
    width: u16,
    height: u16,
}

impl ScreenBuffer {
    /// Create a new buffer filled with blank cells.
    pub fn new(size: Size) -> Self {
        let len = usize::from(size.width) * usize::from(size.height);
        Self {
            cells: vec![Cell::blank(); len],
            dirty_rows: vec![true; usize::from(size.height)],
            width: size.width,
            height: size.height,
        }
    }

    /// Buffer dimensions.
    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    /// Buffer width in columns.
    pub fn width(&self) -> u16 {
        self.width
    }

    /// Buffer height in rows.
    pub fn height(&self) -> u16 {
        self.height
    }

    /// Reset every cell to blank and mark all rows dirty.
    pub fn clear(&mut self) {
        for cell in &mut self.cells {
            *cell = Cell::blank();
        }
        for row in &mut self.dirty_rows {
            *row = true;
        }
    }

    /// Resize the buffer. Contents are lost (filled with blanks).
    pub fn resize(&mut self, size: Size) {
        self.width = size.width;
        self.height = size.height;
        let len = usize::from(size.width) * usize::from(size.height);
        self.cells.clear();
        self.cells.resize(len, Cell::blank());
        self.dirty_rows.clear();
        self.dirty_rows.resize(usize::from(size.height), true);
    }

    /// The cell at (x, y), or `None` if out of bounds.
    pub fn get(&self, x: u16, y: u16) -> Option<&Cell> {
        if x < self.width && y < self.height {
            self.cells.get(self.index(x, y))
        } else {
            None
        }
    }

    /// A full row of cells, or `None` if out of bounds.
    pub fn row(&self, y: u16) -> Option<&[Cell]> {
        if y < self.height {
            let start = self.index(0, y);
            Some(&self.cells[start..start + usize::from(self.width)])
        } else {
            None
        }
    }

    /// Returns true if the row has been written since the last
    /// [`ScreenBuffer::clear_dirty`].
    pub fn is_row_dirty(&self, y: u16) -> bool {
        self.dirty_rows
            .get(usize::from(y))
            .copied()
            .unwrap_or(false)
    }

    /// Mark every row clean. Called after the buffer has been flushed.
    pub fn clear_dirty(&mut self) {
        for row in &mut self.dirty_rows {
            *row = false;
        }
    }

    /// Write a cell at (x, y). No-op when out of bounds.
    ///
    /// Wide-character discipline:
    /// - A wide glyph writes its continuation cell at `x+1` atomically,
    ///   both carrying the same style.
    /// - A wide glyph whose continuation would fall past the right edge
    ///   is replaced with a styled space.
    /// - Overwriting a continuation cell turns the orphaned primary to
    ///   its left into a space that keeps the primary's style.
    /// - Overwriting a wide primary turns its orphaned continuation
    ///   into a space that keeps that glyph's style.
    pub fn set(&mut self, x: u16, y: u16, cell: Cell) {
        if x >= self.width || y >= self.height || cell.is_continuation() {
            return;
        }

        self.mark_row(y);

        // Wide glyph with no room for its continuation: place a space.
        if cell.is_wide() && x + 1 >= self.width {
            let style = cell.style;
            let idx = self.index(x, y);
            self.cells[idx] = Cell::space(style);
            return;
        }

        let idx = self.index(x, y);

        // Orphan repair: the target is the second half of a wide glyph.
        if self.cells[idx].is_continuation() && x > 0 {
            let prev = self.index(x - 1, y);
            if self.cells[prev].is_wide() {
                let style = self.cells[prev].style;
                self.cells[prev] = Cell::space(style);
            }
        }

        // Orphan repair: the target is the first half of a wide glyph.
        if self.cells[idx].is_wide() && x + 1 < self.width {
            let next = self.index(x + 1, y);
            if self.cells[next].is_continuation() {
                let style = self.cells[next].style;
                self.cells[next] = Cell::space(style);
            }
        }

        let is_wide = cell.is_wide();
        let style = cell.style;
        self.cells[idx] = cell;

        if is_wide {
            let next = self.index(x + 1, y);
            // The continuation target may itself start a wide glyph;
            // repair that glyph's own continuation first.
            if self.cells[next].is_wide() && x + 2 < self.width {
                let after = self.index(x + 2, y);
                if self.cells[after].is_continuation() {
                    let after_style = self.cells[after].style;
                    self.cells[after] = Cell::space(after_style);
                }
            }
            self.cells[next] = Cell::continuation(style);
        }
    }

    /// Compare against the previously flushed buffer, producing the
    /// cell changes needed to bring the terminal up to date.
    ///
    /// Rows whose dirty bit is clear are skipped: a clean row has not
    /// been written since the last flush, so it already matches. A size
    /// mismatch degenerates to a full-buffer change list.
    pub fn diff(&self, previous: &ScreenBuffer) -> Vec<CellChange> {
        if self.width != previous.width || self.height != previous.height {
            return self.full_changes();
        }

        let mut changes = Vec::new();
        for y in 0..self.height {
            if !self.is_row_dirty(y) {
                continue;
            }
            for x in 0..self.width {
                let idx = self.index(x, y);
                if self.cells[idx] != previous.cells[idx] {
                    changes.push(CellChange {
                        x,
                        y,
                        cell: self.cells[idx].clone(),
                    });
                }
            }
        }
        changes
    }

    /// A change entry for every cell, ignoring any previous state.
    /// Used for the initial paint and after a resize.
    pub fn full_changes(&self) -> Vec<CellChange> {
        let mut changes = Vec::with_capacity(self.cells.len());
        for y in 0..self.height {
            for x in 0..self.width {
                changes.push(CellChange {
                    x,
                    y,
                    cell: self.cells[self.index(x, y)].clone(),
                });
            }
        }
        changes
    }

    /// Copy another buffer's contents into this one. Sizes must match;
    /// otherwise this buffer resizes to fit.
    pub fn copy_from(&mut self, other: &ScreenBuffer) {
        if self.width != other.width || self.height != other.height {
            self.resize(other.size());
        }
        self.cells.clone_from(&other.cells);
    }

    fn mark_row(&mut self, y: u16) {
        if let Some(row) = self.dirty_rows.get_mut(usize::from(y)) {
            *row = true;
        }
    }

    fn index(&self, x: u16, y: u16) -> usize {
        usize::from(y) * usize::from(self.width) + usize::from(x)
    }
}

/// A single cell change: position plus the new cell value.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CellChange {
    /// Column position.
    pub x: u16,
    /// Row position.
    pub y: u16,
    /// New cell value.
    pub cell: Cell,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Color;
    use crate::style::Style;

    fn wide() -> Cell {
        Cell::new("\u{4e16}", Style::default()) // 世
    }

    #[test]
    fn new_buffer_all_blank() {
        let buf = ScreenBuffer::new(Size::new(10, 5));
        for y in 0..5 {
            for x in 0..10 {
                assert!(buf.get(x, y).is_some_and(Cell::is_blank));
            }
        }
    }

    #[test]
    fn set_and_get() {
        let mut buf = ScreenBuffer::new(Size::new(10, 5));
        let cell = Cell::new("A", Style::new().fg(Color::RED));
        buf.set(3, 2, cell.clone());
        assert_eq!(buf.get(3, 2), Some(&cell));
    }

    #[test]
    fn out_of_bounds_get_returns_none() {
        let buf = ScreenBuffer::new(Size::new(5, 3));
        assert!(buf.get(5, 0).is_none());
        assert!(buf.get(0, 3).is_none());
    }

    #[test]
    fn out_of_bounds_set_is_noop() {
        let mut buf = ScreenBuffer::new(Size::new(5, 3));
        buf.set(10, 10, Cell::new("X", Style::default()));
    }

    #[test]
    fn wide_glyph_writes_continuation() {
        let mut buf = ScreenBuffer::new(Size::new(10, 5));
        buf.set(3, 1, wide());
        assert!(buf.get(3, 1).is_some_and(Cell::is_wide));
        assert!(buf.get(4, 1).is_some_and(Cell::is_continuation));
    }

    #[test]
    fn continuation_carries_primary_style() {
        let mut buf = ScreenBuffer::new(Size::new(10, 1));
        let style = Style::new().fg(Color::CYAN).bold(true);
        buf.set(0, 0, Cell::new("\u{4e16}", style));
        assert_eq!(buf.get(1, 0).map(|c| c.style), Some(style));
    }

    #[test]
    fn wide_glyph_at_last_column_becomes_space() {
        let mut buf = ScreenBuffer::new(Size::new(5, 1));
        let style = Style::new().bg(Color::BLUE);
        buf.set(4, 0, Cell::new("\u{4e16}", style));
        let cell = buf.get(4, 0);
        assert_eq!(cell.map(|c| c.glyph.as_str()), Some(" "));
        assert_eq!(cell.map(|c| c.style), Some(style));
    }

    #[test]
    fn wide_glyph_continuation_exactly_at_last_column_fits() {
        let mut buf = ScreenBuffer::new(Size::new(6, 1));
        buf.set(4, 0, wide());
        assert!(buf.get(4, 0).is_some_and(Cell::is_wide));
        assert!(buf.get(5, 0).is_some_and(Cell::is_continuation));
    }

    #[test]
    fn overwrite_continuation_orphan_keeps_style() {
        let mut buf = ScreenBuffer::new(Size::new(10, 1));
        let style = Style::new().fg(Color::MAGENTA);
        buf.set(3, 0, Cell::new("\u{4e16}", style));
        // Write a narrow glyph over the continuation half.
        buf.set(4, 0, Cell::new("A", Style::default()));
        let orphan = buf.get(3, 0);
        assert_eq!(orphan.map(|c| c.glyph.as_str()), Some(" "));
        assert_eq!(orphan.map(|c| c.style), Some(style));
        assert_eq!(buf.get(4, 0).map(|c| c.glyph.as_str()), Some("A"));
        assert_eq!(buf.get(4, 0).map(|c| c.width), Some(1));
    }

    #[test]
    fn overwrite_primary_orphan_continuation_becomes_space() {
        let mut buf = ScreenBuffer::new(Size::new(10, 1));
        let style = Style::new().fg(Color::YELLOW);
        buf.set(3, 0, Cell::new("\u{4e16}", style));
        buf.set(3, 0, Cell::new("A", Style::default()));
        assert_eq!(buf.get(3, 0).map(|c| c.glyph.as_str()), Some("A"));
        let cont = buf.get(4, 0);
        assert_eq!(cont.map(|c| c.glyph.as_str()), Some(" "));
        assert_eq!(cont.map(|c| c.style), Some(style));
    }

    #[test]
    fn wide_over_wide_replaces_cleanly() {
        let mut buf = ScreenBuffer::new(Size::new(10, 1));
        buf.set(2, 0, Cell::new("\u{4e16}", Style::default()));
        buf.set(2, 0, Cell::new("\u{754c}", Style::default()));
        assert_eq!(buf.get(2, 0).map(|c| c.glyph.as_str()), Some("\u{754c}"));
        assert!(buf.get(3, 0).is_some_and(Cell::is_continuation));
    }

    #[test]
    fn wide_glyph_overlapping_next_wide_repairs_tail() {
        let mut buf = ScreenBuffer::new(Size::new(10, 1));
        // Glyphs at 2-3 and 4-5, then a wide write at 3 spans 3-4.
        buf.set(2, 0, Cell::new("\u{4e16}", Style::default()));
        buf.set(4, 0, Cell::new("\u{754c}", Style::default()));
        buf.set(3, 0, Cell::new("\u{4eba}", Style::default()));
        // 2 is an orphaned space, 3-4 the new pair, 5 a repaired space.
        assert_eq!(buf.get(2, 0).map(|c| c.glyph.as_str()), Some(" "));
        assert!(buf.get(3, 0).is_some_and(Cell::is_wide));
        assert!(buf.get(4, 0).is_some_and(Cell::is_continuation));
        assert_eq!(buf.get(5, 0).map(|c| c.glyph.as_str()), Some(" "));
    }

    #[test]
    fn continuation_cells_cannot_be_set_directly() {
        let mut buf = ScreenBuffer::new(Size::new(5, 1));
        buf.set(2, 0, Cell::continuation(Style::default()));
        assert!(buf.get(2, 0).is_some_and(Cell::is_blank));
    }

    #[test]
    fn diff_no_changes() {
        let a = ScreenBuffer::new(Size::new(5, 3));
        let b = ScreenBuffer::new(Size::new(5, 3));
        assert!(a.diff(&b).is_empty());
    }

    #[test]
    fn diff_identical_painted_buffers_is_empty() {
        let mut a = ScreenBuffer::new(Size::new(5, 3));
        let mut b = ScreenBuffer::new(Size::new(5, 3));
        a.set(1, 1, Cell::new("X", Style::default()));
        b.set(1, 1, Cell::new("X", Style::default()));
        assert!(a.diff(&b).is_empty());
    }

    #[test]
    fn diff_single_change() {
        let mut current = ScreenBuffer::new(Size::new(5, 3));
        let previous = ScreenBuffer::new(Size::new(5, 3));
        current.set(2, 1, Cell::new("A", Style::default()));
        let changes = current.diff(&previous);
        assert_eq!(changes.len(), 1);
        assert_eq!((changes[0].x, changes[0].y), (2, 1));
    }

    #[test]
    fn diff_style_only_change() {
        let mut current = ScreenBuffer::new(Size::new(5, 3));
        let mut previous = ScreenBuffer::new(Size::new(5, 3));
        previous.set(0, 0, Cell::new("A", Style::default()));
        current.set(0, 0, Cell::new("A", Style::new().bold(true)));
        assert_eq!(current.diff(&previous).len(), 1);
    }

    #[test]
    fn diff_wide_glyph_yields_primary_and_continuation() {
        let mut current = ScreenBuffer::new(Size::new(10, 1));
        let previous = ScreenBuffer::new(Size::new(10, 1));
        current.set(3, 0, wide());
        let changes = current.diff(&previous);
        assert_eq!(changes.len(), 2);
        assert_eq!(changes[0].cell.width, 2);
        assert_eq!(changes[1].cell.width, 0);
    }

    #[test]
    fn diff_size_mismatch_full_redraw() {
        let current = ScreenBuffer::new(Size::new(5, 3));
        let previous = ScreenBuffer::new(Size::new(10, 8));
        assert_eq!(current.diff(&previous).len(), 15);
    }

    #[test]
    fn clean_rows_are_skipped() {
        let mut current = ScreenBuffer::new(Size::new(5, 3));
        let previous = ScreenBuffer::new(Size::new(5, 3));
        current.set(1, 1, Cell::new("A", Style::default()));
        current.clear_dirty();
        // The write is still in the grid, but the row is clean: the
        // caller asserts it was already flushed.
        assert!(current.diff(&previous).is_empty());
        current.set(1, 1, Cell::new("B", Style::default()));
        assert_eq!(current.diff(&previous).len(), 1);
    }

    #[test]
    fn copy_from_matches_source() {
        let mut src = ScreenBuffer::new(Size::new(5, 3));
        src.set(2, 2, Cell::new("Z", Style::default()));
        let mut dst = ScreenBuffer::new(Size::new(5, 3));
        dst.copy_from(&src);
        assert_eq!(dst.get(2, 2).map(|c| c.glyph.as_str()), Some("Z"));
        assert!(src.diff(&dst).is_empty());
    }

    #[test]
    fn resize_marks_all_dirty() {
        let mut buf = ScreenBuffer::new(Size::new(5, 3));
        buf.clear_dirty();
        buf.resize(Size::new(8, 4));
        for y in 0..4 {
            assert!(buf.is_row_dirty(y));
        }
    }
}
