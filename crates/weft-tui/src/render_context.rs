//! Render context — owns the front/back buffer pair and the flush path.
//!
//! The back buffer is the sole paint target; the front buffer mirrors
//! what the terminal last showed and is only touched by the flush. A
//! forced-full flush ignores the front buffer entirely (initial paint
//! and post-resize recovery).

use crate::buffer::ScreenBuffer;
use crate::error::Result;
use crate::geometry::Size;
use crate::renderer::Renderer;
use crate::terminal::{TerminalCapabilities, TerminalDevice};

/// Double-buffered frame state plus the ANSI renderer.
pub struct RenderContext {
    front: ScreenBuffer,
    back: ScreenBuffer,
    renderer: Renderer,
    size: Size,
    row_offset: u16,
    force_full: bool,
}

impl RenderContext {
    /// Create a context for the given size and device capabilities.
    /// The first flush is always a full paint.
    pub fn new(size: Size, capabilities: TerminalCapabilities) -> Self {
        Self {
            front: ScreenBuffer::new(size),
            back: ScreenBuffer::new(size),
            renderer: Renderer::new(capabilities.color, capabilities.synchronized_output),
            size,
            row_offset: 0,
            force_full: true,
        }
    }

    /// The current buffer size.
    pub fn size(&self) -> Size {
        self.size
    }

    /// Shift all emitted rows down by `offset` terminal rows. Inline
    /// mode points this at the reserved strip.
    pub fn set_row_offset(&mut self, offset: u16) {
        self.row_offset = offset;
    }

    /// The row offset currently applied to flushes.
    pub fn row_offset(&self) -> u16 {
        self.row_offset
    }

    /// Clear the back buffer for a fresh frame and return it as the
    /// paint target.
    pub fn begin_frame(&mut self) -> &mut ScreenBuffer {
        self.back.clear();
        &mut self.back
    }

    /// The back buffer without clearing (for incremental painters).
    pub fn back_mut(&mut self) -> &mut ScreenBuffer {
        &mut self.back
    }

    /// Read access to the back buffer.
    pub fn back(&self) -> &ScreenBuffer {
        &self.back
    }

    /// Resize both buffers, dropping contents. The next flush is full.
    pub fn handle_resize(&mut self, size: Size) {
        self.size = size;
        self.front.resize(size);
        self.back.resize(size);
        self.force_full = true;
    }

    /// Force the next flush to repaint every cell.
    pub fn force_full_redraw(&mut self) {
        self.force_full = true;
    }

    /// Bring the terminal into agreement with the back buffer.
    ///
    /// Emits the diff against the front buffer (or every primary cell
    /// when a full redraw is pending), then records the back buffer as
    /// flushed. Returns the number of bytes written.
    pub fn flush(&mut self, device: &mut dyn TerminalDevice) -> Result<usize> {
        let changes = if self.force_full {
            self.back.full_changes()
        } else {
            self.back.diff(&self.front)
        };
        self.force_full = false;

        let out = self.renderer.render(&changes, self.row_offset);
        if !out.is_empty() {
            device.write(out.as_bytes())?;
            device.flush()?;
        }

        self.front.copy_from(&self.back);
        self.back.clear_dirty();
        tracing::debug!(bytes = out.len(), changes = changes.len(), "flushed frame");
        Ok(out.len())
    }
}
