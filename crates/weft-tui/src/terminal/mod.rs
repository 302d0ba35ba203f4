//! Terminal device abstraction.
//!
//! The framework drives an abstract [`TerminalDevice`]; the platform
//! provides one. [`CrosstermDevice`] is the real backend (raw mode and
//! size queries via crossterm, everything else as byte-exact escape
//! sequences), [`TestDevice`] captures output in memory for tests.

mod crossterm_device;
mod session;
mod test_device;

pub use crossterm_device::CrosstermDevice;
pub use session::{SessionOptions, TerminalSession};
pub use test_device::{FailPoint, TestDevice};

use crate::color::ColorSupport;
use crate::error::Result;
use crate::geometry::Size;

/// Capabilities a device reports to the renderer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TerminalCapabilities {
    /// Color support level.
    pub color: ColorSupport,
    /// Whether CSI 2026 synchronized updates are supported.
    pub synchronized_output: bool,
}

impl Default for TerminalCapabilities {
    fn default() -> Self {
        Self {
            color: ColorSupport::TrueColor,
            synchronized_output: false,
        }
    }
}

/// Abstraction over the physical terminal.
///
/// Mode-toggling methods are idempotent at the call site's discretion;
/// [`TerminalSession`] tracks acquisition order and rollback.
pub trait TerminalDevice {
    /// Current terminal size in cells.
    fn size(&self) -> Result<Size>;

    /// Device capabilities.
    fn capabilities(&self) -> TerminalCapabilities;

    /// Write raw bytes.
    fn write(&mut self, bytes: &[u8]) -> Result<()>;

    /// Flush buffered output to the terminal.
    fn flush(&mut self) -> Result<()>;

    /// Enter raw mode (no line buffering or echo).
    fn enter_raw_mode(&mut self) -> Result<()>;

    /// Restore cooked mode.
    fn exit_raw_mode(&mut self) -> Result<()>;

    /// Switch to the alternate screen (`ESC[?1049h`).
    fn enter_alt_screen(&mut self) -> Result<()>;

    /// Return to the main screen (`ESC[?1049l`).
    fn exit_alt_screen(&mut self) -> Result<()>;

    /// Hide the cursor (`ESC[?25l`).
    fn hide_cursor(&mut self) -> Result<()>;

    /// Show the cursor (`ESC[?25h`).
    fn show_cursor(&mut self) -> Result<()>;

    /// Enable SGR mouse reporting (`ESC[?1000;1006h`).
    fn enable_mouse(&mut self) -> Result<()>;

    /// Disable SGR mouse reporting (`ESC[?1000;1006l`).
    fn disable_mouse(&mut self) -> Result<()>;

    /// Begin a synchronized update (`ESC[?2026h`). Optional; the
    /// default implementation is a no-op.
    fn begin_sync_update(&mut self) -> Result<()> {
        Ok(())
    }

    /// End a synchronized update (`ESC[?2026l`). Optional.
    fn end_sync_update(&mut self) -> Result<()> {
        Ok(())
    }

    /// Clear the visible screen (`ESC[2J`).
    fn clear_screen(&mut self) -> Result<()>;
}
