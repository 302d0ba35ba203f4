//! Real terminal backend.
//!
//! Raw-mode toggling and size queries go through crossterm; every
//! escape sequence the framework emits is written literally, since the
//! byte-level vocabulary is part of the framework's contract.

use std::io::{self, Write};

use crate::color::ColorSupport;
use crate::error::Result;
use crate::geometry::Size;

use super::{TerminalCapabilities, TerminalDevice};

/// Terminal device backed by stdout and crossterm's terminal control.
pub struct CrosstermDevice {
    out: io::BufWriter<io::Stdout>,
    capabilities: TerminalCapabilities,
    raw: bool,
}

impl CrosstermDevice {
    /// Create a device for the process's controlling terminal,
    /// detecting color support from the environment.
    pub fn new() -> Self {
        Self {
            out: io::BufWriter::new(io::stdout()),
            capabilities: TerminalCapabilities {
                color: detect_color_support(),
                synchronized_output: false,
            },
            raw: false,
        }
    }

    /// Override the detected capabilities.
    #[must_use]
    pub fn with_capabilities(mut self, capabilities: TerminalCapabilities) -> Self {
        self.capabilities = capabilities;
        self
    }
}

impl Default for CrosstermDevice {
    fn default() -> Self {
        Self::new()
    }
}

impl TerminalDevice for CrosstermDevice {
    fn size(&self) -> Result<Size> {
        let (w, h) = crossterm::terminal::size()?;
        Ok(Size::new(w, h))
    }

    fn capabilities(&self) -> TerminalCapabilities {
        self.capabilities
    }

    fn write(&mut self, bytes: &[u8]) -> Result<()> {
        self.out.write_all(bytes)?;
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        self.out.flush()?;
        Ok(())
    }

    fn enter_raw_mode(&mut self) -> Result<()> {
        if !self.raw {
            crossterm::terminal::enable_raw_mode()?;
            self.raw = true;
        }
        Ok(())
    }

    fn exit_raw_mode(&mut self) -> Result<()> {
        if self.raw {
            crossterm::terminal::disable_raw_mode()?;
            self.raw = false;
        }
        Ok(())
    }

    fn enter_alt_screen(&mut self) -> Result<()> {
        self.write(b"\x1b[?1049h")?;
        self.flush()
    }

    fn exit_alt_screen(&mut self) -> Result<()> {
        self.write(b"\x1b[?1049l")?;
        self.flush()
    }

    fn hide_cursor(&mut self) -> Result<()> {
        self.write(b"\x1b[?25l")?;
        self.flush()
    }

    fn show_cursor(&mut self) -> Result<()> {
        self.write(b"\x1b[?25h")?;
        self.flush()
    }

    fn enable_mouse(&mut self) -> Result<()> {
        self.write(b"\x1b[?1000;1006h")?;
        self.flush()
    }

    fn disable_mouse(&mut self) -> Result<()> {
        self.write(b"\x1b[?1000;1006l")?;
        self.flush()
    }

    fn begin_sync_update(&mut self) -> Result<()> {
        if self.capabilities.synchronized_output {
            self.write(b"\x1b[?2026h")?;
        }
        Ok(())
    }

    fn end_sync_update(&mut self) -> Result<()> {
        if self.capabilities.synchronized_output {
            self.write(b"\x1b[?2026l")?;
        }
        Ok(())
    }

    fn clear_screen(&mut self) -> Result<()> {
        self.write(b"\x1b[2J")?;
        self.flush()
    }
}

/// Sniff color support from `COLORTERM` and `TERM`.
fn detect_color_support() -> ColorSupport {
    if let Ok(ct) = std::env::var("COLORTERM")
        && (ct.contains("truecolor") || ct.contains("24bit"))
    {
        return ColorSupport::TrueColor;
    }
    match std::env::var("TERM") {
        Ok(term) if term.contains("256") => ColorSupport::Extended256,
        Ok(_) => ColorSupport::Basic16,
        Err(_) => ColorSupport::Basic16,
    }
}
