//! Terminal acquisition with rollback.
//!
//! Resources are taken in a fixed order (raw mode, alternate screen,
//! cursor, mouse) and released in reverse. A failure partway through
//! acquisition rolls back everything already taken, so the terminal is
//! never left half-configured.

use crate::error::Result;

use super::TerminalDevice;

/// What to acquire when entering the session.
#[derive(Clone, Copy, Debug)]
pub struct SessionOptions {
    /// Switch to the alternate screen (full-screen apps).
    pub alt_screen: bool,
    /// Hide the cursor while the app runs.
    pub hide_cursor: bool,
    /// Enable SGR mouse reporting.
    pub mouse: bool,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            alt_screen: true,
            hide_cursor: true,
            mouse: true,
        }
    }
}

/// Tracks which terminal modes this process has acquired.
#[derive(Debug, Default)]
pub struct TerminalSession {
    raw: bool,
    alt: bool,
    cursor_hidden: bool,
    mouse: bool,
    released: bool,
}

impl TerminalSession {
    /// Acquire the requested modes. On any failure, every mode already
    /// acquired is released (in reverse order) before the error returns.
    pub fn acquire(device: &mut dyn TerminalDevice, options: SessionOptions) -> Result<Self> {
        let mut session = Self::default();

        if let Err(e) = Self::acquire_inner(device, options, &mut session) {
            session.release(device);
            return Err(e);
        }
        Ok(session)
    }

    fn acquire_inner(
        device: &mut dyn TerminalDevice,
        options: SessionOptions,
        session: &mut Self,
    ) -> Result<()> {
        device.enter_raw_mode()?;
        session.raw = true;

        if options.alt_screen {
            device.enter_alt_screen()?;
            session.alt = true;
            device.clear_screen()?;
        }
        if options.hide_cursor {
            device.hide_cursor()?;
            session.cursor_hidden = true;
        }
        if options.mouse {
            device.enable_mouse()?;
            session.mouse = true;
        }
        Ok(())
    }

    /// Release every acquired mode in reverse order. Idempotent, and
    /// errors during release are swallowed: restoring as much of the
    /// terminal as possible beats reporting a failed step.
    pub fn release(&mut self, device: &mut dyn TerminalDevice) {
        if self.released {
            return;
        }
        self.released = true;

        if self.mouse {
            let _ = device.disable_mouse();
        }
        if self.cursor_hidden {
            let _ = device.show_cursor();
        }
        if self.alt {
            let _ = device.exit_alt_screen();
        }
        if self.raw {
            let _ = device.exit_raw_mode();
        }
        let _ = device.flush();
    }
}
