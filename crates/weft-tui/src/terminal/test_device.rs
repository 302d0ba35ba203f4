//! In-memory terminal device for testing.

use crate::error::Result;
use crate::geometry::Size;

use super::{TerminalCapabilities, TerminalDevice};

/// Captures all output and mode changes in memory.
pub struct TestDevice {
    size: Size,
    capabilities: TerminalCapabilities,
    buffer: Vec<u8>,
    raw_mode: bool,
    alt_screen: bool,
    cursor_hidden: bool,
    mouse_enabled: bool,
    /// When set, the matching mode change returns an error (used to
    /// exercise acquisition rollback).
    pub fail_on: Option<FailPoint>,
}

/// A mode change the test device can be told to fail.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FailPoint {
    /// Fail `enter_raw_mode`.
    RawMode,
    /// Fail `enter_alt_screen`.
    AltScreen,
    /// Fail `enable_mouse`.
    Mouse,
}

impl TestDevice {
    /// Create a test device with the given size.
    pub fn new(width: u16, height: u16) -> Self {
        Self {
            size: Size::new(width, height),
            capabilities: TerminalCapabilities::default(),
            buffer: Vec::new(),
            raw_mode: false,
            alt_screen: false,
            cursor_hidden: false,
            mouse_enabled: false,
            fail_on: None,
        }
    }

    /// Bytes written so far.
    pub fn output(&self) -> &[u8] {
        &self.buffer
    }

    /// Output interpreted as UTF-8 (lossy).
    pub fn output_str(&self) -> String {
        String::from_utf8_lossy(&self.buffer).into_owned()
    }

    /// Drop captured output.
    pub fn clear_output(&mut self) {
        self.buffer.clear();
    }

    /// Simulate a window resize.
    pub fn set_size(&mut self, width: u16, height: u16) {
        self.size = Size::new(width, height);
    }

    /// Whether raw mode is active.
    pub fn is_raw_mode(&self) -> bool {
        self.raw_mode
    }

    /// Whether the alternate screen is active.
    pub fn is_alt_screen(&self) -> bool {
        self.alt_screen
    }

    /// Whether the cursor is hidden.
    pub fn is_cursor_hidden(&self) -> bool {
        self.cursor_hidden
    }

    /// Whether mouse capture is active.
    pub fn is_mouse_enabled(&self) -> bool {
        self.mouse_enabled
    }

    fn check(&self, point: FailPoint) -> Result<()> {
        if self.fail_on == Some(point) {
            return Err(crate::error::WeftError::Terminal(format!(
                "injected failure at {point:?}"
            )));
        }
        Ok(())
    }
}

impl TerminalDevice for TestDevice {
    fn size(&self) -> Result<Size> {
        Ok(self.size)
    }

    fn capabilities(&self) -> TerminalCapabilities {
        self.capabilities
    }

    fn write(&mut self, bytes: &[u8]) -> Result<()> {
        self.buffer.extend_from_slice(bytes);
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        Ok(())
    }

    fn enter_raw_mode(&mut self) -> Result<()> {
        self.check(FailPoint::RawMode)?;
        self.raw_mode = true;
        Ok(())
    }

    fn exit_raw_mode(&mut self) -> Result<()> {
        self.raw_mode = false;
        Ok(())
    }

    fn enter_alt_screen(&mut self) -> Result<()> {
        self.check(FailPoint::AltScreen)?;
        self.alt_screen = true;
        Ok(())
    }

    fn exit_alt_screen(&mut self) -> Result<()> {
        self.alt_screen = false;
        Ok(())
    }

    fn hide_cursor(&mut self) -> Result<()> {
        self.cursor_hidden = true;
        Ok(())
    }

    fn show_cursor(&mut self) -> Result<()> {
        self.cursor_hidden = false;
        Ok(())
    }

    fn enable_mouse(&mut self) -> Result<()> {
        self.check(FailPoint::Mouse)?;
        self.mouse_enabled = true;
        Ok(())
    }

    fn disable_mouse(&mut self) -> Result<()> {
        self.mouse_enabled = false;
        Ok(())
    }

    fn clear_screen(&mut self) -> Result<()> {
        self.write(b"\x1b[2J")
    }
}
