//! Runtime configuration.

use std::time::Duration;

use crate::error::{Result, WeftError};

/// Options controlling the [`super::App`] runtime.
///
/// Invalid values are rejected when the app is constructed, never at
/// run time.
#[derive(Clone, Debug)]
pub struct AppConfig {
    /// How long the input worker blocks per poll. `None` blocks until
    /// input or an interrupt arrives.
    pub input_latency: Option<Duration>,
    /// Frames per second, 1..=240.
    pub frame_rate: u32,
    /// Capacity of the main-thread task queue (at least 1).
    pub event_queue_size: usize,
    /// Enable SGR mouse reporting.
    pub mouse_enabled: bool,
    /// Leave the cursor visible while running.
    pub cursor_visible: bool,
    /// When non-zero, manage only this many rows at the bottom of the
    /// terminal instead of the alternate screen.
    pub inline_height: u16,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            input_latency: Some(Duration::from_millis(50)),
            frame_rate: 60,
            event_queue_size: 256,
            mouse_enabled: true,
            cursor_visible: false,
            inline_height: 0,
        }
    }
}

impl AppConfig {
    /// Check option values, returning a config error for any that are
    /// out of range.
    pub fn validate(&self) -> Result<()> {
        if self.frame_rate == 0 || self.frame_rate > 240 {
            return Err(WeftError::Config(format!(
                "frame_rate must be 1..=240, got {}",
                self.frame_rate
            )));
        }
        if self.event_queue_size == 0 {
            return Err(WeftError::Config("event_queue_size must be at least 1".into()));
        }
        Ok(())
    }
}
