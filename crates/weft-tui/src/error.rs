//! Error types for weft-tui.

use std::io;

/// Error type for weft-tui operations.
#[derive(Debug, thiserror::Error)]
pub enum WeftError {
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Terminal acquisition or control failed.
    #[error("terminal error: {0}")]
    Terminal(String),

    /// Invalid configuration value, rejected at construction.
    #[error("config error: {0}")]
    Config(String),

    /// Rendering failed.
    #[error("render error: {0}")]
    Render(String),

    /// Element tree operation failed.
    #[error("element error: {0}")]
    Element(String),
}

/// Result type alias for weft-tui operations.
pub type Result<T> = std::result::Result<T, WeftError>;
