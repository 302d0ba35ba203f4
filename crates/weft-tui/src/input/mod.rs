//! Terminal input: byte-stream parsing and the multiplexed reader.

pub mod parser;

#[cfg(unix)]
pub mod reader;
#[cfg(unix)]
pub mod signal;

pub use parser::{Parser, parse};

#[cfg(unix)]
pub use reader::{EventReader, Interrupter};
