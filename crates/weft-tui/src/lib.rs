//! weft-tui: a retained-mode, flexbox-laid-out terminal UI framework.
//!
//! Applications describe a tree of styled rectangular elements; the
//! runtime lays them out with a flex solver, paints them into a cell
//! buffer, and repaints the terminal with minimal escape sequences in
//! response to reactive state changes and input events.
//!
//! # Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                   Application Layer                         │
//! │      (Element tree, signals & bindings, watchers)           │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │                 Layout Engine (flex solver)                 │
//! │  LayoutStyle → intrinsic pass → flex distribution → rects   │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │                         Painter                             │
//! │  background / border / text → back ScreenBuffer             │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │             Renderer (differential, wide-char safe)         │
//! │  back vs front diff → minimal cursor/SGR escape output      │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │                     Terminal Device                         │
//! │  raw mode, alternate screen, mouse, byte-exact sequences    │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! Input flows the other way: a worker thread polls stdin and the
//! resize pipe, parses bytes into events, and enqueues closures on the
//! main-thread task queue. All element and signal mutation happens on
//! the main thread.
//!
//! ## Core Subsystems
//!
//! - **Layout**: two-pass flexbox with intrinsic sizing and
//!   dirty-subtree skipping
//! - **Buffer & Renderer**: double-buffered cell grid, wide-character
//!   aware, minimal diff output
//! - **Input**: byte-level parser (UTF-8, CSI, SS3, SGR mouse) over a
//!   `poll(2)` multiplexer with resize debouncing
//! - **Reactive**: `Signal<T>` cells with bindings and coalescing
//!   batches
//! - **Focus**: circular ring with skip and wraparound, mouse hit
//!   testing

pub mod app;
pub mod buffer;
pub mod cell;
pub mod color;
pub mod element;
pub mod error;
pub mod event;
pub mod focus;
pub mod geometry;
pub mod input;
pub mod layout;
pub mod painter;
pub mod reactive;
pub mod render_context;
pub mod renderer;
pub mod style;
pub mod terminal;
pub mod tree;

pub use app::{App, AppConfig, stop};
pub use buffer::{CellChange, ScreenBuffer};
pub use cell::Cell;
pub use color::{Color, ColorSupport};
pub use element::{BorderStyle, Element, ElementId, ElementKind, TextAlign};
pub use error::{Result, WeftError};
pub use event::{Event, KeyCode, KeyEvent, Modifiers, MouseButton, MouseEvent, MouseEventKind};
pub use focus::FocusManager;
pub use geometry::{Edges, Point, Rect, Size};
pub use layout::{Align, Direction, Justify, LayoutStyle, Value, calculate};
pub use painter::paint_tree;
pub use reactive::{Signal, Unbind, batch};
pub use render_context::RenderContext;
pub use renderer::Renderer;
pub use style::Style;
pub use terminal::{
    CrosstermDevice, SessionOptions, TerminalCapabilities, TerminalDevice, TerminalSession,
    TestDevice,
};
pub use tree::ElementTree;

#[cfg(unix)]
pub use input::{EventReader, Interrupter};
