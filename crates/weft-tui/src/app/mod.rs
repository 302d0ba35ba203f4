//! Application runtime: frame-paced loop, event queue, lifecycle.
//!
//! All element and signal mutation happens on the thread that runs the
//! loop. Background threads (the input worker and watchers) only
//! enqueue closures onto a bounded channel; the loop drains the queue,
//! renders when anything is dirty, and sleeps out the frame.

mod config;
mod watcher;

pub use config::AppConfig;

use std::cell::RefCell;
use std::rc::Rc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{Receiver, SyncSender, TrySendError, sync_channel};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::{Duration, Instant};

use crate::element::ElementId;
use crate::event::{Event, KeyCode, KeyEvent, MouseEvent, MouseEventKind};
use crate::focus::FocusManager;
use crate::geometry::Size;
use crate::Result;
use crate::layout;
use crate::painter;
use crate::reactive;
use crate::render_context::RenderContext;
use crate::terminal::TerminalDevice;
use crate::tree::ElementTree;

#[cfg(unix)]
use crate::WeftError;
#[cfg(unix)]
use crate::input::reader::{EventReader, Interrupter};
#[cfg(unix)]
use crate::input::signal;
#[cfg(unix)]
use crate::terminal::{SessionOptions, TerminalSession};

/// A unit of work executed on the main thread.
pub type Task = Box<dyn FnOnce(&mut App) + Send>;

type KeyHandler = Box<dyn FnMut(&Event) -> bool>;

/// Handle for stopping the currently running app from anywhere.
struct StopHandle {
    stopped: Arc<AtomicBool>,
    #[cfg(unix)]
    interrupter: Option<Interrupter>,
}

static RUNNING: Mutex<Option<StopHandle>> = Mutex::new(None);

/// Stop the currently running [`App`], if any. Idempotent; safe from
/// any thread.
pub fn stop() {
    let guard = RUNNING.lock().unwrap_or_else(PoisonError::into_inner);
    if let Some(handle) = guard.as_ref() {
        handle.stopped.store(true, Ordering::SeqCst);
        #[cfg(unix)]
        if let Some(interrupter) = &handle.interrupter {
            interrupter.interrupt();
        }
    }
}

/// Retained-mode application runtime.
pub struct App {
    tree: ElementTree,
    root: Option<ElementId>,
    focus: FocusManager,
    ctx: RenderContext,
    config: AppConfig,
    global_key_handler: Option<KeyHandler>,

    queue_tx: SyncSender<Task>,
    queue_rx: Option<Receiver<Task>>,
    stopped: Arc<AtomicBool>,
    #[cfg(unix)]
    interrupter: Option<Interrupter>,
    workers: Vec<std::thread::JoinHandle<()>>,

    pending_focusables: Rc<RefCell<Vec<ElementId>>>,
    inline_start_row: u16,
}

impl App {
    /// Create a runtime sized to the device.
    ///
    /// With `inline_height > 0` the app manages only a strip that tall
    /// at the bottom of the terminal; otherwise it owns the whole
    /// alternate screen.
    pub fn new(device: &dyn TerminalDevice, config: AppConfig) -> Result<Self> {
        config.validate()?;

        let term_size = device.size()?;
        let buffer_size = if config.inline_height > 0 {
            Size::new(term_size.width, config.inline_height.min(term_size.height))
        } else {
            term_size
        };
        let inline_start_row = if config.inline_height > 0 {
            term_size.height.saturating_sub(config.inline_height)
        } else {
            0
        };

        let mut ctx = RenderContext::new(buffer_size, device.capabilities());
        ctx.set_row_offset(inline_start_row);

        let (queue_tx, queue_rx) = sync_channel(config.event_queue_size);

        let mut tree = ElementTree::new();
        let pending_focusables: Rc<RefCell<Vec<ElementId>>> = Rc::default();
        let sink = Rc::clone(&pending_focusables);
        tree.on_focusable_added(move |id| sink.borrow_mut().push(id));

        Ok(Self {
            tree,
            root: None,
            focus: FocusManager::new(),
            ctx,
            config,
            global_key_handler: None,
            queue_tx,
            queue_rx: Some(queue_rx),
            stopped: Arc::new(AtomicBool::new(false)),
            #[cfg(unix)]
            interrupter: None,
            workers: Vec::new(),
            pending_focusables,
            inline_start_row,
        })
    }

    /// The element tree.
    pub fn tree(&self) -> &ElementTree {
        &self.tree
    }

    /// Mutable access to the element tree.
    pub fn tree_mut(&mut self) -> &mut ElementTree {
        &mut self.tree
    }

    /// The focus manager.
    pub fn focus(&self) -> &FocusManager {
        &self.focus
    }

    /// Set the root element. Every focusable already in the subtree is
    /// registered with the focus ring.
    pub fn set_root(&mut self, root: ElementId) {
        self.tree.set_root(root);
        self.root = Some(root);
        self.drain_focusables();
        reactive::mark_dirty();
    }

    /// Attach `child` under `parent`, registering any focusables in
    /// the mounted subtree.
    pub fn mount(&mut self, parent: ElementId, child: ElementId) -> Result<()> {
        self.tree.add_child(parent, child)?;
        self.drain_focusables();
        reactive::mark_dirty();
        Ok(())
    }

    /// Remove an element and its subtree, unregistering focusables.
    pub fn remove(&mut self, id: ElementId) {
        let removed = self.tree.remove(id);
        for dead in removed {
            self.focus.unregister(&mut self.tree, dead);
        }
        if self.root == Some(id) {
            self.root = None;
        }
        reactive::mark_dirty();
    }

    /// Install a handler that sees every key event before dispatch.
    /// Returning true consumes the event.
    pub fn set_global_key_handler(&mut self, handler: impl FnMut(&Event) -> bool + 'static) {
        self.global_key_handler = Some(Box::new(handler));
    }

    /// A sender for enqueueing work onto the main thread.
    pub fn task_sender(&self) -> SyncSender<Task> {
        self.queue_tx.clone()
    }

    /// Returns true once [`App::stop`] (or the package-level
    /// [`stop`]) has been called.
    pub fn is_stopped(&self) -> bool {
        self.stopped.load(Ordering::SeqCst)
    }

    /// Request shutdown. Idempotent: sets the stop flag and wakes any
    /// blocked reader so the loop can wind down.
    pub fn stop(&mut self) {
        if !self.stopped.swap(true, Ordering::SeqCst) {
            tracing::info!("stop requested");
            #[cfg(unix)]
            if let Some(interrupter) = &self.interrupter {
                interrupter.interrupt();
            }
        }
    }

    /// Route one event through the global key handler, focus
    /// navigation, and dispatch. Public so embedders and tests can
    /// drive the runtime without the blocking loop.
    pub fn process_event(&mut self, event: Event) {
        if let Event::Key(_) = event
            && let Some(handler) = self.global_key_handler.as_mut()
            && handler(&event)
        {
            reactive::mark_dirty();
            return;
        }

        match event {
            Event::Resize(w, h) => self.apply_resize(w, h),
            Event::Key(KeyEvent {
                code: KeyCode::Tab,
                modifiers,
            }) => {
                if modifiers.contains(crate::event::Modifiers::SHIFT) {
                    self.focus.prev(&mut self.tree);
                } else {
                    self.focus.next(&mut self.tree);
                }
                reactive::mark_dirty();
            }
            Event::Key(_) => {
                if self.focus.dispatch(&mut self.tree, &event) {
                    reactive::mark_dirty();
                }
            }
            Event::Mouse(mouse) => self.process_mouse(mouse),
        }
    }

    fn process_mouse(&mut self, mouse: MouseEvent) {
        // Inline mode: the widget occupies the bottom strip; events
        // above it belong to the scrollback.
        let Some(y) = mouse.y.checked_sub(self.inline_start_row) else {
            return;
        };
        let local = MouseEvent { y, ..mouse };

        let Some(target) = self.tree.focusable_at_point(local.x, local.y) else {
            return;
        };
        if let MouseEventKind::Press(_) = local.kind {
            self.focus.set_focus(&mut self.tree, target);
            self.tree.fire_click(target);
        }
        self.tree.handle_event(target, &Event::Mouse(local));
        reactive::mark_dirty();
    }

    fn apply_resize(&mut self, width: u16, height: u16) {
        let buffer_size = if self.config.inline_height > 0 {
            self.inline_start_row = height.saturating_sub(self.config.inline_height);
            self.ctx.set_row_offset(self.inline_start_row);
            Size::new(width, self.config.inline_height.min(height))
        } else {
            Size::new(width, height)
        };
        self.ctx.handle_resize(buffer_size);
        if let Some(root) = self.root {
            self.tree.mark_dirty(root);
        }
        reactive::mark_dirty();
        tracing::debug!(width, height, "terminal resized");
    }

    /// Returns true if anything needs repainting: a signal fired or
    /// the element tree was mutated.
    pub fn needs_render(&self) -> bool {
        reactive::is_dirty()
            || self
                .root
                .and_then(|r| self.tree.get(r))
                .is_some_and(|el| el.dirty)
    }

    /// Run one layout + paint + flush cycle against the device.
    pub fn render_once(&mut self, device: &mut dyn TerminalDevice) -> Result<()> {
        let _ = reactive::take_dirty();
        self.drain_focusables();
        let Some(root) = self.root else {
            return Ok(());
        };
        let size = self.ctx.size();
        layout::calculate(&mut self.tree, root, size.width, size.height);
        self.ctx.begin_frame();
        painter::paint_tree(&self.tree, root, self.ctx.back_mut());
        self.ctx.flush(device)?;
        Ok(())
    }

    /// Scroll `text` into the region above an inline widget without
    /// disturbing the widget frame. No-op in full-screen mode or when
    /// the widget covers the whole terminal.
    pub fn print_above(&mut self, device: &mut dyn TerminalDevice, text: &str) -> Result<()> {
        if self.config.inline_height == 0 || self.inline_start_row == 0 {
            return Ok(());
        }
        let region_bottom = self.inline_start_row; // 1-based row count above the widget
        let mut out = String::new();
        out.push_str("\x1b7"); // save cursor
        out.push_str(&format!("\x1b[1;{region_bottom}r")); // scroll region above the widget
        out.push_str(&format!("\x1b[{region_bottom};1H"));
        for line in text.lines() {
            out.push_str("\r\n"); // scroll the region up one row
            out.push_str(line);
        }
        out.push_str("\x1b[r"); // reset scroll region
        out.push_str("\x1b8"); // restore cursor
        device.write(out.as_bytes())?;
        device.flush()?;
        Ok(())
    }

    /// Run the frame-paced main loop until stopped.
    ///
    /// Acquires the terminal (raw mode, alternate screen or inline
    /// strip, cursor, mouse), spawns the input worker, and drives the
    /// frame cycle. The terminal is restored on every exit path:
    /// normal return, error, panic unwind, or SIGINT.
    #[cfg(unix)]
    pub fn run(&mut self, device: &mut dyn TerminalDevice) -> Result<()> {
        crate::reactive::signal::pin_main_thread();

        let mut session = TerminalSession::acquire(
            device,
            SessionOptions {
                alt_screen: self.config.inline_height == 0,
                hide_cursor: !self.config.cursor_visible,
                mouse: self.config.mouse_enabled,
            },
        )?;

        if self.config.inline_height > 0
            && let Err(e) = self.setup_inline(device)
        {
            session.release(device);
            return Err(e);
        }

        let reader = match EventReader::new() {
            Ok(r) => r,
            Err(e) => {
                session.release(device);
                return Err(WeftError::Terminal(format!("input reader: {e}")));
            }
        };
        let interrupter = reader.interrupter();
        signal::install_sigint(interrupter.raw_fd());
        self.interrupter = Some(interrupter.clone());
        self.register_running();
        self.spawn_input_worker(reader);

        reactive::mark_dirty();
        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            self.run_loop(&mut *device)
        }));

        self.stop();
        self.join_workers();
        self.unregister_running();
        session.release(device);

        match result {
            Ok(outcome) => outcome,
            Err(panic) => std::panic::resume_unwind(panic),
        }
    }

    #[cfg(unix)]
    fn run_loop(&mut self, device: &mut dyn TerminalDevice) -> Result<()> {
        let frame = Duration::from_micros(1_000_000 / u64::from(self.config.frame_rate));

        while !self.is_stopped() {
            if signal::stop_requested() {
                self.stop();
                break;
            }
            let frame_start = Instant::now();

            // Phase 1: drain queued work for up to half the frame.
            self.drain_tasks(frame_start + frame / 2);

            // Phase 2: render if anything changed.
            if self.needs_render() {
                self.render_once(device)?;
            }

            // Phase 3: sleep out the frame, still accepting tasks.
            let deadline = frame_start + frame;
            self.drain_tasks(deadline);
        }
        Ok(())
    }

    /// Execute queued tasks until the deadline passes or the queue
    /// stays empty, blocking at most until the deadline.
    fn drain_tasks(&mut self, deadline: Instant) {
        let Some(rx) = self.queue_rx.take() else {
            return;
        };
        loop {
            if self.is_stopped() {
                break;
            }
            let now = Instant::now();
            let Some(wait) = deadline.checked_duration_since(now).filter(|w| !w.is_zero())
            else {
                break;
            };
            match rx.recv_timeout(wait) {
                Ok(task) => task(self),
                Err(_) => break,
            }
        }
        self.queue_rx = Some(rx);
    }

    #[cfg(unix)]
    fn spawn_input_worker(&mut self, mut reader: EventReader) {
        let tx = self.queue_tx.clone();
        let stopped = Arc::clone(&self.stopped);
        let latency = self.config.input_latency;

        let handle = std::thread::spawn(move || {
            while !stopped.load(Ordering::SeqCst) {
                let Some(event) = reader.poll(latency) else {
                    continue;
                };
                let task: Task = Box::new(move |app: &mut App| app.process_event(event));
                if !send_task(&tx, &stopped, task) {
                    break;
                }
            }
            tracing::debug!("input worker exited");
        });
        self.workers.push(handle);
    }

    #[cfg(unix)]
    fn setup_inline(&mut self, device: &mut dyn TerminalDevice) -> Result<()> {
        let h = self.config.inline_height;
        let term = device.size()?;
        let h = h.min(term.height);
        // Reserve the bottom rows by scrolling, then step back up.
        let mut out = String::new();
        for _ in 0..h {
            out.push_str("\r\n");
        }
        out.push_str(&format!("\x1b[{h}A"));
        device.write(out.as_bytes())?;
        device.flush()?;
        self.inline_start_row = term.height.saturating_sub(h);
        self.ctx.set_row_offset(self.inline_start_row);
        Ok(())
    }

    fn register_running(&self) {
        let mut guard = RUNNING.lock().unwrap_or_else(PoisonError::into_inner);
        *guard = Some(StopHandle {
            stopped: Arc::clone(&self.stopped),
            #[cfg(unix)]
            interrupter: self.interrupter.clone(),
        });
    }

    fn unregister_running(&self) {
        let mut guard = RUNNING.lock().unwrap_or_else(PoisonError::into_inner);
        *guard = None;
    }

    pub(crate) fn join_workers(&mut self) {
        for handle in self.workers.drain(..) {
            let _ = handle.join();
        }
    }

    fn drain_focusables(&mut self) {
        let pending: Vec<ElementId> = self.pending_focusables.borrow_mut().drain(..).collect();
        for id in pending {
            self.focus.register(&mut self.tree, id);
        }
    }

    pub(crate) fn stopped_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.stopped)
    }
}

/// Push a task onto the bounded queue, racing against the stop flag
/// rather than blocking forever on a full queue.
pub(crate) fn send_task(
    tx: &SyncSender<Task>,
    stopped: &AtomicBool,
    mut task: Task,
) -> bool {
    loop {
        match tx.try_send(task) {
            Ok(()) => return true,
            Err(TrySendError::Full(back)) => {
                if stopped.load(Ordering::SeqCst) {
                    return false;
                }
                task = back;
                std::thread::sleep(Duration::from_millis(1));
            }
            Err(TrySendError::Disconnected(_)) => return false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::Element;
    use crate::layout::{LayoutStyle, Value};
    use crate::terminal::TestDevice;

    fn app_with_root(device: &TestDevice) -> (App, ElementId) {
        let mut app = match App::new(device, AppConfig::default()) {
            Ok(a) => a,
            Err(_) => unreachable!("test device construction cannot fail"),
        };
        let root = app.tree_mut().insert(Element::container());
        app.set_root(root);
        (app, root)
    }

    #[test]
    fn new_validates_config() {
        let device = TestDevice::new(80, 24);
        let bad = AppConfig {
            frame_rate: 0,
            ..AppConfig::default()
        };
        assert!(App::new(&device, bad).is_err());
    }

    #[test]
    fn render_once_paints_root() {
        let mut device = TestDevice::new(10, 3);
        let (mut app, root) = app_with_root(&device);
        let label = app.tree_mut().insert(Element::text("hi"));
        app.mount(root, label).ok();
        app.render_once(&mut device).ok();
        assert!(device.output_str().contains("hi"));
    }

    #[test]
    fn needs_render_tracks_dirty_state() {
        let mut device = TestDevice::new(10, 3);
        let (mut app, root) = app_with_root(&device);
        assert!(app.needs_render());
        app.render_once(&mut device).ok();
        // Layout cleared the root's dirty flag.
        assert!(app.tree().get(root).is_some_and(|el| !el.dirty));
        app.tree_mut().set_text(root, "changed");
        assert!(app.needs_render());
    }

    #[test]
    fn set_root_registers_existing_focusables() {
        let device = TestDevice::new(10, 3);
        let mut app = match App::new(&device, AppConfig::default()) {
            Ok(a) => a,
            Err(_) => unreachable!(),
        };
        let root = app.tree_mut().insert(Element::container());
        let button = app.tree_mut().insert(Element::container().focusable(true));
        app.tree_mut().add_child(root, button).ok();
        app.set_root(root);
        assert_eq!(app.focus().focused(), Some(button));
    }

    #[test]
    fn mount_registers_new_focusables() {
        let device = TestDevice::new(10, 3);
        let (mut app, root) = app_with_root(&device);
        let button = app.tree_mut().insert(Element::container().focusable(true));
        app.mount(root, button).ok();
        assert_eq!(app.focus().focused(), Some(button));
    }

    #[test]
    fn remove_unregisters_focusables() {
        let device = TestDevice::new(10, 3);
        let (mut app, root) = app_with_root(&device);
        let button = app.tree_mut().insert(Element::container().focusable(true));
        app.mount(root, button).ok();
        app.remove(button);
        assert!(app.focus().focused().is_none());
    }

    #[test]
    fn tab_navigates_focus() {
        let device = TestDevice::new(10, 3);
        let (mut app, root) = app_with_root(&device);
        let a = app.tree_mut().insert(Element::container().focusable(true));
        let b = app.tree_mut().insert(Element::container().focusable(true));
        app.mount(root, a).ok();
        app.mount(root, b).ok();
        assert_eq!(app.focus().focused(), Some(a));

        app.process_event(Event::Key(KeyEvent::plain(KeyCode::Tab)));
        assert_eq!(app.focus().focused(), Some(b));

        app.process_event(Event::Key(KeyEvent::new(
            KeyCode::Tab,
            crate::event::Modifiers::SHIFT,
        )));
        assert_eq!(app.focus().focused(), Some(a));
    }

    #[test]
    fn global_key_handler_consumes_first() {
        let device = TestDevice::new(10, 3);
        let (mut app, root) = app_with_root(&device);
        let a = app.tree_mut().insert(Element::container().focusable(true));
        let b = app.tree_mut().insert(Element::container().focusable(true));
        app.mount(root, a).ok();
        app.mount(root, b).ok();

        app.set_global_key_handler(|event| {
            matches!(
                event,
                Event::Key(KeyEvent {
                    code: KeyCode::Tab,
                    ..
                })
            )
        });
        // Tab is swallowed by the handler, so focus stays put.
        app.process_event(Event::Key(KeyEvent::plain(KeyCode::Tab)));
        assert_eq!(app.focus().focused(), Some(a));
    }

    #[test]
    fn click_focuses_and_fires_hook() {
        use std::sync::atomic::AtomicU32;

        let mut device = TestDevice::new(20, 6);
        let (mut app, root) = app_with_root(&device);
        let mut wide = LayoutStyle::default();
        wide.width = Value::Fixed(10);
        wide.height = Value::Fixed(3);
        let a = app
            .tree_mut()
            .insert(Element::container().focusable(true).layout(wide.clone()));
        let b = app
            .tree_mut()
            .insert(Element::container().focusable(true).layout(wide));
        app.mount(root, a).ok();
        app.mount(root, b).ok();
        app.render_once(&mut device).ok(); // computes layout

        let clicks = Arc::new(AtomicU32::new(0));
        let sink = Arc::clone(&clicks);
        app.tree_mut()
            .on_click(b, move || {
                sink.fetch_add(1, Ordering::SeqCst);
            });

        // Column layout: b occupies rows 3..6.
        app.process_event(Event::Mouse(MouseEvent {
            kind: MouseEventKind::Press(crate::event::MouseButton::Left),
            x: 2,
            y: 4,
            modifiers: crate::event::Modifiers::NONE,
        }));
        assert_eq!(app.focus().focused(), Some(b));
        assert_eq!(clicks.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn resize_forces_full_redraw_and_relayout() {
        let mut device = TestDevice::new(10, 3);
        let (mut app, root) = app_with_root(&device);
        app.render_once(&mut device).ok();
        device.clear_output();

        device.set_size(12, 4);
        app.process_event(Event::Resize(12, 4));
        assert!(app.needs_render());
        app.render_once(&mut device).ok();
        // Full repaint of the resized grid.
        assert!(!device.output().is_empty());
        assert_eq!(
            app.tree().get(root).map(|e| e.rect().width),
            Some(12)
        );
    }

    #[test]
    fn stop_is_idempotent() {
        let device = TestDevice::new(10, 3);
        let (mut app, _) = app_with_root(&device);
        assert!(!app.is_stopped());
        app.stop();
        app.stop();
        assert!(app.is_stopped());
    }

    #[test]
    fn package_stop_reaches_registered_app() {
        let device = TestDevice::new(10, 3);
        let (app, _) = app_with_root(&device);
        app.register_running();
        stop();
        assert!(app.is_stopped());
        app.unregister_running();
    }

    #[test]
    fn tasks_execute_on_drain() {
        let device = TestDevice::new(10, 3);
        let (mut app, root) = app_with_root(&device);
        let tx = app.task_sender();
        tx.send(Box::new(move |app: &mut App| {
            app.tree_mut().set_text(root, "from task");
        }))
        .ok();
        app.drain_tasks(Instant::now() + Duration::from_millis(50));
        assert_eq!(
            app.tree().get(root).and_then(|e| e.text_content()),
            Some("from task")
        );
    }

    #[test]
    fn send_task_gives_up_when_stopped_and_full() {
        let (tx, _rx) = sync_channel::<Task>(1);
        let stopped = AtomicBool::new(false);
        assert!(send_task(&tx, &stopped, Box::new(|_| {})));
        stopped.store(true, Ordering::SeqCst);
        // Queue is full and the app is stopping: give up.
        assert!(!send_task(&tx, &stopped, Box::new(|_| {})));
    }

    #[test]
    fn inline_mode_offsets_rows() {
        let mut device = TestDevice::new(20, 10);
        let config = AppConfig {
            inline_height: 3,
            ..AppConfig::default()
        };
        let mut app = match App::new(&device, config) {
            Ok(a) => a,
            Err(_) => unreachable!(),
        };
        let root = app.tree_mut().insert(Element::text("inline"));
        app.set_root(root);
        app.render_once(&mut device).ok();
        // Strip starts at terminal row 8 (1-based), 7 rows above it.
        assert!(device.output_str().contains("\x1b[8;1H"));
    }

    #[test]
    fn print_above_uses_scroll_region() {
        let mut device = TestDevice::new(20, 10);
        let config = AppConfig {
            inline_height: 3,
            ..AppConfig::default()
        };
        let mut app = match App::new(&device, config) {
            Ok(a) => a,
            Err(_) => unreachable!(),
        };
        app.print_above(&mut device, "logged line").ok();
        let out = device.output_str();
        assert!(out.contains("\x1b7"));
        assert!(out.contains("\x1b[1;7r"));
        assert!(out.contains("logged line"));
        assert!(out.contains("\x1b[r"));
        assert!(out.contains("\x1b8"));
    }

    #[test]
    fn inline_mouse_above_strip_is_ignored() {
        let mut device = TestDevice::new(20, 10);
        let config = AppConfig {
            inline_height: 3,
            ..AppConfig::default()
        };
        let mut app = match App::new(&device, config) {
            Ok(a) => a,
            Err(_) => unreachable!(),
        };
        let root = app
            .tree_mut()
            .insert(Element::container().focusable(true));
        app.set_root(root);
        app.render_once(&mut device).ok();

        // Terminal row 2 is scrollback, far above the strip at rows 7..10.
        app.process_event(Event::Mouse(MouseEvent {
            kind: MouseEventKind::Press(crate::event::MouseButton::Left),
            x: 0,
            y: 2,
            modifiers: crate::event::Modifiers::NONE,
        }));
        // Click inside the strip lands on the root.
        app.process_event(Event::Mouse(MouseEvent {
            kind: MouseEventKind::Press(crate::event::MouseButton::Left),
            x: 0,
            y: 8,
            modifiers: crate::event::Modifiers::NONE,
        }));
        assert_eq!(app.focus().focused(), Some(root));
    }
}
