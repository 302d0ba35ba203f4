//! Event reader — multiplexed, debounced terminal input.
//!
//! Waits on stdin, an interrupt self-pipe, and the SIGWINCH pipe with
//! `poll(2)`. Parsed events queue up internally; resize signals are
//! debounced so a drag-resize collapses into one event carrying the
//! final dimensions. Partial escape sequences and UTF-8 tails are held
//! in the parser's carry buffer between polls.

use std::collections::VecDeque;
use std::io;
use std::os::fd::RawFd;
use std::time::{Duration, Instant};

use crate::event::Event;
use crate::input::parser::Parser;
use crate::input::signal;

/// Quiet window a resize must survive before it is delivered.
const RESIZE_DEBOUNCE: Duration = Duration::from_millis(16);

/// Wakes a blocking [`EventReader::poll`] from another thread.
#[derive(Clone, Debug)]
pub struct Interrupter {
    fd: RawFd,
}

impl Interrupter {
    /// Write one byte to the interrupt pipe. Errors are ignored; a full
    /// pipe already guarantees a pending wake.
    pub fn interrupt(&self) {
        let byte = 1u8;
        unsafe {
            libc::write(self.fd, std::ptr::addr_of!(byte).cast(), 1);
        }
    }

    pub(crate) fn raw_fd(&self) -> RawFd {
        self.fd
    }
}

/// Multiplexing reader over terminal input and control pipes.
pub struct EventReader {
    stdin_fd: RawFd,
    interrupt_read: RawFd,
    interrupt_write: RawFd,
    resize_fd: Option<RawFd>,
    size_query: Box<dyn Fn() -> Option<(u16, u16)> + Send>,
    parser: Parser,
    queue: VecDeque<Event>,
    pending_resize: Option<(u16, u16, Instant)>,
}

impl EventReader {
    /// Create a reader over the process's stdin, with SIGWINCH-driven
    /// resize detection.
    pub fn new() -> io::Result<Self> {
        let resize_fd = signal::winch_pipe();
        Self::build(
            libc::STDIN_FILENO,
            resize_fd,
            Box::new(|| crossterm::terminal::size().ok()),
        )
    }

    /// Create a reader over an arbitrary descriptor (tests feed a pipe).
    /// The caller keeps ownership of `fd`.
    pub fn with_input_fd(
        fd: RawFd,
        size_query: impl Fn() -> Option<(u16, u16)> + Send + 'static,
    ) -> io::Result<Self> {
        Self::build(fd, None, Box::new(size_query))
    }

    fn build(
        stdin_fd: RawFd,
        resize_fd: Option<RawFd>,
        size_query: Box<dyn Fn() -> Option<(u16, u16)> + Send>,
    ) -> io::Result<Self> {
        let (interrupt_read, interrupt_write) = signal::pipe()?;
        Ok(Self {
            stdin_fd,
            interrupt_read,
            interrupt_write,
            resize_fd,
            size_query,
            parser: Parser::new(),
            queue: VecDeque::new(),
            pending_resize: None,
        })
    }

    /// A handle that wakes a blocking poll.
    pub fn interrupter(&self) -> Interrupter {
        Interrupter {
            fd: self.interrupt_write,
        }
    }

    /// Inject a resize notification, as the signal pipe would.
    /// Subject to the same debounce window.
    pub fn notify_resize(&mut self, width: u16, height: u16) {
        self.pending_resize = Some((width, height, Instant::now()));
    }

    /// Wait up to `timeout` for the next event.
    ///
    /// `Some(Duration::ZERO)` polls without blocking; `None` blocks
    /// until input, a resize, or an interrupt arrives. Returns `None`
    /// on timeout, interrupt, EINTR, or read error.
    pub fn poll(&mut self, timeout: Option<Duration>) -> Option<Event> {
        let deadline = timeout.map(|t| Instant::now() + t);

        loop {
            if let Some(event) = self.queue.pop_front() {
                return Some(event);
            }
            if let Some(event) = self.take_matured_resize() {
                return Some(event);
            }

            let now = Instant::now();
            let expired = deadline.is_some_and(|d| now >= d);
            // Even past the deadline, one zero-length poll round runs so
            // a non-blocking call still picks up already-available input.
            let mut wait: Option<Duration> = if expired {
                Some(Duration::ZERO)
            } else {
                deadline.map(|d| d.saturating_duration_since(now))
            };
            if !expired && let Some((_, _, since)) = self.pending_resize {
                let resize_wait = (since + RESIZE_DEBOUNCE).saturating_duration_since(now);
                wait = Some(match wait {
                    Some(w) => w.min(resize_wait),
                    None => resize_wait,
                });
            }

            match self.wait_readable(wait) {
                Wake::Timeout => {
                    if let Some(event) = self.take_matured_resize() {
                        return Some(event);
                    }
                    if deadline.is_some_and(|d| Instant::now() >= d) {
                        // An unmatured resize stays pending for the
                        // next poll.
                        return None;
                    }
                }
                Wake::Interrupted => return None,
                Wake::Error => return None,
                Wake::Input => {
                    if !self.read_input() {
                        return None;
                    }
                }
                Wake::Resize => {
                    self.drain_resize();
                    if expired {
                        return None;
                    }
                }
            }
        }
    }

    fn take_matured_resize(&mut self) -> Option<Event> {
        let (w, h, since) = self.pending_resize?;
        if Instant::now().saturating_duration_since(since) >= RESIZE_DEBOUNCE {
            self.pending_resize = None;
            tracing::debug!(width = w, height = h, "resize settled");
            Some(Event::Resize(w, h))
        } else {
            None
        }
    }

    fn wait_readable(&mut self, timeout: Option<Duration>) -> Wake {
        let mut fds = [
            libc::pollfd {
                fd: self.stdin_fd,
                events: libc::POLLIN,
                revents: 0,
            },
            libc::pollfd {
                fd: self.interrupt_read,
                events: libc::POLLIN,
                revents: 0,
            },
            libc::pollfd {
                fd: self.resize_fd.unwrap_or(-1),
                events: libc::POLLIN,
                revents: 0,
            },
        ];

        let timeout_ms: libc::c_int = match timeout {
            Some(t) => t.as_millis().min(i32::MAX as u128) as libc::c_int,
            None => -1,
        };

        let rc = unsafe { libc::poll(fds.as_mut_ptr(), fds.len() as libc::nfds_t, timeout_ms) };
        if rc < 0 {
            let err = io::Error::last_os_error();
            return if err.kind() == io::ErrorKind::Interrupted {
                Wake::Interrupted
            } else {
                Wake::Error
            };
        }
        if rc == 0 {
            return Wake::Timeout;
        }

        if fds[1].revents & libc::POLLIN != 0 {
            drain_fd(self.interrupt_read);
            return Wake::Interrupted;
        }
        if fds[2].revents & libc::POLLIN != 0 {
            return Wake::Resize;
        }
        if fds[0].revents & (libc::POLLIN | libc::POLLHUP) != 0 {
            return Wake::Input;
        }
        Wake::Timeout
    }

    /// Read available bytes and run them through the parser. Returns
    /// false when the input stream reported a hard error or EOF.
    fn read_input(&mut self) -> bool {
        let mut buf = [0u8; 4096];
        let n = unsafe { libc::read(self.stdin_fd, buf.as_mut_ptr().cast(), buf.len()) };
        if n <= 0 {
            return false;
        }
        let events = self.parser.advance(&buf[..n as usize]);
        self.queue.extend(events);
        true
    }

    fn drain_resize(&mut self) {
        if let Some(fd) = self.resize_fd {
            drain_fd(fd);
        }
        // Take the latest dimensions; each signal restarts the window.
        if let Some((w, h)) = (self.size_query)() {
            self.pending_resize = Some((w, h, Instant::now()));
        }
    }
}

enum Wake {
    Input,
    Resize,
    Interrupted,
    Timeout,
    Error,
}

fn drain_fd(fd: RawFd) {
    let mut buf = [0u8; 64];
    loop {
        let n = unsafe { libc::read(fd, buf.as_mut_ptr().cast(), buf.len()) };
        if n <= 0 {
            break;
        }
    }
}

impl Drop for EventReader {
    fn drop(&mut self) {
        // The input fd belongs to the caller (or is the real stdin);
        // only the interrupt pipe is ours.
        unsafe {
            libc::close(self.interrupt_read);
            libc::close(self.interrupt_write);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::{KeyCode, KeyEvent};

    fn reader_with_pipe() -> Option<(EventReader, RawFd)> {
        let (read, write) = signal::pipe().ok()?;
        let reader = EventReader::with_input_fd(read, || Some((80, 24))).ok()?;
        Some((reader, write))
    }

    fn feed(fd: RawFd, bytes: &[u8]) {
        unsafe {
            libc::write(fd, bytes.as_ptr().cast(), bytes.len());
        }
    }

    #[test]
    fn reads_key_from_fd() {
        let Some((mut reader, write)) = reader_with_pipe() else {
            return;
        };
        feed(write, b"x");
        let event = reader.poll(Some(Duration::from_millis(200)));
        assert_eq!(
            event,
            Some(Event::Key(KeyEvent::plain(KeyCode::Char('x'))))
        );
        unsafe { libc::close(write) };
    }

    #[test]
    fn times_out_with_no_input() {
        let Some((mut reader, write)) = reader_with_pipe() else {
            return;
        };
        let start = Instant::now();
        let event = reader.poll(Some(Duration::from_millis(30)));
        assert!(event.is_none());
        assert!(start.elapsed() >= Duration::from_millis(25));
        unsafe { libc::close(write) };
    }

    #[test]
    fn zero_timeout_is_nonblocking() {
        let Some((mut reader, write)) = reader_with_pipe() else {
            return;
        };
        let start = Instant::now();
        assert!(reader.poll(Some(Duration::ZERO)).is_none());
        assert!(start.elapsed() < Duration::from_millis(50));
        unsafe { libc::close(write) };
    }

    #[test]
    fn interrupt_wakes_blocking_poll() {
        let Some((mut reader, write)) = reader_with_pipe() else {
            return;
        };
        let interrupter = reader.interrupter();
        let handle = std::thread::spawn(move || {
            std::thread::sleep(Duration::from_millis(20));
            interrupter.interrupt();
        });
        let event = reader.poll(None);
        assert!(event.is_none());
        handle.join().ok();
        unsafe { libc::close(write) };
    }

    #[test]
    fn split_escape_sequence_across_polls() {
        let Some((mut reader, write)) = reader_with_pipe() else {
            return;
        };
        feed(write, b"\x1b[1;5");
        assert!(reader.poll(Some(Duration::from_millis(50))).is_none());
        feed(write, b"A");
        let event = reader.poll(Some(Duration::from_millis(200)));
        assert_eq!(
            event,
            Some(Event::Key(KeyEvent::new(
                KeyCode::Up,
                crate::event::Modifiers::CTRL
            )))
        );
        unsafe { libc::close(write) };
    }

    #[test]
    fn resize_is_debounced_to_latest() {
        let Some((mut reader, write)) = reader_with_pipe() else {
            return;
        };
        reader.notify_resize(100, 40);
        reader.notify_resize(120, 50);
        // Within the window nothing is delivered.
        assert!(reader.poll(Some(Duration::ZERO)).is_none());
        // After the window, the latest size arrives.
        let event = reader.poll(Some(Duration::from_millis(100)));
        assert_eq!(event, Some(Event::Resize(120, 50)));
        unsafe { libc::close(write) };
    }

    #[test]
    fn queued_events_are_fifo() {
        let Some((mut reader, write)) = reader_with_pipe() else {
            return;
        };
        feed(write, b"ab");
        let first = reader.poll(Some(Duration::from_millis(200)));
        let second = reader.poll(Some(Duration::ZERO));
        assert_eq!(first, Some(Event::Key(KeyEvent::plain(KeyCode::Char('a')))));
        assert_eq!(second, Some(Event::Key(KeyEvent::plain(KeyCode::Char('b')))));
        unsafe { libc::close(write) };
    }
}
