//! Unix signal plumbing.
//!
//! Handlers do only async-signal-safe work: store an atomic flag and
//! write a single byte to a self-pipe so a blocked `poll` wakes up.

use std::io;
use std::os::fd::RawFd;
use std::sync::Once;
use std::sync::atomic::{AtomicBool, AtomicI32, Ordering};

/// Write end of the SIGWINCH self-pipe.
static WINCH_PIPE: AtomicI32 = AtomicI32::new(-1);
/// Read end, handed to the event reader once.
static WINCH_PIPE_READ: AtomicI32 = AtomicI32::new(-1);
static WINCH_ONCE: Once = Once::new();

/// Set when SIGINT arrives; the run loop polls this.
static STOP_REQUESTED: AtomicBool = AtomicBool::new(false);
/// Pipe to poke so a blocked reader notices the stop request.
static SIGINT_WAKE: AtomicI32 = AtomicI32::new(-1);
static SIGINT_ONCE: Once = Once::new();

extern "C" fn on_winch(_sig: libc::c_int) {
    let fd = WINCH_PIPE.load(Ordering::Relaxed);
    if fd >= 0 {
        unsafe {
            let byte = 1u8;
            libc::write(fd, std::ptr::addr_of!(byte).cast(), 1);
        }
    }
}

extern "C" fn on_sigint(_sig: libc::c_int) {
    STOP_REQUESTED.store(true, Ordering::SeqCst);
    let fd = SIGINT_WAKE.load(Ordering::Relaxed);
    if fd >= 0 {
        unsafe {
            let byte = 1u8;
            libc::write(fd, std::ptr::addr_of!(byte).cast(), 1);
        }
    }
}

/// Create a non-blocking pipe pair.
pub(crate) fn pipe() -> io::Result<(RawFd, RawFd)> {
    let mut fds = [0 as libc::c_int; 2];
    let rc = unsafe { libc::pipe(fds.as_mut_ptr()) };
    if rc != 0 {
        return Err(io::Error::last_os_error());
    }
    for fd in fds {
        unsafe {
            let flags = libc::fcntl(fd, libc::F_GETFL);
            libc::fcntl(fd, libc::F_SETFL, flags | libc::O_NONBLOCK);
        }
    }
    Ok((fds[0], fds[1]))
}

fn install(signum: libc::c_int, handler: extern "C" fn(libc::c_int)) {
    unsafe {
        let mut action: libc::sigaction = std::mem::zeroed();
        action.sa_sigaction = handler as libc::sighandler_t;
        action.sa_flags = libc::SA_RESTART;
        libc::sigaction(signum, &action, std::ptr::null_mut());
    }
}

/// Install the SIGWINCH handler (once) and return the read end of the
/// pipe it signals. Returns `None` if pipe creation failed.
pub fn winch_pipe() -> Option<RawFd> {
    WINCH_ONCE.call_once(|| {
        if let Ok((read, write)) = pipe() {
            WINCH_PIPE.store(write, Ordering::SeqCst);
            WINCH_PIPE_READ.store(read, Ordering::SeqCst);
            install(libc::SIGWINCH, on_winch);
        }
    });
    let fd = WINCH_PIPE_READ.load(Ordering::SeqCst);
    if fd >= 0 { Some(fd) } else { None }
}

/// Install the SIGINT handler (once). `wake_fd` is poked on delivery so
/// a blocking poll returns promptly.
pub fn install_sigint(wake_fd: RawFd) {
    SIGINT_WAKE.store(wake_fd, Ordering::SeqCst);
    SIGINT_ONCE.call_once(|| {
        install(libc::SIGINT, on_sigint);
    });
}

/// Returns true once SIGINT has been delivered.
pub fn stop_requested() -> bool {
    STOP_REQUESTED.load(Ordering::SeqCst)
}

/// Test hook: clear the stop flag.
#[doc(hidden)]
pub fn reset_stop_requested() {
    STOP_REQUESTED.store(false, Ordering::SeqCst);
}
