//! Process-wide signal state.
//!
//! Two atomic cells, as the spec's data model requires: `pending_signal` and
//! `winsize_dirty`. Handlers only perform atomic stores — no allocation, no
//! locks, async-signal-safe by construction (the discipline the spec calls
//! out explicitly in §9 "Global signal state").

use std::sync::atomic::{AtomicU8, Ordering};

/// What `poll_signal` hands back to the editor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Signal {
    Interrupt,
    Terminate,
}

const NONE: u8 = 0;
const INTERRUPT: u8 = 1;
const TERMINATE: u8 = 2;

static PENDING_SIGNAL: AtomicU8 = AtomicU8::new(NONE);
static WINSIZE_DIRTY: AtomicU8 = AtomicU8::new(0);

/// Atomic swap-and-clear: returns the pending signal, if any, and resets the
/// cell to `none`.
pub fn poll_signal() -> Option<Signal> {
    match PENDING_SIGNAL.swap(NONE, Ordering::AcqRel) {
        INTERRUPT => Some(Signal::Interrupt),
        TERMINATE => Some(Signal::Terminate),
        _ => None,
    }
}

/// Atomic swap-and-clear for the window-size-changed flag.
pub fn poll_winsize_dirty() -> bool {
    WINSIZE_DIRTY.swap(0, Ordering::AcqRel) != 0
}

fn mark_interrupt() {
    PENDING_SIGNAL.store(INTERRUPT, Ordering::Release);
}

fn mark_terminate() {
    PENDING_SIGNAL.store(TERMINATE, Ordering::Release);
}

fn mark_winsize_dirty() {
    WINSIZE_DIRTY.store(1, Ordering::Release);
}

#[cfg(unix)]
mod unix {
    use super::{mark_interrupt, mark_terminate, mark_winsize_dirty};

    extern "C" fn on_int(_sig: libc::c_int) {
        mark_interrupt();
    }

    extern "C" fn on_term(_sig: libc::c_int) {
        mark_terminate();
    }

    extern "C" fn on_winch(_sig: libc::c_int) {
        mark_winsize_dirty();
    }

    /// Install SIGINT/SIGTERM (no restart) and SIGWINCH (restart) handlers.
    ///
    /// # Safety
    /// `sigaction` is called with a plain function pointer handler that only
    /// performs atomic stores, satisfying async-signal-safety.
    pub fn install() {
        unsafe {
            install_one(libc::SIGINT, on_int as usize, false);
            install_one(libc::SIGTERM, on_term as usize, false);
            install_one(libc::SIGWINCH, on_winch as usize, true);
        }
    }

    unsafe fn install_one(signum: libc::c_int, handler: usize, restart: bool) {
        let mut action: libc::sigaction = std::mem::zeroed();
        action.sa_sigaction = handler;
        libc::sigemptyset(&mut action.sa_mask);
        action.sa_flags = if restart { libc::SA_RESTART } else { 0 };
        libc::sigaction(signum, &action, std::ptr::null_mut());
    }
}

#[cfg(windows)]
mod windows {
    use super::{mark_interrupt, mark_terminate, mark_winsize_dirty};
    use windows_sys::Win32::Foundation::BOOL;
    use windows_sys::Win32::System::Console::{
        SetConsoleCtrlHandler, CTRL_BREAK_EVENT, CTRL_CLOSE_EVENT, CTRL_C_EVENT,
        CTRL_LOGOFF_EVENT, CTRL_SHUTDOWN_EVENT,
    };

    unsafe extern "system" fn handler(ctrl_type: u32) -> BOOL {
        match ctrl_type {
            CTRL_C_EVENT => mark_interrupt(),
            CTRL_BREAK_EVENT => mark_interrupt(),
            CTRL_CLOSE_EVENT | CTRL_LOGOFF_EVENT | CTRL_SHUTDOWN_EVENT => mark_terminate(),
            _ => return 0,
        }
        1
    }

    /// Windows has no SIGWINCH equivalent delivered this way; window-size
    /// changes are instead detected by comparing `window_size()` across
    /// polls (see `terminal::winsize`).
    pub fn install() {
        unsafe {
            SetConsoleCtrlHandler(Some(handler), 1);
        }
    }

    pub fn mark_winsize_dirty_external() {
        mark_winsize_dirty();
    }
}

/// Installs async-safe OS signal handlers that only write to the atomic
/// cells above.
pub fn install_signal_handlers() {
    #[cfg(unix)]
    unix::install();
    #[cfg(windows)]
    windows::install();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn poll_signal_clears_after_read() {
        PENDING_SIGNAL.store(INTERRUPT, Ordering::Release);
        assert_eq!(poll_signal(), Some(Signal::Interrupt));
        assert_eq!(poll_signal(), None);
    }

    #[test]
    fn poll_winsize_dirty_clears_after_read() {
        mark_winsize_dirty();
        assert!(poll_winsize_dirty());
        assert!(!poll_winsize_dirty());
    }
}
