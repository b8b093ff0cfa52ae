//! L0: terminal substrate.
//!
//! Raw-mode toggle, window-size query, signal installer/watcher, and the
//! ANSI builder. Grounded on the teacher's `run_interactive_shell` (raw
//! termios + `cfmakeraw` + `VMIN`/`VTIME` on Unix) and `win_console.rs`
//! (`GetConsoleMode`/`SetConsoleMode` on Windows) — both already bypass any
//! higher-level terminal crate for exactly this reason.

pub mod ansi;
pub mod signal;

pub use ansi::AnsiBuilder;
pub use signal::{install_signal_handlers, poll_signal, poll_winsize_dirty, Signal};

use crate::error::{Result, ShellCoreError};

/// Owns the saved terminal attributes needed to make raw-mode toggling
/// idempotent and symmetric (spec.md §3 invariant: disabling without a
/// prior enable is a no-op and must not corrupt terminal state).
#[derive(Debug, Default)]
pub struct Terminal {
    #[cfg(unix)]
    saved_termios: Option<libc::termios>,
    #[cfg(windows)]
    saved_console_mode: Option<u32>,
    raw_enabled: bool,
}

impl Terminal {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether stdout is a terminal.
    pub fn is_tty(&self) -> bool {
        imp::is_tty()
    }

    /// Enable raw mode. Idempotent: a second call while already enabled is
    /// a no-op.
    pub fn enable_raw(&mut self) -> Result<()> {
        if self.raw_enabled {
            return Ok(());
        }
        if !self.is_tty() {
            return Err(ShellCoreError::TerminalNotAvailable);
        }
        imp::enable_raw(self)?;
        self.raw_enabled = true;
        Ok(())
    }

    /// Disable raw mode, restoring whatever attributes were saved by the
    /// matching `enable_raw`. A no-op if raw mode was never enabled.
    pub fn disable_raw(&mut self) -> Result<()> {
        if !self.raw_enabled {
            return Ok(());
        }
        imp::disable_raw(self)?;
        self.raw_enabled = false;
        Ok(())
    }

    pub fn is_raw(&self) -> bool {
        self.raw_enabled
    }

    /// `(rows, cols)` via the kernel-provided mechanism.
    pub fn window_size(&self) -> Result<(u16, u16)> {
        imp::window_size()
    }
}

impl Drop for Terminal {
    fn drop(&mut self) {
        // Best-effort: every exit path, including an unwind, must leave the
        // terminal in cooked mode.
        let _ = self.disable_raw();
    }
}

#[cfg(unix)]
mod imp {
    use super::Terminal;
    use crate::error::{Result, ShellCoreError};
    use crate::limits::RAW_READ_TIMEOUT_MS;

    pub fn is_tty() -> bool {
        unsafe { libc::isatty(libc::STDOUT_FILENO) != 0 }
    }

    pub fn enable_raw(term: &mut Terminal) -> Result<()> {
        unsafe {
            let mut original: libc::termios = std::mem::zeroed();
            if libc::tcgetattr(libc::STDIN_FILENO, &mut original) != 0 {
                return Err(ShellCoreError::IoctlFailed("tcgetattr".into()));
            }
            term.saved_termios = Some(original);

            let mut raw = original;
            libc::cfmakeraw(&mut raw);
            // VMIN=0: don't block for a minimum byte count.
            // VTIME in deciseconds: read() returns within ~RAW_READ_TIMEOUT_MS.
            raw.c_cc[libc::VMIN] = 0;
            raw.c_cc[libc::VTIME] = (RAW_READ_TIMEOUT_MS / 100).max(1) as libc::cc_t;
            raw.c_cflag |= libc::CS8;

            if libc::tcsetattr(libc::STDIN_FILENO, libc::TCSAFLUSH, &raw) != 0 {
                return Err(ShellCoreError::IoctlFailed("tcsetattr".into()));
            }
        }
        Ok(())
    }

    pub fn disable_raw(term: &mut Terminal) -> Result<()> {
        if let Some(original) = term.saved_termios.take() {
            unsafe {
                if libc::tcsetattr(libc::STDIN_FILENO, libc::TCSAFLUSH, &original) != 0 {
                    return Err(ShellCoreError::IoctlFailed("tcsetattr".into()));
                }
            }
        }
        Ok(())
    }

    pub fn window_size() -> Result<(u16, u16)> {
        unsafe {
            let mut ws: libc::winsize = std::mem::zeroed();
            if libc::ioctl(libc::STDOUT_FILENO, libc::TIOCGWINSZ, &mut ws) != 0 {
                return Err(ShellCoreError::IoctlFailed("TIOCGWINSZ".into()));
            }
            Ok((ws.ws_row, ws.ws_col))
        }
    }
}

#[cfg(windows)]
mod imp {
    use super::Terminal;
    use crate::error::{Result, ShellCoreError};
    use windows_sys::Win32::System::Console::{
        GetConsoleMode, GetConsoleScreenBufferInfo, GetStdHandle, SetConsoleMode,
        CONSOLE_SCREEN_BUFFER_INFO, ENABLE_ECHO_INPUT, ENABLE_LINE_INPUT,
        ENABLE_PROCESSED_INPUT, ENABLE_VIRTUAL_TERMINAL_INPUT,
        ENABLE_VIRTUAL_TERMINAL_PROCESSING, STD_INPUT_HANDLE, STD_OUTPUT_HANDLE,
    };

    pub fn is_tty() -> bool {
        unsafe {
            let h = GetStdHandle(STD_OUTPUT_HANDLE);
            let mut mode: u32 = 0;
            GetConsoleMode(h, &mut mode) != 0
        }
    }

    pub fn enable_raw(term: &mut Terminal) -> Result<()> {
        unsafe {
            let h_in = GetStdHandle(STD_INPUT_HANDLE);
            let mut mode: u32 = 0;
            if GetConsoleMode(h_in, &mut mode) == 0 {
                return Err(ShellCoreError::IoctlFailed("GetConsoleMode".into()));
            }
            term.saved_console_mode = Some(mode);

            let new_mode = (mode
                & !ENABLE_LINE_INPUT
                & !ENABLE_ECHO_INPUT
                & !ENABLE_PROCESSED_INPUT)
                | ENABLE_VIRTUAL_TERMINAL_INPUT;
            SetConsoleMode(h_in, new_mode);

            let h_out = GetStdHandle(STD_OUTPUT_HANDLE);
            let mut out_mode: u32 = 0;
            GetConsoleMode(h_out, &mut out_mode);
            SetConsoleMode(h_out, out_mode | ENABLE_VIRTUAL_TERMINAL_PROCESSING);
        }
        Ok(())
    }

    pub fn disable_raw(term: &mut Terminal) -> Result<()> {
        if let Some(mode) = term.saved_console_mode.take() {
            unsafe {
                let h_in = GetStdHandle(STD_INPUT_HANDLE);
                SetConsoleMode(h_in, mode);
            }
        }
        Ok(())
    }

    pub fn window_size() -> Result<(u16, u16)> {
        unsafe {
            let h = GetStdHandle(STD_OUTPUT_HANDLE);
            let mut info: CONSOLE_SCREEN_BUFFER_INFO = std::mem::zeroed();
            if GetConsoleScreenBufferInfo(h, &mut info) == 0 {
                return Err(ShellCoreError::IoctlFailed(
                    "GetConsoleScreenBufferInfo".into(),
                ));
            }
            let cols = (info.srWindow.Right - info.srWindow.Left + 1) as u16;
            let rows = (info.srWindow.Bottom - info.srWindow.Top + 1) as u16;
            Ok((rows, cols))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn disable_without_enable_is_noop() {
        let mut term = Terminal::new();
        assert!(!term.is_raw());
        assert!(term.disable_raw().is_ok());
        assert!(!term.is_raw());
    }
}
