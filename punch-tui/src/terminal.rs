//! Raw-mode terminal session, restored when dropped.

use crossterm::{
    cursor::Show,
    event::{KeyboardEnhancementFlags, PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags},
    execute, queue,
    terminal::{
        disable_raw_mode, enable_raw_mode, supports_keyboard_enhancement, EnterAlternateScreen,
        LeaveAlternateScreen, SetTitle,
    },
};
use std::io::{self, Write};

/// Holds the terminal in raw mode on the alternate screen.
///
/// Dropping the guard undoes every step that succeeded, including when setup
/// fails halfway or the loop unwinds from a panic.
#[derive(Debug)]
pub struct TerminalGuard {
    reports_release: bool,
}

impl TerminalGuard {
    pub fn enter(title: &str) -> io::Result<Self> {
        enable_raw_mode()?;
        let mut guard = Self {
            reports_release: false,
        };

        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen, SetTitle(title))?;
        if supports_keyboard_enhancement().unwrap_or(false) {
            execute!(
                stdout,
                PushKeyboardEnhancementFlags(KeyboardEnhancementFlags::REPORT_EVENT_TYPES)
            )?;
            guard.reports_release = true;
        }
        Ok(guard)
    }

    /// Whether key release events will be delivered.
    pub fn reports_release(&self) -> bool {
        self.reports_release
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        restore(&mut io::stdout(), self.reports_release);
    }
}

/// Best-effort teardown; every step runs even if an earlier one fails.
fn restore<W: Write>(out: &mut W, reports_release: bool) {
    if reports_release {
        let _ = queue!(out, PopKeyboardEnhancementFlags);
    }
    let _ = disable_raw_mode();
    let _ = queue!(out, LeaveAlternateScreen, Show);
    let _ = out.flush();
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Writer whose first `fail_writes` writes error out.
    struct Flaky {
        fail_writes: usize,
        written: Vec<u8>,
    }

    impl Write for Flaky {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            if self.fail_writes > 0 {
                self.fail_writes -= 1;
                return Err(io::Error::new(io::ErrorKind::BrokenPipe, "closed"));
            }
            self.written.extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    fn restored(fail_writes: usize, reports_release: bool) -> String {
        let mut out = Flaky {
            fail_writes,
            written: Vec::new(),
        };
        restore(&mut out, reports_release);
        String::from_utf8(out.written).unwrap()
    }

    #[test]
    fn leaves_alternate_screen_and_shows_cursor() {
        let written = restored(0, false);
        assert!(written.contains("\x1b[?1049l"));
        assert!(written.contains("\x1b[?25h"));
        assert!(!written.contains("\x1b[<1u"));
    }

    #[test]
    fn pops_keyboard_flags_when_pushed() {
        let written = restored(0, true);
        let pop = written.find("\x1b[<1u").unwrap();
        let leave = written.find("\x1b[?1049l").unwrap();
        assert!(pop < leave);
    }

    #[test]
    fn failed_pop_still_leaves_alternate_screen() {
        let written = restored(1, true);
        assert!(!written.contains("\x1b[<1u"));
        assert!(written.contains("\x1b[?1049l"));
    }
}
