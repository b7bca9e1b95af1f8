//! Terminal backend abstraction and crossterm implementation.
//!
//! The editor core talks to the terminal only through [`Terminal`]: one byte
//! at a time in, escape-sequence text out, plus the size query and the
//! raw-mode toggle. [`RawModeGuard`] scopes raw mode so every exit path of a
//! line edit restores the user's terminal.
//!
//! There is no cursor position query: its reply would arrive on the same
//! stream as the user's keys.

use core_input::ByteSource;
use crossterm::terminal;
use std::io::{self, Read, Write};
use std::ops::{Deref, DerefMut};
use tracing::{debug, warn};

pub mod capabilities;
mod memory;

pub use capabilities::TerminalCapabilities;
pub use memory::MemoryTerminal;

pub trait Terminal: ByteSource + Write {
    /// Terminal size as `(columns, rows)`.
    fn size(&self) -> io::Result<(u16, u16)>;
    fn enable_raw_mode(&mut self) -> io::Result<()>;
    fn disable_raw_mode(&mut self) -> io::Result<()>;
}

impl<T: Terminal + ?Sized> Terminal for &mut T {
    fn size(&self) -> io::Result<(u16, u16)> {
        (**self).size()
    }
    fn enable_raw_mode(&mut self) -> io::Result<()> {
        (**self).enable_raw_mode()
    }
    fn disable_raw_mode(&mut self) -> io::Result<()> {
        (**self).disable_raw_mode()
    }
}

/// Process terminal: stdin bytes in, stdout out, crossterm for mode and queries.
pub struct CrosstermTerminal {
    stdin: io::Stdin,
    stdout: io::Stdout,
    raw: bool,
}

impl Default for CrosstermTerminal {
    fn default() -> Self {
        Self::new()
    }
}

impl CrosstermTerminal {
    pub fn new() -> Self {
        Self {
            stdin: io::stdin(),
            stdout: io::stdout(),
            raw: false,
        }
    }
}

impl ByteSource for CrosstermTerminal {
    fn read_byte(&mut self) -> io::Result<u8> {
        let mut buf = [0u8; 1];
        loop {
            match self.stdin.read(&mut buf) {
                Ok(0) => return Err(io::ErrorKind::UnexpectedEof.into()),
                Ok(_) => return Ok(buf[0]),
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            }
        }
    }
}

impl Write for CrosstermTerminal {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.stdout.write(buf)
    }
    fn flush(&mut self) -> io::Result<()> {
        self.stdout.flush()
    }
}

impl Terminal for CrosstermTerminal {
    fn size(&self) -> io::Result<(u16, u16)> {
        terminal::size()
    }

    fn enable_raw_mode(&mut self) -> io::Result<()> {
        if !self.raw {
            terminal::enable_raw_mode()?;
            self.raw = true;
        }
        Ok(())
    }

    fn disable_raw_mode(&mut self) -> io::Result<()> {
        if self.raw {
            terminal::disable_raw_mode()?;
            self.raw = false;
        }
        Ok(())
    }
}

impl Drop for CrosstermTerminal {
    fn drop(&mut self) {
        let _ = self.disable_raw_mode();
    }
}

/// RAII guard holding the terminal in raw mode; restores cooked mode on drop,
/// including early returns and unwinding.
pub struct RawModeGuard<'a, T: Terminal + ?Sized> {
    term: &'a mut T,
}

impl<'a, T: Terminal + ?Sized> RawModeGuard<'a, T> {
    pub fn acquire(term: &'a mut T) -> io::Result<Self> {
        term.enable_raw_mode()?;
        debug!(target: "terminal", "raw_mode_enter");
        Ok(Self { term })
    }
}

impl<T: Terminal + ?Sized> Deref for RawModeGuard<'_, T> {
    type Target = T;
    fn deref(&self) -> &T {
        self.term
    }
}

impl<T: Terminal + ?Sized> DerefMut for RawModeGuard<'_, T> {
    fn deref_mut(&mut self) -> &mut T {
        self.term
    }
}

impl<T: Terminal + ?Sized> Drop for RawModeGuard<'_, T> {
    fn drop(&mut self) {
        let _ = self.term.flush();
        match self.term.disable_raw_mode() {
            Ok(()) => debug!(target: "terminal", "raw_mode_leave"),
            Err(e) => warn!(target: "terminal", ?e, "raw_mode_restore_failed"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn guard_restores_on_drop() {
        let mut term = MemoryTerminal::new(80, 24);
        {
            let guard = RawModeGuard::acquire(&mut term).unwrap();
            assert!(guard.is_raw());
        }
        assert!(!term.is_raw());
        assert_eq!(term.raw_transitions(), (1, 1));
    }

    #[test]
    fn guard_restores_on_error_path() {
        fn fails(term: &mut MemoryTerminal) -> io::Result<u8> {
            let mut guard = RawModeGuard::acquire(term)?;
            guard.read_byte()
        }
        let mut term = MemoryTerminal::new(80, 24);
        assert!(fails(&mut term).is_err());
        assert!(!term.is_raw());
    }
}
