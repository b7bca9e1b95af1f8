use crate::Terminal;
use core_input::ByteSource;
use std::collections::VecDeque;
use std::io::{self, Write};

/// Scripted terminal: queued input bytes, captured output, fixed geometry.
///
/// Used by tests and for driving the editor without a TTY. Reading past the
/// scripted input reports `UnexpectedEof`.
#[derive(Debug, Default)]
pub struct MemoryTerminal {
    input: VecDeque<u8>,
    output: Vec<u8>,
    width: u16,
    height: u16,
    raw: bool,
    raw_enters: usize,
    raw_leaves: usize,
}

impl MemoryTerminal {
    pub fn new(width: u16, height: u16) -> Self {
        Self {
            width,
            height,
            ..Self::default()
        }
    }

    pub fn with_input(mut self, bytes: &[u8]) -> Self {
        self.push_input(bytes);
        self
    }

    pub fn push_input(&mut self, bytes: &[u8]) {
        self.input.extend(bytes.iter().copied());
    }

    pub fn output(&self) -> &[u8] {
        &self.output
    }

    pub fn output_str(&self) -> String {
        String::from_utf8_lossy(&self.output).into_owned()
    }

    pub fn is_raw(&self) -> bool {
        self.raw
    }

    /// `(enters, leaves)` counts of raw-mode transitions.
    pub fn raw_transitions(&self) -> (usize, usize) {
        (self.raw_enters, self.raw_leaves)
    }
}

impl ByteSource for MemoryTerminal {
    fn read_byte(&mut self) -> io::Result<u8> {
        self.input
            .pop_front()
            .ok_or_else(|| io::ErrorKind::UnexpectedEof.into())
    }
}

impl Write for MemoryTerminal {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.output.extend_from_slice(buf);
        Ok(buf.len())
    }
    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl Terminal for MemoryTerminal {
    fn size(&self) -> io::Result<(u16, u16)> {
        Ok((self.width, self.height))
    }

    fn enable_raw_mode(&mut self) -> io::Result<()> {
        if !self.raw {
            self.raw = true;
            self.raw_enters += 1;
        }
        Ok(())
    }

    fn disable_raw_mode(&mut self) -> io::Result<()> {
        if self.raw {
            self.raw = false;
            self.raw_leaves += 1;
        }
        Ok(())
    }
}
