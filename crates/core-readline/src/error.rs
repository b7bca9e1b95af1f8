use std::io;
use thiserror::Error;

/// Ways a `read_line` call ends without a line.
#[derive(Debug, Error)]
pub enum ReadlineError {
    /// Ctrl-D on an empty line.
    #[error("end of input")]
    Eof,
    #[error("terminal I/O failed: {0}")]
    Io(#[from] io::Error),
}

impl ReadlineError {
    pub fn is_eof(&self) -> bool {
        matches!(self, ReadlineError::Eof)
    }
}
