//! Terminal command writer.
//!
//! Renderers record primitive operations into a [`Writer`] and flush them to
//! any `io::Write` sink in one go. Consecutive plain prints are coalesced into
//! a single `Print` so a run of changed cells costs one command; any cursor
//! movement, clear or style switch closes the pending batch.
//!
//! Invariants:
//! * Commands keep their recording order; nothing is written before `flush`.
//! * `MoveTo` positions are absolute, zero based `(column, row)`; `MoveUp`
//!   and `MoveDown` are relative and never zero.
//! * `print_commands <= cells_printed` always holds.

use crate::style::CellStyle;
use crossterm::{
    cursor::{MoveDown, MoveTo, MoveToColumn, MoveUp, RestorePosition, SavePosition},
    queue,
    style::{Attribute, Print, SetAttribute},
    terminal::{Clear, ClearType},
};
use std::io::{self, Write};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    MoveTo(u16, u16),
    MoveToColumn(u16),
    MoveUp(u16),
    MoveDown(u16),
    /// Erase from the cursor to the end of the line.
    ClearUntilNewLine,
    /// Erase from the cursor to the bottom of the screen.
    ClearFromCursorDown,
    ClearAll,
    SaveCursor,
    RestoreCursor,
    SetStyle(CellStyle),
    ResetStyle,
    Print(String),
}

#[derive(Debug, Default)]
pub struct Writer {
    cmds: Vec<Command>,
    pending: String,
    pub print_commands: u64,
    pub cells_printed: u64,
}

impl Writer {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    fn flush_pending(&mut self) {
        if self.pending.is_empty() {
            return;
        }
        let s = std::mem::take(&mut self.pending);
        self.cmds.push(Command::Print(s));
        self.print_commands += 1;
    }

    fn push(&mut self, cmd: Command) {
        self.flush_pending();
        self.cmds.push(cmd);
    }

    pub fn move_to(&mut self, x: u16, y: u16) {
        self.push(Command::MoveTo(x, y));
    }

    pub fn move_to_column(&mut self, x: u16) {
        self.push(Command::MoveToColumn(x));
    }

    /// Rows up from the cursor; zero is a no-op.
    pub fn move_up(&mut self, rows: u16) {
        if rows > 0 {
            self.push(Command::MoveUp(rows));
        }
    }

    pub fn move_down(&mut self, rows: u16) {
        if rows > 0 {
            self.push(Command::MoveDown(rows));
        }
    }

    pub fn clear_until_newline(&mut self) {
        self.push(Command::ClearUntilNewLine);
    }

    pub fn clear_from_cursor_down(&mut self) {
        self.push(Command::ClearFromCursorDown);
    }

    pub fn clear_all(&mut self) {
        self.push(Command::ClearAll);
    }

    pub fn save_cursor(&mut self) {
        self.push(Command::SaveCursor);
    }

    pub fn restore_cursor(&mut self) {
        self.push(Command::RestoreCursor);
    }

    pub fn set_style(&mut self, style: CellStyle) {
        if style == CellStyle::Plain {
            self.push(Command::ResetStyle);
        } else {
            self.push(Command::SetStyle(style));
        }
    }

    pub fn reset_style(&mut self) {
        self.push(Command::ResetStyle);
    }

    /// Text without escape sequences is batched; anything carrying `ESC` is
    /// emitted as its own command.
    pub fn print<S: AsRef<str>>(&mut self, s: S) {
        let s = s.as_ref();
        if s.is_empty() {
            return;
        }
        if s.contains('\x1b') {
            self.flush_pending();
            self.cmds.push(Command::Print(s.to_string()));
            self.print_commands += 1;
            self.cells_printed += 1;
            return;
        }
        self.pending.push_str(s);
        self.cells_printed += s.chars().count() as u64;
    }

    pub fn is_empty(&self) -> bool {
        self.cmds.is_empty() && self.pending.is_empty()
    }

    /// Recorded commands, pending batch included.
    pub fn commands(&mut self) -> &[Command] {
        self.flush_pending();
        &self.cmds
    }

    /// Write everything to `out` and flush it. Returns
    /// `(print_commands, cells_printed)`.
    pub fn flush<W: Write>(mut self, out: &mut W) -> io::Result<(u64, u64)> {
        self.flush_pending();
        for c in self.cmds {
            match c {
                Command::MoveTo(x, y) => queue!(out, MoveTo(x, y))?,
                Command::MoveToColumn(x) => queue!(out, MoveToColumn(x))?,
                Command::MoveUp(n) => queue!(out, MoveUp(n))?,
                Command::MoveDown(n) => queue!(out, MoveDown(n))?,
                Command::ClearUntilNewLine => queue!(out, Clear(ClearType::UntilNewLine))?,
                Command::ClearFromCursorDown => queue!(out, Clear(ClearType::FromCursorDown))?,
                Command::ClearAll => queue!(out, Clear(ClearType::All), MoveTo(0, 0))?,
                Command::SaveCursor => queue!(out, SavePosition)?,
                Command::RestoreCursor => queue!(out, RestorePosition)?,
                Command::SetStyle(style) => {
                    queue!(out, SetAttribute(Attribute::Reset))?;
                    style.queue(out)?;
                }
                Command::ResetStyle => queue!(out, SetAttribute(Attribute::Reset))?,
                Command::Print(s) => queue!(out, Print(s))?,
            }
        }
        out.flush()?;
        Ok((self.print_commands, self.cells_printed))
    }
}
