//! Double-buffered screen model with minimal-diff refresh.
//!
//! Writes compose into the `new` grid; [`VideoBuffer::refresh`] compares it to
//! `old` row by row and emits only the span between the first and last
//! differing cell of each row, switching attributes only when they change.
//! After a refresh the grids swap roles, so the next frame must be composed
//! in full (start with [`VideoBuffer::clear_from_line`]`(0)`) before refreshing
//! again.
//!
//! A buffer may cover a band of the terminal rather than the whole screen;
//! its [`Anchor`] says where row 0 of the band sits, and all coordinates
//! passed in are relative to the band. Cells of a fresh buffer's
//! baseline are "unknown", so the first refresh paints everything composed.

use crate::style::CellStyle;
use crate::writer::Writer;
use std::io::{self, Write};
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScreenCell {
    pub ch: char,
    pub style: CellStyle,
}

impl ScreenCell {
    pub const BLANK: ScreenCell = ScreenCell {
        ch: ' ',
        style: CellStyle::Plain,
    };
    /// Baseline marker for cells whose on-screen content is not known.
    const UNKNOWN: ScreenCell = ScreenCell {
        ch: '\0',
        style: CellStyle::Plain,
    };

    fn is_blank(&self) -> bool {
        *self == Self::BLANK
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RefreshStats {
    pub rows_touched: usize,
    pub cells_emitted: usize,
}

/// Terminal placement of a buffer's first row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Anchor {
    /// Absolute terminal row.
    Row(u16),
    /// The row below the cursor position saved with `SaveCursor`. Rows are
    /// reached by restoring and moving down, so the absolute row never needs
    /// to be known.
    BelowSavedCursor,
}

#[derive(Debug)]
pub struct VideoBuffer {
    width: u16,
    height: u16,
    anchor: Anchor,
    new: Vec<ScreenCell>,
    old: Vec<ScreenCell>,
    x: u16,
    y: u16,
}

impl VideoBuffer {
    /// Full-screen buffer.
    pub fn new(width: u16, height: u16) -> Self {
        Self::region(width, height, 0)
    }

    /// Buffer covering `height` rows starting at terminal row `origin_row`.
    pub fn region(width: u16, height: u16, origin_row: u16) -> Self {
        Self::anchored(width, height, Anchor::Row(origin_row))
    }

    pub fn anchored(width: u16, height: u16, anchor: Anchor) -> Self {
        let len = width as usize * height as usize;
        Self {
            width,
            height,
            anchor,
            new: vec![ScreenCell::BLANK; len],
            old: vec![ScreenCell::UNKNOWN; len],
            x: 0,
            y: 0,
        }
    }

    pub fn width(&self) -> u16 {
        self.width
    }

    pub fn height(&self) -> u16 {
        self.height
    }

    pub fn anchor(&self) -> Anchor {
        self.anchor
    }

    pub fn cursor(&self) -> (u16, u16) {
        (self.x, self.y)
    }

    #[inline]
    fn index(&self, x: u16, y: u16) -> Option<usize> {
        (x < self.width && y < self.height).then(|| y as usize * self.width as usize + x as usize)
    }

    /// Cell of the frame being composed.
    pub fn cell(&self, x: u16, y: u16) -> Option<&ScreenCell> {
        self.index(x, y).map(|i| &self.new[i])
    }

    /// Composed text of row `y` with trailing blanks trimmed.
    pub fn row_text(&self, y: u16) -> String {
        if y >= self.height {
            return String::new();
        }
        let start = y as usize * self.width as usize;
        let row: String = self.new[start..start + self.width as usize]
            .iter()
            .map(|c| c.ch)
            .collect();
        row.trim_end().to_string()
    }

    pub fn move_cursor(&mut self, x: u16, y: u16) {
        self.x = x;
        self.y = y;
    }

    /// Write `text` at the virtual cursor. `\r` returns to column 0, `\n` starts
    /// the next row; cells beyond the grid are dropped.
    pub fn write_string(&mut self, text: &str, style: CellStyle) {
        for ch in text.chars() {
            match ch {
                '\r' => self.x = 0,
                '\n' => {
                    self.x = 0;
                    self.y = self.y.saturating_add(1);
                }
                _ => {
                    if let Some(i) = self.index(self.x, self.y) {
                        self.new[i] = ScreenCell { ch, style };
                    }
                    self.x = self.x.saturating_add(1);
                }
            }
        }
    }

    /// Blank every row from `row` down in the frame being composed.
    pub fn clear_from_line(&mut self, row: u16) {
        let start = (row.min(self.height) as usize) * self.width as usize;
        self.new[start..].fill(ScreenCell::BLANK);
    }

    /// Forget what the terminal shows (after a screen clear or resize).
    pub fn invalidate(&mut self) {
        self.old.fill(ScreenCell::UNKNOWN);
    }

    /// Record the diff between the composed frame and the baseline, then swap.
    pub fn refresh_into(&mut self, w: &mut Writer) -> RefreshStats {
        let width = self.width as usize;
        let mut stats = RefreshStats::default();
        for row in 0..self.height as usize {
            let span = row * width..(row + 1) * width;
            let new_row = &self.new[span.clone()];
            let old_row = &self.old[span];
            let Some(first) = (0..width).find(|&i| new_row[i] != old_row[i]) else {
                continue;
            };
            let last = (first..width)
                .rev()
                .find(|&i| new_row[i] != old_row[i])
                .unwrap_or(first);
            // Everything from `content_end` to the row's end is blank in the
            // new frame, so a single line clear can replace printing it.
            let content_end = new_row
                .iter()
                .rposition(|c| !c.is_blank())
                .map_or(0, |i| i + 1)
                .max(first);
            let print_end = if content_end <= last { content_end } else { last + 1 };

            stats.rows_touched += 1;
            self.goto(w, first as u16, row as u16);
            let mut active = CellStyle::Plain;
            for cell in &new_row[first..print_end] {
                if cell.style != active {
                    w.set_style(cell.style);
                    active = cell.style;
                }
                let mut buf = [0u8; 4];
                w.print(cell.ch.encode_utf8(&mut buf));
                stats.cells_emitted += 1;
            }
            if active != CellStyle::Plain {
                w.reset_style();
            }
            if print_end <= last {
                w.clear_until_newline();
            }
        }
        std::mem::swap(&mut self.new, &mut self.old);
        debug!(
            target: "render.video",
            rows = stats.rows_touched,
            cells = stats.cells_emitted,
            "refresh"
        );
        stats
    }

    fn goto(&self, w: &mut Writer, x: u16, y: u16) {
        match self.anchor {
            Anchor::Row(origin) => w.move_to(x, origin.saturating_add(y)),
            Anchor::BelowSavedCursor => {
                w.restore_cursor();
                w.move_down(y + 1);
                w.move_to_column(x);
            }
        }
    }

    /// Diff, write and flush to `out`.
    pub fn refresh<W: Write>(&mut self, out: &mut W) -> io::Result<RefreshStats> {
        let mut w = Writer::new();
        let stats = self.refresh_into(&mut w);
        w.flush(out)?;
        Ok(stats)
    }
}
