//! Paginated completion menu: selection state, grid layout and drawing.
//!
//! [`CompletionMenu`] is pure state (items, selection, page). [`MenuView`]
//! owns the video buffer band below the input line and recomposes the current
//! page on every draw; the buffer diff keeps terminal output down to the cells
//! that actually changed (two items on a selection move within a page).

use crate::style::CellStyle;
use crate::video::{Anchor, RefreshStats, VideoBuffer};
use crate::writer::Writer;
use core_complete::{CompletionItem, CompletionKind};
use crossterm::style::Color;
use std::ops::Range;
use tracing::{debug, trace};
use unicode_width::UnicodeWidthStr;

pub const DEFAULT_MAX_ROWS: usize = 10;
/// Gap between menu columns.
const COLUMN_GAP: usize = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MenuLayout {
    pub columns: usize,
    pub rows: usize,
    pub col_width: usize,
    pub per_page: usize,
    pub pages: usize,
}

impl MenuLayout {
    pub fn new(columns: usize, rows: usize, col_width: usize, item_count: usize) -> Self {
        let columns = columns.max(1);
        let rows = rows.max(1);
        let per_page = columns * rows;
        Self {
            columns,
            rows,
            col_width,
            per_page,
            pages: item_count.div_ceil(per_page),
        }
    }

    /// Fit `items` into a `width`-column terminal with `avail_rows` rows free
    /// below the input line, capped at `max_rows`.
    pub fn compute(items: &[CompletionItem], width: u16, avail_rows: u16, max_rows: usize) -> Self {
        let max_w = items
            .iter()
            .map(|i| i.display.width())
            .max()
            .unwrap_or(0);
        let col_width = max_w + COLUMN_GAP;
        let columns = (width as usize / col_width).max(1);
        let rows = items
            .len()
            .div_ceil(columns)
            .min(max_rows)
            .min(avail_rows as usize);
        Self::new(columns, rows, col_width, items.len())
    }
}

#[derive(Debug, Clone)]
pub struct CompletionMenu {
    items: Vec<CompletionItem>,
    selected: usize,
    page: usize,
    layout: MenuLayout,
}

impl CompletionMenu {
    pub fn new(items: Vec<CompletionItem>, layout: MenuLayout) -> Self {
        Self {
            items,
            selected: 0,
            page: 0,
            layout,
        }
    }

    pub fn items(&self) -> &[CompletionItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn layout(&self) -> &MenuLayout {
        &self.layout
    }

    pub fn selected(&self) -> usize {
        self.selected
    }

    pub fn selected_item(&self) -> Option<&CompletionItem> {
        self.items.get(self.selected)
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn next_item(&mut self) {
        if self.items.is_empty() {
            return;
        }
        self.select((self.selected + 1) % self.items.len());
    }

    pub fn prev_item(&mut self) {
        if self.items.is_empty() {
            return;
        }
        let n = self.items.len();
        self.select((self.selected + n - 1) % n);
    }

    /// Select `index` (clamped) and re-derive the page from it.
    pub fn select(&mut self, index: usize) {
        if self.items.is_empty() {
            return;
        }
        self.selected = index.min(self.items.len() - 1);
        self.page = self.selected / self.layout.per_page;
    }

    /// Item indices shown on the current page.
    pub fn page_range(&self) -> Range<usize> {
        let start = (self.page * self.layout.per_page).min(self.items.len());
        let end = (start + self.layout.per_page).min(self.items.len());
        start..end
    }
}

pub fn kind_style(kind: CompletionKind) -> CellStyle {
    match kind {
        CompletionKind::Builtin => CellStyle::Fg(Color::Yellow),
        CompletionKind::Command => CellStyle::Fg(Color::Green),
        CompletionKind::Directory => CellStyle::Fg(Color::Blue),
        CompletionKind::File => CellStyle::Plain,
    }
}

/// On-screen band of the menu, addressed relative to the input line.
#[derive(Debug)]
pub struct MenuView {
    video: VideoBuffer,
    drawn_page: Option<usize>,
}

impl MenuView {
    /// Reserve `layout.rows` rows below the input line and save the line's
    /// position. Line feeds move straight down and scroll at the bottom row,
    /// so moving back up lands on the input line wherever it ended up.
    pub fn open(w: &mut Writer, layout: &MenuLayout, width: u16) -> Self {
        let rows = layout.rows.min(u16::MAX as usize) as u16;
        w.print("\n".repeat(rows as usize));
        w.move_up(rows);
        w.save_cursor();
        debug!(
            target: "render.menu",
            columns = layout.columns,
            rows = layout.rows,
            pages = layout.pages,
            "menu_open"
        );
        Self {
            video: VideoBuffer::anchored(width, rows, Anchor::BelowSavedCursor),
            drawn_page: None,
        }
    }

    /// Put the cursor back on the input line.
    pub fn return_to_line(&self, w: &mut Writer) {
        w.restore_cursor();
    }

    /// Recompose the current page and record the diff.
    pub fn draw(&mut self, menu: &CompletionMenu, w: &mut Writer) -> RefreshStats {
        let layout = menu.layout();
        self.video.clear_from_line(0);
        for (slot, idx) in menu.page_range().enumerate() {
            let item = &menu.items()[idx];
            let row = slot / layout.columns;
            let col = slot % layout.columns;
            let style = if idx == menu.selected() {
                CellStyle::Reverse
            } else {
                kind_style(item.kind)
            };
            self.video
                .move_cursor((col * layout.col_width) as u16, row as u16);
            self.video.write_string(&item.display, style);
        }
        if self.drawn_page != Some(menu.page()) {
            trace!(target: "render.menu", page = menu.page(), "page_drawn");
            self.drawn_page = Some(menu.page());
        }
        self.video.refresh_into(w)
    }

    /// Erase the menu band and return to the input line.
    pub fn close(&mut self, w: &mut Writer) {
        w.restore_cursor();
        w.move_down(1);
        w.move_to_column(0);
        w.clear_from_cursor_down();
        w.restore_cursor();
        debug!(target: "render.menu", "menu_close");
    }
}
