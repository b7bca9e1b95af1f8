//! Rendering for the line editor.
//!
//! Components:
//! - `writer`: terminal command recording (MoveTo, clears, style switches,
//!   batched prints) flushed to any `io::Write`.
//! - `video`: double-buffered cell grid; refresh emits only the changed span
//!   of each row and then swaps the grids.
//! - `menu`: completion menu state (selection with wraparound, page derived
//!   from selection) and its grid layout and drawing on a video band anchored
//!   below the input line.
//! - `line`: prompt + buffer + dimmed suggestion painter for the input line.
//! - `style`: cell attributes, color names and `colorize`.
//!
//! Rendering never mutates editor state; callers compose, then flush the
//! recorded commands to the terminal once per key event.

pub mod line;
pub mod menu;
pub mod style;
pub mod video;
pub mod writer;

pub use line::LinePainter;
pub use menu::{CompletionMenu, DEFAULT_MAX_ROWS, MenuLayout, MenuView};
pub use style::{CellStyle, colorize, parse_color};
pub use video::{Anchor, RefreshStats, ScreenCell, VideoBuffer};
pub use writer::{Command, Writer};
