//! Cell attributes and inline text styling.
//!
//! [`CellStyle`] is the per-cell attribute stored in the video buffer.
//! [`colorize`] produces a self-contained styled string (escape sequences
//! plus a trailing reset) for the prompt.

use crossterm::{
    queue,
    style::{Attribute, Color, SetAttribute, SetForegroundColor, Stylize},
};
use std::io::{self, Write};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CellStyle {
    #[default]
    Plain,
    Bold,
    Dim,
    Reverse,
    Fg(Color),
}

impl CellStyle {
    /// Queue the attributes for this style. Assumes attributes were reset.
    pub fn queue<W: Write>(self, out: &mut W) -> io::Result<()> {
        match self {
            CellStyle::Plain => Ok(()),
            CellStyle::Bold => queue!(out, SetAttribute(Attribute::Bold)),
            CellStyle::Dim => queue!(out, SetAttribute(Attribute::Dim)),
            CellStyle::Reverse => queue!(out, SetAttribute(Attribute::Reverse)),
            CellStyle::Fg(c) => queue!(out, SetForegroundColor(c)),
        }
    }
}

/// Named color lookup (`"green"`, `"dark_blue"`, ...). Unknown names yield `None`.
pub fn parse_color(name: &str) -> Option<Color> {
    Color::try_from(name.trim()).ok()
}

pub fn colorize(text: &str, color: Color) -> String {
    text.with(color).to_string()
}
