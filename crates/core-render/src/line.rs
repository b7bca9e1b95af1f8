//! Edit-line painting: prompt, buffer text and the dimmed inline suggestion.

use crate::style::CellStyle;
use crate::writer::Writer;
use unicode_width::UnicodeWidthStr;

#[derive(Debug, Clone)]
pub struct LinePainter {
    /// Prompt as emitted, escape sequences included.
    prompt: String,
    prompt_width: u16,
}

impl LinePainter {
    /// `plain` is the prompt without styling and determines its width.
    pub fn new(styled: impl Into<String>, plain: &str) -> Self {
        Self {
            prompt: styled.into(),
            prompt_width: plain.width().min(u16::MAX as usize) as u16,
        }
    }

    pub fn prompt_width(&self) -> u16 {
        self.prompt_width
    }

    /// Screen column of char offset `cursor` in `text`.
    pub fn cursor_column(&self, text: &str, cursor: usize) -> u16 {
        let before: String = text.chars().take(cursor).collect();
        let w = self.prompt_width as usize + before.width();
        w.min(u16::MAX as usize) as u16
    }

    /// Repaint the whole line from column 0.
    pub fn full(&self, w: &mut Writer, text: &str, cursor: usize, hint: Option<&str>) {
        w.print("\r");
        w.print(&self.prompt);
        w.print(text);
        self.hint(w, hint);
        w.clear_until_newline();
        w.move_to_column(self.cursor_column(text, cursor));
    }

    /// Echo `appended` after the cursor sitting at the end of `text` (which
    /// already contains it), refreshing the suggestion that follows.
    pub fn append(&self, w: &mut Writer, text: &str, appended: &str, hint: Option<&str>) {
        w.print(appended);
        self.hint(w, hint);
        w.clear_until_newline();
        if hint.is_some_and(|h| !h.is_empty()) {
            w.move_to_column(self.cursor_column(text, text.chars().count()));
        }
    }

    fn hint(&self, w: &mut Writer, hint: Option<&str>) {
        if let Some(h) = hint.filter(|h| !h.is_empty()) {
            w.set_style(CellStyle::Dim);
            w.print(h);
            w.reset_style();
        }
    }
}
