//! The line-editing loop.
//!
//! `Readline` owns the terminal and an `Editor` holding every piece of
//! session state. `read_line` puts the terminal in raw mode through a scoped
//! guard, then feeds decoded keys to the editor until a line is accepted,
//! Ctrl-D arrives on an empty line, or I/O fails. Each key's screen updates
//! are recorded into one `Writer` and flushed before the next read.

use crate::ReadlineError;
use crate::keymap::{self, Action};
use core_complete::Completer;
use core_config::Config;
use core_events::{KeyCode, KeyEvent, KeyModifiers};
use core_history::History;
use core_input::KeyDecoder;
use core_render::{
    CompletionMenu, DEFAULT_MAX_ROWS, LinePainter, MenuLayout, MenuView, Writer, colorize,
    parse_color,
};
use core_state::{EditBuffer, KillRing};
use core_terminal::{RawModeGuard, Terminal, TerminalCapabilities};
use crossterm::style::Color;
use std::io;
use tracing::{debug, trace};

#[derive(Debug, Clone)]
pub struct ReadlineOptions {
    pub prompt: String,
    pub prompt_color: Option<Color>,
    /// Inline history suggestions.
    pub suggestions: bool,
    pub menu_max_rows: usize,
    /// Reload history at the start of every line.
    pub share_history: bool,
}

impl Default for ReadlineOptions {
    fn default() -> Self {
        Self {
            prompt: "dsh> ".to_string(),
            prompt_color: Some(Color::Green),
            suggestions: true,
            menu_max_rows: DEFAULT_MAX_ROWS,
            share_history: false,
        }
    }
}

impl ReadlineOptions {
    pub fn from_config(cfg: &Config, caps: TerminalCapabilities) -> Self {
        let prompt = &cfg.file.prompt;
        Self {
            prompt: prompt.text.clone(),
            prompt_color: parse_color(&prompt.color).filter(|_| caps.supports_color),
            suggestions: cfg.file.suggestion.enabled,
            menu_max_rows: cfg.file.completion.max_rows.max(1),
            share_history: cfg.file.history.share,
        }
    }

    fn painter(&self) -> LinePainter {
        let styled = match self.prompt_color {
            Some(color) => colorize(&self.prompt, color),
            None => self.prompt.clone(),
        };
        LinePainter::new(styled, &self.prompt)
    }
}

pub struct Readline<T: Terminal> {
    term: T,
    editor: Editor,
}

impl<T: Terminal> Readline<T> {
    pub fn new(term: T, history: History, completer: Completer, options: ReadlineOptions) -> Self {
        Self {
            term,
            editor: Editor::new(history, completer, options),
        }
    }

    /// Read one line. Raw mode is held only for the duration of the call.
    pub fn read_line(&mut self) -> Result<String, ReadlineError> {
        let Self { term, editor } = self;
        let mut guard = RawModeGuard::acquire(term)?;
        editor.run(&mut *guard)
    }

    pub fn buffer(&self) -> &EditBuffer {
        &self.editor.buffer
    }

    pub fn kill_ring(&self) -> &KillRing {
        &self.editor.kill_ring
    }

    pub fn history(&self) -> &History {
        &self.editor.history
    }

    pub fn history_mut(&mut self) -> &mut History {
        &mut self.editor.history
    }

    pub fn is_menu_open(&self) -> bool {
        self.editor.menu.is_some()
    }

    pub fn terminal(&self) -> &T {
        &self.term
    }
}

enum Step {
    Continue,
    Done(String),
    Eof,
}

enum Redraw {
    None,
    /// Text appended at the end of the line.
    Append(String),
    Full,
}

/// Chronological browsing vs prefix-constrained search.
/// What an open menu did with a key.
enum MenuKey {
    Consumed,
    /// The menu closed; the key still needs normal processing.
    Pass(KeyEvent),
}

#[derive(Debug, Default)]
struct HistoryNav {
    browsing: bool,
    prefix: Option<String>,
}

struct MenuSession {
    menu: CompletionMenu,
    view: MenuView,
    token_start: usize,
    /// Token as it was when the menu opened, restored on cancel.
    original: String,
    applied: bool,
}

struct Editor {
    decoder: KeyDecoder,
    buffer: EditBuffer,
    kill_ring: KillRing,
    history: History,
    completer: Completer,
    painter: LinePainter,
    options: ReadlineOptions,
    nav: HistoryNav,
    suggestion: Option<String>,
    menu: Option<MenuSession>,
}

impl Editor {
    fn new(history: History, completer: Completer, options: ReadlineOptions) -> Self {
        Self {
            decoder: KeyDecoder::new(),
            buffer: EditBuffer::new(),
            kill_ring: KillRing::new(),
            history,
            completer,
            painter: options.painter(),
            options,
            nav: HistoryNav::default(),
            suggestion: None,
            menu: None,
        }
    }

    fn run<T: Terminal>(&mut self, term: &mut T) -> Result<String, ReadlineError> {
        self.begin_line();
        let mut w = Writer::new();
        self.painter.full(&mut w, "", 0, None);
        w.flush(term)?;
        loop {
            let key = self.decoder.next_key(term)?;
            trace!(target: "readline", key = %key, "key");
            let mut w = Writer::new();
            let step = self.handle_key(term, key, &mut w)?;
            w.flush(term)?;
            match step {
                Step::Continue => {}
                Step::Done(line) => {
                    debug!(target: "readline", len = line.chars().count(), "line_accepted");
                    return Ok(line);
                }
                Step::Eof => {
                    debug!(target: "readline", "eof");
                    return Err(ReadlineError::Eof);
                }
            }
        }
    }

    fn begin_line(&mut self) {
        self.buffer.clear();
        self.decoder.reset();
        self.kill_ring.reset_yank();
        self.nav = HistoryNav::default();
        self.suggestion = None;
        self.menu = None;
        if self.options.share_history {
            self.history.reload();
        }
        self.history.reset_position();
        debug!(target: "readline", history_len = self.history.len(), "line_start");
    }

    fn handle_key<T: Terminal>(&mut self, term: &mut T, key: KeyEvent, w: &mut Writer) -> io::Result<Step> {
        let key = match self.menu_key(key, w) {
            MenuKey::Consumed => return Ok(Step::Continue),
            MenuKey::Pass(key) => key,
        };
        let Some(action) = keymap::translate(&key) else {
            trace!(target: "readline", key = %key, "unbound");
            return Ok(Step::Continue);
        };
        if !action.is_yank() {
            self.kill_ring.reset_yank();
        }
        if !action.is_motion() && !matches!(action, Action::HistoryPrev | Action::HistoryNext) {
            self.leave_history();
        }
        let redraw = match action {
            Action::Insert(c) => {
                let appended = self.buffer.at_end();
                self.buffer.insert_char(c);
                if appended {
                    Redraw::Append(c.to_string())
                } else {
                    Redraw::Full
                }
            }
            Action::Accept => {
                self.buffer.move_end();
                let line = self.buffer.text();
                self.painter.full(w, &line, self.buffer.len(), None);
                w.print("\r\n");
                self.history.add(&line);
                return Ok(Step::Done(line));
            }
            Action::Backspace => changed(self.buffer.delete_backward()),
            Action::DeleteForward => changed(self.buffer.delete_forward()),
            Action::DeleteOrEof => {
                if self.buffer.is_empty() {
                    w.print("\r\n");
                    return Ok(Step::Eof);
                }
                changed(self.buffer.delete_forward())
            }
            Action::MoveLeft => changed(self.buffer.move_left()),
            Action::MoveRight => {
                if self.buffer.at_end() {
                    changed(self.accept_suggestion())
                } else {
                    changed(self.buffer.move_right())
                }
            }
            Action::MoveHome => changed(self.buffer.move_home()),
            Action::MoveEnd => changed(self.buffer.move_end()),
            Action::WordLeft => changed(self.buffer.word_left()),
            Action::WordRight => changed(self.buffer.word_right()),
            Action::KillToEnd => {
                let killed = self.buffer.kill_to_end();
                self.kill(killed)
            }
            Action::KillLine => {
                let killed = self.buffer.kill_line();
                self.kill(killed)
            }
            Action::KillWordBackward => {
                let killed = self.buffer.kill_word_backward();
                self.kill(killed)
            }
            Action::KillAlnumWordBackward => {
                let killed = self.buffer.kill_alnum_word_backward();
                self.kill(killed)
            }
            Action::KillWordForward => {
                let killed = self.buffer.kill_word_forward();
                self.kill(killed)
            }
            Action::Yank => self.yank(),
            Action::YankPop => self.yank_pop(1),
            Action::YankPopReverse => self.yank_pop(-1),
            Action::HistoryPrev => self.history_prev(),
            Action::HistoryNext => self.history_next(),
            Action::Complete => {
                if self.buffer.at_end() && self.suggestion.is_some() {
                    changed(self.accept_suggestion())
                } else {
                    self.complete(term, w)?
                }
            }
            Action::CompletePrev | Action::Cancel => Redraw::None,
            Action::Transpose => changed(self.buffer.transpose()),
            Action::Interrupt => {
                self.painter
                    .full(w, &self.buffer.text(), self.buffer.len(), None);
                w.print("^C\r\n");
                self.buffer.clear();
                debug!(target: "readline", "interrupt");
                Redraw::Full
            }
            Action::ClearScreen => {
                w.clear_all();
                Redraw::Full
            }
        };
        self.update_suggestion();
        match redraw {
            Redraw::None => {}
            Redraw::Append(text) => {
                self.painter
                    .append(w, &self.buffer.text(), &text, self.suggestion.as_deref());
            }
            Redraw::Full => self.repaint(w),
        }
        Ok(Step::Continue)
    }

    fn repaint(&self, w: &mut Writer) {
        let hint = if self.menu.is_none() {
            self.suggestion.as_deref()
        } else {
            None
        };
        self.painter
            .full(w, &self.buffer.text(), self.buffer.cursor(), hint);
    }

    fn update_suggestion(&mut self) {
        self.suggestion = if self.options.suggestions
            && self.menu.is_none()
            && self.buffer.at_end()
            && !self.buffer.is_empty()
        {
            self.history.suggestion(&self.buffer.text())
        } else {
            None
        };
    }

    fn accept_suggestion(&mut self) -> bool {
        match self.suggestion.take() {
            Some(rest) => {
                self.buffer.insert_str(&rest);
                true
            }
            None => false,
        }
    }

    fn leave_history(&mut self) {
        if self.nav.browsing || self.nav.prefix.is_some() {
            self.nav = HistoryNav::default();
            self.history.reset_position();
        }
    }

    fn kill(&mut self, killed: String) -> Redraw {
        if killed.is_empty() {
            return Redraw::None;
        }
        trace!(target: "readline", len = killed.chars().count(), "kill");
        self.kill_ring.add(killed);
        Redraw::Full
    }

    fn yank(&mut self) -> Redraw {
        let Some(text) = self.kill_ring.yank().map(str::to_string) else {
            return Redraw::None;
        };
        self.buffer.insert_str(&text);
        self.kill_ring.set_last_yank_len(text.chars().count());
        Redraw::Full
    }

    /// Replace the span inserted by the previous yank with the next ring entry.
    fn yank_pop(&mut self, direction: isize) -> Redraw {
        let last = self.kill_ring.last_yank_len();
        if last == 0 {
            return Redraw::None;
        }
        let Some(text) = self.kill_ring.cycle(direction).map(str::to_string) else {
            return Redraw::None;
        };
        let end = self.buffer.cursor();
        self.buffer.replace_range(end.saturating_sub(last), end, &text);
        self.kill_ring.set_last_yank_len(text.chars().count());
        Redraw::Full
    }

    fn history_prev(&mut self) -> Redraw {
        let entry = if self.nav.prefix.is_none() && (self.nav.browsing || self.buffer.is_empty()) {
            self.nav.browsing = true;
            self.history.previous().map(str::to_string)
        } else {
            let prefix = self
                .nav
                .prefix
                .get_or_insert_with(|| self.buffer.text())
                .clone();
            self.history
                .previous_with_prefix(&prefix)
                .map(str::to_string)
        };
        match entry {
            Some(e) => {
                self.buffer.set_text(&e);
                Redraw::Full
            }
            None => Redraw::None,
        }
    }

    fn history_next(&mut self) -> Redraw {
        if self.nav.browsing {
            match self.history.next_entry().map(str::to_string) {
                Some(e) => self.buffer.set_text(&e),
                None => {
                    self.buffer.clear();
                    self.nav.browsing = false;
                }
            }
            return Redraw::Full;
        }
        let Some(prefix) = self.nav.prefix.clone() else {
            return Redraw::None;
        };
        match self.history.next_with_prefix(&prefix).map(str::to_string) {
            Some(e) => self.buffer.set_text(&e),
            None => {
                // Back past the newest match: the typed prefix again.
                self.buffer.set_text(&prefix);
                self.nav.prefix = None;
            }
        }
        Redraw::Full
    }

    fn complete<T: Terminal>(&mut self, term: &mut T, w: &mut Writer) -> io::Result<Redraw> {
        let text = self.buffer.text();
        let completion = self.completer.complete(&text, self.buffer.cursor());
        if completion.is_empty() {
            return Ok(Redraw::None);
        }
        self.buffer.insert_str(&completion.suffix);
        if completion.is_unique() {
            return Ok(Redraw::Full);
        }

        let (width, height) = term.size()?;
        let max_rows = self.options.menu_max_rows;
        let layout = MenuLayout::compute(&completion.items, width, height.saturating_sub(1), max_rows);
        let mut view = MenuView::open(w, &layout, width);
        let original: String = self.buffer.chars()[completion.token_start..self.buffer.cursor()]
            .iter()
            .collect();
        let menu = CompletionMenu::new(completion.items, layout);
        view.draw(&menu, w);
        view.return_to_line(w);
        self.menu = Some(MenuSession {
            menu,
            view,
            token_start: completion.token_start,
            original,
            applied: false,
        });
        Ok(Redraw::Full)
    }

    /// Keys handled by an open menu. Esc followed quickly by a printable key
    /// decodes as Alt+key; when that has no binding of its own it is taken as
    /// Esc (restore and close) and the plain key is passed on.
    fn menu_key(&mut self, key: KeyEvent, w: &mut Writer) -> MenuKey {
        let Some(mut session) = self.menu.take() else {
            return MenuKey::Pass(key);
        };
        let plain = key.mods.is_empty() || key.mods == KeyModifiers::SHIFT;
        let escaped_char = match key.code {
            KeyCode::Char(c) if key.mods == KeyModifiers::ALT && keymap::translate(&key).is_none() => {
                Some(c)
            }
            _ => None,
        };
        let cancel = key.code == KeyCode::Esc || key.is_ctrl('g') || escaped_char.is_some();
        match key.code {
            KeyCode::Tab | KeyCode::Down if plain => {
                if session.applied {
                    session.menu.next_item();
                }
                self.apply_menu_item(session, w);
                MenuKey::Consumed
            }
            KeyCode::BackTab | KeyCode::Up if plain => {
                session.menu.prev_item();
                self.apply_menu_item(session, w);
                MenuKey::Consumed
            }
            KeyCode::Enter if plain => {
                self.close_menu(session, w);
                MenuKey::Consumed
            }
            _ if cancel => {
                let end = self.buffer.cursor();
                self.buffer
                    .replace_range(session.token_start, end, &session.original);
                self.close_menu(session, w);
                trace!(target: "readline", "menu_cancel");
                match escaped_char {
                    Some(c) => MenuKey::Pass(KeyEvent::char(c)),
                    None => MenuKey::Consumed,
                }
            }
            _ => {
                self.close_menu(session, w);
                MenuKey::Pass(key)
            }
        }
    }

    fn apply_menu_item(&mut self, mut session: MenuSession, w: &mut Writer) {
        if let Some(item) = session.menu.selected_item() {
            let end = self.buffer.cursor();
            self.buffer
                .replace_range(session.token_start, end, &item.text);
        }
        session.applied = true;
        trace!(target: "readline", selected = session.menu.selected(), "menu_apply");
        session.view.draw(&session.menu, w);
        session.view.return_to_line(w);
        self.menu = Some(session);
        self.repaint(w);
    }

    fn close_menu(&mut self, mut session: MenuSession, w: &mut Writer) {
        session.view.close(w);
        self.update_suggestion();
        self.repaint(w);
    }
}

fn changed(did: bool) -> Redraw {
    if did { Redraw::Full } else { Redraw::None }
}
