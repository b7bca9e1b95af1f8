//! Key → editing action table.
//!
//! Stateless: every binding is a single key event. Menu navigation keys are
//! intercepted by the controller before this table is consulted.

use core_events::{KeyCode, KeyEvent, KeyModifiers};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Insert(char),
    Accept,
    Backspace,
    /// Delete key: forward delete, never EOF.
    DeleteForward,
    /// Ctrl-D: forward delete, or EOF on an empty line.
    DeleteOrEof,
    MoveLeft,
    MoveRight,
    MoveHome,
    MoveEnd,
    WordLeft,
    WordRight,
    KillToEnd,
    KillLine,
    KillWordBackward,
    KillAlnumWordBackward,
    KillWordForward,
    Yank,
    YankPop,
    YankPopReverse,
    HistoryPrev,
    HistoryNext,
    Complete,
    CompletePrev,
    Transpose,
    Interrupt,
    ClearScreen,
    Cancel,
}

impl Action {
    /// Actions that move the cursor without touching the text.
    pub fn is_motion(self) -> bool {
        matches!(
            self,
            Action::MoveLeft
                | Action::MoveRight
                | Action::MoveHome
                | Action::MoveEnd
                | Action::WordLeft
                | Action::WordRight
        )
    }

    pub fn is_yank(self) -> bool {
        matches!(self, Action::Yank | Action::YankPop | Action::YankPopReverse)
    }
}

pub fn translate(key: &KeyEvent) -> Option<Action> {
    if let Some(c) = key.printable() {
        return Some(Action::Insert(c));
    }
    let ctrl = key.mods.contains(KeyModifiers::CTRL);
    let alt = key.mods.contains(KeyModifiers::ALT);
    let action = match key.code {
        KeyCode::Char(c) if ctrl => match c {
            'a' => Action::MoveHome,
            'b' => Action::MoveLeft,
            'c' => Action::Interrupt,
            'd' => Action::DeleteOrEof,
            'e' => Action::MoveEnd,
            'f' => Action::MoveRight,
            'g' => Action::Cancel,
            'h' => Action::Backspace,
            'k' => Action::KillToEnd,
            'l' => Action::ClearScreen,
            'n' => Action::HistoryNext,
            'p' => Action::HistoryPrev,
            't' => Action::Transpose,
            'u' => Action::KillLine,
            'w' => Action::KillWordBackward,
            'y' => Action::Yank,
            _ => return None,
        },
        KeyCode::Char(c) if alt => match c {
            'b' => Action::WordLeft,
            'f' => Action::WordRight,
            'd' => Action::KillWordForward,
            'y' => Action::YankPop,
            'Y' => Action::YankPopReverse,
            _ => return None,
        },
        KeyCode::Char(_) => return None,
        KeyCode::Backspace if alt => Action::KillAlnumWordBackward,
        KeyCode::Backspace => Action::Backspace,
        KeyCode::Enter => Action::Accept,
        KeyCode::Delete => Action::DeleteForward,
        KeyCode::Tab => Action::Complete,
        KeyCode::BackTab => Action::CompletePrev,
        KeyCode::Esc => Action::Cancel,
        KeyCode::Left if ctrl || alt => Action::WordLeft,
        KeyCode::Right if ctrl || alt => Action::WordRight,
        KeyCode::Left => Action::MoveLeft,
        KeyCode::Right => Action::MoveRight,
        KeyCode::Up => Action::HistoryPrev,
        KeyCode::Down => Action::HistoryNext,
        KeyCode::Home => Action::MoveHome,
        KeyCode::End => Action::MoveEnd,
    };
    Some(action)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn emacs_control_bindings() {
        let table = [
            ('a', Action::MoveHome),
            ('e', Action::MoveEnd),
            ('b', Action::MoveLeft),
            ('f', Action::MoveRight),
            ('k', Action::KillToEnd),
            ('u', Action::KillLine),
            ('w', Action::KillWordBackward),
            ('y', Action::Yank),
            ('p', Action::HistoryPrev),
            ('n', Action::HistoryNext),
            ('d', Action::DeleteOrEof),
        ];
        for (c, action) in table {
            assert_eq!(translate(&KeyEvent::ctrl(c)), Some(action), "C-{c}");
        }
    }

    #[test]
    fn alt_bindings_keep_case() {
        assert_eq!(translate(&KeyEvent::alt('y')), Some(Action::YankPop));
        assert_eq!(translate(&KeyEvent::alt('Y')), Some(Action::YankPopReverse));
        assert_eq!(translate(&KeyEvent::alt('d')), Some(Action::KillWordForward));
        assert_eq!(translate(&KeyEvent::alt('q')), None);
    }

    #[test]
    fn word_jump_arrows() {
        let ctrl_left = KeyEvent::new(KeyCode::Left, KeyModifiers::CTRL);
        let alt_right = KeyEvent::new(KeyCode::Right, KeyModifiers::ALT);
        assert_eq!(translate(&ctrl_left), Some(Action::WordLeft));
        assert_eq!(translate(&alt_right), Some(Action::WordRight));
        assert_eq!(
            translate(&KeyEvent::plain(KeyCode::Left)),
            Some(Action::MoveLeft)
        );
    }

    #[test]
    fn printable_and_special_keys() {
        assert_eq!(translate(&KeyEvent::char('x')), Some(Action::Insert('x')));
        assert_eq!(
            translate(&KeyEvent::new(KeyCode::Backspace, KeyModifiers::ALT)),
            Some(Action::KillAlnumWordBackward)
        );
        assert_eq!(
            translate(&KeyEvent::plain(KeyCode::Tab)),
            Some(Action::Complete)
        );
        assert_eq!(translate(&KeyEvent::ctrl('z')), None);
    }
}
