//! Property tests for the edit buffer cursor invariant.

use core_state::EditBuffer;
use proptest::prelude::*;

#[derive(Debug, Clone)]
enum Op {
    Insert(char),
    Backspace,
    Delete,
    Left,
    Right,
    Home,
    End,
    WordLeft,
    WordRight,
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        prop::char::range('a', 'z').prop_map(Op::Insert),
        Just(Op::Insert(' ')),
        Just(Op::Insert('é')),
        Just(Op::Backspace),
        Just(Op::Delete),
        Just(Op::Left),
        Just(Op::Right),
        Just(Op::Home),
        Just(Op::End),
        Just(Op::WordLeft),
        Just(Op::WordRight),
    ]
}

proptest! {
    #[test]
    fn cursor_stays_in_bounds_and_len_tracks_edits(ops in prop::collection::vec(op(), 0..200)) {
        let mut b = EditBuffer::new();
        for o in ops {
            let len_before = b.len();
            match o.clone() {
                Op::Insert(c) => {
                    b.insert_char(c);
                    prop_assert_eq!(b.len(), len_before + 1);
                }
                Op::Backspace => {
                    let removed = b.delete_backward();
                    prop_assert_eq!(b.len(), len_before - usize::from(removed));
                }
                Op::Delete => {
                    let removed = b.delete_forward();
                    prop_assert_eq!(b.len(), len_before - usize::from(removed));
                }
                Op::Left => { b.move_left(); }
                Op::Right => { b.move_right(); }
                Op::Home => { b.move_home(); }
                Op::End => { b.move_end(); }
                Op::WordLeft => { b.word_left(); }
                Op::WordRight => { b.word_right(); }
            }
            if matches!(o, Op::Left | Op::Right | Op::Home | Op::End | Op::WordLeft | Op::WordRight) {
                prop_assert_eq!(b.len(), len_before);
            }
            prop_assert!(b.cursor() <= b.len());
        }
    }

    #[test]
    fn kill_then_yank_restores(text in "[a-z ]{0,30}", cursor in 0usize..31) {
        let mut b = EditBuffer::from_text(&text);
        b.set_cursor(cursor);
        let before = b.text();
        let at = b.cursor();
        let killed = b.kill_to_end();
        b.insert_str(&killed);
        prop_assert_eq!(b.text(), before);
        prop_assert_eq!(b.cursor(), at + killed.chars().count());
    }
}
