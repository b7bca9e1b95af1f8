//! Property tests for the video buffer diff: replaying the emitted commands on
//! a simulated screen must reproduce the composed frame, and recomposing the
//! same frame must emit nothing.

use core_render::{CellStyle, Command, ScreenCell, VideoBuffer, Writer};
use proptest::prelude::*;

const W: u16 = 6;
const H: u16 = 3;

type Frame = Vec<Vec<(char, u8)>>;

fn style_of(tag: u8) -> CellStyle {
    match tag {
        0 => CellStyle::Plain,
        1 => CellStyle::Reverse,
        _ => CellStyle::Dim,
    }
}

fn compose(v: &mut VideoBuffer, frame: &Frame) {
    v.clear_from_line(0);
    for (y, row) in frame.iter().enumerate() {
        v.move_cursor(0, y as u16);
        for &(ch, tag) in row {
            v.write_string(&ch.to_string(), style_of(tag));
        }
    }
}

fn snapshot(v: &VideoBuffer) -> Vec<ScreenCell> {
    (0..H)
        .flat_map(|y| (0..W).map(move |x| (x, y)))
        .map(|(x, y)| *v.cell(x, y).unwrap())
        .collect()
}

/// Minimal terminal model: absolute moves, prints, line clears, attributes.
struct Screen {
    cells: Vec<ScreenCell>,
    x: u16,
    y: u16,
    style: CellStyle,
}

impl Screen {
    fn garbage() -> Self {
        Self {
            cells: vec![
                ScreenCell {
                    ch: '?',
                    style: CellStyle::Bold
                };
                (W * H) as usize
            ],
            x: 0,
            y: 0,
            style: CellStyle::Plain,
        }
    }

    fn apply(&mut self, cmds: &[Command]) {
        for c in cmds {
            match c {
                Command::MoveTo(x, y) => {
                    self.x = *x;
                    self.y = *y;
                }
                Command::Print(s) => {
                    for ch in s.chars() {
                        if self.x < W && self.y < H {
                            self.cells[(self.y * W + self.x) as usize] = ScreenCell {
                                ch,
                                style: self.style,
                            };
                        }
                        self.x += 1;
                    }
                }
                Command::ClearUntilNewLine => {
                    for x in self.x..W {
                        self.cells[(self.y * W + x) as usize] = ScreenCell::BLANK;
                    }
                }
                Command::SetStyle(s) => self.style = *s,
                Command::ResetStyle => self.style = CellStyle::Plain,
                other => panic!("unexpected command {other:?}"),
            }
        }
    }
}

fn frame_strategy() -> impl Strategy<Value = Frame> {
    prop::collection::vec(
        prop::collection::vec((prop::sample::select(vec!['a', 'b', ' ']), 0u8..3), 0..8),
        0..4,
    )
}

proptest! {
    #[test]
    fn replayed_diff_reproduces_frame(frames in prop::collection::vec(frame_strategy(), 1..6)) {
        let mut v = VideoBuffer::new(W, H);
        let mut screen = Screen::garbage();
        for frame in &frames {
            compose(&mut v, frame);
            let expected = snapshot(&v);
            let mut w = Writer::new();
            v.refresh_into(&mut w);
            screen.apply(w.commands());
            prop_assert_eq!(&screen.cells, &expected);
            prop_assert_eq!(screen.style, CellStyle::Plain);
        }
    }

    #[test]
    fn recomposing_same_frame_is_silent(frame in frame_strategy()) {
        let mut v = VideoBuffer::new(W, H);
        compose(&mut v, &frame);
        v.refresh_into(&mut Writer::new());
        compose(&mut v, &frame);
        let mut w = Writer::new();
        let stats = v.refresh_into(&mut w);
        prop_assert_eq!(stats.rows_touched, 0);
        prop_assert!(w.is_empty());
    }
}
