//! Per-session editing state: the line being edited and the kill ring.
//!
//! Both types are plain data with no terminal or rendering knowledge; the
//! readline controller owns them and is the only mutator.

mod edit_buffer;
mod kill_ring;

pub use edit_buffer::EditBuffer;
pub use kill_ring::KillRing;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kill_then_yank_round_trip() {
        let mut buf = EditBuffer::from_text("echo hello world");
        buf.set_cursor(5);
        let mut ring = KillRing::new();
        let before = buf.text();
        let cursor_before = buf.cursor();
        let killed = buf.kill_word_forward();
        ring.add(killed.clone());
        let yanked = ring.yank().unwrap().to_string();
        buf.insert_str(&yanked);
        assert_eq!(buf.text(), before);
        assert_eq!(buf.cursor(), cursor_before + killed.chars().count());
    }
}
