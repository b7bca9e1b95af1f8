use std::collections::VecDeque;
use tracing::trace;

/// Bounded ring of killed text, newest first.
///
/// `cycle` walks the ring from the last yanked entry with wraparound; the
/// caller records how many characters each yank inserted (`set_last_yank_len`)
/// so a following yank-pop can replace exactly that span. Every non-yank edit
/// must call `reset_yank`, otherwise a yank-pop could eat freshly typed text.
#[derive(Debug, Clone)]
pub struct KillRing {
    entries: VecDeque<String>,
    capacity: usize,
    index: usize,
    last_yank_len: usize,
}

impl Default for KillRing {
    fn default() -> Self {
        Self::new()
    }
}

impl KillRing {
    pub const MAX: usize = 10;

    pub fn new() -> Self {
        Self::with_capacity(Self::MAX)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity: capacity.max(1),
            index: 0,
            last_yank_len: 0,
        }
    }

    /// Push `text` as the newest entry. Empty text is ignored.
    pub fn add<S: Into<String>>(&mut self, text: S) {
        let text = text.into();
        if text.is_empty() {
            return;
        }
        let rotated = self.entries.len() == self.capacity;
        if rotated {
            self.entries.pop_back();
        }
        self.entries.push_front(text);
        self.index = 0;
        trace!(target: "state.kill_ring", len = self.entries.len(), rotated, "kill_ring_add");
    }

    /// Newest entry; the cycle position is reset to it.
    pub fn yank(&mut self) -> Option<&str> {
        self.index = 0;
        self.entries.front().map(String::as_str)
    }

    /// Move the cycle position by `direction` (positive = older) and return
    /// that entry. Needs at least two entries.
    pub fn cycle(&mut self, direction: isize) -> Option<&str> {
        let len = self.entries.len();
        if len < 2 {
            return None;
        }
        let len_i = len as isize;
        self.index = (self.index as isize + direction).rem_euclid(len_i) as usize;
        trace!(target: "state.kill_ring", index = self.index, len, "kill_ring_cycle");
        self.entries.get(self.index).map(String::as_str)
    }

    pub fn set_last_yank_len(&mut self, len: usize) {
        self.last_yank_len = len;
    }

    pub fn last_yank_len(&self) -> usize {
        self.last_yank_len
    }

    pub fn reset_yank(&mut self) {
        self.last_yank_len = 0;
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries newest first.
    pub fn entries(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(String::as_str)
    }
}
