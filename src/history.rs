use std::collections::VecDeque;

use image::RgbaImage;

/// Bounded undo/redo history of full working-buffer snapshots.
///
/// Entries sit in a deque with a cursor pointing at the snapshot that matches
/// the working buffer right now. Undo moves the cursor back, redo moves it
/// forward, and pushing while the cursor is not at the tail discards the redo
/// branch (standard linear-undo semantics). Past capacity the oldest entries
/// are evicted from the front.
#[derive(Debug)]
pub struct History {
    entries: VecDeque<RgbaImage>,
    cursor: usize,
    capacity: usize,
}

impl History {
    /// Empty history. The first `push` (the loader's initial snapshot)
    /// becomes entry #0.
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: VecDeque::new(),
            cursor: 0,
            capacity: capacity.max(1),
        }
    }

    /// Record a new snapshot and move the cursor onto it.
    pub fn push(&mut self, snapshot: RgbaImage) {
        // Anything ahead of the cursor is an abandoned redo branch.
        if !self.entries.is_empty() {
            self.entries.truncate(self.cursor + 1);
        }

        self.entries.push_back(snapshot);

        // Evict oldest entries once over capacity.
        while self.entries.len() > self.capacity {
            self.entries.pop_front();
        }

        self.cursor = self.entries.len() - 1;
    }

    /// Step the cursor back and return the snapshot to restore, or `None`
    /// when already at the oldest retained entry.
    pub fn undo(&mut self) -> Option<&RgbaImage> {
        if self.cursor == 0 {
            return None;
        }
        self.cursor -= 1;
        self.entries.get(self.cursor)
    }

    /// Step the cursor forward and return the snapshot to restore, or `None`
    /// when already at the newest entry.
    pub fn redo(&mut self) -> Option<&RgbaImage> {
        if self.cursor + 1 >= self.entries.len() {
            return None;
        }
        self.cursor += 1;
        self.entries.get(self.cursor)
    }

    /// The snapshot the cursor points at right now.
    pub fn current(&self) -> Option<&RgbaImage> {
        self.entries.get(self.cursor)
    }

    pub fn can_undo(&self) -> bool {
        self.cursor > 0
    }

    pub fn can_redo(&self) -> bool {
        self.cursor + 1 < self.entries.len()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Bytes held by the retained snapshots.
    pub fn memory_bytes(&self) -> usize {
        self.entries.iter().map(|e| e.as_raw().len()).sum()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.cursor = 0;
    }
}
