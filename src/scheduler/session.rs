//! Session queue and cursor.

/// Lifecycle of a training session.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionState {
    NotStarted,
    /// The cursor points at an item
    Active,
    /// The cursor has moved past the last item (or the queue is empty)
    Complete,
}

/// Ordered catalog positions for one session plus a cursor.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SessionQueue {
    items: Vec<usize>,
    cursor: usize,
    started: bool,
}

impl SessionQueue {
    /// A started queue with the cursor at the first item.
    pub fn start(items: Vec<usize>) -> Self {
        Self {
            items,
            cursor: 0,
            started: true,
        }
    }

    pub fn state(&self) -> SessionState {
        if !self.started {
            SessionState::NotStarted
        } else if self.cursor < self.items.len() {
            SessionState::Active
        } else {
            SessionState::Complete
        }
    }

    /// Catalog position under the cursor.
    pub fn current(&self) -> Option<usize> {
        self.items.get(self.cursor).copied()
    }

    /// Move to the next item; past the last item the session is complete.
    pub fn advance(&mut self) {
        self.cursor = (self.cursor + 1).min(self.items.len());
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn items(&self) -> &[usize] {
        &self.items
    }
}
