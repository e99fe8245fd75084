#![forbid(unsafe_code)]

//! Tour state: position, visibility, and the mirrored completion marker.
//!
//! Pure bookkeeping. Storage, timers, and measurement are the controller's
//! job; every transition here is total and cannot fail.

/// Outcome of [`TourState::advance`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Advance {
    /// Moved forward one step.
    Moved { from: usize, to: usize },
    /// Was on the last step; the tour is now complete.
    Completed,
}

/// Mutable tour state owned by one mounted host view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TourState {
    current_index: usize,
    visible: bool,
    completed_persistently: bool,
}

impl TourState {
    /// Fresh state for a session whose stored marker reads `completed`.
    #[must_use]
    pub fn new(completed: bool) -> Self {
        Self {
            completed_persistently: completed,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn current_index(&self) -> usize {
        self.current_index
    }

    #[must_use]
    pub fn is_visible(&self) -> bool {
        self.visible
    }

    #[must_use]
    pub fn is_completed(&self) -> bool {
        self.completed_persistently
    }

    /// Show the tour from the first step.
    pub fn start(&mut self) {
        self.visible = true;
        self.current_index = 0;
    }

    /// Step forward, completing at the last index of a `len`-step catalog.
    pub fn advance(&mut self, len: usize) -> Advance {
        let last = len.saturating_sub(1);
        if self.current_index >= last {
            self.complete();
            return Advance::Completed;
        }
        let from = self.current_index;
        self.current_index += 1;
        Advance::Moved {
            from,
            to: self.current_index,
        }
    }

    /// Step back, floored at 0. Returns `(from, to)` when the index moved.
    pub fn retreat(&mut self) -> Option<(usize, usize)> {
        if self.current_index == 0 {
            return None;
        }
        let from = self.current_index;
        self.current_index -= 1;
        Some((from, self.current_index))
    }

    /// Jump to `index`, clamped to the catalog. Returns `(from, to)` when
    /// the index moved.
    pub fn jump_to(&mut self, index: usize, len: usize) -> Option<(usize, usize)> {
        let to = index.min(len.saturating_sub(1));
        if to == self.current_index {
            return None;
        }
        let from = self.current_index;
        self.current_index = to;
        Some((from, to))
    }

    /// Hide the tour and mark it completed.
    pub fn complete(&mut self) {
        self.visible = false;
        self.completed_persistently = true;
    }

    /// Clear completion and show the tour from the first step.
    pub fn restart(&mut self) {
        self.completed_persistently = false;
        self.start();
    }

    /// Mirror a marker value read from (or lost by) storage.
    pub fn set_completed(&mut self, completed: bool) {
        self.completed_persistently = completed;
    }
}
