use std::collections::VecDeque;

use crate::frame::Frame;

/// Number of undo snapshots kept unless configured otherwise
pub const DEFAULT_HISTORY_DEPTH: usize = 50;

/// Bounds on the undo stack
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HistoryLimits {
    /// Maximum number of undo entries; the oldest is evicted first
    pub max_entries: usize,
    /// Optional cap on the summed encoded size of the undo entries. The most
    /// recent entry is always kept even if it alone exceeds the budget.
    pub max_bytes: Option<usize>,
}

impl Default for HistoryLimits {
    fn default() -> Self {
        Self {
            max_entries: DEFAULT_HISTORY_DEPTH,
            max_bytes: None,
        }
    }
}

/// Snapshot-based undo/redo.
///
/// Each entry is the full canvas as it was *before* an operation. Undo hands
/// back the newest entry and stores the caller's current frame on the redo
/// stack; redo is the mirror image. Any new undoable operation wipes redo.
#[derive(Debug, Default)]
pub struct History {
    undo_stack: VecDeque<Frame>,
    redo_stack: Vec<Frame>,
    limits: HistoryLimits,
}

impl History {
    pub fn new(limits: HistoryLimits) -> Self {
        Self {
            undo_stack: VecDeque::new(),
            redo_stack: Vec::new(),
            limits,
        }
    }

    /// Record the state before an operation. Clears redo.
    pub fn push_undo(&mut self, frame: Frame) {
        self.undo_stack.push_back(frame);
        self.redo_stack.clear();
        self.enforce_limits();
    }

    /// The frame [`History::undo`] would return
    pub fn peek_undo(&self) -> Option<&Frame> {
        self.undo_stack.back()
    }

    /// The frame [`History::redo`] would return
    pub fn peek_redo(&self) -> Option<&Frame> {
        self.redo_stack.last()
    }

    /// Step back. `current` is what the canvas shows right now; it becomes
    /// the redo target. Returns `None`, and keeps `current` out of the
    /// stacks, when there is nothing to undo.
    pub fn undo(&mut self, current: Frame) -> Option<Frame> {
        let previous = self.undo_stack.pop_back()?;
        self.redo_stack.push(current);
        Some(previous)
    }

    /// Step forward again after an undo
    pub fn redo(&mut self, current: Frame) -> Option<Frame> {
        let next = self.redo_stack.pop()?;
        self.undo_stack.push_back(current);
        self.enforce_limits();
        Some(next)
    }

    pub fn clear_redo(&mut self) {
        self.redo_stack.clear();
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    pub fn undo_len(&self) -> usize {
        self.undo_stack.len()
    }

    pub fn redo_len(&self) -> usize {
        self.redo_stack.len()
    }

    /// Encoded size of everything on the undo stack
    pub fn undo_bytes(&self) -> usize {
        self.undo_stack.iter().map(Frame::byte_len).sum()
    }

    fn enforce_limits(&mut self) {
        while self.undo_stack.len() > self.limits.max_entries {
            self.undo_stack.pop_front();
        }
        if let Some(budget) = self.limits.max_bytes {
            let mut total = self.undo_bytes();
            while total > budget && self.undo_stack.len() > 1 {
                if let Some(evicted) = self.undo_stack.pop_front() {
                    log::debug!("Evicting {} byte snapshot over history budget", evicted.byte_len());
                    total -= evicted.byte_len();
                }
            }
        }
    }
}
