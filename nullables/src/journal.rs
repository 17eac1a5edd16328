//! Shared, ordered record of calls made to nullables.

use std::cell::RefCell;
use std::rc::Rc;

/// An append-only log of calls, shared between several nullables so a test
/// can assert on the order of operations across collaborators.
///
/// Clones share the same log.
#[derive(Clone, Debug, Default)]
pub struct Journal {
    entries: Rc<RefCell<Vec<String>>>,
}

impl Journal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&self, entry: impl Into<String>) {
        self.entries.borrow_mut().push(entry.into());
    }

    /// All entries, oldest first.
    pub fn entries(&self) -> Vec<String> {
        self.entries.borrow().clone()
    }

    /// Number of entries starting with `prefix`.
    pub fn count(&self, prefix: &str) -> usize {
        self.entries
            .borrow()
            .iter()
            .filter(|entry| entry.starts_with(prefix))
            .count()
    }

    /// Index of the first entry starting with `prefix`.
    pub fn position(&self, prefix: &str) -> Option<usize> {
        self.entries
            .borrow()
            .iter()
            .position(|entry| entry.starts_with(prefix))
    }

    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }
}
