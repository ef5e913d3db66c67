//! Bounded list of finished generation results, most recent first.

use serde::{Deserialize, Serialize};

use crate::models::GenerationResult;

pub const DEFAULT_HISTORY_CAPACITY: usize = 5;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct History {
    capacity: usize,
    entries: Vec<GenerationResult>,
}

impl Default for History {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_CAPACITY)
    }
}

impl History {
    /// A capacity of zero is raised to one.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            capacity,
            entries: Vec::with_capacity(capacity),
        }
    }

    /// Prepend a result, evicting the oldest entries beyond capacity.
    pub fn push_front(&mut self, result: GenerationResult) {
        self.entries.insert(0, result);
        self.entries.truncate(self.capacity);
    }

    pub fn latest(&self) -> Option<&GenerationResult> {
        self.entries.first()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, GenerationResult> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
