//! Tag stack
//!
//! Open elements during a parse. The normalized name, the name as written
//! and the element's marker are pushed and popped together.

use serde::Serialize;
use smallvec::SmallVec;

use super::builder::Marker;

#[derive(Debug, Clone)]
pub struct TagStackEntry {
    pub name: String,
    pub original_name: String,
    pub marker: Marker,
}

/// Push/pop counters; a finished parse has equal counts
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TagStackStats {
    pub pushes: usize,
    pub pops: usize,
    pub max_depth: usize,
}

#[derive(Debug, Default)]
pub struct TagStack {
    entries: SmallVec<[TagStackEntry; 16]>,
    stats: TagStackStats,
}

impl TagStack {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, marker: Marker, name: String, original_name: String) {
        self.entries.push(TagStackEntry {
            name,
            original_name,
            marker,
        });
        self.stats.pushes += 1;
        self.stats.max_depth = self.stats.max_depth.max(self.entries.len());
    }

    /// Pop the innermost entry. Popping an empty stack is a caller bug.
    pub fn pop(&mut self) -> TagStackEntry {
        let entry = self.entries.pop().expect("pop from an empty tag stack");
        self.stats.pops += 1;
        entry
    }

    pub fn peek(&self) -> Option<&TagStackEntry> {
        self.entries.last()
    }

    /// Normalized name of the innermost open tag. Panics on an empty stack.
    pub fn peek_name(&self) -> &str {
        &self.peek().expect("peek at an empty tag stack").name
    }

    pub fn peek_original_name(&self) -> &str {
        &self.peek().expect("peek at an empty tag stack").original_name
    }

    pub fn peek_marker(&self) -> Marker {
        self.peek().expect("peek at an empty tag stack").marker
    }

    pub fn level(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Normalized names, outermost first
    pub fn names(&self) -> impl DoubleEndedIterator<Item = &str> + ExactSizeIterator {
        self.entries.iter().map(|entry| entry.name.as_str())
    }

    pub fn contains_name(&self, name: &str) -> bool {
        self.names().any(|n| n == name)
    }

    pub fn stats(&self) -> TagStackStats {
        self.stats
    }
}
