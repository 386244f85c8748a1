//! Reassignment tracking for warnings.
//!
//! When a warning crosses a call or method boundary (for example, a value
//! carrying warnings is returned from a function), the boundary is recorded
//! as a `Reassignment`. A warning's reassignments form a history, most recent
//! first, that tools use to show how a warning travelled.
//!
//! The history is a persistent singly-linked list: prepending allocates one
//! node and shares the rest with the previous history, so reassigning a
//! record never copies or mutates the records it was derived from.

use std::fmt;
use std::sync::Arc;

/// Source position of a boundary crossing.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct SourceLocation {
    /// The source file path.
    pub file: String,
    /// The 1-based line number.
    pub line: u32,
    /// The 1-based column number.
    pub column: u32,
}

impl SourceLocation {
    pub fn new(file: impl Into<String>, line: u32, column: u32) -> Self {
        SourceLocation {
            file: file.into(),
            line,
            column,
        }
    }
}

impl fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.file, self.line, self.column)
    }
}

/// A single boundary crossing of a warning.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Reassignment {
    /// Name of the function or method whose boundary was crossed.
    ///
    /// Empty when the boundary has no name (top-level code).
    site_name: String,
    location: Option<SourceLocation>,
}

impl Reassignment {
    pub fn new(site_name: impl Into<String>, location: Option<SourceLocation>) -> Self {
        Reassignment {
            site_name: site_name.into(),
            location,
        }
    }

    #[inline]
    pub fn site_name(&self) -> &str {
        &self.site_name
    }

    #[inline]
    pub fn location(&self) -> Option<&SourceLocation> {
        self.location.as_ref()
    }

    #[inline]
    pub fn has_location(&self) -> bool {
        self.location.is_some()
    }
}

impl fmt::Display for Reassignment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.location {
            Some(location) => write!(f, "{} at {location}", self.site_name),
            None => write!(f, "{}", self.site_name),
        }
    }
}

struct HistoryNode {
    entry: Reassignment,
    next: Option<Arc<HistoryNode>>,
}

/// Prepend-only list of reassignments, most recent first.
///
/// Cloning is O(1) and shares every node.
#[derive(Clone, Default)]
pub struct ReassignmentHistory {
    head: Option<Arc<HistoryNode>>,
    len: usize,
}

impl ReassignmentHistory {
    /// Create an empty history.
    pub const fn new() -> Self {
        ReassignmentHistory { head: None, len: 0 }
    }

    /// Return a new history with `entry` in front of this one.
    #[must_use]
    pub fn prepend(&self, entry: Reassignment) -> Self {
        ReassignmentHistory {
            head: Some(Arc::new(HistoryNode {
                entry,
                next: self.head.clone(),
            })),
            len: self.len.saturating_add(1),
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// The most recent reassignment.
    pub fn latest(&self) -> Option<&Reassignment> {
        self.head.as_deref().map(|node| &node.entry)
    }

    /// Iterate from the most recent reassignment to the oldest.
    pub fn iter(&self) -> ReassignmentIter<'_> {
        ReassignmentIter {
            next: self.head.as_deref(),
            remaining: self.len,
        }
    }

    /// Collect the history into a vector, most recent first.
    pub fn to_vec(&self) -> Vec<Reassignment> {
        self.iter().cloned().collect()
    }
}

impl Drop for ReassignmentHistory {
    // Unlink uniquely owned nodes one at a time so long histories don't
    // recurse through `Arc` drops.
    fn drop(&mut self) {
        let mut next = self.head.take();
        while let Some(node) = next {
            match Arc::try_unwrap(node) {
                Ok(mut node) => next = node.next.take(),
                Err(_) => break,
            }
        }
    }
}

impl PartialEq for ReassignmentHistory {
    fn eq(&self, other: &Self) -> bool {
        self.len == other.len && self.iter().eq(other.iter())
    }
}

impl Eq for ReassignmentHistory {}

impl fmt::Debug for ReassignmentHistory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl<'a> IntoIterator for &'a ReassignmentHistory {
    type Item = &'a Reassignment;
    type IntoIter = ReassignmentIter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Iterator over a [`ReassignmentHistory`], most recent first.
#[derive(Clone)]
pub struct ReassignmentIter<'a> {
    next: Option<&'a HistoryNode>,
    remaining: usize,
}

impl<'a> Iterator for ReassignmentIter<'a> {
    type Item = &'a Reassignment;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.next?;
        self.next = node.next.as_deref();
        self.remaining = self.remaining.saturating_sub(1);
        Some(&node.entry)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl ExactSizeIterator for ReassignmentIter<'_> {}
