//! Result accumulation.
//!
//! Pages are merged into one list in arrival order. A title already in the
//! list is never added again, whether it repeats across pages or within one.

use std::collections::HashSet;

/// Ordered, de-duplicated titles accumulated across the pages of one
/// generation.
#[derive(Debug, Clone, Default)]
pub struct ResultSet {
    items: Vec<String>,
    seen: HashSet<String>,
}

impl ResultSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends the titles of `page` that are not already present, keeping
    /// their relative order. Returns how many were appended.
    pub fn merge<I>(&mut self, page: I) -> usize
    where
        I: IntoIterator<Item = String>,
    {
        let before = self.items.len();
        for title in page {
            if self.seen.insert(title.clone()) {
                self.items.push(title);
            }
        }
        self.items.len() - before
    }

    pub fn clear(&mut self) {
        self.items.clear();
        self.seen.clear();
    }

    pub fn items(&self) -> &[String] {
        &self.items
    }

    pub fn last(&self) -> Option<&str> {
        self.items.last().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn contains(&self, title: &str) -> bool {
        self.seen.contains(title)
    }
}
