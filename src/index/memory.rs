use std::collections::{HashMap, HashSet};

use super::{IndexError, IndexThread, MailIndex, SortOrder};

/// Index held entirely in memory, keyed by exact query string.
///
/// Threads are stored newest first. Unknown queries match nothing; queries
/// registered with [`MemoryIndex::fail`] return an error.
#[derive(Debug, Clone, Default)]
pub struct MemoryIndex {
    results: HashMap<String, Vec<IndexThread>>,
    failing: HashSet<String>,
}

impl MemoryIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, query: &str, threads: Vec<IndexThread>) {
        self.results.insert(query.to_string(), threads);
    }

    pub fn fail(&mut self, query: &str) {
        self.failing.insert(query.to_string());
    }
}

impl MailIndex for MemoryIndex {
    type Threads = std::iter::Take<std::vec::IntoIter<IndexThread>>;

    fn search_threads(
        &self,
        query: &str,
        sort: SortOrder,
        limit: usize,
    ) -> Result<Self::Threads, IndexError> {
        if self.failing.contains(query) {
            return Err(IndexError::Query(query.to_string()));
        }
        let mut threads = self.results.get(query).cloned().unwrap_or_default();
        if sort == SortOrder::OldestFirst {
            threads.reverse();
        }
        Ok(threads.into_iter().take(limit))
    }
}
