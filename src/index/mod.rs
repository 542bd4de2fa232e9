//! Access to the external mail index.

mod memory;
mod notmuch;

pub use memory::MemoryIndex;
pub use notmuch::{Notmuch, NotmuchSettings};

use std::collections::HashMap;

#[derive(Debug, thiserror::Error)]
pub enum IndexError {
    #[error("failed to run {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },
    #[error("{command} exited with {code:?}: {stderr}")]
    Failed {
        command: String,
        code: Option<i32>,
        stderr: String,
    },
    #[error("unreadable index output: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("query rejected: {0}")]
    Query(String),
}

impl IndexError {
    /// Process exit code to report for this failure.
    pub fn exit_code(&self) -> i32 {
        match self {
            IndexError::Failed {
                code: Some(code), ..
            } if *code != 0 => *code,
            IndexError::Spawn { source, .. } => source.raw_os_error().unwrap_or(1),
            _ => 1,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    #[default]
    NewestFirst,
    OldestFirst,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct IndexMessage {
    pub id: Option<String>,
    /// Keyed by lowercased header name
    headers: HashMap<String, String>,
    pub timestamp: i64,
    pub tags: Vec<String>,
}

impl IndexMessage {
    pub fn new(id: Option<String>, timestamp: i64) -> Self {
        Self {
            id,
            timestamp,
            ..Default::default()
        }
    }

    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        self.set_header(name, value);
        self
    }

    pub fn with_tags<S: Into<String>>(mut self, tags: impl IntoIterator<Item = S>) -> Self {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }

    pub fn set_header(&mut self, name: &str, value: &str) {
        self.headers
            .insert(name.to_ascii_lowercase(), value.to_string());
    }

    /// Case-insensitive header lookup.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .get(&name.to_ascii_lowercase())
            .map(String::as_str)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexThread {
    pub id: String,
    /// Oldest first
    pub messages: Vec<IndexMessage>,
}

/// A searchable mail index.
///
/// Returned iterators are owned; dropping them releases whatever the
/// index held for the search.
pub trait MailIndex {
    type Threads: Iterator<Item = IndexThread>;

    /// Threads matching `query`, at most `limit` of them.
    fn search_threads(
        &self,
        query: &str,
        sort: SortOrder,
        limit: usize,
    ) -> Result<Self::Threads, IndexError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_lookup_ignores_case() {
        let m = IndexMessage::new(Some("a@b".into()), 1).with_header("From", "A <a@b>");
        assert_eq!(m.header("from"), Some("A <a@b>"));
        assert_eq!(m.header("FROM"), Some("A <a@b>"));
        assert_eq!(m.header("subject"), None);
    }

    #[test]
    fn exit_codes() {
        let failed = IndexError::Failed {
            command: "notmuch count".into(),
            code: Some(78),
            stderr: String::new(),
        };
        assert_eq!(failed.exit_code(), 78);
        let killed = IndexError::Failed {
            command: "notmuch count".into(),
            code: None,
            stderr: String::new(),
        };
        assert_eq!(killed.exit_code(), 1);
        assert_eq!(IndexError::Query("bad".into()).exit_code(), 1);
    }
}
