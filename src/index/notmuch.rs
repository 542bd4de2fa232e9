use serde::Deserialize;
use std::collections::HashMap;
use std::process::Command;

use super::{IndexError, IndexMessage, IndexThread, MailIndex, SortOrder};

#[derive(Debug, Clone)]
pub struct NotmuchSettings {
    /// Program to run (default: "notmuch")
    pub binary: String,
    /// Passed as `--config=<path>` when set
    pub config: Option<String>,
}

impl Default for NotmuchSettings {
    fn default() -> Self {
        Self {
            binary: "notmuch".to_string(),
            config: None,
        }
    }
}

/// Read-only handle on a notmuch database, driven through the notmuch CLI.
#[derive(Debug, Clone)]
pub struct Notmuch {
    settings: NotmuchSettings,
}

#[derive(Debug, Deserialize)]
struct ShowMessage {
    id: Option<String>,
    #[serde(default)]
    timestamp: i64,
    #[serde(default)]
    tags: Vec<String>,
    #[serde(default)]
    headers: HashMap<String, String>,
}

/// `[message, [replies...]]` as printed by `notmuch show --format=json`.
#[derive(Debug, Deserialize)]
struct ShowNode(Option<ShowMessage>, Vec<ShowNode>);

impl Notmuch {
    /// Check that the database can be opened.
    pub fn open(settings: NotmuchSettings) -> Result<Self, IndexError> {
        let index = Self { settings };
        let count = index.run(&["count", "*"])?;
        tracing::info!(
            messages = String::from_utf8_lossy(&count).trim(),
            "opened notmuch database"
        );
        Ok(index)
    }

    fn command(&self) -> Command {
        let mut cmd = Command::new(&self.settings.binary);
        if let Some(config) = &self.settings.config {
            cmd.arg(format!("--config={}", shellexpand::tilde(config)));
        }
        cmd
    }

    fn run(&self, args: &[&str]) -> Result<Vec<u8>, IndexError> {
        let output = self
            .command()
            .args(args)
            .output()
            .map_err(|source| IndexError::Spawn {
                program: self.settings.binary.clone(),
                source,
            })?;

        if !output.status.success() {
            return Err(IndexError::Failed {
                command: format!("{} {}", self.settings.binary, args.join(" ")),
                code: output.status.code(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }
        Ok(output.stdout)
    }

    fn thread_ids(
        &self,
        query: &str,
        sort: SortOrder,
        limit: usize,
    ) -> Result<Vec<String>, IndexError> {
        let sort = match sort {
            SortOrder::NewestFirst => "--sort=newest-first",
            SortOrder::OldestFirst => "--sort=oldest-first",
        };
        let limit = format!("--limit={limit}");
        let stdout = self.run(&[
            "search",
            "--format=json",
            "--output=threads",
            sort,
            &limit,
            "--",
            query,
        ])?;
        Ok(serde_json::from_slice(&stdout)?)
    }

    /// Message tree of one thread, oldest message first.
    fn show_thread(&self, id: &str) -> Result<Vec<IndexMessage>, IndexError> {
        let query = format!("thread:{id}");
        let stdout = self.run(&[
            "show",
            "--format=json",
            "--body=false",
            "--entire-thread=true",
            "--",
            &query,
        ])?;
        let shown: Vec<Vec<ShowNode>> = serde_json::from_slice(&stdout)?;
        Ok(shown
            .into_iter()
            .next()
            .map(flatten_thread)
            .unwrap_or_default())
    }
}

impl MailIndex for Notmuch {
    type Threads = std::vec::IntoIter<IndexThread>;

    fn search_threads(
        &self,
        query: &str,
        sort: SortOrder,
        limit: usize,
    ) -> Result<Self::Threads, IndexError> {
        // show sorts by its own match set, so keep search's order and show
        // one thread at a time
        let threads = self
            .thread_ids(query, sort, limit)?
            .into_iter()
            .map(|id| {
                let messages = self.show_thread(&id)?;
                Ok(IndexThread { id, messages })
            })
            .collect::<Result<Vec<_>, IndexError>>()?;
        Ok(threads.into_iter())
    }
}

/// Depth-first walk of a shown thread, then oldest first.
fn flatten_thread(nodes: Vec<ShowNode>) -> Vec<IndexMessage> {
    let mut messages = Vec::new();
    let mut stack: Vec<ShowNode> = nodes.into_iter().rev().collect();
    while let Some(ShowNode(message, replies)) = stack.pop() {
        if let Some(m) = message {
            messages.push(into_index_message(m));
        }
        stack.extend(replies.into_iter().rev());
    }
    messages.sort_by_key(|m| m.timestamp);
    messages
}

fn into_index_message(m: ShowMessage) -> IndexMessage {
    let mut message = IndexMessage::new(m.id, m.timestamp).with_tags(m.tags);
    for (name, value) in &m.headers {
        message.set_header(name, value);
    }
    message
}
