use std::time::Instant;

use super::header::{format_date, join_tags, normalize_sender};
use super::types::{Message, NO_SUBJECT, Thread, ThreadTable};
use crate::index::{IndexMessage, MailIndex, SortOrder};

/// Totals reported after a query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct QueryCounts {
    pub threads: usize,
    pub messages: usize,
    /// Not computed yet, always 0
    pub unread: usize,
}

/// Replace the table's contents with the threads matching `query`.
///
/// The table is emptied first, so a failing query leaves it empty rather
/// than showing the previous mailbox. Index errors are logged and reported
/// as an empty result.
pub fn run_query<I: MailIndex>(
    index: &I,
    table: &mut ThreadTable,
    query: &str,
) -> QueryCounts {
    table.clear();
    let started = Instant::now();

    let limit = table.max_threads();
    let threads = match index.search_threads(query, SortOrder::NewestFirst, limit) {
        Ok(threads) => threads,
        Err(e) => {
            tracing::warn!(query, error = %e, "query failed, showing empty mailbox");
            return QueryCounts::default();
        }
    };

    for found in threads {
        if table.is_full() {
            break;
        }
        let mut thread = Thread::new(found.id, table.max_messages());
        for message in &found.messages {
            if !thread.messages.push(derive_message(message)) {
                break;
            }
        }
        // nothing to draw or select
        if thread.messages.is_empty() {
            tracing::debug!(thread = %thread.id, "skipping thread without messages");
            continue;
        }
        table.push(thread);
    }

    let counts = QueryCounts {
        threads: table.thread_count(),
        messages: table.message_count(),
        unread: 0,
    };
    tracing::debug!(
        query,
        threads = counts.threads,
        messages = counts.messages,
        elapsed_ms = started.elapsed().as_millis() as u64,
        "query finished"
    );
    counts
}

fn derive_message(m: &IndexMessage) -> Message {
    let subject = match m.header("subject") {
        Some(s) if !s.is_empty() => s.to_string(),
        _ => NO_SUBJECT.to_string(),
    };

    Message {
        id: m.id.clone().unwrap_or_default(),
        date: format_date(m.timestamp),
        from: normalize_sender(m.header("from")),
        subject,
        tags: join_tags(m.tags.iter().map(String::as_str)),
        depth: 0,
        last_sibling: false,
        has_children: false,
    }
}
