/// Placeholder shown when a message has no usable date.
pub const UNKNOWN_DATE: &str = "??? ??";
/// Placeholder shown when a message has no subject.
pub const NO_SUBJECT: &str = "(no subject)";
/// Placeholder shown when a message has no From header.
pub const UNKNOWN_SENDER: &str = "?";

/// Fixed-capacity, contiguous collection.
///
/// Items fill slots from index 0 with no holes. `push` refuses items once
/// the capacity is reached. Storage grows with the items actually held, so a
/// large capacity costs nothing up front.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bounded<T> {
    items: Vec<T>,
    capacity: usize,
}

impl<T> Bounded<T> {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            items: Vec::new(),
            capacity,
        }
    }

    /// Append `item`, returning false (and dropping it) when full.
    pub fn push(&mut self, item: T) -> bool {
        if self.is_full() {
            return false;
        }
        self.items.push(item);
        true
    }

    /// Drop every item. Capacity is kept.
    pub fn clear(&mut self) {
        self.items.clear();
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.items.len() >= self.capacity
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn get(&self, index: usize) -> Option<&T> {
        self.items.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.items.iter()
    }

    pub fn as_slice(&self) -> &[T] {
        &self.items
    }
}

impl<'a, T> IntoIterator for &'a Bounded<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

/// A message with its display fields already derived.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Message {
    pub id: String,
    /// Abbreviated month and day, e.g. "Jan 05"
    pub date: String,
    pub from: String,
    pub subject: String,
    /// All tags joined by single spaces
    pub tags: String,
    // Threaded display (not populated yet)
    pub depth: usize,
    pub last_sibling: bool,
    pub has_children: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Thread {
    pub id: String,
    pub messages: Bounded<Message>,
    /// Collapsed/expanded display (not used yet)
    pub unfolded: bool,
}

impl Thread {
    pub fn new(id: String, max_messages: usize) -> Self {
        Self {
            id,
            messages: Bounded::with_capacity(max_messages),
            unfolded: false,
        }
    }

    pub fn message_count(&self) -> usize {
        self.messages.len()
    }
}

/// Threads from the last query, in index order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThreadTable {
    threads: Bounded<Thread>,
    max_messages: usize,
}

impl ThreadTable {
    pub fn new(max_threads: usize, max_messages: usize) -> Self {
        Self {
            threads: Bounded::with_capacity(max_threads),
            max_messages,
        }
    }

    pub fn clear(&mut self) {
        self.threads.clear();
    }

    pub fn push(&mut self, thread: Thread) -> bool {
        self.threads.push(thread)
    }

    pub fn is_full(&self) -> bool {
        self.threads.is_full()
    }

    pub fn thread_count(&self) -> usize {
        self.threads.len()
    }

    pub fn message_count(&self) -> usize {
        self.threads.iter().map(Thread::message_count).sum()
    }

    pub fn max_threads(&self) -> usize {
        self.threads.capacity()
    }

    pub fn max_messages(&self) -> usize {
        self.max_messages
    }

    pub fn threads(&self) -> &[Thread] {
        self.threads.as_slice()
    }

    pub fn get(&self, index: usize) -> Option<&Thread> {
        self.threads.get(index)
    }

    /// Row (0-based, below the status line) where thread `index` starts.
    pub fn first_row_of(&self, index: usize) -> usize {
        self.threads
            .iter()
            .take(index)
            .map(Thread::message_count)
            .sum()
    }
}
