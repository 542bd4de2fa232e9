use crossterm::event::KeyCode;

use crate::config::{Config, KeyConfig, MailboxConfig};
use crate::index::MailIndex;
use crate::mail::{QueryCounts, ThreadTable, run_query};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Quit,
    MoveUp,
    MoveDown,
    NextMailbox,
    PrevMailbox,
    // Not implemented yet
    Back,
    Activate,
    Compose,
    Reply,
    Unfold,
}

impl KeyConfig {
    /// Action bound to `code`. Arrow keys always move the selection.
    pub fn action_for(&self, code: KeyCode) -> Option<Action> {
        let c = match code {
            KeyCode::Up => return Some(Action::MoveUp),
            KeyCode::Down => return Some(Action::MoveDown),
            KeyCode::Char(c) => c,
            _ => return None,
        };
        let bindings = [
            (self.quit, Action::Quit),
            (self.up, Action::MoveUp),
            (self.down, Action::MoveDown),
            (self.next_mailbox, Action::NextMailbox),
            (self.prev_mailbox, Action::PrevMailbox),
            (self.back, Action::Back),
            (self.action, Action::Activate),
            (self.compose, Action::Compose),
            (self.reply, Action::Reply),
            (self.unfold, Action::Unfold),
        ];
        bindings
            .into_iter()
            .find(|(key, _)| *key == c)
            .map(|(_, action)| action)
    }
}

/// Everything the renderer needs besides the thread table.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ViewState {
    /// Index into the configured mailboxes
    pub mailbox: usize,
    /// Selected thread
    pub selected: usize,
    pub width: u16,
    pub height: u16,
    pub counts: QueryCounts,
}

pub struct App<I: MailIndex> {
    pub config: Config,
    pub index: I,
    pub table: ThreadTable,
    pub view: ViewState,
    pub should_quit: bool,
}

impl<I: MailIndex> App<I> {
    /// Build the app and load the first mailbox.
    pub fn new(config: Config, index: I, width: u16, height: u16) -> Self {
        let config = config.normalized();
        let table = ThreadTable::new(
            config.limits.max_threads,
            config.limits.max_messages_per_thread,
        );
        let mut app = Self {
            config,
            index,
            table,
            view: ViewState {
                width,
                height,
                ..Default::default()
            },
            should_quit: false,
        };
        app.reload();
        app
    }

    pub fn mailbox(&self) -> &MailboxConfig {
        &self.config.mailboxes[self.view.mailbox]
    }

    pub fn mailbox_count(&self) -> usize {
        self.config.mailboxes.len()
    }

    /// Re-run the current mailbox's query and reset the selection.
    pub fn reload(&mut self) {
        let query = self.config.mailboxes[self.view.mailbox].query.clone();
        self.view.counts = run_query(&self.index, &mut self.table, &query);
        self.view.selected = 0;
    }

    pub fn handle_key(&mut self, code: KeyCode) {
        if let Some(action) = self.config.keys.action_for(code) {
            self.apply(action);
        }
    }

    pub fn apply(&mut self, action: Action) {
        match action {
            Action::Quit => self.should_quit = true,
            Action::MoveUp => self.previous(),
            Action::MoveDown => self.next(),
            Action::NextMailbox => self.next_mailbox(),
            Action::PrevMailbox => self.prev_mailbox(),
            Action::Back | Action::Activate | Action::Compose | Action::Reply | Action::Unfold => {
                tracing::debug!(?action, "key not implemented");
            }
        }
    }

    pub fn next(&mut self) {
        let count = self.table.thread_count();
        if count == 0 {
            return;
        }
        self.view.selected = (self.view.selected + 1).min(count - 1);
    }

    pub fn previous(&mut self) {
        self.view.selected = self.view.selected.saturating_sub(1);
    }

    pub fn next_mailbox(&mut self) {
        self.view.mailbox = (self.view.mailbox + 1) % self.mailbox_count();
        self.switch_mailbox();
    }

    pub fn prev_mailbox(&mut self) {
        let count = self.mailbox_count();
        self.view.mailbox = (self.view.mailbox + count - 1) % count;
        self.switch_mailbox();
    }

    fn switch_mailbox(&mut self) {
        tracing::debug!(mailbox = %self.mailbox().id, "switching mailbox");
        self.reload();
    }

    pub fn resize(&mut self, width: u16, height: u16) {
        self.view.width = width;
        self.view.height = height;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::{IndexMessage, IndexThread, MemoryIndex};

    fn single(id: &str, subject: &str) -> IndexThread {
        IndexThread {
            id: id.to_string(),
            messages: vec![
                IndexMessage::new(Some(format!("{id}@x")), 1_704_456_000)
                    .with_header("From", "\"Renée O'Brien\" <r@x.com>")
                    .with_header("Subject", subject)
                    .with_tags(["inbox"]),
            ],
        }
    }

    fn two_mailbox_app() -> App<MemoryIndex> {
        let mut index = MemoryIndex::new();
        index.insert(
            "tag:inbox",
            vec![single("t1", "one"), single("t2", "two"), single("t3", "three")],
        );
        let mut config = Config::default();
        config.mailboxes = vec![
            MailboxConfig {
                id: "inbox".into(),
                label: "INBOX".into(),
                query: "tag:inbox".into(),
            },
            MailboxConfig {
                id: "archive".into(),
                label: "ARCHIVE".into(),
                query: "tag:archive".into(),
            },
        ];
        App::new(config, index, 80, 24)
    }

    #[test]
    fn move_up_at_top_is_noop() {
        let mut app = two_mailbox_app();
        app.apply(Action::MoveUp);
        assert_eq!(app.view.selected, 0);
    }

    #[test]
    fn move_down_stops_at_last_thread() {
        let mut app = two_mailbox_app();
        for _ in 0..5 {
            app.apply(Action::MoveDown);
        }
        assert_eq!(app.view.selected, 2);
        app.apply(Action::MoveUp);
        assert_eq!(app.view.selected, 1);
    }

    #[test]
    fn navigation_on_empty_mailbox() {
        let mut app = two_mailbox_app();
        app.next_mailbox();
        app.apply(Action::MoveDown);
        assert_eq!(app.view.selected, 0);
        app.apply(Action::MoveUp);
        assert_eq!(app.view.selected, 0);
    }

    #[test]
    fn mailbox_switching_cycles() {
        let mut app = two_mailbox_app();
        let n = app.mailbox_count();
        for _ in 0..n {
            app.next_mailbox();
        }
        assert_eq!(app.view.mailbox, 0);
        app.prev_mailbox();
        assert_eq!(app.mailbox().label, "ARCHIVE");
        app.prev_mailbox();
        assert_eq!(app.mailbox().label, "INBOX");
    }

    #[test]
    fn switching_resets_selection() {
        let mut app = two_mailbox_app();
        app.next();
        app.next();
        app.next_mailbox();
        assert_eq!(app.view.selected, 0);
        app.prev_mailbox();
        assert_eq!(app.view.selected, 0);
    }

    #[test]
    fn switch_round_trip_reloads_identical_table() {
        let mut app = two_mailbox_app();
        assert_eq!(app.table.thread_count(), 3);
        let first = app.table.clone();

        app.handle_key(KeyCode::Char('n'));
        assert_eq!(app.mailbox().label, "ARCHIVE");
        assert_eq!(app.table.thread_count(), 0);
        assert_eq!(app.view.counts, QueryCounts::default());

        app.handle_key(KeyCode::Char('p'));
        assert_eq!(app.mailbox().label, "INBOX");
        assert_eq!(app.table, first);
        assert_eq!(app.view.counts.threads, 3);
        assert_eq!(app.view.counts.messages, 3);
    }

    #[test]
    fn resize_only_touches_dimensions() {
        let mut app = two_mailbox_app();
        app.next();
        let before = app.view.clone();
        app.resize(120, 40);
        assert_eq!(app.view.width, 120);
        assert_eq!(app.view.height, 40);
        assert_eq!(app.view.selected, before.selected);
        assert_eq!(app.view.counts, before.counts);
    }

    #[test]
    fn huge_configured_limits_start_normally() {
        use std::io::Write;

        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            "[limits]\nmax_threads = 9223372036854775807\nmax_messages_per_thread = 9223372036854775807\n"
        )
        .unwrap();
        let mut config = Config::load_from(file.path());
        config.mailboxes.truncate(1);

        let mut index = MemoryIndex::new();
        index.insert("tag:inbox", vec![single("t1", "one"), single("t2", "two")]);
        let app = App::new(config, index, 80, 24);
        assert_eq!(app.table.max_threads(), 9_223_372_036_854_775_807);
        assert_eq!(app.table.thread_count(), 2);
        assert_eq!(app.view.counts.messages, 2);
    }

    #[test]
    fn keymap() {
        let keys = KeyConfig::default();
        assert_eq!(keys.action_for(KeyCode::Char('q')), Some(Action::Quit));
        assert_eq!(keys.action_for(KeyCode::Char('w')), Some(Action::MoveUp));
        assert_eq!(keys.action_for(KeyCode::Down), Some(Action::MoveDown));
        assert_eq!(keys.action_for(KeyCode::Char(' ')), Some(Action::Unfold));
        assert_eq!(keys.action_for(KeyCode::Char('z')), None);
        assert_eq!(keys.action_for(KeyCode::Esc), None);
    }

    #[test]
    fn quit_and_reserved_keys() {
        let mut app = two_mailbox_app();
        app.handle_key(KeyCode::Char('r'));
        app.handle_key(KeyCode::Char('m'));
        assert!(!app.should_quit);
        assert_eq!(app.table.thread_count(), 3);
        app.handle_key(KeyCode::Char('q'));
        assert!(app.should_quit);
    }
}
