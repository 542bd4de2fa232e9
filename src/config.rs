use ratatui::style::Color;
use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::index::NotmuchSettings;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Saved searches, in switching order
    pub mailboxes: Vec<MailboxConfig>,
    pub limits: LimitsConfig,
    pub keys: KeyConfig,
    pub theme: ThemeConfig,
    pub notmuch: NotmuchConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct MailboxConfig {
    pub id: String,
    /// Short name shown in the status line
    pub label: String,
    /// notmuch search terms
    pub query: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LimitsConfig {
    /// Threads kept per query; the rest are dropped
    pub max_threads: usize,
    /// Messages kept per thread; the rest are dropped
    pub max_messages_per_thread: usize,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct KeyConfig {
    pub quit: char,
    pub up: char,
    pub down: char,
    pub back: char,
    pub action: char,
    pub next_mailbox: char,
    pub prev_mailbox: char,
    pub compose: char,
    pub reply: char,
    pub unfold: char,
}

/// Column colors
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ThemeConfig {
    pub date: String,
    pub position: String,
    pub sender: String,
    pub subject: String,
    pub tags: String,
    pub status: String,
    /// Background added to the selected row; empty keeps the row's own
    pub selected_bg: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct NotmuchConfig {
    pub binary: String,
    /// notmuch config file, `~` is expanded
    pub config: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            mailboxes: default_mailboxes(),
            limits: LimitsConfig::default(),
            keys: KeyConfig::default(),
            theme: ThemeConfig::default(),
            notmuch: NotmuchConfig::default(),
        }
    }
}

fn default_mailboxes() -> Vec<MailboxConfig> {
    [
        ("inbox", "INBOX", "tag:inbox"),
        ("archive", "ARCHIVE", "tag:archive"),
        ("attachments", "ATTCH", "tag:attachment"),
        ("sent", "SENT", "tag:sent"),
        ("all", "*", "*"),
    ]
    .into_iter()
    .map(|(id, label, query)| MailboxConfig {
        id: id.to_string(),
        label: label.to_string(),
        query: query.to_string(),
    })
    .collect()
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_threads: 100,
            max_messages_per_thread: 256,
        }
    }
}

impl Default for KeyConfig {
    fn default() -> Self {
        Self {
            quit: 'q',
            up: 'w',
            down: 's',
            back: 'a',
            action: 'd',
            next_mailbox: 'n',
            prev_mailbox: 'p',
            compose: 'm',
            reply: 'r',
            unfold: ' ',
        }
    }
}

impl Default for ThemeConfig {
    fn default() -> Self {
        Self {
            date: "magenta".to_string(),
            position: "magenta".to_string(),
            sender: "yellow".to_string(),
            subject: "blue".to_string(),
            tags: "magenta".to_string(),
            status: "reset".to_string(),
            selected_bg: String::new(),
        }
    }
}

impl Default for NotmuchConfig {
    fn default() -> Self {
        let defaults = NotmuchSettings::default();
        Self {
            binary: defaults.binary,
            config: defaults.config,
        }
    }
}

impl Config {
    pub fn path() -> PathBuf {
        dirs::config_dir()
            .map(|p| p.join("nmtui/config.toml"))
            .unwrap_or_else(|| PathBuf::from("~/.config/nmtui/config.toml"))
    }

    pub fn load() -> Self {
        Self::load_from(&Self::path())
    }

    /// Read `path`, falling back to defaults when it is missing or invalid.
    pub fn load_from(path: &Path) -> Self {
        let config = if path.exists() {
            match std::fs::read_to_string(path) {
                Ok(content) => match toml::from_str::<Config>(&content) {
                    Ok(config) => config,
                    Err(e) => {
                        tracing::warn!(path = %path.display(), "config parse error: {e}");
                        Self::default()
                    }
                },
                Err(e) => {
                    tracing::warn!(path = %path.display(), "config read error: {e}");
                    Self::default()
                }
            }
        } else {
            Self::default()
        };
        config.normalized()
    }

    /// Apply fallbacks for values the app cannot run with.
    pub fn normalized(mut self) -> Self {
        if self.mailboxes.is_empty() {
            tracing::warn!("no mailboxes configured, using defaults");
            self.mailboxes = default_mailboxes();
        }
        self.limits.max_threads = self.limits.max_threads.max(1);
        self.limits.max_messages_per_thread = self.limits.max_messages_per_thread.max(1);
        self
    }

    pub fn notmuch_settings(&self) -> NotmuchSettings {
        NotmuchSettings {
            binary: self.notmuch.binary.clone(),
            config: self.notmuch.config.clone(),
        }
    }
}

impl ThemeConfig {
    pub fn date(&self) -> Color {
        parse_color(&self.date)
    }
    pub fn position(&self) -> Color {
        parse_color(&self.position)
    }
    pub fn sender(&self) -> Color {
        parse_color(&self.sender)
    }
    pub fn subject(&self) -> Color {
        parse_color(&self.subject)
    }
    pub fn tags(&self) -> Color {
        parse_color(&self.tags)
    }
    pub fn status(&self) -> Color {
        parse_color(&self.status)
    }
    pub fn selected_bg(&self) -> Option<Color> {
        if self.selected_bg.is_empty() {
            None
        } else {
            Some(parse_color(&self.selected_bg))
        }
    }
}

/// Parse color string to ratatui Color
pub fn parse_color(s: &str) -> Color {
    // Try hex first (#RRGGBB)
    if s.starts_with('#') && s.len() == 7 && s.is_ascii() {
        if let (Ok(r), Ok(g), Ok(b)) = (
            u8::from_str_radix(&s[1..3], 16),
            u8::from_str_radix(&s[3..5], 16),
            u8::from_str_radix(&s[5..7], 16),
        ) {
            return Color::Rgb(r, g, b);
        }
    }

    match s.to_lowercase().as_str() {
        "default" | "reset" => Color::Reset,
        "black" => Color::Black,
        "red" => Color::Red,
        "green" => Color::Green,
        "yellow" => Color::Yellow,
        "blue" => Color::Blue,
        "magenta" => Color::Magenta,
        "cyan" => Color::Cyan,
        "gray" | "grey" => Color::Gray,
        "darkgray" | "darkgrey" => Color::DarkGray,
        "lightred" => Color::LightRed,
        "lightgreen" => Color::LightGreen,
        "lightyellow" => Color::LightYellow,
        "lightblue" => Color::LightBlue,
        "lightmagenta" => Color::LightMagenta,
        "lightcyan" => Color::LightCyan,
        "white" => Color::White,
        _ => Color::Reset,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults() {
        let config = Config::default();
        let labels: Vec<_> = config.mailboxes.iter().map(|m| m.label.as_str()).collect();
        assert_eq!(labels, ["INBOX", "ARCHIVE", "ATTCH", "SENT", "*"]);
        assert_eq!(config.limits.max_threads, 100);
        assert_eq!(config.limits.max_messages_per_thread, 256);
        assert_eq!(config.keys.quit, 'q');
        assert_eq!(config.keys.unfold, ' ');
        assert_eq!(config.notmuch.binary, "notmuch");
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"
[[mailboxes]]
id = "inbox"
label = "IN"
query = "tag:inbox and not tag:spam"

[limits]
max_threads = 20

[keys]
quit = "x"
"#
        )
        .unwrap();

        let config = Config::load_from(file.path());
        assert_eq!(config.mailboxes.len(), 1);
        assert_eq!(config.mailboxes[0].query, "tag:inbox and not tag:spam");
        assert_eq!(config.limits.max_threads, 20);
        assert_eq!(config.limits.max_messages_per_thread, 256);
        assert_eq!(config.keys.quit, 'x');
        assert_eq!(config.keys.up, 'w');
    }

    #[test]
    fn invalid_or_missing_file_uses_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "mailboxes = 3").unwrap();
        assert_eq!(Config::load_from(file.path()).mailboxes.len(), 5);

        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("absent.toml");
        assert_eq!(Config::load_from(&missing).mailboxes.len(), 5);
    }

    #[test]
    fn empty_mailboxes_and_zero_limits_are_normalized() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            "mailboxes = []\n[limits]\nmax_threads = 0\nmax_messages_per_thread = 0\n"
        )
        .unwrap();
        let config = Config::load_from(file.path());
        assert_eq!(config.mailboxes.len(), 5);
        assert_eq!(config.limits.max_threads, 1);
        assert_eq!(config.limits.max_messages_per_thread, 1);
    }

    #[test]
    fn colors() {
        assert_eq!(parse_color("#d4a366"), Color::Rgb(0xd4, 0xa3, 0x66));
        assert_eq!(parse_color("Magenta"), Color::Magenta);
        assert_eq!(parse_color("default"), Color::Reset);
        assert_eq!(parse_color("#zzzzzz"), Color::Reset);
        assert_eq!(ThemeConfig::default().selected_bg(), None);
    }
}
