use anyhow::Result;
use crossterm::{
    cursor::Show,
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::prelude::*;
use std::fs::{File, OpenOptions};
use std::io::{self, Stdout};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Mutex;
use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use nmtui::app::App;
use nmtui::config::Config;
use nmtui::index::Notmuch;
use nmtui::ui::render;

type Tui = Terminal<CrosstermBackend<Stdout>>;

/// Open `<dir>/nmtui.log`, creating the directory as needed.
fn open_log_file(dir: Option<PathBuf>) -> Option<File> {
    let dir = dir.filter(|dir| std::fs::create_dir_all(dir).is_ok())?;
    OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(true)
        .open(dir.join("nmtui.log"))
        .ok()
}

fn setup_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    // stderr would draw over the alternate screen, so logs without a file
    // are dropped
    let writer = match open_log_file(dirs::cache_dir().map(|dir| dir.join("nmtui"))) {
        Some(file) => BoxMakeWriter::new(Mutex::new(file)),
        None => BoxMakeWriter::new(io::sink),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(writer)
                .with_ansi(false),
        )
        .init();
}

/// Restores the terminal when dropped.
struct TerminalGuard;

impl TerminalGuard {
    fn init() -> io::Result<(Self, Tui)> {
        enable_raw_mode()?;
        let guard = TerminalGuard;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let terminal = Terminal::new(CrosstermBackend::new(stdout))?;
        Ok((guard, terminal))
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen, Show);
    }
}

fn exit_code(code: i32) -> ExitCode {
    ExitCode::from(u8::try_from(code).ok().filter(|c| *c != 0).unwrap_or(1))
}

fn run(terminal: &mut Tui, app: &mut App<Notmuch>) -> Result<()> {
    loop {
        terminal.draw(|f| render(f, app))?;

        match event::read()? {
            Event::Key(key) if key.kind == KeyEventKind::Press => {
                app.handle_key(key.code);
                if app.should_quit {
                    return Ok(());
                }
            }
            Event::Resize(width, height) => app.resize(width, height),
            _ => {}
        }
    }
}

fn main() -> ExitCode {
    setup_logging();
    let config = Config::load();

    let index = match Notmuch::open(config.notmuch_settings()) {
        Ok(index) => index,
        Err(e) => {
            tracing::error!(error = %e, "could not open notmuch database");
            eprintln!("nmtui: {e}");
            return exit_code(e.exit_code());
        }
    };

    let (guard, mut terminal) = match TerminalGuard::init() {
        Ok(t) => t,
        Err(e) => {
            tracing::error!(error = %e, "could not initialise terminal");
            eprintln!("nmtui: {e}");
            return exit_code(e.raw_os_error().unwrap_or(1));
        }
    };

    let size = terminal.size().unwrap_or_default();
    let mut app = App::new(config, index, size.width, size.height);
    let result = run(&mut terminal, &mut app);

    drop(terminal);
    drop(guard);

    match result {
        Ok(()) => {
            tracing::info!("exiting: quit key");
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!(error = %e, "exiting: terminal error");
            eprintln!("nmtui: {e}");
            ExitCode::FAILURE
        }
    }
}
