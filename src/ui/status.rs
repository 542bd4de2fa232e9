use ratatui::{
    Frame,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
};

use crate::config::ThemeConfig;
use crate::mail::QueryCounts;

pub fn status_text(label: &str, counts: &QueryCounts) -> String {
    format!(
        " nmtui: {} {}/{} ({} threads)",
        label, counts.unread, counts.messages, counts.threads
    )
}

/// Status line on the first row of `area`.
pub fn render_status(
    f: &mut Frame,
    area: Rect,
    label: &str,
    counts: &QueryCounts,
    theme: &ThemeConfig,
) {
    let style = Style::default()
        .fg(theme.status())
        .add_modifier(Modifier::BOLD);
    let line = Line::from(Span::styled(status_text(label, counts), style));
    let row = Rect::new(area.x, area.y, area.width, area.height.min(1));
    f.render_widget(Paragraph::new(line), row);
}
