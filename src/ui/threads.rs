use ratatui::{
    Frame,
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    widgets::Clear,
};

use super::columns::{ColumnKind, RowLayout, layout_row};
use super::status::render_status;
use crate::app::App;
use crate::config::ThemeConfig;
use crate::index::MailIndex;
use crate::mail::ThreadTable;

/// Draw a full frame: status line, one row per message, selection.
pub fn render<I: MailIndex>(f: &mut Frame, app: &App<I>) {
    let area = f.area();
    f.render_widget(Clear, area);

    let theme = &app.config.theme;
    render_status(f, area, &app.mailbox().label, &app.view.counts, theme);

    if app.table.thread_count() == 0 || area.height < 2 {
        return;
    }

    let visible = (area.height - 1) as usize;
    let selected_row = app.table.first_row_of(app.view.selected);
    let offset = scroll_offset(selected_row, visible);

    let buf = f.buffer_mut();
    render_rows(buf, area, &app.table, offset, theme);
    highlight_row(buf, area, area.y + 1 + (selected_row - offset) as u16, theme);
}

/// First row to draw so that `selected_row` stays inside `visible` rows.
pub fn scroll_offset(selected_row: usize, visible: usize) -> usize {
    if visible == 0 || selected_row < visible {
        0
    } else {
        selected_row + 1 - visible
    }
}

fn render_rows(
    buf: &mut Buffer,
    area: Rect,
    table: &ThreadTable,
    offset: usize,
    theme: &ThemeConfig,
) {
    let rows = table.threads().iter().flat_map(|thread| {
        let total = thread.message_count();
        thread
            .messages
            .iter()
            .enumerate()
            .map(move |(i, message)| layout_row(message, i + 1, total))
    });

    let mut y = area.y + 1;
    for row in rows.skip(offset) {
        if y >= area.bottom() {
            break;
        }
        draw_row(buf, area, y, &row, theme);
        y += 1;
    }
}

fn draw_row(buf: &mut Buffer, area: Rect, y: u16, row: &RowLayout, theme: &ThemeConfig) {
    let mut x = area.x as usize;
    for column in &row.columns {
        if x >= area.right() as usize {
            break;
        }
        let color = match column.kind {
            ColumnKind::Date => theme.date(),
            ColumnKind::Position => theme.position(),
            ColumnKind::Sender => theme.sender(),
            ColumnKind::Subject => theme.subject(),
            ColumnKind::Tags => theme.tags(),
        };
        buf.set_stringn(
            x as u16,
            y,
            &column.text,
            column.width,
            Style::default().fg(color),
        );
        x += column.width;
    }
}

/// Underline every cell of row `y`, keeping the colors already drawn.
fn highlight_row(buf: &mut Buffer, area: Rect, y: u16, theme: &ThemeConfig) {
    if y >= area.bottom() {
        return;
    }
    let mut style = Style::default().add_modifier(Modifier::UNDERLINED);
    if let Some(bg) = theme.selected_bg() {
        style = style.bg(bg);
    }
    for x in area.left()..area.right() {
        buf[(x, y)].set_style(style);
    }
}
