use crate::mail::Message;
use crate::text::{display_width, truncate_to_width};

/// Leading space plus "Jan 05".
pub const DATE_WIDTH: usize = 7;
/// Columns shared by the position indicator and the sender name.
pub const SENDER_BUDGET: usize = 24;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    Date,
    Position,
    Sender,
    Subject,
    Tags,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Column {
    pub kind: ColumnKind,
    pub text: String,
    /// Columns advanced before the next one starts
    pub width: usize,
}

/// The five columns of one message row, left to right.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowLayout {
    pub columns: [Column; 5],
}

/// Lay out a message row. `position` is 1-based within a thread of `total`.
pub fn layout_row(message: &Message, position: usize, total: usize) -> RowLayout {
    let date = format!(" {:<6}", message.date);

    let indicator = format!(" [{position}/{total}]");
    let indicator_width = display_width(indicator.as_str());

    // sender gets whatever the indicator leaves, minus its leading space
    let sender_width = SENDER_BUDGET.saturating_sub(indicator_width).max(1);
    let sender = format!(" {}", truncate_to_width(&message.from, sender_width - 1));

    let subject = format!(" {}", message.subject);
    let subject_width = 1 + display_width(message.subject.as_str());

    let tags = format!(" # {}", message.tags);
    let tags_width = display_width(tags.as_str());

    RowLayout {
        columns: [
            Column {
                kind: ColumnKind::Date,
                text: date,
                width: DATE_WIDTH,
            },
            Column {
                kind: ColumnKind::Position,
                text: indicator,
                width: indicator_width,
            },
            Column {
                kind: ColumnKind::Sender,
                text: sender,
                width: sender_width,
            },
            Column {
                kind: ColumnKind::Subject,
                text: subject,
                width: subject_width,
            },
            Column {
                kind: ColumnKind::Tags,
                text: tags,
                width: tags_width,
            },
        ],
    }
}

impl RowLayout {
    /// Starting x of each column.
    pub fn offsets(&self) -> [usize; 5] {
        let mut x = 0;
        self.columns.each_ref().map(|c| {
            let start = x;
            x += c.width;
            start
        })
    }
}
