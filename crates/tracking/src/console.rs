//! Console table sink.

use crate::{BotMetrics, MetricsRecord, PersistError, PersistMetrics};
use std::io::{self, Write};
use unicode_width::UnicodeWidthStr;

const HEADERS: [&str; 8] = [
    "When",
    "Success",
    "Conversation ID",
    "User ID",
    "Message type",
    "Input size",
    "Output size",
    "Inference Time",
];

/// Prints each record as a small fixed-column table on stdout.
///
/// Fields that cannot be derived are shown as `-`.
#[derive(Debug, Default, Clone, Copy)]
pub struct ConsoleMetrics;

impl ConsoleMetrics {
    /// Render a record as a bordered table.
    ///
    /// Columns are sized by terminal display width, so the wide status
    /// glyphs line up with the borders.
    pub fn render(record: &MetricsRecord) -> String {
        let cells = [
            record
                .started_at_local()
                .map(|t| t.format("%Y-%m-%d %H:%M:%S").to_string())
                .unwrap_or_else(|| "-".to_string()),
            if record.success { "✅" } else { "🔴" }.to_string(),
            or_dash(record.conversation_id.as_deref()),
            or_dash(record.user_id.as_deref()),
            or_dash(record.input_message_type.as_deref()),
            or_dash(record.user_input_size),
            or_dash(record.bot_output_size),
            format!("⚡ {:.2} seconds", record.response_time),
        ];

        let widths: Vec<usize> = HEADERS
            .iter()
            .zip(&cells)
            .map(|(h, c)| h.width().max(c.width()))
            .collect();

        let rule = widths
            .iter()
            .map(|w| "-".repeat(w + 2))
            .collect::<Vec<_>>()
            .join("+");
        let rule = format!("+{rule}+");

        let mut out = String::new();
        out.push_str(&rule);
        out.push('\n');
        out.push_str(&row(HEADERS.iter().copied(), &widths));
        out.push_str(&rule);
        out.push('\n');
        out.push_str(&row(cells.iter().map(String::as_str), &widths));
        out.push_str(&rule);
        out
    }
}

impl PersistMetrics for ConsoleMetrics {
    fn persist(&self, metrics: &BotMetrics) -> Result<(), PersistError> {
        let table = Self::render(&metrics.record());
        let mut stdout = io::stdout().lock();
        writeln!(stdout, "{table}")?;
        Ok(())
    }
}

fn row<'a>(cells: impl Iterator<Item = &'a str>, widths: &[usize]) -> String {
    let mut line = String::from("|");
    for (cell, width) in cells.zip(widths) {
        let pad = width - cell.width();
        line.push(' ');
        line.push_str(cell);
        line.push_str(&" ".repeat(pad + 1));
        line.push('|');
    }
    line.push('\n');
    line
}

fn or_dash<T: ToString>(value: Option<T>) -> String {
    value.map(|v| v.to_string()).unwrap_or_else(|| "-".to_string())
}
