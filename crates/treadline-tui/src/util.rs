use ratatui::style::{Color, Modifier, Style};
use treadline_core::domain::LeadStatus;
use treadline_core::time::{self, local_offset};

pub fn format_date(ts: i64) -> String {
    time::format_timestamp_date(ts, local_offset())
}

pub fn format_datetime(ts: i64) -> String {
    time::format_timestamp_datetime(ts, local_offset())
}

pub fn status_style(status: &LeadStatus) -> Style {
    match status {
        LeadStatus::Pending => Style::default().fg(Color::Yellow),
        LeadStatus::Approved => Style::default().fg(Color::Blue),
        LeadStatus::Contacted => Style::default().fg(Color::Cyan),
        LeadStatus::Negotiating => Style::default().fg(Color::Magenta),
        LeadStatus::Converted => Style::default()
            .fg(Color::Green)
            .add_modifier(Modifier::BOLD),
        LeadStatus::Rejected => Style::default().fg(Color::Red),
        LeadStatus::Other(_) => Style::default().fg(Color::DarkGray),
    }
}

/// Cuts `value` to `width` chars, marking the cut with an ellipsis.
pub fn fit(value: &str, width: usize) -> String {
    if value.chars().count() <= width {
        return format!("{:<width$}", value, width = width);
    }
    let mut out: String = value.chars().take(width.saturating_sub(1)).collect();
    out.push('…');
    out
}
