use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span, Text};
use ratatui::widgets::{BarChart, Block, Borders, Clear, List, ListItem, ListState, Paragraph, Wrap};
use ratatui::Frame;

use treadline_core::analytics::BucketCount;
use treadline_core::domain::LeadStatus;
use treadline_core::dto::LeadDetailDto;
use treadline_core::otr::ParsedOtrMessage;

use crate::app::{App, ConfirmState, Mode, NoteFocus, NoteForm, StatusPicker};
use crate::util::{fit, format_date, format_datetime, status_style};

const HIGHLIGHT: Style = Style::new()
    .fg(Color::Black)
    .bg(Color::LightGreen)
    .add_modifier(Modifier::BOLD);

pub fn draw(frame: &mut Frame<'_>, app: &App) {
    let size = frame.area();
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(5),
            Constraint::Length(4),
        ])
        .split(size);

    render_header(frame, chunks[0], app);

    match &app.mode {
        Mode::Detail(_) => render_detail(frame, chunks[1], app),
        Mode::Stats => render_stats(frame, chunks[1], app),
        Mode::ModalStatus(_) if picker_over_detail(app) => render_detail(frame, chunks[1], app),
        _ => render_list(frame, chunks[1], app),
    }

    render_footer(frame, chunks[2], app);

    if app.show_help {
        render_help(frame, size);
    }

    match &app.mode {
        Mode::ModalStatus(picker) => render_status_picker(frame, size, picker),
        Mode::ModalAddNote(form) => render_note_form(frame, size, form),
        Mode::Confirm(state) => render_confirm(frame, size, state),
        _ => {}
    }
}

fn picker_over_detail(app: &App) -> bool {
    match (&app.mode, &app.detail) {
        (Mode::ModalStatus(picker), Some(detail)) => picker.lead_id == detail.id,
        _ => false,
    }
}

fn render_header(frame: &mut Frame<'_>, area: Rect, app: &App) {
    let filter_display = if app.filter_input.trim().is_empty() {
        "(none)".to_string()
    } else {
        app.filter_input.clone()
    };
    let mut spans = vec![
        Span::styled("leads: ", Style::default().fg(Color::DarkGray)),
        Span::raw(app.leads.len().to_string()),
        Span::raw("  "),
        Span::styled("filter: ", Style::default().fg(Color::DarkGray)),
    ];
    if matches!(app.mode, Mode::FilterEditing) {
        spans.push(Span::styled(
            format!("{}_", app.filter_input),
            Style::default().fg(Color::Yellow),
        ));
    } else {
        spans.push(Span::raw(filter_display));
    }
    if let Some(err) = &app.filter_error {
        spans.push(Span::raw("  "));
        spans.push(Span::styled(err.clone(), Style::default().fg(Color::Red)));
    }

    let block = Block::default().borders(Borders::ALL).title("treadline");
    frame.render_widget(Paragraph::new(Line::from(spans)).block(block), area);
}

fn render_footer(frame: &mut Frame<'_>, area: Rect, app: &App) {
    let hint = match app.mode {
        Mode::List => "j/k move  enter detail  / filter  c clear  s status  n note  d delete  a analytics  ? help",
        Mode::Detail(_) => "esc back  j/k scroll  s status  n note  r reload  ? help",
        Mode::Stats => "esc back  +/- months  r reload",
        Mode::FilterEditing => "enter apply  esc cancel  ctrl+u clear",
        Mode::ModalStatus(_) => "j/k choose  space notify  enter apply  esc cancel",
        Mode::ModalAddNote(_) => "tab next  ←/→ type  enter newline/select  esc cancel",
        Mode::Confirm(_) => "y confirm  n cancel",
    };

    let mut lines = vec![Line::from(Span::styled(
        hint,
        Style::default().fg(Color::DarkGray),
    ))];
    if let Some(err) = &app.error {
        lines.push(Line::from(Span::styled(
            err.clone(),
            Style::default().fg(Color::Red),
        )));
    } else if let Some(status) = &app.status {
        lines.push(Line::from(Span::styled(
            status.clone(),
            Style::default().fg(Color::Green),
        )));
    }

    let paragraph = Paragraph::new(lines).block(Block::default().borders(Borders::ALL));
    frame.render_widget(paragraph, area);
}

fn render_list(frame: &mut Frame<'_>, area: Rect, app: &App) {
    if app.leads.is_empty() {
        let paragraph = Paragraph::new(app.empty_hint())
            .block(Block::default().borders(Borders::ALL).title("Leads"))
            .alignment(Alignment::Center);
        frame.render_widget(paragraph, area);
        return;
    }

    let items: Vec<ListItem> = app
        .leads
        .iter()
        .map(|lead| {
            let status = LeadStatus::parse(&lead.status);
            let company = lead.company.clone().unwrap_or_default();
            ListItem::new(Line::from(vec![
                Span::styled(format_date(lead.created_at), Style::default().fg(Color::DarkGray)),
                Span::raw("  "),
                Span::styled(fit(status.label(), 11), status_style(&status)),
                Span::raw(" "),
                Span::styled(fit(&lead.channel, 9), Style::default().fg(Color::Cyan)),
                Span::raw(" "),
                Span::styled(
                    fit(&lead.name, 24),
                    Style::default().add_modifier(Modifier::BOLD),
                ),
                Span::raw(" "),
                Span::styled(company, Style::default().fg(Color::DarkGray)),
            ]))
        })
        .collect();

    let mut state = ListState::default();
    state.select(Some(app.selected));

    let list = List::new(items)
        .block(Block::default().borders(Borders::ALL).title("Leads"))
        .highlight_style(HIGHLIGHT)
        .highlight_symbol("➤ ");

    frame.render_stateful_widget(list, area, &mut state);
}

fn render_detail(frame: &mut Frame<'_>, area: Rect, app: &App) {
    let Some(detail) = &app.detail else {
        let paragraph = Paragraph::new("Loading...")
            .block(Block::default().borders(Borders::ALL).title("Lead"));
        frame.render_widget(paragraph, area);
        return;
    };

    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
        .split(area);

    let lead = Paragraph::new(Text::from(detail_lines(detail)))
        .block(Block::default().borders(Borders::ALL).title("Lead"))
        .scroll((app.detail_scroll as u16, 0))
        .wrap(Wrap { trim: false });
    frame.render_widget(lead, chunks[0]);

    let notes = Paragraph::new(Text::from(note_lines(detail)))
        .block(Block::default().borders(Borders::ALL).title("Notes"))
        .wrap(Wrap { trim: true });
    frame.render_widget(notes, chunks[1]);
}

fn detail_lines(detail: &LeadDetailDto) -> Vec<Line<'static>> {
    let status = LeadStatus::parse(&detail.status);
    let mut lines = vec![
        Line::from(Span::styled(
            detail.name.clone(),
            Style::default().add_modifier(Modifier::BOLD),
        )),
        field_line("Email", &detail.email),
        field_line("Company", detail.company.as_deref().unwrap_or("-")),
        field_line("Subject", detail.subject.as_deref().unwrap_or("-")),
        field_line("Channel", &detail.channel),
        Line::from(vec![
            Span::styled("Status: ", Style::default().add_modifier(Modifier::BOLD)),
            Span::styled(status.label().to_string(), status_style(&status)),
        ]),
        field_line("Created", &format_datetime(detail.created_at)),
        field_line("Updated", &format_datetime(detail.updated_at)),
    ];

    match &detail.otr {
        Some(parsed) => lines.extend(otr_lines(parsed)),
        None => {
            lines.push(Line::from(""));
            lines.push(section_title("Message"));
            for line in detail.message.lines() {
                lines.push(Line::from(line.to_string()));
            }
        }
    }
    lines
}

fn otr_lines(parsed: &ParsedOtrMessage) -> Vec<Line<'static>> {
    let sections = [
        (
            "Indicator",
            vec![
                ("Name", &parsed.indicator_name),
                ("Company", &parsed.indicator_company),
                ("Phone", &parsed.indicator_phone),
                ("Email", &parsed.indicator_email),
            ],
        ),
        (
            "Indicated source",
            vec![
                ("Type", &parsed.source_type),
                ("Company", &parsed.source_company),
                ("Contact", &parsed.source_contact),
                ("Phone", &parsed.source_phone),
                ("Email", &parsed.source_email),
                ("Location", &parsed.location),
                ("Volume", &parsed.estimated_volume),
                ("Tire types", &parsed.tire_types),
            ],
        ),
    ];

    let mut lines = Vec::new();
    for (title, fields) in sections {
        if fields.iter().all(|(_, value)| value.is_empty()) {
            continue;
        }
        lines.push(Line::from(""));
        lines.push(section_title(title));
        for (label, value) in fields {
            if !value.is_empty() {
                lines.push(field_line(label, value));
            }
        }
    }
    if !parsed.details.is_empty() {
        lines.push(Line::from(""));
        lines.push(section_title("Details"));
        for line in parsed.details.lines() {
            lines.push(Line::from(line.to_string()));
        }
    }
    lines
}

fn note_lines(detail: &LeadDetailDto) -> Vec<Line<'static>> {
    if detail.notes.is_empty() {
        return vec![Line::from(Span::styled(
            "No notes yet.",
            Style::default().fg(Color::DarkGray),
        ))];
    }
    let mut lines = Vec::new();
    for note in &detail.notes {
        lines.push(Line::from(vec![
            Span::styled(
                format_datetime(note.created_at),
                Style::default().fg(Color::Yellow),
            ),
            Span::raw(" "),
            Span::styled(note.note_type.clone(), Style::default().fg(Color::Cyan)),
        ]));
        for line in note.note.lines() {
            lines.push(Line::from(line.to_string()));
        }
        lines.push(Line::from(""));
    }
    lines
}

fn render_stats(frame: &mut Frame<'_>, area: Rect, app: &App) {
    let Some(stats) = &app.stats else {
        let paragraph = Paragraph::new("Loading...")
            .block(Block::default().borders(Borders::ALL).title("Analytics"));
        frame.render_widget(paragraph, area);
        return;
    };

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(8), Constraint::Min(6)])
        .split(area);

    let headline = Paragraph::new(Line::from(vec![
        Span::raw(format!("Total {}  ", stats.total)),
        Span::styled(
            format!("Converted {}  ", stats.converted),
            Style::default().fg(Color::Green),
        ),
        Span::raw(format!("Conversion rate {}%", stats.conversion_rate)),
    ]))
    .block(Block::default().borders(Borders::ALL).title("Analytics"));
    frame.render_widget(headline, rows[0]);

    let labels: Vec<String> = stats
        .monthly
        .iter()
        .map(|point| point.month.get(2..).unwrap_or(&point.month).to_string())
        .collect();
    let data: Vec<(&str, u64)> = labels
        .iter()
        .zip(&stats.monthly)
        .map(|(label, point)| (label.as_str(), point.total as u64))
        .collect();
    let chart = BarChart::default()
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!("Leads per month ({} months)", app.analytics_months)),
        )
        .data(data.as_slice())
        .bar_width(6)
        .bar_gap(2)
        .bar_style(Style::default().fg(Color::LightGreen))
        .value_style(Style::default().fg(Color::Black).bg(Color::LightGreen));
    frame.render_widget(chart, rows[1]);

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(25),
            Constraint::Percentage(25),
            Constraint::Percentage(25),
            Constraint::Percentage(25),
        ])
        .split(rows[2]);
    render_buckets(frame, columns[0], "Status", &stats.by_status);
    render_buckets(frame, columns[1], "Channel", &stats.by_channel);
    render_buckets(frame, columns[2], "Region", &stats.by_region);
    render_buckets(frame, columns[3], "Source type", &stats.by_source_type);
}

fn render_buckets(frame: &mut Frame<'_>, area: Rect, title: &str, buckets: &[BucketCount]) {
    let items: Vec<ListItem> = buckets
        .iter()
        .map(|bucket| ListItem::new(format!("{:>4}  {}", bucket.count, bucket.label)))
        .collect();
    let list = List::new(items).block(
        Block::default()
            .borders(Borders::ALL)
            .title(title.to_string()),
    );
    frame.render_widget(list, area);
}

fn render_status_picker(frame: &mut Frame<'_>, area: Rect, picker: &StatusPicker) {
    let modal = centered_rect(40, 50, area);
    frame.render_widget(Clear, modal);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(8), Constraint::Length(3)])
        .split(modal);

    let items: Vec<ListItem> = LeadStatus::KNOWN
        .iter()
        .map(|status| {
            let marker = if *status == picker.current { "•" } else { " " };
            ListItem::new(Line::from(vec![
                Span::raw(format!("{} ", marker)),
                Span::styled(status.label().to_string(), status_style(status)),
            ]))
        })
        .collect();
    let mut state = ListState::default();
    state.select(Some(picker.selected_index));
    let list = List::new(items)
        .block(Block::default().borders(Borders::ALL).title("Change status"))
        .highlight_style(HIGHLIGHT)
        .highlight_symbol("➤ ");
    frame.render_stateful_widget(list, chunks[0], &mut state);

    let notify = if picker.notify { "[x]" } else { "[ ]" };
    let options = Paragraph::new(format!("{} notify indicator on approval", notify))
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(options, chunks[1]);
}

fn render_note_form(frame: &mut Frame<'_>, area: Rect, form: &NoteForm) {
    let modal = centered_rect(70, 60, area);
    frame.render_widget(Clear, modal);

    let focused = |focus: NoteFocus| {
        if form.focus == focus {
            Style::default().fg(Color::Yellow)
        } else {
            Style::default()
        }
    };

    let mut lines = vec![
        Line::from(vec![
            Span::styled("Type: ", Style::default().add_modifier(Modifier::BOLD)),
            Span::styled(format!("< {} >", form.kind_label()), focused(NoteFocus::Kind)),
        ]),
        Line::from(Span::styled(
            "Note:",
            Style::default().add_modifier(Modifier::BOLD),
        )),
    ];
    if form.note.is_empty() {
        lines.push(Line::from(Span::styled("(empty)", focused(NoteFocus::Note))));
    } else {
        for line in form.note.split('\n') {
            lines.push(Line::from(Span::styled(
                line.to_string(),
                focused(NoteFocus::Note),
            )));
        }
    }
    lines.push(Line::from(""));

    let save_style = if form.focus == NoteFocus::Save {
        Style::default().fg(Color::Black).bg(Color::LightGreen)
    } else {
        Style::default().fg(Color::Green)
    };
    let cancel_style = if form.focus == NoteFocus::Cancel {
        Style::default().fg(Color::Black).bg(Color::LightRed)
    } else {
        Style::default().fg(Color::Red)
    };
    lines.push(Line::from(vec![
        Span::styled("[Save]", save_style),
        Span::raw("  "),
        Span::styled("[Cancel]", cancel_style),
    ]));

    let paragraph = Paragraph::new(lines)
        .block(Block::default().borders(Borders::ALL).title("Add Note"))
        .wrap(Wrap { trim: false });
    frame.render_widget(paragraph, modal);
}

fn render_confirm(frame: &mut Frame<'_>, area: Rect, state: &ConfirmState) {
    let modal = centered_rect(50, 20, area);
    frame.render_widget(Clear, modal);
    let paragraph = Paragraph::new(state.message.clone())
        .block(Block::default().borders(Borders::ALL).title("Confirm"))
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true });
    frame.render_widget(paragraph, modal);
}

fn render_help(frame: &mut Frame<'_>, area: Rect) {
    let modal = centered_rect(70, 70, area);
    frame.render_widget(Clear, modal);

    let text = vec![
        Line::from("Global: q quit, Ctrl+C quit, ? help"),
        Line::from("List: j/k move, enter detail, / filter, c clear filter, s status, n note, d delete, a analytics, r reload"),
        Line::from("Detail: esc back, j/k scroll, s status, n note, r reload"),
        Line::from("Analytics: +/- trend months, r reload, esc back"),
        Line::from("Status: j/k choose, space toggles the approval notification, enter apply"),
        Line::from(""),
        Line::from("Filter syntax: status:<label>, #<channel>, since:YYYY-MM-DD, until:YYYY-MM-DD, free text matches name/email/company/subject/message"),
        Line::from(""),
        Line::from("Changes made by other treadline processes show up automatically."),
    ];

    let paragraph = Paragraph::new(text)
        .block(Block::default().borders(Borders::ALL).title("Help"))
        .wrap(Wrap { trim: true });
    frame.render_widget(paragraph, modal);
}

fn section_title(title: &str) -> Line<'static> {
    Line::from(Span::styled(
        title.to_string(),
        Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD),
    ))
}

fn field_line(label: &str, value: &str) -> Line<'static> {
    Line::from(vec![
        Span::styled(
            format!("{}: ", label),
            Style::default().add_modifier(Modifier::BOLD),
        ),
        Span::raw(value.to_string()),
    ])
}

fn centered_rect(percent_x: u16, percent_y: u16, rect: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(rect);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
