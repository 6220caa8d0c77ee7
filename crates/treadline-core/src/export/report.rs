use crate::analytics::{
    count_by_channel, count_by_region, count_by_source_type, count_by_status, count_converted,
    monthly_series, percentage, BucketCount, DEFAULT_TREND_MONTHS,
};
use crate::domain::{Lead, LeadStatus};
use crate::time::format_timestamp_date;
use chrono::FixedOffset;
use serde::{Deserialize, Serialize};

pub const REPORT_ROW_LIMIT: usize = 25;
/// Line budget of one A4 page at the renderer's body font size.
pub const LINES_PER_PAGE: usize = 48;

const NAME_WIDTH: usize = 24;
const COMPANY_WIDTH: usize = 20;
const STATUS_WIDTH: usize = 12;
const LOCATION_WIDTH: usize = 22;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportKind {
    Leads,
    Otr,
}

impl ReportKind {
    pub fn slug(&self) -> &'static str {
        match self {
            ReportKind::Leads => "leads-report",
            ReportKind::Otr => "otr-report",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            ReportKind::Leads => "Lead Report",
            ReportKind::Otr => "OTR Indications Report",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportRow {
    pub date: String,
    pub name: String,
    pub company: String,
    pub status: String,
    pub location: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportSection {
    pub title: String,
    pub items: Vec<BucketCount>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportDocument {
    pub kind: ReportKind,
    pub title: String,
    pub generated_on: String,
    pub filter: String,
    pub total: usize,
    pub summary: Vec<(String, String)>,
    pub sections: Vec<ReportSection>,
    pub rows: Vec<ReportRow>,
    pub hidden_rows: usize,
}

pub fn report_filename(kind: ReportKind, now_utc: i64, offset: FixedOffset, ext: &str) -> String {
    format!(
        "{}-{}.{}",
        kind.slug(),
        format_timestamp_date(now_utc, offset),
        ext
    )
}

pub fn overflow_note(hidden_rows: usize) -> Option<String> {
    if hidden_rows == 0 {
        None
    } else {
        Some(format!("... and {} more records not shown", hidden_rows))
    }
}

/// Builds the report for the leads currently selected by `filter`. Only the
/// first `row_limit` leads are listed; the rest are counted in
/// `hidden_rows`.
pub fn build_report(
    kind: ReportKind,
    leads: &[Lead],
    filter: &str,
    now_utc: i64,
    offset: FixedOffset,
    row_limit: usize,
) -> ReportDocument {
    let total = leads.len();
    let converted = count_converted(leads);
    let by_status = count_by_status(leads);
    let status_count = |status: LeadStatus| {
        by_status
            .iter()
            .find(|bucket| bucket.label == status.as_str())
            .map(|bucket| bucket.count)
            .unwrap_or(0)
    };

    let summary = vec![
        ("Total leads".to_string(), total.to_string()),
        (
            "Pending".to_string(),
            status_count(LeadStatus::Pending).to_string(),
        ),
        (
            "Approved".to_string(),
            status_count(LeadStatus::Approved).to_string(),
        ),
        ("Converted".to_string(), converted.to_string()),
        (
            "Rejected".to_string(),
            status_count(LeadStatus::Rejected).to_string(),
        ),
        (
            "Conversion rate".to_string(),
            format!("{}%", percentage(converted, total)),
        ),
    ];

    let mut sections = vec![ReportSection {
        title: "By status".to_string(),
        items: by_status.clone(),
    }];
    match kind {
        ReportKind::Leads => {
            sections.push(ReportSection {
                title: "By channel".to_string(),
                items: count_by_channel(leads),
            });
            let monthly = monthly_series(leads, now_utc, offset, DEFAULT_TREND_MONTHS)
                .into_iter()
                .map(|point| BucketCount {
                    label: point.month,
                    count: point.total,
                })
                .collect();
            sections.push(ReportSection {
                title: "By month".to_string(),
                items: monthly,
            });
        }
        ReportKind::Otr => {
            sections.push(ReportSection {
                title: "By region".to_string(),
                items: count_by_region(leads),
            });
            sections.push(ReportSection {
                title: "By source type".to_string(),
                items: count_by_source_type(leads),
            });
        }
    }

    let rows = leads
        .iter()
        .take(row_limit)
        .map(|lead| {
            let parsed = lead.parsed();
            let company = lead
                .company
                .clone()
                .filter(|value| !value.trim().is_empty())
                .unwrap_or(parsed.source_company);
            ReportRow {
                date: format_timestamp_date(lead.created_at, offset),
                name: lead.name.clone(),
                company,
                status: lead.status.label().to_string(),
                location: parsed.location,
            }
        })
        .collect();

    ReportDocument {
        kind,
        title: kind.title().to_string(),
        generated_on: format_timestamp_date(now_utc, offset),
        filter: filter.to_string(),
        total,
        summary,
        sections,
        rows,
        hidden_rows: total.saturating_sub(row_limit),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LineStyle {
    Title,
    Heading,
    Body,
    TableHeader,
    TableRow,
    Note,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportLine {
    pub style: LineStyle,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportPage {
    pub number: usize,
    pub lines: Vec<ReportLine>,
}

struct PageBuilder {
    lines_per_page: usize,
    pages: Vec<ReportPage>,
    current: Vec<ReportLine>,
}

impl PageBuilder {
    fn new(lines_per_page: usize) -> Self {
        Self {
            lines_per_page: lines_per_page.max(4),
            pages: Vec::new(),
            current: Vec::new(),
        }
    }

    fn remaining(&self) -> usize {
        self.lines_per_page - self.current.len()
    }

    fn push(&mut self, style: LineStyle, text: impl Into<String>) {
        if self.remaining() == 0 {
            self.break_page();
        }
        self.current.push(ReportLine {
            style,
            text: text.into(),
        });
    }

    fn blank(&mut self) {
        if !self.current.is_empty() && self.remaining() > 0 {
            self.push(LineStyle::Body, "");
        }
    }

    fn break_page(&mut self) {
        if self.current.is_empty() {
            return;
        }
        let number = self.pages.len() + 1;
        self.pages.push(ReportPage {
            number,
            lines: std::mem::take(&mut self.current),
        });
    }

    fn finish(mut self) -> Vec<ReportPage> {
        self.break_page();
        self.pages
    }
}

/// Lays the document out as a cover page, breakdown pages and record
/// pages. The table header is repeated on every record page.
pub fn paginate(doc: &ReportDocument, lines_per_page: usize) -> Vec<ReportPage> {
    let mut pages = PageBuilder::new(lines_per_page);

    pages.push(LineStyle::Title, doc.title.clone());
    pages.push(LineStyle::Body, format!("Generated on {}", doc.generated_on));
    pages.push(LineStyle::Body, format!("Filter: {}", doc.filter));
    pages.blank();
    pages.push(LineStyle::Heading, "Summary");
    for (label, value) in &doc.summary {
        pages.push(LineStyle::Body, format!("{}: {}", label, value));
    }
    pages.break_page();

    pages.push(LineStyle::Heading, "Breakdown");
    for section in &doc.sections {
        if pages.remaining() < 3 {
            pages.break_page();
        }
        pages.blank();
        pages.push(LineStyle::Heading, section.title.clone());
        if section.items.is_empty() {
            pages.push(LineStyle::Note, "No data");
        }
        for item in &section.items {
            pages.push(
                LineStyle::Body,
                format!(
                    "{}: {} ({}%)",
                    item.label,
                    item.count,
                    percentage(item.count, doc.total)
                ),
            );
        }
    }
    pages.break_page();

    pages.push(LineStyle::Heading, "Records");
    pages.push(LineStyle::TableHeader, table_header());
    if doc.rows.is_empty() {
        pages.push(LineStyle::Note, "No records match the current filter");
    }
    for row in &doc.rows {
        if pages.remaining() == 0 {
            pages.break_page();
            pages.push(LineStyle::TableHeader, table_header());
        }
        pages.push(LineStyle::TableRow, table_row(row));
    }
    if let Some(note) = overflow_note(doc.hidden_rows) {
        pages.push(LineStyle::Note, note);
    }

    pages.finish()
}

fn table_header() -> String {
    format!(
        "{:<10}  {:<nw$}  {:<cw$}  {:<sw$}  {:<lw$}",
        "Date",
        "Name",
        "Company",
        "Status",
        "Location",
        nw = NAME_WIDTH,
        cw = COMPANY_WIDTH,
        sw = STATUS_WIDTH,
        lw = LOCATION_WIDTH,
    )
}

fn table_row(row: &ReportRow) -> String {
    format!(
        "{:<10}  {:<nw$}  {:<cw$}  {:<sw$}  {:<lw$}",
        row.date,
        clip(&row.name, NAME_WIDTH),
        clip(&row.company, COMPANY_WIDTH),
        clip(&row.status, STATUS_WIDTH),
        clip(&row.location, LOCATION_WIDTH),
        nw = NAME_WIDTH,
        cw = COMPANY_WIDTH,
        sw = STATUS_WIDTH,
        lw = LOCATION_WIDTH,
    )
}

fn clip(value: &str, width: usize) -> String {
    if value.chars().count() <= width {
        return value.to_string();
    }
    let mut out: String = value.chars().take(width.saturating_sub(1)).collect();
    out.push('…');
    out
}

#[cfg(test)]
mod tests {
    use super::{
        build_report, clip, overflow_note, paginate, report_filename, LineStyle, ReportKind,
        REPORT_ROW_LIMIT,
    };
    use crate::domain::{Channel, Lead, LeadId, LeadStatus};
    use chrono::{FixedOffset, TimeZone};

    fn utc() -> FixedOffset {
        FixedOffset::east_opt(0).unwrap()
    }

    fn now() -> i64 {
        utc().with_ymd_and_hms(2025, 7, 4, 10, 0, 0).unwrap().timestamp()
    }

    fn leads(count: usize) -> Vec<Lead> {
        (0..count)
            .map(|index| Lead {
                id: LeadId::new(),
                name: format!("Lead {index}"),
                email: format!("lead{index}@example.com"),
                company: None,
                subject: None,
                message: "FONTE INDICADA:\n- Empresa: Mina Azul\n- Localização: Chile".to_string(),
                channel: Channel::new("otr").unwrap(),
                status: if index % 2 == 0 {
                    LeadStatus::Converted
                } else {
                    LeadStatus::Pending
                },
                created_at: now() - index as i64 * 3600,
                updated_at: now(),
            })
            .collect()
    }

    #[test]
    fn filename_uses_slug_and_date() {
        assert_eq!(
            report_filename(ReportKind::Otr, now(), utc(), "pdf"),
            "otr-report-2025-07-04.pdf"
        );
        assert_eq!(
            report_filename(ReportKind::Leads, now(), utc(), "csv"),
            "leads-report-2025-07-04.csv"
        );
    }

    #[test]
    fn rows_are_truncated_with_overflow_note() {
        let doc = build_report(ReportKind::Otr, &leads(30), "all leads", now(), utc(), REPORT_ROW_LIMIT);
        assert_eq!(doc.total, 30);
        assert_eq!(doc.rows.len(), 25);
        assert_eq!(doc.hidden_rows, 5);
        assert_eq!(doc.rows[0].company, "Mina Azul");
        assert_eq!(doc.rows[0].location, "Chile");

        let pages = paginate(&doc, 48);
        let last = pages.last().unwrap().lines.last().unwrap();
        assert_eq!(last.style, LineStyle::Note);
        assert_eq!(last.text, "... and 5 more records not shown");
    }

    #[test]
    fn small_set_has_no_overflow() {
        let doc = build_report(ReportKind::Leads, &leads(3), "all leads", now(), utc(), REPORT_ROW_LIMIT);
        assert_eq!(doc.hidden_rows, 0);
        assert_eq!(overflow_note(doc.hidden_rows), None);
        let conversion = doc
            .summary
            .iter()
            .find(|(label, _)| label == "Conversion rate")
            .unwrap();
        assert_eq!(conversion.1, "67%");
    }

    #[test]
    fn paginate_starts_with_cover_and_repeats_table_header() {
        let doc = build_report(ReportKind::Otr, &leads(25), "status Converted", now(), utc(), REPORT_ROW_LIMIT);
        let pages = paginate(&doc, 10);
        assert_eq!(pages[0].lines[0].style, LineStyle::Title);
        assert!(pages.iter().all(|page| page.lines.len() <= 10));
        for (index, page) in pages.iter().enumerate() {
            assert_eq!(page.number, index + 1);
        }

        let record_pages: Vec<_> = pages
            .iter()
            .filter(|page| page.lines.iter().any(|line| line.style == LineStyle::TableRow))
            .collect();
        assert!(record_pages.len() > 1);
        for page in record_pages {
            assert!(page
                .lines
                .iter()
                .any(|line| line.style == LineStyle::TableHeader));
        }
        let row_count: usize = pages
            .iter()
            .flat_map(|page| page.lines.iter())
            .filter(|line| line.style == LineStyle::TableRow)
            .count();
        assert_eq!(row_count, 25);
    }

    #[test]
    fn empty_report_still_paginates() {
        let doc = build_report(ReportKind::Leads, &[], "all leads", now(), utc(), REPORT_ROW_LIMIT);
        let pages = paginate(&doc, 48);
        assert_eq!(pages.len(), 3);
        assert!(pages[2]
            .lines
            .iter()
            .any(|line| line.text == "No records match the current filter"));
    }

    #[test]
    fn clip_marks_truncation() {
        assert_eq!(clip("short", 10), "short");
        assert_eq!(clip("Mineração Três Irmãos", 10), "Mineração…");
    }
}
