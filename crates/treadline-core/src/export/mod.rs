mod csv;
mod report;

use thiserror::Error;

pub use self::csv::{leads_to_csv, CSV_HEADER};
pub use report::{
    build_report, overflow_note, paginate, report_filename, LineStyle, ReportDocument, ReportKind,
    ReportLine, ReportPage, ReportRow, ReportSection, LINES_PER_PAGE, REPORT_ROW_LIMIT,
};

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("csv error: {0}")]
    Csv(#[from] ::csv::Error),
    #[error("csv buffer error: {0}")]
    Buffer(String),
    #[error("export output is not utf-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
}
