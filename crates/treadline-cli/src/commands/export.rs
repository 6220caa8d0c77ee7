use crate::commands::leads::load_filtered;
use crate::commands::{print_json, Context};
use crate::pdf::render_report_pdf;
use crate::util::{local_offset, now_utc};
use anyhow::{Context as _, Result};
use clap::{Args, ValueEnum};
use std::fs;
use std::path::PathBuf;
use treadline_core::domain::OTR_CHANNEL;
use treadline_core::dto::LeadListItemDto;
use treadline_core::export::{build_report, leads_to_csv, report_filename, ReportKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ExportFormat {
    Csv,
    Pdf,
    Json,
}

impl ExportFormat {
    fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Pdf => "pdf",
            ExportFormat::Json => "json",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum KindArg {
    Leads,
    Otr,
}

impl From<KindArg> for ReportKind {
    fn from(kind: KindArg) -> Self {
        match kind {
            KindArg::Leads => ReportKind::Leads,
            KindArg::Otr => ReportKind::Otr,
        }
    }
}

#[derive(Debug, Args)]
pub struct ExportArgs {
    #[arg(value_enum)]
    pub format: ExportFormat,
    /// `otr` restricts to the otr channel unless the filter names a channel
    #[arg(long, value_enum, default_value = "leads")]
    pub kind: KindArg,
    #[arg(long)]
    pub filter: Option<String>,
    /// Output path; csv and pdf default to `<kind>-report-<date>.<ext>`,
    /// json defaults to stdout
    #[arg(long)]
    pub out: Option<PathBuf>,
}

pub fn export(ctx: &Context<'_>, args: ExportArgs) -> Result<()> {
    let kind = ReportKind::from(args.kind);
    let default_channel = match kind {
        ReportKind::Otr => Some(OTR_CHANNEL),
        ReportKind::Leads => None,
    };
    let (leads, description) = load_filtered(ctx, args.filter.as_deref(), default_channel)?;
    let now = now_utc();
    let offset = local_offset();

    let bytes = match args.format {
        ExportFormat::Json => {
            let items: Vec<LeadListItemDto> = leads.iter().map(LeadListItemDto::from).collect();
            match &args.out {
                None => return print_json(&items),
                Some(_) => serde_json::to_vec_pretty(&items)?,
            }
        }
        ExportFormat::Csv => leads_to_csv(&leads, offset)?.into_bytes(),
        ExportFormat::Pdf => {
            let report = build_report(
                kind,
                &leads,
                &description,
                now,
                offset,
                ctx.config.report_row_limit,
            );
            render_report_pdf(&report)?
        }
    };

    let path = args.out.unwrap_or_else(|| {
        PathBuf::from(report_filename(kind, now, offset, args.format.extension()))
    });
    fs::write(&path, &bytes).with_context(|| format!("write {}", path.display()))?;
    tracing::debug!(path = %path.display(), leads = leads.len(), "export written");

    if ctx.json {
        print_json(&serde_json::json!({
            "path": path.display().to_string(),
            "records": leads.len(),
        }))?;
    } else {
        println!("wrote {} ({} records)", path.display(), leads.len());
    }
    Ok(())
}
