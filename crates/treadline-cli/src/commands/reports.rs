use crate::commands::{print_json, Context};
use crate::util::{local_offset, now_utc};
use anyhow::Result;
use clap::Args;
use serde::Serialize;
use treadline_core::analytics::AnalyticsSnapshot;
use treadline_store::actions::weekly_report;
use treadline_store::{LeadActions, WeeklyReport};

#[derive(Debug, Args)]
pub struct WeeklyReportArgs {
    /// Print the summary without calling `send-weekly-report`
    #[arg(long)]
    pub dry_run: bool,
}

#[derive(Debug, Serialize)]
struct WeeklyReportDto<'a> {
    period_start: &'a str,
    period_end: &'a str,
    sent: bool,
    snapshot: &'a AnalyticsSnapshot,
}

pub fn weekly(ctx: &Context<'_>, args: WeeklyReportArgs) -> Result<()> {
    let now = now_utc();
    let offset = local_offset();
    let months = ctx.config.analytics_months;
    let report: WeeklyReport = if args.dry_run {
        weekly_report(ctx.store, now, offset, months)?
    } else {
        LeadActions::new(ctx.store, ctx.functions).send_weekly_report(now, offset, months)?
    };
    let sent = !args.dry_run;

    if ctx.json {
        return print_json(&WeeklyReportDto {
            period_start: &report.period_start,
            period_end: &report.period_end,
            sent,
            snapshot: &report.snapshot,
        });
    }

    println!("{} .. {}", report.period_start, report.period_end);
    println!(
        "  leads {}  converted {}  conversion rate {}%",
        report.snapshot.total, report.snapshot.converted, report.snapshot.conversion_rate
    );
    for bucket in &report.snapshot.by_status {
        println!("  {:<12} {:>4}", bucket.label, bucket.count);
    }
    if sent {
        println!("weekly report sent");
    }
    Ok(())
}
