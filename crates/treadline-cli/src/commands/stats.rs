use crate::commands::leads::load_filtered;
use crate::commands::{print_json, Context};
use crate::error::invalid_input;
use crate::util::{local_offset, now_utc};
use anyhow::Result;
use clap::Args;
use treadline_core::analytics::{summarize, BucketCount};

const MAX_TREND_MONTHS: usize = 24;

#[derive(Debug, Args)]
pub struct StatsArgs {
    #[arg(long)]
    pub filter: Option<String>,
    /// Months in the trend series (defaults to `analytics_months`)
    #[arg(long)]
    pub months: Option<usize>,
}

pub fn show_stats(ctx: &Context<'_>, args: StatsArgs) -> Result<()> {
    let months = args.months.unwrap_or(ctx.config.analytics_months);
    if months == 0 || months > MAX_TREND_MONTHS {
        return Err(invalid_input(format!(
            "months must be between 1 and {}",
            MAX_TREND_MONTHS
        )));
    }
    let (leads, description) = load_filtered(ctx, args.filter.as_deref(), None)?;
    let snapshot = summarize(&leads, now_utc(), local_offset(), months);

    if ctx.json {
        return print_json(&snapshot);
    }

    println!("{}", description);
    println!(
        "total {}  converted {}  conversion rate {}%",
        snapshot.total, snapshot.converted, snapshot.conversion_rate
    );
    print_buckets("status", &snapshot.by_status);
    print_buckets("channel", &snapshot.by_channel);
    print_buckets("region", &snapshot.by_region);
    print_buckets("source type", &snapshot.by_source_type);

    println!();
    println!("monthly:");
    let widest = snapshot
        .monthly
        .iter()
        .map(|point| point.total)
        .max()
        .unwrap_or(0);
    for point in &snapshot.monthly {
        println!(
            "  {}  {:>4}  {:>4}  {:>3}%  {}",
            point.month,
            point.total,
            point.converted,
            point.conversion_rate,
            bar(point.total, widest)
        );
    }
    Ok(())
}

fn print_buckets(title: &str, buckets: &[BucketCount]) {
    if buckets.is_empty() {
        return;
    }
    println!();
    println!("{}:", title);
    for bucket in buckets {
        println!("  {:<24} {:>5}", bucket.label, bucket.count);
    }
}

fn bar(value: usize, max: usize) -> String {
    const WIDTH: usize = 30;
    if max == 0 {
        return String::new();
    }
    "#".repeat((value * WIDTH).div_ceil(max))
}
