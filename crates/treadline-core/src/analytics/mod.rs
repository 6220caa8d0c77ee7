//! Chart-ready aggregations over an in-memory lead list.

mod region;

use crate::domain::{ConversionGoal, Lead, LeadStatus};
use crate::time::{trailing_months, YearMonth};
use chrono::FixedOffset;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

pub use region::{classify_region, region_labels, NOT_INFORMED, OTHER_REGION};

pub const DEFAULT_TREND_MONTHS: usize = 6;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BucketCount {
    pub label: String,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthlyPoint {
    pub month: String,
    pub total: usize,
    pub converted: usize,
    pub conversion_rate: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalyticsSnapshot {
    pub total: usize,
    pub converted: usize,
    pub conversion_rate: u32,
    pub by_status: Vec<BucketCount>,
    pub by_channel: Vec<BucketCount>,
    pub by_region: Vec<BucketCount>,
    pub by_source_type: Vec<BucketCount>,
    pub monthly: Vec<MonthlyPoint>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GoalProgress {
    pub period: String,
    pub target_leads: i64,
    pub actual_leads: usize,
    pub leads_pct: u32,
    pub target_conversions: i64,
    pub actual_conversions: usize,
    pub conversions_pct: u32,
}

/// `round(100 * part / whole)`, or 0 when `whole` is 0.
pub fn percentage(part: usize, whole: usize) -> u32 {
    if whole == 0 {
        return 0;
    }
    ((part as f64) * 100.0 / (whole as f64)).round() as u32
}

/// Leads created inside `[from, to)`; open bounds are unbounded.
pub fn filter_by_period(leads: &[Lead], from: Option<i64>, to: Option<i64>) -> Vec<Lead> {
    leads
        .iter()
        .filter(|lead| from.map_or(true, |start| lead.created_at >= start))
        .filter(|lead| to.map_or(true, |end| lead.created_at < end))
        .cloned()
        .collect()
}

pub fn count_converted(leads: &[Lead]) -> usize {
    leads
        .iter()
        .filter(|lead| lead.status == LeadStatus::Converted)
        .count()
}

/// Known statuses in pipeline order (zeros included), then any other
/// labels alphabetically.
pub fn count_by_status(leads: &[Lead]) -> Vec<BucketCount> {
    let mut known = [0usize; 6];
    let mut other: BTreeMap<String, usize> = BTreeMap::new();
    for lead in leads {
        if lead.status.is_known() {
            known[lead.status.rank()] += 1;
        } else {
            *other.entry(lead.status.as_str().to_string()).or_default() += 1;
        }
    }

    let mut buckets: Vec<BucketCount> = LeadStatus::KNOWN
        .iter()
        .zip(known)
        .map(|(status, count)| BucketCount {
            label: status.as_str().to_string(),
            count,
        })
        .collect();
    buckets.extend(
        other
            .into_iter()
            .map(|(label, count)| BucketCount { label, count }),
    );
    buckets
}

pub fn count_by_channel(leads: &[Lead]) -> Vec<BucketCount> {
    tally(leads.iter().map(|lead| lead.channel.as_str().to_string()))
}

pub fn count_by_region(leads: &[Lead]) -> Vec<BucketCount> {
    tally(
        leads
            .iter()
            .map(|lead| classify_region(&lead.parsed().location).to_string()),
    )
}

pub fn count_by_source_type(leads: &[Lead]) -> Vec<BucketCount> {
    tally(leads.iter().map(|lead| {
        let source_type = lead.parsed().source_type;
        if source_type.trim().is_empty() {
            NOT_INFORMED.to_string()
        } else {
            source_type.trim().to_string()
        }
    }))
}

/// Totals per local calendar month for the `months` months ending with the
/// month of `now_utc`, oldest first.
pub fn monthly_series(
    leads: &[Lead],
    now_utc: i64,
    offset: FixedOffset,
    months: usize,
) -> Vec<MonthlyPoint> {
    let mut per_month: HashMap<YearMonth, (usize, usize)> = HashMap::new();
    for lead in leads {
        let entry = per_month
            .entry(YearMonth::of_timestamp(lead.created_at, offset))
            .or_default();
        entry.0 += 1;
        if lead.status == LeadStatus::Converted {
            entry.1 += 1;
        }
    }

    trailing_months(now_utc, offset, months)
        .into_iter()
        .map(|month| {
            let (total, converted) = per_month.get(&month).copied().unwrap_or_default();
            MonthlyPoint {
                month: month.key(),
                total,
                converted,
                conversion_rate: percentage(converted, total),
            }
        })
        .collect()
}

pub fn summarize(
    leads: &[Lead],
    now_utc: i64,
    offset: FixedOffset,
    months: usize,
) -> AnalyticsSnapshot {
    let total = leads.len();
    let converted = count_converted(leads);
    AnalyticsSnapshot {
        total,
        converted,
        conversion_rate: percentage(converted, total),
        by_status: count_by_status(leads),
        by_channel: count_by_channel(leads),
        by_region: count_by_region(leads),
        by_source_type: count_by_source_type(leads),
        monthly: monthly_series(leads, now_utc, offset, months),
    }
}

pub fn goal_progress(goal: &ConversionGoal, leads: &[Lead], offset: FixedOffset) -> GoalProgress {
    let period = YearMonth::new(goal.year, goal.month);
    let in_period: Vec<&Lead> = leads
        .iter()
        .filter(|lead| YearMonth::of_timestamp(lead.created_at, offset) == period)
        .collect();
    let actual_leads = in_period.len();
    let actual_conversions = in_period
        .iter()
        .filter(|lead| lead.status == LeadStatus::Converted)
        .count();

    GoalProgress {
        period: period.key(),
        target_leads: goal.target_leads,
        actual_leads,
        leads_pct: percentage(actual_leads, target_to_usize(goal.target_leads)),
        target_conversions: goal.target_conversions,
        actual_conversions,
        conversions_pct: percentage(actual_conversions, target_to_usize(goal.target_conversions)),
    }
}

fn target_to_usize(target: i64) -> usize {
    usize::try_from(target).unwrap_or(0)
}

/// Counts sorted by count descending, then label.
fn tally(labels: impl Iterator<Item = String>) -> Vec<BucketCount> {
    let mut counts: BTreeMap<String, usize> = BTreeMap::new();
    for label in labels {
        *counts.entry(label).or_default() += 1;
    }
    let mut buckets: Vec<BucketCount> = counts
        .into_iter()
        .map(|(label, count)| BucketCount { label, count })
        .collect();
    buckets.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.label.cmp(&b.label)));
    buckets
}
