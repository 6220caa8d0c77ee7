use crate::commands::{print_json, Context};
use crate::util::{local_offset, now_utc};
use anyhow::Result;
use clap::{Args, Subcommand};
use treadline_core::analytics::goal_progress;
use treadline_core::domain::validate_goal_period;
use treadline_core::time::YearMonth;
use treadline_store::repo::GoalUpsert;

#[derive(Debug, Subcommand)]
pub enum GoalCommand {
    /// Create or replace the targets of a month
    Set(SetGoalArgs),
    Ls(ListGoalsArgs),
    /// Compare a month's targets with its actual leads
    Progress(ProgressArgs),
}

#[derive(Debug, Args)]
pub struct SetGoalArgs {
    #[arg(long)]
    pub month: u32,
    #[arg(long)]
    pub year: i32,
    #[arg(long)]
    pub leads: i64,
    #[arg(long)]
    pub conversions: i64,
    #[arg(long)]
    pub notes: Option<String>,
}

#[derive(Debug, Args)]
pub struct ListGoalsArgs {}

#[derive(Debug, Args)]
pub struct ProgressArgs {
    /// Defaults to the current local month
    #[arg(long, requires = "year")]
    pub month: Option<u32>,
    #[arg(long, requires = "month")]
    pub year: Option<i32>,
}

pub fn set_goal(ctx: &Context<'_>, args: SetGoalArgs) -> Result<()> {
    let goal = ctx.store.goals().upsert(
        now_utc(),
        GoalUpsert {
            month: args.month,
            year: args.year,
            target_leads: args.leads,
            target_conversions: args.conversions,
            notes: args.notes,
        },
    )?;
    if ctx.json {
        print_json(&goal)?;
    } else {
        println!(
            "goal {}: {} leads, {} conversions",
            goal.period_label(),
            goal.target_leads,
            goal.target_conversions
        );
    }
    Ok(())
}

pub fn list_goals(ctx: &Context<'_>, _args: ListGoalsArgs) -> Result<()> {
    let goals = ctx.store.goals().list()?;
    if ctx.json {
        return print_json(&goals);
    }
    if goals.is_empty() {
        println!("no goals");
        return Ok(());
    }
    for goal in &goals {
        println!(
            "{}  leads {:>4}  conversions {:>4}{}",
            goal.period_label(),
            goal.target_leads,
            goal.target_conversions,
            goal.notes
                .as_deref()
                .map(|notes| format!("  {}", notes))
                .unwrap_or_default()
        );
    }
    Ok(())
}

pub fn show_progress(ctx: &Context<'_>, args: ProgressArgs) -> Result<()> {
    let offset = local_offset();
    let period = match (args.month, args.year) {
        (Some(month), Some(year)) => YearMonth::new(year, month),
        _ => YearMonth::of_timestamp(now_utc(), offset),
    };
    validate_goal_period(period.month, period.year)?;

    let goal = ctx
        .store
        .goals()
        .get_for_period(period.month, period.year)?
        .ok_or_else(|| crate::error::not_found(format!("no goal for {}", period.key())))?;
    let leads = ctx.store.leads().list_all()?;
    let progress = goal_progress(&goal, &leads, offset);

    if ctx.json {
        return print_json(&progress);
    }
    println!("{}", progress.period);
    println!(
        "  leads:       {:>4} / {:<4} {:>3}%",
        progress.actual_leads, progress.target_leads, progress.leads_pct
    );
    println!(
        "  conversions: {:>4} / {:<4} {:>3}%",
        progress.actual_conversions, progress.target_conversions, progress.conversions_pct
    );
    Ok(())
}
