use crate::commands::{print_json, Context};
use crate::util::{now_utc, parse_lead_id};
use anyhow::Result;
use clap::Args;
use serde::Serialize;
use treadline_core::domain::LeadStatus;
use treadline_store::{SideEffect, StatusWorkflow};

#[derive(Debug, Args)]
pub struct StatusArgs {
    pub id: String,
    /// pending|approved|contacted|negotiating|converted|rejected, or any other label
    pub status: String,
    /// Notify the indicator on approval (defaults to `workflow.notify_on_approval`)
    #[arg(long, conflicts_with = "no_notify")]
    pub notify: bool,
    #[arg(long)]
    pub no_notify: bool,
    #[arg(long)]
    pub user: Option<String>,
}

#[derive(Debug, Serialize)]
struct StatusChangeDto {
    id: String,
    previous: String,
    status: String,
    note: Option<String>,
    approval_notification: String,
    webhook_notification: String,
}

fn effect_label(effect: &SideEffect) -> String {
    match effect {
        SideEffect::Skipped => "skipped".to_string(),
        SideEffect::Completed => "sent".to_string(),
        SideEffect::Failed(reason) => format!("failed: {}", reason),
    }
}

pub fn set_status(ctx: &Context<'_>, args: StatusArgs) -> Result<()> {
    let id = parse_lead_id(&args.id)?;
    let status = LeadStatus::parse_input(&args.status);
    if status.as_str().is_empty() {
        return Err(crate::error::invalid_input("status cannot be empty"));
    }
    let send_notification = if args.notify {
        true
    } else if args.no_notify {
        false
    } else {
        ctx.config.workflow.notify_on_approval
    };

    let outcome = StatusWorkflow::new(ctx.store, ctx.functions)
        .with_user(args.user)
        .apply(now_utc(), id, status, send_notification)?;

    for (what, reason) in outcome.failures() {
        eprintln!("warning: {} failed: {}", what, reason);
    }

    if ctx.json {
        return print_json(&StatusChangeDto {
            id: outcome.lead.id.to_string(),
            previous: outcome.previous.as_str().to_string(),
            status: outcome.lead.status.as_str().to_string(),
            note: outcome.note.as_ref().map(|note| note.note.clone()),
            approval_notification: effect_label(&outcome.approval),
            webhook_notification: effect_label(&outcome.webhook),
        });
    }

    println!(
        "{}: {} -> {}",
        outcome.lead.id,
        outcome.previous.label(),
        outcome.lead.status.label()
    );
    if outcome.approval != SideEffect::Skipped {
        println!("  approval notification: {}", effect_label(&outcome.approval));
    }
    if outcome.webhook != SideEffect::Skipped {
        println!("  webhook notification: {}", effect_label(&outcome.webhook));
    }
    Ok(())
}
