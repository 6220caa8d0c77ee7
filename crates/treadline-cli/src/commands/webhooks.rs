use crate::commands::{print_json, Context};
use crate::util::{format_timestamp_date, now_utc, parse_webhook_id};
use anyhow::Result;
use clap::{Args, Subcommand};
use treadline_core::domain::{
    format_webhook_events, parse_webhook_events, NotificationWebhook, WebhookKind,
};
use treadline_store::repo::WebhookNew;

#[derive(Debug, Subcommand)]
pub enum WebhookCommand {
    Add(AddWebhookArgs),
    Ls(ListWebhooksArgs),
    /// Flip a webhook between active and inactive
    Toggle(WebhookIdArgs),
    Rm(WebhookIdArgs),
}

#[derive(Debug, Args)]
pub struct AddWebhookArgs {
    #[arg(long)]
    pub name: String,
    #[arg(long)]
    pub url: String,
    /// slack|teams|discord
    #[arg(long = "type", default_value = "slack")]
    pub kind: String,
    /// Comma list of lead_approved,lead_converted,lead_rejected
    #[arg(long, default_value = "lead_approved,lead_converted")]
    pub events: String,
}

#[derive(Debug, Args)]
pub struct ListWebhooksArgs {}

#[derive(Debug, Args)]
pub struct WebhookIdArgs {
    pub id: String,
}

pub fn add_webhook(ctx: &Context<'_>, args: AddWebhookArgs) -> Result<()> {
    let kind: WebhookKind = args.kind.parse()?;
    let events = parse_webhook_events(&args.events)?;
    let webhook = ctx.store.webhooks().create(
        now_utc(),
        WebhookNew {
            name: args.name,
            url: args.url,
            kind,
            events,
        },
    )?;
    if ctx.json {
        print_json(&webhook)?;
    } else {
        println!("added webhook {} {}", webhook.id, webhook.name);
    }
    Ok(())
}

pub fn list_webhooks(ctx: &Context<'_>, _args: ListWebhooksArgs) -> Result<()> {
    let webhooks = ctx.store.webhooks().list()?;
    if ctx.json {
        return print_json(&webhooks);
    }
    if webhooks.is_empty() {
        println!("no webhooks");
        return Ok(());
    }
    for webhook in &webhooks {
        print_webhook(webhook);
    }
    Ok(())
}

pub fn toggle_webhook(ctx: &Context<'_>, args: WebhookIdArgs) -> Result<()> {
    let id = parse_webhook_id(&args.id)?;
    let webhook = ctx.store.webhooks().toggle(id)?;
    if ctx.json {
        print_json(&webhook)?;
    } else {
        print_webhook(&webhook);
    }
    Ok(())
}

pub fn remove_webhook(ctx: &Context<'_>, args: WebhookIdArgs) -> Result<()> {
    let id = parse_webhook_id(&args.id)?;
    ctx.store.webhooks().delete(id)?;
    if ctx.json {
        print_json(&serde_json::json!({ "deleted": id }))?;
    } else {
        println!("deleted webhook {}", id);
    }
    Ok(())
}

fn print_webhook(webhook: &NotificationWebhook) {
    println!(
        "{}  {:<8} {:<7} {}  {}  [{}]  {}",
        webhook.id,
        if webhook.is_active { "active" } else { "inactive" },
        webhook.kind,
        format_timestamp_date(webhook.created_at),
        webhook.name,
        format_webhook_events(&webhook.events),
        webhook.url
    );
}
