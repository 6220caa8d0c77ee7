use crate::commands::{print_json, Context};
use crate::util::{
    format_timestamp_date, format_timestamp_datetime, local_offset, now_utc, parse_lead_id,
    read_stdin, truncate,
};
use anyhow::{Context as _, Result};
use clap::Args;
use treadline_core::domain::{Channel, Lead, OTR_CHANNEL};
use treadline_core::dto::{LeadDetailDto, LeadListItemDto};
use treadline_core::filter::parse_filter;
use treadline_core::otr::ParsedOtrMessage;
use treadline_store::query::LeadQuery;
use treadline_store::repo::LeadNew;
use treadline_store::{LeadActions, SideEffect};

#[derive(Debug, Args)]
pub struct IntakeArgs {
    #[arg(long)]
    pub name: String,
    #[arg(long)]
    pub email: String,
    #[arg(long)]
    pub company: Option<String>,
    #[arg(long)]
    pub subject: Option<String>,
    /// Message body; read from stdin when omitted
    #[arg(long)]
    pub message: Option<String>,
    /// Originating form (defaults to `default_channel`, or `otr` for indications)
    #[arg(long)]
    pub channel: Option<String>,
    /// Send the confirmation email through `send-contact-email`
    #[arg(long)]
    pub notify: bool,
    #[command(flatten)]
    pub otr: OtrArgs,
}

/// Fields of an OTR indication. Any of them switches intake to the
/// indication message format.
#[derive(Debug, Args, Default)]
pub struct OtrArgs {
    #[arg(long)]
    pub indicator_company: Option<String>,
    #[arg(long)]
    pub indicator_phone: Option<String>,
    #[arg(long)]
    pub source_type: Option<String>,
    #[arg(long)]
    pub source_company: Option<String>,
    #[arg(long)]
    pub source_contact: Option<String>,
    #[arg(long)]
    pub source_phone: Option<String>,
    #[arg(long)]
    pub source_email: Option<String>,
    #[arg(long)]
    pub location: Option<String>,
    #[arg(long)]
    pub volume: Option<String>,
    #[arg(long)]
    pub tire_types: Option<String>,
}

impl OtrArgs {
    fn is_empty(&self) -> bool {
        [
            &self.indicator_company,
            &self.indicator_phone,
            &self.source_type,
            &self.source_company,
            &self.source_contact,
            &self.source_phone,
            &self.source_email,
            &self.location,
            &self.volume,
            &self.tire_types,
        ]
        .iter()
        .all(|value| value.is_none())
    }

    fn compose(self, name: &str, email: &str, details: &str) -> String {
        let value = |field: Option<String>| field.map(|v| v.trim().to_string()).unwrap_or_default();
        ParsedOtrMessage {
            indicator_name: name.trim().to_string(),
            indicator_company: value(self.indicator_company),
            indicator_phone: value(self.indicator_phone),
            indicator_email: email.trim().to_string(),
            source_type: value(self.source_type),
            source_company: value(self.source_company),
            source_contact: value(self.source_contact),
            source_phone: value(self.source_phone),
            source_email: value(self.source_email),
            location: value(self.location),
            estimated_volume: value(self.volume),
            tire_types: value(self.tire_types),
            details: details.trim().to_string(),
        }
        .to_message()
    }
}

#[derive(Debug, Args)]
pub struct ListArgs {
    /// Filter expression, e.g. `status:pending #otr since:2025-01-01 mining`
    #[arg(long)]
    pub filter: Option<String>,
    #[arg(long)]
    pub limit: Option<usize>,
}

#[derive(Debug, Args)]
pub struct ShowArgs {
    pub id: String,
}

#[derive(Debug, Args)]
pub struct DeleteArgs {
    pub id: String,
}

pub fn intake(ctx: &Context<'_>, args: IntakeArgs) -> Result<()> {
    let body = match args.message {
        Some(message) => message,
        None => read_stdin()?.unwrap_or_default(),
    };
    let is_otr = !args.otr.is_empty();
    let message = if is_otr {
        args.otr.compose(&args.name, &args.email, &body)
    } else {
        body.trim_end().to_string()
    };
    let channel = match args.channel.as_deref() {
        Some(raw) => Channel::new(raw)?,
        None if is_otr => Channel::new(OTR_CHANNEL)?,
        None => ctx.config.default_channel.clone(),
    };

    let outcome = LeadActions::new(ctx.store, ctx.functions).intake(
        now_utc(),
        LeadNew {
            name: args.name,
            email: args.email,
            company: args.company,
            subject: args.subject,
            message,
            channel,
        },
        args.notify,
    )?;

    if let SideEffect::Failed(reason) = &outcome.email {
        eprintln!("warning: confirmation email not sent: {}", reason);
    }
    if ctx.json {
        print_json(&outcome.lead)?;
    } else {
        println!("created {} {}", outcome.lead.id, outcome.lead.name);
    }
    Ok(())
}

/// Leads matching `filter` (all leads when `None`), newest first, and a
/// description of the filter for report headers.
pub fn load_filtered(
    ctx: &Context<'_>,
    filter: Option<&str>,
    default_channel: Option<&str>,
) -> Result<(Vec<Lead>, String)> {
    let filter = parse_filter(filter.unwrap_or_default())?;
    let mut query = LeadQuery::from_filter(&filter)?;
    let mut description = filter.describe();
    if query.channel.is_none() {
        if let Some(channel) = default_channel {
            let channel = Channel::new(channel)?;
            description = if description == "all leads" {
                format!("channel {}", channel)
            } else {
                format!("channel {}, {}", channel, description)
            };
            query.channel = Some(channel);
        }
    }
    let leads = ctx
        .store
        .leads()
        .list_leads(&query, local_offset())
        .with_context(|| "list leads")?;
    Ok((leads, description))
}

pub fn list_leads(ctx: &Context<'_>, args: ListArgs) -> Result<()> {
    let (mut leads, _) = load_filtered(ctx, args.filter.as_deref(), None)?;
    if let Some(limit) = args.limit {
        leads.truncate(limit);
    }

    if ctx.json {
        let items: Vec<LeadListItemDto> = leads.iter().map(LeadListItemDto::from).collect();
        return print_json(&items);
    }

    if leads.is_empty() {
        println!("no leads");
        return Ok(());
    }
    for lead in &leads {
        println!(
            "{}  {}  {:<11}  {:<10}  {}{}",
            lead.id,
            format_timestamp_date(lead.created_at),
            truncate(lead.status.label(), 11),
            truncate(lead.channel.as_str(), 10),
            lead.name,
            lead.company
                .as_deref()
                .map(|company| format!(" ({})", company))
                .unwrap_or_default()
        );
    }
    Ok(())
}

pub fn show_lead(ctx: &Context<'_>, args: ShowArgs) -> Result<()> {
    let id = parse_lead_id(&args.id)?;
    let lead = ctx.store.leads().get_required(id)?;
    let notes = ctx.store.notes().list_for_lead(id)?;
    let detail = LeadDetailDto::new(&lead, &notes);

    if ctx.json {
        return print_json(&detail);
    }

    println!("{}", lead.name);
    println!("  id:       {}", lead.id);
    println!("  email:    {}", lead.email);
    if let Some(company) = &lead.company {
        println!("  company:  {}", company);
    }
    if let Some(subject) = &lead.subject {
        println!("  subject:  {}", subject);
    }
    println!("  channel:  {}", lead.channel);
    println!("  status:   {}", lead.status.label());
    println!("  created:  {}", format_timestamp_datetime(lead.created_at));
    println!("  updated:  {}", format_timestamp_datetime(lead.updated_at));

    match &detail.otr {
        Some(parsed) => print_parsed(parsed),
        None => {
            if !lead.message.trim().is_empty() {
                println!();
                println!("message:");
                for line in lead.message.lines() {
                    println!("  {}", line);
                }
            }
        }
    }

    println!();
    if notes.is_empty() {
        println!("notes: none");
    } else {
        println!("notes:");
        for note in &notes {
            println!(
                "  {} [{}] {}",
                format_timestamp_datetime(note.created_at),
                note.note_type.as_label(),
                note.note
            );
        }
    }
    Ok(())
}

pub fn print_parsed(parsed: &ParsedOtrMessage) {
    let sections: [(&str, Vec<(&str, &String)>); 2] = [
        (
            "indicator",
            vec![
                ("name", &parsed.indicator_name),
                ("company", &parsed.indicator_company),
                ("phone", &parsed.indicator_phone),
                ("email", &parsed.indicator_email),
            ],
        ),
        (
            "source",
            vec![
                ("type", &parsed.source_type),
                ("company", &parsed.source_company),
                ("contact", &parsed.source_contact),
                ("phone", &parsed.source_phone),
                ("email", &parsed.source_email),
                ("location", &parsed.location),
                ("volume", &parsed.estimated_volume),
                ("tire types", &parsed.tire_types),
            ],
        ),
    ];
    for (title, fields) in sections {
        if fields.iter().all(|(_, value)| value.is_empty()) {
            continue;
        }
        println!();
        println!("{}:", title);
        for (label, value) in fields {
            if !value.is_empty() {
                println!("  {:<11} {}", format!("{}:", label), value);
            }
        }
    }
    if !parsed.details.is_empty() {
        println!();
        println!("details:");
        for line in parsed.details.lines() {
            println!("  {}", line);
        }
    }
}

pub fn delete_lead(ctx: &Context<'_>, args: DeleteArgs) -> Result<()> {
    let id = parse_lead_id(&args.id)?;
    ctx.store.leads().delete(id)?;
    if ctx.json {
        print_json(&serde_json::json!({ "deleted": id }))?;
    } else {
        println!("deleted {}", id);
    }
    Ok(())
}
