use crate::commands::leads::print_parsed;
use crate::commands::{print_json, Context};
use crate::util::{parse_lead_id, read_stdin};
use anyhow::{Context as _, Result};
use clap::Args;
use std::fs;
use std::path::PathBuf;
use treadline_core::otr::parse_otr_message;

#[derive(Debug, Args)]
pub struct ParseArgs {
    /// Parse a stored lead's message instead of stdin
    #[arg(long, conflicts_with = "file")]
    pub lead: Option<String>,
    #[arg(long)]
    pub file: Option<PathBuf>,
}

pub fn parse_message(ctx: &Context<'_>, args: ParseArgs) -> Result<()> {
    let message = if let Some(raw) = args.lead {
        let id = parse_lead_id(&raw)?;
        ctx.store.leads().get_required(id)?.message
    } else if let Some(path) = args.file {
        fs::read_to_string(&path).with_context(|| format!("read {}", path.display()))?
    } else {
        read_stdin()?.unwrap_or_default()
    };

    let parsed = parse_otr_message(&message);
    if ctx.json {
        return print_json(&parsed);
    }
    if parsed.is_empty() {
        println!("no OTR fields found");
        return Ok(());
    }
    print_parsed(&parsed);
    Ok(())
}
