use crate::commands::{print_json, Context};
use crate::error::invalid_input;
use crate::util::{now_utc, parse_lead_id, parse_manual_note_type, read_stdin};
use anyhow::Result;
use clap::Args;
use treadline_core::dto::NoteDto;
use treadline_store::repo::NoteNew;
use treadline_store::LeadActions;

#[derive(Debug, Args)]
pub struct NoteArgs {
    pub id: String,
    /// note|email|call|meeting|other:<label>
    #[arg(long = "type", default_value = "note")]
    pub note_type: String,
    /// Note text; read from stdin when omitted
    #[arg(long)]
    pub note: Option<String>,
    #[arg(long)]
    pub user: Option<String>,
}

#[derive(Debug, Args)]
pub struct ReplyArgs {
    pub id: String,
    #[arg(long)]
    pub subject: String,
    /// Reply body; read from stdin when omitted
    #[arg(long)]
    pub message: Option<String>,
    #[arg(long)]
    pub user: Option<String>,
}

pub fn add_note(ctx: &Context<'_>, args: NoteArgs) -> Result<()> {
    let contact_id = parse_lead_id(&args.id)?;
    let note_type = parse_manual_note_type(&args.note_type)?;
    let text = required_text(args.note, "note")?;

    let note = ctx.store.notes().add(NoteNew {
        contact_id,
        user_id: args.user,
        note: text,
        note_type,
        created_at: now_utc(),
    })?;

    if ctx.json {
        print_json(&NoteDto::from(&note))?;
    } else {
        println!("added note {}", note.id);
    }
    Ok(())
}

pub fn reply(ctx: &Context<'_>, args: ReplyArgs) -> Result<()> {
    let id = parse_lead_id(&args.id)?;
    if args.subject.trim().is_empty() {
        return Err(invalid_input("subject cannot be empty"));
    }
    let message = required_text(args.message, "message")?;
    let note = LeadActions::new(ctx.store, ctx.functions).reply(
        now_utc(),
        id,
        &args.subject,
        &message,
        args.user,
    )?;

    if ctx.json {
        print_json(&NoteDto::from(&note))?;
    } else {
        println!("reply sent to {}", id);
    }
    Ok(())
}

fn required_text(value: Option<String>, what: &str) -> Result<String> {
    let text = match value {
        Some(value) => value,
        None => read_stdin()?.unwrap_or_default(),
    };
    if text.trim().is_empty() {
        return Err(invalid_input(format!(
            "{} is empty (provide --{} or stdin)",
            what, what
        )));
    }
    Ok(text.trim_end().to_string())
}
