use anyhow::{anyhow, Result};
use chrono::FixedOffset;
use std::io::{self, IsTerminal, Read};
use std::str::FromStr;
use treadline_core::domain::{LeadId, NoteType, WebhookId};
use treadline_core::time;

pub fn now_utc() -> i64 {
    time::now_utc()
}

pub fn local_offset() -> FixedOffset {
    time::local_offset()
}

pub fn format_timestamp_date(ts: i64) -> String {
    time::format_timestamp_date(ts, local_offset())
}

pub fn format_timestamp_datetime(ts: i64) -> String {
    time::format_timestamp_datetime(ts, local_offset())
}

pub fn parse_lead_id(raw: &str) -> Result<LeadId> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(anyhow!("lead id cannot be empty"));
    }
    LeadId::from_str(trimmed).map_err(|_| anyhow!("invalid lead id"))
}

pub fn parse_webhook_id(raw: &str) -> Result<WebhookId> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(anyhow!("webhook id cannot be empty"));
    }
    WebhookId::from_str(trimmed).map_err(|_| anyhow!("invalid webhook id"))
}

/// Note types an admin may write by hand; `status_change` is reserved for
/// the workflow.
pub fn parse_manual_note_type(raw: &str) -> Result<NoteType> {
    match NoteType::parse(raw) {
        Ok(NoteType::StatusChange) => Err(anyhow!(
            "status_change notes are written by the status workflow"
        )),
        Ok(kind) => Ok(kind),
        Err(_) => Err(anyhow!(
            "invalid note type: expected note|email|call|meeting|other:<label>"
        )),
    }
}

/// Reads all of stdin unless it is a terminal.
pub fn read_stdin() -> Result<Option<String>> {
    let stdin = io::stdin();
    if stdin.is_terminal() {
        return Ok(None);
    }
    let mut buffer = String::new();
    stdin.lock().read_to_string(&mut buffer)?;
    Ok(Some(buffer))
}

pub fn truncate(value: &str, width: usize) -> String {
    if value.chars().count() <= width {
        return value.to_string();
    }
    let mut out: String = value.chars().take(width.saturating_sub(1)).collect();
    out.push('…');
    out
}

#[cfg(test)]
mod tests {
    use super::{parse_manual_note_type, truncate};
    use treadline_core::domain::NoteType;

    #[test]
    fn manual_note_type_rejects_status_change() {
        assert!(parse_manual_note_type("status_change").is_err());
        assert_eq!(parse_manual_note_type("Call").unwrap(), NoteType::Call);
        assert_eq!(
            parse_manual_note_type("other:visit").unwrap(),
            NoteType::Other("visit".to_string())
        );
    }

    #[test]
    fn truncate_counts_chars() {
        assert_eq!(truncate("Mineração", 20), "Mineração");
        assert_eq!(truncate("Mineração", 5), "Mine…");
    }
}
