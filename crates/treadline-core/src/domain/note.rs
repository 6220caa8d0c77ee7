use crate::domain::ids::{LeadId, NoteId};
use crate::error::CoreError;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum NoteType {
    StatusChange,
    Note,
    Email,
    Call,
    Meeting,
    Other(String),
}

impl NoteType {
    pub fn other(label: &str) -> Result<Self, CoreError> {
        let trimmed = label.trim();
        if trimmed.is_empty() {
            return Err(CoreError::InvalidNoteTypeLabel);
        }
        Ok(Self::Other(trimmed.to_ascii_lowercase()))
    }

    pub fn parse(raw: &str) -> Result<Self, CoreError> {
        let trimmed = raw.trim();
        let lower = trimmed.to_ascii_lowercase();
        match lower.as_str() {
            "status_change" => Ok(NoteType::StatusChange),
            "note" => Ok(NoteType::Note),
            "email" => Ok(NoteType::Email),
            "call" => Ok(NoteType::Call),
            "meeting" => Ok(NoteType::Meeting),
            _ => match lower.strip_prefix("other:") {
                Some(_) => NoteType::other(&trimmed[6..]),
                None => Err(CoreError::InvalidNoteTypeLabel),
            },
        }
    }

    pub fn as_label(&self) -> String {
        match self {
            NoteType::StatusChange => "status_change".to_string(),
            NoteType::Note => "note".to_string(),
            NoteType::Email => "email".to_string(),
            NoteType::Call => "call".to_string(),
            NoteType::Meeting => "meeting".to_string(),
            NoteType::Other(label) => format!("other:{}", label),
        }
    }
}

impl fmt::Display for NoteType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.as_label())
    }
}

impl TryFrom<String> for NoteType {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        NoteType::parse(&value)
    }
}

impl From<NoteType> for String {
    fn from(value: NoteType) -> Self {
        value.as_label()
    }
}

/// Append-only audit entry attached to a lead.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeadNote {
    pub id: NoteId,
    pub contact_id: LeadId,
    pub user_id: Option<String>,
    pub note: String,
    pub note_type: NoteType,
    pub created_at: i64,
}
