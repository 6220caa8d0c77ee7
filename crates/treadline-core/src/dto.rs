use crate::domain::{Lead, LeadId, LeadNote, NoteId};
use crate::otr::ParsedOtrMessage;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeadListItemDto {
    pub id: LeadId,
    pub name: String,
    pub email: String,
    pub company: Option<String>,
    pub channel: String,
    pub status: String,
    pub created_at: i64,
}

impl From<&Lead> for LeadListItemDto {
    fn from(lead: &Lead) -> Self {
        Self {
            id: lead.id,
            name: lead.name.clone(),
            email: lead.email.clone(),
            company: lead.company.clone(),
            channel: lead.channel.as_str().to_string(),
            status: lead.status.as_str().to_string(),
            created_at: lead.created_at,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoteDto {
    pub id: NoteId,
    pub note_type: String,
    pub note: String,
    pub user_id: Option<String>,
    pub created_at: i64,
}

impl From<&LeadNote> for NoteDto {
    fn from(note: &LeadNote) -> Self {
        Self {
            id: note.id,
            note_type: note.note_type.as_label(),
            note: note.note.clone(),
            user_id: note.user_id.clone(),
            created_at: note.created_at,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeadDetailDto {
    pub id: LeadId,
    pub name: String,
    pub email: String,
    pub company: Option<String>,
    pub subject: Option<String>,
    pub message: String,
    pub channel: String,
    pub status: String,
    pub created_at: i64,
    pub updated_at: i64,
    /// Present only when the message carries at least one OTR field.
    pub otr: Option<ParsedOtrMessage>,
    pub notes: Vec<NoteDto>,
}

impl LeadDetailDto {
    pub fn new(lead: &Lead, notes: &[LeadNote]) -> Self {
        let parsed = lead.parsed();
        Self {
            id: lead.id,
            name: lead.name.clone(),
            email: lead.email.clone(),
            company: lead.company.clone(),
            subject: lead.subject.clone(),
            message: lead.message.clone(),
            channel: lead.channel.as_str().to_string(),
            status: lead.status.as_str().to_string(),
            created_at: lead.created_at,
            updated_at: lead.updated_at,
            otr: (!parsed.is_empty()).then_some(parsed),
            notes: notes.iter().map(NoteDto::from).collect(),
        }
    }
}
