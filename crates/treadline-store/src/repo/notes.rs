use crate::changes::{ChangeNotifier, StoreChange};
use crate::error::{Result, StoreError};
use rusqlite::{params, Connection, OptionalExtension};
use std::str::FromStr;
use treadline_core::domain::{LeadId, LeadNote, NoteId, NoteType};
use treadline_core::CoreError;

#[derive(Debug, Clone)]
pub struct NoteNew {
    pub contact_id: LeadId,
    pub user_id: Option<String>,
    pub note: String,
    pub note_type: NoteType,
    pub created_at: i64,
}

pub struct NotesRepo<'a> {
    conn: &'a Connection,
    changes: &'a ChangeNotifier,
}

impl<'a> NotesRepo<'a> {
    pub fn new(conn: &'a Connection, changes: &'a ChangeNotifier) -> Self {
        Self { conn, changes }
    }

    /// Appends a note. Notes are never edited or removed on their own.
    pub fn add(&self, input: NoteNew) -> Result<LeadNote> {
        let text = input.note.trim();
        if text.is_empty() {
            return Err(CoreError::EmptyNote.into());
        }

        let exists: Option<i64> = self
            .conn
            .query_row(
                "SELECT 1 FROM contacts WHERE id = ?1;",
                [input.contact_id.to_string()],
                |row| row.get(0),
            )
            .optional()?;
        if exists.is_none() {
            return Err(StoreError::NotFound(input.contact_id.to_string()));
        }

        let note = LeadNote {
            id: NoteId::new(),
            contact_id: input.contact_id,
            user_id: input.user_id,
            note: text.to_string(),
            note_type: input.note_type,
            created_at: input.created_at,
        };
        self.conn.execute(
            "INSERT INTO lead_notes (id, contact_id, user_id, note, note_type, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6);",
            params![
                note.id.to_string(),
                note.contact_id.to_string(),
                note.user_id,
                note.note,
                note.note_type.as_label(),
                note.created_at,
            ],
        )?;
        self.changes.publish(StoreChange::NoteAdded {
            lead_id: note.contact_id,
            note_id: note.id,
        });
        Ok(note)
    }

    /// Newest first.
    pub fn list_for_lead(&self, contact_id: LeadId) -> Result<Vec<LeadNote>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, contact_id, user_id, note, note_type, created_at
             FROM lead_notes
             WHERE contact_id = ?1
             ORDER BY created_at DESC, rowid DESC;",
        )?;
        let mut rows = stmt.query([contact_id.to_string()])?;
        let mut notes = Vec::new();
        while let Some(row) = rows.next()? {
            notes.push(note_from_row(row)?);
        }
        Ok(notes)
    }

    pub fn count_for_lead(&self, contact_id: LeadId) -> Result<i64> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM lead_notes WHERE contact_id = ?1;",
            [contact_id.to_string()],
            |row| row.get(0),
        )?;
        Ok(count)
    }
}

fn note_from_row(row: &rusqlite::Row<'_>) -> Result<LeadNote> {
    let id_str: String = row.get(0)?;
    let id = NoteId::from_str(&id_str).map_err(|_| StoreError::InvalidId(id_str.clone()))?;
    let contact_raw: String = row.get(1)?;
    let contact_id =
        LeadId::from_str(&contact_raw).map_err(|_| StoreError::InvalidId(contact_raw.clone()))?;
    let type_raw: String = row.get(4)?;
    let note_type = NoteType::parse(&type_raw).map_err(|_| StoreError::InvalidStoredValue {
        field: "note_type",
        value: type_raw.clone(),
    })?;
    Ok(LeadNote {
        id,
        contact_id,
        user_id: row.get(2)?,
        note: row.get(3)?,
        note_type,
        created_at: row.get(5)?,
    })
}
