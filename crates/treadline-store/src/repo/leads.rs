use crate::changes::{ChangeNotifier, StoreChange};
use crate::error::{Result, StoreError};
use crate::query::{LeadQuery, LEAD_COLUMNS};
use chrono::{FixedOffset, Offset, Utc};
use rusqlite::{params, params_from_iter, Connection};
use std::str::FromStr;
use treadline_core::domain::{parse_email, Channel, Lead, LeadId, LeadStatus};

#[derive(Debug, Clone)]
pub struct LeadNew {
    pub name: String,
    pub email: String,
    pub company: Option<String>,
    pub subject: Option<String>,
    pub message: String,
    pub channel: Channel,
}

pub struct LeadsRepo<'a> {
    conn: &'a Connection,
    changes: &'a ChangeNotifier,
}

impl<'a> LeadsRepo<'a> {
    pub fn new(conn: &'a Connection, changes: &'a ChangeNotifier) -> Self {
        Self { conn, changes }
    }

    /// Inserts a new `pending` lead.
    pub fn create(&self, now_utc: i64, input: LeadNew) -> Result<Lead> {
        let email = parse_email(&input.email)?;
        let lead = Lead {
            id: LeadId::new(),
            name: input.name.trim().to_string(),
            email,
            company: clean_optional(input.company),
            subject: clean_optional(input.subject),
            message: input.message,
            channel: input.channel,
            status: LeadStatus::Pending,
            created_at: now_utc,
            updated_at: now_utc,
        };
        lead.validate()?;

        self.conn.execute(
            "INSERT INTO contacts (id, name, email, company, subject, message, channel, status, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10);",
            params![
                lead.id.to_string(),
                lead.name,
                lead.email,
                lead.company,
                lead.subject,
                lead.message,
                lead.channel.as_str(),
                lead.status.as_str(),
                lead.created_at,
                lead.updated_at,
            ],
        )?;
        tracing::debug!(lead_id = %lead.id, channel = %lead.channel, "lead created");
        self.changes.publish(StoreChange::LeadCreated(lead.id));
        Ok(lead)
    }

    pub fn get(&self, id: LeadId) -> Result<Option<Lead>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {} FROM contacts WHERE id = ?1;",
            LEAD_COLUMNS
        ))?;
        let mut rows = stmt.query([id.to_string()])?;
        if let Some(row) = rows.next()? {
            Ok(Some(lead_from_row(row)?))
        } else {
            Ok(None)
        }
    }

    pub fn get_required(&self, id: LeadId) -> Result<Lead> {
        self.get(id)?
            .ok_or_else(|| StoreError::NotFound(id.to_string()))
    }

    pub fn list_all(&self) -> Result<Vec<Lead>> {
        self.list_leads(&LeadQuery::default(), Utc.fix())
    }

    pub fn list_leads(&self, query: &LeadQuery, local_offset: FixedOffset) -> Result<Vec<Lead>> {
        let compiled = query.to_sql(local_offset)?;
        let mut stmt = self.conn.prepare(&compiled.sql)?;
        let mut rows = stmt.query(params_from_iter(compiled.params))?;
        let mut leads = Vec::new();
        while let Some(row) = rows.next()? {
            leads.push(lead_from_row(row)?);
        }
        Ok(leads)
    }

    /// Leads created in `[from, to)`.
    pub fn list_created_between(&self, from_utc: i64, to_utc: i64) -> Result<Vec<Lead>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {} FROM contacts
             WHERE created_at >= ?1 AND created_at < ?2
             ORDER BY created_at DESC, id ASC;",
            LEAD_COLUMNS
        ))?;
        let mut rows = stmt.query(params![from_utc, to_utc])?;
        let mut leads = Vec::new();
        while let Some(row) = rows.next()? {
            leads.push(lead_from_row(row)?);
        }
        Ok(leads)
    }

    /// Overwrites the status. Last write wins.
    pub fn set_status(&self, now_utc: i64, id: LeadId, status: &LeadStatus) -> Result<Lead> {
        let updated = self.conn.execute(
            "UPDATE contacts SET status = ?2, updated_at = ?3 WHERE id = ?1;",
            params![id.to_string(), status.as_str(), now_utc],
        )?;
        if updated == 0 {
            return Err(StoreError::NotFound(id.to_string()));
        }
        self.changes.publish(StoreChange::LeadUpdated(id));
        self.get_required(id)
    }

    /// Removes the lead and, through the foreign key, its notes.
    pub fn delete(&self, id: LeadId) -> Result<()> {
        let deleted = self
            .conn
            .execute("DELETE FROM contacts WHERE id = ?1;", [id.to_string()])?;
        if deleted == 0 {
            return Err(StoreError::NotFound(id.to_string()));
        }
        tracing::debug!(lead_id = %id, "lead deleted");
        self.changes.publish(StoreChange::LeadDeleted(id));
        Ok(())
    }

    pub fn count(&self) -> Result<i64> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM contacts;", [], |row| row.get(0))?;
        Ok(count)
    }
}

fn clean_optional(value: Option<String>) -> Option<String> {
    value
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

pub(crate) fn lead_from_row(row: &rusqlite::Row<'_>) -> Result<Lead> {
    let id_str: String = row.get(0)?;
    let id = LeadId::from_str(&id_str).map_err(|_| StoreError::InvalidId(id_str.clone()))?;
    let channel_raw: String = row.get(6)?;
    let channel = Channel::new(&channel_raw).map_err(|_| StoreError::InvalidStoredValue {
        field: "channel",
        value: channel_raw.clone(),
    })?;
    let status_raw: String = row.get(7)?;
    Ok(Lead {
        id,
        name: row.get(1)?,
        email: row.get(2)?,
        company: row.get(3)?,
        subject: row.get(4)?,
        message: row.get(5)?,
        channel,
        status: LeadStatus::parse(&status_raw),
        created_at: row.get(8)?,
        updated_at: row.get(9)?,
    })
}
