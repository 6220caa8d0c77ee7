use crate::changes::{ChangeNotifier, StoreChange};
use crate::error::{Result, StoreError};
use rusqlite::{params, Connection};
use std::collections::BTreeSet;
use std::str::FromStr;
use treadline_core::domain::{
    format_webhook_events, parse_webhook_events, NotificationWebhook, WebhookEvent, WebhookId,
    WebhookKind,
};
use url::Url;

#[derive(Debug, Clone)]
pub struct WebhookNew {
    pub name: String,
    pub url: String,
    pub kind: WebhookKind,
    pub events: BTreeSet<WebhookEvent>,
}

pub struct WebhooksRepo<'a> {
    conn: &'a Connection,
    changes: &'a ChangeNotifier,
}

impl<'a> WebhooksRepo<'a> {
    pub fn new(conn: &'a Connection, changes: &'a ChangeNotifier) -> Self {
        Self { conn, changes }
    }

    pub fn create(&self, now_utc: i64, input: WebhookNew) -> Result<NotificationWebhook> {
        let webhook = NotificationWebhook {
            id: WebhookId::new(),
            name: input.name.trim().to_string(),
            url: validate_webhook_url(&input.url)?,
            kind: input.kind,
            is_active: true,
            events: input.events,
            created_at: now_utc,
        };
        webhook.validate()?;

        self.conn.execute(
            "INSERT INTO notification_webhooks (id, name, url, kind, is_active, events, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7);",
            params![
                webhook.id.to_string(),
                webhook.name,
                webhook.url,
                webhook.kind.as_str(),
                webhook.is_active,
                format_webhook_events(&webhook.events),
                webhook.created_at,
            ],
        )?;
        self.changes.publish(StoreChange::WebhooksChanged);
        Ok(webhook)
    }

    pub fn get(&self, id: WebhookId) -> Result<Option<NotificationWebhook>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, name, url, kind, is_active, events, created_at
             FROM notification_webhooks WHERE id = ?1;",
        )?;
        let mut rows = stmt.query([id.to_string()])?;
        if let Some(row) = rows.next()? {
            Ok(Some(webhook_from_row(row)?))
        } else {
            Ok(None)
        }
    }

    pub fn list(&self) -> Result<Vec<NotificationWebhook>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, name, url, kind, is_active, events, created_at
             FROM notification_webhooks ORDER BY created_at ASC, name ASC;",
        )?;
        let mut rows = stmt.query([])?;
        let mut webhooks = Vec::new();
        while let Some(row) = rows.next()? {
            webhooks.push(webhook_from_row(row)?);
        }
        Ok(webhooks)
    }

    /// Flips `is_active` and returns the updated webhook.
    pub fn toggle(&self, id: WebhookId) -> Result<NotificationWebhook> {
        let updated = self.conn.execute(
            "UPDATE notification_webhooks SET is_active = NOT is_active WHERE id = ?1;",
            [id.to_string()],
        )?;
        if updated == 0 {
            return Err(StoreError::NotFound(id.to_string()));
        }
        self.changes.publish(StoreChange::WebhooksChanged);
        self.get(id)?
            .ok_or_else(|| StoreError::NotFound(id.to_string()))
    }

    pub fn delete(&self, id: WebhookId) -> Result<()> {
        let deleted = self.conn.execute(
            "DELETE FROM notification_webhooks WHERE id = ?1;",
            [id.to_string()],
        )?;
        if deleted == 0 {
            return Err(StoreError::NotFound(id.to_string()));
        }
        self.changes.publish(StoreChange::WebhooksChanged);
        Ok(())
    }
}

pub fn validate_webhook_url(raw: &str) -> Result<String> {
    let trimmed = raw.trim();
    let url = Url::parse(trimmed).map_err(|_| StoreError::InvalidWebhookUrl(raw.to_string()))?;
    if url.scheme() != "https" || url.host_str().is_none() {
        return Err(StoreError::InvalidWebhookUrl(raw.to_string()));
    }
    Ok(trimmed.to_string())
}

fn webhook_from_row(row: &rusqlite::Row<'_>) -> Result<NotificationWebhook> {
    let id_str: String = row.get(0)?;
    let id = WebhookId::from_str(&id_str).map_err(|_| StoreError::InvalidId(id_str.clone()))?;
    let kind_raw: String = row.get(3)?;
    let kind = WebhookKind::from_str(&kind_raw).map_err(|_| StoreError::InvalidStoredValue {
        field: "kind",
        value: kind_raw.clone(),
    })?;
    let events_raw: String = row.get(5)?;
    let events = parse_webhook_events(&events_raw).map_err(|_| StoreError::InvalidStoredValue {
        field: "events",
        value: events_raw.clone(),
    })?;
    Ok(NotificationWebhook {
        id,
        name: row.get(1)?,
        url: row.get(2)?,
        kind,
        is_active: row.get(4)?,
        events,
        created_at: row.get(6)?,
    })
}
