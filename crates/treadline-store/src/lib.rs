pub mod actions;
pub mod changes;
pub mod db;
pub mod error;
pub mod migrate;
pub mod paths;
pub mod query;
pub mod repo;
pub mod workflow;

use crate::changes::{ChangeNotifier, StoreChange, Topic};
use crate::error::Result;
use rusqlite::Connection;
use std::cell::Cell;
use std::path::Path;
use std::sync::mpsc::Receiver;

pub use actions::{IntakeOutcome, LeadActions, WeeklyReport};
pub use workflow::{SideEffect, StatusChangeOutcome, StatusWorkflow};

pub struct Store {
    conn: Connection,
    changes: ChangeNotifier,
    data_version: Cell<i64>,
}

impl Store {
    pub fn open(path: &Path) -> Result<Self> {
        let conn = db::open(path)?;
        Self::with_connection(conn)
    }

    pub fn open_in_memory() -> Result<Self> {
        let conn = db::open_in_memory()?;
        Self::with_connection(conn)
    }

    fn with_connection(conn: Connection) -> Result<Self> {
        let data_version = db::data_version(&conn)?;
        Ok(Self {
            conn,
            changes: ChangeNotifier::new(),
            data_version: Cell::new(data_version),
        })
    }

    pub fn migrate(&self) -> Result<()> {
        migrate::run_migrations(&self.conn)
    }

    pub fn schema_version(&self) -> Result<i64> {
        migrate::schema_version(&self.conn)
    }

    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    pub fn changes(&self) -> &ChangeNotifier {
        &self.changes
    }

    pub fn subscribe(&self, topic: Topic) -> Receiver<StoreChange> {
        self.changes.subscribe(topic)
    }

    /// Publishes `StoreChange::External` when another connection has
    /// committed since the last poll. Returns whether it did.
    pub fn poll_external_changes(&self) -> Result<bool> {
        let current = db::data_version(&self.conn)?;
        if current == self.data_version.replace(current) {
            return Ok(false);
        }
        tracing::debug!(data_version = current, "external database change");
        self.changes.publish(StoreChange::External);
        Ok(true)
    }

    pub fn leads(&self) -> repo::LeadsRepo<'_> {
        repo::LeadsRepo::new(&self.conn, &self.changes)
    }

    pub fn notes(&self) -> repo::NotesRepo<'_> {
        repo::NotesRepo::new(&self.conn, &self.changes)
    }

    pub fn goals(&self) -> repo::GoalsRepo<'_> {
        repo::GoalsRepo::new(&self.conn, &self.changes)
    }

    pub fn webhooks(&self) -> repo::WebhooksRepo<'_> {
        repo::WebhooksRepo::new(&self.conn, &self.changes)
    }
}
