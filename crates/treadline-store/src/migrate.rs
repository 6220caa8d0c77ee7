//! Embedded schema migrations. The applied version lives in SQLite's
//! `user_version` header field, so there is no bookkeeping table.

use crate::error::{Result, StoreError};
use rusqlite::Connection;

struct Migration {
    name: &'static str,
    sql: &'static str,
}

const MIGRATIONS: &[Migration] = &[Migration {
    name: "001_init",
    sql: include_str!("../migrations/001_init.sql"),
}];

pub fn run_migrations(conn: &Connection) -> Result<()> {
    let tx = conn.unchecked_transaction()?;
    let current = read_user_version(&tx)?;
    let latest = latest_version();
    if current > latest {
        return Err(StoreError::Migration(format!(
            "database schema {} is newer than this build ({})",
            current, latest
        )));
    }

    for (version, migration) in (1..).zip(MIGRATIONS).skip(current as usize) {
        tracing::debug!(migration = migration.name, version, "applying migration");
        tx.execute_batch(migration.sql)
            .map_err(|err| StoreError::Migration(format!("{}: {}", migration.name, err)))?;
        tx.pragma_update(None, "user_version", version)?;
    }

    tx.commit()?;
    Ok(())
}

pub fn schema_version(conn: &Connection) -> Result<i64> {
    read_user_version(conn)
}

pub fn latest_version() -> i64 {
    MIGRATIONS.len() as i64
}

fn read_user_version(conn: &Connection) -> Result<i64> {
    let version: i64 = conn.query_row("PRAGMA user_version;", [], |row| row.get(0))?;
    Ok(version)
}
