use crate::changes::{ChangeNotifier, StoreChange};
use crate::error::{Result, StoreError};
use rusqlite::{params, Connection};
use std::str::FromStr;
use treadline_core::domain::{ConversionGoal, GoalId};

#[derive(Debug, Clone)]
pub struct GoalUpsert {
    pub month: u32,
    pub year: i32,
    pub target_leads: i64,
    pub target_conversions: i64,
    pub notes: Option<String>,
}

pub struct GoalsRepo<'a> {
    conn: &'a Connection,
    changes: &'a ChangeNotifier,
}

impl<'a> GoalsRepo<'a> {
    pub fn new(conn: &'a Connection, changes: &'a ChangeNotifier) -> Self {
        Self { conn, changes }
    }

    /// Creates the goal for `(month, year)` or replaces its targets,
    /// keeping the original id and creation time.
    pub fn upsert(&self, now_utc: i64, input: GoalUpsert) -> Result<ConversionGoal> {
        let candidate = ConversionGoal {
            id: GoalId::new(),
            month: input.month,
            year: input.year,
            target_leads: input.target_leads,
            target_conversions: input.target_conversions,
            notes: input
                .notes
                .map(|notes| notes.trim().to_string())
                .filter(|notes| !notes.is_empty()),
            created_at: now_utc,
            updated_at: now_utc,
        };
        candidate.validate()?;

        self.conn.execute(
            "INSERT INTO otr_conversion_goals (id, month, year, target_leads, target_conversions, notes, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
             ON CONFLICT (month, year) DO UPDATE SET
                target_leads = excluded.target_leads,
                target_conversions = excluded.target_conversions,
                notes = excluded.notes,
                updated_at = excluded.updated_at;",
            params![
                candidate.id.to_string(),
                candidate.month,
                candidate.year,
                candidate.target_leads,
                candidate.target_conversions,
                candidate.notes,
                candidate.created_at,
                candidate.updated_at,
            ],
        )?;
        self.changes.publish(StoreChange::GoalsChanged);

        self.get_for_period(candidate.month, candidate.year)?
            .ok_or_else(|| StoreError::NotFound(candidate.period_label()))
    }

    pub fn get_for_period(&self, month: u32, year: i32) -> Result<Option<ConversionGoal>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, month, year, target_leads, target_conversions, notes, created_at, updated_at
             FROM otr_conversion_goals WHERE month = ?1 AND year = ?2;",
        )?;
        let mut rows = stmt.query(params![month, year])?;
        if let Some(row) = rows.next()? {
            Ok(Some(goal_from_row(row)?))
        } else {
            Ok(None)
        }
    }

    /// Most recent period first.
    pub fn list(&self) -> Result<Vec<ConversionGoal>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, month, year, target_leads, target_conversions, notes, created_at, updated_at
             FROM otr_conversion_goals ORDER BY year DESC, month DESC;",
        )?;
        let mut rows = stmt.query([])?;
        let mut goals = Vec::new();
        while let Some(row) = rows.next()? {
            goals.push(goal_from_row(row)?);
        }
        Ok(goals)
    }
}

fn goal_from_row(row: &rusqlite::Row<'_>) -> Result<ConversionGoal> {
    let id_str: String = row.get(0)?;
    let id = GoalId::from_str(&id_str).map_err(|_| StoreError::InvalidId(id_str.clone()))?;
    Ok(ConversionGoal {
        id,
        month: row.get(1)?,
        year: row.get(2)?,
        target_leads: row.get(3)?,
        target_conversions: row.get(4)?,
        notes: row.get(5)?,
        created_at: row.get(6)?,
        updated_at: row.get(7)?,
    })
}
