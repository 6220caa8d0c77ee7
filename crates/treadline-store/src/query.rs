use crate::error::{Result, StoreError};
use chrono::{Days, FixedOffset, NaiveDate};
use rusqlite::types::Value;
use treadline_core::domain::{Channel, LeadStatus};
use treadline_core::filter::{FilterExpr, LeadFilter};
use treadline_core::time::start_of_day;

pub(crate) const LEAD_COLUMNS: &str =
    "id, name, email, company, subject, message, channel, status, created_at, updated_at";

#[derive(Debug, Default, Clone)]
pub struct LeadQuery {
    pub text_terms: Vec<String>,
    pub status: Option<LeadStatus>,
    pub channel: Option<Channel>,
    pub since: Option<NaiveDate>,
    pub until: Option<NaiveDate>,
}

pub struct SqlQuery {
    pub sql: String,
    pub params: Vec<Value>,
}

impl LeadQuery {
    pub fn from_filter(filter: &LeadFilter) -> Result<Self> {
        let mut query = LeadQuery::default();
        query.push_expr(filter)?;
        Ok(query)
    }

    fn push_expr(&mut self, expr: &FilterExpr) -> Result<()> {
        match expr {
            FilterExpr::Text(text) => self.text_terms.push(text.to_string()),
            FilterExpr::Status(status) => {
                set_once(&mut self.status, status.clone(), "status")?;
            }
            FilterExpr::Channel(channel) => {
                set_once(&mut self.channel, channel.clone(), "channel")?;
            }
            FilterExpr::Since(date) => set_once(&mut self.since, *date, "since")?,
            FilterExpr::Until(date) => set_once(&mut self.until, *date, "until")?,
            FilterExpr::And(terms) => {
                for term in terms {
                    self.push_expr(term)?;
                }
            }
        }
        Ok(())
    }

    /// Newest leads first. `until` includes the whole named day.
    pub fn to_sql(&self, local_offset: FixedOffset) -> Result<SqlQuery> {
        let mut clauses: Vec<String> = Vec::new();
        let mut params: Vec<Value> = Vec::new();

        for term in &self.text_terms {
            clauses.push(
                "(name LIKE ? ESCAPE '\\' OR email LIKE ? ESCAPE '\\' \
                 OR company LIKE ? ESCAPE '\\' OR subject LIKE ? ESCAPE '\\' \
                 OR message LIKE ? ESCAPE '\\')"
                    .to_string(),
            );
            let like = format!("%{}%", escape_like(term));
            for _ in 0..5 {
                params.push(Value::from(like.clone()));
            }
        }

        if let Some(status) = &self.status {
            clauses.push("status = ? COLLATE NOCASE".to_string());
            params.push(Value::from(status.as_str().to_string()));
        }

        if let Some(channel) = &self.channel {
            clauses.push("channel = ?".to_string());
            params.push(Value::from(channel.as_str().to_string()));
        }

        if let Some(since) = self.since {
            clauses.push("created_at >= ?".to_string());
            params.push(Value::from(day_start(since, local_offset)?));
        }

        if let Some(until) = self.until {
            let next_day = until
                .checked_add_days(Days::new(1))
                .ok_or_else(|| StoreError::InvalidFilter(format!("until:{}", until)))?;
            clauses.push("created_at < ?".to_string());
            params.push(Value::from(day_start(next_day, local_offset)?));
        }

        let mut sql = format!("SELECT {} FROM contacts", LEAD_COLUMNS);
        if !clauses.is_empty() {
            sql.push_str(" WHERE ");
            sql.push_str(&clauses.join(" AND "));
        }
        sql.push_str(" ORDER BY created_at DESC, id ASC");

        Ok(SqlQuery { sql, params })
    }
}

/// Makes `%`, `_` and the escape character match literally in `LIKE`.
fn escape_like(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len());
    for ch in term.chars() {
        if matches!(ch, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped
}

fn set_once<T>(slot: &mut Option<T>, value: T, name: &str) -> Result<()> {
    if slot.is_some() {
        return Err(StoreError::InvalidFilter(format!(
            "multiple {} filters are not supported",
            name
        )));
    }
    *slot = Some(value);
    Ok(())
}

fn day_start(date: NaiveDate, offset: FixedOffset) -> Result<i64> {
    start_of_day(date, offset).map_err(|err| StoreError::InvalidFilter(err.to_string()))
}

#[cfg(test)]
mod tests {
    use super::{escape_like, LeadQuery};
    use chrono::FixedOffset;
    use treadline_core::filter::parse_filter;

    #[test]
    fn rejects_repeated_status() {
        let filter = parse_filter("status:approved status:rejected").unwrap();
        assert!(LeadQuery::from_filter(&filter).is_err());
    }

    #[test]
    fn escapes_like_wildcards() {
        assert_eq!(escape_like("100%"), "100\\%");
        assert_eq!(escape_like("A_a"), "A\\_a");
        assert_eq!(escape_like("c:\\pneus"), "c:\\\\pneus");
        assert_eq!(escape_like("Ana"), "Ana");
    }

    #[test]
    fn until_is_exclusive_next_day() {
        let filter = parse_filter("until:2025-01-31").unwrap();
        let query = LeadQuery::from_filter(&filter).unwrap();
        let sql = query.to_sql(FixedOffset::east_opt(0).unwrap()).unwrap();
        assert!(sql.sql.contains("created_at < ?"));
        assert_eq!(sql.params.len(), 1);
        assert_eq!(
            sql.params[0],
            rusqlite::types::Value::Integer(1_738_368_000)
        );
    }
}
