use crate::domain::{Channel, LeadStatus};
use chrono::NaiveDate;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterExpr {
    Text(String),
    Status(LeadStatus),
    Channel(Channel),
    /// Created on or after this local date.
    Since(NaiveDate),
    /// Created on or before this local date.
    Until(NaiveDate),
    And(Vec<FilterExpr>),
}

pub type LeadFilter = FilterExpr;

impl FilterExpr {
    /// Short human description used in report headers.
    pub fn describe(&self) -> String {
        match self {
            FilterExpr::Text(text) => format!("\"{}\"", text),
            FilterExpr::Status(status) => format!("status {}", status.label()),
            FilterExpr::Channel(channel) => format!("channel {}", channel),
            FilterExpr::Since(date) => format!("since {}", date.format("%Y-%m-%d")),
            FilterExpr::Until(date) => format!("until {}", date.format("%Y-%m-%d")),
            FilterExpr::And(terms) => {
                if terms.is_empty() {
                    "all leads".to_string()
                } else {
                    terms
                        .iter()
                        .map(FilterExpr::describe)
                        .collect::<Vec<_>>()
                        .join(", ")
                }
            }
        }
    }
}
