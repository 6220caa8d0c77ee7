use serde::{Deserialize, Serialize};
use std::fmt;

/// Pipeline position of a lead.
///
/// The six known labels cover the admin workflow, but any other string read
/// from the store is kept verbatim in [`LeadStatus::Other`]. Nothing restricts
/// which status may follow which.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum LeadStatus {
    #[default]
    Pending,
    Approved,
    Contacted,
    Negotiating,
    Converted,
    Rejected,
    Other(String),
}

impl LeadStatus {
    pub const KNOWN: [LeadStatus; 6] = [
        LeadStatus::Pending,
        LeadStatus::Approved,
        LeadStatus::Contacted,
        LeadStatus::Negotiating,
        LeadStatus::Converted,
        LeadStatus::Rejected,
    ];

    /// Exact decoding of a stored label. Anything that is not one of the
    /// six known labels verbatim is kept as-is in `Other`.
    pub fn parse(raw: &str) -> Self {
        match raw {
            "pending" => LeadStatus::Pending,
            "approved" => LeadStatus::Approved,
            "contacted" => LeadStatus::Contacted,
            "negotiating" => LeadStatus::Negotiating,
            "converted" => LeadStatus::Converted,
            "rejected" => LeadStatus::Rejected,
            _ => LeadStatus::Other(raw.to_string()),
        }
    }

    /// Lenient decoding of typed input (command arguments, filter terms):
    /// trims and matches known labels case-insensitively.
    pub fn parse_input(raw: &str) -> Self {
        let trimmed = raw.trim();
        match LeadStatus::parse(&trimmed.to_ascii_lowercase()) {
            LeadStatus::Other(_) => LeadStatus::Other(trimmed.to_string()),
            known => known,
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            LeadStatus::Pending => "pending",
            LeadStatus::Approved => "approved",
            LeadStatus::Contacted => "contacted",
            LeadStatus::Negotiating => "negotiating",
            LeadStatus::Converted => "converted",
            LeadStatus::Rejected => "rejected",
            LeadStatus::Other(raw) => raw,
        }
    }

    /// Human-readable label used in notes and reports.
    pub fn label(&self) -> &str {
        match self {
            LeadStatus::Pending => "Pending",
            LeadStatus::Approved => "Approved",
            LeadStatus::Contacted => "Contacted",
            LeadStatus::Negotiating => "Negotiating",
            LeadStatus::Converted => "Converted",
            LeadStatus::Rejected => "Rejected",
            LeadStatus::Other(raw) => raw,
        }
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, LeadStatus::Other(_))
    }

    /// Position in the admin pipeline; unknown labels sort last.
    pub fn rank(&self) -> usize {
        LeadStatus::KNOWN
            .iter()
            .position(|known| known == self)
            .unwrap_or(LeadStatus::KNOWN.len())
    }
}

impl fmt::Display for LeadStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<String> for LeadStatus {
    fn from(value: String) -> Self {
        LeadStatus::parse(&value)
    }
}

impl From<&str> for LeadStatus {
    fn from(value: &str) -> Self {
        LeadStatus::parse(value)
    }
}

impl From<LeadStatus> for String {
    fn from(value: LeadStatus) -> Self {
        value.as_str().to_string()
    }
}
