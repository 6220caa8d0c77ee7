use crate::domain::ids::WebhookId;
use crate::domain::status::LeadStatus;
use crate::error::CoreError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WebhookKind {
    Slack,
    Teams,
    Discord,
}

impl WebhookKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            WebhookKind::Slack => "slack",
            WebhookKind::Teams => "teams",
            WebhookKind::Discord => "discord",
        }
    }
}

impl fmt::Display for WebhookKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for WebhookKind {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "slack" => Ok(WebhookKind::Slack),
            "teams" => Ok(WebhookKind::Teams),
            "discord" => Ok(WebhookKind::Discord),
            _ => Err(CoreError::UnknownWebhookKind(s.to_string())),
        }
    }
}

/// Lead events a webhook can subscribe to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WebhookEvent {
    LeadApproved,
    LeadConverted,
    LeadRejected,
}

impl WebhookEvent {
    pub const ALL: [WebhookEvent; 3] = [
        WebhookEvent::LeadApproved,
        WebhookEvent::LeadConverted,
        WebhookEvent::LeadRejected,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            WebhookEvent::LeadApproved => "lead_approved",
            WebhookEvent::LeadConverted => "lead_converted",
            WebhookEvent::LeadRejected => "lead_rejected",
        }
    }

    /// Event fired when a lead enters `status`, if any.
    pub fn for_status(status: &LeadStatus) -> Option<Self> {
        match status {
            LeadStatus::Approved => Some(WebhookEvent::LeadApproved),
            LeadStatus::Converted => Some(WebhookEvent::LeadConverted),
            LeadStatus::Rejected => Some(WebhookEvent::LeadRejected),
            _ => None,
        }
    }
}

impl fmt::Display for WebhookEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for WebhookEvent {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        WebhookEvent::ALL
            .into_iter()
            .find(|event| event.as_str() == trimmed)
            .ok_or_else(|| CoreError::UnknownWebhookEvent(trimmed.to_string()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationWebhook {
    pub id: WebhookId,
    pub name: String,
    pub url: String,
    pub kind: WebhookKind,
    pub is_active: bool,
    pub events: BTreeSet<WebhookEvent>,
    pub created_at: i64,
}

impl NotificationWebhook {
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.name.trim().is_empty() {
            return Err(CoreError::EmptyWebhookName);
        }
        if self.events.is_empty() {
            return Err(CoreError::EmptyWebhookEvents);
        }
        Ok(())
    }

    pub fn wants(&self, event: WebhookEvent) -> bool {
        self.is_active && self.events.contains(&event)
    }
}

pub fn parse_webhook_events(raw: &str) -> Result<BTreeSet<WebhookEvent>, CoreError> {
    raw.split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(WebhookEvent::from_str)
        .collect()
}

pub fn format_webhook_events(events: &BTreeSet<WebhookEvent>) -> String {
    events
        .iter()
        .map(|event| event.as_str())
        .collect::<Vec<_>>()
        .join(",")
}

#[cfg(test)]
mod tests {
    use super::{format_webhook_events, parse_webhook_events, WebhookEvent, WebhookKind};
    use crate::domain::LeadStatus;
    use std::str::FromStr;

    #[test]
    fn only_three_statuses_map_to_events() {
        assert_eq!(
            WebhookEvent::for_status(&LeadStatus::Approved),
            Some(WebhookEvent::LeadApproved)
        );
        assert_eq!(
            WebhookEvent::for_status(&LeadStatus::Converted),
            Some(WebhookEvent::LeadConverted)
        );
        assert_eq!(
            WebhookEvent::for_status(&LeadStatus::Rejected),
            Some(WebhookEvent::LeadRejected)
        );
        for status in [
            LeadStatus::Pending,
            LeadStatus::Contacted,
            LeadStatus::Negotiating,
            LeadStatus::Other("approved-ish".to_string()),
        ] {
            assert_eq!(WebhookEvent::for_status(&status), None);
        }
    }

    #[test]
    fn events_parse_from_comma_list() {
        let events = parse_webhook_events("lead_rejected, lead_approved,").unwrap();
        assert_eq!(format_webhook_events(&events), "lead_approved,lead_rejected");
        assert!(parse_webhook_events("new_lead").is_err());
    }

    #[test]
    fn kind_parses_case_insensitively() {
        assert_eq!(WebhookKind::from_str("Slack").unwrap(), WebhookKind::Slack);
        assert!(WebhookKind::from_str("matrix").is_err());
    }
}
