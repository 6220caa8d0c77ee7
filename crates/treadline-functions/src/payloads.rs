//! Request bodies for the hosted functions. Field names follow the
//! camelCase convention the functions expect.

use serde::Serialize;
use treadline_core::analytics::{AnalyticsSnapshot, BucketCount};
use treadline_core::domain::{Lead, LeadStatus, WebhookEvent};
use treadline_core::otr::ParsedOtrMessage;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactEmailPayload {
    pub contact_id: String,
    pub name: String,
    pub email: String,
    pub company: Option<String>,
    pub subject: Option<String>,
    pub message: String,
    pub channel: String,
}

impl From<&Lead> for ContactEmailPayload {
    fn from(lead: &Lead) -> Self {
        Self {
            contact_id: lead.id.to_string(),
            name: lead.name.clone(),
            email: lead.email.clone(),
            company: lead.company.clone(),
            subject: lead.subject.clone(),
            message: lead.message.clone(),
            channel: lead.channel.as_str().to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OtrApprovalPayload {
    pub contact_id: String,
    pub name: String,
    pub email: String,
    pub company: Option<String>,
    pub indicator_name: String,
    pub indicator_company: String,
    pub indicator_phone: String,
    pub indicator_email: String,
    pub source_type: String,
    pub source_company: String,
    pub source_contact: String,
    pub source_phone: String,
    pub source_email: String,
    pub location: String,
    pub estimated_volume: String,
    pub tire_types: String,
    pub details: String,
}

impl OtrApprovalPayload {
    pub fn new(lead: &Lead, parsed: ParsedOtrMessage) -> Self {
        Self {
            contact_id: lead.id.to_string(),
            name: lead.name.clone(),
            email: lead.email.clone(),
            company: lead.company.clone(),
            indicator_name: parsed.indicator_name,
            indicator_company: parsed.indicator_company,
            indicator_phone: parsed.indicator_phone,
            indicator_email: parsed.indicator_email,
            source_type: parsed.source_type,
            source_company: parsed.source_company,
            source_contact: parsed.source_contact,
            source_phone: parsed.source_phone,
            source_email: parsed.source_email,
            location: parsed.location,
            estimated_volume: parsed.estimated_volume,
            tire_types: parsed.tire_types,
            details: parsed.details,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WebhookLeadData {
    pub contact_id: String,
    pub name: String,
    pub email: String,
    pub company: Option<String>,
    pub channel: String,
    pub status: String,
    pub previous_status: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WebhookNotificationPayload {
    pub event: WebhookEvent,
    pub data: WebhookLeadData,
}

impl WebhookNotificationPayload {
    pub fn new(event: WebhookEvent, lead: &Lead, previous: &LeadStatus) -> Self {
        Self {
            event,
            data: WebhookLeadData {
                contact_id: lead.id.to_string(),
                name: lead.name.clone(),
                email: lead.email.clone(),
                company: lead.company.clone(),
                channel: lead.channel.as_str().to_string(),
                status: lead.status.as_str().to_string(),
                previous_status: previous.as_str().to_string(),
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReplyEmailPayload {
    pub contact_id: String,
    pub to: String,
    pub name: String,
    pub subject: String,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WeeklyReportPayload {
    pub period_start: String,
    pub period_end: String,
    pub total: usize,
    pub converted: usize,
    pub conversion_rate: u32,
    pub by_status: Vec<BucketCount>,
    pub by_channel: Vec<BucketCount>,
    pub by_region: Vec<BucketCount>,
}

impl WeeklyReportPayload {
    pub fn new(period_start: String, period_end: String, snapshot: AnalyticsSnapshot) -> Self {
        Self {
            period_start,
            period_end,
            total: snapshot.total,
            converted: snapshot.converted,
            conversion_rate: snapshot.conversion_rate,
            by_status: snapshot.by_status,
            by_channel: snapshot.by_channel,
            by_region: snapshot.by_region,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{OtrApprovalPayload, WebhookNotificationPayload};
    use treadline_core::domain::{Channel, Lead, LeadId, LeadStatus, WebhookEvent};

    fn lead() -> Lead {
        Lead {
            id: LeadId::new(),
            name: "Ana Souza".to_string(),
            email: "ana@example.com".to_string(),
            company: Some("Recicla Sul".to_string()),
            subject: None,
            message: "FONTE INDICADA:\n- Localização: Antofagasta, Chile".to_string(),
            channel: Channel::new("otr").unwrap(),
            status: LeadStatus::Approved,
            created_at: 0,
            updated_at: 0,
        }
    }

    #[test]
    fn webhook_payload_uses_event_slug_and_camel_case() {
        let lead = lead();
        let payload =
            WebhookNotificationPayload::new(WebhookEvent::LeadApproved, &lead, &LeadStatus::Pending);
        let value = serde_json::to_value(&payload).unwrap();
        assert_eq!(value["event"], "lead_approved");
        assert_eq!(value["data"]["previousStatus"], "pending");
        assert_eq!(value["data"]["status"], "approved");
        assert_eq!(value["data"]["contactId"], lead.id.to_string());
    }

    #[test]
    fn approval_payload_carries_parsed_fields() {
        let lead = lead();
        let payload = OtrApprovalPayload::new(&lead, lead.parsed());
        let value = serde_json::to_value(&payload).unwrap();
        assert_eq!(value["location"], "Antofagasta, Chile");
        assert_eq!(value["indicatorName"], "");
    }
}
