//! Status changes and their side effects. Only the status write is
//! transactional; the audit note and outbound calls are best-effort and
//! reported in the outcome.

use crate::error::Result;
use crate::repo::NoteNew;
use crate::Store;
use treadline_core::domain::{Lead, LeadId, LeadNote, LeadStatus, NoteType};
use treadline_core::rules::plan_status_change;
use treadline_functions::payloads::{OtrApprovalPayload, WebhookNotificationPayload};
use treadline_functions::{call, FunctionInvoker, FunctionName};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SideEffect {
    Skipped,
    Completed,
    Failed(String),
}

impl SideEffect {
    pub fn is_failed(&self) -> bool {
        matches!(self, SideEffect::Failed(_))
    }
}

#[derive(Debug, Clone)]
pub struct StatusChangeOutcome {
    pub lead: Lead,
    pub previous: LeadStatus,
    pub note: Option<LeadNote>,
    pub note_effect: SideEffect,
    pub approval: SideEffect,
    pub webhook: SideEffect,
}

impl StatusChangeOutcome {
    pub fn failures(&self) -> Vec<(&'static str, &str)> {
        [
            ("audit note", &self.note_effect),
            ("approval notification", &self.approval),
            ("webhook notification", &self.webhook),
        ]
        .into_iter()
        .filter_map(|(name, effect)| match effect {
            SideEffect::Failed(message) => Some((name, message.as_str())),
            _ => None,
        })
        .collect()
    }
}

pub struct StatusWorkflow<'a> {
    store: &'a Store,
    functions: &'a dyn FunctionInvoker,
    user_id: Option<String>,
}

impl<'a> StatusWorkflow<'a> {
    pub fn new(store: &'a Store, functions: &'a dyn FunctionInvoker) -> Self {
        Self {
            store,
            functions,
            user_id: None,
        }
    }

    /// Author recorded on the audit notes this workflow writes.
    pub fn with_user(mut self, user_id: Option<String>) -> Self {
        self.user_id = user_id;
        self
    }

    /// Sets the lead's status, then appends the audit note, sends the
    /// approval notification when asked to, and fires the webhook event.
    /// Fails only when the lead is missing or the status write fails.
    pub fn apply(
        &self,
        now_utc: i64,
        lead_id: LeadId,
        new_status: LeadStatus,
        send_notification: bool,
    ) -> Result<StatusChangeOutcome> {
        let previous = self.store.leads().get_required(lead_id)?.status;
        let lead = self.store.leads().set_status(now_utc, lead_id, &new_status)?;
        tracing::info!(
            lead_id = %lead_id,
            from = previous.as_str(),
            to = new_status.as_str(),
            "status changed"
        );

        let plan = plan_status_change(&previous, &new_status, send_notification);

        let (note, note_effect) = match self.store.notes().add(NoteNew {
            contact_id: lead_id,
            user_id: self.user_id.clone(),
            note: plan.note,
            note_type: NoteType::StatusChange,
            created_at: now_utc,
        }) {
            Ok(note) => (Some(note), SideEffect::Completed),
            Err(err) => {
                tracing::warn!(lead_id = %lead_id, error = %err, "failed to record status note");
                (None, SideEffect::Failed(err.to_string()))
            }
        };

        let approval = if plan.notify_approval {
            let payload = OtrApprovalPayload::new(&lead, lead.parsed());
            self.best_effort(FunctionName::NotifyOtrApproval, &payload)
        } else {
            SideEffect::Skipped
        };

        let webhook = match plan.webhook_event {
            Some(event) => {
                let payload = WebhookNotificationPayload::new(event, &lead, &previous);
                self.best_effort(FunctionName::SendWebhookNotification, &payload)
            }
            None => SideEffect::Skipped,
        };

        Ok(StatusChangeOutcome {
            lead,
            previous,
            note,
            note_effect,
            approval,
            webhook,
        })
    }

    fn best_effort<T: serde::Serialize>(&self, name: FunctionName, payload: &T) -> SideEffect {
        match call(self.functions, name, payload) {
            Ok(_) => SideEffect::Completed,
            Err(err) => {
                tracing::warn!(function = name.as_str(), error = %err, "best-effort call failed");
                SideEffect::Failed(err.to_string())
            }
        }
    }
}
