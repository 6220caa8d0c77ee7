use crate::domain::{LeadStatus, WebhookEvent};

/// Side effects that follow a status write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusChangePlan {
    pub note: String,
    pub notify_approval: bool,
    pub webhook_event: Option<WebhookEvent>,
}

/// Every transition is allowed, including leaving `converted` or setting
/// the status a lead already has.
pub fn plan_status_change(
    previous: &LeadStatus,
    next: &LeadStatus,
    send_notification: bool,
) -> StatusChangePlan {
    StatusChangePlan {
        note: status_change_note(previous, next),
        notify_approval: send_notification && *next == LeadStatus::Approved,
        webhook_event: WebhookEvent::for_status(next),
    }
}

pub fn status_change_note(previous: &LeadStatus, next: &LeadStatus) -> String {
    format!(
        "Status changed from {} to {}",
        previous.label(),
        next.label()
    )
}

#[cfg(test)]
mod tests {
    use super::plan_status_change;
    use crate::domain::{LeadStatus, WebhookEvent};

    #[test]
    fn approval_notification_needs_flag_and_approved() {
        let plan = plan_status_change(&LeadStatus::Pending, &LeadStatus::Approved, true);
        assert!(plan.notify_approval);
        assert_eq!(plan.webhook_event, Some(WebhookEvent::LeadApproved));

        let plan = plan_status_change(&LeadStatus::Pending, &LeadStatus::Approved, false);
        assert!(!plan.notify_approval);
        assert_eq!(plan.webhook_event, Some(WebhookEvent::LeadApproved));

        let plan = plan_status_change(&LeadStatus::Pending, &LeadStatus::Contacted, true);
        assert!(!plan.notify_approval);
        assert_eq!(plan.webhook_event, None);
    }

    #[test]
    fn note_mentions_both_labels() {
        let plan = plan_status_change(&LeadStatus::Negotiating, &LeadStatus::Converted, false);
        assert_eq!(plan.note, "Status changed from Negotiating to Converted");
    }

    #[test]
    fn converted_can_be_reopened() {
        let plan = plan_status_change(&LeadStatus::Converted, &LeadStatus::Pending, false);
        assert_eq!(plan.note, "Status changed from Converted to Pending");
        assert_eq!(plan.webhook_event, None);
    }

    #[test]
    fn unknown_status_keeps_raw_label() {
        let next = LeadStatus::parse("on_hold");
        let plan = plan_status_change(&LeadStatus::Pending, &next, true);
        assert!(plan.note.ends_with("to on_hold"));
        assert!(!plan.notify_approval);
    }
}
