use crate::error::Result;
use crate::repo::{LeadNew, NoteNew};
use crate::workflow::SideEffect;
use crate::Store;
use chrono::FixedOffset;
use treadline_core::analytics::{summarize, AnalyticsSnapshot};
use treadline_core::domain::{Lead, LeadId, LeadNote, NoteType};
use treadline_core::time::format_timestamp_date;
use treadline_functions::payloads::{ContactEmailPayload, ReplyEmailPayload, WeeklyReportPayload};
use treadline_functions::{call, FunctionInvoker, FunctionName};

const WEEK_SECONDS: i64 = 7 * 24 * 60 * 60;

#[derive(Debug, Clone)]
pub struct IntakeOutcome {
    pub lead: Lead,
    pub email: SideEffect,
}

#[derive(Debug, Clone)]
pub struct WeeklyReport {
    pub period_start: String,
    pub period_end: String,
    pub snapshot: AnalyticsSnapshot,
}

/// Lead operations that pair a store write with an outbound function.
pub struct LeadActions<'a> {
    store: &'a Store,
    functions: &'a dyn FunctionInvoker,
}

impl<'a> LeadActions<'a> {
    pub fn new(store: &'a Store, functions: &'a dyn FunctionInvoker) -> Self {
        Self { store, functions }
    }

    /// Stores the lead; the confirmation email is best-effort.
    pub fn intake(&self, now_utc: i64, input: LeadNew, notify: bool) -> Result<IntakeOutcome> {
        let lead = self.store.leads().create(now_utc, input)?;
        let email = if notify {
            match call(
                self.functions,
                FunctionName::SendContactEmail,
                &ContactEmailPayload::from(&lead),
            ) {
                Ok(_) => SideEffect::Completed,
                Err(err) => {
                    tracing::warn!(lead_id = %lead.id, error = %err, "contact email failed");
                    SideEffect::Failed(err.to_string())
                }
            }
        } else {
            SideEffect::Skipped
        };
        Ok(IntakeOutcome { lead, email })
    }

    /// Sends the reply first and records an `email` note only once it was
    /// accepted.
    pub fn reply(
        &self,
        now_utc: i64,
        lead_id: LeadId,
        subject: &str,
        message: &str,
        user_id: Option<String>,
    ) -> Result<LeadNote> {
        let lead = self.store.leads().get_required(lead_id)?;
        let payload = ReplyEmailPayload {
            contact_id: lead.id.to_string(),
            to: lead.email.clone(),
            name: lead.name.clone(),
            subject: subject.trim().to_string(),
            message: message.to_string(),
        };
        call(self.functions, FunctionName::SendReplyEmail, &payload)?;

        self.store.notes().add(NoteNew {
            contact_id: lead.id,
            user_id,
            note: format!("Reply sent: {}\n\n{}", payload.subject, message.trim()),
            note_type: NoteType::Email,
            created_at: now_utc,
        })
    }

    /// Summarizes the last seven days and hands the snapshot to
    /// `send-weekly-report`.
    pub fn send_weekly_report(
        &self,
        now_utc: i64,
        offset: FixedOffset,
        trend_months: usize,
    ) -> Result<WeeklyReport> {
        let report = weekly_report(self.store, now_utc, offset, trend_months)?;
        let payload = WeeklyReportPayload::new(
            report.period_start.clone(),
            report.period_end.clone(),
            report.snapshot.clone(),
        );
        call(self.functions, FunctionName::SendWeeklyReport, &payload)?;
        Ok(report)
    }
}

pub fn weekly_report(
    store: &Store,
    now_utc: i64,
    offset: FixedOffset,
    trend_months: usize,
) -> Result<WeeklyReport> {
    let from = now_utc - WEEK_SECONDS;
    let leads = store.leads().list_created_between(from, now_utc + 1)?;
    Ok(WeeklyReport {
        period_start: format_timestamp_date(from, offset),
        period_end: format_timestamp_date(now_utc, offset),
        snapshot: summarize(&leads, now_utc, offset, trend_months),
    })
}
