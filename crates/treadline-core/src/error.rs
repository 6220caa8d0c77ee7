use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CoreError {
    #[error("lead name is required")]
    EmptyName,
    #[error("lead email is required")]
    EmptyEmail,
    #[error("invalid email address: {0}")]
    InvalidEmail(String),
    #[error("invalid channel name")]
    InvalidChannel,
    #[error("invalid note type label")]
    InvalidNoteTypeLabel,
    #[error("note text is required")]
    EmptyNote,
    #[error("invalid goal month: {0}")]
    InvalidGoalMonth(u32),
    #[error("invalid goal year: {0}")]
    InvalidGoalYear(i32),
    #[error("invalid goal target: {0}")]
    InvalidGoalTarget(i64),
    #[error("webhook name is required")]
    EmptyWebhookName,
    #[error("webhook must subscribe to at least one event")]
    EmptyWebhookEvents,
    #[error("unknown webhook kind: {0}")]
    UnknownWebhookKind(String),
    #[error("unknown webhook event: {0}")]
    UnknownWebhookEvent(String),
    #[error("invalid timestamp")]
    InvalidTimestamp,
}
