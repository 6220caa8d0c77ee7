pub mod channel;
pub mod email;
pub mod goal;
pub mod ids;
pub mod lead;
pub mod note;
pub mod status;
pub mod webhook;

pub use channel::{normalize_channel, Channel, DEFAULT_CHANNEL, OTR_CHANNEL};
pub use email::parse_email;
pub use goal::{validate_goal_period, ConversionGoal};
pub use ids::{GoalId, LeadId, NoteId, WebhookId};
pub use lead::Lead;
pub use note::{LeadNote, NoteType};
pub use status::LeadStatus;
pub use webhook::{
    format_webhook_events, parse_webhook_events, NotificationWebhook, WebhookEvent, WebhookKind,
};
