pub mod goals;
pub mod leads;
pub mod notes;
pub mod webhooks;

pub use goals::{GoalUpsert, GoalsRepo};
pub use leads::{LeadNew, LeadsRepo};
pub use notes::{NoteNew, NotesRepo};
pub use webhooks::{WebhookNew, WebhooksRepo};
