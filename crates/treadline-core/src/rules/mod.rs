pub mod status;

pub use status::{plan_status_change, status_change_note, StatusChangePlan};
