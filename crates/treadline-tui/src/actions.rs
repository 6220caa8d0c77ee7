use anyhow::Result;
use treadline_core::analytics::summarize;
use treadline_core::domain::{LeadId, LeadStatus, NoteType};
use treadline_core::dto::{LeadDetailDto, LeadListItemDto};
use treadline_core::time::{local_offset, now_utc};
use treadline_functions::FunctionInvoker;
use treadline_store::query::LeadQuery;
use treadline_store::repo::NoteNew;
use treadline_store::{StatusWorkflow, Store};

use crate::app::{App, Mode};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    LoadList,
    LoadDetail(LeadId),
    LoadStats,
    SetStatus {
        lead_id: LeadId,
        status: LeadStatus,
        notify: bool,
    },
    AddNote {
        lead_id: LeadId,
        note_type: NoteType,
        note: String,
    },
    DeleteLead(LeadId),
}

impl Action {
    /// Loads are idempotent and may be coalesced in the queue.
    pub fn is_reload(&self) -> bool {
        matches!(
            self,
            Action::LoadList | Action::LoadDetail(_) | Action::LoadStats
        )
    }
}

/// Runs one queued action. Writes do not queue reloads themselves: the
/// store publishes a change and the event loop refreshes the open views.
pub fn execute_action(
    app: &mut App,
    store: &Store,
    functions: &dyn FunctionInvoker,
    action: Action,
) -> Result<()> {
    match action {
        Action::LoadList => {
            let leads = load_leads(app, store)?;
            let items = leads.iter().map(LeadListItemDto::from).collect();
            app.apply_list(items);
            app.clear_error();
        }
        Action::LoadDetail(lead_id) => match store.leads().get(lead_id)? {
            Some(lead) => {
                let notes = store.notes().list_for_lead(lead_id)?;
                app.apply_detail(LeadDetailDto::new(&lead, &notes));
                app.clear_error();
            }
            None => {
                app.detail = None;
                app.set_error("lead not found");
                if matches!(app.mode, Mode::Detail(id) if id == lead_id) {
                    app.mode = Mode::List;
                }
            }
        },
        Action::LoadStats => {
            let leads = load_leads(app, store)?;
            let snapshot = summarize(&leads, now_utc(), local_offset(), app.analytics_months);
            app.apply_stats(snapshot);
            app.clear_error();
        }
        Action::SetStatus {
            lead_id,
            status,
            notify,
        } => {
            let outcome =
                StatusWorkflow::new(store, functions).apply(now_utc(), lead_id, status, notify)?;
            let failures = outcome.failures();
            if failures.is_empty() {
                app.set_status(format!(
                    "{}: {} -> {}",
                    outcome.lead.name,
                    outcome.previous.label(),
                    outcome.lead.status.label()
                ));
            } else {
                let summary = failures
                    .iter()
                    .map(|(what, reason)| format!("{} failed: {}", what, reason))
                    .collect::<Vec<_>>()
                    .join("; ");
                app.set_status(format!("Status set to {}", outcome.lead.status.label()));
                app.set_error(summary);
            }
        }
        Action::AddNote {
            lead_id,
            note_type,
            note,
        } => {
            let note = store.notes().add(NoteNew {
                contact_id: lead_id,
                user_id: None,
                note,
                note_type,
                created_at: now_utc(),
            })?;
            app.set_status(format!("Added {} note", note.note_type));
        }
        Action::DeleteLead(lead_id) => {
            store.leads().delete(lead_id)?;
            if app.detail.as_ref().map(|detail| detail.id) == Some(lead_id) {
                app.detail = None;
            }
            app.set_status("Lead deleted");
        }
    }

    Ok(())
}

fn load_leads(app: &App, store: &Store) -> Result<Vec<treadline_core::domain::Lead>> {
    let query = match &app.filter {
        Some(filter) => LeadQuery::from_filter(filter)?,
        None => LeadQuery::default(),
    };
    Ok(store.leads().list_leads(&query, local_offset())?)
}

#[cfg(test)]
mod tests {
    use super::{execute_action, Action};
    use crate::app::App;
    use treadline_core::domain::{Channel, LeadStatus, NoteType};
    use treadline_core::filter::parse_filter;
    use treadline_functions::MemoryInvoker;
    use treadline_store::repo::LeadNew;
    use treadline_store::Store;

    fn store_with_leads() -> Store {
        let store = Store::open_in_memory().unwrap();
        store.migrate().unwrap();
        for (name, channel) in [("Ana", "otr"), ("Bruno", "contact")] {
            store
                .leads()
                .create(
                    1_700_000_000,
                    LeadNew {
                        name: name.to_string(),
                        email: format!("{}@example.com", name.to_lowercase()),
                        company: None,
                        subject: None,
                        message: "FONTE INDICADA:\n- Localização: Chile".to_string(),
                        channel: Channel::new(channel).unwrap(),
                    },
                )
                .unwrap();
        }
        store
    }

    #[test]
    fn load_list_applies_filter() {
        let store = store_with_leads();
        let functions = MemoryInvoker::new();
        let mut app = App::new(6, true);
        app.filter = Some(parse_filter("#otr").unwrap());
        execute_action(&mut app, &store, &functions, Action::LoadList).unwrap();
        assert_eq!(app.leads.len(), 1);
        assert_eq!(app.leads[0].name, "Ana");
    }

    #[test]
    fn set_status_runs_workflow() {
        let store = store_with_leads();
        let functions = MemoryInvoker::new();
        let mut app = App::new(6, true);
        execute_action(&mut app, &store, &functions, Action::LoadList).unwrap();
        let id = app.leads[0].id;

        execute_action(
            &mut app,
            &store,
            &functions,
            Action::SetStatus {
                lead_id: id,
                status: LeadStatus::Approved,
                notify: true,
            },
        )
        .unwrap();

        assert_eq!(store.leads().get_required(id).unwrap().status, LeadStatus::Approved);
        assert_eq!(store.notes().count_for_lead(id).unwrap(), 1);
        assert_eq!(functions.calls().len(), 2);
        assert!(app.error.is_none());
    }

    #[test]
    fn failed_side_effects_surface_as_error() {
        let store = store_with_leads();
        let functions = MemoryInvoker::failing();
        let mut app = App::new(6, true);
        execute_action(&mut app, &store, &functions, Action::LoadList).unwrap();
        let id = app.leads[0].id;

        execute_action(
            &mut app,
            &store,
            &functions,
            Action::SetStatus {
                lead_id: id,
                status: LeadStatus::Rejected,
                notify: false,
            },
        )
        .unwrap();

        assert_eq!(store.leads().get_required(id).unwrap().status, LeadStatus::Rejected);
        assert!(app.error.as_deref().unwrap_or_default().contains("failed"));
    }

    #[test]
    fn add_note_and_delete() {
        let store = store_with_leads();
        let functions = MemoryInvoker::new();
        let mut app = App::new(6, true);
        execute_action(&mut app, &store, &functions, Action::LoadList).unwrap();
        let id = app.leads[0].id;

        execute_action(
            &mut app,
            &store,
            &functions,
            Action::AddNote {
                lead_id: id,
                note_type: NoteType::Call,
                note: "Retornar amanhã".to_string(),
            },
        )
        .unwrap();
        execute_action(&mut app, &store, &functions, Action::LoadDetail(id)).unwrap();
        assert_eq!(app.detail.as_ref().unwrap().notes.len(), 1);

        execute_action(&mut app, &store, &functions, Action::DeleteLead(id)).unwrap();
        assert!(app.detail.is_none());
        assert!(store.leads().get(id).unwrap().is_none());
    }

    #[test]
    fn load_stats_summarizes_filtered_leads() {
        let store = store_with_leads();
        let functions = MemoryInvoker::new();
        let mut app = App::new(3, true);
        execute_action(&mut app, &store, &functions, Action::LoadStats).unwrap();
        let stats = app.stats.as_ref().unwrap();
        assert_eq!(stats.total, 2);
        assert_eq!(stats.monthly.len(), 3);
    }
}
