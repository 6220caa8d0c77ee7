use treadline_core::domain::{Channel, Lead, LeadId, LeadStatus, NoteType};
use treadline_functions::{FunctionName, MemoryInvoker};
use treadline_store::error::StoreErrorKind;
use treadline_store::repo::LeadNew;
use treadline_store::{SideEffect, StatusWorkflow, Store};

const OTR_MESSAGE: &str = "INDICADOR:
- Nome: João Silva
- Empresa: Pneus Norte

FONTE INDICADA:
- Tipo: Mineradora
- Empresa: Mina Azul
- Localização: Antofagasta, Chile";

fn setup() -> (Store, Lead) {
    let store = Store::open_in_memory().expect("open in memory");
    store.migrate().expect("migrate");
    let lead = store
        .leads()
        .create(
            1_700_000_000,
            LeadNew {
                name: "João Silva".to_string(),
                email: "joao@example.com".to_string(),
                company: None,
                subject: None,
                message: OTR_MESSAGE.to_string(),
                channel: Channel::new("otr").unwrap(),
            },
        )
        .expect("create lead");
    (store, lead)
}

#[test]
fn every_change_appends_one_audit_note() {
    let (store, lead) = setup();
    let functions = MemoryInvoker::new();
    let workflow = StatusWorkflow::new(&store, &functions);

    for (step, status) in LeadStatus::KNOWN.iter().enumerate() {
        let before = store.notes().count_for_lead(lead.id).expect("count");
        let outcome = workflow
            .apply(1_700_000_100 + step as i64, lead.id, status.clone(), false)
            .expect("apply");
        let notes = store.notes().list_for_lead(lead.id).expect("notes");
        assert_eq!(notes.len() as i64, before + 1);
        assert_eq!(notes[0].note_type, NoteType::StatusChange);
        assert!(notes[0].note.contains(status.label()));
        assert_eq!(outcome.note_effect, SideEffect::Completed);
        assert_eq!(outcome.lead.status, *status);
    }
}

#[test]
fn audit_note_names_both_statuses() {
    let (store, lead) = setup();
    let functions = MemoryInvoker::new();
    let outcome = StatusWorkflow::new(&store, &functions)
        .apply(1_700_000_100, lead.id, LeadStatus::Contacted, false)
        .expect("apply");
    assert_eq!(outcome.previous, LeadStatus::Pending);
    assert_eq!(
        outcome.note.expect("note").note,
        "Status changed from Pending to Contacted"
    );
}

#[test]
fn webhook_fires_only_for_mapped_statuses() {
    let (store, lead) = setup();
    let functions = MemoryInvoker::new();
    let workflow = StatusWorkflow::new(&store, &functions);

    let expected = [
        (LeadStatus::Pending, None),
        (LeadStatus::Approved, Some("lead_approved")),
        (LeadStatus::Contacted, None),
        (LeadStatus::Negotiating, None),
        (LeadStatus::Converted, Some("lead_converted")),
        (LeadStatus::Rejected, Some("lead_rejected")),
        (LeadStatus::Other("on_hold".to_string()), None),
    ];

    for (status, event) in expected {
        let before = functions
            .calls_to(FunctionName::SendWebhookNotification)
            .len();
        let outcome = workflow
            .apply(1_700_000_200, lead.id, status, false)
            .expect("apply");
        let calls = functions.calls_to(FunctionName::SendWebhookNotification);
        match event {
            Some(event) => {
                assert_eq!(calls.len(), before + 1);
                assert_eq!(calls[before].body["event"], event);
                assert_eq!(outcome.webhook, SideEffect::Completed);
            }
            None => {
                assert_eq!(calls.len(), before);
                assert_eq!(outcome.webhook, SideEffect::Skipped);
            }
        }
    }
    assert!(functions.calls_to(FunctionName::NotifyOtrApproval).is_empty());
}

#[test]
fn approval_notification_carries_parsed_fields() {
    let (store, lead) = setup();
    let functions = MemoryInvoker::new();
    let outcome = StatusWorkflow::new(&store, &functions)
        .apply(1_700_000_100, lead.id, LeadStatus::Approved, true)
        .expect("apply");
    assert_eq!(outcome.approval, SideEffect::Completed);

    let calls = functions.calls_to(FunctionName::NotifyOtrApproval);
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].body["indicatorName"], "João Silva");
    assert_eq!(calls[0].body["sourceCompany"], "Mina Azul");
    assert_eq!(calls[0].body["location"], "Antofagasta, Chile");
}

#[test]
fn failed_calls_do_not_undo_the_status() {
    let (store, lead) = setup();
    let functions = MemoryInvoker::failing();
    let outcome = StatusWorkflow::new(&store, &functions)
        .apply(1_700_000_100, lead.id, LeadStatus::Approved, true)
        .expect("apply");

    assert!(outcome.approval.is_failed());
    assert!(outcome.webhook.is_failed());
    assert_eq!(outcome.failures().len(), 2);

    let stored = store.leads().get_required(lead.id).expect("lead");
    assert_eq!(stored.status, LeadStatus::Approved);
    assert_eq!(store.notes().count_for_lead(lead.id).expect("count"), 1);
}

#[test]
fn missing_lead_writes_nothing() {
    let (store, _lead) = setup();
    let functions = MemoryInvoker::new();
    let err = StatusWorkflow::new(&store, &functions)
        .apply(1, LeadId::new(), LeadStatus::Approved, true)
        .unwrap_err();
    assert_eq!(err.kind(), StoreErrorKind::NotFound);
    assert!(functions.calls().is_empty());
}

#[test]
fn failed_audit_note_keeps_status_and_still_notifies() {
    let (store, lead) = setup();
    store
        .connection()
        .execute_batch(
            "CREATE TRIGGER reject_notes BEFORE INSERT ON lead_notes
             BEGIN SELECT RAISE(ABORT, 'notes unavailable'); END;",
        )
        .expect("install trigger");
    let functions = MemoryInvoker::new();

    let outcome = StatusWorkflow::new(&store, &functions)
        .apply(1_700_000_100, lead.id, LeadStatus::Converted, false)
        .expect("apply");

    assert!(outcome.note_effect.is_failed());
    assert!(outcome.note.is_none());
    assert_eq!(
        store.leads().get_required(lead.id).expect("lead").status,
        LeadStatus::Converted
    );
    assert_eq!(store.notes().count_for_lead(lead.id).expect("count"), 0);
    assert_eq!(outcome.webhook, SideEffect::Completed);
    assert_eq!(
        functions
            .calls_to(FunctionName::SendWebhookNotification)
            .len(),
        1
    );
}
