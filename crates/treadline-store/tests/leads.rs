use treadline_core::domain::{Channel, LeadStatus, NoteType};
use treadline_core::CoreError;
use treadline_store::error::{StoreError, StoreErrorKind};
use treadline_store::repo::{LeadNew, NoteNew};
use treadline_store::Store;

fn store() -> Store {
    let store = Store::open_in_memory().expect("open in memory");
    store.migrate().expect("migrate");
    store
}

fn lead_input(name: &str, email: &str) -> LeadNew {
    LeadNew {
        name: name.to_string(),
        email: email.to_string(),
        company: Some("  ".to_string()),
        subject: Some("Orçamento".to_string()),
        message: "Gostaria de um orçamento.".to_string(),
        channel: Channel::default(),
    }
}

#[test]
fn lead_create_and_get() {
    let store = store();
    let now = 1_700_000_000;
    let lead = store
        .leads()
        .create(now, lead_input(" Ana Souza ", " Ana@Example.COM "))
        .expect("create lead");

    assert_eq!(lead.status, LeadStatus::Pending);
    assert_eq!(lead.name, "Ana Souza");
    assert_eq!(lead.email, "ana@example.com");
    assert_eq!(lead.company, None);

    let fetched = store
        .leads()
        .get(lead.id)
        .expect("get lead")
        .expect("lead exists");
    assert_eq!(fetched, lead);
}

#[test]
fn lead_create_rejects_blank_name_and_email() {
    let store = store();
    let err = store
        .leads()
        .create(1, lead_input("  ", "ana@example.com"))
        .unwrap_err();
    assert!(matches!(err, StoreError::Core(CoreError::EmptyName)));

    let err = store.leads().create(1, lead_input("Ana", "   ")).unwrap_err();
    assert!(matches!(err, StoreError::Core(CoreError::EmptyEmail)));
    assert_eq!(store.leads().count().expect("count"), 0);
}

#[test]
fn unknown_status_round_trips() {
    let store = store();
    let lead = store
        .leads()
        .create(1, lead_input("Ana", "ana@example.com"))
        .expect("create");
    let updated = store
        .leads()
        .set_status(2, lead.id, &LeadStatus::parse("On Hold"))
        .expect("set status");
    assert_eq!(updated.status, LeadStatus::Other("On Hold".to_string()));
    assert_eq!(updated.updated_at, 2);
}

#[test]
fn stored_status_text_is_preserved() {
    let store = store();
    let lead = store
        .leads()
        .create(1, lead_input("Ana", "ana@example.com"))
        .expect("create");
    store
        .connection()
        .execute(
            "UPDATE contacts SET status = 'APPROVED ' WHERE id = ?1;",
            [lead.id.to_string()],
        )
        .expect("raw update");

    let loaded = store.leads().get_required(lead.id).expect("get");
    assert_eq!(loaded.status, LeadStatus::Other("APPROVED ".to_string()));
    assert_eq!(loaded.status.as_str(), "APPROVED ");
}

#[test]
fn delete_removes_notes() {
    let store = store();
    let lead = store
        .leads()
        .create(1, lead_input("Ana", "ana@example.com"))
        .expect("create");
    store
        .notes()
        .add(NoteNew {
            contact_id: lead.id,
            user_id: None,
            note: "Called back".to_string(),
            note_type: NoteType::Call,
            created_at: 2,
        })
        .expect("add note");

    store.leads().delete(lead.id).expect("delete");
    assert!(store.leads().get(lead.id).expect("get").is_none());
    assert_eq!(store.notes().count_for_lead(lead.id).expect("count"), 0);

    let err = store.leads().delete(lead.id).unwrap_err();
    assert_eq!(err.kind(), StoreErrorKind::NotFound);
}

#[test]
fn list_created_between_is_half_open() {
    let store = store();
    for (index, at) in [100, 200, 300].into_iter().enumerate() {
        store
            .leads()
            .create(at, lead_input(&format!("Lead {index}"), "x@example.com"))
            .expect("create");
    }
    let leads = store
        .leads()
        .list_created_between(100, 300)
        .expect("list");
    let times: Vec<i64> = leads.iter().map(|lead| lead.created_at).collect();
    assert_eq!(times, vec![200, 100]);
}
