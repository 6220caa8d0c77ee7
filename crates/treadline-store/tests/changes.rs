use tempfile::TempDir;
use treadline_core::domain::{Channel, LeadStatus};
use treadline_store::changes::{StoreChange, Topic};
use treadline_store::repo::LeadNew;
use treadline_store::Store;

fn input() -> LeadNew {
    LeadNew {
        name: "Gustavo Reis".to_string(),
        email: "gustavo@example.com".to_string(),
        company: None,
        subject: None,
        message: String::new(),
        channel: Channel::default(),
    }
}

#[test]
fn repo_writes_publish_to_subscribers() {
    let store = Store::open_in_memory().expect("open in memory");
    store.migrate().expect("migrate");
    let leads = store.subscribe(Topic::Leads);
    let goals = store.subscribe(Topic::Goals);

    let lead = store.leads().create(1, input()).expect("create");
    store
        .leads()
        .set_status(2, lead.id, &LeadStatus::Approved)
        .expect("status");

    let received: Vec<StoreChange> = leads.try_iter().collect();
    assert_eq!(
        received,
        vec![
            StoreChange::LeadCreated(lead.id),
            StoreChange::LeadUpdated(lead.id)
        ]
    );
    assert!(goals.try_recv().is_err());
}

#[test]
fn writes_from_another_connection_are_detected() {
    let temp = TempDir::new().expect("tempdir");
    let path = temp.path().join("treadline.sqlite3");

    let viewer = Store::open(&path).expect("open viewer");
    viewer.migrate().expect("migrate");
    let notes = viewer.subscribe(Topic::Notes);
    assert!(!viewer.poll_external_changes().expect("poll"));

    let writer = Store::open(&path).expect("open writer");
    writer.leads().create(1, input()).expect("create");

    assert!(viewer.poll_external_changes().expect("poll"));
    assert_eq!(notes.try_recv().expect("change"), StoreChange::External);
    assert!(!viewer.poll_external_changes().expect("poll again"));
}
