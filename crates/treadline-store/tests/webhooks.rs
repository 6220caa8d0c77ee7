use treadline_core::domain::{parse_webhook_events, WebhookEvent, WebhookKind};
use treadline_store::error::StoreErrorKind;
use treadline_store::repo::WebhookNew;
use treadline_store::Store;

fn input(url: &str) -> WebhookNew {
    WebhookNew {
        name: "Sales channel".to_string(),
        url: url.to_string(),
        kind: WebhookKind::Slack,
        events: parse_webhook_events("lead_approved, lead_converted").expect("events"),
    }
}

#[test]
fn webhook_crud() {
    let store = Store::open_in_memory().expect("open in memory");
    store.migrate().expect("migrate");

    let created = store
        .webhooks()
        .create(1, input("https://hooks.slack.com/services/T000/B000/XXX"))
        .expect("create");
    assert!(created.is_active);
    assert!(created.wants(WebhookEvent::LeadApproved));
    assert!(!created.wants(WebhookEvent::LeadRejected));

    let listed = store.webhooks().list().expect("list");
    assert_eq!(listed, vec![created.clone()]);

    let toggled = store.webhooks().toggle(created.id).expect("toggle");
    assert!(!toggled.is_active);
    assert!(!toggled.wants(WebhookEvent::LeadApproved));

    store.webhooks().delete(created.id).expect("delete");
    assert!(store.webhooks().list().expect("list").is_empty());
    let err = store.webhooks().toggle(created.id).unwrap_err();
    assert_eq!(err.kind(), StoreErrorKind::NotFound);
}

#[test]
fn webhook_requires_https_and_events() {
    let store = Store::open_in_memory().expect("open in memory");
    store.migrate().expect("migrate");

    let err = store
        .webhooks()
        .create(1, input("http://hooks.example.com/x"))
        .unwrap_err();
    assert_eq!(err.kind(), StoreErrorKind::InvalidWebhookUrl);

    let mut empty = input("https://hooks.example.com/x");
    empty.events.clear();
    let err = store.webhooks().create(1, empty).unwrap_err();
    assert_eq!(err.kind(), StoreErrorKind::Core);
}
