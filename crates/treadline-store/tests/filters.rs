use chrono::{FixedOffset, TimeZone};
use treadline_core::domain::{Channel, LeadStatus};
use treadline_core::filter::parse_filter;
use treadline_store::query::LeadQuery;
use treadline_store::repo::LeadNew;
use treadline_store::Store;

fn utc() -> FixedOffset {
    FixedOffset::east_opt(0).unwrap()
}

fn at(day: u32) -> i64 {
    utc()
        .with_ymd_and_hms(2025, 3, day, 15, 0, 0)
        .unwrap()
        .timestamp()
}

fn seed(store: &Store) {
    let rows = [
        ("Carla Mendes", "Mineradora Vale Alto", "otr", 1, LeadStatus::Approved),
        ("Diego Rocha", "Transportes Rocha", "contact", 10, LeadStatus::Pending),
        ("Elisa Prado", "Mineradora Serra", "otr", 20, LeadStatus::Converted),
    ];
    for (name, company, channel, day, status) in rows {
        let lead = store
            .leads()
            .create(
                at(day),
                LeadNew {
                    name: name.to_string(),
                    email: format!("{}@example.com", name.split(' ').next().unwrap()),
                    company: Some(company.to_string()),
                    subject: None,
                    message: String::new(),
                    channel: Channel::new(channel).unwrap(),
                },
            )
            .expect("create");
        store
            .leads()
            .set_status(at(day), lead.id, &status)
            .expect("status");
    }
}

fn names(store: &Store, filter: &str) -> Vec<String> {
    let filter = parse_filter(filter).expect("parse filter");
    let query = LeadQuery::from_filter(&filter).expect("query");
    store
        .leads()
        .list_leads(&query, utc())
        .expect("list")
        .into_iter()
        .map(|lead| lead.name)
        .collect()
}

#[test]
fn filters_combine_with_and() {
    let store = Store::open_in_memory().expect("open in memory");
    store.migrate().expect("migrate");
    seed(&store);

    assert_eq!(
        names(&store, ""),
        vec!["Elisa Prado", "Diego Rocha", "Carla Mendes"]
    );
    assert_eq!(names(&store, "#otr"), vec!["Elisa Prado", "Carla Mendes"]);
    assert_eq!(names(&store, "#otr status:converted"), vec!["Elisa Prado"]);
    assert_eq!(names(&store, "mineradora"), vec!["Elisa Prado", "Carla Mendes"]);
    assert_eq!(names(&store, "status:Pending"), vec!["Diego Rocha"]);
}

#[test]
fn date_bounds_include_whole_until_day() {
    let store = Store::open_in_memory().expect("open in memory");
    store.migrate().expect("migrate");
    seed(&store);

    assert_eq!(
        names(&store, "since:2025-03-10 until:2025-03-10"),
        vec!["Diego Rocha"]
    );
    assert_eq!(
        names(&store, "until:2025-03-09"),
        vec!["Carla Mendes"]
    );
}

#[test]
fn free_text_treats_like_wildcards_literally() {
    let store = Store::open_in_memory().expect("open in memory");
    store.migrate().expect("migrate");
    for (name, company) in [("Ana Souza", None), ("Bruno", Some("Pneus 100% Reciclados"))] {
        store
            .leads()
            .create(
                at(5),
                LeadNew {
                    name: name.to_string(),
                    email: "lead@example.com".to_string(),
                    company: company.map(str::to_string),
                    subject: None,
                    message: String::new(),
                    channel: Channel::new("contact").unwrap(),
                },
            )
            .expect("create");
    }

    assert_eq!(names(&store, "%"), vec!["Bruno"]);
    assert_eq!(names(&store, "100%"), vec!["Bruno"]);
    assert!(names(&store, "A_a").is_empty());
    assert!(names(&store, "Ana_Souza").is_empty());
    assert_eq!(names(&store, "Souza"), vec!["Ana Souza"]);
}
