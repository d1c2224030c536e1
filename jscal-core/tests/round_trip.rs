//! JSON and iCalendar round trips through the public API.

use jscal_core::ics::{export_calendar, import_calendar, import_single};
use jscal_core::model::{
    Frequency, NDay, Participant, ParticipantRole, RecurrenceRule, Weekday,
};
use jscal_core::{BridgeConfig, Duration, Event, Group, LocalDateTime, Task, parse_all, parse_event};

fn planning_event() -> Event {
    let mut event = Event::new("planning-2025@example.com", "Quarterly planning");
    event.set_start(LocalDateTime::parse("2025-04-01T09:30:00").unwrap());
    event.set_duration(Duration::parse("PT2H30M").unwrap());
    event.time_zone = Some("Europe/Berlin".to_string());
    event.add_category("work");
    event.add_category("planning");

    let mut olive = Participant::new("Olive", "olive@example.com");
    olive.add_role(ParticipantRole::Owner);
    event.add_participant("olive@example.com", olive);
    event.add_participant("bob@example.com", Participant::new("Bob", "bob@example.com"));

    event.set_recurrence(vec![
        RecurrenceRule::new(Frequency::Monthly)
            .with_count(4)
            .with_by_day([NDay::nth(Weekday::Tu, 1)]),
    ]);
    event
}

#[test_log::test]
fn ics_round_trip_preserves_core_fields() {
    let original = planning_event();
    assert!(original.validate().is_ok());

    let ics = export_calendar(std::slice::from_ref(&original), &BridgeConfig::default()).unwrap();
    let back = import_single(&ics).unwrap();

    assert_eq!(back.uid, original.uid);
    assert_eq!(back.title, original.title);
    assert_eq!(back.start, original.start);
    assert_eq!(back.duration().unwrap(), original.duration().unwrap());
    assert_eq!(back.categories, original.categories);
    assert_eq!(back.time_zone.as_deref(), Some("Europe/Berlin"));
    assert_eq!(back.sequence, Some(0));

    let olive = &back.participants["olive@example.com"];
    assert!(olive.has_role(ParticipantRole::Owner));
    assert!(olive.has_role(ParticipantRole::Attendee));
    assert_eq!(olive.name.as_deref(), Some("Olive"));
    assert!(!back.participants["bob@example.com"].has_role(ParticipantRole::Owner));

    let rule = &back.recurrence_rules[0];
    assert_eq!(rule.frequency(), Some(Frequency::Monthly));
    assert_eq!(rule.count, Some(4));
    assert_eq!(rule.by_day, vec![NDay::nth(Weekday::Tu, 1)]);

    assert!(back.validate().is_ok());
}

#[test_log::test]
fn ics_round_trip_keeps_special_characters() {
    let mut event = planning_event();
    event.title = Some("Backup, part 2; again".to_string());
    event.description = Some("Copy C:\\new\\nightly\nthen verify, twice".to_string());
    event.add_category("Q1, Q2");
    event.add_category("C:\\temp");

    let ics = export_calendar(std::slice::from_ref(&event), &BridgeConfig::default()).unwrap();
    assert!(ics.contains("CATEGORIES:Q1\\, Q2\r\n"), "ICS:\n{ics}");

    let back = import_single(&ics).unwrap();
    assert_eq!(back.title, event.title);
    assert_eq!(back.description, event.description);
    assert_eq!(back.categories, event.categories);
}

#[test_log::test]
fn ics_batch_round_trip() {
    let mut second = Event::new("standup@example.com", "Standup");
    second.set_start(LocalDateTime::parse("2025-04-02T08:00:00").unwrap());
    second.set_duration(Duration::minutes(15));

    let ics = export_calendar(&[planning_event(), second], &BridgeConfig::default()).unwrap();
    let uids: Vec<String> = import_calendar(&ics)
        .unwrap()
        .into_iter()
        .map(|r| r.unwrap().uid)
        .collect();

    assert_eq!(uids, vec!["planning-2025@example.com", "standup@example.com"]);
}

#[test]
fn json_round_trip_keeps_unknown_properties() {
    let json = r#"{
        "@type": "Event",
        "uid": "ext-1",
        "title": "With extensions",
        "start": "2025-03-20T12:00:00.250",
        "duration": "PT45M",
        "example.com:flavour": {"colour": "teal", "depth": 3}
    }"#;

    let event = parse_event(json).unwrap();
    assert_eq!(event.start.unwrap().nanosecond(), 250_000_000);
    assert!(event.extensions.contains_key("example.com:flavour"));

    let again = parse_event(&event.to_json().unwrap()).unwrap();
    assert_eq!(again, event);
}

#[test]
fn mixed_array_decodes_every_type() {
    let mut group = Group::new("bundle", "Bundle");
    group.add_entry(Task::new("t1", "Prepare slides")).unwrap();
    group.add_entry(planning_event()).unwrap();

    let json = format!(
        "[{}, {}]",
        group.to_json().unwrap(),
        Task::new("t2", "Book room").to_json().unwrap()
    );

    let objects = parse_all(&json).unwrap();
    assert_eq!(objects.len(), 2);
    assert_eq!(objects[0].as_group().unwrap().count_entries(), 2);
    assert_eq!(objects[1].uid(), "t2");
}
