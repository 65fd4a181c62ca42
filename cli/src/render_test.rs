use kidzevents::Role;

use super::*;

fn listed(json: &str) -> EventListItem {
    serde_json::from_str(json).unwrap()
}

#[test]
fn price_label_treats_zero_and_missing_as_free() {
    assert_eq!(price_label(None), "Free");
    assert_eq!(price_label(Some(0.0)), "Free");
    assert_eq!(price_label(Some(12.5)), "$12.50");
}

#[test]
fn date_label_drops_time() {
    assert_eq!(date_label("2026-07-01T10:00:00.000Z"), "2026-07-01");
    assert_eq!(date_label("2026-07-01"), "2026-07-01");
}

#[test]
fn identity_line_with_and_without_name() {
    let mut user = UserIdentity {
        id: 1,
        email: "o@x.com".to_owned(),
        first_name: Some("Olive".to_owned()),
        last_name: Some("Oak".to_owned()),
        role: Role::Organizer,
    };
    assert_eq!(identity_line(&user), "Olive Oak <o@x.com> (ORGANIZER)");
    user.first_name = None;
    user.last_name = None;
    assert_eq!(identity_line(&user), "o@x.com (ORGANIZER)");
}

#[test]
fn event_line_includes_optional_fields() {
    let event = listed(
        r#"{"id":3,"title":"Art","description":"d","date":"2026-07-01T10:00:00Z","location":"Hall",
            "category":"Arts","ageGroup":"6-9","price":5,"_count":{"registrations":2}}"#,
    );
    assert_eq!(event_line(&event), "#3    2026-07-01  Art  @ Hall  [$5.00]  Arts  ages 6-9  (2 registered)");
}

#[test]
fn event_line_minimal() {
    let event = listed(r#"{"id":12,"title":"Swim","description":"d","date":"2026-08-02","location":"Pool"}"#);
    assert_eq!(event_line(&event), "#12   2026-08-02  Swim  @ Pool  [Free]");
}

#[test]
fn registration_line_variants() {
    let with_event: Registration = serde_json::from_str(
        r#"{"id":1,"eventId":3,"userId":7,"registeredAt":"2026-06-01T00:00:00Z","childName":"Kid","childAge":7,
            "event":{"id":3,"title":"Art","date":"2026-07-01T10:00:00Z"}}"#,
    )
    .unwrap();
    assert_eq!(registration_line(&with_event), "#1 Art on 2026-07-01 for Kid (7)");

    let bare: Registration =
        serde_json::from_str(r#"{"id":2,"eventId":4,"userId":7,"registeredAt":"2026-06-01T00:00:00Z"}"#).unwrap();
    assert_eq!(registration_line(&bare), "#2 event #4");
}
