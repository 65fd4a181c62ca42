//! Plain-text rendering of API resources for the terminal.

#[cfg(test)]
#[path = "render_test.rs"]
mod render_test;

use kidzevents::UserIdentity;
use kidzevents::types::{BaseUser, EventDetails, EventListItem, Registration};

pub fn price_label(price: Option<f64>) -> String {
    match price {
        Some(p) if p > 0.0 => format!("${p:.2}"),
        _ => "Free".to_owned(),
    }
}

/// Calendar date part of an ISO-8601 timestamp.
pub fn date_label(iso: &str) -> &str {
    iso.split('T').next().unwrap_or(iso)
}

pub fn identity_line(user: &UserIdentity) -> String {
    let name = user.display_name();
    if name == user.email { format!("{} ({})", user.email, user.role) } else { format!("{name} <{}> ({})", user.email, user.role) }
}

pub fn profile_lines(user: &BaseUser) -> Vec<String> {
    vec![
        format!("id:         {}", user.id),
        format!("email:      {}", user.email),
        format!("first name: {}", user.first_name.as_deref().unwrap_or("-")),
        format!("last name:  {}", user.last_name.as_deref().unwrap_or("-")),
    ]
}

pub fn event_line(event: &EventListItem) -> String {
    let mut line = format!(
        "#{:<4} {}  {}  @ {}  [{}]",
        event.id,
        date_label(&event.date),
        event.title,
        event.location,
        price_label(event.price)
    );
    if let Some(category) = event.category.as_deref() {
        line.push_str(&format!("  {category}"));
    }
    if let Some(age) = event.age_group.as_deref() {
        line.push_str(&format!("  ages {age}"));
    }
    let registered = event.registration_count();
    if registered > 0 {
        line.push_str(&format!("  ({registered} registered)"));
    }
    line
}

pub fn event_details_lines(event: &EventDetails) -> Vec<String> {
    let mut lines = vec![
        format!("{} (#{})", event.title, event.id),
        format!("when:      {}", event.date),
        format!("where:     {}", event.location),
        format!("price:     {}", price_label(event.price)),
        format!("organizer: {}", event.organizer.label()),
    ];
    if let Some(category) = &event.category {
        lines.push(format!("category:  {category}"));
    }
    if let Some(age) = &event.age_group {
        lines.push(format!("ages:      {age}"));
    }
    lines.push(String::new());
    lines.push(event.description.clone());
    lines
}

pub fn registration_line(registration: &Registration) -> String {
    let event = registration.event.as_ref().map_or_else(
        || format!("event #{}", registration.event_id),
        |e| format!("{} on {}", e.title, date_label(&e.date)),
    );
    match (&registration.child_name, registration.child_age) {
        (Some(name), Some(age)) => format!("#{} {event} for {name} ({age})", registration.id),
        (Some(name), None) => format!("#{} {event} for {name}", registration.id),
        _ => format!("#{} {event}", registration.id),
    }
}
