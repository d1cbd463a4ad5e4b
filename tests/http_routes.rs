//! Listing routes served through Rocket's local client

use std::net::{IpAddr, Ipv4Addr};
use std::num::NonZeroUsize;

use mailsink::{Envelope, IngestionGate, MailSink};
use rocket::http::{ContentType, Status};
use rocket::local::blocking::Client;
use serde_json::Value;

fn raw(from: &str, to: &str, subject: &str, date: &str) -> String {
    format!(
        "From: {from}\r\nTo: {to}\r\nSubject: {subject}\r\nDate: {date}\r\n\r\nBody of {subject}\r\n"
    )
}

fn deliver(sink: &MailSink, from: &str, to: &str, subject: &str, date: &str) {
    let envelope = Envelope::new(from.to_string(), vec![to.to_string()]);
    sink.on_body_received(&envelope, raw(from, to, subject, date).as_bytes())
        .unwrap();
}

/// Three messages, one hour apart, delivered oldest first
fn populated_sink() -> MailSink {
    let sink = MailSink::new(IngestionGate::open(), NonZeroUsize::new(10).unwrap());
    deliver(
        &sink,
        "alice@example.com",
        "bob@example.com",
        "first",
        "Mon, 1 Jan 2024 10:00:00 +0000",
    );
    deliver(
        &sink,
        "carol@example.com",
        "dave@example.com",
        "second",
        "Mon, 1 Jan 2024 11:00:00 +0000",
    );
    deliver(
        &sink,
        "alice@example.com",
        "dave@example.com",
        "third",
        "Mon, 1 Jan 2024 12:00:00 +0000",
    );
    sink
}

fn client(sink: &MailSink) -> Client {
    let rocket = mailsink::http::build(sink.query(), IpAddr::V4(Ipv4Addr::LOCALHOST), 0);
    Client::tracked(rocket).expect("valid rocket instance")
}

fn subjects(client: &Client, uri: &str) -> Vec<String> {
    let response = client.get(uri).dispatch();
    assert_eq!(response.status(), Status::Ok);
    assert_eq!(response.content_type(), Some(ContentType::JSON));

    let body: Value = response.into_json().expect("JSON body");
    body.as_array()
        .expect("JSON array")
        .iter()
        .map(|message| message["subject"].as_str().unwrap_or_default().to_string())
        .collect()
}

#[test]
fn test_api_lists_newest_first() {
    let sink = populated_sink();
    let client = client(&sink);

    assert_eq!(subjects(&client, "/api/emails"), vec!["third", "second", "first"]);
}

#[test]
fn test_api_message_shape() {
    let sink = populated_sink();
    let client = client(&sink);

    let response = client.get("/api/emails?from=carol@example.com").dispatch();
    let body: Value = response.into_json().unwrap();
    let message = &body[0];

    assert_eq!(message["from"][0]["address"], "carol@example.com");
    assert_eq!(message["to"][0]["address"], "dave@example.com");
    assert_eq!(message["envelopeFrom"], "carol@example.com");
    assert_eq!(message["date"], "2024-01-01T11:00:00Z");
    assert!(message["text"].as_str().unwrap().contains("Body of second"));
}

#[test]
fn test_api_filters_combine() {
    let sink = populated_sink();
    let client = client(&sink);

    assert_eq!(
        subjects(&client, "/api/emails?from=alice@example.com"),
        vec!["third", "first"]
    );
    assert_eq!(
        subjects(&client, "/api/emails?to=dave@example.com&from=alice@example.com"),
        vec!["third"]
    );
}

#[test]
fn test_api_date_window_is_inclusive() {
    let sink = populated_sink();
    let client = client(&sink);

    assert_eq!(
        subjects(
            &client,
            "/api/emails?since=2024-01-01T11:00:00Z&until=2024-01-01T12:00:00Z"
        ),
        vec!["third", "second"]
    );
    assert_eq!(
        subjects(&client, "/api/emails?until=2024-01-01%2010:00"),
        vec!["first"]
    );
}

#[test]
fn test_api_recipient_path_overrides_query() {
    let sink = populated_sink();
    let client = client(&sink);

    assert_eq!(
        subjects(&client, "/api/emails/dave@example.com"),
        vec!["third", "second"]
    );
    assert_eq!(
        subjects(&client, "/api/emails/bob@example.com?to=dave@example.com"),
        vec!["first"]
    );
    assert!(subjects(&client, "/api/emails/nobody@example.com").is_empty());
}

#[test]
fn test_api_unparseable_values_ignored() {
    let sink = populated_sink();
    let client = client(&sink);

    assert_eq!(
        subjects(&client, "/api/emails?since=yesterday&until=&to=%20"),
        vec!["third", "second", "first"]
    );
}

#[test]
fn test_html_listing() {
    let sink = populated_sink();
    let client = client(&sink);

    let response = client.get("/emails").dispatch();
    assert_eq!(response.status(), Status::Ok);
    assert_eq!(response.content_type(), Some(ContentType::HTML));

    let body = response.into_string().unwrap();
    let third = body.find("Body of third").unwrap();
    let first = body.find("Body of first").unwrap();
    assert!(third < first);
    assert!(body.contains("alice@example.com"));
}

#[test]
fn test_html_listing_for_recipient() {
    let sink = populated_sink();
    let client = client(&sink);

    let body = client
        .get("/emails/bob@example.com")
        .dispatch()
        .into_string()
        .unwrap();

    assert!(body.contains("Body of first"));
    assert!(!body.contains("Body of second"));
    assert!(!body.contains("Body of third"));
}

#[test]
fn test_empty_store() {
    let sink = MailSink::new(IngestionGate::open(), NonZeroUsize::new(1).unwrap());
    let client = client(&sink);

    assert!(subjects(&client, "/api/emails").is_empty());

    let body = client.get("/emails").dispatch().into_string().unwrap();
    assert!(body.contains("No e-mails"));
}
