//! Tests for the formatted output and envelope of built messages

use mogimail_compose::{Email, MailConfig};

fn formatted(email: &mut Email) -> String {
    let message = email.build_mime_message().unwrap();
    String::from_utf8(message.formatted()).unwrap()
}

#[test]
fn test_formatted_message_headers_and_body() {
    let mut email = Email::new();
    email
        .set_host_name("smtp.example.com")
        .add_to_named("recipient@example.com", "Recipient")
        .unwrap()
        .set_from("sender@example.com")
        .unwrap()
        .set_subject("Test Subject")
        .add_header("X-Priority", "1 (Highest)")
        .unwrap()
        .set_msg("Hello World")
        .unwrap();

    let raw = formatted(&mut email);
    assert!(raw.contains("From: sender@example.com\r\n"));
    assert!(raw.contains("To: Recipient <recipient@example.com>"));
    assert!(raw.contains("Subject: Test Subject\r\n"));
    assert!(raw.contains("X-Priority: 1 (Highest)\r\n"));
    assert!(raw.contains("Date: "));
    assert!(raw.contains("\r\n\r\nHello World"));
}

#[test]
fn test_bcc_is_in_envelope_but_not_headers() {
    let mut email = Email::new();
    email
        .set_host_name("smtp.example.com")
        .add_to("recipient@example.com")
        .unwrap()
        .add_bcc("hidden@example.com")
        .unwrap()
        .set_from("sender@example.com")
        .unwrap();

    let message = email.build_mime_message().unwrap();
    let raw = String::from_utf8(message.formatted()).unwrap();
    assert!(!raw.contains("hidden@example.com"));

    let envelope: Vec<String> = message
        .envelope()
        .to()
        .iter()
        .map(ToString::to_string)
        .collect();
    assert!(envelope.contains(&"hidden@example.com".to_string()));
}

#[test]
fn test_bounce_address_overrides_envelope_sender() {
    let mut email = Email::new();
    email
        .set_host_name("smtp.example.com")
        .add_to("recipient@example.com")
        .unwrap()
        .set_from("sender@example.com")
        .unwrap()
        .set_bounce_address("bounces@example.com")
        .unwrap();

    let message = email.build_mime_message().unwrap();
    let sender = message.envelope().from().map(ToString::to_string);
    assert_eq!(sender.as_deref(), Some("bounces@example.com"));
    assert_eq!(
        message.bounce_address().map(ToString::to_string).as_deref(),
        Some("bounces@example.com")
    );
}

#[test]
fn test_envelope_sender_defaults_to_from() {
    let mut email = Email::new();
    email
        .set_host_name("smtp.example.com")
        .add_cc("copy@example.com")
        .unwrap()
        .set_from("sender@example.com")
        .unwrap();

    let message = email.build_mime_message().unwrap();
    let sender = message.envelope().from().map(ToString::to_string);
    assert_eq!(sender.as_deref(), Some("sender@example.com"));
}

#[test]
fn test_html_content_type() {
    let mut email = Email::new();
    email
        .set_host_name("smtp.example.com")
        .add_to("recipient@example.com")
        .unwrap()
        .set_from("sender@example.com")
        .unwrap()
        .set_content("<p>Hello</p>", "text/html; charset=utf-8")
        .unwrap();

    let raw = formatted(&mut email);
    assert!(raw.contains("Content-Type: text/html; charset=utf-8"));
    assert!(raw.contains("<p>Hello</p>"));
}

#[test]
fn test_config_to_formatted_message() {
    let config = MailConfig::from_toml(
        r#"
[session]
host_name = "smtp.example.com"

[message]
from = "sender@example.com"
to = ["recipient@example.com"]
subject = "From config"
body = "Configured body"
"#,
    )
    .unwrap();

    let mut email = config.into_email().unwrap();
    let raw = formatted(&mut email);
    assert!(raw.contains("Subject: From config\r\n"));
    assert!(raw.contains("Configured body"));
}

#[test]
fn test_content_type_header_cannot_override_body_type() {
    let mut email = Email::new();
    email
        .set_host_name("smtp.example.com")
        .add_to("recipient@example.com")
        .unwrap()
        .set_from("sender@example.com")
        .unwrap();

    assert!(email.add_header("Content-Type", "text/html").is_err());
    email
        .set_content("<p>Hello</p>", "text/html; charset=utf-8")
        .unwrap();

    let message = email.build_mime_message().unwrap();
    assert!(message.header("Content-Type").is_none());
    let raw = String::from_utf8(message.formatted()).unwrap();
    assert!(raw.contains("Content-Type: text/html; charset=utf-8"));
}

#[test]
fn test_subject_header_cannot_shadow_subject() {
    let mut email = Email::new();
    email
        .set_host_name("smtp.example.com")
        .add_to("recipient@example.com")
        .unwrap()
        .set_from("sender@example.com")
        .unwrap()
        .set_subject("S1");

    assert!(email.add_header("Subject", "S2").is_err());

    let message = email.build_mime_message().unwrap();
    assert_eq!(message.subject(), Some("S1"));
    let raw = String::from_utf8(message.formatted()).unwrap();
    assert!(raw.contains("Subject: S1\r\n"));
    assert!(!raw.contains("S2"));
}
