//! Logger adapter tests.

use courier::providers::LoggerMailer;
use courier::{MailError, Mailer, Message};

fn message(subject: &str) -> Message {
    Message::new()
        .from("tony.stark@example.com")
        .to("steve.rogers@example.com")
        .subject(subject)
}

// ============================================================================
// Basic Delivery Tests
// ============================================================================

#[tokio::test]
async fn send_returns_ok() {
    let mailer = LoggerMailer::new();

    let result = mailer.send(&message("Hello, Avengers!").text("Hello!")).await.unwrap();
    assert!(!result.message_id.is_empty());
    assert_eq!(result.accepted_count, 1);
}

#[tokio::test]
async fn send_with_full_logging_returns_ok() {
    let mailer = LoggerMailer::full();

    let message = message("Hello, Avengers!")
        .to(("Bruce Banner", "bruce.banner@example.com"))
        .cc("natasha.romanoff@example.com")
        .bcc("nick.fury@example.com")
        .reply_to("pepper.potts@example.com")
        .html("<h1>Hello!</h1>")
        .text("Hello!")
        .extra("o:campaign", "avengers");

    let result = mailer.send(&message).await.unwrap();
    assert_eq!(result.accepted_count, 4);
    assert_eq!(result.rejected_count, 0);
}

#[tokio::test]
async fn message_ids_are_unique() {
    let mailer = LoggerMailer::new();
    let first = mailer.send(&message("one")).await.unwrap();
    let second = mailer.send(&message("two")).await.unwrap();
    assert_ne!(first.message_id, second.message_id);
}

// ============================================================================
// Validation Tests
// ============================================================================

#[tokio::test]
async fn send_without_recipient_fails() {
    let mailer = LoggerMailer::new();
    let message = Message::new().from("tony.stark@example.com").subject("Empty");

    assert!(matches!(
        mailer.send(&message).await,
        Err(MailError::MissingField("to"))
    ));
}

// ============================================================================
// send_many Tests
// ============================================================================

#[tokio::test]
async fn send_many_returns_one_result_per_message() {
    let mailer = LoggerMailer::new();

    let results = mailer
        .send_many(&[message("Email 1"), message("Email 2")])
        .await
        .unwrap();

    assert_eq!(results.len(), 2);
    assert!(results.iter().all(|r| !r.message_id.is_empty()));
}

#[tokio::test]
async fn send_many_stops_at_first_failure() {
    let mailer = LoggerMailer::new();
    let broken = Message::new().from("tony.stark@example.com");

    let result = mailer
        .send_many(&[message("Email 1"), broken, message("Email 3")])
        .await;
    assert!(matches!(result, Err(MailError::MissingField("to"))));
}

// ============================================================================
// Provider Name Test
// ============================================================================

#[test]
fn provider_name_returns_logger() {
    assert_eq!(LoggerMailer::new().provider_name(), "logger");
}
