//! Mailgun adapter tests.

use courier::providers::{MailgunConfig, MailgunMailer};
use courier::{Attachment, MailError, Mailer, Message};
use serde_json::json;
use wiremock::matchers::{body_string_contains, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

// ============================================================================
// Helper Functions
// ============================================================================

const MIME_PATH: &str = "/v3/avengers.com/messages.mime";

fn mailer(server: &MockServer) -> MailgunMailer {
    mailer_with(server, MailgunConfig::new("avengers.com", "fake-api-key"))
}

fn mailer_with(server: &MockServer, config: MailgunConfig) -> MailgunMailer {
    MailgunMailer::new(config.base_url(server.uri())).unwrap()
}

fn valid_message() -> Message {
    Message::new()
        .from("tony.stark@example.com")
        .to(("virk", "steve.rogers@example.com"))
        .subject("Mailgun email")
        .html("<h2> Hello </h2>")
}

fn success_response() -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({
        "message": "Queued. Thank you.",
        "id": "<20111114174239.25659.5817@samples.mailgun.org>"
    }))
}

async fn last_body(server: &MockServer) -> String {
    let requests = server.received_requests().await.unwrap();
    let request = requests.last().expect("no request received");
    String::from_utf8_lossy(&request.body).to_string()
}

// ============================================================================
// Basic Delivery Tests
// ============================================================================

#[tokio::test]
async fn send_plain_message_returns_normalized_result() {
    let server = MockServer::start().await;

    // Mailgun uses Basic auth with "api:key" format
    let expected_auth = format!(
        "Basic {}",
        base64::Engine::encode(
            &base64::engine::general_purpose::STANDARD,
            "api:fake-api-key"
        )
    );

    Mock::given(method("POST"))
        .and(path(MIME_PATH))
        .and(header("Authorization", expected_auth.as_str()))
        .respond_with(success_response())
        .expect(1)
        .mount(&server)
        .await;

    let result = mailer(&server).send(&valid_message()).await.unwrap();
    assert_eq!(
        result.message_id,
        "20111114174239.25659.5817@samples.mailgun.org"
    );
    assert_eq!(result.accepted_count, 1);
    assert_eq!(result.rejected_count, 0);
    assert_eq!(
        result.provider_response.unwrap()["message"],
        "Queued. Thank you."
    );
}

#[tokio::test]
async fn send_posts_recipients_and_mime_body() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(MIME_PATH))
        .and(body_string_contains(
            "Mr foo <foo@bar.com>,Mr baz <baz@bar.com>",
        ))
        .and(body_string_contains("Subject: Mailgun email"))
        .respond_with(success_response())
        .expect(1)
        .mount(&server)
        .await;

    let message = Message::new()
        .from("tony.stark@example.com")
        .to(("Mr foo", "foo@bar.com"))
        .cc(("Mr baz", "baz@bar.com"))
        .subject("Mailgun email")
        .text("Hello");

    let result = mailer(&server).send(&message).await.unwrap();
    assert_eq!(result.accepted_count, 2);

    let body = last_body(&server).await;
    assert!(body.contains("name=\"to\""));
    assert!(body.contains("name=\"message\"; filename=\"message.mime\""));
}

#[tokio::test]
async fn send_puts_bcc_in_recipients_only() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(MIME_PATH))
        .and(body_string_contains(
            "Mr foo <foo@bar.com>,Mr baz <baz@bar.com>",
        ))
        .respond_with(success_response())
        .expect(1)
        .mount(&server)
        .await;

    let message = Message::new()
        .from("tony.stark@example.com")
        .to(("Mr foo", "foo@bar.com"))
        .bcc(("Mr baz", "baz@bar.com"))
        .subject("Hello")
        .text("Hello");

    mailer(&server).send(&message).await.unwrap();

    let body = last_body(&server).await;
    assert!(!body.contains("Bcc:"));
}

#[tokio::test]
async fn send_with_all_fields_returns_ok() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(MIME_PATH))
        .and(body_string_contains("name=\"h:X-Mailer\""))
        .respond_with(success_response())
        .expect(1)
        .mount(&server)
        .await;

    let message = Message::new()
        .from(("T Stark", "tony.stark@example.com"))
        .to(("Steve Rogers", "steve.rogers@example.com"))
        .to("wasp.avengers@example.com")
        .reply_to("office.avengers@example.com")
        .cc(("Bruce Banner", "hulk.smash@example.com"))
        .bcc("beast.avengers@example.com")
        .subject("Hello, Avengers!")
        .html("<h1>Hello</h1>")
        .text("Hello")
        .header("X-Mailer", "courier")
        .attachment(Attachment::from_bytes("plan.txt", b"assemble".to_vec()));

    let result = mailer(&server).send(&message).await.unwrap();
    assert_eq!(result.accepted_count, 4);
}

// ============================================================================
// Extras Tests
// ============================================================================

#[tokio::test]
async fn send_includes_configured_extras() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(MIME_PATH))
        .and(body_string_contains("name=\"o:campaign\""))
        .and(body_string_contains("marketing"))
        .respond_with(success_response())
        .expect(1)
        .mount(&server)
        .await;

    let mailer = mailer_with(
        &server,
        MailgunConfig::new("avengers.com", "fake-api-key").extra("o:campaign", "marketing"),
    );
    assert!(mailer.send(&valid_message()).await.is_ok());
}

#[tokio::test]
async fn per_message_extras_override_configured() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(MIME_PATH))
        .respond_with(success_response())
        .expect(1)
        .mount(&server)
        .await;

    let mailer = mailer_with(
        &server,
        MailgunConfig::new("avengers.com", "fake-api-key")
            .extra("o:campaign", "marketing")
            .extra("o:tracking", "yes"),
    );
    let message = valid_message().extra("o:campaign", "sales");
    mailer.send(&message).await.unwrap();

    let body = last_body(&server).await;
    assert!(body.contains("sales"));
    assert!(!body.contains("marketing"));
    assert!(body.contains("name=\"o:tracking\""));
    assert_eq!(body.matches("name=\"o:campaign\"").count(), 1);
}

// ============================================================================
// Error Response Tests
// ============================================================================

#[tokio::test]
async fn send_with_401_response_surfaces_status() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(MIME_PATH))
        .respond_with(ResponseTemplate::new(401).set_body_string("Forbidden"))
        .expect(1)
        .mount(&server)
        .await;

    let err = mailer(&server)
        .send(&valid_message())
        .await
        .unwrap_err();

    assert!(err.to_string().contains("Response code 401"));
    assert!(err.to_string().contains("Forbidden"));
    assert_eq!(err.status(), Some(401));
}

#[tokio::test]
async fn send_with_400_json_response_uses_provider_message() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(MIME_PATH))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "message": "'to' parameter is not a valid address. please check documentation"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let err = mailer(&server)
        .send(&valid_message())
        .await
        .unwrap_err();

    match err {
        MailError::ProviderError {
            provider,
            message,
            status,
        } => {
            assert_eq!(provider, "mailgun");
            assert_eq!(status, Some(400));
            assert_eq!(
                message,
                "Response code 400 (Bad Request): 'to' parameter is not a valid address. please check documentation"
            );
        }
        other => panic!("unexpected error: {:?}", other),
    }
}

#[tokio::test]
async fn send_with_500_response_is_not_retried() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(MIME_PATH))
        .respond_with(ResponseTemplate::new(500).set_body_string("upstream down"))
        .expect(1)
        .mount(&server)
        .await;

    let result = mailer(&server).send(&valid_message()).await;
    assert!(matches!(result, Err(MailError::ProviderError { status: Some(500), .. })));
}

#[tokio::test]
async fn send_with_unreachable_host_is_http_error() {
    let mailer = MailgunMailer::new(
        MailgunConfig::new("avengers.com", "fake-api-key").base_url("http://127.0.0.1:1"),
    )
    .unwrap();

    let result = mailer.send(&valid_message()).await;
    assert!(matches!(result, Err(MailError::HttpError(_))));
}

// ============================================================================
// Recipient Pass-Through Tests
// ============================================================================

#[tokio::test]
async fn quoted_local_part_reaches_mailgun() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(MIME_PATH))
        .and(body_string_contains("\"john doe\"@example.com"))
        .respond_with(success_response())
        .expect(1)
        .mount(&server)
        .await;

    let message = Message::new()
        .from("tony.stark@example.com")
        .to("\"john doe\"@example.com")
        .cc("user@[127.0.0.1]")
        .text("Hi");

    let result = mailer(&server).send(&message).await.unwrap();
    assert_eq!(result.accepted_count, 2);

    let body = last_body(&server).await;
    assert!(body.contains("\"john doe\"@example.com,user@[127.0.0.1]"));
    assert!(body.contains("Cc: user@[127.0.0.1]"));
}

#[tokio::test]
async fn malformed_recipient_is_rejected_by_mailgun() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(MIME_PATH))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "message": "to parameter is not a valid address. please check documentation"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let message = Message::new()
        .from("tony.stark@example.com")
        .to("not an address")
        .text("Hi");

    let err = mailer(&server).send(&message).await.unwrap_err();
    assert_eq!(err.status(), Some(400));
    assert!(err.to_string().contains("not a valid address"));
}

// ============================================================================
// Validation Tests
// ============================================================================

#[tokio::test]
async fn send_without_from_makes_no_request() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(success_response())
        .expect(0)
        .mount(&server)
        .await;

    let message = Message::new().to("steve.rogers@example.com").text("Hi");
    let result = mailer(&server).send(&message).await;
    assert!(matches!(result, Err(MailError::MissingField("from"))));
}

#[tokio::test]
async fn send_without_to_makes_no_request() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(success_response())
        .expect(0)
        .mount(&server)
        .await;

    // cc alone is not enough
    let message = Message::new()
        .from("tony.stark@example.com")
        .cc("steve.rogers@example.com")
        .text("Hi");
    let result = mailer(&server).send(&message).await;
    assert!(matches!(result, Err(MailError::MissingField("to"))));
}

#[test]
fn empty_api_key_fails_before_any_request() {
    let result = MailgunMailer::new(MailgunConfig::new("avengers.com", ""));
    assert!(matches!(result, Err(MailError::Configuration(_))));
}

// ============================================================================
// Endpoint Tests
// ============================================================================

#[test]
fn endpoint_without_region() {
    let mailer = MailgunMailer::new(MailgunConfig::new("test.domain", "key")).unwrap();
    assert_eq!(
        mailer.endpoint(),
        "https://api.mailgun.net/v3/test.domain/messages.mime"
    );
}

#[test]
fn endpoint_with_region() {
    let mailer =
        MailgunMailer::new(MailgunConfig::new("test.domain", "key").region("EU")).unwrap();
    assert_eq!(
        mailer.endpoint(),
        "https://api.eu.mailgun.net/v3/test.domain/messages.mime"
    );
}

// ============================================================================
// Concurrency Tests
// ============================================================================

#[tokio::test]
async fn concurrent_sends_share_one_driver() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(MIME_PATH))
        .respond_with(success_response())
        .expect(8)
        .mount(&server)
        .await;

    let mailer = std::sync::Arc::new(mailer(&server));
    let mut handles = Vec::new();
    for i in 0..8 {
        let mailer = std::sync::Arc::clone(&mailer);
        handles.push(tokio::spawn(async move {
            let message = valid_message().subject(format!("Message {}", i));
            mailer.send(&message).await
        }));
    }

    for handle in handles {
        assert_eq!(handle.await.unwrap().unwrap().accepted_count, 1);
    }
}

// ============================================================================
// Provider Name Test
// ============================================================================

#[test]
fn provider_name_returns_mailgun() {
    let mailer = MailgunMailer::new(MailgunConfig::new("avengers.com", "fake-api-key")).unwrap();
    assert_eq!(mailer.provider_name(), "mailgun");
}
