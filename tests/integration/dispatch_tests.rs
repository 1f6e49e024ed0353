use crate::{
    closed_port, portal_config, portal_page, test_config, truncated_body_endpoint, RecordingSession,
};
use chrono::{Duration, TimeZone, Utc};
use placement_bot::bot::messages::{
    ABOUT_MESSAGE, CONNECT_MESSAGE, FETCH_ERROR_MESSAGE, FORMAT_WARNING, NOT_FOUND_MESSAGE, PROCESSING_MESSAGE,
    START_MESSAGE, TIMEOUT_MESSAGE, UNAVAILABLE_MESSAGE,
};
use placement_bot::bot::{
    Command, DispatchOutcome, Dispatcher, InboundMessage, MessageHandle, TextFormat,
};
use placement_bot::config::{Config, PortalConfig};
use placement_bot::FailureKind;
use wiremock::matchers::{any, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn jane_page() -> String {
    portal_page(&[
        ("Full Name", "Jane Doe"),
        ("Admission Number", "12345"),
        ("Program", "Software Engineering"),
    ])
}

async fn mount_page(server: &MockServer, body: String, expected_calls: u64) {
    Mock::given(method("GET"))
        .and(path("/freshmanR"))
        .respond_with(ResponseTemplate::new(200).set_body_string(body))
        .expect(expected_calls)
        .mount(server)
        .await;
}

fn message(id: &str, text: &str) -> InboundMessage {
    InboundMessage::received_at(id, text, Utc.with_ymd_and_hms(2024, 9, 1, 8, 0, 0).unwrap())
}

#[tokio::test]
async fn test_found_placement() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/freshmanR"))
        .and(query_param("AdmissionNumber", "12345"))
        .respond_with(ResponseTemplate::new(200).set_body_string(jane_page()))
        .expect(1)
        .mount(&mock_server)
        .await;

    let dispatcher = Dispatcher::from_config(&test_config(&mock_server)).unwrap();
    let session = RecordingSession::new();

    let outcome = dispatcher
        .handle_text(&session, &message("1:1", "  12345  "))
        .await
        .unwrap();

    let record = match outcome {
        DispatchOutcome::Found(record) => record,
        other => panic!("expected a found placement, got {:?}", other),
    };
    assert_eq!(record.full_name.as_deref(), Some("Jane Doe"));
    assert_eq!(record.admission_number.as_deref(), Some("12345"));
    assert_eq!(record.program.as_deref(), Some("Software Engineering"));

    let sent = session.sent.lock().unwrap().clone();
    assert_eq!(sent.len(), 2);
    assert_eq!(sent[0].text, PROCESSING_MESSAGE);
    assert_eq!(sent[1].format, TextFormat::Markdown);
    assert!(sent[1].text.contains("*Name:* Jane Doe"));
    assert!(sent[1].text.contains("*Program:* Software Engineering"));
    assert!(sent[1].text.contains("*Section:* N/A"));
    assert!(sent[1].text.contains("*Cafeteria:* N/A"));
    assert!(sent[1]
        .text
        .contains(&format!("{}/freshmanR?AdmissionNumber=12345", mock_server.uri())));

    // The processing message is retracted before the result is sent
    assert_eq!(session.deleted(), vec![MessageHandle(1)]);
}

#[tokio::test]
async fn test_not_found_placement() {
    let mock_server = MockServer::start().await;
    mount_page(&mock_server, portal_page(&[("Nationality", "Ethiopian")]), 1).await;

    let dispatcher = Dispatcher::from_config(&test_config(&mock_server)).unwrap();
    let session = RecordingSession::new();

    let outcome = dispatcher
        .handle_text(&session, &message("1:1", "99999"))
        .await
        .unwrap();

    assert_eq!(outcome, DispatchOutcome::NotFound);
    assert_eq!(session.texts(), vec![PROCESSING_MESSAGE, NOT_FOUND_MESSAGE]);
    assert_eq!(session.deleted().len(), 1);
}

#[tokio::test]
async fn test_invalid_identifier_makes_no_request() {
    let mock_server = MockServer::start().await;
    Mock::given(any())
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&mock_server)
        .await;

    let dispatcher = Dispatcher::from_config(&test_config(&mock_server)).unwrap();

    for (i, text) in ["12", "  ab  ", "", "123456789012345678901"].iter().enumerate() {
        let session = RecordingSession::new();
        let outcome = dispatcher
            .handle_text(&session, &message(&format!("1:{}", i), text))
            .await
            .unwrap();

        assert_eq!(outcome, DispatchOutcome::InvalidIdentifier);
        assert_eq!(session.texts(), vec![FORMAT_WARNING]);
    }
}

#[tokio::test]
async fn test_boundary_lengths_are_fetched() {
    let mock_server = MockServer::start().await;
    mount_page(&mock_server, portal_page(&[]), 2).await;

    let dispatcher = Dispatcher::from_config(&test_config(&mock_server)).unwrap();
    let session = RecordingSession::new();

    for (i, text) in ["123", "12345678901234567890"].iter().enumerate() {
        let outcome = dispatcher
            .handle_text(&session, &message(&format!("1:{}", i), text))
            .await
            .unwrap();
        assert_eq!(outcome, DispatchOutcome::NotFound);
    }
}

#[tokio::test]
async fn test_duplicate_within_window_suppressed() {
    let mock_server = MockServer::start().await;
    mount_page(&mock_server, jane_page(), 1).await;

    let dispatcher = Dispatcher::from_config(&test_config(&mock_server)).unwrap();
    let session = RecordingSession::new();

    let first = message("1:7", "12345");
    let mut second = first.clone();
    second.received_at = first.received_at + Duration::milliseconds(999);

    assert!(matches!(
        dispatcher.handle_text(&session, &first).await.unwrap(),
        DispatchOutcome::Found(_)
    ));
    assert_eq!(
        dispatcher.handle_text(&session, &second).await.unwrap(),
        DispatchOutcome::Suppressed
    );
    assert_eq!(session.texts().len(), 2);
}

#[tokio::test]
async fn test_duplicate_after_window_processed() {
    let mock_server = MockServer::start().await;
    mount_page(&mock_server, jane_page(), 2).await;

    let dispatcher = Dispatcher::from_config(&test_config(&mock_server)).unwrap();
    let session = RecordingSession::new();

    let first = message("1:7", "12345");
    let mut second = first.clone();
    second.received_at = first.received_at + Duration::milliseconds(1000);

    assert!(matches!(
        dispatcher.handle_text(&session, &first).await.unwrap(),
        DispatchOutcome::Found(_)
    ));
    assert!(matches!(
        dispatcher.handle_text(&session, &second).await.unwrap(),
        DispatchOutcome::Found(_)
    ));
}

#[tokio::test]
async fn test_invalid_message_still_recorded_for_dedup() {
    let mock_server = MockServer::start().await;
    let dispatcher = Dispatcher::from_config(&test_config(&mock_server)).unwrap();
    let session = RecordingSession::new();

    let first = message("1:8", "12");
    assert_eq!(
        dispatcher.handle_text(&session, &first).await.unwrap(),
        DispatchOutcome::InvalidIdentifier
    );
    assert_eq!(
        dispatcher.handle_text(&session, &first).await.unwrap(),
        DispatchOutcome::Suppressed
    );
    assert_eq!(session.texts(), vec![FORMAT_WARNING]);
}

#[tokio::test]
async fn test_portal_timeout() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(jane_page())
                .set_delay(std::time::Duration::from_secs(3)),
        )
        .mount(&mock_server)
        .await;

    let config = Config {
        portal: portal_config(&mock_server, 1),
        ..Config::default()
    };
    let dispatcher = Dispatcher::from_config(&config).unwrap();
    let session = RecordingSession::new();

    let outcome = dispatcher
        .handle_text(&session, &message("1:1", "12345"))
        .await
        .unwrap();

    assert_eq!(outcome, DispatchOutcome::FetchFailed(FailureKind::Timeout));
    assert_eq!(session.texts(), vec![PROCESSING_MESSAGE, TIMEOUT_MESSAGE]);
    assert_eq!(session.deleted(), vec![MessageHandle(1)]);
}

#[tokio::test]
async fn test_portal_unavailable() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&mock_server)
        .await;

    let dispatcher = Dispatcher::from_config(&test_config(&mock_server)).unwrap();
    let session = RecordingSession::new();

    let outcome = dispatcher
        .handle_text(&session, &message("1:1", "12345"))
        .await
        .unwrap();

    assert_eq!(
        outcome,
        DispatchOutcome::FetchFailed(FailureKind::HttpStatus(500))
    );
    assert_eq!(session.texts(), vec![PROCESSING_MESSAGE, UNAVAILABLE_MESSAGE]);
}

#[tokio::test]
async fn test_portal_redirect_is_unavailable() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/freshmanR"))
        .respond_with(ResponseTemplate::new(302).insert_header("location", "/login"))
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/login"))
        .respond_with(ResponseTemplate::new(200).set_body_string(jane_page()))
        .expect(0)
        .mount(&mock_server)
        .await;

    let dispatcher = Dispatcher::from_config(&test_config(&mock_server)).unwrap();
    let session = RecordingSession::new();

    let outcome = dispatcher
        .handle_text(&session, &message("1:1", "12345"))
        .await
        .unwrap();

    assert_eq!(
        outcome,
        DispatchOutcome::FetchFailed(FailureKind::HttpStatus(302))
    );
    assert_eq!(session.texts(), vec![PROCESSING_MESSAGE, UNAVAILABLE_MESSAGE]);
}

#[tokio::test]
async fn test_truncated_portal_body_is_generic_error() {
    let config = Config {
        portal: PortalConfig {
            endpoint: truncated_body_endpoint().await,
            timeout_secs: 5,
            ..PortalConfig::default()
        },
        ..Config::default()
    };
    let dispatcher = Dispatcher::from_config(&config).unwrap();
    let session = RecordingSession::new();

    let outcome = dispatcher
        .handle_text(&session, &message("1:1", "12345"))
        .await
        .unwrap();

    assert_eq!(outcome, DispatchOutcome::FetchFailed(FailureKind::Unclassified));
    assert_eq!(session.texts(), vec![PROCESSING_MESSAGE, FETCH_ERROR_MESSAGE]);
    assert_eq!(session.deleted(), vec![MessageHandle(1)]);
}

#[tokio::test]
async fn test_portal_unreachable() {
    let config = Config {
        portal: PortalConfig {
            endpoint: format!("http://127.0.0.1:{}/freshmanR", closed_port()),
            timeout_secs: 5,
            ..PortalConfig::default()
        },
        ..Config::default()
    };
    let dispatcher = Dispatcher::from_config(&config).unwrap();
    let session = RecordingSession::new();

    let outcome = dispatcher
        .handle_text(&session, &message("1:1", "12345"))
        .await
        .unwrap();

    assert_eq!(outcome, DispatchOutcome::FetchFailed(FailureKind::Transport));
    assert_eq!(session.texts(), vec![PROCESSING_MESSAGE, CONNECT_MESSAGE]);
}

#[tokio::test]
async fn test_failed_retraction_is_swallowed() {
    let mock_server = MockServer::start().await;
    mount_page(&mock_server, jane_page(), 1).await;

    let dispatcher = Dispatcher::from_config(&test_config(&mock_server)).unwrap();
    let session = RecordingSession {
        fail_delete: true,
        ..RecordingSession::default()
    };

    let outcome = dispatcher
        .handle_text(&session, &message("1:1", "12345"))
        .await
        .unwrap();

    assert!(matches!(outcome, DispatchOutcome::Found(_)));
    assert_eq!(session.texts().len(), 2);
    assert!(session.deleted().is_empty());
}

#[tokio::test]
async fn test_retract_ack_reports_failure() {
    let mock_server = MockServer::start().await;
    let dispatcher = Dispatcher::from_config(&test_config(&mock_server)).unwrap();
    let session = RecordingSession {
        fail_delete: true,
        ..RecordingSession::default()
    };

    assert!(dispatcher
        .retract_ack(&session, MessageHandle(1))
        .await
        .is_err());
}

#[tokio::test]
async fn test_lookup_continues_without_acknowledgment() {
    let mock_server = MockServer::start().await;
    mount_page(&mock_server, jane_page(), 1).await;

    let dispatcher = Dispatcher::from_config(&test_config(&mock_server)).unwrap();
    let session = RecordingSession {
        fail_send_of: Some(PROCESSING_MESSAGE),
        ..RecordingSession::default()
    };

    let outcome = dispatcher
        .handle_text(&session, &message("1:1", "12345"))
        .await
        .unwrap();

    assert!(matches!(outcome, DispatchOutcome::Found(_)));
    assert_eq!(session.texts().len(), 1);
    assert!(session.deleted().is_empty());
}

#[tokio::test]
async fn test_failed_terminal_reply_is_returned() {
    let mock_server = MockServer::start().await;
    let dispatcher = Dispatcher::from_config(&test_config(&mock_server)).unwrap();
    let session = RecordingSession {
        fail_send_of: Some(FORMAT_WARNING),
        ..RecordingSession::default()
    };

    let result = dispatcher.handle_text(&session, &message("1:1", "1")).await;
    assert!(result.is_err());
}

#[tokio::test]
async fn test_commands() {
    let mock_server = MockServer::start().await;
    Mock::given(any())
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&mock_server)
        .await;

    let dispatcher = Dispatcher::from_config(&test_config(&mock_server)).unwrap();
    let session = RecordingSession::new();

    assert_eq!(
        dispatcher
            .handle(&session, &message("1:1", "/start"))
            .await
            .unwrap(),
        DispatchOutcome::Command(Command::Start)
    );
    assert_eq!(
        dispatcher
            .handle(&session, &message("1:2", "/about@PlacementBot"))
            .await
            .unwrap(),
        DispatchOutcome::Command(Command::About)
    );

    let sent = session.sent.lock().unwrap().clone();
    assert_eq!(sent[0].text, START_MESSAGE);
    assert_eq!(sent[0].format, TextFormat::Markdown);
    assert_eq!(sent[1].text, ABOUT_MESSAGE);
    assert_eq!(sent[1].format, TextFormat::Plain);
}

#[tokio::test]
async fn test_duplicate_command_suppressed() {
    let mock_server = MockServer::start().await;
    let dispatcher = Dispatcher::from_config(&test_config(&mock_server)).unwrap();
    let session = RecordingSession::new();

    let start = message("1:1", "/start");
    dispatcher.handle(&session, &start).await.unwrap();
    assert_eq!(
        dispatcher.handle(&session, &start).await.unwrap(),
        DispatchOutcome::Suppressed
    );
    assert_eq!(session.texts(), vec![START_MESSAGE]);
}

#[tokio::test]
async fn test_handle_routes_text_to_lookup() {
    let mock_server = MockServer::start().await;
    mount_page(&mock_server, jane_page(), 1).await;

    let dispatcher = Dispatcher::from_config(&test_config(&mock_server)).unwrap();
    let session = RecordingSession::new();

    let outcome = dispatcher
        .handle(&session, &message("1:1", "12345"))
        .await
        .unwrap();
    assert!(matches!(outcome, DispatchOutcome::Found(_)));
}
