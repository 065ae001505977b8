//! # お問い合わせ受付パイプラインの結合テスト
//!
//! 実際のルーター・ユースケース・テンプレートを組み合わせ、
//! 送信手段とチームディレクトリだけをインメモリ実装に差し替えて検証する。

use std::sync::Arc;

use axum::{Router, body::Body};
use chrono::{TimeZone, Utc};
use contact_domain::{clock::FixedClock, mail::DeliveryError};
use contact_infra::{
    TeamDirectory,
    mock::{MockMailSender, StubTeamDirectory},
};
use contact_service::{
    build_router,
    handler::{ContactResponse, ContactState},
    usecase::{ContactService, RecipientConfig, RecipientResolver, TemplateRenderer},
};
use contact_shared::ErrorResponse;
use http::{Method, Request, StatusCode};
use pretty_assertions::assert_eq;
use serde_json::json;
use tower::ServiceExt;

const VALID_BODY: &str = r#"{"name":"A","email":"a@b.com","subject":"Hi","message":"Hello"}"#;

fn test_app(sender: &MockMailSender, config: RecipientConfig) -> Router {
    let clock = FixedClock::new(Utc.with_ymd_and_hms(2026, 3, 1, 9, 30, 0).unwrap());
    let service = ContactService::new(
        Arc::new(sender.clone()),
        RecipientResolver::new(config),
        TemplateRenderer::new().unwrap(),
        Arc::new(clock),
    );
    let state = Arc::new(ContactState {
        usecase: Arc::new(service),
    });
    build_router(state, &[])
}

fn recipients(list: &str) -> RecipientConfig {
    RecipientConfig {
        lists: vec![list.to_string()],
        ..Default::default()
    }
}

fn post(uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn send(app: Router, request: Request<Body>) -> (StatusCode, Vec<u8>) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, bytes.to_vec())
}

async fn send_error(app: Router, request: Request<Body>) -> (StatusCode, ErrorResponse) {
    let (status, bytes) = send(app, request).await;
    (status, serde_json::from_slice(&bytes).unwrap())
}

#[tokio::test]
async fn test_有効な入力で200と送信先と件名を返す() {
    let sender = MockMailSender::new().with_message_id("<id@example.com>");
    let app = test_app(&sender, recipients("x@y.com"));

    let (status, bytes) = send(app, post("/", VALID_BODY)).await;

    assert_eq!(status, StatusCode::OK);
    let body: ContactResponse = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(
        body,
        ContactResponse {
            success:    true,
            sent_to:    vec!["x@y.com".to_string()],
            message_id: Some("<id@example.com>".to_string()),
        }
    );
    let sent = sender.sent_emails();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].subject, "Website contact: Hi");
    assert_eq!(sent[0].reply_to.as_deref(), Some("a@b.com"));
    assert_eq!(sent[0].headers[0].name, "X-Contact-Form");
    assert_eq!(sent[0].headers[0].value, "website");
}

#[tokio::test]
async fn test_api_contactでも受け付ける() {
    let sender = MockMailSender::new();
    let app = test_app(&sender, recipients("x@y.com"));

    let (status, bytes) = send(app, post("/api/contact", VALID_BODY)).await;

    assert_eq!(status, StatusCode::OK);
    let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(
        body,
        json!({"success": true, "sent_to": ["x@y.com"], "message_id": null})
    );
}

#[tokio::test]
async fn test_件名に既にプレフィックスがあれば重ねない() {
    let sender = MockMailSender::new();
    let app = test_app(&sender, recipients("x@y.com"));
    let body = json!({
        "email": "a@b.com",
        "subject": "Website contact: Hi",
        "message": "Hello"
    });

    let (status, _) = send(app, post("/", &body.to_string())).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(sender.sent_emails()[0].subject, "Website contact: Hi");
}

#[tokio::test]
async fn test_本文のscriptタグはhtmlでエスケープされテキストではそのまま() {
    let sender = MockMailSender::new();
    let app = test_app(&sender, recipients("x@y.com"));
    let body = json!({
        "email": "a@b.com",
        "subject": "Hi",
        "message": "<script>alert(1)</script>"
    });

    let (status, _) = send(app, post("/", &body.to_string())).await;

    assert_eq!(status, StatusCode::OK);
    let sent = &sender.sent_emails()[0];
    assert!(sent.html_body.contains("&lt;script&gt;alert(1)&lt;/script&gt;"));
    assert!(!sent.html_body.contains("<script>"));
    assert!(sent.text_body.contains("<script>alert(1)</script>"));
}

#[tokio::test]
async fn test_重複した宛先は大文字小文字を無視して一度だけ送る() {
    let sender = MockMailSender::new();
    let app = test_app(
        &sender,
        RecipientConfig {
            lists: vec![
                "Ops@Example.com; dev@example.com".to_string(),
                "OPS@example.com dev@EXAMPLE.com qa@example.com".to_string(),
            ],
            ..Default::default()
        },
    );

    let (status, _) = send(app, post("/", VALID_BODY)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        sender.sent_emails()[0].to,
        vec![
            "Ops@Example.com".to_string(),
            "dev@example.com".to_string(),
            "qa@example.com".to_string()
        ]
    );
}

#[tokio::test]
async fn test_宛先リストがあればディレクトリを参照しない() {
    let sender = MockMailSender::new();
    let directory = StubTeamDirectory::failing();
    let app = test_app(
        &sender,
        RecipientConfig {
            lists:     vec!["x@y.com".to_string()],
            directory: Some(Arc::new(directory.clone()) as Arc<dyn TeamDirectory>),
            fallback:  Some("from@example.com".to_string()),
        },
    );

    let (status, _) = send(app, post("/", VALID_BODY)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(directory.call_count(), 0);
    assert_eq!(sender.sent_emails()[0].to, vec!["x@y.com".to_string()]);
}

#[tokio::test]
async fn test_宛先リストが空ならディレクトリのメンバーに送る() {
    let sender = MockMailSender::new();
    let directory = StubTeamDirectory::new(["team@example.com", "Team@Example.com"]);
    let app = test_app(
        &sender,
        RecipientConfig {
            directory: Some(Arc::new(directory.clone()) as Arc<dyn TeamDirectory>),
            fallback: Some("from@example.com".to_string()),
            ..Default::default()
        },
    );

    let (status, _) = send(app, post("/", VALID_BODY)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(directory.call_count(), 1);
    assert_eq!(
        sender.sent_emails()[0].to,
        vec!["team@example.com".to_string()]
    );
}

#[tokio::test]
async fn test_本文が空なら400で宛先解決も送信もしない() {
    let sender = MockMailSender::new();
    let directory = StubTeamDirectory::new(["team@example.com"]);
    let app = test_app(
        &sender,
        RecipientConfig {
            directory: Some(Arc::new(directory.clone()) as Arc<dyn TeamDirectory>),
            ..Default::default()
        },
    );
    let body = json!({"email": "a@b.com", "subject": "Hi", "message": ""});

    let (status, error) = send_error(app, post("/", &body.to_string())).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error, ErrorResponse::new("Message is required"));
    assert_eq!(directory.call_count(), 0);
    assert!(sender.sent_emails().is_empty());
}

#[tokio::test]
async fn test_宛先が解決できなければ503で送信しない() {
    let sender = MockMailSender::new();
    let app = test_app(&sender, RecipientConfig::default());

    let (status, error) = send_error(app, post("/", VALID_BODY)).await;

    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(
        error,
        ErrorResponse::new("No notification recipients are configured")
    );
    assert!(sender.sent_emails().is_empty());
}

#[tokio::test]
async fn test_送信手段が未設定なら503を返す() {
    let sender = MockMailSender::unconfigured();
    let app = test_app(&sender, recipients("x@y.com"));

    let (status, error) = send_error(app, post("/", VALID_BODY)).await;

    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(error, ErrorResponse::new("Email service is not configured"));
    assert!(sender.sent_emails().is_empty());
}

#[tokio::test]
async fn test_入力エラーは検証順に報告する() {
    let cases = [
        ("not json", "Invalid JSON body"),
        ("", "Subject is required"),
        (r#"{"subject":"Hi"}"#, "Message is required"),
        (r#"{"subject":"Hi","message":"Hello"}"#, "Email is required"),
        (
            r#"{"subject":"Hi","message":"Hello","email":"not-an-email"}"#,
            "Invalid email address",
        ),
        (
            r#"{"subject":42,"message":"Hello","email":"a@b.com"}"#,
            "Subject is required",
        ),
    ];

    for (body, expected) in cases {
        let sender = MockMailSender::new();
        let app = test_app(&sender, recipients("x@y.com"));

        let (status, error) = send_error(app, post("/", body)).await;

        assert_eq!(status, StatusCode::BAD_REQUEST, "body: {body}");
        assert_eq!(error, ErrorResponse::new(expected), "body: {body}");
        assert!(sender.sent_emails().is_empty());
    }
}

#[tokio::test]
async fn test_送信失敗は送信手段のステータスと詳細を返す() {
    let sender = MockMailSender::failing(DeliveryError::Rejected {
        status:  Some(429),
        message: "Too many requests".to_string(),
    });
    let app = test_app(&sender, recipients("x@y.com"));

    let (status, error) = send_error(app, post("/", VALID_BODY)).await;

    assert_eq!(status, StatusCode::TOO_MANY_REQUESTS);
    assert_eq!(
        error,
        ErrorResponse::with_details("Failed to send message", "Too many requests")
    );
}

#[tokio::test]
async fn test_ステータスを持たない送信失敗は500を返す() {
    let sender = MockMailSender::failing(DeliveryError::Rejected {
        status:  None,
        message: "connection refused".to_string(),
    });
    let app = test_app(&sender, recipients("x@y.com"));

    let (status, error) = send_error(app, post("/", VALID_BODY)).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        error,
        ErrorResponse::with_details("Failed to send message", "connection refused")
    );
}

#[tokio::test]
async fn test_ヘルスチェックは200を返す() {
    let app = test_app(&MockMailSender::new(), RecipientConfig::default());

    let (status, _) = send(
        app,
        Request::builder()
            .uri("/health")
            .body(Body::empty())
            .unwrap(),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
}
