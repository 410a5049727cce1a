//! Tests for the page host routes, driven in-process through the router.

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use scraper::{Html, Selector};
use tower::ServiceExt;

use adaptlearn::config::Settings;
use adaptlearn::server::{create_router, ServerState, SessionInfo, ViewResponse};
use adaptlearn::{ProcessingStatus, Tab};

fn test_router(settings: Settings) -> Router {
    create_router(ServerState::new(&settings))
}

fn fast_settings() -> Settings {
    Settings {
        upload_delay_ms: 50,
        quiz_delay_ms: 30,
        poll_timeout_ms: 5_000,
        ..Default::default()
    }
}

async fn body_string(response: axum::response::Response) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("Failed to read body");
    String::from_utf8(bytes.to_vec()).expect("Body is not UTF-8")
}

/// Load the page and return the session id embedded in `#root`.
async fn open_session(app: &Router) -> String {
    let response = app
        .clone()
        .oneshot(Request::get("/").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let html = body_string(response).await;
    let doc = Html::parse_document(&html);
    let root = Selector::parse("#root").unwrap();
    doc.select(&root)
        .next()
        .and_then(|el| el.value().attr("data-session"))
        .expect("Page has a session id")
        .to_string()
}

async fn post_action(app: &Router, session: &str, json: &str) -> (StatusCode, String) {
    let response = app
        .clone()
        .oneshot(
            Request::post(format!("/api/sessions/{session}/actions"))
                .header("content-type", "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();
    let status = response.status();
    (status, body_string(response).await)
}

async fn get(app: &Router, uri: &str) -> (StatusCode, String) {
    let response = app
        .clone()
        .oneshot(Request::get(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    (status, body_string(response).await)
}

#[tokio::test]
async fn each_page_load_starts_a_fresh_session() {
    let app = test_router(fast_settings());
    let first = open_session(&app).await;
    let second = open_session(&app).await;
    assert_ne!(first, second);

    let (status, _) = post_action(
        &app,
        &first,
        r#"{"action":"select-tab","tab":"analytics"}"#,
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (_, body) = get(&app, &format!("/api/sessions/{second}/state")).await;
    let info: SessionInfo = serde_json::from_str(&body).unwrap();
    assert_eq!(info.state.current_tab, Tab::Upload);
    assert_eq!(info.state.revision, 0);
}

#[tokio::test]
async fn action_returns_rerendered_markup() {
    let app = test_router(fast_settings());
    let session = open_session(&app).await;

    let (status, body) = post_action(
        &app,
        &session,
        r#"{"action":"select-tab","tab":"recommendations"}"#,
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let view: ViewResponse = serde_json::from_str(&body).unwrap();
    assert!(view.rendered);
    assert_eq!(view.revision, 1);
    assert!(view.html.contains(r#"data-panel="recommendations""#));
    assert!(view.html.contains("Optimal Study Schedule"));
}

#[tokio::test]
async fn ignored_action_reports_no_render() {
    let app = test_router(fast_settings());
    let session = open_session(&app).await;

    let (_, body) = post_action(&app, &session, r#"{"action":"generate-quiz"}"#).await;
    let view: ViewResponse = serde_json::from_str(&body).unwrap();
    assert!(!view.rendered);
    assert_eq!(view.revision, 0);

    let (_, body) = post_action(
        &app,
        &session,
        r#"{"action":"receive-files","files":[]}"#,
    )
    .await;
    let view: ViewResponse = serde_json::from_str(&body).unwrap();
    assert!(!view.rendered);
}

#[tokio::test]
async fn poll_picks_up_timer_render() {
    let app = test_router(fast_settings());
    let session = open_session(&app).await;

    let (_, body) = post_action(
        &app,
        &session,
        r#"{"action":"receive-files","files":["a.pdf","b.txt"]}"#,
    )
    .await;
    let view: ViewResponse = serde_json::from_str(&body).unwrap();
    assert!(view.html.contains("Processing documents..."));

    let (status, body) = get(
        &app,
        &format!("/api/sessions/{session}/view?since={}", view.revision),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let polled: ViewResponse = serde_json::from_str(&body).unwrap();
    assert!(polled.rendered);
    assert_eq!(polled.revision, view.revision + 1);
    assert!(!polled.html.contains("Processing documents..."));

    let (_, body) = get(&app, &format!("/api/sessions/{session}/state")).await;
    let info: SessionInfo = serde_json::from_str(&body).unwrap();
    assert_eq!(info.state.uploaded_files, vec!["a.pdf", "b.txt"]);
    assert_eq!(info.state.processing_status, ProcessingStatus::Complete);
    assert_eq!(info.pending_tasks, 0);
}

#[tokio::test]
async fn poll_times_out_without_changes() {
    let app = test_router(Settings {
        poll_timeout_ms: 20,
        ..Default::default()
    });
    let session = open_session(&app).await;

    let (status, body) = get(&app, &format!("/api/sessions/{session}/view?since=0")).await;
    assert_eq!(status, StatusCode::OK);
    let view: ViewResponse = serde_json::from_str(&body).unwrap();
    assert!(!view.rendered);
    assert_eq!(view.revision, 0);
}

#[tokio::test]
async fn unknown_session_is_not_found() {
    let app = test_router(fast_settings());
    let missing = uuid::Uuid::new_v4();

    let (status, _) = get(&app, &format!("/api/sessions/{missing}/state")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = post_action(
        &app,
        &missing.to_string(),
        r#"{"action":"generate-quiz"}"#,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn malformed_action_is_rejected() {
    let app = test_router(fast_settings());
    let session = open_session(&app).await;

    let (status, _) = post_action(
        &app,
        &session,
        r#"{"action":"select-tab","tab":"settings"}"#,
    )
    .await;
    assert!(status.is_client_error());

    let (status, _) = post_action(&app, &session, r#"{"action":"delete-file"}"#).await;
    assert!(status.is_client_error());
}

#[tokio::test]
async fn stylesheet_is_served() {
    let app = test_router(fast_settings());
    let response = app
        .clone()
        .oneshot(
            Request::get("/static/style.css")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers().get("content-type").unwrap(),
        "text/css"
    );
    assert!(body_string(response).await.contains(".tab-trigger.active"));
}
