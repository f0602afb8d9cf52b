//! Router-level tests for the probe endpoints.
//!
//! Requests are driven through `tower::ServiceExt::oneshot`, so no socket is
//! bound and tests run in parallel.
//!
//! Run with: cargo test --test probe_tests

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    response::Response,
    routing::any,
    Router,
};
use http_body_util::BodyExt;
use tower::ServiceExt;

use healthz::config::AppConfig;
use healthz::routes::create_router;
use healthz::state::{AppState, Readiness};
use healthz::{always_up, check};

const GREEN_PAGE: &str =
    r#"<!DOCTYPE html><html><body style="background-color: green"></body></html>"#;
const RED_PAGE: &str =
    r#"<!DOCTYPE html><html><body style="background-color: red"></body></html>"#;

fn request(method: Method, uri: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

async fn body_string(response: Response) -> String {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8(bytes.to_vec()).unwrap()
}

/// Server router with default configuration and a fresh readiness flag.
fn server_router() -> (Router, Readiness) {
    let readiness = Readiness::new();
    let state = AppState::new(AppConfig::default(), readiness.clone());
    (create_router(state), readiness)
}

//
// Responder contract
//

#[tokio::test]
async fn healthy_predicate_serves_green_page() {
    let app = Router::new().route_service("/healthz", check(|| true));

    let response = app.oneshot(request(Method::GET, "/healthz")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[header::CONTENT_TYPE], "text/html");
    assert_eq!(body_string(response).await, GREEN_PAGE);
}

#[tokio::test]
async fn unhealthy_predicate_serves_red_page() {
    let app = Router::new().route_service("/healthz", check(|| false));

    let response = app.oneshot(request(Method::GET, "/healthz")).await.unwrap();

    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(response.headers()[header::CONTENT_TYPE], "text/html");
    assert_eq!(body_string(response).await, RED_PAGE);
}

#[tokio::test]
async fn always_up_ignores_method_and_path() {
    let response = always_up(request(Method::POST, "/anything")).await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_string(response).await, GREEN_PAGE);
}

#[tokio::test]
async fn always_up_as_fallback_answers_every_route() {
    let app = Router::new().fallback(any(always_up));

    for (method, uri) in [
        (Method::GET, "/"),
        (Method::PUT, "/deeply/nested/path"),
        (Method::HEAD, "/healthz"),
    ] {
        let response = app.clone().oneshot(request(method, uri)).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }
}

#[tokio::test]
async fn same_predicate_gives_identical_responses() {
    let app = Router::new().route_service("/healthz", check(|| false));

    let first = app
        .clone()
        .oneshot(request(Method::GET, "/healthz"))
        .await
        .unwrap();
    let second = app.oneshot(request(Method::GET, "/healthz")).await.unwrap();

    assert_eq!(first.status(), second.status());
    assert_eq!(body_string(first).await, body_string(second).await);
}

//
// Server routes
//

#[tokio::test]
async fn liveness_route_is_up() {
    let (app, _) = server_router();

    let response = app.oneshot(request(Method::GET, "/healthz")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[header::CACHE_CONTROL], "no-store");
    assert_eq!(body_string(response).await, GREEN_PAGE);
}

#[tokio::test]
async fn readiness_route_turns_red_when_draining() {
    let (app, readiness) = server_router();

    let ready = app
        .clone()
        .oneshot(request(Method::GET, "/readyz"))
        .await
        .unwrap();
    assert_eq!(ready.status(), StatusCode::OK);
    assert_eq!(ready.headers()[header::CACHE_CONTROL], "no-store");

    readiness.mark_draining();

    let draining = app.oneshot(request(Method::GET, "/readyz")).await.unwrap();
    assert_eq!(draining.status(), StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body_string(draining).await, RED_PAGE);
}

#[tokio::test]
async fn server_probes_answer_every_method() {
    let (app, readiness) = server_router();

    for method in [Method::POST, Method::HEAD, Method::PUT, Method::DELETE] {
        for uri in ["/healthz", "/readyz"] {
            let response = app
                .clone()
                .oneshot(request(method.clone(), uri))
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::OK, "{} {}", method, uri);
            assert_eq!(response.headers()[header::CONTENT_TYPE], "text/html");
        }
    }

    readiness.mark_draining();

    let response = app.oneshot(request(Method::POST, "/readyz")).await.unwrap();
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body_string(response).await, RED_PAGE);
}

#[tokio::test]
async fn liveness_stays_up_while_draining() {
    let (app, readiness) = server_router();
    readiness.mark_draining();

    let response = app.oneshot(request(Method::GET, "/healthz")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn configured_paths_are_honoured() {
    let config = AppConfig::from_toml(
        "[health]\nliveness_path = \"/live\"\nreadiness_path = \"/ready\"",
    )
    .unwrap();
    let app = create_router(AppState::new(config, Readiness::new()));

    let live = app
        .clone()
        .oneshot(request(Method::GET, "/live"))
        .await
        .unwrap();
    assert_eq!(live.status(), StatusCode::OK);

    let ready = app
        .clone()
        .oneshot(request(Method::GET, "/ready"))
        .await
        .unwrap();
    assert_eq!(ready.status(), StatusCode::OK);

    let old = app.oneshot(request(Method::GET, "/healthz")).await.unwrap();
    assert_eq!(old.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn unknown_route_is_not_found() {
    let (app, _) = server_router();

    let response = app.oneshot(request(Method::GET, "/missing")).await.unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert!(response.headers().get(header::CACHE_CONTROL).is_none());
}
