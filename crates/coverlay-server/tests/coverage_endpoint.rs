//! Endpoint tests against an in-process router
//!
//! Builds a host-shaped axum router, attaches the coverage middleware the
//! way a dev server would after config resolution, and drives it with
//! oneshot requests.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use axum::{body::Body, http::Request, http::StatusCode, routing::get, Router};
use coverlay::host::{EnvSnapshot, ResolvedConfig, UserConfig};
use coverlay::{
    CoverageRegistry, CoveragePlugin, CoverlayOptions, InstrumentedModule, Instrumenter,
    PluginSession, Result,
};
use coverlay_server::COVERAGE_PUBLIC_PATH;
use serde_json::{json, Value};
use std::collections::HashMap;
use tempfile::TempDir;
use tower::ServiceExt;
use tower_http::cors::{Any, CorsLayer};

/// Engine double: passes code through and shares a registry handle
struct PassthroughInstrumenter {
    registry: CoverageRegistry,
}

impl Instrumenter for PassthroughInstrumenter {
    fn instrument(
        &mut self,
        source: &str,
        _filename: &str,
        input_map: Option<&Value>,
    ) -> Result<InstrumentedModule> {
        Ok(InstrumentedModule {
            code: source.to_string(),
            map: input_map.cloned().unwrap_or(Value::Null),
        })
    }

    fn registry(&self) -> CoverageRegistry {
        self.registry.clone()
    }
}

async fn session(cwd: &TempDir, is_production: bool) -> PluginSession {
    let engine = PassthroughInstrumenter {
        registry: CoverageRegistry::new(),
    };
    let plugin = CoveragePlugin::new(CoverlayOptions::new().with_cwd(cwd.path()), engine);
    let mut config = UserConfig::default();
    plugin
        .configure(&mut config)
        .await
        .unwrap()
        .resolve(
            &ResolvedConfig::new(is_production, HashMap::new()),
            &EnvSnapshot::default(),
        )
}

/// Host-shaped router: an index route plus the CORS layer dev servers carry
fn host_router() -> Router {
    Router::new()
        .route("/", get(|| async { "home" }))
        .layer(CorsLayer::new().allow_origin(Any))
}

async fn body_string(response: axum::response::Response) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

// ============================================================================
// Reserved-path behavior
// ============================================================================

#[tokio::test]
async fn test_empty_coverage_serves_null_literal() {
    let dir = TempDir::new().unwrap();
    let app = coverlay_server::attach(host_router(), &session(&dir, false).await);

    let response = app
        .oneshot(
            Request::builder()
                .uri(COVERAGE_PUBLIC_PATH)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()["content-type"].to_str().unwrap(),
        "application/json"
    );
    assert_eq!(body_string(response).await, "null");
}

#[tokio::test]
async fn test_recorded_coverage_serves_pretty_json() {
    let dir = TempDir::new().unwrap();
    let live = session(&dir, false).await;
    let registry = live.registry();
    let app = coverlay_server::attach(host_router(), &live);

    registry.record("/src/app.ts", json!({"s": {"0": 3}, "f": {}}));

    let response = app
        .oneshot(
            Request::builder()
                .uri(COVERAGE_PUBLIC_PATH)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_string(response).await;
    assert!(body.contains("\n    \"/src/app.ts\""));
    let parsed: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(parsed["/src/app.ts"]["s"]["0"], 3);
}

#[tokio::test]
async fn test_writes_after_attach_are_visible() {
    // The middleware reads a live handle, not a startup-time copy.
    let dir = TempDir::new().unwrap();
    let live = session(&dir, false).await;
    let registry = live.registry();
    let app = coverlay_server::attach(host_router(), &live);

    let first = app
        .clone()
        .oneshot(
            Request::builder()
                .uri(COVERAGE_PUBLIC_PATH)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(body_string(first).await, "null");

    registry.record("/src/later.ts", json!({"s": {}}));

    let second = app
        .oneshot(
            Request::builder()
                .uri(COVERAGE_PUBLIC_PATH)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    let parsed: Value = serde_json::from_str(&body_string(second).await).unwrap();
    assert!(parsed.get("/src/later.ts").is_some());
}

// ============================================================================
// Delegation
// ============================================================================

#[tokio::test]
async fn test_other_paths_delegate_to_host_routes() {
    let dir = TempDir::new().unwrap();
    let app = coverlay_server::attach(host_router(), &session(&dir, false).await);

    let response = app
        .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_string(response).await, "home");
}

#[tokio::test]
async fn test_unknown_paths_still_miss() {
    let dir = TempDir::new().unwrap();
    let app = coverlay_server::attach(host_router(), &session(&dir, false).await);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/missing")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_disabled_session_does_not_intercept() {
    let dir = TempDir::new().unwrap();
    let disabled = session(&dir, true).await;
    assert!(!disabled.enabled());

    let app = coverlay_server::attach(host_router(), &disabled);
    let response = app
        .oneshot(
            Request::builder()
                .uri(COVERAGE_PUBLIC_PATH)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    // No middleware installed: the reserved path falls through to the host
    // router, which has nothing mounted there.
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_with_registry_works_without_a_session() {
    let registry = CoverageRegistry::new();
    registry.record("/src/a.ts", json!({}));
    let app = coverlay_server::with_registry(host_router(), registry);

    let response = app
        .oneshot(
            Request::builder()
                .uri(COVERAGE_PUBLIC_PATH)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}
