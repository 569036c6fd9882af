//! Coverage endpoint middleware
//!
//! Serves the process-wide coverage accumulator at a reserved path on the
//! host dev server. Every other request is delegated to the inner service
//! untouched. The endpoint only ever reads the registry; writes happen in
//! instrumented code at runtime.

use axum::{
    body::Body,
    extract::{Request, State},
    http::{header, StatusCode},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    Router,
};
use coverlay::{CoverageRegistry, PluginSession};
use serde::Serialize;
use serde_json::{ser::PrettyFormatter, Serializer, Value};

/// Reserved path the coverage accumulator is served under
pub const COVERAGE_PUBLIC_PATH: &str = "/__coverage__";

/// Indentation of the serialized coverage body
const JSON_INDENT: &[u8] = b"    ";

/// Install the coverage endpoint for an enabled session
///
/// Disabled sessions leave the router untouched, so the reserved path is not
/// intercepted at all and falls through to whatever the host serves there.
#[must_use]
pub fn attach(router: Router, session: &PluginSession) -> Router {
    if session.enabled() {
        with_registry(router, session.registry())
    } else {
        router
    }
}

/// Install the coverage endpoint reading from an explicit registry
#[must_use]
pub fn with_registry(router: Router, registry: CoverageRegistry) -> Router {
    router.layer(middleware::from_fn_with_state(registry, serve_coverage))
}

/// Middleware: answer the reserved path, delegate everything else
async fn serve_coverage(
    State(registry): State<CoverageRegistry>,
    request: Request,
    next: Next,
) -> Response {
    if request.uri().path() != COVERAGE_PUBLIC_PATH {
        return next.run(request).await;
    }

    match render_snapshot(&registry) {
        Ok(body) => Response::builder()
            .status(StatusCode::OK)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body))
            .unwrap_or_else(|_| StatusCode::INTERNAL_SERVER_ERROR.into_response()),
        Err(err) => {
            // Non-serializable accumulator state must not take the server
            // down; log and answer with a plain 500.
            tracing::error!(
                target: coverlay::PLUGIN_NAME,
                error = %err,
                "failed to serialize coverage snapshot"
            );
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

/// Serialize the current snapshot, `null` when nothing has been recorded
fn render_snapshot(registry: &CoverageRegistry) -> serde_json::Result<String> {
    let coverage = registry.snapshot().unwrap_or(Value::Null);
    let mut buf = Vec::new();
    let formatter = PrettyFormatter::with_indent(JSON_INDENT);
    let mut serializer = Serializer::with_formatter(&mut buf, formatter);
    coverage.serialize(&mut serializer)?;
    Ok(String::from_utf8_lossy(&buf).into_owned())
}
