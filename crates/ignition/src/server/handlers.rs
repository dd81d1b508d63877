//! HTTP handlers.

use axum::extract::State;
use axum::http::{StatusCode, Uri, header};
use axum::response::{IntoResponse, Response};
use tracing::{debug, warn};

use super::{Route, SharedState};
use crate::error::IgnitionError;
use crate::preview::HtmlBuilder;
use crate::workspace::ModulePath;

pub(crate) const FALLBACK_BODY: &str = "ignition asset server";

const TEXT_PLAIN: &str = "text/plain; charset=utf-8";

/// Entry point for every request.
pub(crate) async fn handle_request(State(state): State<SharedState>, uri: Uri) -> Response {
    match state.routes.route(uri.path()) {
        Route::Source(path) => serve_module(&state, &path).await,
        Route::Inspect(path) => inspect_module(&state, &path).await,
        Route::Fallback => (StatusCode::OK, [(header::CONTENT_TYPE, TEXT_PLAIN)], FALLBACK_BODY)
            .into_response(),
    }
}

async fn serve_module(state: &SharedState, raw: &str) -> Response {
    let path = match ModulePath::parse(raw) {
        Ok(path) => path,
        Err(e) => return error_response(&e),
    };

    let Some(source) = state.engine.source_for_served_path(path.as_str()).await else {
        return error_response(&IgnitionError::NotFound(path.to_string()));
    };

    match state
        .engine
        .emit(&source, state.routes.source_prefix())
        .await
    {
        Ok(emitted) => {
            debug!(path = %path, bytes = emitted.body.len(), "served module");
            (
                StatusCode::OK,
                [
                    (header::CONTENT_TYPE, emitted.content_type),
                    (header::CACHE_CONTROL, "no-cache"),
                ],
                emitted.body,
            )
                .into_response()
        }
        Err(e) => error_response(&IgnitionError::from(e)),
    }
}

/// Diagnostic echo of how a module path resolves.
async fn inspect_module(state: &SharedState, raw: &str) -> Response {
    let (module_path, resolved) = match ModulePath::parse(raw) {
        Ok(path) => {
            let resolved = state
                .engine
                .source_for_served_path(path.as_str())
                .await
                .is_some();
            (path.to_string(), resolved)
        }
        Err(_) => (raw.to_string(), false),
    };

    let mut html = HtmlBuilder::new();
    html.markup("<!DOCTYPE html>\n<html>\n<body>\n")
        .text_element("h1", "Module")
        .text_element("p", &format!("modulePath: {module_path}"))
        .text_element("p", &format!("module: {resolved}"))
        .markup("</body>\n</html>\n");

    (
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "text/html; charset=utf-8"),
            (header::CACHE_CONTROL, "no-cache"),
        ],
        html.finish(),
    )
        .into_response()
}

fn error_response(error: &IgnitionError) -> Response {
    let status = if error.is_not_found() {
        StatusCode::NOT_FOUND
    } else {
        warn!(error = %error, "failed to serve module");
        StatusCode::INTERNAL_SERVER_ERROR
    };
    (status, [(header::CONTENT_TYPE, TEXT_PLAIN)], error.to_string()).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::server::{RouteTable, ServerState};
    use crate::testing::FakeEngine;
    use std::sync::Arc;

    fn state(engine: FakeEngine) -> SharedState {
        Arc::new(ServerState {
            engine: Arc::new(engine),
            routes: RouteTable::new("/_src"),
        })
    }

    async fn body(response: Response) -> String {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    fn sample_engine() -> FakeEngine {
        FakeEngine::new("/ws").with_module("components/foo.ts", "components/foo.js", &["x-foo"])
    }

    #[tokio::test]
    async fn serves_module_under_prefix() {
        let engine = sample_engine();
        let log = engine.emit_log();
        let response = handle_request(
            State(state(engine)),
            Uri::from_static("/_src/components/foo.js"),
        )
        .await;

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[header::CONTENT_TYPE],
            "application/javascript"
        );
        assert_eq!(response.headers()[header::CACHE_CONTROL], "no-cache");
        assert!(body(response).await.contains("components/foo.ts"));
        assert_eq!(log.lock().as_slice(), ["components/foo.ts"]);
    }

    #[tokio::test]
    async fn fallback_never_touches_engine() {
        let engine = sample_engine();
        let log = engine.emit_log();
        let lookups = engine.lookup_log();
        let response =
            handle_request(State(state(engine)), Uri::from_static("/other/path")).await;

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body(response).await, FALLBACK_BODY);
        assert!(log.lock().is_empty());
        assert!(lookups.lock().is_empty());
    }

    #[tokio::test]
    async fn unknown_module_is_404() {
        let response = handle_request(
            State(state(sample_engine())),
            Uri::from_static("/_src/components/missing.js"),
        )
        .await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(response.headers()[header::CONTENT_TYPE], TEXT_PLAIN);
    }

    #[tokio::test]
    async fn traversal_is_404_without_lookup() {
        let engine = sample_engine();
        let lookups = engine.lookup_log();
        let app = state(engine);

        for uri in ["/_src/../secret.js", "/_src/%2e%2e/secret.js", "/_src/"] {
            let response = handle_request(State(app.clone()), Uri::from_static(uri)).await;
            assert_eq!(response.status(), StatusCode::NOT_FOUND, "{uri}");
        }
        assert!(lookups.lock().is_empty());
    }

    #[tokio::test]
    async fn analysis_failure_is_500() {
        let engine = FakeEngine::new("/ws").with_broken_module("src/broken.ts", "src/broken.js");
        let response =
            handle_request(State(state(engine)), Uri::from_static("/_src/src/broken.js")).await;
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(body(response).await.contains("src/broken.ts"));
    }

    #[tokio::test]
    async fn inspect_echoes_module_path() {
        let response = handle_request(
            State(state(sample_engine())),
            Uri::from_static("/_ignition/inspect/components/foo.js"),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
        let html = body(response).await;
        assert!(html.contains("<p>modulePath: components/foo.js</p>"));
        assert!(html.contains("<p>module: true</p>"));

        let response = handle_request(
            State(state(sample_engine())),
            Uri::from_static("/_ignition/inspect/%3Cb%3E.js"),
        )
        .await;
        let html = body(response).await;
        assert!(html.contains("modulePath: &lt;b&gt;.js"));
        assert!(html.contains("<p>module: false</p>"));
    }
}
