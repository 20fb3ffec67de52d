//! HTTP request/response tracing middleware.

use axum::body::Body;
use axum::http::Request;
use tower_http::LatencyUnit;
use tower_http::classify::{ServerErrorsAsFailures, SharedClassifier};
use tower_http::trace::{DefaultOnFailure, DefaultOnRequest, DefaultOnResponse, TraceLayer};
use tracing::{Level, Span};

type RequestSpan = fn(&Request<Body>) -> Span;

/// Opens the per-request span.
///
/// Only the path is recorded. Query strings on public pages carry campaign
/// parameters and are dropped from logs.
fn request_span(req: &Request<Body>) -> Span {
    tracing::info_span!(
        "request",
        method = %req.method(),
        path = %req.uri().path(),
        version = ?req.version(),
    )
}

/// Creates a tracing middleware for HTTP requests.
///
/// # Logging Behavior
///
/// Every request gets an `INFO` span carrying method, path and HTTP version.
/// Request start is logged at `DEBUG`. The response is logged at `INFO` with
/// status and latency in milliseconds, so redirects show up with their
/// `301`/`302` status. Server errors are additionally logged at `ERROR`.
///
/// # Example Logs
///
/// ```text
/// INFO request{method=GET path=/summer-tours/ version=HTTP/1.1}: finished processing request latency=1 ms status=301
/// INFO request{method=POST path=/api/redirects version=HTTP/1.1}: finished processing request latency=14 ms status=201
/// ```
///
/// # Integration
///
/// ```rust,ignore
/// let app = Router::new()
///     .merge(pages)
///     .nest("/api", api_router)
///     .with_state(state)
///     .layer(tracing::layer());
/// ```
pub fn layer() -> TraceLayer<SharedClassifier<ServerErrorsAsFailures>, RequestSpan> {
    TraceLayer::new_for_http()
        .make_span_with(request_span as RequestSpan)
        .on_request(DefaultOnRequest::new().level(Level::DEBUG))
        .on_response(
            DefaultOnResponse::new()
                .level(Level::INFO)
                .latency_unit(LatencyUnit::Millis),
        )
        .on_failure(
            DefaultOnFailure::new()
                .level(Level::ERROR)
                .latency_unit(LatencyUnit::Millis),
        )
}
