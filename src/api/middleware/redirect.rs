//! Redirect resolution in front of normal page handling.

use axum::{
    extract::{Request, State},
    http::{HeaderValue, StatusCode, header},
    middleware::Next,
    response::{IntoResponse, Response},
};
use tracing::{debug, warn};
use url::{Position, Url};

use crate::domain::entities::{RedirectKind, RedirectRule};
use crate::state::AppState;
use crate::utils::path_normalizer::decode_request_path;

/// Answers with a redirect when the request path matches an active rule.
///
/// # Request Flow
///
/// 1. Percent-decode the URI path (query string excluded) and look it up in
///    the redirect cache
/// 2. On a match, queue a hit for the rule and respond with `Location`
/// 3. Otherwise pass the request on to content resolution
///
/// Permanent rules answer `301 Moved Permanently`, temporary ones `302 Found`.
/// Hit logging is fire-and-forget and cannot change the response.
///
/// # Example
///
/// ```rust,ignore
/// let pages = Router::new()
///     .route("/{*path}", any(page_not_found_handler))
///     .route_layer(middleware::from_fn_with_state(state.clone(), redirect::layer));
/// ```
pub async fn layer(State(st): State<AppState>, req: Request, next: Next) -> Response {
    let path = decode_request_path(req.uri().path()).into_owned();

    if let Some(rule) = st.redirect_cache.check_redirect(&path).await {
        if let Some(response) = redirect_response(&rule) {
            debug!(
                rule_id = rule.id,
                from = %path,
                to = %rule.destination_path,
                kind = %rule.kind,
                "Redirecting"
            );
            st.hit_logger.log_hit(rule.id);
            return response;
        }

        warn!(
            rule_id = rule.id,
            destination = %rule.destination_path,
            "Redirect destination is not a valid Location header, ignoring rule"
        );
    }

    next.run(req).await
}

fn redirect_response(rule: &RedirectRule) -> Option<Response> {
    let status = match rule.kind {
        RedirectKind::Permanent => StatusCode::MOVED_PERMANENTLY,
        RedirectKind::Temporary => StatusCode::FOUND,
    };

    let location = location_header(&rule.destination_path)?;
    Some((status, [(header::LOCATION, location)]).into_response())
}

/// Builds a `Location` value, percent-encoding destinations that are not
/// plain ASCII.
fn location_header(destination: &str) -> Option<HeaderValue> {
    if let Ok(value) = HeaderValue::from_str(destination) {
        return Some(value);
    }

    let encoded = match Url::parse(destination) {
        Ok(url) => url.to_string(),
        Err(_) => {
            let base = Url::parse("http://localhost/").ok()?;
            let joined = base.join(destination).ok()?;
            joined[Position::BeforePath..].to_string()
        }
    };

    HeaderValue::from_str(&encoded).ok()
}
