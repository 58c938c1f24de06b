//! Origin allow-list CORS middleware

use axum::body::Body;
use axum::extract::State;
use axum::http::{HeaderMap, HeaderValue, Method, Request, StatusCode};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use tracing::warn;

use super::AppState;

/// Methods advertised on a successful preflight
const ALLOW_METHODS: &str = "DELETE, GET, HEAD, OPTIONS, PATCH, POST, PUT";
const PREFLIGHT_MAX_AGE: &str = "600";

/// Exact-match origin allow-list. Credentials are always allowed for listed origins.
#[derive(Debug, Clone, Default)]
pub struct CorsPolicy {
    allowed_origins: Vec<String>,
}

impl CorsPolicy {
    pub fn new(allowed_origins: Vec<String>) -> Self {
        Self { allowed_origins }
    }

    pub fn is_allowed(&self, origin: &str) -> bool {
        self.allowed_origins.iter().any(|o| o == origin)
    }

    pub fn allowed_origins(&self) -> &[String] {
        &self.allowed_origins
    }
}

fn header_str<'a>(headers: &'a HeaderMap, key: &str) -> Option<&'a str> {
    let raw = headers.get(key)?.to_str().ok()?.trim();
    if raw.is_empty() {
        return None;
    }
    Some(raw)
}

fn insert_origin_headers(headers: &mut HeaderMap, origin: &str) {
    if let Ok(v) = HeaderValue::from_str(origin) {
        headers.insert("access-control-allow-origin", v);
    }
    headers.insert(
        "access-control-allow-credentials",
        HeaderValue::from_static("true"),
    );
    headers.append("vary", HeaderValue::from_static("Origin"));
}

fn preflight_response(policy: &CorsPolicy, origin: &str, request_headers: &HeaderMap) -> Response {
    if !policy.is_allowed(origin) {
        warn!(origin = %origin, "rejected CORS preflight");
        return (StatusCode::BAD_REQUEST, "Disallowed CORS origin").into_response();
    }

    let mut resp = (StatusCode::OK, "OK").into_response();
    let headers = resp.headers_mut();
    insert_origin_headers(headers, origin);
    headers.insert(
        "access-control-allow-methods",
        HeaderValue::from_static(ALLOW_METHODS),
    );
    headers.insert(
        "access-control-max-age",
        HeaderValue::from_static(PREFLIGHT_MAX_AGE),
    );
    // Any requested header is permitted, so mirror the request back
    if let Some(requested) = request_headers.get("access-control-request-headers") {
        headers.insert("access-control-allow-headers", requested.clone());
    }
    resp
}

pub(crate) async fn cors_middleware(
    State(state): State<AppState>,
    req: Request<Body>,
    next: Next,
) -> Response {
    let origin = header_str(req.headers(), "origin").map(str::to_string);
    let Some(origin) = origin else {
        return next.run(req).await;
    };

    let is_preflight = *req.method() == Method::OPTIONS
        && req.headers().contains_key("access-control-request-method");
    if is_preflight {
        return preflight_response(&state.cors, &origin, req.headers());
    }

    let mut resp = next.run(req).await;
    if state.cors.is_allowed(&origin) {
        insert_origin_headers(resp.headers_mut(), &origin);
    }
    resp
}
