//! Correlation ID middleware.
//!
//! Every request gets a correlation ID that is echoed back in the response,
//! attached to the request's tracing span and stamped onto the audit entries
//! the request produces.

use axum::{
    extract::Request,
    http::{header::HeaderValue, HeaderMap},
    middleware::Next,
    response::Response,
};
use tracing::Instrument;
use uuid::Uuid;

pub const CORRELATION_ID_HEADER: &str = "X-Correlation-ID";

/// W3C Trace Context header.
const TRACEPARENT_HEADER: &str = "traceparent";

const MAX_CORRELATION_ID_LEN: usize = 128;

/// Correlation ID of the current request, stored in request extensions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CorrelationId(pub String);

impl CorrelationId {
    pub fn new(id: String) -> Self {
        Self(id)
    }

    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for CorrelationId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Pick the correlation ID for a request.
///
/// Order: explicit `X-Correlation-ID`, then the trace-id of a well-formed
/// `traceparent` (`version-traceid-parentid-flags`), then a fresh UUID.
pub fn resolve_correlation_id(headers: &HeaderMap) -> CorrelationId {
    let explicit = headers
        .get(CORRELATION_ID_HEADER)
        .and_then(|h| h.to_str().ok())
        .map(str::trim)
        .filter(|s| !s.is_empty() && s.len() <= MAX_CORRELATION_ID_LEN);

    if let Some(id) = explicit {
        return CorrelationId::new(id.to_string());
    }

    headers
        .get(TRACEPARENT_HEADER)
        .and_then(|h| h.to_str().ok())
        .and_then(trace_id_from_traceparent)
        .map(CorrelationId::new)
        .unwrap_or_else(CorrelationId::generate)
}

fn trace_id_from_traceparent(traceparent: &str) -> Option<String> {
    let trace_id = traceparent.split('-').nth(1)?;
    let valid = trace_id.len() == 32
        && trace_id.chars().all(|c| c.is_ascii_hexdigit())
        && trace_id.chars().any(|c| c != '0');
    valid.then(|| trace_id.to_ascii_lowercase())
}

/// Attach a correlation ID to the request and its response, and run the
/// request inside an `http_request` span.
pub async fn correlation_id_middleware(mut request: Request, next: Next) -> Response {
    let correlation_id = resolve_correlation_id(request.headers());
    let method = request.method().clone();
    let uri = request.uri().path().to_string();

    request.extensions_mut().insert(correlation_id.clone());

    let span = tracing::info_span!(
        "http_request",
        correlation_id = %correlation_id,
        method = %method,
        uri = %uri,
    );

    async move {
        let mut response = next.run(request).await;

        if let Ok(value) = HeaderValue::from_str(correlation_id.as_str()) {
            response.headers_mut().insert(CORRELATION_ID_HEADER, value);
        }

        tracing::info!(status = %response.status().as_u16(), "Request completed");

        response
    }
    .instrument(span)
    .await
}
