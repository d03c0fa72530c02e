//! Request correlation and HTTP metrics middleware.
//!
//! Every request gets a [`RequestId`], taken from `X-Request-ID` when the
//! caller sent one and generated as a UUID v7 otherwise. [`MetricsLayer`]
//! opens a tracing span carrying that id and records on completion:
//!
//! - `http_requests_total` by method, route and status bucket
//! - `http_request_duration_seconds` by method and route
//! - `http_response_size_bytes` by method and route, when a length is known

use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};
use std::time::Instant;

use axum::http::{HeaderMap, Request, Response};
use pin_project_lite::pin_project;
use tower::{Layer, Service};
use tracing::{info_span, Span};
use uuid::Uuid;

const REQUEST_ID_HEADER: &str = "x-request-id";

/// Correlation id attached to logs and problem responses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestId(pub String);

impl RequestId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Time-sortable UUID v7.
    pub fn generate() -> Self {
        Self(Uuid::now_v7().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for RequestId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for RequestId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Use the caller's `X-Request-ID` when it is non-empty UTF-8, else generate one.
pub fn extract_or_generate_request_id(headers: &HeaderMap) -> RequestId {
    headers
        .get(REQUEST_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(RequestId::from)
        .unwrap_or_else(RequestId::generate)
}

/// Metric label for a request path.
///
/// Path segments naming a landmark or category are replaced by a placeholder
/// so free-form user input cannot grow the label set.
pub fn route_label(path: &str) -> String {
    let path = path.split('?').next().unwrap_or(path);
    let mut segments: Vec<&str> = path.split('/').collect();

    if let Some(pos) = segments.iter().position(|s| *s == "v1") {
        let kind = segments.get(pos + 1).copied();
        let placeholder = match kind {
            Some("landmarks") => Some("{landmark}"),
            Some("category") => Some("{category}"),
            _ => None,
        };
        if let Some(placeholder) = placeholder {
            if let Some(param) = segments.get_mut(pos + 2) {
                if !param.is_empty() {
                    *param = placeholder;
                }
            }
        }
    }

    segments.join("/")
}

fn status_bucket(status: u16) -> &'static str {
    match status {
        200..=299 => "2xx",
        300..=399 => "3xx",
        400..=499 => "4xx",
        500..=599 => "5xx",
        _ => "other",
    }
}

/// Tower layer wrapping a service in [`MetricsMiddleware`].
#[derive(Debug, Clone, Copy, Default)]
pub struct MetricsLayer;

impl<S> Layer<S> for MetricsLayer {
    type Service = MetricsMiddleware<S>;

    fn layer(&self, inner: S) -> Self::Service {
        MetricsMiddleware { inner }
    }
}

#[derive(Debug, Clone)]
pub struct MetricsMiddleware<S> {
    inner: S,
}

impl<S, ReqBody, ResBody> Service<Request<ReqBody>> for MetricsMiddleware<S>
where
    S: Service<Request<ReqBody>, Response = Response<ResBody>> + Clone + Send + 'static,
    S::Future: Send,
    ReqBody: http_body::Body + Send + 'static,
    ResBody: http_body::Body + Send + 'static,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = MetricsFuture<S::Future>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, req: Request<ReqBody>) -> Self::Future {
        let method = req.method().to_string();
        let route = route_label(req.uri().path());
        let request_id = extract_or_generate_request_id(req.headers());

        let span = info_span!(
            "request",
            request_id = %request_id,
            method = %method,
            route = %route,
        );
        span.in_scope(|| tracing::debug!(query = req.uri().query().unwrap_or(""), "request received"));

        MetricsFuture {
            inner: self.inner.call(req),
            start: Instant::now(),
            method,
            route,
            span,
        }
    }
}

pin_project! {
    /// Records request metrics when the inner future resolves.
    pub struct MetricsFuture<F> {
        #[pin]
        inner: F,
        start: Instant,
        method: String,
        route: String,
        span: Span,
    }
}

impl<F, ResBody, E> Future for MetricsFuture<F>
where
    F: Future<Output = Result<Response<ResBody>, E>>,
    ResBody: http_body::Body,
{
    type Output = F::Output;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let this = self.project();
        let _enter = this.span.enter();

        let result = match this.inner.poll(cx) {
            Poll::Pending => return Poll::Pending,
            Poll::Ready(result) => result,
        };

        let elapsed = this.start.elapsed().as_secs_f64();
        let (status, bucket) = match &result {
            Ok(response) => {
                let status = response.status().as_u16();
                (Some(status), status_bucket(status))
            }
            Err(_) => (None, "5xx"),
        };

        metrics::counter!(
            "http_requests_total",
            "method" => this.method.clone(),
            "path" => this.route.clone(),
            "status" => bucket
        )
        .increment(1);
        metrics::histogram!(
            "http_request_duration_seconds",
            "method" => this.method.clone(),
            "path" => this.route.clone()
        )
        .record(elapsed);

        if let Ok(response) = &result {
            if let Some(size) = response.body().size_hint().exact() {
                metrics::histogram!(
                    "http_response_size_bytes",
                    "method" => this.method.clone(),
                    "path" => this.route.clone()
                )
                .record(size as f64);
            }
        }

        match status {
            Some(status) => tracing::info!(status, latency_ms = elapsed * 1000.0, "request completed"),
            None => tracing::error!(latency_ms = elapsed * 1000.0, "request failed"),
        }

        Poll::Ready(result)
    }
}
