use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use std::time::Instant;

use axum::extract::ConnectInfo;
use axum::extract::Request;
use axum::extract::State;
use axum::http::header::USER_AGENT;
use axum::http::HeaderMap;
use axum::middleware::Next;
use axum::response::Response;
use chrono::DateTime;
use chrono::SecondsFormat;
use chrono::Utc;
use serde::Serialize;

use super::Identity;

/// Liveness and readiness endpoints; never audited.
pub const PROBE_PATHS: [&str; 2] = ["/healthz", "/readyz"];

const TRACE_ID_HEADER: &str = "x-trace-id";
const SPAN_ID_HEADER: &str = "x-span-id";
const REQUEST_ID_HEADER: &str = "x-request-id";

/// Destination for serialized audit records, one JSON object per call.
pub trait AuditSink: Send + Sync + 'static {
    fn emit(&self, line: &str);
}

/// Writes audit lines as `tracing` events on the `audit` target.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingAuditSink;

impl AuditSink for TracingAuditSink {
    fn emit(&self, line: &str) {
        tracing::info!(target: "audit", "{}", line);
    }
}

/// One line of the request audit log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuditRecord {
    pub ts: String,
    pub method: String,
    pub path: String,
    pub status: u16,
    pub latency_ms: u64,
    pub client_ip: String,
    pub user_agent: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trace_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub span_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,
}

/// Request attributes captured before the request is handed downstream.
#[derive(Debug)]
struct RequestFacts {
    method: String,
    path: String,
    client_ip: String,
    user_agent: String,
    trace_id: Option<String>,
    span_id: Option<String>,
    request_id: Option<String>,
}

impl RequestFacts {
    fn capture(req: &Request) -> Self {
        let headers = req.headers();
        let peer = req
            .extensions()
            .get::<ConnectInfo<SocketAddr>>()
            .map(|ConnectInfo(addr)| *addr);

        Self {
            method: req.method().to_string(),
            path: req.uri().path().to_string(),
            client_ip: client_ip(headers, peer),
            user_agent: header_value(headers, USER_AGENT.as_str()).unwrap_or_default(),
            trace_id: header_value(headers, TRACE_ID_HEADER),
            span_id: header_value(headers, SPAN_ID_HEADER),
            request_id: header_value(headers, REQUEST_ID_HEADER),
        }
    }

    fn into_record(
        self,
        status: u16,
        latency: Duration,
        identity: Identity,
        finished_at: DateTime<Utc>,
    ) -> AuditRecord {
        AuditRecord {
            ts: finished_at.to_rfc3339_opts(SecondsFormat::Nanos, true),
            method: self.method,
            path: self.path,
            status,
            latency_ms: u64::try_from(latency.as_millis()).unwrap_or(u64::MAX),
            client_ip: self.client_ip,
            user_agent: self.user_agent,
            user_id: identity.user_id().map(|id| id.as_i64()),
            trace_id: self.trace_id,
            span_id: self.span_id,
            request_id: self.request_id,
        }
    }
}

fn header_value(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get(name)
        .and_then(|value| value.to_str().ok())
        .filter(|value| !value.is_empty())
        .map(str::to_string)
}

/// Forwarded client address if a proxy supplied one, else the socket peer.
fn client_ip(headers: &HeaderMap, peer: Option<SocketAddr>) -> String {
    header_value(headers, "x-forwarded-for")
        .and_then(|forwarded| {
            forwarded
                .split(',')
                .map(str::trim)
                .find(|hop| !hop.is_empty())
                .map(str::to_string)
        })
        .or_else(|| header_value(headers, "x-real-ip"))
        .or_else(|| peer.map(|addr| addr.ip().to_string()))
        .unwrap_or_default()
}

fn is_probe(path: &str) -> bool {
    PROBE_PATHS.contains(&path)
}

/// Middleware that writes one audit record per non-probe request.
///
/// Must be layered outside the authentication gate so rejected requests are
/// recorded too. Serialization failures are reported through `tracing` and
/// never alter the response.
pub async fn audit(
    State(sink): State<Arc<dyn AuditSink>>,
    req: Request,
    next: Next,
) -> Response {
    if is_probe(req.uri().path()) {
        return next.run(req).await;
    }

    let facts = RequestFacts::capture(&req);
    let start = Instant::now();

    let response = next.run(req).await;

    let record = facts.into_record(
        response.status().as_u16(),
        start.elapsed(),
        Identity::of(response.extensions()),
        Utc::now(),
    );

    match serde_json::to_string(&record) {
        Ok(line) => sink.emit(&line),
        Err(e) => tracing::error!(
            error = %e,
            method = %record.method,
            path = %record.path,
            "Failed to serialize audit record"
        ),
    }

    response
}
