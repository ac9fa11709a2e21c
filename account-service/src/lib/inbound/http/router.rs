use std::sync::Arc;
use std::time::Duration;

use auth::Authenticator;
use axum::body::Body;
use axum::http::Request;
use axum::http::Response;
use axum::middleware;
use axum::routing::get;
use axum::routing::post;
use axum::Router;
use tower_http::trace::TraceLayer;
use tracing::Span;

use super::handlers::create_user::create_user;
use super::handlers::health::healthz;
use super::handlers::health::readyz;
use super::handlers::login::login;
use super::handlers::user_details::user_details;
use super::middleware::audit::audit;
use super::middleware::audit::AuditSink;
use super::middleware::auth::require_bearer;
use crate::domain::user::ports::UserServicePort;

#[derive(Clone)]
pub struct AppState {
    pub user_service: Arc<dyn UserServicePort>,
    pub authenticator: Arc<Authenticator>,
}

/// Assemble the HTTP surface.
///
/// Only `/userDetails` sits behind the bearer gate. The audit layer wraps
/// every route, gate included, so rejected calls are recorded as well.
pub fn create_router(
    user_service: Arc<dyn UserServicePort>,
    authenticator: Arc<Authenticator>,
    audit_sink: Arc<dyn AuditSink>,
) -> Router {
    let state = AppState {
        user_service,
        authenticator: Arc::clone(&authenticator),
    };

    let public_routes = Router::new()
        .route("/login", post(login))
        .route("/userCreate", post(create_user))
        .route("/healthz", get(healthz))
        .route("/readyz", get(readyz));

    let protected_routes = Router::new()
        .route("/userDetails", get(user_details))
        .route_layer(middleware::from_fn_with_state(
            authenticator,
            require_bearer,
        ));

    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(|request: &Request<Body>| {
            tracing::info_span!(
                "http_request",
                method = %request.method(),
                uri = %request.uri(),
                version = ?request.version(),
            )
        })
        .on_request(|request: &Request<Body>, _span: &Span| {
            tracing::debug!(
                method = %request.method(),
                uri = %request.uri(),
                "Request started"
            );
        })
        .on_response(
            |response: &Response<Body>, latency: Duration, _span: &Span| {
                tracing::debug!(
                    status = response.status().as_u16(),
                    latency_ms = latency.as_millis(),
                    "Request completed"
                );
            },
        );

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .layer(middleware::from_fn_with_state(audit_sink, audit))
        .layer(trace_layer)
        .with_state(state)
}
