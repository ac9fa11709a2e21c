use std::sync::Arc;

use auth::Authenticator;
use axum::extract::Request;
use axum::extract::State;
use axum::http::header::AUTHORIZATION;
use axum::http::HeaderMap;
use axum::middleware::Next;
use axum::response::Response;

use super::Principal;
use crate::domain::user::models::UserId;
use crate::inbound::http::handlers::ApiError;

const BEARER_PREFIX: &str = "Bearer ";

/// What the `Authorization` header holds.
#[derive(Debug, PartialEq, Eq)]
enum BearerHeader<'a> {
    Missing,
    BadScheme,
    Token(&'a str),
}

impl<'a> BearerHeader<'a> {
    fn parse(headers: &'a HeaderMap) -> Self {
        let Some(value) = headers.get(AUTHORIZATION) else {
            return BearerHeader::Missing;
        };

        match value.to_str().ok().and_then(|v| v.strip_prefix(BEARER_PREFIX)) {
            Some(token) => BearerHeader::Token(token),
            None => BearerHeader::BadScheme,
        }
    }
}

/// Middleware that admits requests carrying a valid bearer token.
///
/// Every rejection produces the same 401 response; the cause is only logged.
/// On success the caller's [`Principal`] is added to the request extensions
/// for handlers and to the response extensions for the audit layer.
pub async fn require_bearer(
    State(authenticator): State<Arc<Authenticator>>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = match BearerHeader::parse(req.headers()) {
        BearerHeader::Token(token) => token,
        BearerHeader::Missing => {
            tracing::debug!("Missing Authorization header");
            return Err(ApiError::unauthorized());
        }
        BearerHeader::BadScheme => {
            tracing::debug!("Authorization header is not a bearer token");
            return Err(ApiError::unauthorized());
        }
    };

    let claims = authenticator.validate_token(token).map_err(|e| {
        tracing::warn!(error = %e, "Token validation failed");
        ApiError::unauthorized()
    })?;

    let principal = Principal {
        user_id: UserId(claims.sub),
    };
    req.extensions_mut().insert(principal);

    let mut response = next.run(req).await;
    response.extensions_mut().insert(principal);

    Ok(response)
}
