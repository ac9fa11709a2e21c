use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use serde::Serialize;

use super::json_body;
use super::ApiError;
use super::ApiSuccess;
use crate::inbound::http::router::AppState;
use crate::user::errors::UserError;
use crate::user::models::Username;

/// Exchange a username and password for an access token.
///
/// Unknown users, invalid usernames and wrong passwords all yield the same
/// 401 response.
pub async fn login(
    State(state): State<AppState>,
    payload: Result<Json<LoginRequestBody>, JsonRejection>,
) -> Result<ApiSuccess<LoginResponseData>, ApiError> {
    let body = json_body(payload)?;
    if body.username.is_empty() || body.password.is_empty() {
        return Err(ApiError::invalid_input());
    }

    let username = Username::new(body.username).map_err(|_| ApiError::invalid_credentials())?;

    let credential = state
        .user_service
        .get_credential(&username)
        .await
        .map_err(|e| match e {
            UserError::NotFoundByUsername(_) => ApiError::invalid_credentials(),
            _ => ApiError::from(e),
        })?;

    let result = state
        .authenticator
        .authenticate(
            &body.password,
            &credential.password_hash,
            credential.user_id.as_i64(),
            credential.username.as_str(),
        )
        .map_err(|e| match e {
            auth::AuthenticationError::InvalidCredentials => {
                tracing::info!(user_id = %credential.user_id, "Login rejected");
                ApiError::invalid_credentials()
            }
            auth::AuthenticationError::Password(err) => {
                ApiError::InternalServerError(format!("Password verification failed: {}", err))
            }
            auth::AuthenticationError::Token(err) => {
                ApiError::InternalServerError(format!("Token generation failed: {}", err))
            }
        })?;

    Ok(ApiSuccess::new(
        StatusCode::OK,
        LoginResponseData {
            token: result.access_token,
        },
    ))
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoginRequestBody {
    username: String,
    password: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LoginResponseData {
    pub token: String,
}
