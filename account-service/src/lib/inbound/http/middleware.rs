use axum::http::Extensions;

use crate::domain::user::models::UserId;

pub mod audit;
pub mod auth;

/// Identity attached to a request once its bearer token has been accepted.
///
/// Lives in the request extensions for handlers and is copied to the
/// response extensions so outer layers can see who made the call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Principal {
    pub user_id: UserId,
}

/// Outcome of looking up the [`Principal`] of a request or response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Identity {
    Present(UserId),
    Absent,
}

impl Identity {
    pub fn of(extensions: &Extensions) -> Self {
        extensions
            .get::<Principal>()
            .map_or(Identity::Absent, |principal| {
                Identity::Present(principal.user_id)
            })
    }

    pub fn user_id(self) -> Option<UserId> {
        match self {
            Identity::Present(user_id) => Some(user_id),
            Identity::Absent => None,
        }
    }
}
