//! Authentication extractors.
//!
//! The signed-in shopper lives in the [`AuthStore`](crate::stores::AuthStore);
//! these extractors read it from [`AppState`] for route handlers.

use axum::{extract::FromRequestParts, http::request::Parts};

use crate::error::AppError;
use crate::state::AppState;
use crate::stores::User;

/// Extractor that requires a signed-in shopper.
///
/// Rejects with `401 Unauthorized` when nobody is signed in.
///
/// # Example
///
/// ```rust,ignore
/// async fn protected_handler(RequireUser(user): RequireUser) -> String {
///     format!("Hello, {}!", user.email)
/// }
/// ```
#[derive(Debug, Clone)]
pub struct RequireUser(pub User);

impl FromRequestParts<AppState> for RequireUser {
    type Rejection = AppError;

    async fn from_request_parts(
        _parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        OptionalUser::current(state)?
            .map(Self)
            .ok_or_else(|| AppError::Unauthorized("sign in required".to_string()))
    }
}

/// Extractor that optionally gets the signed-in shopper.
#[derive(Debug, Clone)]
pub struct OptionalUser(pub Option<User>);

impl OptionalUser {
    fn current(state: &AppState) -> Result<Option<User>, AppError> {
        Ok(state.stores()?.auth.user().cloned())
    }
}

impl FromRequestParts<AppState> for OptionalUser {
    type Rejection = AppError;

    async fn from_request_parts(
        _parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        Self::current(state).map(Self)
    }
}
