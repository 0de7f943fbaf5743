//! Authentication route handlers.
//!
//! Sign-in is a demo stub: any non-empty email and password are accepted.
//! See [`AuthStore`](crate::stores::AuthStore).

use axum::{Json, extract::State};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::error::{Result, clear_sentry_user, set_sentry_user};
use crate::middleware::{OptionalUser, RequireUser};
use crate::state::AppState;
use crate::stores::User;

/// Login request.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: String,
    pub password: Option<SecretString>,
}

/// Sign-up request.
#[derive(Debug, Deserialize)]
pub struct SignupRequest {
    #[serde(default)]
    pub email: String,
    pub password: Option<SecretString>,
    pub name: Option<String>,
}

/// Current session.
#[derive(Debug, Serialize)]
pub struct SessionView {
    pub user: Option<User>,
}

/// A missing password is checked like an empty one.
fn password_or_empty(password: Option<SecretString>) -> SecretString {
    password.unwrap_or_else(|| SecretString::from(String::new()))
}

/// Sign in.
#[instrument(skip(state, request))]
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<SessionView>> {
    let password = password_or_empty(request.password);
    let mut stores = state.stores()?;
    let user = stores.auth.login(&request.email, &password)?.clone();
    set_sentry_user(&user.id, Some(&user.email));
    Ok(Json(SessionView { user: Some(user) }))
}

/// Create an account and sign in.
#[instrument(skip(state, request))]
pub async fn signup(
    State(state): State<AppState>,
    Json(request): Json<SignupRequest>,
) -> Result<Json<SessionView>> {
    let password = password_or_empty(request.password);
    let mut stores = state.stores()?;
    let user = stores
        .auth
        .signup(&request.email, &password, request.name.as_deref())?
        .clone();
    set_sentry_user(&user.id, Some(&user.email));
    Ok(Json(SessionView { user: Some(user) }))
}

/// Sign out.
#[instrument(skip(state))]
pub async fn logout(State(state): State<AppState>) -> Result<Json<SessionView>> {
    state.stores()?.auth.logout();
    clear_sentry_user();
    Ok(Json(SessionView { user: None }))
}

/// The current session, signed in or not.
#[instrument(skip_all)]
pub async fn session(OptionalUser(user): OptionalUser) -> Json<SessionView> {
    Json(SessionView { user })
}

/// The signed-in shopper.
#[instrument(skip_all)]
pub async fn me(RequireUser(user): RequireUser) -> Json<User> {
    Json(user)
}
