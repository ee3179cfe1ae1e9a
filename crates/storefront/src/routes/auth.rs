//! Auth route handlers.
//!
//! The session is established at sign-in, carries `CurrentUser`, and is
//! flushed entirely at sign-out. Invite acceptance also signs the new
//! profile in, since it just proved control of the invited email's token.

use axum::{Json, extract::State, http::StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use tower_sessions::Session;
use tracing::instrument;
use uuid::Uuid;

use copperleaf_core::Role;

use crate::error::{AppError, Result, clear_sentry_user, set_sentry_user};
use crate::middleware::{clear_current_user, set_current_user};
use crate::models::{CurrentUser, Profile};
use crate::services::auth::AuthService;
use crate::services::invitations::InvitationService;
use crate::state::AppState;

/// Signup / login request body.
#[derive(Debug, Deserialize)]
pub struct CredentialsRequest {
    pub email: String,
    pub password: String,
}

/// Invite acceptance request body.
#[derive(Debug, Deserialize)]
pub struct AcceptInviteRequest {
    pub token: Uuid,
    pub password: String,
}

/// The signed-in identity as returned to clients.
#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub id: i32,
    pub email: String,
    pub role: Role,
}

impl From<&Profile> for UserResponse {
    fn from(profile: &Profile) -> Self {
        Self {
            id: profile.id.as_i32(),
            email: profile.email.as_str().to_owned(),
            role: profile.role,
        }
    }
}

/// Write the profile into the session and Sentry scope.
async fn establish_session(session: &Session, profile: &Profile) -> Result<()> {
    let user = CurrentUser::from(profile);
    set_current_user(session, &user)
        .await
        .map_err(|e| AppError::Internal(format!("failed to write session: {e}")))?;
    set_sentry_user(&profile.id, Some(profile.email.as_str()));

    Ok(())
}

/// Create a customer profile and sign it in.
#[instrument(skip(state, session, body))]
pub async fn signup(
    State(state): State<AppState>,
    session: Session,
    Json(body): Json<CredentialsRequest>,
) -> Result<(StatusCode, Json<UserResponse>)> {
    let profile = AuthService::new(state.pool())
        .signup(&body.email, &body.password)
        .await?;

    establish_session(&session, &profile).await?;
    tracing::info!(user_id = %profile.id, "profile created");

    Ok((StatusCode::CREATED, Json(UserResponse::from(&profile))))
}

/// Establish a session for an existing profile.
#[instrument(skip(state, session, body))]
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    Json(body): Json<CredentialsRequest>,
) -> Result<Json<UserResponse>> {
    let profile = AuthService::new(state.pool())
        .login(&body.email, &body.password)
        .await?;

    // Rotate the session id so a pre-login session can't be replayed as the
    // signed-in one.
    session
        .cycle_id()
        .await
        .map_err(|e| AppError::Internal(format!("failed to cycle session: {e}")))?;
    establish_session(&session, &profile).await?;

    Ok(Json(UserResponse::from(&profile)))
}

/// Invalidate the session.
#[instrument(skip(session))]
pub async fn logout(session: Session) -> Result<Json<Value>> {
    clear_current_user(&session)
        .await
        .map_err(|e| AppError::Internal(format!("failed to clear session: {e}")))?;
    session
        .flush()
        .await
        .map_err(|e| AppError::Internal(format!("failed to flush session: {e}")))?;
    clear_sentry_user();

    Ok(Json(json!({ "success": true })))
}

/// Accept an invite: create the profile with the invited role and sign in.
#[instrument(skip(state, session, body))]
pub async fn accept_invite(
    State(state): State<AppState>,
    session: Session,
    Json(body): Json<AcceptInviteRequest>,
) -> Result<(StatusCode, Json<UserResponse>)> {
    let profile = InvitationService::new(state.pool())
        .accept(body.token, &body.password)
        .await?;

    establish_session(&session, &profile).await?;
    tracing::info!(user_id = %profile.id, role = %profile.role, "invite accepted");

    Ok((StatusCode::CREATED, Json(UserResponse::from(&profile))))
}
