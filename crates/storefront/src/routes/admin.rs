//! Admin route handlers.
//!
//! Every handler here takes `RequireSuperAdmin`: the gate re-checks the
//! configured email and the database role on each request before any of
//! this code runs.

use axum::{Json, extract::State, http::StatusCode};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::instrument;
use uuid::Uuid;

use copperleaf_core::Role;

use crate::db::Invite;
use crate::error::Result;
use crate::middleware::RequireSuperAdmin;
use crate::services::invitations::InvitationService;
use crate::state::AppState;

/// An invite as returned to the admin surface.
///
/// The token is included: with no email dispatch, handing the token to the
/// inviting admin is the delivery mechanism.
#[derive(Debug, Serialize)]
pub struct InviteResponse {
    pub id: i32,
    pub email: String,
    pub role: Role,
    pub token: Uuid,
    pub expires_at: DateTime<Utc>,
    pub accepted: bool,
}

impl From<&Invite> for InviteResponse {
    fn from(invite: &Invite) -> Self {
        Self {
            id: invite.id.as_i32(),
            email: invite.email.as_str().to_owned(),
            role: invite.role,
            token: invite.token,
            expires_at: invite.expires_at,
            accepted: invite.is_accepted(),
        }
    }
}

/// Create-invite request body.
#[derive(Debug, Deserialize)]
pub struct CreateInviteRequest {
    pub email: String,
    pub role: Role,
}

/// List all invites, newest first.
#[instrument(skip(state, admin), fields(admin_id = %admin.0.id))]
pub async fn list_invites(
    State(state): State<AppState>,
    admin: RequireSuperAdmin,
) -> Result<Json<Vec<InviteResponse>>> {
    let invites = InvitationService::new(state.pool()).list().await?;

    Ok(Json(invites.iter().map(InviteResponse::from).collect()))
}

/// Create an invite.
///
/// The requested role must be one the caller's role may grant per the
/// hierarchy table; anything else is a 403.
#[instrument(skip(state, admin, body), fields(admin_id = %admin.0.id))]
pub async fn create_invite(
    State(state): State<AppState>,
    admin: RequireSuperAdmin,
    Json(body): Json<CreateInviteRequest>,
) -> Result<(StatusCode, Json<InviteResponse>)> {
    let email = copperleaf_core::Email::parse(&body.email)
        .map_err(|e| crate::error::AppError::BadRequest(format!("invalid email: {e}")))?;

    let invite = InvitationService::new(state.pool())
        .create(admin.0.id, admin.0.role, &email, body.role)
        .await?;

    tracing::info!(invite_id = %invite.id, role = %invite.role, "invite created");

    Ok((StatusCode::CREATED, Json(InviteResponse::from(&invite))))
}

/// Roles the caller may invite.
#[instrument(skip(state, admin), fields(admin_id = %admin.0.id))]
pub async fn available_roles(
    State(state): State<AppState>,
    admin: RequireSuperAdmin,
) -> Result<Json<Vec<Role>>> {
    let roles = InvitationService::new(state.pool())
        .available_roles(admin.0.role)
        .await?;

    Ok(Json(roles))
}
