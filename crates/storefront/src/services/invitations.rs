//! Invitation workflow.
//!
//! Creating an invite requires that the inviter's role is allowed to grant
//! the requested role per the `role_hierarchy` table. Accepting an invite
//! consumes its token, creates a profile with the invited role, and marks
//! the invite accepted so the token cannot be reused.

use sqlx::PgPool;
use thiserror::Error;
use uuid::Uuid;

use copperleaf_core::{Email, Role, UserId};

use crate::db::{Invite, InviteRepository, RepositoryError, RoleHierarchyRepository};
use crate::models::Profile;
use crate::services::auth::{AuthError, AuthService};

/// Errors that can occur in the invitation workflow.
#[derive(Debug, Error)]
pub enum InvitationError {
    /// The inviter's role may not grant the requested role.
    #[error("role '{inviter}' may not invite role '{requested}'")]
    RoleNotAllowed { inviter: Role, requested: Role },

    /// No invite matches the token.
    #[error("invite not found")]
    InvalidToken,

    /// The invite's expiry has passed.
    #[error("invite has expired")]
    Expired,

    /// The invite's token was already used.
    #[error("invite was already accepted")]
    AlreadyAccepted,

    /// Profile creation failed during acceptance.
    #[error(transparent)]
    Auth(#[from] AuthError),

    /// Repository/database error.
    #[error("database error: {0}")]
    Repository(#[from] RepositoryError),
}

/// Invitation workflow service.
pub struct InvitationService<'a> {
    pool: &'a PgPool,
    invites: InviteRepository<'a>,
    roles: RoleHierarchyRepository<'a>,
}

impl<'a> InvitationService<'a> {
    /// Create a new invitation service.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self {
            pool,
            invites: InviteRepository::new(pool),
            roles: RoleHierarchyRepository::new(pool),
        }
    }

    /// Roles the given role may invite.
    ///
    /// # Errors
    ///
    /// Returns `InvitationError::Repository` if the lookup fails.
    pub async fn available_roles(&self, inviter_role: Role) -> Result<Vec<Role>, InvitationError> {
        Ok(self.roles.available_roles(inviter_role).await?)
    }

    /// Create an invite, checking the inviter is allowed to grant the role.
    ///
    /// # Errors
    ///
    /// Returns `InvitationError::RoleNotAllowed` if the hierarchy forbids the
    /// grant, `InvitationError::Repository` with a conflict if a pending
    /// invite already exists for the email.
    pub async fn create(
        &self,
        inviter_id: UserId,
        inviter_role: Role,
        email: &Email,
        role: Role,
    ) -> Result<Invite, InvitationError> {
        let allowed = self.roles.available_roles(inviter_role).await?;
        if !allowed.contains(&role) {
            return Err(InvitationError::RoleNotAllowed {
                inviter: inviter_role,
                requested: role,
            });
        }

        Ok(self.invites.create(email, role, Some(inviter_id)).await?)
    }

    /// List all invites, newest first.
    ///
    /// # Errors
    ///
    /// Returns `InvitationError::Repository` if the query fails.
    pub async fn list(&self) -> Result<Vec<Invite>, InvitationError> {
        Ok(self.invites.list_all().await?)
    }

    /// Accept an invite: create a profile with the invited role and consume
    /// the token.
    ///
    /// The invite is checked fresh at acceptance time; a token that was valid
    /// when the email went out still fails here if the expiry has since
    /// passed.
    ///
    /// # Errors
    ///
    /// Returns `InvalidToken`, `Expired`, or `AlreadyAccepted` for the
    /// respective invite states, and `InvitationError::Auth` if profile
    /// creation fails (weak password, email already registered).
    pub async fn accept(&self, token: Uuid, password: &str) -> Result<Profile, InvitationError> {
        let invite = self
            .invites
            .get_by_token(token)
            .await?
            .ok_or(InvitationError::InvalidToken)?;

        if invite.is_accepted() {
            return Err(InvitationError::AlreadyAccepted);
        }
        if invite.is_expired() {
            return Err(InvitationError::Expired);
        }

        let auth = AuthService::new(self.pool);
        let profile = auth
            .signup_with_role(&invite.email, password, invite.role)
            .await?;

        self.invites.mark_accepted(invite.id, profile.id).await?;

        Ok(profile)
    }
}
