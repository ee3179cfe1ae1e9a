//! Invite repository for database operations.
//!
//! An invite is a persisted pending invitation: who may register, which role
//! they receive, a single-use acceptance token, and an expiry. At most one
//! pending invite may exist per email (partial unique index).

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use copperleaf_core::{Email, InviteId, Role, UserId};

use super::RepositoryError;

/// Invite lifetime in days.
pub const INVITE_EXPIRY_DAYS: i32 = 7;

/// An invite record.
#[derive(Debug, Clone)]
pub struct Invite {
    /// Unique identifier.
    pub id: InviteId,
    /// Email address that can register.
    pub email: Email,
    /// Role to assign when the invite is accepted.
    pub role: Role,
    /// Single-use acceptance token.
    pub token: Uuid,
    /// User who created this invite (None for CLI-created).
    pub invited_by: Option<UserId>,
    /// When the invite was created.
    pub created_at: DateTime<Utc>,
    /// When the invite expires.
    pub expires_at: DateTime<Utc>,
    /// When the invite was accepted (None if pending).
    pub accepted_at: Option<DateTime<Utc>>,
    /// Profile created when the invite was accepted.
    pub accepted_by: Option<UserId>,
}

impl Invite {
    /// Returns true if this invite has already been accepted.
    #[must_use]
    pub const fn is_accepted(&self) -> bool {
        self.accepted_at.is_some()
    }

    /// Returns true if this invite has expired.
    #[must_use]
    pub fn is_expired(&self) -> bool {
        Utc::now() > self.expires_at
    }

    /// Returns true if this invite can still be accepted.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        !self.is_accepted() && !self.is_expired()
    }
}

/// Internal row type for database queries.
#[derive(Debug, sqlx::FromRow)]
struct InviteRow {
    id: i32,
    email: String,
    role: String,
    token: Uuid,
    invited_by: Option<i32>,
    created_at: DateTime<Utc>,
    expires_at: DateTime<Utc>,
    accepted_at: Option<DateTime<Utc>>,
    accepted_by: Option<i32>,
}

impl TryFrom<InviteRow> for Invite {
    type Error = RepositoryError;

    fn try_from(row: InviteRow) -> Result<Self, Self::Error> {
        let email = Email::parse(&row.email).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid email in database: {e}"))
        })?;
        let role = row.role.parse::<Role>().map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid role in database: {e}"))
        })?;

        Ok(Self {
            id: InviteId::new(row.id),
            email,
            role,
            token: row.token,
            invited_by: row.invited_by.map(UserId::new),
            created_at: row.created_at,
            expires_at: row.expires_at,
            accepted_at: row.accepted_at,
            accepted_by: row.accepted_by.map(UserId::new),
        })
    }
}

const INVITE_COLUMNS: &str =
    "id, email, role, token, invited_by, created_at, expires_at, accepted_at, accepted_by";

/// Repository for invite database operations.
pub struct InviteRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> InviteRepository<'a> {
    /// Create a new invite repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List all invites (pending and accepted).
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_all(&self) -> Result<Vec<Invite>, RepositoryError> {
        let rows = sqlx::query_as::<_, InviteRow>(&format!(
            "SELECT {INVITE_COLUMNS} FROM storefront.invite ORDER BY created_at DESC"
        ))
        .fetch_all(self.pool)
        .await?;

        rows.into_iter().map(TryInto::try_into).collect()
    }

    /// Get an invite by its acceptance token.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_by_token(&self, token: Uuid) -> Result<Option<Invite>, RepositoryError> {
        let row = sqlx::query_as::<_, InviteRow>(&format!(
            "SELECT {INVITE_COLUMNS} FROM storefront.invite WHERE token = $1"
        ))
        .bind(token)
        .fetch_optional(self.pool)
        .await?;

        row.map(TryInto::try_into).transpose()
    }

    /// Create a new invite with a fresh token, expiring in
    /// [`INVITE_EXPIRY_DAYS`] days.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if a pending invite already exists
    /// for this email. Returns `RepositoryError::Database` for other errors.
    pub async fn create(
        &self,
        email: &Email,
        role: Role,
        invited_by: Option<UserId>,
    ) -> Result<Invite, RepositoryError> {
        let row = sqlx::query_as::<_, InviteRow>(&format!(
            r"
            INSERT INTO storefront.invite (email, role, token, invited_by, expires_at)
            VALUES ($1, $2, $3, $4, NOW() + make_interval(days => $5))
            RETURNING {INVITE_COLUMNS}
            "
        ))
        .bind(email.as_str())
        .bind(role.as_str())
        .bind(Uuid::new_v4())
        .bind(invited_by.map(|id| id.as_i32()))
        .bind(INVITE_EXPIRY_DAYS)
        .fetch_one(self.pool)
        .await
        .map_err(|e| RepositoryError::from_sqlx(e, "a pending invite already exists for this email"))?;

        row.try_into()
    }

    /// Mark an invite as accepted by a newly created profile.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the invite doesn't exist or was
    /// already accepted. Returns `RepositoryError::Database` for other errors.
    pub async fn mark_accepted(
        &self,
        id: InviteId,
        accepted_by: UserId,
    ) -> Result<(), RepositoryError> {
        let result = sqlx::query(
            r"
            UPDATE storefront.invite
            SET accepted_at = NOW(), accepted_by = $1
            WHERE id = $2 AND accepted_at IS NULL
            ",
        )
        .bind(accepted_by.as_i32())
        .bind(id.as_i32())
        .execute(self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }

    /// Delete expired, unaccepted invites (cleanup).
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn delete_expired(&self) -> Result<u64, RepositoryError> {
        let result = sqlx::query(
            r"
            DELETE FROM storefront.invite
            WHERE accepted_at IS NULL AND expires_at < NOW()
            ",
        )
        .execute(self.pool)
        .await?;

        Ok(result.rows_affected())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn invite(expires_in: Duration, accepted: bool) -> Invite {
        Invite {
            id: InviteId::new(1),
            email: Email::parse("invitee@example.com").unwrap(),
            role: Role::Staff,
            token: Uuid::new_v4(),
            invited_by: Some(UserId::new(1)),
            created_at: Utc::now(),
            expires_at: Utc::now() + expires_in,
            accepted_at: accepted.then(Utc::now),
            accepted_by: accepted.then(|| UserId::new(2)),
        }
    }

    #[test]
    fn test_pending_unexpired_invite_is_valid() {
        assert!(invite(Duration::days(7), false).is_valid());
    }

    #[test]
    fn test_expired_invite_is_invalid() {
        let inv = invite(Duration::days(-1), false);
        assert!(inv.is_expired());
        assert!(!inv.is_valid());
    }

    #[test]
    fn test_accepted_invite_is_invalid() {
        let inv = invite(Duration::days(7), true);
        assert!(inv.is_accepted());
        assert!(!inv.is_valid());
    }
}
