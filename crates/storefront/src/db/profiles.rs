//! Profile repository for database operations.
//!
//! One profile row per authenticated identity. Passwords live in a separate
//! table so profile reads never touch hash material.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use copperleaf_core::{Email, Role, UserId};

use super::RepositoryError;
use crate::models::Profile;

/// Internal row type for database queries.
#[derive(Debug, sqlx::FromRow)]
struct ProfileRow {
    id: i32,
    email: String,
    role: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<ProfileRow> for Profile {
    type Error = RepositoryError;

    fn try_from(row: ProfileRow) -> Result<Self, Self::Error> {
        let email = Email::parse(&row.email).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid email in database: {e}"))
        })?;
        let role = row.role.parse::<Role>().map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid role in database: {e}"))
        })?;

        Ok(Self {
            id: UserId::new(row.id),
            email,
            role,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

/// Repository for profile database operations.
pub struct ProfileRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ProfileRepository<'a> {
    /// Create a new profile repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Get a profile by email address.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if stored data is invalid.
    pub async fn get_by_email(&self, email: &Email) -> Result<Option<Profile>, RepositoryError> {
        let row = sqlx::query_as::<_, ProfileRow>(
            r"
            SELECT id, email, role, created_at, updated_at
            FROM storefront.profile
            WHERE email = $1
            ",
        )
        .bind(email.as_str())
        .fetch_optional(self.pool)
        .await?;

        row.map(TryInto::try_into).transpose()
    }

    /// Get a profile by ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if stored data is invalid.
    pub async fn get_by_id(&self, id: UserId) -> Result<Option<Profile>, RepositoryError> {
        let row = sqlx::query_as::<_, ProfileRow>(
            r"
            SELECT id, email, role, created_at, updated_at
            FROM storefront.profile
            WHERE id = $1
            ",
        )
        .bind(id.as_i32())
        .fetch_optional(self.pool)
        .await?;

        row.map(TryInto::try_into).transpose()
    }

    /// Look up just the role for a user.
    ///
    /// This is the role half of the super-admin gate; callers must treat any
    /// error as "no role" (the gate fails closed).
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if the stored role is invalid.
    pub async fn get_role(&self, id: UserId) -> Result<Option<Role>, RepositoryError> {
        let role: Option<String> =
            sqlx::query_scalar("SELECT role FROM storefront.profile WHERE id = $1")
                .bind(id.as_i32())
                .fetch_optional(self.pool)
                .await?;

        role.map(|r| {
            r.parse::<Role>().map_err(|e| {
                RepositoryError::DataCorruption(format!("invalid role in database: {e}"))
            })
        })
        .transpose()
    }

    /// Create a new profile with email, password hash, and role.
    ///
    /// The profile and its password entry are written in one transaction.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the email already exists.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn create(
        &self,
        email: &Email,
        password_hash: &str,
        role: Role,
    ) -> Result<Profile, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        let row = sqlx::query_as::<_, ProfileRow>(
            r"
            INSERT INTO storefront.profile (email, role)
            VALUES ($1, $2)
            RETURNING id, email, role, created_at, updated_at
            ",
        )
        .bind(email.as_str())
        .bind(role.as_str())
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| RepositoryError::from_sqlx(e, "email already exists"))?;

        let profile: Profile = row.try_into()?;

        sqlx::query(
            r"
            INSERT INTO storefront.profile_password (user_id, password_hash)
            VALUES ($1, $2)
            ",
        )
        .bind(profile.id.as_i32())
        .bind(password_hash)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(profile)
    }

    /// Get a profile and its password hash by email.
    ///
    /// Returns `None` if the profile doesn't exist or has no password set.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_password_hash(
        &self,
        email: &Email,
    ) -> Result<Option<(Profile, String)>, RepositoryError> {
        #[derive(sqlx::FromRow)]
        struct ProfilePasswordRow {
            #[sqlx(flatten)]
            profile: ProfileRow,
            password_hash: Option<String>,
        }

        let row = sqlx::query_as::<_, ProfilePasswordRow>(
            r"
            SELECT p.id, p.email, p.role, p.created_at, p.updated_at,
                   pw.password_hash
            FROM storefront.profile p
            LEFT JOIN storefront.profile_password pw ON p.id = pw.user_id
            WHERE p.email = $1
            ",
        )
        .bind(email.as_str())
        .fetch_optional(self.pool)
        .await?;

        let Some(r) = row else {
            return Ok(None);
        };
        let Some(password_hash) = r.password_hash else {
            return Ok(None);
        };

        Ok(Some((r.profile.try_into()?, password_hash)))
    }

    /// Set a profile's role by email.
    ///
    /// This is the only in-app role mutation surface and is reachable only
    /// from the CLI (`copperleaf-cli admin grant`).
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no profile has this email.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn set_role(&self, email: &Email, role: Role) -> Result<(), RepositoryError> {
        let result = sqlx::query(
            r"
            UPDATE storefront.profile
            SET role = $1, updated_at = NOW()
            WHERE email = $2
            ",
        )
        .bind(role.as_str())
        .bind(email.as_str())
        .execute(self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }
}
