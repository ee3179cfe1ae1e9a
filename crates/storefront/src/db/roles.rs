//! Role hierarchy repository.
//!
//! `role_hierarchy` is static reference data seeded by the CLI: one row per
//! role, naming the roles it may invite and its permission strings. The
//! application only ever reads it.

use sqlx::PgPool;

use copperleaf_core::Role;

use super::RepositoryError;

/// A role hierarchy row (domain type).
#[derive(Debug, Clone, serde::Serialize)]
pub struct RoleHierarchyEntry {
    /// The role this row describes.
    pub role: Role,
    /// Roles this role is allowed to invite.
    pub can_manage_roles: Vec<Role>,
    /// Permission strings for this role.
    pub permissions: Vec<String>,
}

/// Internal row type for database queries.
#[derive(Debug, sqlx::FromRow)]
struct RoleHierarchyRow {
    role: String,
    can_manage_roles: Vec<String>,
    permissions: Vec<String>,
}

impl TryFrom<RoleHierarchyRow> for RoleHierarchyEntry {
    type Error = RepositoryError;

    fn try_from(row: RoleHierarchyRow) -> Result<Self, Self::Error> {
        let role = row.role.parse::<Role>().map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid role in hierarchy: {e}"))
        })?;

        let can_manage_roles = row
            .can_manage_roles
            .iter()
            .map(|r| {
                r.parse::<Role>().map_err(|e| {
                    RepositoryError::DataCorruption(format!(
                        "invalid manageable role in hierarchy: {e}"
                    ))
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            role,
            can_manage_roles,
            permissions: row.permissions,
        })
    }
}

/// Repository for role hierarchy lookups.
pub struct RoleHierarchyRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> RoleHierarchyRepository<'a> {
    /// Create a new role hierarchy repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Get the hierarchy entry for a role, if one is defined.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if stored data is invalid.
    pub async fn get(&self, role: Role) -> Result<Option<RoleHierarchyEntry>, RepositoryError> {
        let row = sqlx::query_as::<_, RoleHierarchyRow>(
            r"
            SELECT role, can_manage_roles, permissions
            FROM storefront.role_hierarchy
            WHERE role = $1
            ",
        )
        .bind(role.as_str())
        .fetch_optional(self.pool)
        .await?;

        row.map(TryInto::try_into).transpose()
    }

    /// Roles the given role may invite.
    ///
    /// A role with no hierarchy row may invite nothing.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if stored data is invalid.
    pub async fn available_roles(&self, role: Role) -> Result<Vec<Role>, RepositoryError> {
        Ok(self
            .get(role)
            .await?
            .map(|entry| entry.can_manage_roles)
            .unwrap_or_default())
    }
}
