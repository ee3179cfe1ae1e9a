//! Wishlist repository for database operations.
//!
//! Wishlist rows are unique per (user, product), enforced by a database
//! constraint. A duplicate add is not an error: the conflict is reinterpreted
//! as "already in wishlist" and no second row is created. Removal is by row
//! id and always scoped to the owning user.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use copperleaf_core::{ProductId, UserId, WishlistItemId};

use super::RepositoryError;

/// A wishlist row (domain type).
#[derive(Debug, Clone, serde::Serialize)]
pub struct WishlistItem {
    pub id: WishlistItemId,
    pub user_id: UserId,
    pub product_id: ProductId,
    pub created_at: DateTime<Utc>,
}

/// A wishlist row joined with its product, for display.
#[derive(Debug, Clone, serde::Serialize)]
pub struct WishlistEntry {
    pub id: WishlistItemId,
    pub product_id: ProductId,
    pub product_slug: String,
    pub product_name: String,
    pub created_at: DateTime<Utc>,
}

/// Result of an add: either a fresh row, or the benign duplicate case.
#[derive(Debug)]
pub enum WishlistAdd {
    /// A new row was created.
    Added(WishlistItem),
    /// The (user, product) row already existed; nothing changed.
    AlreadyPresent,
}

/// Internal row type for database queries.
#[derive(Debug, sqlx::FromRow)]
struct WishlistItemRow {
    id: i32,
    user_id: i32,
    product_id: i32,
    created_at: DateTime<Utc>,
}

impl From<WishlistItemRow> for WishlistItem {
    fn from(row: WishlistItemRow) -> Self {
        Self {
            id: WishlistItemId::new(row.id),
            user_id: UserId::new(row.user_id),
            product_id: ProductId::new(row.product_id),
            created_at: row.created_at,
        }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct WishlistEntryRow {
    id: i32,
    product_id: i32,
    product_slug: String,
    product_name: String,
    created_at: DateTime<Utc>,
}

impl From<WishlistEntryRow> for WishlistEntry {
    fn from(row: WishlistEntryRow) -> Self {
        Self {
            id: WishlistItemId::new(row.id),
            product_id: ProductId::new(row.product_id),
            product_slug: row.product_slug,
            product_name: row.product_name,
            created_at: row.created_at,
        }
    }
}

/// Repository for wishlist database operations.
pub struct WishlistRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> WishlistRepository<'a> {
    /// Create a new wishlist repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Add a product to the user's wishlist.
    ///
    /// Inserts unconditionally; a uniqueness violation means the product is
    /// already wishlisted and is reported as `WishlistAdd::AlreadyPresent`,
    /// not as an error.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` for failures other than the
    /// duplicate case.
    pub async fn add(
        &self,
        user_id: UserId,
        product_id: ProductId,
    ) -> Result<WishlistAdd, RepositoryError> {
        let result = sqlx::query_as::<_, WishlistItemRow>(
            r"
            INSERT INTO storefront.wishlist_item (user_id, product_id)
            VALUES ($1, $2)
            RETURNING id, user_id, product_id, created_at
            ",
        )
        .bind(user_id.as_i32())
        .bind(product_id.as_i32())
        .fetch_one(self.pool)
        .await;

        match result {
            Ok(row) => Ok(WishlistAdd::Added(row.into())),
            Err(sqlx::Error::Database(db_err)) if db_err.is_unique_violation() => {
                Ok(WishlistAdd::AlreadyPresent)
            }
            Err(e) => Err(RepositoryError::Database(e)),
        }
    }

    /// Remove a wishlist row by its id.
    ///
    /// The delete is scoped to `user_id`; an id belonging to another user
    /// deletes nothing and returns `false`.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn remove(
        &self,
        user_id: UserId,
        item_id: WishlistItemId,
    ) -> Result<bool, RepositoryError> {
        let result = sqlx::query(
            r"
            DELETE FROM storefront.wishlist_item
            WHERE id = $1 AND user_id = $2
            ",
        )
        .bind(item_id.as_i32())
        .bind(user_id.as_i32())
        .execute(self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Resolve a product to the user's wishlist row id, if wishlisted.
    ///
    /// Removal is by row id, so callers holding only a product id resolve
    /// it here first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn item_id_for_product(
        &self,
        user_id: UserId,
        product_id: ProductId,
    ) -> Result<Option<WishlistItemId>, RepositoryError> {
        let id: Option<i32> = sqlx::query_scalar(
            r"
            SELECT id FROM storefront.wishlist_item
            WHERE user_id = $1 AND product_id = $2
            ",
        )
        .bind(user_id.as_i32())
        .bind(product_id.as_i32())
        .fetch_optional(self.pool)
        .await?;

        Ok(id.map(WishlistItemId::new))
    }

    /// List the user's wishlist with product details joined.
    ///
    /// Handlers re-fetch through this after every mutation so the snapshot
    /// they return is never stale relative to the mutation that produced it.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(&self, user_id: UserId) -> Result<Vec<WishlistEntry>, RepositoryError> {
        let rows = sqlx::query_as::<_, WishlistEntryRow>(
            r"
            SELECT wi.id, wi.product_id, p.slug AS product_slug,
                   p.name AS product_name, wi.created_at
            FROM storefront.wishlist_item wi
            JOIN storefront.product p ON p.id = wi.product_id
            WHERE wi.user_id = $1
            ORDER BY wi.created_at DESC
            ",
        )
        .bind(user_id.as_i32())
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }
}

/// Membership predicate over a fetched snapshot.
///
/// Pure and only as fresh as the snapshot it is given.
#[must_use]
pub fn is_in_wishlist(entries: &[WishlistEntry], product_id: ProductId) -> bool {
    entries.iter().any(|e| e.product_id == product_id)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(product_id: i32) -> WishlistEntry {
        WishlistEntry {
            id: WishlistItemId::new(product_id),
            product_id: ProductId::new(product_id),
            product_slug: format!("product-{product_id}"),
            product_name: format!("Product {product_id}"),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_is_in_wishlist() {
        let entries = vec![entry(1), entry(3)];
        assert!(is_in_wishlist(&entries, ProductId::new(1)));
        assert!(is_in_wishlist(&entries, ProductId::new(3)));
        assert!(!is_in_wishlist(&entries, ProductId::new(2)));
    }

    #[test]
    fn test_is_in_wishlist_empty_snapshot() {
        assert!(!is_in_wishlist(&[], ProductId::new(1)));
    }
}
