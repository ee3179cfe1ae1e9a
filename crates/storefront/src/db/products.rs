//! Catalog repository: products and categories.
//!
//! Read-only from the application's perspective; the catalog is maintained
//! through the CLI seeder and direct database edits.

use rust_decimal::Decimal;
use sqlx::PgPool;

use copperleaf_core::{CategoryId, CurrencyCode, Price, ProductId};

use super::RepositoryError;

/// A product category.
#[derive(Debug, Clone, serde::Serialize)]
pub struct Category {
    pub id: CategoryId,
    pub slug: String,
    pub name: String,
}

/// A catalog product.
#[derive(Debug, Clone, serde::Serialize)]
pub struct Product {
    pub id: ProductId,
    pub category_id: CategoryId,
    pub slug: String,
    pub name: String,
    pub description: String,
    pub price: Price,
    pub available: bool,
}

/// Internal row type for database queries.
#[derive(Debug, sqlx::FromRow)]
struct ProductRow {
    id: i32,
    category_id: i32,
    slug: String,
    name: String,
    description: String,
    price: Decimal,
    currency: String,
    available: bool,
}

impl TryFrom<ProductRow> for Product {
    type Error = RepositoryError;

    fn try_from(row: ProductRow) -> Result<Self, Self::Error> {
        let currency = row.currency.parse::<CurrencyCode>().map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid currency in database: {e}"))
        })?;

        Ok(Self {
            id: ProductId::new(row.id),
            category_id: CategoryId::new(row.category_id),
            slug: row.slug,
            name: row.name,
            description: row.description,
            price: Price::new(row.price, currency),
            available: row.available,
        })
    }
}

#[derive(Debug, sqlx::FromRow)]
struct CategoryRow {
    id: i32,
    slug: String,
    name: String,
}

impl From<CategoryRow> for Category {
    fn from(row: CategoryRow) -> Self {
        Self {
            id: CategoryId::new(row.id),
            slug: row.slug,
            name: row.name,
        }
    }
}

/// Repository for catalog database operations.
pub struct ProductRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ProductRepository<'a> {
    /// Create a new catalog repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List all categories.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_categories(&self) -> Result<Vec<Category>, RepositoryError> {
        let rows = sqlx::query_as::<_, CategoryRow>(
            "SELECT id, slug, name FROM storefront.category ORDER BY name ASC",
        )
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    /// List available products, optionally filtered by category slug.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if stored data is invalid.
    pub async fn list(
        &self,
        category_slug: Option<&str>,
    ) -> Result<Vec<Product>, RepositoryError> {
        let rows = match category_slug {
            Some(slug) => {
                sqlx::query_as::<_, ProductRow>(
                    r"
                    SELECT p.id, p.category_id, p.slug, p.name, p.description,
                           p.price, p.currency, p.available
                    FROM storefront.product p
                    JOIN storefront.category c ON c.id = p.category_id
                    WHERE p.available AND c.slug = $1
                    ORDER BY p.name ASC
                    ",
                )
                .bind(slug)
                .fetch_all(self.pool)
                .await?
            }
            None => {
                sqlx::query_as::<_, ProductRow>(
                    r"
                    SELECT id, category_id, slug, name, description,
                           price, currency, available
                    FROM storefront.product
                    WHERE available
                    ORDER BY name ASC
                    ",
                )
                .fetch_all(self.pool)
                .await?
            }
        };

        rows.into_iter().map(TryInto::try_into).collect()
    }

    /// Get a product by slug.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if stored data is invalid.
    pub async fn get_by_slug(&self, slug: &str) -> Result<Option<Product>, RepositoryError> {
        let row = sqlx::query_as::<_, ProductRow>(
            r"
            SELECT id, category_id, slug, name, description,
                   price, currency, available
            FROM storefront.product
            WHERE slug = $1
            ",
        )
        .bind(slug)
        .fetch_optional(self.pool)
        .await?;

        row.map(TryInto::try_into).transpose()
    }

    /// Get a product by ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if stored data is invalid.
    pub async fn get_by_id(&self, id: ProductId) -> Result<Option<Product>, RepositoryError> {
        let row = sqlx::query_as::<_, ProductRow>(
            r"
            SELECT id, category_id, slug, name, description,
                   price, currency, available
            FROM storefront.product
            WHERE id = $1
            ",
        )
        .bind(id.as_i32())
        .fetch_optional(self.pool)
        .await?;

        row.map(TryInto::try_into).transpose()
    }
}
