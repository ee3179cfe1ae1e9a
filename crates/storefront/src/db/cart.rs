//! Cart repository for database operations.
//!
//! Cart rows are unique per (user, product). Repeat adds accumulate: the
//! insert and the quantity addition happen in one statement (`ON CONFLICT
//! ... DO UPDATE`), so two sessions adding the same product concurrently
//! both land and the quantities sum. There is no read-then-write window.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;

use copperleaf_core::{CartItemId, CurrencyCode, Price, ProductId, UserId};

use super::RepositoryError;

/// A cart row (domain type).
#[derive(Debug, Clone, serde::Serialize)]
pub struct CartItem {
    pub id: CartItemId,
    pub user_id: UserId,
    pub product_id: ProductId,
    pub quantity: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A cart row joined with its product, for display and totals.
#[derive(Debug, Clone, serde::Serialize)]
pub struct CartLine {
    pub id: CartItemId,
    pub product_id: ProductId,
    pub product_slug: String,
    pub product_name: String,
    pub quantity: i32,
    pub unit_price: Price,
    pub line_total: Price,
}

/// Internal row type for database queries.
#[derive(Debug, sqlx::FromRow)]
struct CartItemRow {
    id: i32,
    user_id: i32,
    product_id: i32,
    quantity: i32,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<CartItemRow> for CartItem {
    fn from(row: CartItemRow) -> Self {
        Self {
            id: CartItemId::new(row.id),
            user_id: UserId::new(row.user_id),
            product_id: ProductId::new(row.product_id),
            quantity: row.quantity,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct CartLineRow {
    id: i32,
    product_id: i32,
    product_slug: String,
    product_name: String,
    quantity: i32,
    price: Decimal,
    currency: String,
}

impl TryFrom<CartLineRow> for CartLine {
    type Error = RepositoryError;

    fn try_from(row: CartLineRow) -> Result<Self, Self::Error> {
        let currency = row.currency.parse::<CurrencyCode>().map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid currency in database: {e}"))
        })?;
        let unit_price = Price::new(row.price, currency);
        let quantity = u32::try_from(row.quantity).map_err(|_| {
            RepositoryError::DataCorruption(format!(
                "negative cart quantity in database: {}",
                row.quantity
            ))
        })?;

        Ok(Self {
            id: CartItemId::new(row.id),
            product_id: ProductId::new(row.product_id),
            product_slug: row.product_slug,
            product_name: row.product_name,
            quantity: row.quantity,
            unit_price,
            line_total: unit_price.line_total(quantity),
        })
    }
}

/// Repository for cart database operations.
pub struct CartRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> CartRepository<'a> {
    /// Create a new cart repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Add a product to the user's cart.
    ///
    /// A single atomic upsert: inserts the row, or adds `quantity` to the
    /// existing quantity when the (user, product) row already exists.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails (including a
    /// foreign-key violation for an unknown product).
    pub async fn add(
        &self,
        user_id: UserId,
        product_id: ProductId,
        quantity: i32,
    ) -> Result<CartItem, RepositoryError> {
        let row = sqlx::query_as::<_, CartItemRow>(
            r"
            INSERT INTO storefront.cart_item (user_id, product_id, quantity)
            VALUES ($1, $2, $3)
            ON CONFLICT (user_id, product_id)
            DO UPDATE SET quantity = storefront.cart_item.quantity + EXCLUDED.quantity,
                          updated_at = NOW()
            RETURNING id, user_id, product_id, quantity, created_at, updated_at
            ",
        )
        .bind(user_id.as_i32())
        .bind(product_id.as_i32())
        .bind(quantity)
        .fetch_one(self.pool)
        .await?;

        Ok(row.into())
    }

    /// Set the quantity of a cart row outright (not additive).
    ///
    /// A quantity of zero removes the row.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the user has no row for this
    /// product. Returns `RepositoryError::Database` for other errors.
    pub async fn set_quantity(
        &self,
        user_id: UserId,
        product_id: ProductId,
        quantity: i32,
    ) -> Result<(), RepositoryError> {
        if quantity == 0 {
            if self.remove(user_id, product_id).await? {
                return Ok(());
            }
            return Err(RepositoryError::NotFound);
        }

        let result = sqlx::query(
            r"
            UPDATE storefront.cart_item
            SET quantity = $1, updated_at = NOW()
            WHERE user_id = $2 AND product_id = $3
            ",
        )
        .bind(quantity)
        .bind(user_id.as_i32())
        .bind(product_id.as_i32())
        .execute(self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }

    /// Remove a product from the user's cart.
    ///
    /// Returns `true` if a row was deleted, `false` if there was none.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn remove(
        &self,
        user_id: UserId,
        product_id: ProductId,
    ) -> Result<bool, RepositoryError> {
        let result = sqlx::query(
            r"
            DELETE FROM storefront.cart_item
            WHERE user_id = $1 AND product_id = $2
            ",
        )
        .bind(user_id.as_i32())
        .bind(product_id.as_i32())
        .execute(self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Remove every row in the user's cart (after a completed checkout).
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn clear(&self, user_id: UserId) -> Result<u64, RepositoryError> {
        let result = sqlx::query("DELETE FROM storefront.cart_item WHERE user_id = $1")
            .bind(user_id.as_i32())
            .execute(self.pool)
            .await?;

        Ok(result.rows_affected())
    }

    /// List the user's cart with product details joined.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if stored data is invalid.
    pub async fn list(&self, user_id: UserId) -> Result<Vec<CartLine>, RepositoryError> {
        let rows = sqlx::query_as::<_, CartLineRow>(
            r"
            SELECT ci.id, ci.product_id, p.slug AS product_slug, p.name AS product_name,
                   ci.quantity, p.price, p.currency
            FROM storefront.cart_item ci
            JOIN storefront.product p ON p.id = ci.product_id
            WHERE ci.user_id = $1
            ORDER BY ci.created_at ASC
            ",
        )
        .bind(user_id.as_i32())
        .fetch_all(self.pool)
        .await?;

        rows.into_iter().map(TryInto::try_into).collect()
    }
}

/// Sum line totals into a cart subtotal.
///
/// Returns `None` for an empty cart. All products share the store currency;
/// mixed currencies are a data error surfaced as `DataCorruption`.
pub fn subtotal(lines: &[CartLine]) -> Result<Option<Price>, RepositoryError> {
    let Some(first) = lines.first() else {
        return Ok(None);
    };

    let currency = first.unit_price.currency_code;
    let mut amount = Decimal::ZERO;
    for line in lines {
        if line.unit_price.currency_code != currency {
            return Err(RepositoryError::DataCorruption(
                "cart mixes currencies".to_owned(),
            ));
        }
        amount += line.line_total.amount;
    }

    Ok(Some(Price::new(amount, currency)))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn line(quantity: i32, unit: Decimal) -> CartLine {
        let unit_price = Price::new(unit, CurrencyCode::USD);
        CartLine {
            id: CartItemId::new(1),
            product_id: ProductId::new(1),
            product_slug: "p".to_owned(),
            product_name: "P".to_owned(),
            quantity,
            unit_price,
            line_total: unit_price.line_total(u32::try_from(quantity).unwrap()),
        }
    }

    #[test]
    fn test_subtotal_empty_cart() {
        assert!(subtotal(&[]).unwrap().is_none());
    }

    #[test]
    fn test_subtotal_sums_line_totals() {
        let lines = vec![line(2, Decimal::new(500, 2)), line(1, Decimal::new(1999, 2))];
        let total = subtotal(&lines).unwrap().unwrap();
        assert_eq!(total.amount, Decimal::new(2999, 2));
        assert_eq!(total.currency_code, CurrencyCode::USD);
    }

    #[test]
    fn test_subtotal_rejects_mixed_currencies() {
        let mut eur = line(1, Decimal::ONE);
        eur.unit_price = Price::new(Decimal::ONE, CurrencyCode::EUR);
        let lines = vec![line(1, Decimal::ONE), eur];
        assert!(matches!(
            subtotal(&lines),
            Err(RepositoryError::DataCorruption(_))
        ));
    }
}
