//! Seed reference data: role hierarchy and a demo catalog.
//!
//! Idempotent: every insert is `ON CONFLICT DO NOTHING`, so re-running the
//! seeder after new migrations is safe. The role hierarchy is the source of
//! truth for who may invite whom; the catalog rows are development fixtures.

use sqlx::PgPool;

use super::migrate::{MigrationError, connect};

/// One role hierarchy row to seed.
struct RoleSeed {
    role: &'static str,
    can_manage_roles: &'static [&'static str],
    permissions: &'static [&'static str],
}

/// The hierarchy: admins may invite everything below them, managers may
/// invite staff, and staff/customers may invite nobody.
const ROLE_HIERARCHY: &[RoleSeed] = &[
    RoleSeed {
        role: "admin",
        can_manage_roles: &["admin", "manager", "staff"],
        permissions: &["manage_catalog", "manage_orders", "manage_users", "view_reports"],
    },
    RoleSeed {
        role: "manager",
        can_manage_roles: &["staff"],
        permissions: &["manage_catalog", "manage_orders", "view_reports"],
    },
    RoleSeed {
        role: "staff",
        can_manage_roles: &[],
        permissions: &["manage_orders"],
    },
    RoleSeed {
        role: "customer",
        can_manage_roles: &[],
        permissions: &[],
    },
];

/// A demo catalog entry: (category slug, category name, products).
const DEMO_CATALOG: &[(&str, &str, &[(&str, &str, &str, &str)])] = &[
    (
        "teas",
        "Teas",
        &[
            ("copper-oolong", "Copper Oolong", "A roasted oolong with caramel notes.", "14.50"),
            ("first-flush-green", "First Flush Green", "Bright spring-picked green tea.", "11.00"),
        ],
    ),
    (
        "teaware",
        "Teaware",
        &[
            ("leaf-strainer", "Leaf Strainer", "Fine-mesh strainer for loose leaf.", "8.25"),
            ("clay-pot-200ml", "Clay Pot 200ml", "Small unglazed clay brewing pot.", "42.00"),
        ],
    ),
];

/// Seed the storefront database.
///
/// # Errors
///
/// Returns `MigrationError` if the connection or any insert fails.
pub async fn run() -> Result<(), MigrationError> {
    let pool = connect("STOREFRONT_DATABASE_URL").await?;

    seed_role_hierarchy(&pool).await?;
    seed_catalog(&pool).await?;

    tracing::info!("Seeding complete!");
    Ok(())
}

async fn seed_role_hierarchy(pool: &PgPool) -> Result<(), MigrationError> {
    tracing::info!("Seeding role hierarchy ({} roles)...", ROLE_HIERARCHY.len());

    for seed in ROLE_HIERARCHY {
        sqlx::query(
            r"
            INSERT INTO storefront.role_hierarchy (role, can_manage_roles, permissions)
            VALUES ($1, $2, $3)
            ON CONFLICT (role) DO NOTHING
            ",
        )
        .bind(seed.role)
        .bind(seed.can_manage_roles)
        .bind(seed.permissions)
        .execute(pool)
        .await?;
    }

    Ok(())
}

async fn seed_catalog(pool: &PgPool) -> Result<(), MigrationError> {
    tracing::info!("Seeding demo catalog...");

    for (category_slug, category_name, products) in DEMO_CATALOG {
        let category_id: i32 = sqlx::query_scalar(
            r"
            INSERT INTO storefront.category (slug, name)
            VALUES ($1, $2)
            ON CONFLICT (slug) DO UPDATE SET name = EXCLUDED.name
            RETURNING id
            ",
        )
        .bind(category_slug)
        .bind(category_name)
        .fetch_one(pool)
        .await?;

        for (slug, name, description, price) in *products {
            sqlx::query(
                r"
                INSERT INTO storefront.product
                    (category_id, slug, name, description, price, currency)
                VALUES ($1, $2, $3, $4, $5::numeric, 'USD')
                ON CONFLICT (slug) DO NOTHING
                ",
            )
            .bind(category_id)
            .bind(slug)
            .bind(name)
            .bind(description)
            .bind(price)
            .execute(pool)
            .await?;
        }
    }

    Ok(())
}
