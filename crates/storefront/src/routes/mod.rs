//! HTTP route handlers for the storefront API.
//!
//! # Route Structure
//!
//! ```text
//! GET    /health                    - Health check
//!
//! # Catalog (public)
//! GET    /api/products              - Product listing (?category=slug)
//! GET    /api/products/{slug}       - Product detail
//! GET    /api/categories            - Category listing
//!
//! # Auth
//! POST   /api/auth/signup           - Create a customer profile
//! POST   /api/auth/login            - Establish a session
//! POST   /api/auth/logout           - Invalidate the session
//! POST   /api/auth/invites/accept   - Accept an invite token
//!
//! # Cart (requires auth)
//! GET    /api/cart                  - Cart with product details and subtotal
//! POST   /api/cart/add              - Add to cart (quantities accumulate)
//! POST   /api/cart/update           - Set quantity outright (0 removes)
//! POST   /api/cart/remove           - Remove a product
//! POST   /api/cart/clear            - Empty the cart
//!
//! # Wishlist (requires auth)
//! GET    /api/wishlist              - Wishlist with product details
//! POST   /api/wishlist/add          - Add a product (duplicate is benign)
//! POST   /api/wishlist/remove       - Remove by product id
//! DELETE /api/wishlist/{id}         - Remove by wishlist row id
//!
//! # Checkout (requires auth)
//! POST   /api/checkout              - Charge the cart total
//!
//! # Admin (requires super admin)
//! GET    /api/admin/invites         - List all invites
//! POST   /api/admin/invites         - Create an invite
//! GET    /api/admin/roles           - Roles the caller may invite
//! ```

pub mod admin;
pub mod auth;
pub mod cart;
pub mod checkout;
pub mod products;
pub mod wishlist;

use axum::{
    Router,
    routing::{delete, get, post},
};

use crate::state::AppState;

/// Create the catalog routes router.
pub fn catalog_routes() -> Router<AppState> {
    Router::new()
        .route("/products", get(products::index))
        .route("/products/{slug}", get(products::show))
        .route("/categories", get(products::categories))
}

/// Create the auth routes router.
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/signup", post(auth::signup))
        .route("/login", post(auth::login))
        .route("/logout", post(auth::logout))
        .route("/invites/accept", post(auth::accept_invite))
}

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(cart::show))
        .route("/add", post(cart::add))
        .route("/update", post(cart::update))
        .route("/remove", post(cart::remove))
        .route("/clear", post(cart::clear))
}

/// Create the wishlist routes router.
pub fn wishlist_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(wishlist::show))
        .route("/add", post(wishlist::add))
        .route("/remove", post(wishlist::remove_product))
        .route("/{id}", delete(wishlist::remove))
}

/// Create the admin routes router.
///
/// Every handler in here takes `RequireSuperAdmin`; there is no unguarded
/// path into this subtree.
pub fn admin_routes() -> Router<AppState> {
    Router::new()
        .route("/invites", get(admin::list_invites).post(admin::create_invite))
        .route("/roles", get(admin::available_roles))
}

/// Create all routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        .nest("/api", catalog_routes())
        .nest("/api/auth", auth_routes())
        .nest("/api/cart", cart_routes())
        .nest("/api/wishlist", wishlist_routes())
        .route("/api/checkout", post(checkout::checkout))
        .nest("/api/admin", admin_routes())
}
