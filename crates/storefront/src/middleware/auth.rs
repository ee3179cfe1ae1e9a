//! Authentication middleware and extractors.
//!
//! Provides extractors for requiring authentication in route handlers, plus
//! the super-admin gate for the restricted admin surface.

use axum::{
    extract::FromRequestParts,
    http::{StatusCode, request::Parts},
    response::{IntoResponse, Redirect, Response},
};
use tower_sessions::Session;

use copperleaf_core::Role;

use crate::db::{ProfileRepository, RepositoryError};
use crate::models::{CurrentUser, session_keys};
use crate::state::AppState;

/// Extractor that requires an authenticated user.
///
/// If there is no session user, returns a redirect to the login page for
/// HTML requests, or 401 Unauthorized for API requests.
///
/// # Example
///
/// ```rust,ignore
/// async fn protected_handler(
///     RequireAuth(user): RequireAuth,
/// ) -> impl IntoResponse {
///     format!("Hello, {}!", user.email)
/// }
/// ```
pub struct RequireAuth(pub CurrentUser);

/// Error returned when authentication is required but absent.
pub enum AuthRejection {
    /// Redirect to login page (for HTML requests).
    RedirectToLogin,
    /// Unauthorized response (for API requests).
    Unauthorized,
}

impl IntoResponse for AuthRejection {
    fn into_response(self) -> Response {
        match self {
            Self::RedirectToLogin => Redirect::to("/auth/login").into_response(),
            Self::Unauthorized => StatusCode::UNAUTHORIZED.into_response(),
        }
    }
}

impl<S> FromRequestParts<S> for RequireAuth
where
    S: Send + Sync,
{
    type Rejection = AuthRejection;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        // Get the session from extensions (set by SessionManagerLayer)
        let session = parts
            .extensions
            .get::<Session>()
            .ok_or(AuthRejection::Unauthorized)?;

        // Get the current user from the session
        let user: CurrentUser = session
            .get(session_keys::CURRENT_USER)
            .await
            .ok()
            .flatten()
            .ok_or_else(|| {
                // Check if this is an API request
                let is_api = parts.uri.path().starts_with("/api/");
                if is_api {
                    AuthRejection::Unauthorized
                } else {
                    AuthRejection::RedirectToLogin
                }
            })?;

        Ok(Self(user))
    }
}

/// Extractor that optionally gets the current user.
///
/// Unlike `RequireAuth`, this does not reject the request if nobody is
/// logged in.
pub struct OptionalAuth(pub Option<CurrentUser>);

impl<S> FromRequestParts<S> for OptionalAuth
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let user = match parts.extensions.get::<Session>() {
            Some(session) => session
                .get::<CurrentUser>(session_keys::CURRENT_USER)
                .await
                .ok()
                .flatten(),
            None => None,
        };

        Ok(Self(user))
    }
}

/// Extractor that requires super-admin access.
///
/// Super-admin status requires BOTH of:
/// - the session email exactly matching the configured `SUPER_ADMIN_EMAIL`
///   (case-insensitive), and
/// - the profile's role in the database being `admin`.
///
/// Missing either is an ordinary denial. A failed role lookup also denies:
/// the gate fails closed. The decision is made fresh on every request from
/// the current session; no grant survives an identity change.
pub struct RequireSuperAdmin(pub CurrentUser);

/// Error returned when super-admin access is required.
pub enum SuperAdminRejection {
    /// Redirect to login page (for HTML requests).
    RedirectToLogin,
    /// Unauthorized response (for API requests).
    Unauthorized,
    /// Forbidden - authenticated but not the super admin.
    Forbidden,
}

impl IntoResponse for SuperAdminRejection {
    fn into_response(self) -> Response {
        match self {
            Self::RedirectToLogin => Redirect::to("/auth/login").into_response(),
            Self::Unauthorized => StatusCode::UNAUTHORIZED.into_response(),
            Self::Forbidden => (
                StatusCode::FORBIDDEN,
                "Only the super admin can access this resource",
            )
                .into_response(),
        }
    }
}

impl FromRequestParts<AppState> for RequireSuperAdmin {
    type Rejection = SuperAdminRejection;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        // Get the session from extensions
        let session = parts
            .extensions
            .get::<Session>()
            .ok_or(SuperAdminRejection::Unauthorized)?;

        // Get the current user from the session
        let user: CurrentUser = session
            .get(session_keys::CURRENT_USER)
            .await
            .ok()
            .flatten()
            .ok_or_else(|| {
                let is_api = parts.uri.path().starts_with("/api/");
                if is_api {
                    SuperAdminRejection::Unauthorized
                } else {
                    SuperAdminRejection::RedirectToLogin
                }
            })?;

        // Re-read the role from the database on every request
        let role_lookup = ProfileRepository::new(state.pool()).get_role(user.id).await;

        if let Err(ref e) = role_lookup {
            tracing::warn!(user_id = %user.id, error = %e, "super-admin role lookup failed; denying");
        }

        if !evaluate_super_admin(
            &state.config().super_admin_email,
            user.email.as_str(),
            role_lookup,
        ) {
            return Err(SuperAdminRejection::Forbidden);
        }

        Ok(Self(user))
    }
}

/// The super-admin decision, separated from request plumbing.
///
/// Grants only when the email matches exactly (ignoring case) AND the role
/// lookup succeeded with `admin`. A lookup error or an absent profile denies.
#[must_use]
pub fn evaluate_super_admin(
    super_admin_email: &str,
    session_email: &str,
    role_lookup: Result<Option<Role>, RepositoryError>,
) -> bool {
    if !session_email.eq_ignore_ascii_case(super_admin_email) {
        return false;
    }

    matches!(role_lookup, Ok(Some(Role::Admin)))
}

/// Helper to set the current user in the session.
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn set_current_user(
    session: &Session,
    user: &CurrentUser,
) -> Result<(), tower_sessions::session::Error> {
    session.insert(session_keys::CURRENT_USER, user).await
}

/// Helper to clear the current user from the session (logout).
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn clear_current_user(session: &Session) -> Result<(), tower_sessions::session::Error> {
    session
        .remove::<CurrentUser>(session_keys::CURRENT_USER)
        .await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const OWNER: &str = "owner@copperleaf.shop";

    #[test]
    fn test_grants_on_email_and_admin_role() {
        assert!(evaluate_super_admin(OWNER, OWNER, Ok(Some(Role::Admin))));
    }

    #[test]
    fn test_email_match_is_case_insensitive() {
        assert!(evaluate_super_admin(
            OWNER,
            "Owner@Copperleaf.Shop",
            Ok(Some(Role::Admin))
        ));
    }

    #[test]
    fn test_wrong_email_never_grants_regardless_of_role() {
        assert!(!evaluate_super_admin(
            OWNER,
            "other@copperleaf.shop",
            Ok(Some(Role::Admin))
        ));
    }

    #[test]
    fn test_right_email_wrong_role_denies() {
        assert!(!evaluate_super_admin(OWNER, OWNER, Ok(Some(Role::Manager))));
        assert!(!evaluate_super_admin(OWNER, OWNER, Ok(Some(Role::Customer))));
    }

    #[test]
    fn test_missing_profile_denies() {
        assert!(!evaluate_super_admin(OWNER, OWNER, Ok(None)));
    }

    #[test]
    fn test_lookup_failure_fails_closed() {
        assert!(!evaluate_super_admin(
            OWNER,
            OWNER,
            Err(RepositoryError::NotFound)
        ));
        assert!(!evaluate_super_admin(
            OWNER,
            OWNER,
            Err(RepositoryError::DataCorruption("bad role".to_owned()))
        ));
    }
}
