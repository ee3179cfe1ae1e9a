//! Business logic services.

pub mod auth;
pub mod invitations;
pub mod payments;
