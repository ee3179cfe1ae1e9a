//! Core types for Copperleaf.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod email;
pub mod id;
pub mod price;
pub mod role;
pub mod severity;

pub use email::{Email, EmailError};
pub use id::*;
pub use price::{CurrencyCode, Price};
pub use role::{Role, RoleParseError};
pub use severity::{AlertSeverity, IssueSeverity};
