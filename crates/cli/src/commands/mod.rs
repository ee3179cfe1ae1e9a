//! CLI command implementations.

pub mod admin;
pub mod invites;
pub mod migrate;
pub mod seed;
