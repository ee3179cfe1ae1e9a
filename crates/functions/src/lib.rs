//! Copperleaf functions library.
//!
//! This crate provides the edge-function handlers as a library, allowing
//! them to be tested and reused.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod db;
pub mod error;
pub mod routes;
pub mod state;
