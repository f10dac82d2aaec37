//! # Taskhive Core
//!
//! Shared models and authentication primitives for the Taskhive
//! task-management service. The HTTP layer and background workers build on
//! this crate; it owns the user-account entity end to end: validation,
//! credential hashing, token issuance, login verification, public projection,
//! and cascading deletion of owned tasks.
//!
//! ## Module Organization
//!
//! - `models`: Database models (users, tasks)
//! - `auth`: Password hashing and bearer tokens
//! - `db`: Connection pool and migrations
//! - `config`: Environment-based configuration
//! - `error`: Common error types

pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod models;

/// Current version of the Taskhive core library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
