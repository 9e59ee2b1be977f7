//! Ecosave Core - Shared types library.
//!
//! This crate provides common types used across all Ecosave components:
//! - `api` - The HTTP backend serving the `/ecosave` resources
//! - `cli` - Command-line tools for migrations and seeding
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no database access,
//! no HTTP clients. The `postgres` feature adds `sqlx` encoding for the ids.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs and the spend classification

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
