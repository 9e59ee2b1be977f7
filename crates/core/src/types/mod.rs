//! Core types for Ecosave.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod id;
pub mod spend;

pub use id::*;
pub use spend::{NATIONAL_AVERAGE_SPEND, SpendLevel};
