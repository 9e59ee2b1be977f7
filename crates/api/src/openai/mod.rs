//! Chat-completion client used to fetch energy-saving tips.
//!
//! One request shape, one answer: the first choice's message content. Every
//! failure maps to an [`OpenAiError`] whose [`OpenAiError::fallback_message`]
//! is what the user sees instead of a tip.

pub mod client;
pub mod error;
pub mod types;

pub use client::TipClient;
pub use error::OpenAiError;
