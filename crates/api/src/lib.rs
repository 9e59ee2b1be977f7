//! Ecosave API library.
//!
//! Household energy tracking: users, their addresses, rooms, devices,
//! consumption readings and loyalty points, plus a spend evaluation that
//! compares a user's total cost with the national average and asks a
//! chat-completion service for a saving tip when it is above.
//!
//! The binary in `main.rs` wires configuration, tracing and Sentry around
//! [`routes::app`]; everything else lives here so it can be tested.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod openai;
pub mod routes;
pub mod services;
pub mod state;
