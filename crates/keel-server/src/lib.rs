//! Keel server library - CLI commands, HTTP routes and application state.
//!
//! Separated from main.rs so the router and commands can be exercised from
//! integration tests.

pub mod commands;
pub mod config;
pub mod logging;
pub mod routes;
pub mod state;
