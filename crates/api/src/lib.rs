//! Landscaper web server library.
//!
//! Exposes the building blocks (config, state, error handling, JSON routes,
//! HTML pages) so integration tests and the binary entrypoint share them.

pub mod config;
pub mod error;
pub mod handlers;
pub mod pages;
pub mod query;
pub mod response;
pub mod router;
pub mod routes;
pub mod state;
pub mod views;
