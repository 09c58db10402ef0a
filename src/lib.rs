//! # uamt
//!
//! Session core and REST client for the Utility Asset Maintenance Tracker.
//!
//! The crate owns who is logged in (`session`), how outgoing requests are
//! authorized and how a `401` forces a logout (`api` + `session::interceptor`),
//! and where each role is allowed to navigate (`routes`). The `uamt` binary
//! is a terminal front-end built on top of it.

pub mod api;
pub mod config;
pub mod nav;
pub mod reports;
pub mod routes;
pub mod session;

#[cfg(test)]
pub mod test_helpers;
