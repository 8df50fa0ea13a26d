//! Ventanilla API Library Crate
//!
//! This library contains the HTTP surface of the practice assistant: the
//! configuration, the shared application state, the handlers and the routing.
//! The `api` binary is a thin wrapper around this library.

pub mod config;
pub mod handlers;
pub mod models;
pub mod router;
pub mod state;
