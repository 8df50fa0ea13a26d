//! Shared Application State
//!
//! This module defines the `AppState` struct, which holds the resources shared
//! by all handlers. It is immutable after startup.

use std::sync::Arc;
use ventanilla_core::turn::TurnOrchestrator;

/// The shared application state, created once at startup and passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    pub turns: Arc<TurnOrchestrator>,
}
