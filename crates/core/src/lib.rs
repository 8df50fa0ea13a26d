//! Ventanilla Core
//!
//! Domain logic for the citizen-service practice assistant: behavior profile
//! selection, conversation assembly, the staged turn pipeline and the seams to
//! the remote AI provider.

pub mod assembler;
pub mod conversation;
pub mod llm_client;
pub mod profile;
pub mod session;
pub mod speech;
pub mod turn;
