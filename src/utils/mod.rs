//! Utility functions shared across layers.
//!
//! - [`code_generator`] - Deterministic short id generation
pub mod code_generator;
