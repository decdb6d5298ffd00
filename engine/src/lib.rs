//! Session Report Library
//!
//! Turns the scattered inputs of a conference breakout session into one
//! prompt and a drafted report. It is used by both the main binary and
//! integration tests.

/// Configuration management module
pub mod config;

/// Secret management module
pub mod secrets;

/// Run-scoped staging directory
pub mod staging;

/// Source acquisition and fallback
pub mod sources;

/// Lightning talk parsing and session matching
pub mod talks;

/// Prompt assembly
pub mod prompt;

/// Completion provider abstraction layer
pub mod llm;

/// Response sentinel detection
pub mod validate;

/// Report persistence
pub mod report;

/// Telemetry and Observability
pub mod telemetry;

/// CLI interface module
pub mod cli;

/// Command handlers module
pub mod handlers;
