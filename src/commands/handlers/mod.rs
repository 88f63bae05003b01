//! Per-command handler implementations
//!
//! - **Version**: 3.0.0
//! - **Since**: 3.38.0
//!
//! ## Changelog
//! - 3.0.0: Debate handlers (SetupHandler, AnalyzeHandler, StatusHandler)
//! - 1.0.0: Initial extraction from monolithic command_handler.rs

pub mod analyze;
pub mod setup;
pub mod status;

use std::sync::Arc;

use super::handler::SlashCommandHandler;

/// Create all registered command handlers
pub fn create_all_handlers() -> Vec<Arc<dyn SlashCommandHandler>> {
    vec![
        Arc::new(setup::SetupHandler),
        Arc::new(analyze::AnalyzeHandler),
        Arc::new(status::StatusHandler),
    ]
}
