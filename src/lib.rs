// Core layer - shared types and configuration
pub mod core;

// Features layer - all feature modules
pub mod features;

// Application layer
pub mod command_handler;
pub mod commands;

// Re-export core config for convenience
pub use core::Config;

// Re-export feature items used by the binary
pub use features::{
    // Analysis
    AnalyzeOutcome, DebateCoordinator,
    // Backboard
    BackboardClient, ThreadProvider,
    // Debate
    DebateEngine, DebateResult, EngineSettings,
    // Delivery
    DeliveryAdapter, MessagePoster,
    // Personas
    Persona,
};
