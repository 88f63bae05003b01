//! # Features
//!
//! One directory per feature; the analysis coordinator ties them together.
//!
//! - **Version**: 2.0.0
//! - **Since**: 1.0.0
//! - **Toggleable**: false
//!
//! ## Changelog
//! - 2.0.0: Debate feature set (buffer, sessions, cooldown, backboard, prompts, debate, delivery, analysis)
//! - 1.0.0: Initial feature layout

pub mod analysis;
pub mod backboard;
pub mod buffer;
pub mod cooldown;
pub mod debate;
pub mod delivery;
pub mod personas;
pub mod prompts;
pub mod sessions;

pub use analysis::{AnalyzeOutcome, CoordinatorStatus, DebateCoordinator, GroupSetup, PlayerReport};
pub use backboard::{BackboardClient, ThreadId, ThreadProvider};
pub use buffer::{BufferedMessage, MessageBuffer};
pub use cooldown::{Admission, CooldownGate, RunPermit};
pub use debate::{DebateEngine, DebateLine, DebateResult, DebateSink, EngineSettings};
pub use delivery::{ChannelSink, DeliveryAdapter, MessagePoster};
pub use personas::Persona;
pub use prompts::{DebateRules, PromptSet, PromptStyle};
pub use sessions::{GroupTopology, SessionRegistry, SessionSetup, UserSession};
