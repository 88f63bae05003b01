//! # Feature: Analysis Coordinator
//!
//! The one process-wide owner of debate state: cooldown gate, session
//! registry, message buffer, thread provider and engine. Built once at
//! startup and shared by `Arc` with both Discord connections.
//!
//! - **Version**: 1.3.0
//! - **Since**: 1.0.0
//! - **Toggleable**: false
//!
//! ## Changelog
//! - 1.3.0: Single-user analysis reads the user's messages from every guild channel
//! - 1.2.0: Status snapshot for /debate_status
//! - 1.1.0: Two-player group analysis over a shared general channel
//! - 1.0.0: Single-user analysis

use log::{error, info, warn};
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::core::{Config, SetupError};
use crate::features::backboard::ThreadProvider;
use crate::features::buffer::{BufferedMessage, MessageBuffer};
use crate::features::cooldown::{Admission, CooldownGate};
use crate::features::debate::{DebateEngine, DebateResult, DebateSubject, EngineSettings};
use crate::features::delivery::{ChannelSink, MessagePoster};
use crate::features::personas::Persona;
use crate::features::prompts::PromptSet;
use crate::features::sessions::{GroupTopology, SessionRegistry, SessionSetup, UserSession};

/// One finished debate, and where it was posted
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayerReport {
    pub user_id: String,
    pub username: String,
    pub channel_id: String,
    pub result: DebateResult,
}

/// Every way an analyze request can end
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnalyzeOutcome {
    Completed(Vec<PlayerReport>),
    Busy,
    OnCooldown(Duration),
    /// Group analysis requested before `/setup`
    NotConfigured,
    /// The named user has no session
    NoSessionFound(String),
    NoMessagesFound,
    TimedOut(Duration),
}

/// Both player sessions created (or found) by a group setup
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupSetup {
    pub topology: GroupTopology,
    pub players: [SessionSetup; 2],
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoordinatorStatus {
    pub running: bool,
    pub cooldown_remaining: Duration,
    pub group_configured: bool,
    pub user_configured: bool,
    pub buffered_messages: usize,
}

pub struct DebateCoordinator {
    gate: CooldownGate,
    registry: SessionRegistry,
    buffer: MessageBuffer,
    provider: Arc<dyn ThreadProvider>,
    poster: Arc<dyn MessagePoster>,
    engine: DebateEngine,
}

impl DebateCoordinator {
    pub fn new(
        provider: Arc<dyn ThreadProvider>,
        poster: Arc<dyn MessagePoster>,
        prompts: PromptSet,
        settings: EngineSettings,
        cooldown: Duration,
    ) -> Self {
        Self {
            gate: CooldownGate::new(cooldown),
            registry: SessionRegistry::new(),
            buffer: MessageBuffer::default(),
            engine: DebateEngine::new(Arc::clone(&provider), prompts, settings),
            provider,
            poster,
        }
    }

    pub fn from_config(
        config: &Config,
        provider: Arc<dyn ThreadProvider>,
        poster: Arc<dyn MessagePoster>,
    ) -> Self {
        Self::new(
            provider,
            poster,
            PromptSet::new(config.prompt_style, config.debate_rules()),
            config.engine_settings(),
            config.cooldown_window(),
        )
    }

    pub fn registry(&self) -> &SessionRegistry {
        &self.registry
    }

    pub fn settings(&self) -> &EngineSettings {
        self.engine.settings()
    }

    /// Record an inbound guild message
    pub fn observe(&self, scope: &str, channel_id: &str, message: BufferedMessage) {
        self.buffer.push(scope, channel_id, message);
    }

    pub async fn setup_user(
        &self,
        user_id: &str,
        optimist_assistant_id: &str,
        pessimist_assistant_id: &str,
    ) -> Result<SessionSetup, SetupError> {
        self.registry
            .create_session(
                self.provider.as_ref(),
                user_id,
                optimist_assistant_id,
                pessimist_assistant_id,
            )
            .await
    }

    /// Create both players' sessions, then store the topology
    ///
    /// The topology is only stored once both sessions exist.
    pub async fn setup_group(
        &self,
        scope: &str,
        topology: GroupTopology,
        optimist_assistant_id: &str,
        pessimist_assistant_id: &str,
    ) -> Result<GroupSetup, SetupError> {
        let player1 = self
            .setup_user(topology.player1_id(), optimist_assistant_id, pessimist_assistant_id)
            .await?;
        let player2 = self
            .setup_user(topology.player2_id(), optimist_assistant_id, pessimist_assistant_id)
            .await?;

        self.registry.set_topology(scope, topology.clone());
        info!(
            "Stored group topology for {scope}: players {} and {}",
            topology.player1_id(),
            topology.player2_id()
        );

        Ok(GroupSetup {
            topology,
            players: [player1, player2],
        })
    }

    /// Debate each configured player over their own messages in the general channel
    ///
    /// Runs are sequential under a single gate admission; the first global
    /// timeout ends the whole invocation.
    pub async fn analyze_group(&self, scope: &str) -> AnalyzeOutcome {
        let Some(topology) = self.registry.get_topology(scope) else {
            return AnalyzeOutcome::NotConfigured;
        };

        let mut sessions: Vec<(UserSession, &str)> = Vec::with_capacity(2);
        for (player_id, room_id) in topology.players() {
            match self.registry.get_session(player_id) {
                Some(session) => sessions.push((session, room_id)),
                None => return AnalyzeOutcome::NoSessionFound(player_id.to_string()),
            }
        }

        if self.buffer.len(scope, topology.general_channel_id()) == 0 {
            return AnalyzeOutcome::NoMessagesFound;
        }

        let _permit = match self.gate.try_admit(Instant::now()) {
            Admission::Admitted(permit) => permit,
            Admission::Busy => return AnalyzeOutcome::Busy,
            Admission::OnCooldown(remaining) => return AnalyzeOutcome::OnCooldown(remaining),
        };

        let mut reports = Vec::with_capacity(sessions.len());
        for (session, room_id) in sessions {
            let messages =
                self.buffer
                    .read_by_author(scope, topology.general_channel_id(), &session.user_id);
            let subject = subject_for(&session.user_id, messages);

            match self.run(&session, subject, room_id).await {
                Some(report) => reports.push(report),
                None => return AnalyzeOutcome::TimedOut(self.settings().analysis_timeout),
            }
        }

        AnalyzeOutcome::Completed(reports)
    }

    /// Debate one user over their messages from any channel of the guild, posting into `channel_id`
    pub async fn analyze_user(&self, scope: &str, channel_id: &str, user_id: &str) -> AnalyzeOutcome {
        let Some(session) = self.registry.get_session(user_id) else {
            return AnalyzeOutcome::NoSessionFound(user_id.to_string());
        };

        let messages = self.buffer.read_by_author_in_scope(scope, user_id);
        if messages.is_empty() {
            return AnalyzeOutcome::NoMessagesFound;
        }

        let _permit = match self.gate.try_admit(Instant::now()) {
            Admission::Admitted(permit) => permit,
            Admission::Busy => return AnalyzeOutcome::Busy,
            Admission::OnCooldown(remaining) => return AnalyzeOutcome::OnCooldown(remaining),
        };

        let subject = subject_for(user_id, messages);
        match self.run(&session, subject, channel_id).await {
            Some(report) => AnalyzeOutcome::Completed(vec![report]),
            None => AnalyzeOutcome::TimedOut(self.settings().analysis_timeout),
        }
    }

    async fn run(&self, session: &UserSession, subject: DebateSubject, channel_id: &str) -> Option<PlayerReport> {
        let sink = ChannelSink::new(self.poster.as_ref(), channel_id);
        self.poster
            .post(
                Persona::Optimist,
                channel_id,
                &format!("🎭 Starting debate analysis for {}...", subject.username),
            )
            .await;

        match self.engine.run_with_deadline(session, &subject, &sink).await {
            Ok(result) => Some(PlayerReport {
                user_id: subject.user_id,
                username: subject.username,
                channel_id: channel_id.to_string(),
                result,
            }),
            Err(e) => {
                error!("Analysis for {} abandoned: {e}", subject.username);
                None
            }
        }
    }

    pub fn status(&self, scope: &str, user_id: &str) -> CoordinatorStatus {
        let topology = self.registry.get_topology(scope);
        let buffered_messages = topology
            .as_ref()
            .map(|t| self.buffer.len(scope, t.general_channel_id()))
            .unwrap_or(0);

        CoordinatorStatus {
            running: self.gate.is_held(),
            cooldown_remaining: self.gate.remaining(Instant::now()),
            group_configured: topology.is_some(),
            user_configured: self.registry.get_session(user_id).is_some(),
            buffered_messages,
        }
    }
}

/// Display name comes from the newest buffered message, falling back to the id
fn subject_for(user_id: &str, messages: Vec<BufferedMessage>) -> DebateSubject {
    let username = messages
        .last()
        .map(|m| m.author_name.clone())
        .unwrap_or_else(|| {
            warn!("No buffered messages for user {user_id}; debating an empty history");
            user_id.to_string()
        });

    DebateSubject {
        user_id: user_id.to_string(),
        username,
        messages,
    }
}
