//! # Feature: Session Registry
//!
//! Maps a Discord user to the two Backboard threads and assistant ids their
//! debates run on, and a guild to its player/channel topology. Thread handles
//! are created once, together, at session creation and are never overwritten.
//!
//! - **Version**: 1.1.0
//! - **Since**: 1.0.0
//! - **Toggleable**: false
//!
//! ## Changelog
//! - 1.1.0: Guild topologies for two-player mode
//! - 1.0.0: Per-user thread sessions

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use log::{info, warn};

use crate::core::SetupError;
use crate::features::backboard::{ThreadId, ThreadProvider};
use crate::features::personas::Persona;

/// Both persona threads for one user; never partially populated
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserSession {
    pub user_id: String,
    pub optimist_thread: ThreadId,
    pub pessimist_thread: ThreadId,
    pub optimist_assistant_id: String,
    pub pessimist_assistant_id: String,
}

impl UserSession {
    pub fn thread(&self, persona: Persona) -> &ThreadId {
        match persona {
            Persona::Optimist => &self.optimist_thread,
            Persona::Pessimist => &self.pessimist_thread,
        }
    }
}

/// Result of a session setup request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionSetup {
    Created(UserSession),
    /// A session already existed and was left untouched
    AlreadyConfigured(UserSession),
}

impl SessionSetup {
    pub fn session(&self) -> &UserSession {
        match self {
            SessionSetup::Created(s) | SessionSetup::AlreadyConfigured(s) => s,
        }
    }

    pub fn was_created(&self) -> bool {
        matches!(self, SessionSetup::Created(_))
    }
}

/// Two-player guild configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupTopology {
    player1_id: String,
    player2_id: String,
    general_channel_id: String,
    player1_room_id: String,
    player2_room_id: String,
}

impl GroupTopology {
    /// Validate and build a topology; every identifier must be non-empty
    pub fn new(
        player1_id: impl Into<String>,
        player2_id: impl Into<String>,
        general_channel_id: impl Into<String>,
        player1_room_id: impl Into<String>,
        player2_room_id: impl Into<String>,
    ) -> Result<Self, SetupError> {
        let topology = GroupTopology {
            player1_id: player1_id.into(),
            player2_id: player2_id.into(),
            general_channel_id: general_channel_id.into(),
            player1_room_id: player1_room_id.into(),
            player2_room_id: player2_room_id.into(),
        };

        let fields = [
            ("player1_id", &topology.player1_id),
            ("player2_id", &topology.player2_id),
            ("general_channel_id", &topology.general_channel_id),
            ("player1_room_id", &topology.player1_room_id),
            ("player2_room_id", &topology.player2_room_id),
        ];
        for (name, value) in fields {
            if value.trim().is_empty() {
                return Err(SetupError::InvalidTopology(name));
            }
        }
        Ok(topology)
    }

    pub fn player1_id(&self) -> &str {
        &self.player1_id
    }

    pub fn player2_id(&self) -> &str {
        &self.player2_id
    }

    pub fn general_channel_id(&self) -> &str {
        &self.general_channel_id
    }

    pub fn player1_room_id(&self) -> &str {
        &self.player1_room_id
    }

    pub fn player2_room_id(&self) -> &str {
        &self.player2_room_id
    }

    /// (player_id, room_id) pairs in player order
    pub fn players(&self) -> [(&str, &str); 2] {
        [
            (self.player1_id.as_str(), self.player1_room_id.as_str()),
            (self.player2_id.as_str(), self.player2_room_id.as_str()),
        ]
    }
}

#[derive(Debug, Default)]
pub struct SessionRegistry {
    users: DashMap<String, UserSession>,
    topologies: DashMap<String, GroupTopology>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_session(&self, user_id: &str) -> Option<UserSession> {
        self.users.get(user_id).map(|s| s.clone())
    }

    /// Create both persona threads for `user_id`, or return the existing session
    ///
    /// Thread creation failures propagate; nothing is stored unless both
    /// threads were created.
    pub async fn create_session(
        &self,
        provider: &dyn ThreadProvider,
        user_id: &str,
        optimist_assistant_id: &str,
        pessimist_assistant_id: &str,
    ) -> Result<SessionSetup, SetupError> {
        if let Some(existing) = self.get_session(user_id) {
            return Ok(SessionSetup::AlreadyConfigured(existing));
        }

        let optimist_thread = provider.create_thread(optimist_assistant_id).await?;
        let pessimist_thread = provider.create_thread(pessimist_assistant_id).await?;

        let session = UserSession {
            user_id: user_id.to_string(),
            optimist_thread,
            pessimist_thread,
            optimist_assistant_id: optimist_assistant_id.to_string(),
            pessimist_assistant_id: pessimist_assistant_id.to_string(),
        };

        match self.users.entry(user_id.to_string()) {
            Entry::Occupied(existing) => {
                warn!(
                    "Session for user {user_id} was created concurrently; discarding threads {} and {}",
                    session.optimist_thread, session.pessimist_thread
                );
                Ok(SessionSetup::AlreadyConfigured(existing.get().clone()))
            }
            Entry::Vacant(slot) => {
                info!(
                    "Created debate session for user {user_id} (optimist {}, pessimist {})",
                    session.optimist_thread, session.pessimist_thread
                );
                slot.insert(session.clone());
                Ok(SessionSetup::Created(session))
            }
        }
    }

    pub fn get_topology(&self, scope: &str) -> Option<GroupTopology> {
        self.topologies.get(scope).map(|t| t.clone())
    }

    /// Store a guild topology, replacing any previous one
    pub fn set_topology(&self, scope: &str, topology: GroupTopology) {
        self.topologies.insert(scope.to_string(), topology);
    }

    pub fn session_count(&self) -> usize {
        self.users.len()
    }
}
