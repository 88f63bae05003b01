//! # Personas Feature
//!
//! The two fixed debate roles. Each persona owns its own Backboard thread,
//! assistant id, and Discord posting identity.
//!
//! - **Version**: 2.0.0
//! - **Since**: 1.0.0
//! - **Toggleable**: false
//!
//! ## Changelog
//! - 2.0.0: Reduced to the optimist/pessimist pair
//! - 1.0.0: Initial release

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Persona {
    Optimist,
    Pessimist,
}

impl Persona {
    pub const ALL: [Persona; 2] = [Persona::Optimist, Persona::Pessimist];

    /// Speaker for a zero-based turn index; the optimist always opens
    pub fn for_turn(turn: usize) -> Self {
        if turn % 2 == 0 {
            Persona::Optimist
        } else {
            Persona::Pessimist
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Persona::Optimist => "Optimist",
            Persona::Pessimist => "Pessimist",
        }
    }

    /// Line prefix every debate line from this persona must start with
    pub fn prefix(self) -> &'static str {
        match self {
            Persona::Optimist => "Optimist:",
            Persona::Pessimist => "Pessimist:",
        }
    }

    pub fn opponent(self) -> Self {
        match self {
            Persona::Optimist => Persona::Pessimist,
            Persona::Pessimist => Persona::Optimist,
        }
    }
}

impl fmt::Display for Persona {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
