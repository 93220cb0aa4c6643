//! Episode configuration.
//!
//! Builder-style configuration for the turn engine plus the role tags that
//! instances use to say which kind of side plays each seat.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::error::LudoError;

/// Attempts per turn when reprompting is enabled.
pub const DEFAULT_ATTEMPT_LIMIT: u32 = 3;

/// Task prompt used when none is configured.
///
/// The first line is the system message; the rest is the task description.
pub const DEFAULT_PROMPT: &str = "You are playing a race board game.\n\
\n\
Move your tokens from home to the last field. A 6 puts a token from home \
on field 1; otherwise a token in play moves forward by the roll. Move one \
token per turn, and answer with a line 'MY MOVE: X -> N ; Y -> N'.";

/// What kind of participant plays a seat.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SideRole {
    /// Model-backed side.
    Model,
    /// Human at a terminal.
    Human,
    /// Search-backed programmatic adversary.
    Programmatic,
}

impl std::fmt::Display for SideRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            SideRole::Model => "model",
            SideRole::Human => "human",
            SideRole::Programmatic => "programmatic",
        };
        f.write_str(name)
    }
}

impl FromStr for SideRole {
    type Err = LudoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "model" | "llm" => Ok(SideRole::Model),
            "human" => Ok(SideRole::Human),
            "programmatic" | "program" => Ok(SideRole::Programmatic),
            other => Err(LudoError::UnknownRole {
                role: other.to_string(),
            }),
        }
    }
}

/// Turn engine configuration.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct EpisodeConfig {
    /// Re-ask the same turn after a parse or rule failure.
    pub reprompting: bool,

    /// Attempts per turn when reprompting is enabled.
    pub attempt_limit: u32,

    /// Task prompt seeded into each side's conversation.
    pub initial_prompt: String,
}

impl Default for EpisodeConfig {
    fn default() -> Self {
        Self {
            reprompting: true,
            attempt_limit: DEFAULT_ATTEMPT_LIMIT,
            initial_prompt: DEFAULT_PROMPT.to_string(),
        }
    }
}

impl EpisodeConfig {
    /// Create a config with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable or disable reprompting.
    pub fn with_reprompting(mut self, enabled: bool) -> Self {
        self.reprompting = enabled;
        self
    }

    /// Set the per-turn attempt limit used while reprompting.
    pub fn with_attempt_limit(mut self, limit: u32) -> Self {
        self.attempt_limit = limit.max(1);
        self
    }

    /// Set the task prompt.
    pub fn with_initial_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.initial_prompt = prompt.into();
        self
    }

    /// Attempts a side gets per turn: 1 when reprompting is off.
    #[must_use]
    pub fn effective_attempt_limit(&self) -> u32 {
        if self.reprompting {
            self.attempt_limit.max(1)
        } else {
            1
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = EpisodeConfig::default();
        assert!(config.reprompting);
        assert_eq!(config.effective_attempt_limit(), 3);
        assert!(config.initial_prompt.contains("MY MOVE"));
    }

    #[test]
    fn test_reprompting_disabled_means_single_attempt() {
        let config = EpisodeConfig::new()
            .with_attempt_limit(5)
            .with_reprompting(false);
        assert_eq!(config.effective_attempt_limit(), 1);
    }

    #[test]
    fn test_attempt_limit_floor() {
        let config = EpisodeConfig::new().with_attempt_limit(0);
        assert_eq!(config.effective_attempt_limit(), 1);
    }

    #[test]
    fn test_role_serialization() {
        let json = serde_json::to_string(&SideRole::Programmatic).unwrap();
        assert_eq!(json, "\"programmatic\"");
        let role: SideRole = serde_json::from_str("\"model\"").unwrap();
        assert_eq!(role, SideRole::Model);
    }

    #[test]
    fn test_role_from_str() {
        assert_eq!("LLM".parse::<SideRole>().unwrap(), SideRole::Model);
        assert_eq!(" human ".parse::<SideRole>().unwrap(), SideRole::Human);
        assert!(matches!(
            "robot".parse::<SideRole>(),
            Err(LudoError::UnknownRole { .. })
        ));
    }

    #[test]
    fn test_config_serialization() {
        let config = EpisodeConfig::new().with_reprompting(false);
        let json = serde_json::to_string(&config).unwrap();
        let deserialized: EpisodeConfig = serde_json::from_str(&json).unwrap();
        assert!(!deserialized.reprompting);
    }
}
