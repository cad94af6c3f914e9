use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::probe::Reachability;
use crate::utils::log_info;

/// Which generation backend family a session uses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// Remote (cloud) generator
    Online,
    /// Local model
    Offline,
}

impl Mode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Online => "online",
            Self::Offline => "offline",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What the user asked for on the command line or in config
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ModePreference {
    /// Probe the network and decide
    #[default]
    Auto,
    /// Use the remote backend without probing
    Online,
    /// Use the local backend without probing
    Offline,
}

/// Turns a reachability signal plus an override into a [`Mode`].
///
/// The decision is a single snapshot; nothing re-arbitrates mid-session.
pub struct ModeArbiter<'a> {
    reachability: &'a dyn Reachability,
}

impl<'a> ModeArbiter<'a> {
    pub fn new(reachability: &'a dyn Reachability) -> Self {
        Self { reachability }
    }

    /// `force_offline` always wins and skips the probe
    pub async fn decide_mode(&self, force_offline: bool) -> Mode {
        if force_offline {
            log_info("[MODE]", "Forced offline mode");
            return Mode::Offline;
        }

        if self.reachability.is_reachable().await {
            log_info("[MODE]", "Online mode selected");
            Mode::Online
        } else {
            log_info("[MODE]", "Offline mode (no internet)");
            Mode::Offline
        }
    }

    /// Resolve a user preference. An explicit `Online` is trusted as-is.
    pub async fn decide(&self, preference: ModePreference) -> Mode {
        match preference {
            ModePreference::Auto => self.decide_mode(false).await,
            ModePreference::Offline => self.decide_mode(true).await,
            ModePreference::Online => {
                log_info("[MODE]", "Forced online mode");
                Mode::Online
            }
        }
    }
}
