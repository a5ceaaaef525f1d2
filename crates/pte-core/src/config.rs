use std::time::Duration;

/// Runtime configuration, sourced from the environment the same way the
/// solver binaries read `DB_URL` or `TRAIN_DURATION` — a `from_env`
/// constructor with documented defaults, never a required var.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Config {
    pub action_timeout: Duration,
    pub game_start_countdown: Duration,
    pub min_players_to_start: usize,
    pub max_players_per_table: usize,
    pub street_deal_delay: Duration,
    pub new_hand_delay: Duration,
    pub log_level: LogLevel,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            action_timeout: Duration::from_secs(15),
            game_start_countdown: Duration::from_secs(10),
            min_players_to_start: 2,
            max_players_per_table: crate::MAX_SEATS,
            street_deal_delay: Duration::from_secs(3),
            new_hand_delay: Duration::from_secs(5),
            log_level: LogLevel::Info,
        }
    }
}

impl Config {
    /// Reads overrides from the environment, falling back to [`Config::default`]
    /// for anything unset or unparsable.
    pub fn from_env() -> Self {
        let default = Self::default();
        Self {
            action_timeout: env_secs("ACTION_TIMEOUT_SECONDS", default.action_timeout),
            game_start_countdown: env_secs(
                "GAME_START_COUNTDOWN_SECONDS",
                default.game_start_countdown,
            ),
            min_players_to_start: env_usize(
                "MIN_PLAYERS_TO_START",
                default.min_players_to_start,
            ),
            max_players_per_table: env_usize(
                "MAX_PLAYERS_PER_TABLE",
                default.max_players_per_table,
            ),
            street_deal_delay: env_secs("STREET_DEAL_DELAY_SECONDS", default.street_deal_delay),
            new_hand_delay: env_secs("NEW_HAND_DELAY_SECONDS", default.new_hand_delay),
            log_level: std::env::var("LOG_LEVEL")
                .ok()
                .and_then(|s| LogLevel::try_from(s.as_str()).ok())
                .unwrap_or(default.log_level),
        }
    }
}

fn env_secs(key: &str, default: Duration) -> Duration {
    std::env::var(key)
        .ok()
        .and_then(|s| s.parse::<u64>().ok())
        .map(Duration::from_secs)
        .unwrap_or(default)
}
fn env_usize(key: &str, default: usize) -> usize {
    std::env::var(key)
        .ok()
        .and_then(|s| s.parse::<usize>().ok())
        .unwrap_or(default)
}

/// Logging verbosity, mirrors the `LOG_LEVEL` environment variable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Debug,
    Info,
    Warn,
    Error,
    Silent,
}

impl TryFrom<&str> for LogLevel {
    type Error = ();
    fn try_from(s: &str) -> Result<Self, Self::Error> {
        match s.to_lowercase().as_str() {
            "debug" => Ok(Self::Debug),
            "info" => Ok(Self::Info),
            "warn" => Ok(Self::Warn),
            "error" => Ok(Self::Error),
            "silent" => Ok(Self::Silent),
            _ => Err(()),
        }
    }
}
