//! Core type aliases, identifiers, configuration, and logging for the table engine.
//!
//! This crate provides the foundational types shared by every other `pte-*`
//! crate: chip/position aliases, the [`ID`] wrapper for typed identifiers,
//! the runtime [`Config`], and the handful of constants that pin down table
//! geometry (seat count, timeout windows, buy-in bounds).
#![allow(dead_code)]

mod config;
mod id;

pub use config::*;
pub use id::*;

// ============================================================================
// TYPE ALIASES
// ============================================================================
/// Chip amounts: stacks, commitments, pot sizes, blinds.
pub type Chips = i64;
/// Seat index around the table, always in `0..MAX_SEATS`.
pub type SeatIndex = usize;
/// Monotonically increasing hand counter for a table.
pub type HandNumber = u64;

/// Opaque player identifier. Never an object reference: seats and pots
/// address players by this id, never by back-pointer.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PlayerId(String);

impl PlayerId {
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for PlayerId {
    fn from(s: String) -> Self {
        Self(s)
    }
}
impl From<&str> for PlayerId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}
impl std::fmt::Display for PlayerId {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ============================================================================
// TABLE GEOMETRY
// ============================================================================
/// Every table has exactly this many seat slots, indexed `0..MAX_SEATS`.
pub const MAX_SEATS: usize = 9;
/// Minimum in-hand seats required for the ring and betting to make sense.
pub const MIN_SEATS_TO_DEAL: usize = 2;

// ============================================================================
// PLAYER LIFECYCLE
// ============================================================================
/// Consecutive timeouts (without an intervening voluntary action) before a
/// player is auto-sat-out.
pub const MAX_TIMEOUTS: u8 = 2;
/// Grace window before a sitting-out player is auto-removed from their seat.
pub const AUTO_LEAVE_TIMEOUT: std::time::Duration = std::time::Duration::from_secs(5 * 60);
/// Delay between `Payout` and the `HandEnd` that follows it, giving clients
/// time to render the showdown before the table resets.
pub const HAND_END_DELAY: std::time::Duration = std::time::Duration::from_millis(5_000);

// ============================================================================
// BUY-IN BOUNDS
// ============================================================================
/// Minimum buy-in as a multiple of the big blind.
///
/// A production value, kept well above the bare `bigBlind * 1` a quick
/// test harness might use, with the multiplier itself configurable via
/// [`Config`].
pub const MIN_BUYIN_BB: Chips = 20;
/// Maximum buy-in as a multiple of the big blind.
pub const MAX_BUYIN_BB: Chips = 200;

// ============================================================================
// EVENT LOOP
// ============================================================================
/// Per-table event queue soft bound. Exceeding it surfaces a reducer-loop bug.
pub const QUEUE_SOFT_BOUND: usize = 50;

// ============================================================================
// COUNTDOWNS
// ============================================================================
/// Interval between countdown garbage-collection sweeps.
pub const COUNTDOWN_GC_INTERVAL: std::time::Duration = std::time::Duration::from_secs(30);
/// Grace period added on top of a countdown's nominal duration before GC.
pub const COUNTDOWN_GC_GRACE: std::time::Duration = std::time::Duration::from_secs(5);

// ============================================================================
// RUNTIME UTILITIES
// ============================================================================
/// Initialize dual logging (terminal + file) with a timestamped log file.
///
/// Creates a `logs/` directory and writes DEBUG level to file, INFO to
/// terminal, same split the solver binaries use.
#[cfg(feature = "server")]
pub fn init_logging() {
    std::fs::create_dir_all("logs").expect("create logs directory");
    let config = simplelog::ConfigBuilder::new()
        .set_location_level(log::LevelFilter::Off)
        .set_target_level(log::LevelFilter::Off)
        .set_thread_level(log::LevelFilter::Off)
        .build();
    let time = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .expect("time moves forward")
        .as_secs();
    let file = simplelog::WriteLogger::new(
        log::LevelFilter::Debug,
        config.clone(),
        std::fs::File::create(format!("logs/{}.log", time)).expect("create log file"),
    );
    let term = simplelog::TermLogger::new(
        log::LevelFilter::Info,
        config,
        simplelog::TerminalMode::Mixed,
        simplelog::ColorChoice::Auto,
    );
    simplelog::CombinedLogger::init(vec![term, file]).expect("initialize logger");
}

/// Register a Ctrl+C handler that cancels all table tasks immediately.
#[cfg(feature = "server")]
pub fn register_shutdown_signal() {
    tokio::spawn(async move {
        tokio::signal::ctrl_c().await.unwrap();
        log::warn!("interrupt received, shutting down tables");
        std::process::exit(0);
    });
}
