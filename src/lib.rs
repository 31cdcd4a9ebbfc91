//! Recycle Rush - falling-item sorting game engine
//!
//! Core modules:
//! - `sim`: Deterministic simulation (spawning, motion, capture, session phases)
//! - `tuning`: Data-driven game balance
//! - `reward`: Hand-off of final scores to an external ledger

pub mod error;
pub mod reward;
pub mod sim;
pub mod tuning;

pub use error::{Error, Result};
pub use reward::{CoinLedger, RewardLedger};
pub use sim::{Session, Snapshot};
pub use tuning::Tuning;

/// Game configuration constants
///
/// Playfield coordinates are percentages: x of the width, y of the height
/// with 0 at the top.
pub mod consts {
    /// Playfield extent on both axes
    pub const PLAYFIELD_MIN: f32 = 0.0;
    pub const PLAYFIELD_MAX: f32 = 100.0;

    /// Items at or past this height are resolved as caught or missed
    pub const CAPTURE_LINE: f32 = 86.0;
    /// Items at or past this height count as "near" for the power-up sweep
    pub const NEAR_BAND_START: f32 = 80.0;

    /// Catcher defaults - the bin is 16% of the playfield wide
    pub const CATCHER_HALF_WIDTH: f32 = 8.0;
    pub const CATCHER_START_X: f32 = 50.0;

    /// Spawner defaults
    pub const SPAWN_INTERVAL_SECS: f32 = 1.4;
    pub const SPAWN_X_MIN: f32 = 5.0;
    pub const SPAWN_X_MAX: f32 = 95.0;
    /// Fall speed band, percent of height per reference frame
    pub const SPEED_MIN: f32 = 0.25;
    pub const SPEED_MAX: f32 = 0.5;

    /// Frame rate at which item speeds are expressed
    pub const REFERENCE_FPS: f32 = 60.0;
    /// Longest frame delta applied in one step (seconds)
    pub const MAX_FRAME_DT: f32 = 0.1;

    /// Scoring
    pub const CATCH_REWARD: u64 = 10;
    pub const MISS_LIMIT: u32 = 5;

    /// One-second timers
    pub const COUNTDOWN_SECS: u32 = 5;
    pub const POWER_UP_SECS: u32 = 5;
    /// Fall-rate multiplier while the power-up runs
    pub const POWER_UP_RATE: f32 = 0.5;

    /// Score needed for one coin in the in-memory ledger
    pub const POINTS_PER_COIN: u64 = 10;
}

/// Clamp a playfield coordinate to [0, 100]
#[inline]
pub fn clamp_percent(value: f32) -> f32 {
    use consts::{PLAYFIELD_MAX, PLAYFIELD_MIN};
    if value.is_nan() {
        return PLAYFIELD_MIN;
    }
    value.clamp(PLAYFIELD_MIN, PLAYFIELD_MAX)
}
