//! Data-driven game balance
//!
//! Every constant in `consts` can be overridden from a JSON document. Missing
//! fields keep their defaults.

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::{Error, Result};

/// Balance knobs for one session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Playfield ===
    /// Height at which items are resolved
    pub capture_line: f32,
    /// Height at which items become eligible for the power-up sweep
    pub near_band_start: f32,
    pub catcher_half_width: f32,
    pub catcher_start_x: f32,

    // === Spawner ===
    pub spawn_interval_secs: f32,
    pub spawn_x_min: f32,
    pub spawn_x_max: f32,
    pub speed_min: f32,
    pub speed_max: f32,

    // === Clock ===
    pub reference_fps: f32,
    pub max_frame_dt: f32,

    // === Scoring ===
    pub catch_reward: u64,
    pub miss_limit: u32,

    // === Timers ===
    pub countdown_secs: u32,
    pub power_up_secs: u32,
    pub power_up_rate: f32,

    // === Rewards ===
    pub points_per_coin: u64,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            capture_line: CAPTURE_LINE,
            near_band_start: NEAR_BAND_START,
            catcher_half_width: CATCHER_HALF_WIDTH,
            catcher_start_x: CATCHER_START_X,

            spawn_interval_secs: SPAWN_INTERVAL_SECS,
            spawn_x_min: SPAWN_X_MIN,
            spawn_x_max: SPAWN_X_MAX,
            speed_min: SPEED_MIN,
            speed_max: SPEED_MAX,

            reference_fps: REFERENCE_FPS,
            max_frame_dt: MAX_FRAME_DT,

            catch_reward: CATCH_REWARD,
            miss_limit: MISS_LIMIT,

            countdown_secs: COUNTDOWN_SECS,
            power_up_secs: POWER_UP_SECS,
            power_up_rate: POWER_UP_RATE,

            points_per_coin: POINTS_PER_COIN,
        }
    }
}

fn invalid(msg: impl Into<String>) -> Error {
    Error::InvalidTuning(msg.into())
}

fn in_playfield(v: f32) -> bool {
    v.is_finite() && (PLAYFIELD_MIN..=PLAYFIELD_MAX).contains(&v)
}

impl Tuning {
    /// Parse and validate a JSON tuning document
    pub fn from_json(json: &str) -> Result<Self> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Reject configurations the simulation cannot run with
    pub fn validate(&self) -> Result<()> {
        if !in_playfield(self.capture_line) || self.capture_line <= PLAYFIELD_MIN {
            return Err(invalid(format!("capture_line {} outside (0, 100]", self.capture_line)));
        }
        if !in_playfield(self.near_band_start) || self.near_band_start >= self.capture_line {
            return Err(invalid(format!(
                "near_band_start {} must lie below capture_line {}",
                self.near_band_start, self.capture_line
            )));
        }
        if !self.catcher_half_width.is_finite() || self.catcher_half_width <= 0.0 {
            return Err(invalid("catcher_half_width must be positive"));
        }
        if !in_playfield(self.catcher_start_x) {
            return Err(invalid("catcher_start_x outside the playfield"));
        }
        if !self.spawn_interval_secs.is_finite() || self.spawn_interval_secs <= 0.0 {
            return Err(invalid("spawn_interval_secs must be positive"));
        }
        if !in_playfield(self.spawn_x_min)
            || !in_playfield(self.spawn_x_max)
            || self.spawn_x_min > self.spawn_x_max
        {
            return Err(invalid(format!(
                "spawn x band [{}, {}] is not a range inside the playfield",
                self.spawn_x_min, self.spawn_x_max
            )));
        }
        if !self.speed_min.is_finite()
            || !self.speed_max.is_finite()
            || self.speed_min <= 0.0
            || self.speed_min > self.speed_max
        {
            return Err(invalid(format!(
                "speed band [{}, {}] must be positive and ordered",
                self.speed_min, self.speed_max
            )));
        }
        if !self.reference_fps.is_finite() || self.reference_fps <= 0.0 {
            return Err(invalid("reference_fps must be positive"));
        }
        if !self.max_frame_dt.is_finite() || self.max_frame_dt <= 0.0 {
            return Err(invalid("max_frame_dt must be positive"));
        }
        if self.miss_limit == 0 {
            return Err(invalid("miss_limit must be at least 1"));
        }
        if self.countdown_secs == 0 {
            return Err(invalid("countdown_secs must be at least 1"));
        }
        if self.power_up_secs == 0 {
            return Err(invalid("power_up_secs must be at least 1"));
        }
        if !(self.power_up_rate > 0.0 && self.power_up_rate <= 1.0) {
            return Err(invalid(format!("power_up_rate {} outside (0, 1]", self.power_up_rate)));
        }
        if self.points_per_coin == 0 {
            return Err(invalid("points_per_coin must be at least 1"));
        }
        Ok(())
    }

    /// Clamp a raw frame delta into the range one step may consume
    pub fn clamp_dt(&self, dt: f32) -> f32 {
        if !dt.is_finite() {
            return 0.0;
        }
        dt.clamp(0.0, self.max_frame_dt)
    }

    /// Number of reference frames a (clamped) delta represents
    #[inline]
    pub fn tick_scale(&self, dt: f32) -> f32 {
        self.clamp_dt(dt) * self.reference_fps
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        Tuning::default().validate().unwrap();
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let tuning = Tuning::from_json(r#"{ "miss_limit": 3, "catch_reward": 25 }"#).unwrap();
        assert_eq!(tuning.miss_limit, 3);
        assert_eq!(tuning.catch_reward, 25);
        assert_eq!(tuning.capture_line, CAPTURE_LINE);
        assert_eq!(tuning.spawn_interval_secs, SPAWN_INTERVAL_SECS);
    }

    #[test]
    fn test_json_roundtrip() {
        let tuning = Tuning {
            power_up_secs: 8,
            ..Default::default()
        };
        let json = tuning.to_json().unwrap();
        assert_eq!(Tuning::from_json(&json).unwrap(), tuning);
    }

    #[test]
    fn test_rejects_inverted_speed_band() {
        let err = Tuning::from_json(r#"{ "speed_min": 0.6, "speed_max": 0.5 }"#).unwrap_err();
        assert!(matches!(err, Error::InvalidTuning(_)));
    }

    #[test]
    fn test_rejects_near_band_past_capture_line() {
        let tuning = Tuning {
            near_band_start: 90.0,
            ..Default::default()
        };
        assert!(tuning.validate().is_err());
    }

    #[test]
    fn test_rejects_zero_miss_limit() {
        let tuning = Tuning {
            miss_limit: 0,
            ..Default::default()
        };
        assert!(tuning.validate().is_err());
    }

    #[test]
    fn test_malformed_json_is_json_error() {
        assert!(matches!(Tuning::from_json("{ nope"), Err(Error::Json(_))));
    }

    #[test]
    fn test_tick_scale_clamps_long_frames() {
        let tuning = Tuning::default();
        assert!((tuning.tick_scale(1.0 / 60.0) - 1.0).abs() < 1e-5);
        assert!((tuning.tick_scale(5.0) - MAX_FRAME_DT * REFERENCE_FPS).abs() < 1e-5);
        assert_eq!(tuning.tick_scale(-1.0), 0.0);
        assert_eq!(tuning.tick_scale(f32::NAN), 0.0);
    }
}
