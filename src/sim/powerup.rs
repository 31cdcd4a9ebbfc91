//! Timed assist power-up
//!
//! While running, items fall at a reduced rate. The countdown is driven by the
//! one-second timer, never by frames.

use serde::{Deserialize, Serialize};

/// Power-up timer state
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PowerUp {
    pub active: bool,
    /// Whole seconds left
    pub remaining: u32,
}

impl PowerUp {
    /// Start the power-up for `duration` seconds.
    ///
    /// Returns false (and changes nothing) if it is already running; a second
    /// activation neither queues nor extends.
    pub fn activate(&mut self, duration: u32) -> bool {
        if self.active || duration == 0 {
            return false;
        }
        self.active = true;
        self.remaining = duration;
        true
    }

    /// Advance one second. Returns true when this call ended the power-up.
    pub fn tick_second(&mut self) -> bool {
        if !self.active {
            return false;
        }
        self.remaining = self.remaining.saturating_sub(1);
        if self.remaining == 0 {
            self.active = false;
            return true;
        }
        false
    }

    pub fn cancel(&mut self) {
        *self = Self::default();
    }

    /// Fall-rate multiplier given the configured slowdown
    #[inline]
    pub fn rate_multiplier(&self, slowed_rate: f32) -> f32 {
        if self.active { slowed_rate } else { 1.0 }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_activate_and_expire() {
        let mut power_up = PowerUp::default();
        assert_eq!(power_up.rate_multiplier(0.5), 1.0);
        assert!(power_up.activate(3));
        assert_eq!(power_up.rate_multiplier(0.5), 0.5);

        assert!(!power_up.tick_second());
        assert!(!power_up.tick_second());
        assert_eq!(power_up.remaining, 1);
        assert!(power_up.tick_second());
        assert!(!power_up.active);
        assert_eq!(power_up.rate_multiplier(0.5), 1.0);

        // Expired power-up stays idle
        assert!(!power_up.tick_second());
        assert_eq!(power_up.remaining, 0);
    }

    #[test]
    fn test_reactivation_does_not_extend() {
        let mut power_up = PowerUp::default();
        assert!(power_up.activate(5));
        power_up.tick_second();
        assert!(!power_up.activate(5));
        assert_eq!(power_up.remaining, 4);
    }

    #[test]
    fn test_can_reactivate_after_expiry() {
        let mut power_up = PowerUp::default();
        power_up.activate(1);
        assert!(power_up.tick_second());
        assert!(power_up.activate(2));
        assert_eq!(power_up.remaining, 2);
    }
}
