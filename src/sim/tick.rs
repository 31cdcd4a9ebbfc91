//! Frame and one-second simulation steps
//!
//! Pure functions over `GameState`. The session decides when each one runs
//! and commits the result. Within a frame the order is fixed: motion, then
//! capture, then spawning, so new items always start their first frame at the
//! top edge.

use super::capture::{self, CaptureReport};
use super::motion;
use super::spawn::{SpawnSource, Spawner};
use super::state::{GameEvent, GamePhase, GameState, ItemId};
use crate::tuning::Tuning;

/// Result of one frame step
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FrameReport {
    pub capture: CaptureReport,
    pub spawned: u32,
    /// This frame reached the miss limit
    pub session_over: bool,
}

/// Advance an `Active` session by one display frame of `dt` seconds
pub fn tick_frame<S: SpawnSource + ?Sized>(
    state: &mut GameState,
    spawner: &mut Spawner,
    source: &mut S,
    tuning: &Tuning,
    dt: f32,
    events: &mut Vec<GameEvent>,
) -> FrameReport {
    if state.phase != GamePhase::Active {
        return FrameReport::default();
    }

    let dt = tuning.clamp_dt(dt);
    let rate = state.power_up.rate_multiplier(tuning.power_up_rate);
    motion::integrate(&mut state.items, dt * tuning.reference_fps, rate);
    state.elapsed_active += dt;

    let capture = capture::classify(&mut state.items, &state.catcher, tuning.capture_line);
    apply_capture(state, tuning, &capture, events);

    if state.miss_count >= tuning.miss_limit {
        finish_session(state, events);
        return FrameReport {
            capture,
            spawned: 0,
            session_over: true,
        };
    }

    let spawned = spawner.advance(state, source, tuning, dt, events);
    FrameReport {
        capture,
        spawned,
        session_over: false,
    }
}

/// Score catches and count misses from one capture pass.
///
/// Misses past the limit are still removed but the count saturates; the
/// caller ends the session once the limit is reached.
pub fn apply_capture(
    state: &mut GameState,
    tuning: &Tuning,
    report: &CaptureReport,
    events: &mut Vec<GameEvent>,
) {
    for &id in &report.caught {
        award_catch(state, tuning, id, events);
    }
    for &id in &report.missed {
        state.miss_count = (state.miss_count + 1).min(tuning.miss_limit);
        log::debug!("Missed {:?} ({}/{})", id, state.miss_count, tuning.miss_limit);
        events.push(GameEvent::Missed { id });
    }
}

fn award_catch(state: &mut GameState, tuning: &Tuning, id: ItemId, events: &mut Vec<GameEvent>) {
    state.score += tuning.catch_reward;
    state.caught += 1;
    log::debug!("Caught {:?} (score {})", id, state.score);
    events.push(GameEvent::Caught {
        id,
        points: tuning.catch_reward,
    });
}

/// Enter `Over`. Emits the terminal event; does nothing if already over.
pub fn finish_session(state: &mut GameState, events: &mut Vec<GameEvent>) {
    if state.phase == GamePhase::Over {
        return;
    }
    state.phase = GamePhase::Over;
    state.power_up.cancel();
    events.push(GameEvent::SessionOver {
        final_score: state.score,
    });
}

/// What a one-second tick did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SecondOutcome {
    /// Nothing runs on the second clock in this phase
    Idle,
    CountdownTick,
    CountdownFinished,
    PowerUpTick,
    PowerUpExpired,
}

/// Advance the one-second clock: countdown while counting, power-up expiry while active
pub fn tick_second(state: &mut GameState, events: &mut Vec<GameEvent>) -> SecondOutcome {
    match state.phase {
        GamePhase::Countdown => {
            state.countdown_remaining = state.countdown_remaining.saturating_sub(1);
            events.push(GameEvent::CountdownTick {
                remaining: state.countdown_remaining,
            });
            if state.countdown_remaining == 0 {
                state.phase = GamePhase::Active;
                events.push(GameEvent::Started);
                SecondOutcome::CountdownFinished
            } else {
                SecondOutcome::CountdownTick
            }
        }
        GamePhase::Active if state.power_up.active => {
            if state.power_up.tick_second() {
                events.push(GameEvent::PowerUpEnded);
                SecondOutcome::PowerUpExpired
            } else {
                SecondOutcome::PowerUpTick
            }
        }
        _ => SecondOutcome::Idle,
    }
}

/// Start the power-up and sweep near-line items as catches.
///
/// Returns the number of swept items, or None if the power-up could not start.
pub fn activate_power_up(
    state: &mut GameState,
    tuning: &Tuning,
    events: &mut Vec<GameEvent>,
) -> Option<u32> {
    if state.phase != GamePhase::Active || !state.power_up.activate(tuning.power_up_secs) {
        return None;
    }
    let swept = capture::sweep_near(&mut state.items, tuning.near_band_start);
    for &id in &swept {
        award_catch(state, tuning, id, events);
    }
    let resolved = swept.len() as u32;
    events.push(GameEvent::PowerUpStarted { resolved });
    Some(resolved)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::spawn::SeededSource;
    use crate::sim::state::{Category, FallingItem};

    fn active(tuning: &Tuning) -> GameState {
        let mut state = GameState::new(tuning);
        state.phase = GamePhase::Active;
        state
    }

    fn push_item(state: &mut GameState, x: f32, y: f32, speed: f32) -> ItemId {
        let id = state.next_item_id();
        let mut item = FallingItem::new(id, Category::Glass, x, speed);
        item.y = y;
        state.items.push(item);
        id
    }

    #[test]
    fn test_frame_moves_then_captures() {
        let tuning = Tuning::default();
        let mut state = active(&tuning);
        let mut spawner = Spawner::new(&tuning);
        let mut source = SeededSource::new(1);
        let caught = push_item(&mut state, 50.0, 85.8, 0.3);
        let missed = push_item(&mut state, 5.0, 85.8, 0.3);
        let falling = push_item(&mut state, 5.0, 10.0, 0.3);
        let mut events = Vec::new();

        let report = tick_frame(&mut state, &mut spawner, &mut source, &tuning, 1.0 / 60.0, &mut events);
        assert_eq!(report.capture.caught, vec![caught]);
        assert_eq!(report.capture.missed, vec![missed]);
        assert_eq!(state.score, tuning.catch_reward);
        assert_eq!(state.miss_count, 1);
        assert_eq!(state.items.len(), 1);
        assert_eq!(state.items[0].id, falling);
    }

    #[test]
    fn test_power_up_halves_fall_rate() {
        let tuning = Tuning::default();
        let mut state = active(&tuning);
        let mut spawner = Spawner::new(&tuning);
        let mut source = SeededSource::new(1);
        push_item(&mut state, 50.0, 10.0, 0.4);
        let mut events = Vec::new();

        activate_power_up(&mut state, &tuning, &mut events).unwrap();
        tick_frame(&mut state, &mut spawner, &mut source, &tuning, 1.0 / 60.0, &mut events);
        assert!((state.items[0].y - 10.2).abs() < 1e-4);
    }

    #[test]
    fn test_miss_count_saturates_at_limit() {
        let tuning = Tuning {
            miss_limit: 2,
            ..Default::default()
        };
        let mut state = active(&tuning);
        let mut spawner = Spawner::new(&tuning);
        let mut source = SeededSource::new(1);
        for _ in 0..4 {
            push_item(&mut state, 99.0, 85.9, 0.5);
        }
        let mut events = Vec::new();
        let report = tick_frame(&mut state, &mut spawner, &mut source, &tuning, 1.0 / 60.0, &mut events);
        assert!(report.session_over);
        assert_eq!(report.capture.missed.len(), 4);
        assert_eq!(state.miss_count, 2);
        assert_eq!(state.phase, GamePhase::Over);
        let terminal = events
            .iter()
            .filter(|e| matches!(e, GameEvent::SessionOver { .. }))
            .count();
        assert_eq!(terminal, 1);
    }

    #[test]
    fn test_frame_outside_active_does_nothing() {
        let tuning = Tuning::default();
        let mut state = GameState::new(&tuning);
        let mut spawner = Spawner::new(&tuning);
        let mut source = SeededSource::new(1);
        let mut events = Vec::new();
        for _ in 0..200 {
            tick_frame(&mut state, &mut spawner, &mut source, &tuning, 0.1, &mut events);
        }
        assert!(state.items.is_empty());
        assert!(events.is_empty());
    }

    #[test]
    fn test_countdown_reaches_active() {
        let tuning = Tuning::default();
        let mut state = GameState::new(&tuning);
        state.reset_round(&tuning, GamePhase::Countdown);
        let mut events = Vec::new();
        for _ in 1..tuning.countdown_secs {
            assert_eq!(tick_second(&mut state, &mut events), SecondOutcome::CountdownTick);
        }
        assert_eq!(tick_second(&mut state, &mut events), SecondOutcome::CountdownFinished);
        assert_eq!(state.phase, GamePhase::Active);
        assert_eq!(events.last(), Some(&GameEvent::Started));
    }

    #[test]
    fn test_power_up_expires_on_second_clock() {
        let tuning = Tuning::default();
        let mut state = active(&tuning);
        let mut events = Vec::new();
        activate_power_up(&mut state, &tuning, &mut events).unwrap();
        for _ in 1..tuning.power_up_secs {
            assert_eq!(tick_second(&mut state, &mut events), SecondOutcome::PowerUpTick);
        }
        assert_eq!(tick_second(&mut state, &mut events), SecondOutcome::PowerUpExpired);
        assert!(!state.power_up.active);
        assert_eq!(tick_second(&mut state, &mut events), SecondOutcome::Idle);
    }

    #[test]
    fn test_power_up_sweeps_near_band_once() {
        let tuning = Tuning::default();
        let mut state = active(&tuning);
        push_item(&mut state, 10.0, 82.0, 0.3);
        push_item(&mut state, 90.0, 84.0, 0.3);
        push_item(&mut state, 50.0, 30.0, 0.3);
        let mut events = Vec::new();

        assert_eq!(activate_power_up(&mut state, &tuning, &mut events), Some(2));
        assert_eq!(state.score, 2 * tuning.catch_reward);
        assert_eq!(state.items.len(), 1);
        // Already running: no second sweep, no extension
        push_item(&mut state, 10.0, 83.0, 0.3);
        assert_eq!(activate_power_up(&mut state, &tuning, &mut events), None);
        assert_eq!(state.items.len(), 2);
        assert_eq!(state.power_up.remaining, tuning.power_up_secs);
    }
}
