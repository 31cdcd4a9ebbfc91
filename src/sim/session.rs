//! Session state machine
//!
//! Owns the game state, both timing domains, the spawner and the drag
//! gesture. Hosts feed it commands, pointer events and timer callbacks; every
//! mutation of the session goes through here.
//!
//! Phases: `Idle` -> `Countdown` -> `Active` -> `Over`, with `start`/`restart`
//! leading back into `Countdown` and `reset` back to `Idle`.
//!
//! Each step runs on a scratch copy of the state and is committed only if the
//! invariants still hold. A rejected step halts the session with the last good
//! state intact.

use glam::Vec2;

use super::input::{DragState, PlayfieldRect};
use super::schedule::{Schedule, TaskHandle, TaskKind};
use super::snapshot::Snapshot;
use super::spawn::{SeededSource, SpawnSource, Spawner};
use super::state::{GameEvent, GamePhase, GameState};
use super::tick::{self, SecondOutcome};
use crate::error::Result;
use crate::reward::RewardLedger;
use crate::tuning::Tuning;

/// How a timer callback was handled
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickResult {
    Applied,
    /// The handle was cancelled or superseded; nothing happened
    Stale,
    /// The session halted after an invariant fault
    Halted,
}

/// One play session
pub struct Session<S: SpawnSource = SeededSource> {
    tuning: Tuning,
    state: GameState,
    source: S,
    schedule: Schedule,
    /// Present only while `Active`
    spawner: Option<Spawner>,
    drag: DragState,
    rect: PlayfieldRect,
    events: Vec<GameEvent>,
    /// Final scores not yet handed to a ledger
    pending_rewards: Vec<u64>,
    faulted: bool,
}

impl Session<SeededSource> {
    /// Session with default tuning and a seeded spawn source
    pub fn new(seed: u64) -> Self {
        Self::build(Tuning::default(), SeededSource::new(seed))
    }

    pub fn with_tuning(seed: u64, tuning: Tuning) -> Result<Self> {
        Self::with_source(tuning, SeededSource::new(seed))
    }
}

impl<S: SpawnSource> Session<S> {
    /// Session with an arbitrary spawn source (e.g. a scripted one)
    pub fn with_source(tuning: Tuning, source: S) -> Result<Self> {
        tuning.validate()?;
        Ok(Self::build(tuning, source))
    }

    fn build(tuning: Tuning, source: S) -> Self {
        Self {
            state: GameState::new(&tuning),
            tuning,
            source,
            schedule: Schedule::default(),
            spawner: None,
            drag: DragState::default(),
            rect: PlayfieldRect::default(),
            events: Vec::new(),
            pending_rewards: Vec::new(),
            faulted: false,
        }
    }

    // === Accessors ===

    pub fn phase(&self) -> GamePhase {
        self.state.phase
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn tuning(&self) -> &Tuning {
        &self.tuning
    }

    /// Live handle for the frame task (armed only while `Active`)
    pub fn frame_task(&self) -> Option<TaskHandle> {
        self.schedule.current(TaskKind::Frame)
    }

    /// Live handle for the one-second task (countdown or power-up)
    pub fn second_task(&self) -> Option<TaskHandle> {
        self.schedule.current(TaskKind::Second)
    }

    pub fn is_faulted(&self) -> bool {
        self.faulted
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_dragging()
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot::capture(&self.state, &self.tuning, self.drag.is_dragging(), self.faulted)
    }

    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Hand every pending final score to `ledger`. Returns how many were sent.
    pub fn forward_rewards(&mut self, ledger: &mut dyn RewardLedger) -> usize {
        let pending = std::mem::take(&mut self.pending_rewards);
        for &score in &pending {
            ledger.award(score);
        }
        pending.len()
    }

    pub fn set_playfield_rect(&mut self, rect: PlayfieldRect) {
        self.rect = rect;
    }

    // === Commands ===

    /// Begin a countdown. Only valid from `Idle` or `Over`.
    pub fn start(&mut self) -> bool {
        match self.state.phase {
            GamePhase::Idle | GamePhase::Over => {
                self.begin_countdown();
                true
            }
            phase => {
                log::debug!("start ignored in phase {}", phase.as_str());
                false
            }
        }
    }

    /// Abandon whatever is running and count down again from scratch
    pub fn restart(&mut self) {
        self.begin_countdown();
    }

    /// Back to `Idle` with everything cleared
    pub fn reset(&mut self) {
        self.teardown();
        self.faulted = false;
        self.state.reset_round(&self.tuning, GamePhase::Idle);
        log::info!("Session reset");
    }

    /// Start the power-up. Only valid while `Active` and not already running.
    pub fn activate_power_up(&mut self) -> bool {
        if self.faulted || self.state.phase != GamePhase::Active || self.state.power_up.active {
            log::debug!(
                "power-up ignored (phase {}, active {})",
                self.state.phase.as_str(),
                self.state.power_up.active
            );
            return false;
        }
        let mut next = self.state.clone();
        let mut events = Vec::new();
        let Some(resolved) = tick::activate_power_up(&mut next, &self.tuning, &mut events) else {
            return false;
        };
        if !self.commit(next, events) {
            return false;
        }
        self.schedule.arm(TaskKind::Second);
        log::info!(
            "Power-up started for {}s, swept {} items",
            self.tuning.power_up_secs,
            resolved
        );
        true
    }

    // === Pointer input ===

    /// Grab the catcher. Ignored outside `Active`.
    pub fn drag_start(&mut self, pointer: Vec2) -> bool {
        if !self.accepts_input() {
            return false;
        }
        self.drag.begin(pointer, self.state.catcher.x, &self.rect)
    }

    /// Move the grabbed catcher. Ignored outside `Active` or without a drag.
    pub fn drag_move(&mut self, pointer: Vec2) -> bool {
        if !self.accepts_input() {
            return false;
        }
        match self.drag.catcher_x_for(pointer, &self.rect) {
            Some(x) => {
                self.state.catcher.set_x(x);
                true
            }
            None => false,
        }
    }

    /// Release the catcher; it keeps its last position
    pub fn drag_end(&mut self) {
        self.drag.end();
    }

    fn accepts_input(&self) -> bool {
        !self.faulted && self.state.phase == GamePhase::Active
    }

    // === Timer callbacks ===

    /// Display frame callback
    pub fn on_frame(&mut self, handle: TaskHandle, dt: f32) -> TickResult {
        if self.faulted {
            return TickResult::Halted;
        }
        if handle.kind() != TaskKind::Frame || !self.schedule.is_live(handle) {
            return TickResult::Stale;
        }
        let Some(mut spawner) = self.spawner.clone() else {
            return TickResult::Stale;
        };

        let mut next = self.state.clone();
        let mut events = Vec::new();
        let report = tick::tick_frame(
            &mut next,
            &mut spawner,
            &mut self.source,
            &self.tuning,
            dt,
            &mut events,
        );
        if !self.commit(next, events) {
            return TickResult::Halted;
        }

        if report.session_over {
            self.enter_over();
        } else {
            self.spawner = Some(spawner);
        }
        TickResult::Applied
    }

    /// One-second timer callback
    pub fn on_second(&mut self, handle: TaskHandle) -> TickResult {
        if self.faulted {
            return TickResult::Halted;
        }
        if handle.kind() != TaskKind::Second || !self.schedule.is_live(handle) {
            return TickResult::Stale;
        }

        let mut next = self.state.clone();
        let mut events = Vec::new();
        let outcome = tick::tick_second(&mut next, &mut events);
        if !self.commit(next, events) {
            return TickResult::Halted;
        }

        match outcome {
            SecondOutcome::CountdownFinished => self.enter_active(),
            SecondOutcome::PowerUpExpired => {
                self.schedule.cancel(TaskKind::Second);
                log::info!("Power-up ended");
            }
            SecondOutcome::Idle => self.schedule.cancel(TaskKind::Second),
            SecondOutcome::CountdownTick | SecondOutcome::PowerUpTick => {}
        }
        TickResult::Applied
    }

    // === Transitions ===

    fn begin_countdown(&mut self) {
        self.teardown();
        self.faulted = false;
        self.state.reset_round(&self.tuning, GamePhase::Countdown);
        self.schedule.arm(TaskKind::Second);
        self.events.push(GameEvent::CountdownStarted {
            seconds: self.tuning.countdown_secs,
        });
        log::info!("Countdown started ({}s)", self.tuning.countdown_secs);
    }

    fn enter_active(&mut self) {
        self.schedule.cancel(TaskKind::Second);
        self.schedule.arm(TaskKind::Frame);
        self.spawner = Some(Spawner::new(&self.tuning));
        log::info!("Session active");
    }

    fn enter_over(&mut self) {
        self.teardown();
        self.pending_rewards.push(self.state.score);
        log::info!(
            "Session over: score {} ({} caught, {} missed, {:.1}s)",
            self.state.score,
            self.state.caught,
            self.state.miss_count,
            self.state.elapsed_active
        );
    }

    /// Cancel both tasks, drop the spawner and release any drag
    fn teardown(&mut self) {
        self.schedule.cancel_all();
        self.spawner = None;
        self.drag.end();
    }

    /// Adopt `next` if it is consistent, otherwise halt on the current state
    fn commit(&mut self, next: GameState, mut events: Vec<GameEvent>) -> bool {
        let checked = next.check_invariants(&self.tuning);
        debug_assert!(checked.is_ok(), "step rejected: {checked:?}");
        match checked {
            Ok(()) => {
                self.state = next;
                self.events.append(&mut events);
                true
            }
            Err(err) => {
                log::error!("Step rejected, halting session: {err}");
                self.teardown();
                self.faulted = true;
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run_countdown<S: SpawnSource>(session: &mut Session<S>) {
        while session.phase() == GamePhase::Countdown {
            let handle = session.second_task().expect("countdown armed");
            assert_eq!(session.on_second(handle), TickResult::Applied);
        }
    }

    #[test]
    fn test_start_only_from_idle_or_over() {
        let mut session = Session::new(1);
        assert_eq!(session.phase(), GamePhase::Idle);
        assert!(session.start());
        assert_eq!(session.phase(), GamePhase::Countdown);
        assert!(!session.start());
        run_countdown(&mut session);
        assert_eq!(session.phase(), GamePhase::Active);
        assert!(!session.start());
    }

    #[test]
    fn test_countdown_freezes_everything() {
        let mut session = Session::new(1);
        session.start();
        assert_eq!(session.frame_task(), None);
        assert!(!session.drag_start(Vec2::new(50.0, 90.0)));
        assert!(!session.activate_power_up());
        assert_eq!(session.snapshot().countdown_remaining, 5);
    }

    #[test]
    fn test_countdown_arms_frame_task() {
        let mut session = Session::new(1);
        session.start();
        let countdown = session.second_task().unwrap();
        run_countdown(&mut session);
        assert!(session.frame_task().is_some());
        assert_eq!(session.second_task(), None);
        assert_eq!(session.on_second(countdown), TickResult::Stale);
    }

    #[test]
    fn test_handles_of_wrong_kind_are_stale() {
        let mut session = Session::new(1);
        session.start();
        let second = session.second_task().unwrap();
        assert_eq!(session.on_frame(second, 0.016), TickResult::Stale);
        assert_eq!(session.snapshot().countdown_remaining, 5);
    }

    #[test]
    fn test_reset_returns_to_idle() {
        let mut session = Session::new(1);
        session.start();
        run_countdown(&mut session);
        session.reset();
        assert_eq!(session.phase(), GamePhase::Idle);
        assert_eq!(session.frame_task(), None);
        assert_eq!(session.second_task(), None);
        assert!(session.start());
    }

    #[test]
    fn test_power_up_arms_second_task() {
        let mut session = Session::new(1);
        session.start();
        run_countdown(&mut session);
        assert!(session.activate_power_up());
        let handle = session.second_task().expect("power-up timer armed");
        for _ in 0..session.tuning().power_up_secs {
            assert_eq!(session.on_second(handle), TickResult::Applied);
        }
        assert!(!session.state().power_up.active);
        assert_eq!(session.second_task(), None);
        assert!(session.frame_task().is_some());
    }

    #[test]
    fn test_drag_moves_catcher_only_while_active() {
        let mut session = Session::new(1);
        session.set_playfield_rect(PlayfieldRect::new(0.0, 0.0, 200.0, 400.0));
        assert!(!session.drag_start(Vec2::new(100.0, 380.0)));
        session.start();
        run_countdown(&mut session);

        assert!(session.drag_start(Vec2::new(100.0, 380.0)));
        assert!(session.drag_move(Vec2::new(140.0, 380.0)));
        assert!((session.state().catcher.x - 70.0).abs() < 1e-4);
        session.drag_end();
        assert!(!session.drag_move(Vec2::new(10.0, 380.0)));
        assert!((session.state().catcher.x - 70.0).abs() < 1e-4);
    }

    #[test]
    fn test_invalid_tuning_is_rejected() {
        let tuning = Tuning {
            spawn_interval_secs: 0.0,
            ..Default::default()
        };
        assert!(Session::with_tuning(1, tuning).is_err());
    }
}
