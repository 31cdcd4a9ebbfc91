//! Game state and core simulation types
//!
//! All state a session owns lives here. Only the session writes `phase`,
//! `score` and `miss_count`; the step functions receive it by `&mut` from the
//! session and nowhere else.

use serde::{Deserialize, Serialize};

use super::powerup::PowerUp;
use crate::clamp_percent;
use crate::error::{Error, Result};
use crate::tuning::Tuning;

/// Current phase of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Waiting for a start command
    Idle,
    /// Counting down before play, nothing moves
    Countdown,
    /// Full simulation runs
    Active,
    /// Session ended, score is final
    Over,
}

impl GamePhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            GamePhase::Idle => "Idle",
            GamePhase::Countdown => "Countdown",
            GamePhase::Active => "Active",
            GamePhase::Over => "Over",
        }
    }
}

/// Waste category of a falling item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    Plastic,
    Paper,
    Glass,
    EWaste,
}

impl Category {
    pub const ALL: [Category; 4] = [
        Category::Plastic,
        Category::Paper,
        Category::Glass,
        Category::EWaste,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Category::Plastic => "Plastic",
            Category::Paper => "Paper",
            Category::Glass => "Glass",
            Category::EWaste => "E-Waste",
        }
    }

    /// Category for an index, wrapping past the end
    pub fn from_index(index: usize) -> Self {
        Self::ALL[index % Self::ALL.len()]
    }
}

/// Unique, monotonically allocated item token
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(pub u32);

/// A falling item
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FallingItem {
    pub id: ItemId,
    pub category: Category,
    /// Horizontal center, percent of playfield width
    pub x: f32,
    /// Vertical position, percent of playfield height (0 = top)
    pub y: f32,
    /// Fall speed, percent of height per reference frame
    pub speed: f32,
}

impl FallingItem {
    /// New item at the top edge
    pub fn new(id: ItemId, category: Category, x: f32, speed: f32) -> Self {
        Self {
            id,
            category,
            x: clamp_percent(x),
            y: 0.0,
            speed,
        }
    }

    #[inline]
    pub fn has_reached(&self, line: f32) -> bool {
        self.y >= line
    }
}

/// The player's bin
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Catcher {
    /// Center, percent of playfield width, always within [0, 100]
    pub x: f32,
    pub half_width: f32,
}

impl Catcher {
    pub fn new(x: f32, half_width: f32) -> Self {
        Self {
            x: clamp_percent(x),
            half_width,
        }
    }

    /// Whether an item at `x` lands in the bin (strictly inside the half-width)
    #[inline]
    pub fn covers(&self, x: f32) -> bool {
        (x - self.x).abs() < self.half_width
    }

    pub fn set_x(&mut self, x: f32) {
        self.x = clamp_percent(x);
    }
}

/// Notable things that happened during a step, drained by the host
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum GameEvent {
    /// A countdown began with this many seconds
    CountdownStarted { seconds: u32 },
    /// One countdown second elapsed
    CountdownTick { remaining: u32 },
    /// Countdown finished, play is live
    Started,
    Spawned { id: ItemId, category: Category },
    Caught { id: ItemId, points: u64 },
    Missed { id: ItemId },
    /// Power-up began and swept this many near-line items
    PowerUpStarted { resolved: u32 },
    PowerUpEnded,
    /// Terminal event, once per completed session
    SessionOver { final_score: u64 },
}

/// Complete session state (deterministic, serializable)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameState {
    pub phase: GamePhase,
    pub score: u64,
    pub miss_count: u32,
    pub countdown_remaining: u32,
    pub power_up: PowerUp,
    /// Live items, sorted by id
    pub items: Vec<FallingItem>,
    pub catcher: Catcher,
    /// Items caught this session (including power-up sweeps)
    pub caught: u32,
    /// Seconds spent in `Active`
    pub elapsed_active: f32,
    /// Next item ID
    next_id: u32,
}

impl GameState {
    /// Fresh idle state
    pub fn new(tuning: &Tuning) -> Self {
        Self {
            phase: GamePhase::Idle,
            score: 0,
            miss_count: 0,
            countdown_remaining: 0,
            power_up: PowerUp::default(),
            items: Vec::new(),
            catcher: Catcher::new(tuning.catcher_start_x, tuning.catcher_half_width),
            caught: 0,
            elapsed_active: 0.0,
            next_id: 1,
        }
    }

    /// Clear everything a (re)start resets. Item ids keep counting so a token
    /// is never reused within one session object.
    pub fn reset_round(&mut self, tuning: &Tuning, phase: GamePhase) {
        let next_id = self.next_id;
        *self = Self::new(tuning);
        self.next_id = next_id;
        self.phase = phase;
        if phase == GamePhase::Countdown {
            self.countdown_remaining = tuning.countdown_secs;
        }
    }

    /// Allocate a new item ID
    pub fn next_item_id(&mut self) -> ItemId {
        let id = ItemId(self.next_id);
        self.next_id += 1;
        id
    }

    pub fn item(&self, id: ItemId) -> Option<&FallingItem> {
        self.items.iter().find(|item| item.id == id)
    }

    /// Check the state invariants that every committed step must uphold
    pub fn check_invariants(&self, tuning: &Tuning) -> Result<()> {
        let fail = |msg: String| Err(Error::InvariantViolation(msg));

        if self.miss_count > tuning.miss_limit {
            return fail(format!(
                "miss_count {} exceeds limit {}",
                self.miss_count, tuning.miss_limit
            ));
        }
        if self.miss_count == tuning.miss_limit && self.phase != GamePhase::Over {
            return fail(format!("miss limit reached in phase {}", self.phase.as_str()));
        }
        if matches!(self.phase, GamePhase::Idle | GamePhase::Countdown) && !self.items.is_empty() {
            return fail(format!(
                "{} live items in phase {}",
                self.items.len(),
                self.phase.as_str()
            ));
        }
        if self.power_up.active != (self.power_up.remaining > 0) {
            return fail(format!(
                "power-up active={} with {}s remaining",
                self.power_up.active, self.power_up.remaining
            ));
        }
        if self.power_up.active && self.phase != GamePhase::Active {
            return fail(format!("power-up running in phase {}", self.phase.as_str()));
        }
        if !(0.0..=100.0).contains(&self.catcher.x) {
            return fail(format!("catcher x {} outside the playfield", self.catcher.x));
        }
        for pair in self.items.windows(2) {
            if pair[0].id >= pair[1].id {
                return fail(format!("item order broken at {:?}", pair[1].id));
            }
        }
        for item in &self.items {
            if !item.y.is_finite() || item.y < 0.0 {
                return fail(format!("item {:?} has bad height {}", item.id, item.y));
            }
            if self.phase == GamePhase::Active && item.has_reached(tuning.capture_line) {
                return fail(format!("item {:?} left unresolved at y={}", item.id, item.y));
            }
        }
        Ok(())
    }
}
