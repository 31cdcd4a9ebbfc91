//! Item spawner
//!
//! Randomness comes only from a `SpawnSource`, so a seed (or a scripted list
//! of rolls) fully determines what falls and when.

use std::collections::VecDeque;

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::schedule::IntervalTimer;
use super::state::{Category, FallingItem, GameEvent, GameState};
use crate::clamp_percent;
use crate::tuning::Tuning;

/// Randomized attributes of one new item
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpawnRoll {
    pub category: Category,
    pub x: f32,
    pub speed: f32,
}

/// Source of spawn rolls
pub trait SpawnSource {
    fn roll(&mut self, tuning: &Tuning) -> SpawnRoll;
}

/// Seeded PCG source: uniform category, x and speed within the tuning bands
#[derive(Debug, Clone)]
pub struct SeededSource {
    seed: u64,
    rng: Pcg32,
}

impl SeededSource {
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
        }
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }
}

impl SpawnSource for SeededSource {
    fn roll(&mut self, tuning: &Tuning) -> SpawnRoll {
        let category = Category::from_index(self.rng.random_range(0..Category::ALL.len()));
        let x = self.rng.random_range(tuning.spawn_x_min..=tuning.spawn_x_max);
        let speed = self.rng.random_range(tuning.speed_min..=tuning.speed_max);
        SpawnRoll { category, x, speed }
    }
}

/// Replays a fixed list of rolls, cycling when it runs out
#[derive(Debug, Clone)]
pub struct ScriptedSource {
    rolls: VecDeque<SpawnRoll>,
}

impl ScriptedSource {
    pub fn new(rolls: impl IntoIterator<Item = SpawnRoll>) -> Self {
        Self {
            rolls: rolls.into_iter().collect(),
        }
    }

    /// The same roll every time
    pub fn repeat(roll: SpawnRoll) -> Self {
        Self::new([roll])
    }
}

impl SpawnSource for ScriptedSource {
    fn roll(&mut self, tuning: &Tuning) -> SpawnRoll {
        match self.rolls.pop_front() {
            Some(roll) => {
                self.rolls.push_back(roll);
                roll
            }
            // Empty script: center of every band
            None => SpawnRoll {
                category: Category::Plastic,
                x: (tuning.spawn_x_min + tuning.spawn_x_max) / 2.0,
                speed: (tuning.speed_min + tuning.speed_max) / 2.0,
            },
        }
    }
}

/// Periodic item creation. Exists only while the session is `Active`;
/// dropping it is what stops spawning.
#[derive(Debug, Clone)]
pub struct Spawner {
    timer: IntervalTimer,
}

impl Spawner {
    pub fn new(tuning: &Tuning) -> Self {
        Self {
            timer: IntervalTimer::new(tuning.spawn_interval_secs),
        }
    }

    /// Advance the spawn clock by `dt` and create one item per elapsed period.
    /// Returns the number of items created.
    pub fn advance<S: SpawnSource + ?Sized>(
        &mut self,
        state: &mut GameState,
        source: &mut S,
        tuning: &Tuning,
        dt: f32,
        events: &mut Vec<GameEvent>,
    ) -> u32 {
        let due = self.timer.advance(dt);
        for _ in 0..due {
            let roll = source.roll(tuning);
            let speed = if roll.speed.is_finite() && roll.speed > 0.0 {
                roll.speed
            } else {
                tuning.speed_min
            };
            let id = state.next_item_id();
            let item = FallingItem::new(id, roll.category, clamp_percent(roll.x), speed);
            log::debug!(
                "Spawned {:?} {} at x={:.1} speed={:.3}",
                id,
                roll.category.label(),
                item.x,
                item.speed
            );
            state.items.push(item);
            events.push(GameEvent::Spawned {
                id,
                category: roll.category,
            });
        }
        due
    }
}
