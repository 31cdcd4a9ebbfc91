//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Randomness only through a `SpawnSource`
//! - Time only through frame deltas and the one-second ticker
//! - Stable iteration order (by item ID)
//! - No rendering, storage or platform dependencies

pub mod capture;
pub mod input;
pub mod motion;
pub mod powerup;
pub mod schedule;
pub mod session;
pub mod snapshot;
pub mod spawn;
pub mod state;
pub mod tick;


pub use capture::{CaptureReport, Outcome, classify, sweep_near};
pub use input::{DragState, PlayfieldRect};
pub use powerup::PowerUp;
pub use schedule::{IntervalTimer, Schedule, TaskHandle, TaskKind};
pub use session::{Session, TickResult};
pub use snapshot::{EntityView, Snapshot};
pub use spawn::{ScriptedSource, SeededSource, SpawnRoll, SpawnSource, Spawner};
pub use state::{Catcher, Category, FallingItem, GameEvent, GamePhase, GameState, ItemId};
pub use tick::{FrameReport, SecondOutcome, tick_frame, tick_second};
