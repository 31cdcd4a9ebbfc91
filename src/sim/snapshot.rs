//! Read-only view of a session for renderers and HUDs

use serde::Serialize;

use super::powerup::PowerUp;
use super::state::{Category, GamePhase, GameState, ItemId};
use crate::error::Result;
use crate::tuning::Tuning;

/// One live item as a renderer sees it
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EntityView {
    pub id: ItemId,
    pub category: Category,
    pub x: f32,
    pub y: f32,
}

/// Everything a presentation layer needs for one frame
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Snapshot {
    pub phase: GamePhase,
    pub score: u64,
    pub miss_count: u32,
    pub miss_limit: u32,
    pub countdown_remaining: u32,
    pub power_up: PowerUp,
    pub entities: Vec<EntityView>,
    pub catcher_x: f32,
    pub catcher_half_width: f32,
    pub dragging: bool,
    pub caught: u32,
    pub faulted: bool,
}

impl Snapshot {
    pub fn capture(state: &GameState, tuning: &Tuning, dragging: bool, faulted: bool) -> Self {
        Self {
            phase: state.phase,
            score: state.score,
            miss_count: state.miss_count,
            miss_limit: tuning.miss_limit,
            countdown_remaining: state.countdown_remaining,
            power_up: state.power_up,
            entities: state
                .items
                .iter()
                .map(|item| EntityView {
                    id: item.id,
                    category: item.category,
                    x: item.x,
                    y: item.y,
                })
                .collect(),
            catcher_x: state.catcher.x,
            catcher_half_width: state.catcher.half_width,
            dragging,
            caught: state.caught,
            faulted,
        }
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}
