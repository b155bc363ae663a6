use std::time::Duration;

use crate::features::foods::models::{CategoryFilter, FoodItem};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GachaStatus {
    Idle,
    Running,
}

/// What the engine currently shows
#[derive(Debug, Clone, PartialEq)]
pub struct GachaSnapshot {
    pub status: GachaStatus,
    /// In-progress draws done so far in the running sequence
    pub tick: u32,
    pub max_ticks: u32,
    /// Name flickering on screen while running
    pub preview: Option<String>,
    /// Last committed pick
    pub current: Option<FoodItem>,
    pub eligible_count: usize,
    pub category: CategoryFilter,
}

/// Reply to a start request. Only `Started` changes anything.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StartOutcome {
    Started,
    AlreadyRunning,
    NoEligibleItems,
}

#[derive(Debug, Clone, PartialEq)]
pub enum GachaEvent {
    Started {
        eligible_count: usize,
    },
    Tick {
        tick: u32,
        food: FoodItem,
    },
    Committed {
        food: FoodItem,
    },
    Cancelled,
    /// One celebration burst, `offset` after the commit
    Burst {
        index: usize,
        offset: Duration,
    },
}

impl GachaEvent {
    /// SSE event name
    pub fn name(&self) -> &'static str {
        match self {
            GachaEvent::Started { .. } => "started",
            GachaEvent::Tick { .. } => "tick",
            GachaEvent::Committed { .. } => "committed",
            GachaEvent::Cancelled => "cancelled",
            GachaEvent::Burst { .. } => "burst",
        }
    }
}
