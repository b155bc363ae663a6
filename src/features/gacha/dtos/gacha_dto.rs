use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::features::foods::dtos::FoodResponseDto;
use crate::features::gacha::engine::{GachaEvent, GachaSnapshot, GachaStatus, StartOutcome};
use crate::shared::constants::{CATEGORY_ALL, FOOD_CATEGORIES};

/// Query params for selecting a category
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
pub struct CategoryQuery {
    /// Exact category label, or "ALL" (default)
    pub category: Option<String>,
}

/// Request DTO for changing the active category
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SetCategoryDto {
    /// Exact category label, or "ALL"
    pub category: String,
}

/// Available category selectors
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CategoryOptionsDto {
    /// Sentinel that selects every category
    pub all: String,
    pub categories: Vec<String>,
}

impl Default for CategoryOptionsDto {
    fn default() -> Self {
        Self {
            all: CATEGORY_ALL.to_string(),
            categories: FOOD_CATEGORIES.iter().map(|c| c.to_string()).collect(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum GachaStatusDto {
    Idle,
    Running,
}

impl From<GachaStatus> for GachaStatusDto {
    fn from(status: GachaStatus) -> Self {
        match status {
            GachaStatus::Idle => GachaStatusDto::Idle,
            GachaStatus::Running => GachaStatusDto::Running,
        }
    }
}

/// Response DTO for the gacha state
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct GachaStateDto {
    pub status: GachaStatusDto,
    pub tick: u32,
    pub max_ticks: u32,
    /// Name shown while the sequence runs
    pub preview: Option<String>,
    /// Last committed pick
    pub current: Option<FoodResponseDto>,
    pub category: String,
    pub eligible_count: usize,
    pub total_count: usize,
    /// Text the reveal box should show
    pub display_name: String,
}

impl GachaStateDto {
    pub fn new(snapshot: GachaSnapshot, total_count: usize) -> Self {
        let display_name = display_name(&snapshot, total_count);
        Self {
            status: snapshot.status.into(),
            tick: snapshot.tick,
            max_ticks: snapshot.max_ticks,
            preview: snapshot.preview,
            current: snapshot.current.map(|f| f.into()),
            category: snapshot.category.to_string(),
            eligible_count: snapshot.eligible_count,
            total_count,
            display_name,
        }
    }
}

fn display_name(snapshot: &GachaSnapshot, total_count: usize) -> String {
    let current = snapshot.current.as_ref().map(|f| f.name.clone());

    if total_count == 0 {
        "Belum ada data makanan di database".to_string()
    } else if snapshot.eligible_count == 0 {
        "Tidak ada makanan untuk kategori ini".to_string()
    } else if snapshot.status == GachaStatus::Running {
        snapshot
            .preview
            .clone()
            .or(current)
            .unwrap_or_else(|| "...".to_string())
    } else {
        current.unwrap_or_else(|| "Belum ada pilihan".to_string())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum SpinOutcomeDto {
    Started,
    AlreadyRunning,
    NoEligibleItems,
}

/// Response DTO for a spin request
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SpinResponseDto {
    pub started: bool,
    pub outcome: SpinOutcomeDto,
}

impl From<StartOutcome> for SpinResponseDto {
    fn from(outcome: StartOutcome) -> Self {
        let outcome = match outcome {
            StartOutcome::Started => SpinOutcomeDto::Started,
            StartOutcome::AlreadyRunning => SpinOutcomeDto::AlreadyRunning,
            StartOutcome::NoEligibleItems => SpinOutcomeDto::NoEligibleItems,
        };
        Self {
            started: outcome == SpinOutcomeDto::Started,
            outcome,
        }
    }
}

/// Response DTO for a cancel request
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CancelResponseDto {
    pub cancelled: bool,
}

/// Payload of one SSE event
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum GachaEventDto {
    Started {
        #[serde(rename = "eligibleCount")]
        eligible_count: usize,
    },
    Tick {
        tick: u32,
        name: String,
    },
    Committed {
        food: FoodResponseDto,
    },
    Cancelled,
    Burst {
        index: usize,
        #[serde(rename = "offsetMs")]
        offset_ms: u64,
    },
}

impl From<GachaEvent> for GachaEventDto {
    fn from(event: GachaEvent) -> Self {
        match event {
            GachaEvent::Started { eligible_count } => GachaEventDto::Started { eligible_count },
            GachaEvent::Tick { tick, food } => GachaEventDto::Tick {
                tick,
                name: food.name,
            },
            GachaEvent::Committed { food } => GachaEventDto::Committed { food: food.into() },
            GachaEvent::Cancelled => GachaEventDto::Cancelled,
            GachaEvent::Burst { index, offset } => GachaEventDto::Burst {
                index,
                offset_ms: offset.as_millis() as u64,
            },
        }
    }
}
