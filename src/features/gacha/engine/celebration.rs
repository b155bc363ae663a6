use std::sync::Arc;
use std::time::Duration;

use tokio::sync::broadcast;
use tokio::time::{sleep_until, Instant};

use super::GachaEvent;
use crate::features::foods::models::FoodItem;

/// Side effect fired after a commit (confetti on the client)
pub trait Celebration: Send + Sync {
    fn burst(&self, index: usize, offset: Duration, food: &FoodItem) -> anyhow::Result<()>;
}

/// Publishes each burst as a [`GachaEvent::Burst`] for stream subscribers
pub struct BroadcastCelebration {
    events: broadcast::Sender<GachaEvent>,
}

impl BroadcastCelebration {
    pub fn new(events: broadcast::Sender<GachaEvent>) -> Self {
        Self { events }
    }
}

impl Celebration for BroadcastCelebration {
    fn burst(&self, index: usize, offset: Duration, _food: &FoodItem) -> anyhow::Result<()> {
        self.events
            .send(GachaEvent::Burst { index, offset })
            .map_err(|_| anyhow::anyhow!("no stream subscribers"))?;
        Ok(())
    }
}

/// Fire every burst at `committed_at + offset` on a detached task.
///
/// Bursts keep their configured index but fire in offset order. Errors and
/// panics stay inside the task; the committed pick is already published when
/// this runs.
pub(super) fn spawn_bursts(
    celebration: Arc<dyn Celebration>,
    offsets: Vec<Duration>,
    committed_at: Instant,
    food: FoodItem,
) {
    if offsets.is_empty() {
        return;
    }

    let mut schedule: Vec<(usize, Duration)> = offsets.into_iter().enumerate().collect();
    schedule.sort_by_key(|(_, offset)| *offset);

    tokio::spawn(async move {
        for (index, offset) in schedule {
            sleep_until(committed_at + offset).await;
            if let Err(e) = celebration.burst(index, offset, &food) {
                tracing::debug!("Celebration burst {} dropped: {}", index, e);
            }
        }
    });
}
