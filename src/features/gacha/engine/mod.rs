//! Timed reveal sequencer.
//!
//! A start request moves the engine from `Idle` to `Running`. While running,
//! every tick draws one random eligible item and publishes its name. After
//! `max_ticks` draws an independent final draw is committed, the celebration
//! fires and the engine returns to `Idle`. Draws are uniform and with
//! replacement; the `weight` field is not consulted.

mod celebration;
mod state;

use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use tokio::sync::{broadcast, watch};
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};

use crate::core::config::GachaConfig;
use crate::features::foods::models::{CategoryFilter, FoodItem};

pub use celebration::{BroadcastCelebration, Celebration};
pub use state::{GachaEvent, GachaSnapshot, GachaStatus, StartOutcome};

const EVENT_CHANNEL_CAPACITY: usize = 64;

/// Cloneable handle to one engine instance
#[derive(Clone)]
pub struct GachaEngine {
    inner: Arc<EngineInner>,
}

struct EngineInner {
    config: GachaConfig,
    state: Mutex<EngineState>,
    snapshot: watch::Sender<GachaSnapshot>,
    events: broadcast::Sender<GachaEvent>,
    celebration: Arc<dyn Celebration>,
}

struct EngineState {
    eligible: Vec<FoodItem>,
    category: CategoryFilter,
    rng: StdRng,
    run: Option<Run>,
    next_run_id: u64,
    tick: u32,
    preview: Option<String>,
    current: Option<FoodItem>,
}

/// The running sequence's timer task
struct Run {
    id: u64,
    task: JoinHandle<()>,
}

impl GachaEngine {
    /// Engine with an entropy-seeded RNG that publishes bursts on its event stream
    pub fn new(config: GachaConfig) -> Self {
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        let celebration = Arc::new(BroadcastCelebration::new(events.clone()));
        Self::build(config, StdRng::from_entropy(), events, celebration)
    }

    /// Engine with a caller-provided RNG and celebration
    #[allow(dead_code)]
    pub fn with_parts(
        config: GachaConfig,
        rng: StdRng,
        celebration: Arc<dyn Celebration>,
    ) -> Self {
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self::build(config, rng, events, celebration)
    }

    fn build(
        config: GachaConfig,
        rng: StdRng,
        events: broadcast::Sender<GachaEvent>,
        celebration: Arc<dyn Celebration>,
    ) -> Self {
        let state = EngineState {
            eligible: Vec::new(),
            category: CategoryFilter::All,
            rng,
            run: None,
            next_run_id: 0,
            tick: 0,
            preview: None,
            current: None,
        };
        let (snapshot, _) = watch::channel(state.snapshot(config.max_ticks));

        Self {
            inner: Arc::new(EngineInner {
                config,
                state: Mutex::new(state),
                snapshot,
                events,
                celebration,
            }),
        }
    }

    /// Replace the eligible set. An empty set cancels a running sequence.
    pub fn set_eligible(&self, category: CategoryFilter, items: Vec<FoodItem>) {
        let mut state = self.inner.lock();
        state.eligible = items;
        state.category = category;

        if state.eligible.is_empty() && state.run.is_some() {
            tracing::info!("Eligible set emptied, cancelling gacha sequence");
            self.inner.cancel_locked(&mut state);
        }

        self.inner.publish(&state);
    }

    pub fn category(&self) -> CategoryFilter {
        self.inner.lock().category.clone()
    }

    /// Begin a sequence. Starting while running or with nothing to draw is a no-op.
    pub fn start(&self) -> StartOutcome {
        let mut state = self.inner.lock();

        if state.run.is_some() {
            return StartOutcome::AlreadyRunning;
        }
        if state.eligible.is_empty() {
            return StartOutcome::NoEligibleItems;
        }

        state.next_run_id += 1;
        let run_id = state.next_run_id;
        state.tick = 0;
        state.preview = None;

        let task = tokio::spawn(run_sequence(
            Arc::downgrade(&self.inner),
            run_id,
            self.inner.config.tick_interval,
        ));
        state.run = Some(Run { id: run_id, task });

        let eligible_count = state.eligible.len();
        tracing::debug!(
            "Gacha sequence {} started over {} items",
            run_id,
            eligible_count
        );
        let _ = self
            .inner
            .events
            .send(GachaEvent::Started { eligible_count });
        self.inner.publish(&state);

        StartOutcome::Started
    }

    /// Stop a running sequence without committing. Returns whether one was running.
    pub fn cancel(&self) -> bool {
        let mut state = self.inner.lock();
        let cancelled = self.inner.cancel_locked(&mut state);
        if cancelled {
            self.inner.publish(&state);
        }
        cancelled
    }

    pub fn snapshot(&self) -> GachaSnapshot {
        self.inner.snapshot.borrow().clone()
    }

    #[allow(dead_code)]
    pub fn subscribe(&self) -> watch::Receiver<GachaSnapshot> {
        self.inner.snapshot.subscribe()
    }

    pub fn subscribe_events(&self) -> broadcast::Receiver<GachaEvent> {
        self.inner.events.subscribe()
    }
}

impl EngineInner {
    fn lock(&self) -> MutexGuard<'_, EngineState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn publish(&self, state: &EngineState) {
        self.snapshot
            .send_replace(state.snapshot(self.config.max_ticks));
    }

    fn cancel_locked(&self, state: &mut EngineState) -> bool {
        let Some(run) = state.run.take() else {
            return false;
        };

        run.task.abort();
        state.tick = 0;
        state.preview = None;
        tracing::debug!("Gacha sequence {} cancelled", run.id);
        let _ = self.events.send(GachaEvent::Cancelled);
        true
    }

    /// One timer tick. Returns false once the sequence is over.
    fn on_tick(&self, run_id: u64) -> bool {
        let mut guard = self.lock();
        let state = &mut *guard;

        if state.run.as_ref().map(|r| r.id) != Some(run_id) {
            return false;
        }

        let Some(pick) = state.eligible.choose(&mut state.rng).cloned() else {
            self.cancel_locked(state);
            self.publish(state);
            return false;
        };

        state.tick += 1;
        state.preview = Some(pick.name.clone());
        let _ = self.events.send(GachaEvent::Tick {
            tick: state.tick,
            food: pick,
        });

        if state.tick < self.config.max_ticks {
            self.publish(state);
            return true;
        }

        // The last preview is not reused: the commit is a draw of its own
        let Some(chosen) = state.eligible.choose(&mut state.rng).cloned() else {
            self.cancel_locked(state);
            self.publish(state);
            return false;
        };

        // Dropping the handle detaches this task; it ends when we return
        state.run = None;
        state.tick = 0;
        state.preview = None;
        state.current = Some(chosen.clone());

        tracing::info!("Gacha committed: id={}, name={:?}", chosen.id, chosen.name);
        let _ = self.events.send(GachaEvent::Committed {
            food: chosen.clone(),
        });
        self.publish(state);
        drop(guard);

        celebration::spawn_bursts(
            Arc::clone(&self.celebration),
            self.config.burst_offsets.clone(),
            Instant::now(),
            chosen,
        );

        false
    }
}

impl Drop for EngineInner {
    fn drop(&mut self) {
        let state = self.state.get_mut().unwrap_or_else(PoisonError::into_inner);
        if let Some(run) = state.run.take() {
            run.task.abort();
        }
    }
}

impl EngineState {
    fn snapshot(&self, max_ticks: u32) -> GachaSnapshot {
        GachaSnapshot {
            status: if self.run.is_some() {
                GachaStatus::Running
            } else {
                GachaStatus::Idle
            },
            tick: self.tick,
            max_ticks,
            preview: self.preview.clone(),
            current: self.current.clone(),
            eligible_count: self.eligible.len(),
            category: self.category.clone(),
        }
    }
}

async fn run_sequence(engine: Weak<EngineInner>, run_id: u64, period: std::time::Duration) {
    let mut ticker = interval_at(Instant::now() + period, period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        ticker.tick().await;

        let Some(engine) = engine.upgrade() else {
            return;
        };
        if !engine.on_tick(run_id) {
            return;
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use tokio::time::sleep;

    use super::*;
    use crate::shared::test_helpers::{food, random_food};

    const TICK: Duration = Duration::from_millis(80);

    #[derive(Default)]
    struct RecordingCelebration {
        bursts: Mutex<Vec<(usize, Instant)>>,
    }

    impl Celebration for RecordingCelebration {
        fn burst(&self, index: usize, _offset: Duration, _food: &FoodItem) -> anyhow::Result<()> {
            self.bursts.lock().unwrap().push((index, Instant::now()));
            Ok(())
        }
    }

    struct FailingCelebration;

    impl Celebration for FailingCelebration {
        fn burst(&self, _index: usize, _offset: Duration, _food: &FoodItem) -> anyhow::Result<()> {
            anyhow::bail!("confetti cannon jammed")
        }
    }

    fn engine_with(celebration: Arc<dyn Celebration>) -> GachaEngine {
        engine_with_config(GachaConfig::default(), celebration)
    }

    fn engine_with_config(config: GachaConfig, celebration: Arc<dyn Celebration>) -> GachaEngine {
        GachaEngine::with_parts(config, StdRng::seed_from_u64(42), celebration)
    }

    fn drain(rx: &mut broadcast::Receiver<GachaEvent>) -> Vec<GachaEvent> {
        let mut events = Vec::new();
        while let Ok(event) = rx.try_recv() {
            events.push(event);
        }
        events
    }

    /// Let spawned tasks run at the current (paused) instant
    async fn settle() {
        for _ in 0..10 {
            tokio::task::yield_now().await;
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_two_item_scenario() {
        let recorder = Arc::new(RecordingCelebration::default());
        let engine = engine_with(recorder.clone());
        let items = vec![food("A", None, true), food("B", None, true)];
        engine.set_eligible(CategoryFilter::All, items);

        let started_at = Instant::now();
        assert_eq!(engine.start(), StartOutcome::Started);
        assert_eq!(engine.snapshot().status, GachaStatus::Running);

        sleep(TICK * 15).await;
        settle().await;

        let snapshot = engine.snapshot();
        assert_eq!(snapshot.status, GachaStatus::Idle);
        let name = snapshot.current.expect("committed pick").name;
        assert!(name == "A" || name == "B");

        sleep(Duration::from_millis(600)).await;
        settle().await;

        let committed_at = started_at + TICK * 15;
        let bursts = recorder.bursts.lock().unwrap().clone();
        let offsets: Vec<(usize, Duration)> = bursts
            .iter()
            .map(|(i, at)| (*i, at.duration_since(committed_at)))
            .collect();
        assert_eq!(
            offsets,
            vec![
                (0, Duration::ZERO),
                (1, Duration::from_millis(250)),
                (2, Duration::from_millis(500)),
            ]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_unordered_burst_offsets_fire_on_time() {
        let recorder = Arc::new(RecordingCelebration::default());
        let config = GachaConfig {
            tick_interval: TICK,
            max_ticks: 1,
            burst_offsets: vec![
                Duration::from_millis(500),
                Duration::from_millis(250),
                Duration::ZERO,
            ],
        };
        let engine = engine_with_config(config, recorder.clone());
        engine.set_eligible(CategoryFilter::All, vec![food("A", None, true)]);

        let started_at = Instant::now();
        engine.start();
        sleep(TICK + Duration::from_millis(600)).await;
        settle().await;

        let committed_at = started_at + TICK;
        let mut offsets: Vec<(usize, Duration)> = recorder
            .bursts
            .lock()
            .unwrap()
            .iter()
            .map(|(i, at)| (*i, at.duration_since(committed_at)))
            .collect();
        offsets.sort();
        assert_eq!(
            offsets,
            vec![
                (0, Duration::from_millis(500)),
                (1, Duration::from_millis(250)),
                (2, Duration::ZERO),
            ]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_fifteen_draws_then_one_commit() {
        let engine = engine_with(Arc::new(RecordingCelebration::default()));
        let items: Vec<FoodItem> = (0..5).map(|_| random_food(Some("Cemilan"))).collect();
        engine.set_eligible(CategoryFilter::Category("Cemilan".into()), items.clone());
        let mut rx = engine.subscribe_events();

        engine.start();
        sleep(TICK * 20).await;
        settle().await;

        let events = drain(&mut rx);
        let ticks: Vec<&GachaEvent> = events
            .iter()
            .filter(|e| matches!(e, GachaEvent::Tick { .. }))
            .collect();
        let commits: Vec<&GachaEvent> = events
            .iter()
            .filter(|e| matches!(e, GachaEvent::Committed { .. }))
            .collect();

        assert_eq!(ticks.len(), 15);
        assert_eq!(commits.len(), 1);
        assert!(matches!(events.first(), Some(GachaEvent::Started { eligible_count: 5 })));

        // every draw comes from the eligible set
        for event in ticks.iter().chain(commits.iter()) {
            let drawn = match event {
                GachaEvent::Tick { food, .. } | GachaEvent::Committed { food } => food,
                _ => unreachable!(),
            };
            assert!(items.contains(drawn));
        }

        // the commit follows the last tick
        let last_tick = events
            .iter()
            .rposition(|e| matches!(e, GachaEvent::Tick { .. }))
            .unwrap();
        let commit = events
            .iter()
            .position(|e| matches!(e, GachaEvent::Committed { .. }))
            .unwrap();
        assert!(commit > last_tick);
        assert_eq!(engine.snapshot().status, GachaStatus::Idle);
    }

    #[tokio::test(start_paused = true)]
    async fn test_preview_tracks_ticks() {
        let engine = engine_with(Arc::new(RecordingCelebration::default()));
        engine.set_eligible(CategoryFilter::All, vec![food("Soto", None, true)]);

        engine.start();
        sleep(TICK * 3).await;
        settle().await;

        let snapshot = engine.snapshot();
        assert_eq!(snapshot.status, GachaStatus::Running);
        assert_eq!(snapshot.tick, 3);
        assert_eq!(snapshot.preview.as_deref(), Some("Soto"));
        assert!(snapshot.current.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_start_with_empty_set_is_noop() {
        let recorder = Arc::new(RecordingCelebration::default());
        let engine = engine_with(recorder.clone());
        let mut rx = engine.subscribe_events();

        assert_eq!(engine.start(), StartOutcome::NoEligibleItems);

        sleep(TICK * 20).await;
        settle().await;

        let snapshot = engine.snapshot();
        assert_eq!(snapshot.status, GachaStatus::Idle);
        assert!(snapshot.preview.is_none());
        assert!(snapshot.current.is_none());
        assert!(drain(&mut rx).is_empty());
        assert!(recorder.bursts.lock().unwrap().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_start_while_running_is_noop() {
        let engine = engine_with(Arc::new(RecordingCelebration::default()));
        engine.set_eligible(
            CategoryFilter::All,
            vec![food("A", None, true), food("B", None, true)],
        );
        let mut rx = engine.subscribe_events();

        assert_eq!(engine.start(), StartOutcome::Started);
        sleep(TICK * 5).await;
        settle().await;
        assert_eq!(engine.start(), StartOutcome::AlreadyRunning);
        assert_eq!(engine.snapshot().tick, 5);

        // the first sequence still commits at its own 15th tick
        sleep(TICK * 10).await;
        settle().await;
        assert_eq!(engine.snapshot().status, GachaStatus::Idle);
        assert!(engine.snapshot().current.is_some());

        let events = drain(&mut rx);
        let starts = events
            .iter()
            .filter(|e| matches!(e, GachaEvent::Started { .. }))
            .count();
        let ticks = events
            .iter()
            .filter(|e| matches!(e, GachaEvent::Tick { .. }))
            .count();
        assert_eq!(starts, 1);
        assert_eq!(ticks, 15);
    }

    #[tokio::test(start_paused = true)]
    async fn test_emptying_eligible_set_cancels_without_commit() {
        let recorder = Arc::new(RecordingCelebration::default());
        let engine = engine_with(recorder.clone());
        engine.set_eligible(CategoryFilter::All, vec![food("A", None, true)]);
        let mut rx = engine.subscribe_events();

        engine.start();
        sleep(TICK * 4).await;
        settle().await;

        engine.set_eligible(CategoryFilter::Category("Minuman".into()), vec![]);
        let snapshot = engine.snapshot();
        assert_eq!(snapshot.status, GachaStatus::Idle);
        assert!(snapshot.preview.is_none());

        sleep(TICK * 20).await;
        settle().await;

        let events = drain(&mut rx);
        assert!(events.contains(&GachaEvent::Cancelled));
        assert!(!events
            .iter()
            .any(|e| matches!(e, GachaEvent::Committed { .. })));
        assert!(engine.snapshot().current.is_none());
        assert!(recorder.bursts.lock().unwrap().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_draws_follow_eligible_set_changes() {
        let engine = engine_with(Arc::new(RecordingCelebration::default()));
        engine.set_eligible(CategoryFilter::All, vec![food("Lama", None, true)]);
        let mut rx = engine.subscribe_events();

        engine.start();
        sleep(TICK * 2).await;
        settle().await;

        let replacement = food("Baru", None, true);
        engine.set_eligible(CategoryFilter::All, vec![replacement.clone()]);
        sleep(TICK * 13).await;
        settle().await;

        let events = drain(&mut rx);
        let names: Vec<String> = events
            .iter()
            .filter_map(|e| match e {
                GachaEvent::Tick { food, .. } => Some(food.name.clone()),
                _ => None,
            })
            .collect();
        assert_eq!(names.len(), 15);
        assert!(names[..2].iter().all(|n| n == "Lama"));
        assert!(names[2..].iter().all(|n| n == "Baru"));
        assert_eq!(engine.snapshot().current, Some(replacement));
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_stops_sequence() {
        let engine = engine_with(Arc::new(RecordingCelebration::default()));
        engine.set_eligible(CategoryFilter::All, vec![food("A", None, true)]);

        assert!(!engine.cancel());
        engine.start();
        sleep(TICK * 2).await;
        settle().await;

        assert!(engine.cancel());
        assert_eq!(engine.snapshot().status, GachaStatus::Idle);

        sleep(TICK * 20).await;
        settle().await;
        assert!(engine.snapshot().current.is_none());

        // a fresh sequence can start afterwards
        assert_eq!(engine.start(), StartOutcome::Started);
    }

    #[tokio::test(start_paused = true)]
    async fn test_dropping_engine_cancels_sequence() {
        let recorder = Arc::new(RecordingCelebration::default());
        let engine = engine_with(recorder.clone());
        engine.set_eligible(CategoryFilter::All, vec![food("A", None, true)]);
        let snapshots = engine.subscribe();

        engine.start();
        sleep(TICK * 2).await;
        settle().await;
        drop(engine);

        sleep(TICK * 20).await;
        settle().await;

        assert!(snapshots.borrow().current.is_none());
        assert!(recorder.bursts.lock().unwrap().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_failing_celebration_keeps_commit() {
        let engine = engine_with(Arc::new(FailingCelebration));
        engine.set_eligible(CategoryFilter::All, vec![food("A", None, true)]);

        engine.start();
        sleep(TICK * 15 + Duration::from_millis(600)).await;
        settle().await;

        let snapshot = engine.snapshot();
        assert_eq!(snapshot.status, GachaStatus::Idle);
        assert_eq!(snapshot.current.map(|f| f.name), Some("A".to_string()));
    }

    #[tokio::test(start_paused = true)]
    async fn test_default_engine_broadcasts_bursts() {
        let engine = GachaEngine::new(GachaConfig::default());
        engine.set_eligible(CategoryFilter::All, vec![food("A", None, true)]);
        let mut rx = engine.subscribe_events();

        engine.start();
        sleep(TICK * 15 + Duration::from_millis(600)).await;
        settle().await;

        let bursts: Vec<usize> = drain(&mut rx)
            .into_iter()
            .filter_map(|e| match e {
                GachaEvent::Burst { index, .. } => Some(index),
                _ => None,
            })
            .collect();
        assert_eq!(bursts, vec![0, 1, 2]);
    }
}
