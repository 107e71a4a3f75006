//! Periodic refresh of the signed-in user's workouts.
//!
//! Every tick re-reads the current user's workouts and publishes a
//! [`SyncEvent`]. Nobody has to listen; events sent with no subscriber are
//! dropped.

use async_trait::async_trait;
use log::{debug, info, warn};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{broadcast, watch};
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

use crate::db::workouts::WorkoutRepository;
use crate::errors::PersistenceError;
use crate::models::user::User;
use crate::models::workout::Workout;

/// Written by login, read by the sync loop.
pub type CurrentUser = watch::Sender<Option<User>>;

const EVENT_CAPACITY: usize = 16;

#[async_trait]
pub trait WorkoutFeed: Send + Sync + 'static {
    async fn workouts_for(&self, user_id: i32) -> Result<Vec<Workout>, PersistenceError>;
}

#[async_trait]
impl WorkoutFeed for WorkoutRepository {
    async fn workouts_for(&self, user_id: i32) -> Result<Vec<Workout>, PersistenceError> {
        self.find_by_user_id(user_id).await
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum SyncEvent {
    Fetched { user_id: i32, email: String, count: usize },
    Failed { user_id: i32, email: String, message: String },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SyncSchedule {
    pub initial_delay: Duration,
    pub period: Duration,
}

impl Default for SyncSchedule {
    fn default() -> Self {
        Self {
            initial_delay: Duration::from_secs(10),
            period: Duration::from_secs(20),
        }
    }
}

pub struct AutoSync {
    events: broadcast::Sender<SyncEvent>,
    cancel: CancellationToken,
    handle: JoinHandle<()>,
}

impl AutoSync {
    pub fn spawn<F: WorkoutFeed>(
        feed: Arc<F>,
        current_user: watch::Receiver<Option<User>>,
        schedule: SyncSchedule,
    ) -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        let cancel = CancellationToken::new();
        let handle = tokio::spawn(run(feed, current_user, schedule, events.clone(), cancel.clone()));
        Self { events, cancel, handle }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<SyncEvent> {
        self.events.subscribe()
    }

    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    /// Cancels the loop and waits for it to exit.
    pub async fn shutdown(self) {
        self.cancel.cancel();
        if let Err(e) = self.handle.await {
            warn!("Auto-sync task ended abnormally: {}", e);
        }
    }
}

async fn run<F: WorkoutFeed>(
    feed: Arc<F>,
    current_user: watch::Receiver<Option<User>>,
    schedule: SyncSchedule,
    events: broadcast::Sender<SyncEvent>,
    cancel: CancellationToken,
) {
    let period = schedule.period.max(Duration::from_millis(1));
    let mut ticker = interval_at(Instant::now() + schedule.initial_delay, period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                debug!("Auto-sync stopped");
                return;
            }
            _ = ticker.tick() => {}
        }

        let user = current_user.borrow().clone();
        let Some(user) = user else {
            continue;
        };

        let event = match feed.workouts_for(user.id).await {
            Ok(workouts) => {
                info!("Auto-sync: fetched {} workouts for user {}", workouts.len(), user.email);
                SyncEvent::Fetched {
                    user_id: user.id,
                    email: user.email,
                    count: workouts.len(),
                }
            }
            Err(e) => {
                warn!("Auto-sync failed: {}", e);
                SyncEvent::Failed {
                    user_id: user.id,
                    email: user.email,
                    message: e.to_string(),
                }
            }
        };
        let _ = events.send(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use tokio::sync::broadcast::error::TryRecvError;

    struct FixedFeed {
        workouts: usize,
        fail: bool,
    }

    #[async_trait]
    impl WorkoutFeed for FixedFeed {
        async fn workouts_for(&self, user_id: i32) -> Result<Vec<Workout>, PersistenceError> {
            if self.fail {
                return Err(PersistenceError::Connection("refused".to_string()));
            }
            let day = NaiveDate::from_ymd_opt(2025, 12, 1).unwrap();
            Ok((0..self.workouts)
                .map(|i| Workout {
                    workout_id: i as i32,
                    user_id,
                    workout_type: "Cardio".to_string(),
                    duration_minutes: 30,
                    calories_burned: 200,
                    workout_date: day,
                })
                .collect())
        }
    }

    fn ann() -> User {
        User {
            id: 7,
            name: "Ann".to_string(),
            email: "ann@x.com".to_string(),
            age: None,
            height_cm: None,
            weight_kg: None,
            membership_type: None,
            created_at: NaiveDate::from_ymd_opt(2025, 12, 1).unwrap().and_hms_opt(9, 0, 0).unwrap(),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn publishes_workout_count_for_current_user() {
        let (_tx, rx) = watch::channel(Some(ann()));
        let sync = AutoSync::spawn(Arc::new(FixedFeed { workouts: 2, fail: false }), rx, SyncSchedule::default());
        let mut events = sync.subscribe();

        let event = events.recv().await.unwrap();
        assert_eq!(
            event,
            SyncEvent::Fetched { user_id: 7, email: "ann@x.com".to_string(), count: 2 }
        );
        sync.shutdown().await;
    }

    #[tokio::test(start_paused = true)]
    async fn stays_quiet_until_someone_logs_in() {
        let (tx, rx) = watch::channel(None);
        let sync = AutoSync::spawn(Arc::new(FixedFeed { workouts: 1, fail: false }), rx, SyncSchedule::default());
        let mut events = sync.subscribe();

        tokio::time::sleep(Duration::from_secs(35)).await;
        assert_eq!(events.try_recv(), Err(TryRecvError::Empty));

        tx.send_replace(Some(ann()));
        let event = events.recv().await.unwrap();
        assert!(matches!(event, SyncEvent::Fetched { count: 1, .. }));
        sync.shutdown().await;
    }

    #[tokio::test(start_paused = true)]
    async fn reports_fetch_failures_as_events() {
        let (_tx, rx) = watch::channel(Some(ann()));
        let sync = AutoSync::spawn(Arc::new(FixedFeed { workouts: 0, fail: true }), rx, SyncSchedule::default());
        let mut events = sync.subscribe();

        match events.recv().await.unwrap() {
            SyncEvent::Failed { user_id, message, .. } => {
                assert_eq!(user_id, 7);
                assert!(message.contains("refused"));
            }
            other => panic!("unexpected event {:?}", other),
        }
        sync.shutdown().await;
    }

    #[tokio::test(start_paused = true)]
    async fn cancellation_stops_the_loop() {
        let (_tx, rx) = watch::channel(Some(ann()));
        let sync = AutoSync::spawn(Arc::new(FixedFeed { workouts: 1, fail: false }), rx, SyncSchedule::default());
        let mut events = sync.subscribe();

        sync.cancel();
        tokio::time::sleep(Duration::from_secs(60)).await;
        assert_eq!(events.try_recv(), Err(TryRecvError::Empty));
        sync.shutdown().await;
    }
}
