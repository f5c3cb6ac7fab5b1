mod common;
use chrono::{Duration as ChronoDuration, Utc};
use common::{FakeApi, TECH, cache, file_pool, setup_test_db};
use jobtimer::core::connectivity::Connectivity;
use jobtimer::core::offline_queue::OfflineQueue;
use jobtimer::core::sync_engine::{SyncEngine, SyncStatus};
use jobtimer::core::timer_cache::{ActiveTimerCache, Hydration};
use jobtimer::errors::AppError;
use jobtimer::models::{ActionType, ActiveTimer};
use std::time::Duration;

fn cache_on_file(db: &str, api: FakeApi, online: bool) -> ActiveTimerCache<FakeApi> {
    let queue = OfflineQueue::load(file_pool(db)).expect("load queue");
    let engine = SyncEngine::new(api, queue);
    engine.set_online(online);
    ActiveTimerCache::new(TECH, engine)
}

#[tokio::test]
async fn test_start_while_another_job_runs_is_rejected() {
    let mut cache = cache(FakeApi::new(), true);
    cache.start_timer(7, None).await.unwrap();

    let err = cache.start_timer(8, None).await.unwrap_err();
    assert!(matches!(
        err,
        AppError::AlreadyRunning {
            running_job: 7,
            requested_job: 8
        }
    ));
    assert_eq!(cache.active().unwrap().job_id, 7);
    // rejected locally: nothing queued, nothing sent
    assert_eq!(cache.engine().api().calls(), vec![(ActionType::Start, 7)]);
}

#[tokio::test]
async fn test_start_same_job_is_a_no_op() {
    let mut cache = cache(FakeApi::new(), false);
    cache.start_timer(7, None).await.unwrap();

    assert!(cache.start_timer(7, None).await.unwrap().is_none());
    assert_eq!(cache.engine().queue().len(), 1);
}

#[tokio::test]
async fn test_stop_requires_that_job_running() {
    let mut cache = cache(FakeApi::new(), true);
    assert!(matches!(
        cache.stop_timer(7, None).await,
        Err(AppError::NoActiveTimer(7))
    ));

    cache.start_timer(7, None).await.unwrap();
    assert!(matches!(
        cache.stop_timer(8, None).await,
        Err(AppError::NoActiveTimer(8))
    ));
    assert!(cache.is_running());

    let outcome = cache.stop_timer(7, Some("replaced valve".into())).await.unwrap();
    assert!(outcome.confirmed());
    assert_eq!(outcome.action.notes.as_deref(), Some("replaced valve"));
    assert!(!cache.is_running());
}

#[tokio::test]
async fn test_offline_start_then_reconnect() {
    let mut cache = cache(FakeApi::new(), false);

    let outcome = cache.start_timer(7, None).await.unwrap().unwrap();
    assert!(outcome.sync.is_none());
    assert_eq!(cache.active().unwrap().job_id, 7);
    assert_eq!(cache.engine().status(), SyncStatus::QueuedOffline(1));

    let report = cache
        .engine()
        .on_connectivity_change(true, Duration::ZERO, &mut Connectivity::offline())
        .await
        .unwrap();
    assert_eq!(report.sent, vec![outcome.action.id]);
    assert_eq!(cache.engine().api().calls(), vec![(ActionType::Start, 7)]);
    assert_eq!(cache.engine().status(), SyncStatus::Synced);
    assert_eq!(cache.active().unwrap().job_id, 7);
}

#[tokio::test]
async fn test_network_failure_keeps_optimistic_state() {
    let api = FakeApi::new();
    api.fail_times(ActionType::Start, 7, 1);
    let mut cache = cache(api, true);

    let outcome = cache.start_timer(7, None).await.unwrap().unwrap();

    assert!(!outcome.confirmed());
    assert!(cache.is_running());
    assert_eq!(cache.engine().queue().len(), 1);

    let outcome = cache.stop_timer(7, None).await.unwrap();
    // the retried START goes first, then the STOP
    assert!(outcome.confirmed());
    assert!(!cache.is_running());
    assert!(cache.engine().queue().is_empty());
}

#[tokio::test]
async fn test_hydrates_from_server() {
    let started = Utc::now() - ChronoDuration::minutes(10);
    let api = FakeApi::new().with_active(ActiveTimer {
        job_id: 3,
        start_time: started,
        elapsed_seconds: 600,
    });
    let mut cache = cache(api, true);

    assert_eq!(cache.initialize().await, Hydration::Server);

    let elapsed = cache.tick().unwrap();
    assert!((600..605).contains(&elapsed), "elapsed = {}", elapsed);
    assert_eq!(cache.active().unwrap().start_time, started);
}

#[tokio::test]
async fn test_failed_hydration_starts_empty() {
    let mut cache = cache(FakeApi::new().with_failing_active_read(), true);

    let hydration = cache.initialize().await;
    assert!(matches!(hydration, Hydration::Unavailable(_)));
    assert!(!cache.is_running());
    assert_eq!(cache.engine().api().active_reads(), 1);
}

#[tokio::test]
async fn test_offline_hydration_skips_the_read() {
    let mut cache = cache(FakeApi::new(), false);

    assert_eq!(
        cache.initialize().await,
        Hydration::Unavailable("offline".to_string())
    );
    assert_eq!(cache.engine().api().active_reads(), 0);
}

#[tokio::test]
async fn test_restart_projects_pending_actions() {
    let db = setup_test_db("cache_restart");

    let started_at = {
        let mut cache = cache_on_file(&db, FakeApi::new(), false);
        let outcome = cache.start_timer(5, None).await.unwrap().unwrap();
        outcome.action.timestamp
    };

    let mut cache = cache_on_file(&db, FakeApi::new(), false);
    cache.initialize().await;

    let timer = cache.active().expect("projected from the queue");
    assert_eq!(timer.job_id, 5);
    assert_eq!(timer.start_time, started_at);
}

#[tokio::test]
async fn test_pending_stop_overrides_server_timer() {
    let db = setup_test_db("cache_pending_stop");

    {
        let mut cache = cache_on_file(&db, FakeApi::new(), false);
        cache.start_timer(3, None).await.unwrap();
        cache.stop_timer(3, None).await.unwrap();
    }

    // the server has not seen the queued STOP yet
    let api = FakeApi::new().with_active(ActiveTimer::started_at(3, Utc::now()));
    let mut cache = cache_on_file(&db, api, true);

    assert_eq!(cache.initialize().await, Hydration::Server);
    assert!(!cache.is_running());
}

#[tokio::test]
async fn test_tick_never_goes_negative() {
    let mut cache = cache(FakeApi::new(), false);
    assert!(cache.tick().is_none());

    cache.start_timer(1, None).await.unwrap();
    let started = cache.active().unwrap().start_time;

    assert_eq!(cache.tick_at(started - ChronoDuration::seconds(30)), Some(0));
    assert_eq!(cache.tick_at(started + ChronoDuration::seconds(95)), Some(95));
    assert_eq!(cache.active().unwrap().elapsed_seconds, 95);
}

#[test]
fn test_format_elapsed() {
    assert_eq!(ActiveTimerCache::<FakeApi>::format_elapsed(0), "0:00");
    assert_eq!(ActiveTimerCache::<FakeApi>::format_elapsed(95), "1:35");
    assert_eq!(ActiveTimerCache::<FakeApi>::format_elapsed(3_725), "1:02:05");
    assert_eq!(ActiveTimerCache::<FakeApi>::format_elapsed(-4), "0:00");
}
