#![allow(dead_code)]
use assert_cmd::{Command, cargo_bin_cmd};
use jobtimer::api::TimerApi;
use jobtimer::core::offline_queue::OfflineQueue;
use jobtimer::core::sync_engine::SyncEngine;
use jobtimer::core::timer_cache::ActiveTimerCache;
use jobtimer::db::initialize::init_db;
use jobtimer::db::pool::DbPool;
use jobtimer::errors::{AppError, AppResult};
use jobtimer::models::{ActionType, ActiveTimer, TimerEntry};
use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::env;
use std::fs;
use std::path::PathBuf;

pub const TECH: &str = "Dana";

pub fn jt() -> Command {
    cargo_bin_cmd!("jobtimer")
}

/// Create a unique test DB path inside the system temp dir and remove any existing file
pub fn setup_test_db(name: &str) -> String {
    let mut path: PathBuf = env::temp_dir();
    path.push(format!("{}_jobtimer.sqlite", name));
    let db_path = path.to_string_lossy().to_string();
    fs::remove_file(&db_path).ok();
    db_path
}

/// Create a temporary output file path inside tempdir and ensure it's removed
pub fn temp_out(name: &str, ext: &str) -> String {
    let mut path: PathBuf = env::temp_dir();
    path.push(format!("{}_out.{}", name, ext));
    let p = path.to_string_lossy().to_string();
    fs::remove_file(&p).ok();
    p
}

pub fn memory_pool() -> DbPool {
    let pool = DbPool::in_memory().expect("open in-memory db");
    init_db(&pool.conn).expect("init db");
    pool
}

pub fn file_pool(path: &str) -> DbPool {
    let pool = DbPool::new(path).expect("open db file");
    init_db(&pool.conn).expect("init db");
    pool
}

pub fn memory_queue() -> OfflineQueue {
    OfflineQueue::load(memory_pool()).expect("load queue")
}

/// Scripted stand-in for the timer server.
///
/// Every call is recorded. `fail_times` makes the next N calls of one
/// (type, job) pair fail with a network error.
#[derive(Default)]
pub struct FakeApi {
    calls: RefCell<Vec<(ActionType, i64)>>,
    failures: RefCell<HashMap<(ActionType, i64), u32>>,
    active: RefCell<Option<ActiveTimer>>,
    active_fails: Cell<bool>,
    active_reads: Cell<u32>,
}

impl FakeApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_times(&self, kind: ActionType, job_id: i64, n: u32) {
        self.failures.borrow_mut().insert((kind, job_id), n);
    }

    pub fn recover(&self, kind: ActionType, job_id: i64) {
        self.failures.borrow_mut().remove(&(kind, job_id));
    }

    pub fn with_active(self, timer: ActiveTimer) -> Self {
        *self.active.borrow_mut() = Some(timer);
        self
    }

    pub fn with_failing_active_read(self) -> Self {
        self.active_fails.set(true);
        self
    }

    pub fn calls(&self) -> Vec<(ActionType, i64)> {
        self.calls.borrow().clone()
    }

    pub fn active_reads(&self) -> u32 {
        self.active_reads.get()
    }

    fn record(&self, kind: ActionType, job_id: i64) -> AppResult<TimerEntry> {
        self.calls.borrow_mut().push((kind, job_id));

        let mut failures = self.failures.borrow_mut();
        if let Some(left) = failures.get_mut(&(kind, job_id))
            && *left > 0
        {
            *left -= 1;
            return Err(AppError::Network("connection refused".to_string()));
        }

        Ok(TimerEntry {
            job_id: Some(job_id),
            ..TimerEntry::default()
        })
    }
}

impl TimerApi for FakeApi {
    async fn get_active_timer(&self, _technician_name: &str) -> AppResult<Option<ActiveTimer>> {
        self.active_reads.set(self.active_reads.get() + 1);
        if self.active_fails.get() {
            return Err(AppError::Server {
                status: 503,
                message: "unavailable".to_string(),
            });
        }
        Ok(self.active.borrow().clone())
    }

    async fn start_job_timer(
        &self,
        job_id: i64,
        _technician_name: &str,
        _notes: Option<&str>,
    ) -> AppResult<TimerEntry> {
        // give other futures on the same thread a chance to run
        tokio::task::yield_now().await;
        self.record(ActionType::Start, job_id)
    }

    async fn stop_job_timer(
        &self,
        job_id: i64,
        _technician_name: &str,
        _notes: Option<&str>,
    ) -> AppResult<TimerEntry> {
        tokio::task::yield_now().await;
        self.record(ActionType::Stop, job_id)
    }

    async fn get_job_timers(&self, job_id: i64) -> AppResult<Vec<TimerEntry>> {
        Ok(vec![TimerEntry {
            job_id: Some(job_id),
            duration_minutes: Some(30),
            ..TimerEntry::default()
        }])
    }
}

pub fn engine(api: FakeApi, online: bool) -> SyncEngine<FakeApi> {
    let engine = SyncEngine::new(api, memory_queue());
    engine.set_online(online);
    engine
}

pub fn cache(api: FakeApi, online: bool) -> ActiveTimerCache<FakeApi> {
    ActiveTimerCache::new(TECH, engine(api, online))
}
