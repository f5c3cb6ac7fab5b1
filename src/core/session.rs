//! Composition root: wires store, queue, API client, engine and cache from
//! the configuration, the way every command needs them.

use crate::api::HttpTimerApi;
use crate::config::Config;
use crate::core::connectivity::Connectivity;
use crate::core::offline_queue::OfflineQueue;
use crate::core::sync_engine::SyncEngine;
use crate::core::timer_cache::{ActiveTimerCache, Hydration};
use crate::db::initialize::init_db;
use crate::db::pool::DbPool;
use crate::errors::AppResult;
use std::time::Duration;

pub type HttpTimerCache = ActiveTimerCache<HttpTimerApi>;

pub struct Session {
    pub cache: HttpTimerCache,
    pub connectivity: Connectivity,
    pub hydration: Hydration,
    pub settle: Duration,
}

/// Open the local store and load the offline queue. No network involved.
pub fn open_queue(cfg: &Config) -> AppResult<OfflineQueue> {
    let pool = if cfg.database == ":memory:" {
        DbPool::in_memory()?
    } else {
        DbPool::new(&cfg.database)?
    };
    init_db(&pool.conn)?;
    OfflineQueue::load(pool)
}

pub fn connectivity_for(cfg: &Config) -> Connectivity {
    if cfg.offline {
        return Connectivity::offline();
    }
    let probe_timeout = Duration::from_secs(cfg.request_timeout_secs.clamp(1, 5));
    Connectivity::for_server(&cfg.server_url, false, probe_timeout)
}

/// Engine plus a first connectivity observation, for commands that replay
/// the queue without caring whose timer is running.
pub async fn open_engine(cfg: &Config) -> AppResult<(SyncEngine<HttpTimerApi>, Connectivity)> {
    let queue = open_queue(cfg)?;
    let api = HttpTimerApi::new(&cfg.server_url, Duration::from_secs(cfg.request_timeout_secs))?;
    let engine = SyncEngine::new(api, queue);

    let mut connectivity = connectivity_for(cfg);
    let (online, _) = connectivity.observe().await;
    engine.set_online(online);
    Ok((engine, connectivity))
}

impl Session {
    /// Build everything, probe connectivity once and hydrate the cache.
    pub async fn open(cfg: &Config) -> AppResult<Self> {
        let technician = cfg.technician()?.to_string();
        let (engine, connectivity) = open_engine(cfg).await?;

        let mut cache = ActiveTimerCache::new(&technician, engine);
        let hydration = cache.initialize().await;

        Ok(Self {
            cache,
            connectivity,
            hydration,
            settle: Duration::from_millis(cfg.reconnect_settle_ms),
        })
    }
}
