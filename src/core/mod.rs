pub mod connectivity;
pub mod export;
pub mod log;
pub mod offline_queue;
pub mod session;
pub mod sync_engine;
pub mod ticker;
pub mod timer_cache;
