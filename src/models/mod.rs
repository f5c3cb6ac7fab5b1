//! Timer domain models shared by the cache, the offline queue and the API client.

pub mod action_type;
pub mod active_timer;
pub mod queued_action;
pub mod timer_entry;

pub use action_type::ActionType;
pub use active_timer::ActiveTimer;
pub use queued_action::QueuedAction;
pub use timer_entry::{TimerEntry, total_minutes};
