//! Application-wide constants for tuning and configuration
//!
//! Centralizes magic numbers to make them discoverable and configurable.

/// Grace window in milliseconds before a confirmed delete is committed.
/// The user can undo within this window.
pub const DEFAULT_GRACE_PERIOD_MS: u64 = 120_000;

/// Longest grace window the config accepts, in seconds (one day).
pub const MAX_GRACE_PERIOD_SECS: u64 = 86_400;

/// Check intervals (hours) the service supports.
pub const CHECK_INTERVAL_OPTIONS: [u32; 4] = [3, 6, 12, 24];

/// Default check interval in hours.
pub const DEFAULT_CHECK_INTERVAL_HOURS: u32 = 12;

/// Default API base URL when neither config nor environment provide one.
pub const DEFAULT_API_URL: &str = "http://localhost:3001";

/// Resolved actions remembered for `AlreadyResolved` answers; older ones
/// are forgotten and report as unknown.
pub const RESOLVED_HISTORY: usize = 256;

/// Capacity of the queue's lifecycle event channel.
pub const ACTION_EVENT_CAPACITY: usize = 64;

/// Error message display duration in seconds before auto-dismiss.
pub const ERROR_TTL_SECS: u64 = 5;

/// Input poll timeout while something is counting down or loading.
pub const FAST_POLL_MS: u64 = 50;

/// Input poll timeout when idle.
pub const IDLE_POLL_MS: u64 = 150;

/// Redraw interval for undo countdowns in milliseconds.
pub const COUNTDOWN_TICK_MS: u64 = 1000;

/// Number of rows moved by page up/down.
pub const PAGE_SIZE: usize = 10;
