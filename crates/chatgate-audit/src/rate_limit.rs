//! In-memory fixed-window rate limiter keyed by caller identity.
//!
//! Each key gets a window that opens on its first request and admits
//! `max_requests` checks until `window` has elapsed. State lives only in this
//! process; it is an abuse deterrent, not a quota of record.

use std::collections::HashMap;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use jiff::Timestamp;
use serde::Serialize;
use tracing::debug;

pub const DEFAULT_WINDOW_MS: i64 = 60_000;
pub const DEFAULT_MAX_REQUESTS: u32 = 20;

/// Above this many tracked keys, expired windows are swept before a check.
const SWEEP_THRESHOLD: usize = 10_000;

/// Source of the current time.
pub trait Clock: Send + Sync {
    fn now(&self) -> Timestamp;
}

/// Wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Timestamp {
        Timestamp::now()
    }
}

/// A clock that only moves when told to.
#[derive(Debug, Default)]
pub struct ManualClock {
    millis: AtomicI64,
}

impl ManualClock {
    pub fn new(start_ms: i64) -> Self {
        Self {
            millis: AtomicI64::new(start_ms),
        }
    }

    pub fn advance_ms(&self, ms: i64) {
        self.millis.fetch_add(ms, Ordering::SeqCst);
    }

    pub fn set_ms(&self, ms: i64) {
        self.millis.store(ms, Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Timestamp {
        Timestamp::from_millisecond(self.millis.load(Ordering::SeqCst))
            .unwrap_or(Timestamp::UNIX_EPOCH)
    }
}

/// Window length and quota. Construct with [`RateLimitSettings::new`] so
/// nonsensical values are replaced by the defaults.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitSettings {
    window_ms: i64,
    max_requests: u32,
}

impl RateLimitSettings {
    /// Non-positive values fall back to 60 s and 20 requests.
    pub fn new(window_ms: i64, max_requests: i64) -> Self {
        let window_ms = if window_ms > 0 {
            window_ms
        } else {
            DEFAULT_WINDOW_MS
        };
        let max_requests = u32::try_from(max_requests)
            .ok()
            .filter(|n| *n > 0)
            .unwrap_or(DEFAULT_MAX_REQUESTS);

        Self {
            window_ms,
            max_requests,
        }
    }

    pub fn window_ms(&self) -> i64 {
        self.window_ms
    }

    pub fn max_requests(&self) -> u32 {
        self.max_requests
    }
}

impl Default for RateLimitSettings {
    fn default() -> Self {
        Self {
            window_ms: DEFAULT_WINDOW_MS,
            max_requests: DEFAULT_MAX_REQUESTS,
        }
    }
}

/// Result of one [`RateLimiter::check`]. Serializes as the audit snapshot,
/// which leaves out `allowed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RateLimitDecision {
    #[serde(skip)]
    pub allowed: bool,
    pub limit: u32,
    pub remaining: u32,
    /// Whole seconds until the window resets; set only on rejection.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub retry_after_seconds: Option<u64>,
}

#[derive(Debug, Clone, Copy)]
struct WindowState {
    started_at: Timestamp,
    count: u32,
}

pub struct RateLimiter {
    settings: RateLimitSettings,
    clock: Arc<dyn Clock>,
    windows: Mutex<HashMap<String, WindowState>>,
}

impl RateLimiter {
    pub fn new(settings: RateLimitSettings) -> Self {
        Self::with_clock(settings, Arc::new(SystemClock))
    }

    pub fn with_clock(settings: RateLimitSettings, clock: Arc<dyn Clock>) -> Self {
        Self {
            settings,
            clock,
            windows: Mutex::new(HashMap::new()),
        }
    }

    pub fn settings(&self) -> RateLimitSettings {
        self.settings
    }

    /// Count one request for `key` and decide whether it may proceed.
    pub fn check(&self, key: &str) -> RateLimitDecision {
        let now = self.clock.now();
        let window_ms = self.settings.window_ms;
        let limit = self.settings.max_requests;

        let mut windows = self.windows.lock().unwrap_or_else(PoisonError::into_inner);

        if windows.len() > SWEEP_THRESHOLD {
            let before = windows.len();
            windows.retain(|_, state| elapsed_ms(state.started_at, now) < window_ms);
            debug!(evicted = before - windows.len(), "swept expired rate limit windows");
        }

        let active = windows
            .get(key)
            .copied()
            .filter(|state| elapsed_ms(state.started_at, now) < window_ms);

        let Some(mut state) = active else {
            windows.insert(
                key.to_string(),
                WindowState {
                    started_at: now,
                    count: 1,
                },
            );
            return RateLimitDecision {
                allowed: true,
                limit,
                remaining: limit - 1,
                retry_after_seconds: None,
            };
        };

        if state.count >= limit {
            let remaining_ms = window_ms - elapsed_ms(state.started_at, now);
            let retry_after = u64::try_from(remaining_ms)
                .map(|ms| ms.div_ceil(1000))
                .unwrap_or(1)
                .max(1);
            return RateLimitDecision {
                allowed: false,
                limit,
                remaining: 0,
                retry_after_seconds: Some(retry_after),
            };
        }

        state.count += 1;
        windows.insert(key.to_string(), state);

        RateLimitDecision {
            allowed: true,
            limit,
            remaining: limit - state.count,
            retry_after_seconds: None,
        }
    }

    /// Number of keys currently holding a window.
    pub fn tracked_keys(&self) -> usize {
        self.windows
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

fn elapsed_ms(started_at: Timestamp, now: Timestamp) -> i64 {
    now.as_millisecond() - started_at.as_millisecond()
}
