//! Per-key fixed window rate limiting for the contact endpoint.
//!
//! State lives in a single process. Running several backend instances behind a
//! load balancer needs a shared [`RateLimitStore`] (e.g. a cache server),
//! otherwise every instance keeps its own counters.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

pub const DEFAULT_MAX_REQUESTS: u32 = 3;
pub const DEFAULT_WINDOW: Duration = Duration::from_secs(60);

/// Source of the current time in milliseconds since the unix epoch.
#[cfg_attr(test, mockall::automock)]
pub trait Clock: Send + Sync {
    fn now_ms(&self) -> u64;
}

pub struct SystemClock;

impl Clock for SystemClock {
    fn now_ms(&self) -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or(0)
    }
}

// Rate limit entry - tracks requests per IP/key
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitEntry {
    pub count: u32,
    pub reset_time_ms: u64,
}

impl RateLimitEntry {
    fn is_expired(&self, now_ms: u64) -> bool {
        self.reset_time_ms < now_ms
    }
}

/// Storage backend for rate limit entries.
pub trait RateLimitStore: Send {
    fn get(&self, key: &str) -> Option<RateLimitEntry>;
    fn set(&mut self, key: &str, entry: RateLimitEntry);
    fn delete(&mut self, key: &str);
    fn keys(&self) -> Vec<String>;
    fn len(&self) -> usize;
}

#[derive(Default)]
pub struct InMemoryStore {
    entries: HashMap<String, RateLimitEntry>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl RateLimitStore for InMemoryStore {
    fn get(&self, key: &str) -> Option<RateLimitEntry> {
        self.entries.get(key).copied()
    }

    fn set(&mut self, key: &str, entry: RateLimitEntry) {
        self.entries.insert(key.to_string(), entry);
    }

    fn delete(&mut self, key: &str) {
        self.entries.remove(key);
    }

    fn keys(&self) -> Vec<String> {
        self.entries.keys().cloned().collect()
    }

    fn len(&self) -> usize {
        self.entries.len()
    }
}

#[derive(Debug, Clone, Copy)]
pub struct RateLimitConfig {
    pub max_requests: u32,
    pub window: Duration,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            max_requests: DEFAULT_MAX_REQUESTS,
            window: DEFAULT_WINDOW,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitDecision {
    pub allowed: bool,
    pub retry_after_secs: Option<u64>,
}

impl RateLimitDecision {
    fn allow() -> Self {
        Self { allowed: true, retry_after_secs: None }
    }

    fn deny(retry_after_secs: u64) -> Self {
        Self { allowed: false, retry_after_secs: Some(retry_after_secs) }
    }
}

pub struct RateLimiter {
    config: RateLimitConfig,
    store: Mutex<Box<dyn RateLimitStore>>,
    clock: Box<dyn Clock>,
}

impl RateLimiter {
    pub fn new(config: RateLimitConfig) -> Self {
        Self::with_parts(config, Box::new(InMemoryStore::new()), Box::new(SystemClock))
    }

    pub fn with_parts(
        config: RateLimitConfig,
        store: Box<dyn RateLimitStore>,
        clock: Box<dyn Clock>,
    ) -> Self {
        Self {
            config,
            store: Mutex::new(store),
            clock,
        }
    }

    /// Registers one request for `key` and reports whether it may proceed.
    pub fn check(&self, key: &str) -> RateLimitDecision {
        let now = self.clock.now_ms();
        // A poisoned lock only means another request panicked mid-check;
        // the map itself is still consistent.
        let mut store = self.store.lock().unwrap_or_else(|e| e.into_inner());

        Self::remove_expired(store.as_mut(), now);

        let window_ms = self.config.window.as_millis() as u64;

        match store.get(key) {
            Some(entry) if !entry.is_expired(now) => {
                if entry.count < self.config.max_requests {
                    store.set(
                        key,
                        RateLimitEntry {
                            count: entry.count + 1,
                            ..entry
                        },
                    );
                    RateLimitDecision::allow()
                } else {
                    let remaining_ms = entry.reset_time_ms - now;
                    RateLimitDecision::deny(remaining_ms.div_ceil(1000))
                }
            }
            _ => {
                store.set(
                    key,
                    RateLimitEntry {
                        count: 1,
                        reset_time_ms: now + window_ms,
                    },
                );
                RateLimitDecision::allow()
            }
        }
    }

    pub fn tracked_keys(&self) -> usize {
        self.store.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    fn remove_expired(store: &mut dyn RateLimitStore, now: u64) {
        for key in store.keys() {
            if store.get(&key).is_some_and(|e| e.is_expired(now)) {
                store.delete(&key);
            }
        }
    }
}
