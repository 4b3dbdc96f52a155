use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::Mutex;

use crate::config::RateLimitConfig;

/// Fixed-window counter guarding the send endpoint, keyed per client so
/// one noisy sender cannot exhaust everyone's budget. The key is the
/// client address as reported by `x-forwarded-for`; direct connections
/// without proxy headers share a single key. Defaults match the service's
/// public posture: 100 sends per 15 minutes.
#[derive(Debug, Clone)]
pub struct RateLimiter {
    windows: Arc<Mutex<HashMap<String, RateState>>>,
    limit: u32,
    window: Duration,
}

#[derive(Debug)]
struct RateState {
    window_start: Instant,
    count: u32,
}

impl RateLimiter {
    pub fn new(limit: u32, window: Duration) -> Self {
        Self {
            windows: Arc::new(Mutex::new(HashMap::new())),
            limit,
            window,
        }
    }

    pub fn from_config(config: Option<&RateLimitConfig>) -> Self {
        let limit = config
            .and_then(|config| config.max_requests)
            .unwrap_or(100)
            .max(1);
        let window_secs = config
            .and_then(|config| config.window_secs)
            .unwrap_or(15 * 60);
        Self::new(limit, Duration::from_secs(window_secs))
    }

    pub async fn check(&self, client: &str) -> bool {
        let mut windows = self.windows.lock().await;
        let now = Instant::now();
        let state = windows.entry(client.to_string()).or_insert(RateState {
            window_start: now,
            count: 0,
        });
        if now.duration_since(state.window_start) >= self.window {
            state.window_start = now;
            state.count = 0;
        }
        if state.count >= self.limit {
            return false;
        }
        state.count += 1;
        true
    }
}
