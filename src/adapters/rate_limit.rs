//! Per-client sliding window rate limiting.
//!
//! Each client keeps a log of the instants of its accepted requests inside
//! the current window. A request is admitted while the log holds fewer than
//! `max_requests` entries; rejected requests are not logged.

use {
    super::{api_errors::ApiError, extract::client_ip},
    crate::{config::RateLimitConfig, domain::error::ServiceError, services::supervisor::Exit},
    axum::{
        extract::{Request, State},
        middleware::Next,
        response::{IntoResponse, Response},
    },
    std::{
        collections::{HashMap, VecDeque},
        convert::Infallible,
        sync::{Arc, Mutex, MutexGuard, PoisonError},
        time::Duration,
    },
    tokio::{sync::watch, time::Instant},
};

/// Key used for requests whose peer address is unknown.
pub const UNKNOWN_CLIENT: &str = "unknown";

const SWEEP_INTERVAL: Duration = Duration::from_secs(60);

pub struct RateLimiter {
    windows: Mutex<HashMap<String, VecDeque<Instant>>>,
    config: RateLimitConfig,
}

impl RateLimiter {
    pub fn new(config: RateLimitConfig) -> Self {
        Self {
            windows: Mutex::new(HashMap::new()),
            config,
        }
    }

    pub fn config(&self) -> RateLimitConfig {
        self.config
    }

    fn windows(&self) -> MutexGuard<'_, HashMap<String, VecDeque<Instant>>> {
        self.windows.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Admits or rejects one request from `client`. On rejection returns how
    /// long until the oldest logged request leaves the window.
    pub fn check(&self, client: &str) -> Result<(), Duration> {
        self.check_at(client, Instant::now())
    }

    fn check_at(&self, client: &str, now: Instant) -> Result<(), Duration> {
        let window = self.config.window;
        let mut windows = self.windows();
        let log = windows.entry(client.to_string()).or_default();

        while log.front().is_some_and(|&t| expired(t, window, now)) {
            log.pop_front();
        }

        if log.len() < self.config.max_requests as usize {
            log.push_back(now);
            return Ok(());
        }

        let oldest = log.front().copied().unwrap_or(now);
        Err(oldest
            .checked_add(window)
            .map_or(window, |end| end.saturating_duration_since(now)))
    }

    /// Drops clients with no requests left inside the window. Returns how
    /// many were removed.
    pub fn prune(&self) -> usize {
        let now = Instant::now();
        let window = self.config.window;
        let mut windows = self.windows();
        let before = windows.len();
        windows.retain(|_, log| log.back().is_some_and(|&t| !expired(t, window, now)));
        before - windows.len()
    }

    pub fn tracked_clients(&self) -> usize {
        self.windows().len()
    }
}

/// A request logged at `at` has left the window. Instants too far out to
/// represent never expire.
fn expired(at: Instant, window: Duration, now: Instant) -> bool {
    at.checked_add(window).is_some_and(|end| end <= now)
}

fn retry_after_secs(wait: Duration) -> u64 {
    let secs = wait.as_secs();
    if wait.subsec_nanos() > 0 {
        secs.saturating_add(1)
    } else {
        secs.max(1)
    }
}

pub async fn rate_limit(
    State(limiter): State<Arc<RateLimiter>>,
    request: Request,
    next: Next,
) -> Response {
    let client = client_ip(request.extensions())
        .map(|ip| ip.to_string())
        .unwrap_or_else(|| UNKNOWN_CLIENT.to_string());

    match limiter.check(&client) {
        Ok(()) => next.run(request).await,
        Err(wait) => {
            let retry_after_secs = retry_after_secs(wait);
            tracing::warn!(client = %client, retry_after_secs, "rate limit exceeded");
            ApiError(ServiceError::RateLimitExceeded { retry_after_secs }).into_response()
        }
    }
}

/// Periodically forgets idle clients so the window table does not grow
/// without bound.
pub async fn run_sweeper(
    limiter: Arc<RateLimiter>,
    mut shutdown: watch::Receiver<Exit>,
) -> Result<(), Infallible> {
    tracing::info!("rate limit sweeper started");

    loop {
        tokio::select! {
            _ = shutdown.wait_for(|exit| *exit != Exit::Running) => {
                tracing::info!("rate limit sweeper shutting down");
                return Ok(());
            }
            _ = tokio::time::sleep(SWEEP_INTERVAL) => {}
        }

        match limiter.prune() {
            0 => {}
            n => tracing::debug!(count = n, "pruned idle rate limit windows"),
        }
    }
}
