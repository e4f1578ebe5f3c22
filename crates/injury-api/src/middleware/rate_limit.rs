//! Rate limiting middleware for API endpoints
//!
//! Fixed-window counters keyed by (client address, endpoint path). The
//! default deployment allows 5 requests per minute per client on each
//! analysis endpoint.
//!
//! Clients are keyed on the socket peer address. Proxy headers (first
//! `X-Forwarded-For` hop, then `X-Real-IP`) are only consulted when
//! `trust_forwarded_headers` is enabled, since any caller can set them.
//!
//! Author: hephaex@gmail.com

use crate::audit::{audit_log, extract_ip_address, AuditEvent};
use crate::error::AppError;
use crate::state::AppState;
use axum::{
    body::Body,
    extract::{ConnectInfo, Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};
use dashmap::DashMap;
use injury_core::RateLimitConfig;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Number of tracked windows above which expired entries are pruned
const PRUNE_THRESHOLD: usize = 10_000;

/// Identity a request is counted against
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RateLimitKey {
    pub client: String,
    pub endpoint: String,
}

impl RateLimitKey {
    pub fn new(client: impl Into<String>, endpoint: impl Into<String>) -> Self {
        Self {
            client: client.into(),
            endpoint: endpoint.into(),
        }
    }
}

/// Outcome of counting one request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RateDecision {
    Allowed { remaining: u32 },
    Limited { retry_after: Duration },
}

/// Counting-and-expiry service consulted before each protected request.
///
/// `check` must increment and test the counter for a key atomically.
pub trait RateLimiter: Send + Sync {
    fn check(&self, key: &RateLimitKey) -> RateDecision;
}

#[derive(Debug, Clone, Copy)]
struct Window {
    started: Instant,
    count: u32,
}

/// In-memory fixed-window limiter
pub struct FixedWindowLimiter {
    limit: u32,
    window: Duration,
    windows: DashMap<RateLimitKey, Window>,
}

impl FixedWindowLimiter {
    pub fn new(limit: u32, window: Duration) -> Self {
        Self {
            limit,
            window,
            windows: DashMap::new(),
        }
    }

    pub fn from_config(config: &RateLimitConfig) -> Self {
        Self::new(
            config.requests_per_window,
            Duration::from_secs(config.window_secs),
        )
    }

    /// Count a request for `key` as if it arrived at `now`
    pub fn check_at(&self, key: &RateLimitKey, now: Instant) -> RateDecision {
        let decision = {
            // The entry guard holds the shard lock, so the reset, test and
            // increment below happen atomically for this key.
            let mut entry = self.windows.entry(key.clone()).or_insert(Window {
                started: now,
                count: 0,
            });

            let elapsed = now.saturating_duration_since(entry.started);
            if elapsed >= self.window {
                entry.started = now;
                entry.count = 0;
            }

            if entry.count < self.limit {
                entry.count += 1;
                RateDecision::Allowed {
                    remaining: self.limit - entry.count,
                }
            } else {
                let elapsed = now.saturating_duration_since(entry.started);
                RateDecision::Limited {
                    retry_after: self.window.saturating_sub(elapsed),
                }
            }
        };

        if self.windows.len() > PRUNE_THRESHOLD {
            self.prune(now);
        }

        decision
    }

    /// Drop windows that have fully expired
    pub fn prune(&self, now: Instant) {
        self.windows
            .retain(|_, w| now.saturating_duration_since(w.started) < self.window);
    }

    pub fn tracked_keys(&self) -> usize {
        self.windows.len()
    }
}

impl RateLimiter for FixedWindowLimiter {
    fn check(&self, key: &RateLimitKey) -> RateDecision {
        self.check_at(key, Instant::now())
    }
}

/// Resolve the address a request is counted against
pub fn client_address(request: &Request<Body>, trust_forwarded_headers: bool) -> String {
    let forwarded = if trust_forwarded_headers {
        extract_ip_address(request.headers())
    } else {
        None
    };

    forwarded
        .or_else(|| {
            request
                .extensions()
                .get::<ConnectInfo<SocketAddr>>()
                .map(|ConnectInfo(addr)| addr.ip().to_string())
        })
        .unwrap_or_else(|| "unknown".to_string())
}

/// Rate limiting middleware
///
/// Rejects with 429 before the handler runs once the client's window is full.
pub async fn rate_limit_middleware(
    State(state): State<Arc<AppState>>,
    request: Request<Body>,
    next: Next,
) -> Response {
    let client = client_address(&request, state.config.rate_limit.trust_forwarded_headers);
    let key = RateLimitKey::new(client, request.uri().path());

    match state.rate_limiter.check(&key) {
        RateDecision::Allowed { remaining } => {
            tracing::debug!(client = %key.client, endpoint = %key.endpoint, remaining, "Request admitted");
            next.run(request).await
        }
        RateDecision::Limited { retry_after } => {
            // Round up so clients never retry inside the window
            let retry_after_secs = retry_after.as_secs() + u64::from(retry_after.subsec_nanos() > 0);
            audit_log(&AuditEvent::RateLimitExceeded {
                client: key.client,
                path: key.endpoint,
                retry_after_secs,
            });
            AppError::RateLimited { retry_after_secs }.into_response()
        }
    }
}
