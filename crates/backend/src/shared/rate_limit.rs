use std::collections::HashMap;
use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::body::Body;
use axum::extract::{ConnectInfo, State};
use axum::http::{Request, StatusCode};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use tokio::sync::Mutex;

use crate::shared::config::RateLimitConfig;

struct WindowEntry {
    started: Instant,
    count: u32,
}

/// Global fixed-window limiter keyed by client IP. The window restarts when
/// the first request after expiry arrives.
#[derive(Clone)]
pub struct RateLimiter {
    max_requests: u32,
    window: Duration,
    hits: Arc<Mutex<HashMap<IpAddr, WindowEntry>>>,
}

impl RateLimiter {
    pub fn new(config: &RateLimitConfig) -> Self {
        Self {
            max_requests: config.max_requests,
            window: Duration::from_secs(config.window_secs),
            hits: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Register one request; false means the window budget is spent
    pub async fn try_acquire(&self, ip: IpAddr) -> bool {
        let now = Instant::now();
        let mut hits = self.hits.lock().await;
        // Expired windows are dropped wholesale so idle IPs never accumulate
        hits.retain(|_, entry| now.duration_since(entry.started) < self.window);
        let entry = hits.entry(ip).or_insert(WindowEntry {
            started: now,
            count: 0,
        });
        entry.count += 1;
        entry.count <= self.max_requests
    }

    #[cfg(test)]
    async fn tracked_ips(&self) -> usize {
        self.hits.lock().await.len()
    }
}

pub async fn middleware(
    State(limiter): State<RateLimiter>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    req: Request<Body>,
    next: Next,
) -> Response {
    if !limiter.try_acquire(addr.ip()).await {
        tracing::warn!("Rate limit exceeded for {}", addr.ip());
        return (
            StatusCode::TOO_MANY_REQUESTS,
            "Limite de requisições excedido. Tente novamente mais tarde.",
        )
            .into_response();
    }
    next.run(req).await
}

#[cfg(test)]
mod tests {
    use super::*;

    fn limiter(max_requests: u32, window_secs: u64) -> RateLimiter {
        RateLimiter::new(&RateLimitConfig {
            max_requests,
            window_secs,
        })
    }

    #[tokio::test]
    async fn requests_within_budget_pass() {
        let limiter = limiter(3, 900);
        let ip: IpAddr = "10.0.0.1".parse().unwrap();
        for _ in 0..3 {
            assert!(limiter.try_acquire(ip).await);
        }
        assert!(!limiter.try_acquire(ip).await);
    }

    #[tokio::test]
    async fn budget_is_per_ip() {
        let limiter = limiter(1, 900);
        let a: IpAddr = "10.0.0.1".parse().unwrap();
        let b: IpAddr = "10.0.0.2".parse().unwrap();
        assert!(limiter.try_acquire(a).await);
        assert!(!limiter.try_acquire(a).await);
        assert!(limiter.try_acquire(b).await);
    }

    #[tokio::test]
    async fn expired_window_resets_the_count() {
        // Zero-length window: every request starts a fresh window
        let limiter = limiter(1, 0);
        let ip: IpAddr = "10.0.0.1".parse().unwrap();
        assert!(limiter.try_acquire(ip).await);
        assert!(limiter.try_acquire(ip).await);
        assert!(limiter.try_acquire(ip).await);
    }

    #[tokio::test]
    async fn expired_entries_are_evicted() {
        // Zero-length window: every entry is stale by the next request,
        // so only the IP acquiring right now stays tracked
        let limiter = limiter(1, 0);
        let a: IpAddr = "10.0.0.1".parse().unwrap();
        let b: IpAddr = "10.0.0.2".parse().unwrap();
        assert!(limiter.try_acquire(a).await);
        assert_eq!(limiter.tracked_ips().await, 1);
        assert!(limiter.try_acquire(b).await);
        assert_eq!(limiter.tracked_ips().await, 1);
    }
}
