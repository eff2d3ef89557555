//! Login rate limiting middleware.

use axum::{
    body::Body,
    extract::ConnectInfo,
    http::Request,
    middleware::Next,
    response::{IntoResponse, Response},
};
use governor::{
    clock::DefaultClock,
    state::{InMemoryState, NotKeyed},
    Quota, RateLimiter,
};
use std::{
    collections::HashMap,
    net::SocketAddr,
    num::NonZeroU32,
    sync::{Arc, Mutex, RwLock},
    time::{Duration, Instant},
};

use crate::web::error::ApiError;

/// Per-IP rate limiter using Governor.
pub type IpRateLimiter = RateLimiter<NotKeyed, InMemoryState, DefaultClock>;

/// Idle time after which a limiter has fully replenished and can be dropped.
const IDLE_TTL: Duration = Duration::from_secs(120);

/// How often idle limiters are swept.
const CLEANUP_INTERVAL: Duration = Duration::from_secs(300);

struct LimiterEntry {
    limiter: IpRateLimiter,
    last_seen: Mutex<Instant>,
}

impl LimiterEntry {
    fn touch(&self) {
        *self.last_seen.lock().unwrap_or_else(|e| e.into_inner()) = Instant::now();
    }

    fn idle_for(&self) -> Duration {
        self.last_seen
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .elapsed()
    }
}

type LimiterMap = RwLock<HashMap<String, Arc<LimiterEntry>>>;

/// State for login rate limiting.
#[derive(Clone)]
pub struct RateLimitState {
    /// Per-IP rate limiters for the login endpoint.
    login_limiters: Arc<LimiterMap>,
    /// Login attempts allowed per minute per IP.
    login_rate_limit: u32,
    /// Key on `X-Forwarded-For` / `X-Real-IP` instead of the peer address.
    trust_proxy_headers: bool,
}

impl RateLimitState {
    /// Create a new rate limit state keyed on the peer address.
    pub fn new(login_rate_limit: u32) -> Self {
        Self {
            login_limiters: Arc::new(RwLock::new(HashMap::new())),
            login_rate_limit,
            trust_proxy_headers: false,
        }
    }

    /// Key on forwarding headers. Only safe behind a proxy that overwrites them.
    pub fn with_proxy_headers(mut self, trust: bool) -> Self {
        self.trust_proxy_headers = trust;
        self
    }

    /// Get or create a rate limiter for the given IP.
    fn get_or_create_limiter(
        limiters: &LimiterMap,
        ip: &str,
        requests_per_minute: u32,
    ) -> Arc<LimiterEntry> {
        {
            let read_guard = limiters.read().unwrap_or_else(|e| e.into_inner());
            if let Some(entry) = read_guard.get(ip) {
                return entry.clone();
            }
        }

        let mut write_guard = limiters.write().unwrap_or_else(|e| e.into_inner());

        // Double-check after acquiring write lock
        if let Some(entry) = write_guard.get(ip) {
            return entry.clone();
        }

        let quota =
            Quota::per_minute(NonZeroU32::new(requests_per_minute).unwrap_or(NonZeroU32::MIN));
        let entry = Arc::new(LimiterEntry {
            limiter: RateLimiter::direct(quota),
            last_seen: Mutex::new(Instant::now()),
        });
        write_guard.insert(ip.to_string(), entry.clone());
        entry
    }

    /// Check if a login attempt is allowed for the given IP.
    pub fn check_login(&self, ip: &str) -> bool {
        let entry = Self::get_or_create_limiter(&self.login_limiters, ip, self.login_rate_limit);
        entry.touch();
        entry.limiter.check().is_ok()
    }

    /// Drop limiters idle long enough to have refilled their quota.
    pub fn cleanup(&self) {
        self.remove_idle(IDLE_TTL);
    }

    fn remove_idle(&self, ttl: Duration) {
        let mut guard = self.login_limiters.write().unwrap_or_else(|e| e.into_inner());
        guard.retain(|_, entry| entry.idle_for() < ttl);
    }

    /// Number of tracked clients.
    pub fn tracked(&self) -> usize {
        self.login_limiters
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .len()
    }

    /// Start a background task to periodically clean up old entries.
    pub fn start_cleanup_task(self: Arc<Self>) {
        tokio::spawn(async move {
            loop {
                tokio::time::sleep(CLEANUP_INTERVAL).await;
                self.cleanup();
            }
        });
    }
}

/// Extract client IP from request.
///
/// Forwarding headers are read only when `trust_proxy_headers` is set;
/// otherwise any client could pick its own key.
fn get_client_ip(req: &Request<Body>, trust_proxy_headers: bool) -> String {
    if trust_proxy_headers {
        if let Some(ip) = req
            .headers()
            .get("X-Forwarded-For")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.split(',').next())
            .map(str::trim)
            .filter(|ip| !ip.is_empty())
        {
            return ip.to_string();
        }

        if let Some(real_ip) = req
            .headers()
            .get("X-Real-IP")
            .and_then(|v| v.to_str().ok())
        {
            return real_ip.trim().to_string();
        }
    }

    if let Some(ConnectInfo(addr)) = req.extensions().get::<ConnectInfo<SocketAddr>>() {
        return addr.ip().to_string();
    }

    "unknown".to_string()
}

/// Rate limiting middleware for the login endpoint.
pub async fn login_rate_limit(
    state: Arc<RateLimitState>,
    req: Request<Body>,
    next: Next,
) -> Response {
    let ip = get_client_ip(&req, state.trust_proxy_headers);

    if !state.check_login(&ip) {
        tracing::warn!(ip = %ip, "Login rate limit exceeded");
        return ApiError::too_many_requests("Too many login attempts. Please try again later.")
            .into_response();
    }

    next.run(req).await
}
