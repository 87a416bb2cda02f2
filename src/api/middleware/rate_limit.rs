//! Rate limiting middleware using token bucket algorithm.

use governor::clock::QuantaInstant;
use governor::middleware::NoOpMiddleware;
use std::sync::Arc;
use tower_governor::{
    GovernorLayer,
    governor::GovernorConfigBuilder,
    key_extractor::{KeyExtractor, PeerIpKeyExtractor, SmartIpKeyExtractor},
};

type Layer<K> = GovernorLayer<K, NoOpMiddleware<QuantaInstant>, axum::body::Body>;

/// Rate limiter keyed by client IP.
///
/// Behind a reverse proxy the client IP is read from `X-Forwarded-For`,
/// `X-Real-IP` or `Forwarded`; otherwise the socket peer address is used.
#[derive(Clone)]
pub enum RateLimit {
    Peer(Layer<PeerIpKeyExtractor>),
    Proxied(Layer<SmartIpKeyExtractor>),
}

fn build<K: KeyExtractor>(key_extractor: K, per_second: u64, burst: u32) -> Layer<K> {
    let governor_conf = Arc::new(
        GovernorConfigBuilder::default()
            .key_extractor(key_extractor)
            .per_second(per_second)
            .burst_size(burst)
            .finish()
            .expect("rate limit quota is non-zero"),
    );

    GovernorLayer::new(governor_conf)
}

fn limiter(behind_proxy: bool, per_second: u64, burst: u32) -> RateLimit {
    if behind_proxy {
        RateLimit::Proxied(build(SmartIpKeyExtractor, per_second, burst))
    } else {
        RateLimit::Peer(build(PeerIpKeyExtractor, per_second, burst))
    }
}

/// Creates a rate limiter for general API endpoints.
///
/// # Limits
///
/// - **Rate**: 2 requests per second
/// - **Burst**: 100 requests
///
/// Requests exceeding the limit receive `429 Too Many Requests`.
pub fn layer(behind_proxy: bool) -> RateLimit {
    limiter(behind_proxy, 2, 100)
}

/// Creates a stricter rate limiter for login and registration.
///
/// # Limits
///
/// - **Rate**: 1 request per second
/// - **Burst**: 10 requests
pub fn secure_layer(behind_proxy: bool) -> RateLimit {
    limiter(behind_proxy, 1, 10)
}

impl RateLimit {
    /// Applies the limiter to a router.
    pub fn apply<S>(self, router: axum::Router<S>) -> axum::Router<S>
    where
        S: Clone + Send + Sync + 'static,
    {
        match self {
            RateLimit::Peer(layer) => router.layer(layer),
            RateLimit::Proxied(layer) => router.layer(layer),
        }
    }
}
