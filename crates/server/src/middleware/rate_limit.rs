//! Rate limiting middleware using governor and `tower_governor`.
//!
//! Login and registration are limited per client IP to slow down password
//! guessing (~10 requests per minute, burst of 5).

use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;

use axum::extract::ConnectInfo;
use axum::http::Request;
use governor::clock::QuantaInstant;
use governor::middleware::NoOpMiddleware;
use tower_governor::{GovernorError, GovernorLayer, governor::GovernorConfigBuilder};

/// Key extractor that resolves the client IP.
///
/// Keys on the socket peer address (requires serving with
/// `into_make_service_with_connect_info`). Behind a reverse proxy,
/// `trust_proxy_headers` switches to the first hop of `X-Forwarded-For`, then
/// `X-Real-IP`. Those headers are client-controlled unless the proxy
/// overwrites them.
#[derive(Clone, Copy, Debug, Default)]
pub struct ClientIpKeyExtractor {
    pub trust_proxy_headers: bool,
}

impl tower_governor::key_extractor::KeyExtractor for ClientIpKeyExtractor {
    type Key = IpAddr;

    fn extract<T>(&self, req: &Request<T>) -> Result<Self::Key, GovernorError> {
        client_ip(req, self.trust_proxy_headers).ok_or(GovernorError::UnableToExtractKey)
    }
}

/// Resolve the client IP of a request.
pub fn client_ip<T>(req: &Request<T>, trust_proxy_headers: bool) -> Option<IpAddr> {
    let peer = || {
        req.extensions()
            .get::<ConnectInfo<SocketAddr>>()
            .map(|ConnectInfo(addr)| addr.ip())
    };

    if !trust_proxy_headers {
        return peer();
    }

    let headers = req.headers();

    let forwarded = headers
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.split(',').next())
        .and_then(|s| s.trim().parse::<IpAddr>().ok());

    let real_ip = || {
        headers
            .get("x-real-ip")
            .and_then(|v| v.to_str().ok())
            .and_then(|s| s.trim().parse::<IpAddr>().ok())
    };

    forwarded.or_else(real_ip).or_else(peer)
}

/// Rate limiter layer type for Axum.
pub type RateLimiterLayer =
    GovernorLayer<ClientIpKeyExtractor, NoOpMiddleware<QuantaInstant>, axum::body::Body>;

/// Create rate limiter for auth endpoints: ~10 requests per minute per IP.
///
/// Configuration: 1 request every 6 seconds (replenish), burst of 5.
///
/// # Panics
///
/// This function will not panic. The configuration uses only valid positive
/// integers (`per_second(6)` and `burst_size(5)`), which are always accepted
/// by `GovernorConfigBuilder`.
#[must_use]
pub fn auth_rate_limiter(trust_proxy_headers: bool) -> RateLimiterLayer {
    let config = GovernorConfigBuilder::default()
        .key_extractor(ClientIpKeyExtractor {
            trust_proxy_headers,
        })
        .per_second(6)
        .burst_size(5)
        .finish()
        .expect("rate limiter config with per_second(6) and burst_size(5) is valid");
    GovernorLayer::new(Arc::new(config))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use axum::body::Body;

    use super::*;

    fn request() -> axum::http::request::Builder {
        Request::builder().uri("/auth/login")
    }

    fn peer(req: &mut Request<Body>, addr: &str) {
        let addr: SocketAddr = addr.parse().unwrap();
        req.extensions_mut().insert(ConnectInfo(addr));
    }

    #[test]
    fn test_ignores_forwarded_headers_by_default() {
        let mut req = request()
            .header("x-forwarded-for", "203.0.113.7")
            .header("x-real-ip", "198.51.100.2")
            .body(Body::empty())
            .unwrap();
        assert_eq!(client_ip(&req, false), None);

        peer(&mut req, "192.0.2.10:54321");
        assert_eq!(client_ip(&req, false), Some("192.0.2.10".parse().unwrap()));
    }

    #[test]
    fn test_trusted_proxy_prefers_forwarded_for_first_hop() {
        let mut req = request()
            .header("x-forwarded-for", "203.0.113.7, 10.0.0.1")
            .header("x-real-ip", "198.51.100.2")
            .body(Body::empty())
            .unwrap();
        peer(&mut req, "10.0.0.1:443");
        assert_eq!(client_ip(&req, true), Some("203.0.113.7".parse().unwrap()));
    }

    #[test]
    fn test_trusted_proxy_falls_back_to_real_ip_then_peer() {
        let mut req = request()
            .header("x-forwarded-for", "garbage")
            .header("x-real-ip", " 198.51.100.2 ")
            .body(Body::empty())
            .unwrap();
        assert_eq!(client_ip(&req, true), Some("198.51.100.2".parse().unwrap()));

        req.headers_mut().remove("x-real-ip");
        peer(&mut req, "192.0.2.10:54321");
        assert_eq!(client_ip(&req, true), Some("192.0.2.10".parse().unwrap()));
    }
}
