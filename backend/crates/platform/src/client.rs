//! Client identification utilities
//!
//! Resolves the network address a request is attributed to. Used as the rate
//! limiter key.

use axum::http::HeaderMap;
use std::net::IpAddr;

/// Key used when no address can be determined.
pub const UNKNOWN_CLIENT: &str = "unknown";

/// Extract client IP address
///
/// The first `X-Forwarded-For` entry is honored only when `trust_proxy` is
/// set; otherwise a client could pick its own rate limit bucket.
///
/// ## Arguments
/// * `headers` - HTTP request headers
/// * `direct_ip` - Peer address of the TCP connection
/// * `trust_proxy` - Whether a reverse proxy sets `X-Forwarded-For`
pub fn extract_client_ip(
    headers: &HeaderMap,
    direct_ip: Option<IpAddr>,
    trust_proxy: bool,
) -> Option<IpAddr> {
    if trust_proxy {
        let forwarded = headers
            .get("x-forwarded-for")
            .and_then(|v| v.to_str().ok())
            .and_then(|xff| xff.split(',').next())
            .and_then(|first| first.trim().parse::<IpAddr>().ok());
        if forwarded.is_some() {
            return forwarded;
        }
    }
    direct_ip
}

/// String key for per-client bookkeeping.
pub fn client_key(headers: &HeaderMap, direct_ip: Option<IpAddr>, trust_proxy: bool) -> String {
    extract_client_ip(headers, direct_ip, trust_proxy)
        .map(|ip| ip.to_string())
        .unwrap_or_else(|| UNKNOWN_CLIENT.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn forwarded() -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(
            "x-forwarded-for",
            HeaderValue::from_static("192.168.1.1, 10.0.0.1"),
        );
        headers
    }

    #[test]
    fn test_xff_used_behind_trusted_proxy() {
        let direct: IpAddr = "127.0.0.1".parse().unwrap();
        let ip = extract_client_ip(&forwarded(), Some(direct), true);
        assert_eq!(ip, Some("192.168.1.1".parse().unwrap()));
    }

    #[test]
    fn test_xff_ignored_without_trusted_proxy() {
        let direct: IpAddr = "127.0.0.1".parse().unwrap();
        let ip = extract_client_ip(&forwarded(), Some(direct), false);
        assert_eq!(ip, Some(direct));
    }

    #[test]
    fn test_garbage_xff_falls_back_to_peer() {
        let mut headers = HeaderMap::new();
        headers.insert("x-forwarded-for", HeaderValue::from_static("not-an-ip"));
        let direct: IpAddr = "10.1.2.3".parse().unwrap();
        assert_eq!(extract_client_ip(&headers, Some(direct), true), Some(direct));
    }

    #[test]
    fn test_client_key_unknown() {
        assert_eq!(client_key(&HeaderMap::new(), None, false), UNKNOWN_CLIENT);
    }
}
