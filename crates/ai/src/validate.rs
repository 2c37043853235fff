//! Link validation for user-submitted article URLs.
//!
//! Article links are fetched server-side, so anything pointing back into
//! the private network is refused.

use std::net::{IpAddr, Ipv4Addr};

use url::Url;

use crate::error::AiError;

/// Parse `url_str` and reject non-HTTP(S) schemes, localhost and private IPs.
pub fn validate_public_url(url_str: &str) -> Result<Url, AiError> {
    let url = Url::parse(url_str.trim()).map_err(|e| AiError::InvalidUrl(e.to_string()))?;

    match url.scheme() {
        "http" | "https" => {}
        scheme => {
            return Err(AiError::InvalidUrl(format!(
                "unsupported scheme '{scheme}' (only http/https allowed)"
            )))
        }
    }

    let host = url
        .host_str()
        .ok_or_else(|| AiError::InvalidUrl("missing host".into()))?;
    if host.eq_ignore_ascii_case("localhost") {
        return Err(AiError::InvalidUrl("localhost not allowed".into()));
    }

    let host_for_parse = host
        .strip_prefix('[')
        .and_then(|h| h.strip_suffix(']'))
        .unwrap_or(host);
    if let Ok(ip) = host_for_parse.parse::<IpAddr>() {
        if is_private_ip(&ip) {
            return Err(AiError::InvalidUrl(format!("private address {ip} not allowed")));
        }
    }

    Ok(url)
}

fn is_private_v4(v4: &Ipv4Addr) -> bool {
    v4.is_private() || v4.is_loopback() || v4.is_link_local() || v4.is_unspecified()
}

fn is_private_ip(ip: &IpAddr) -> bool {
    match ip {
        IpAddr::V4(v4) => is_private_v4(v4),
        IpAddr::V6(v6) => {
            // ::ffff:a.b.c.d reaches the IPv4 host
            if let Some(v4) = v6.to_ipv4_mapped() {
                return is_private_v4(&v4);
            }
            if v6.is_loopback() || v6.is_unspecified() {
                return true;
            }
            let first = v6.segments()[0];
            // fc00::/7 unique local, fe80::/10 link local
            (first & 0xfe00) == 0xfc00 || (first & 0xffc0) == 0xfe80
        }
    }
}
