//! Validation of the URLs users ask to shorten.

use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};

use axum::http::Uri;

use crate::Error;

/// An absolute `http` or `https` URL that is safe to redirect to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetUrl(String);

impl TargetUrl {
    /// The longest URL, in bytes, that will be stored.
    pub const MAX_LENGTH: usize = 2048;

    /// Validate `raw_url` as a redirect target.
    ///
    /// `own_host` is the application's host as seen by the client (the
    /// request's `Host` header); links back to it are rejected so that short
    /// links cannot point at other short links.
    ///
    /// # Errors
    ///
    /// Returns [Error::InvalidUrl] if the URL is too long, cannot be parsed,
    /// does not use `http` or `https`, has no host, or points at an internal
    /// address or this application.
    pub fn new(raw_url: &str, own_host: Option<&str>) -> Result<Self, Error> {
        let raw_url = raw_url.trim();

        if raw_url.is_empty() {
            return Err(Error::InvalidUrl("enter a URL to shorten".to_owned()));
        }

        if raw_url.len() > Self::MAX_LENGTH {
            return Err(Error::InvalidUrl(format!(
                "URLs can be at most {} characters long",
                Self::MAX_LENGTH
            )));
        }

        let uri: Uri = raw_url
            .parse()
            .map_err(|_| Error::InvalidUrl(format!("\"{raw_url}\" is not a valid URL")))?;

        let has_web_scheme = uri.scheme_str().is_some_and(|scheme| {
            scheme.eq_ignore_ascii_case("http") || scheme.eq_ignore_ascii_case("https")
        });
        if !has_web_scheme {
            return Err(Error::InvalidUrl(
                "the URL must start with http:// or https://".to_owned(),
            ));
        }

        let host = uri
            .host()
            .map(normalize_host)
            .filter(|host| !host.is_empty())
            .ok_or_else(|| Error::InvalidUrl("the URL must include a host".to_owned()))?;

        if is_internal_host(&host) {
            return Err(Error::InvalidUrl(
                "links to local or private addresses are not allowed".to_owned(),
            ));
        }

        if own_host
            .map(strip_port)
            .map(normalize_host)
            .is_some_and(|own_host| own_host == host)
        {
            return Err(Error::InvalidUrl(
                "links to this site cannot be shortened".to_owned(),
            ));
        }

        Ok(Self(raw_url.to_owned()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Lowercase `host` and drop IPv6 brackets and a trailing dot.
fn normalize_host(host: &str) -> String {
    host.trim_start_matches('[')
        .trim_end_matches(']')
        .trim_end_matches('.')
        .to_ascii_lowercase()
}

/// Drop the port from a `Host` header value.
fn strip_port(host: &str) -> &str {
    if let Some(rest) = host.strip_prefix('[') {
        return rest.split_once(']').map_or(host, |(address, _)| address);
    }

    host.split_once(':').map_or(host, |(name, _)| name)
}

fn is_internal_host(host: &str) -> bool {
    if host == "localhost" || host.ends_with(".localhost") {
        return true;
    }

    // Browsers read hosts such as "2130706433", "127.1" and "0x7f.0.0.1" as
    // IPv4 addresses. A numeric host that is not a valid address is refused.
    if !host.contains(':') && ends_in_number(host) {
        return parse_ipv4_host(host).is_none_or(is_internal_ipv4);
    }

    match host.parse::<IpAddr>() {
        Ok(IpAddr::V4(address)) => is_internal_ipv4(address),
        Ok(IpAddr::V6(address)) => is_internal_ipv6(address),
        Err(_) => false,
    }
}

fn ends_in_number(host: &str) -> bool {
    let last_part = host.rsplit('.').next().unwrap_or(host);

    if let Some(hex) = strip_hex_prefix(last_part) {
        return hex.chars().all(|c| c.is_ascii_hexdigit());
    }

    !last_part.is_empty() && last_part.chars().all(|c| c.is_ascii_digit())
}

/// Parse `host` the way browsers parse IPv4 hosts.
///
/// A host has one to four parts, each decimal, octal with a leading `0`, or
/// hex with a leading `0x`. The last part fills all remaining bytes.
fn parse_ipv4_host(host: &str) -> Option<Ipv4Addr> {
    let parts = host
        .split('.')
        .map(parse_ipv4_part)
        .collect::<Option<Vec<u32>>>()?;

    let (last, leading) = parts.split_last()?;
    if leading.len() > 3 || leading.iter().any(|&part| part > 255) {
        return None;
    }

    let remaining_bits = 8 * (4 - leading.len() as u32);
    if remaining_bits < 32 && *last >= 1 << remaining_bits {
        return None;
    }

    let address = leading
        .iter()
        .enumerate()
        .fold(*last, |address, (index, &part)| {
            address | part << (24 - 8 * index as u32)
        });

    Some(Ipv4Addr::from(address))
}

fn strip_hex_prefix(part: &str) -> Option<&str> {
    part.strip_prefix("0x").or_else(|| part.strip_prefix("0X"))
}

fn parse_ipv4_part(part: &str) -> Option<u32> {
    if part.is_empty() {
        return None;
    }

    if let Some(hex) = strip_hex_prefix(part) {
        return if hex.is_empty() {
            Some(0)
        } else {
            u32::from_str_radix(hex, 16).ok()
        };
    }

    if part.len() > 1 && part.starts_with('0') {
        return u32::from_str_radix(&part[1..], 8).ok();
    }

    part.parse().ok()
}

fn is_internal_ipv4(address: Ipv4Addr) -> bool {
    let [first, second, ..] = address.octets();
    // 100.64.0.0/10 is shared address space used behind carrier NAT.
    let is_shared = first == 100 && (64..128).contains(&second);

    address.is_loopback()
        || address.is_private()
        || address.is_link_local()
        || address.is_unspecified()
        || address.is_broadcast()
        || address.is_multicast()
        || is_shared
}

fn is_internal_ipv6(address: Ipv6Addr) -> bool {
    if let Some(mapped) = address.to_ipv4_mapped() {
        return is_internal_ipv4(mapped);
    }

    let first_segment = address.segments()[0];
    let is_unique_local = first_segment & 0xfe00 == 0xfc00;
    let is_link_local = first_segment & 0xffc0 == 0xfe80;

    address.is_loopback()
        || address.is_unspecified()
        || address.is_multicast()
        || is_unique_local
        || is_link_local
}

#[cfg(test)]
mod tests {
    use crate::Error;

    use std::net::Ipv4Addr;

    use super::{TargetUrl, is_internal_host, parse_ipv4_host, strip_port};

    #[track_caller]
    fn assert_rejected(raw_url: &str) {
        let result = TargetUrl::new(raw_url, Some("links.example.org"));

        assert!(
            matches!(result, Err(Error::InvalidUrl(_))),
            "{raw_url:?} should be rejected, got {result:?}"
        );
    }

    #[test]
    fn accepts_public_urls() {
        for raw_url in [
            "https://example.com",
            "http://example.com/some/path?query=1#fragment",
            "HTTPS://Example.com:8443/",
            "https://93.184.216.34/",
        ] {
            let url = TargetUrl::new(raw_url, Some("links.example.org")).unwrap();

            assert_eq!(url.as_str(), raw_url);
        }
    }

    #[test]
    fn trims_whitespace() {
        let url = TargetUrl::new("  https://example.com  ", None).unwrap();

        assert_eq!(url.as_str(), "https://example.com");
    }

    #[test]
    fn rejects_other_schemes() {
        assert_rejected("ftp://example.com/file");
        assert_rejected("javascript:alert(1)");
        assert_rejected("example.com");
        assert_rejected("/relative/path");
    }

    #[test]
    fn rejects_blank_and_unparseable_urls() {
        assert_rejected("");
        assert_rejected("   ");
        assert_rejected("https://exa mple.com");
    }

    #[test]
    fn rejects_overlong_urls() {
        let raw_url = format!("https://example.com/{}", "a".repeat(TargetUrl::MAX_LENGTH));

        assert_rejected(&raw_url);
    }

    #[test]
    fn rejects_internal_hosts() {
        for raw_url in [
            "http://localhost:3000/",
            "http://app.localhost/",
            "http://127.0.0.1/",
            "http://10.1.2.3/",
            "http://172.16.0.1/",
            "http://192.168.1.1/admin",
            "http://169.254.169.254/latest/meta-data",
            "http://0.0.0.0/",
            "http://100.64.0.1/",
            "http://[::1]/",
            "http://[fe80::1]/",
            "http://[fd00::1]/",
            "http://2130706433/",
            "http://127.1/",
            "http://0x7f.0.0.1/",
            "http://017700000001/",
            "http://0/",
            "http://0x0a.1/",
            "http://192.168.257/",
            "http://999.1.1.1/",
        ] {
            assert_rejected(raw_url);
        }
    }

    #[test]
    fn parses_numeric_ipv4_hosts() {
        let loopback = Some(Ipv4Addr::new(127, 0, 0, 1));

        assert_eq!(parse_ipv4_host("2130706433"), loopback);
        assert_eq!(parse_ipv4_host("127.1"), loopback);
        assert_eq!(parse_ipv4_host("0x7f.0.0.1"), loopback);
        assert_eq!(parse_ipv4_host("017700000001"), loopback);
        assert_eq!(parse_ipv4_host("0177.0.0.01"), loopback);
        assert_eq!(
            parse_ipv4_host("192.168.257"),
            Some(Ipv4Addr::new(192, 168, 1, 1))
        );
        assert_eq!(parse_ipv4_host("0"), Some(Ipv4Addr::UNSPECIFIED));
        assert_eq!(parse_ipv4_host("256.0.0.1"), None);
        assert_eq!(parse_ipv4_host("1.2.3.4.5"), None);
        assert_eq!(parse_ipv4_host("4294967296"), None);
    }

    #[test]
    fn public_numeric_hosts_are_allowed() {
        assert!(!is_internal_host("1572395042"));
        assert!(!is_internal_host("93.184.216.34"));
        assert!(!is_internal_host("example.123abc"));
    }

    #[test]
    fn ipv4_mapped_addresses_use_ipv4_rules() {
        assert!(is_internal_host("::ffff:127.0.0.1"));
        assert!(is_internal_host("::ffff:192.168.0.1"));
        assert!(!is_internal_host("::ffff:93.184.216.34"));
    }

    #[test]
    fn strips_port_from_host_header() {
        assert_eq!(strip_port("links.example.org:8080"), "links.example.org");
        assert_eq!(strip_port("links.example.org"), "links.example.org");
        assert_eq!(strip_port("[::1]:3000"), "::1");
    }

    #[test]
    fn rejects_own_host() {
        assert_rejected("https://links.example.org/abc123");
        assert_rejected("https://LINKS.example.org./abc123");

        let result = TargetUrl::new(
            "https://links.example.org/abc123",
            Some("links.example.org:8080"),
        );
        assert!(matches!(result, Err(Error::InvalidUrl(_))));
    }
}
