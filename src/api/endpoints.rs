//! Endpoint catalog used by the session manager and the feed reader.

use std::fmt;

/// Which host an endpoint lives on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Host {
    /// The identity provider issuing and refreshing tokens.
    Auth,
    /// The photo-sharing API itself.
    Api,
}

/// A request target relative to one of the configured hosts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    pub host: Host,
    pub path: String,
}

impl Endpoint {
    pub fn auth(path: impl Into<String>) -> Self {
        Self {
            host: Host::Auth,
            path: path.into(),
        }
    }

    pub fn api(path: impl Into<String>) -> Self {
        Self {
            host: Host::Api,
            path: path.into(),
        }
    }

    /// Append a query parameter, percent-encoding the value.
    pub fn with_query(mut self, key: &str, value: &str) -> Self {
        let encoded: String = url::form_urlencoded::byte_serialize(value.as_bytes()).collect();
        let separator = if self.path.contains('?') { '&' } else { '?' };
        self.path = format!("{}{}{}={}", self.path, separator, key, encoded);
        self
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.host {
            Host::Auth => write!(f, "auth:{}", self.path),
            Host::Api => write!(f, "api:{}", self.path),
        }
    }
}

/// Client identifier sent with token requests.
pub const CLIENT_ID: &str = "ios";

/// Request a one-time passcode for a phone number.
pub const REQUEST_OTP: &str = "/api/vonage/request-code";

/// Exchange a one-time passcode for tokens.
pub const VERIFY_OTP: &str = "/api/vonage/check-code";

/// Refresh an access token.
pub const REFRESH_TOKEN: &str = "/token";

/// The logged-in user's friends list.
pub const FRIENDS: &str = "/relationships/friends";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_with_query_encodes_value() {
        let endpoint = Endpoint::api("/feeds/memories").with_query("cursor", "a b&c");
        assert_eq!(endpoint.path, "/feeds/memories?cursor=a+b%26c");

        let endpoint = endpoint.with_query("limit", "20");
        assert_eq!(endpoint.path, "/feeds/memories?cursor=a+b%26c&limit=20");
    }

    #[test]
    fn test_display_names_host() {
        assert_eq!(Endpoint::auth(REFRESH_TOKEN).to_string(), "auth:/token");
    }
}
