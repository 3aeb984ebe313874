//! Session credentials for the detail endpoint.

/// Public bearer token of the web client.
pub const DEFAULT_BEARER_TOKEN: &str = "AAAAAAAAAAAAAAAAAAAAANRILgAAAAAAnNwIzUejRCOuH5E6I8xnZz4puTs%3D1Zv7ttfk8LF81IUq16cHjhLTvJu4FA33AGWWjCpTnA";

/// Cookie holding the CSRF token that must be echoed in `x-csrf-token`.
pub const CSRF_COOKIE: &str = "ct0";

/// Credentials taken from the browsing session.
#[derive(Debug, Clone, Default)]
pub struct Credentials {
    /// Raw `Cookie` header value.
    pub cookie: Option<String>,

    /// Explicit CSRF token; when absent it is read from the cookie.
    pub csrf_token: Option<String>,

    pub bearer_token: String,
}

impl Credentials {
    /// The CSRF token to send, if one is available.
    pub fn csrf_token(&self) -> Option<String> {
        self.csrf_token
            .as_deref()
            .map(str::trim)
            .filter(|token| !token.is_empty())
            .map(str::to_string)
            .or_else(|| {
                self.cookie
                    .as_deref()
                    .and_then(csrf_token_from_cookies)
            })
    }
}

/// Extract the `ct0` value from a `Cookie` header.
pub fn csrf_token_from_cookies(cookie_header: &str) -> Option<String> {
    cookie_value(cookie_header, CSRF_COOKIE)
}

/// Look up one cookie in a `Cookie` header value (`a=1; b=2`).
pub fn cookie_value(cookie_header: &str, name: &str) -> Option<String> {
    cookie_header
        .split(';')
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(key, _)| *key == name)
        .map(|(_, value)| value.to_string())
        .filter(|value| !value.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cookie_value() {
        let header = "guest_id=v1%3A1; ct0=abc123; auth_token=zzz";
        assert_eq!(cookie_value(header, "ct0"), Some("abc123".to_string()));
        assert_eq!(cookie_value(header, "auth_token"), Some("zzz".to_string()));
        assert_eq!(cookie_value(header, "missing"), None);
        assert_eq!(cookie_value("ct0=", "ct0"), None);
        assert_eq!(cookie_value("xct0=1", "ct0"), None);
    }

    #[test]
    fn test_csrf_token_from_cookies() {
        assert_eq!(
            csrf_token_from_cookies("ct0=deadbeef; lang=en").as_deref(),
            Some("deadbeef")
        );
        assert_eq!(csrf_token_from_cookies("lang=en"), None);
    }

    #[test]
    fn test_explicit_token_wins() {
        let credentials = Credentials {
            cookie: Some("ct0=fromcookie".to_string()),
            csrf_token: Some("explicit".to_string()),
            bearer_token: DEFAULT_BEARER_TOKEN.to_string(),
        };
        assert_eq!(credentials.csrf_token().as_deref(), Some("explicit"));
    }

    #[test]
    fn test_token_from_cookie() {
        let credentials = Credentials {
            cookie: Some("a=1; ct0=fromcookie".to_string()),
            csrf_token: Some("  ".to_string()),
            ..Default::default()
        };
        assert_eq!(credentials.csrf_token().as_deref(), Some("fromcookie"));
    }

    #[test]
    fn test_no_token() {
        assert_eq!(Credentials::default().csrf_token(), None);
    }
}
