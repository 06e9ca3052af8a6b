// Cookie names written by older versions of the provider's client libraries.
pub const LEGACY_SESSION_COOKIES: [&str; 4] = [
    "sb-access-token",
    "sb-refresh-token",
    "supabase-auth-token",
    "supabase.auth.token",
];

const EXPIRED: &str = "Thu, 01 Jan 1970 00:00:00 GMT";

// Lifetime of the session cookie itself (400 days, the browser cap). It holds
// the refresh token, so it must outlive the access token inside it.
pub const SESSION_COOKIE_MAX_AGE_SECONDS: u64 = 400 * 24 * 60 * 60;

/// Request-scoped cookie store built from the incoming `Cookie` headers.
///
/// Order is preserved and duplicate names are kept; lookups return the first
/// occurrence, matching what browsers send first.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RequestCookies {
    pairs: Vec<(String, String)>,
}

impl RequestCookies {
    pub fn parse<'a>(header_values: impl IntoIterator<Item = &'a str>) -> Self {
        let mut pairs = Vec::new();
        for header in header_values {
            for pair in header.split(';') {
                let Some((name, value)) = pair.trim().split_once('=') else {
                    continue;
                };
                let name = name.trim();
                if name.is_empty() {
                    continue;
                }
                pairs.push((name.to_string(), value.trim().to_string()));
            }
        }
        Self { pairs }
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// Value of a possibly chunked cookie.
    ///
    /// Large sessions are split across `name.0`, `name.1`, ... and are joined
    /// back in order. An unchunked `name` wins when both are present.
    pub fn session_value(&self, name: &str) -> Option<String> {
        if let Some(value) = self.get(name) {
            return Some(value.to_string()).filter(|value| !value.is_empty());
        }

        let mut joined = String::new();
        for index in 0.. {
            match self.get(&format!("{name}.{index}")) {
                Some(chunk) => joined.push_str(chunk),
                None => break,
            }
        }
        Some(joined).filter(|value| !value.is_empty())
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.pairs.iter().map(|(name, _)| name.as_str())
    }

    pub fn remove(&mut self, name: &str) -> bool {
        let before = self.pairs.len();
        self.pairs.retain(|(key, _)| key != name);
        self.pairs.len() != before
    }

}

/// Naming and attributes for the cookies this service writes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CookiePolicy {
    pub session_cookie_name: String,
    pub secure: bool,
}

impl CookiePolicy {
    /// Whether a cookie belongs to the provider's session family and must be
    /// dropped on logout.
    pub fn is_session_cookie(&self, name: &str) -> bool {
        name.starts_with("sb-")
            || name.contains("supabase")
            || name.contains("auth-token")
            || name == self.session_cookie_name
            || name
                .strip_prefix(self.session_cookie_name.as_str())
                .is_some_and(|suffix| suffix.starts_with('.'))
    }

    pub fn session_cookie(&self, value: &str) -> String {
        let mut cookie = format!(
            "{}={value}; Path=/; Max-Age={SESSION_COOKIE_MAX_AGE_SECONDS}; SameSite=Lax",
            self.session_cookie_name
        );
        if self.secure {
            cookie.push_str("; Secure");
        }
        cookie
    }

    pub fn clear_cookie(&self, name: &str) -> String {
        let mut cookie = format!("{name}=; Path=/; Expires={EXPIRED}; Max-Age=0; SameSite=Lax");
        if self.secure {
            cookie.push_str("; Secure");
        }
        cookie
    }
}
