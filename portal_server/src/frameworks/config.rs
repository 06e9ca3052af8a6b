use std::{env, fmt, str::FromStr, time::Duration};
use url::Url;

// Runtime configuration read once at startup. Missing provider settings are
// fatal; the server never starts in a degraded auth mode.

/// Which session verifier guards the admin routes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum VerifierMode {
    // Local decode as a pre-check, provider as the authority.
    Layered,
    Network,
    // Trusts unsigned claims. Development only.
    LocalUnverified,
}

impl FromStr for VerifierMode {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim() {
            "layered" => Ok(VerifierMode::Layered),
            "network" => Ok(VerifierMode::Network),
            "local-unverified" => Ok(VerifierMode::LocalUnverified),
            other => Err(ConfigError::InvalidValue {
                key: "SESSION_VERIFIER",
                value: other.to_string(),
            }),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    Missing(&'static str),
    InvalidUrl { key: &'static str, value: String },
    InvalidValue { key: &'static str, value: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Missing(key) => write!(f, "{key} must be set"),
            ConfigError::InvalidUrl { key, value } => write!(f, "{key} is not a valid url: {value}"),
            ConfigError::InvalidValue { key, value } => write!(f, "{key} has invalid value: {value}"),
        }
    }
}

impl std::error::Error for ConfigError {}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub identity_url: String,
    pub identity_anon_key: String,
    pub session_cookie_name: String,
    pub verifier: VerifierMode,
    pub verify_timeout: Duration,
    pub port: u16,
    pub secure_cookies: bool,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let required = |key: &'static str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
                .ok_or(ConfigError::Missing(key))
        };

        let identity_url = required("IDENTITY_PROVIDER_URL")?;
        let identity_anon_key = required("IDENTITY_PROVIDER_ANON_KEY")?;

        let session_cookie_name = match lookup("SESSION_COOKIE_NAME").filter(|v| !v.trim().is_empty()) {
            Some(name) => name.trim().to_string(),
            None => default_session_cookie_name(&identity_url)?,
        };

        let verifier = lookup("SESSION_VERIFIER")
            .map(|value| value.parse::<VerifierMode>())
            .transpose()?
            .unwrap_or(VerifierMode::Layered);

        let verify_timeout = match lookup("AUTH_VERIFY_TIMEOUT_MS") {
            Some(value) => Duration::from_millis(value.trim().parse::<u64>().map_err(|_| {
                ConfigError::InvalidValue {
                    key: "AUTH_VERIFY_TIMEOUT_MS",
                    value,
                }
            })?),
            None => Duration::from_millis(1500),
        };

        let port = match lookup("PORTAL_SERVER_PORT") {
            Some(value) => value.trim().parse::<u16>().map_err(|_| ConfigError::InvalidValue {
                key: "PORTAL_SERVER_PORT",
                value,
            })?,
            None => 3000,
        };

        let secure_cookies = matches!(
            lookup("SECURE_COOKIES").as_deref().map(str::trim),
            Some("1" | "true" | "TRUE" | "yes")
        );

        Ok(Self {
            identity_url,
            identity_anon_key,
            session_cookie_name,
            verifier,
            verify_timeout,
            port,
            secure_cookies,
        })
    }
}

// `https://abcd.supabase.co` -> `sb-abcd-auth-token`
fn default_session_cookie_name(identity_url: &str) -> Result<String, ConfigError> {
    let invalid = || ConfigError::InvalidUrl {
        key: "IDENTITY_PROVIDER_URL",
        value: identity_url.to_string(),
    };
    let url = Url::parse(identity_url).map_err(|_| invalid())?;
    let project_ref = url
        .host_str()
        .and_then(|host| host.split('.').next())
        .filter(|label| !label.is_empty())
        .ok_or_else(invalid)?;
    Ok(format!("sb-{project_ref}-auth-token"))
}
