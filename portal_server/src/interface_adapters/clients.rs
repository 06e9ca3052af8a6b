use crate::domain::{
    CookiePolicy, IdentityProvider, IdentityUser, ProviderResult, RequestCookies, SessionTokens,
    UserLookup,
};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

// The clients defined here are for reqwest clients to communicate with external services.
// Thin wrapper around reqwest for the hosted identity provider (GoTrue REST API).
#[derive(Clone)]
pub struct IdentityClient {
    http: Client,
    base_url: String,
    anon_key: String,
    cookies: CookiePolicy,
}

#[derive(Debug, Deserialize)]
struct ProviderErrorResponse {
    #[serde(alias = "msg", alias = "error_description")]
    message: Option<String>,
}

#[derive(Debug, Serialize)]
struct RefreshRequest<'a> {
    refresh_token: &'a str,
}

#[derive(Debug, Deserialize)]
struct RefreshedSession {
    access_token: String,
    refresh_token: String,
    user: IdentityUser,
}

#[derive(Debug)]
pub enum ProviderError {
    Transport(reqwest::Error),
    Upstream {
        status: StatusCode,
        message: Option<String>,
    },
    Decode(reqwest::Error),
}

impl fmt::Display for ProviderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProviderError::Transport(err) => write!(f, "identity provider transport error: {err}"),
            ProviderError::Upstream { status, message } => {
                if let Some(message) = message {
                    write!(f, "identity provider upstream error {status}: {message}")
                } else {
                    write!(f, "identity provider upstream error {status}")
                }
            }
            ProviderError::Decode(err) => {
                write!(f, "identity provider response decode error: {err}")
            }
        }
    }
}

impl std::error::Error for ProviderError {}

impl IdentityClient {
    pub fn new(
        base_url: impl Into<String>,
        anon_key: impl Into<String>,
        cookies: CookiePolicy,
        timeout: Duration,
    ) -> Result<Self, reqwest::Error> {
        let http = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            anon_key: anon_key.into(),
            cookies,
        })
    }

    fn session_tokens(&self, cookies: &RequestCookies) -> Option<SessionTokens> {
        let raw = cookies.session_value(&self.cookies.session_cookie_name)?;
        SessionTokens::parse_cookie(&raw).ok()
    }

    // `Ok(None)` when the provider rejects the access token.
    async fn fetch_user(&self, access_token: &str) -> Result<Option<IdentityUser>, ProviderError> {
        let url = format!("{}/auth/v1/user", self.base_url);
        let res = self
            .http
            .get(url)
            .header("apikey", &self.anon_key)
            .bearer_auth(access_token)
            .send()
            .await
            .map_err(ProviderError::Transport)?;
        let status = res.status();

        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Ok(None);
        }
        if !status.is_success() {
            return Err(upstream_error(res).await);
        }

        res.json::<IdentityUser>()
            .await
            .map(Some)
            .map_err(ProviderError::Decode)
    }

    // `Ok(None)` when the refresh token is unknown, revoked or already used.
    async fn refresh_session(
        &self,
        refresh_token: &str,
    ) -> Result<Option<RefreshedSession>, ProviderError> {
        let url = format!("{}/auth/v1/token?grant_type=refresh_token", self.base_url);
        let res = self
            .http
            .post(url)
            .header("apikey", &self.anon_key)
            .json(&RefreshRequest { refresh_token })
            .send()
            .await
            .map_err(ProviderError::Transport)?;
        let status = res.status();

        if status == StatusCode::BAD_REQUEST || status == StatusCode::UNAUTHORIZED {
            return Ok(None);
        }
        if !status.is_success() {
            return Err(upstream_error(res).await);
        }

        res.json::<RefreshedSession>()
            .await
            .map(Some)
            .map_err(ProviderError::Decode)
    }
}

// Keep upstream status/message so the cause shows up in logs.
async fn upstream_error(res: reqwest::Response) -> ProviderError {
    let status = res.status();
    let message = res
        .json::<ProviderErrorResponse>()
        .await
        .ok()
        .and_then(|payload| payload.message);
    ProviderError::Upstream { status, message }
}

#[async_trait]
impl IdentityProvider for IdentityClient {
    async fn current_user(&self, cookies: &RequestCookies) -> ProviderResult<UserLookup> {
        let Some(tokens) = self.session_tokens(cookies) else {
            return Ok(UserLookup::anonymous());
        };

        if let Some(user) = self.fetch_user(&tokens.access_token).await? {
            return Ok(UserLookup {
                user: Some(user),
                set_cookies: Vec::new(),
            });
        }

        // Access token rejected: trade the refresh token for a new session and
        // hand the rotated cookie back to the caller.
        let Some(refresh_token) = tokens.refresh_token.as_deref() else {
            return Ok(UserLookup::anonymous());
        };
        let Some(session) = self.refresh_session(refresh_token).await? else {
            return Ok(UserLookup::anonymous());
        };

        let rotated = SessionTokens {
            access_token: session.access_token,
            refresh_token: Some(session.refresh_token),
        };
        // Cookie lifetime is the session's, not the access token's `expires_in`.
        let cookie = self.cookies.session_cookie(&rotated.to_cookie_value());
        tracing::debug!(user_id = %session.user.id, "session refreshed");

        Ok(UserLookup {
            user: Some(session.user),
            set_cookies: vec![cookie],
        })
    }

    async fn sign_out(&self, cookies: &RequestCookies) -> ProviderResult<()> {
        let Some(tokens) = self.session_tokens(cookies) else {
            return Ok(());
        };

        let url = format!("{}/auth/v1/logout", self.base_url);
        let res = self
            .http
            .post(url)
            .header("apikey", &self.anon_key)
            .bearer_auth(&tokens.access_token)
            .send()
            .await
            .map_err(ProviderError::Transport)?;
        let status = res.status();

        // A token the provider no longer knows is already signed out.
        if status.is_success()
            || status == StatusCode::UNAUTHORIZED
            || status == StatusCode::NOT_FOUND
        {
            return Ok(());
        }

        Err(Box::new(upstream_error(res).await))
    }
}
