use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use std::sync::Arc;

use crate::domain::cookies::RequestCookies;

/// User object returned by the identity provider for a live session.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct IdentityUser {
    pub id: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
}

/// Result of asking the provider who owns the request's session.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct UserLookup {
    pub user: Option<IdentityUser>,
    // `Set-Cookie` values the provider wants written back (token refresh).
    pub set_cookies: Vec<String>,
}

impl UserLookup {
    pub fn anonymous() -> Self {
        Self::default()
    }
}

pub type ProviderResult<T> = Result<T, Box<dyn std::error::Error + Send + Sync>>;

// The gate and logout depend on this trait, not the concrete HTTP client.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    async fn current_user(&self, cookies: &RequestCookies) -> ProviderResult<UserLookup>;
    async fn sign_out(&self, cookies: &RequestCookies) -> ProviderResult<()>;
}

#[async_trait]
impl<T> IdentityProvider for Arc<T>
where
    T: IdentityProvider + ?Sized,
{
    async fn current_user(&self, cookies: &RequestCookies) -> ProviderResult<UserLookup> {
        (**self).current_user(cookies).await
    }

    async fn sign_out(&self, cookies: &RequestCookies) -> ProviderResult<()> {
        (**self).sign_out(cookies).await
    }
}

// Port for retrieving the current time.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;

    fn now_epoch_seconds(&self) -> i64 {
        self.now().timestamp()
    }
}

impl<T> Clock for Arc<T>
where
    T: Clock + ?Sized,
{
    fn now(&self) -> DateTime<Utc> {
        (**self).now()
    }
}
