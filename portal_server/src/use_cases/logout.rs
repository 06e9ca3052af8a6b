use std::collections::BTreeSet;

use tracing::{info, warn};

use crate::domain::cookies::LEGACY_SESSION_COOKIES;
use crate::domain::{CookiePolicy, IdentityProvider, RequestCookies};

// Result of the logout use case.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogoutOutcome {
    pub provider_signed_out: bool,
    pub cleared: Vec<String>,
    // One expiring `Set-Cookie` value per cleared name.
    pub set_cookies: Vec<String>,
}

// Logout use case with injected dependencies.
pub struct LogoutUseCase<P> {
    pub provider: P,
    pub policy: CookiePolicy,
}

impl<P> LogoutUseCase<P>
where
    P: IdentityProvider,
{
    /// Sign out upstream, then expire every session cookie.
    ///
    /// Cookie clearing happens whether or not the provider call succeeds, so
    /// the browser always forgets the session.
    pub async fn execute(&self, cookies: &mut RequestCookies) -> LogoutOutcome {
        let provider_signed_out = match self.provider.sign_out(cookies).await {
            Ok(()) => true,
            Err(err) => {
                warn!(error = %err, "identity provider sign-out failed, clearing cookies anyway");
                false
            }
        };

        let mut names: BTreeSet<String> = cookies
            .names()
            .filter(|name| self.policy.is_session_cookie(name))
            .map(str::to_string)
            .collect();
        names.extend(LEGACY_SESSION_COOKIES.iter().map(|name| name.to_string()));
        names.insert(self.policy.session_cookie_name.clone());

        let set_cookies = names
            .iter()
            .map(|name| self.policy.clear_cookie(name))
            .collect();
        for name in &names {
            cookies.remove(name);
        }

        let cleared: Vec<String> = names.into_iter().collect();
        info!(cleared = cleared.len(), provider_signed_out, "session cleared");

        LogoutOutcome {
            provider_signed_out,
            cleared,
            set_cookies,
        }
    }
}
