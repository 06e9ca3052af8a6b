use std::sync::Arc;
use std::time::Duration;

use tracing::debug;

use crate::domain::{AuthError, GateDecision, GateOutcome, RequestContext, RouteCategory, categorize};
use crate::use_cases::verifiers::{SessionVerifier, Verification};

/// Decides, per request, whether to serve it or bounce it to the login page
/// or the dashboard. Every verification failure redirects to login.
#[derive(Clone)]
pub struct SessionGate {
    verifier: Arc<dyn SessionVerifier>,
    cookie_name: String,
    timeout: Duration,
}

impl SessionGate {
    pub fn new(
        verifier: Arc<dyn SessionVerifier>,
        cookie_name: impl Into<String>,
        timeout: Duration,
    ) -> Self {
        Self {
            verifier,
            cookie_name: cookie_name.into(),
            timeout,
        }
    }

    pub async fn classify(&self, ctx: &RequestContext) -> GateOutcome {
        match categorize(&ctx.path) {
            RouteCategory::Public | RouteCategory::Login => GateOutcome::allow(),
            RouteCategory::Protected => match self.authenticate(ctx).await {
                Ok(verification) => GateOutcome {
                    decision: GateDecision::Allow,
                    subject: Some(verification.subject),
                    set_cookies: verification.set_cookies,
                },
                Err(_) => GateOutcome::redirect_login(),
            },
            // Signed-in staff skip the landing page.
            RouteCategory::AdminRoot => match self.authenticate(ctx).await {
                Ok(verification) => GateOutcome {
                    decision: GateDecision::RedirectDashboard,
                    subject: Some(verification.subject),
                    set_cookies: verification.set_cookies,
                },
                Err(_) => GateOutcome::redirect_login(),
            },
        }
    }

    async fn authenticate(&self, ctx: &RequestContext) -> Result<Verification, AuthError> {
        if ctx.cookies.session_value(&self.cookie_name).is_none() {
            debug!(path = %ctx.path, reason = %AuthError::MissingSession, "session rejected");
            return Err(AuthError::MissingSession);
        }

        let result = match tokio::time::timeout(self.timeout, self.verifier.verify(ctx)).await {
            Ok(result) => result,
            Err(_) => Err(AuthError::Timeout),
        };

        if let Err(reason) = &result {
            debug!(path = %ctx.path, %reason, "session rejected");
        }
        result
    }
}
