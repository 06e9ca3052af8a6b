use async_trait::async_trait;
use tracing::warn;

use crate::domain::{
    AuthError, Clock, IdentityProvider, RequestContext, Role, SessionClaims, SessionTokens,
    decode_unverified,
};

/// Identity accepted by a verifier.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Verification {
    pub subject: String,
    pub set_cookies: Vec<String>,
}

/// One way of deciding whether the request carries a live admin session.
#[async_trait]
pub trait SessionVerifier: Send + Sync {
    async fn verify(&self, ctx: &RequestContext) -> Result<Verification, AuthError>;
}

/// Asks the identity provider who owns the session. Authoritative: the
/// provider checks the token signature and revocation state.
pub struct NetworkVerifier<P> {
    pub provider: P,
}

#[async_trait]
impl<P> SessionVerifier for NetworkVerifier<P>
where
    P: IdentityProvider,
{
    async fn verify(&self, ctx: &RequestContext) -> Result<Verification, AuthError> {
        let lookup = self
            .provider
            .current_user(&ctx.cookies)
            .await
            .map_err(|err| {
                warn!(error = %err, "identity provider lookup failed");
                AuthError::ProviderUnavailable
            })?;

        let user = lookup.user.ok_or(AuthError::Unauthenticated)?;
        if user.role.as_deref().is_some_and(|role| role != "authenticated") {
            return Err(AuthError::RoleMismatch);
        }

        Ok(Verification {
            subject: user.id,
            set_cookies: lookup.set_cookies,
        })
    }
}

/// Reads claims straight out of the session cookie.
///
/// The token signature is NOT checked, so a forged but well-formed token
/// passes `verify`. Only use it on its own when the provider is unreachable
/// by design (local development); otherwise wrap it in `PrecheckedVerifier`.
pub struct LocalDecodeVerifier<C> {
    pub cookie_name: String,
    pub clock: C,
}

impl<C> LocalDecodeVerifier<C>
where
    C: Clock,
{
    /// Structural check: cookie present, JSON array, decodable claims and an
    /// `authenticated` role. Expiry is not checked here.
    pub fn inspect(&self, ctx: &RequestContext) -> Result<SessionClaims, AuthError> {
        let raw = ctx
            .cookies
            .session_value(&self.cookie_name)
            .ok_or(AuthError::MissingSession)?;
        let tokens = SessionTokens::parse_cookie(&raw)?;
        let claims = decode_unverified(&tokens.access_token)?;
        if claims.role != Role::Authenticated {
            return Err(AuthError::RoleMismatch);
        }
        Ok(claims)
    }
}

#[async_trait]
impl<C> SessionVerifier for LocalDecodeVerifier<C>
where
    C: Clock,
{
    async fn verify(&self, ctx: &RequestContext) -> Result<Verification, AuthError> {
        let claims = self.inspect(ctx)?;
        if claims.is_expired_at(self.clock.now_epoch_seconds()) {
            return Err(AuthError::SessionExpired);
        }
        Ok(Verification {
            subject: claims.sub,
            set_cookies: Vec::new(),
        })
    }
}

/// Local decode as a cheap filter, then the provider decides.
///
/// Garbage cookies never cost a network round trip, and the local result
/// never grants access by itself. An expired access token still goes to the
/// provider, which can refresh it.
pub struct PrecheckedVerifier<C, P> {
    pub precheck: LocalDecodeVerifier<C>,
    pub authority: NetworkVerifier<P>,
}

#[async_trait]
impl<C, P> SessionVerifier for PrecheckedVerifier<C, P>
where
    C: Clock,
    P: IdentityProvider,
{
    async fn verify(&self, ctx: &RequestContext) -> Result<Verification, AuthError> {
        let claims = self.precheck.inspect(ctx)?;
        let verification = self.authority.verify(ctx).await?;

        if verification.subject != claims.sub {
            warn!(
                cookie_subject = %claims.sub,
                provider_subject = %verification.subject,
                "session cookie subject does not match provider user"
            );
            return Err(AuthError::Unauthenticated);
        }

        Ok(verification)
    }
}
