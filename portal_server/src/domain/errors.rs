use std::fmt;

// Reasons a session was not accepted. Only ever logged; clients just see a
// redirect to the login page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthError {
    MissingSession,
    MalformedSession,
    InvalidClaims,
    RoleMismatch,
    SessionExpired,
    Unauthenticated,
    ProviderUnavailable,
    Timeout,
}

impl fmt::Display for AuthError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let reason = match self {
            AuthError::MissingSession => "session cookie missing",
            AuthError::MalformedSession => "session cookie malformed",
            AuthError::InvalidClaims => "session token claims invalid",
            AuthError::RoleMismatch => "session role is not authenticated",
            AuthError::SessionExpired => "session expired",
            AuthError::Unauthenticated => "identity provider returned no user",
            AuthError::ProviderUnavailable => "identity provider unavailable",
            AuthError::Timeout => "session verification timed out",
        };
        f.write_str(reason)
    }
}

impl std::error::Error for AuthError {}
