use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use serde::Deserialize;
use serde_json::Value;

use crate::domain::errors::AuthError;

/// Privilege level carried in the `role` claim.
///
/// Any other value fails deserialization, so an unexpected role can never be
/// mistaken for a signed-in administrator.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Authenticated,
    Anon,
    ServiceRole,
}

/// Claims read from the session access token.
///
/// Every field is required. Extra claims issued by the provider (email,
/// metadata, assurance level) are ignored.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct SessionClaims {
    pub iss: String,
    pub sub: String,
    pub exp: i64,
    pub iat: i64,
    pub role: Role,
}

impl SessionClaims {
    pub fn is_expired_at(&self, now_epoch_seconds: i64) -> bool {
        self.exp <= now_epoch_seconds
    }
}

/// Tokens stored in the session cookie: a JSON array whose first element is
/// the access token and whose second element is the refresh token.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SessionTokens {
    pub access_token: String,
    pub refresh_token: Option<String>,
}

impl SessionTokens {
    pub fn parse_cookie(value: &str) -> Result<Self, AuthError> {
        let items: Vec<Value> =
            serde_json::from_str(value.trim()).map_err(|_| AuthError::MalformedSession)?;

        let access_token = items
            .first()
            .and_then(Value::as_str)
            .filter(|token| !token.is_empty())
            .ok_or(AuthError::MalformedSession)?
            .to_string();
        let refresh_token = items
            .get(1)
            .and_then(Value::as_str)
            .filter(|token| !token.is_empty())
            .map(str::to_string);

        Ok(Self {
            access_token,
            refresh_token,
        })
    }

    // Same five-slot layout the provider's browser client writes.
    pub fn to_cookie_value(&self) -> String {
        serde_json::json!([self.access_token, self.refresh_token, null, null, null]).to_string()
    }
}

/// Decode the claims of a JWT without checking its signature.
///
/// The result is unauthenticated data: anyone can mint a well-formed token
/// with any claims. Use it for cheap rejection only.
pub fn decode_unverified(token: &str) -> Result<SessionClaims, AuthError> {
    let mut segments = token.split('.');
    let (Some(_header), Some(payload), Some(_signature), None) = (
        segments.next(),
        segments.next(),
        segments.next(),
        segments.next(),
    ) else {
        return Err(AuthError::MalformedSession);
    };

    let bytes = URL_SAFE_NO_PAD
        .decode(payload.trim_end_matches('='))
        .map_err(|_| AuthError::MalformedSession)?;

    serde_json::from_slice(&bytes).map_err(|_| AuthError::InvalidClaims)
}
