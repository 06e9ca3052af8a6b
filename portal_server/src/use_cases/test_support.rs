use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use chrono::{DateTime, TimeZone, Utc};
use serde_json::{Value, json};

use crate::domain::{
    Clock, IdentityProvider, IdentityUser, ProviderResult, RequestContext, RequestCookies,
    SessionTokens, UserLookup,
};

pub(crate) const TEST_COOKIE: &str = "sb-test-auth-token";

// Shared fixed time source for deterministic use-case tests.
#[derive(Clone, Copy)]
pub(crate) struct FixedClock(pub(crate) DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

pub(crate) fn fixed_clock() -> FixedClock {
    FixedClock(
        Utc.with_ymd_and_hms(2026, 3, 15, 12, 0, 0)
            .single()
            .expect("valid timestamp"),
    )
}

pub(crate) fn unsigned_jwt(claims: &Value) -> String {
    let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"HS256","typ":"JWT"}"#);
    let payload = URL_SAFE_NO_PAD.encode(claims.to_string());
    format!("{header}.{payload}.not-a-real-signature")
}

pub(crate) fn token_with(sub: &str, role: &str, exp: i64) -> String {
    unsigned_jwt(&json!({
        "iss": "https://test.supabase.co/auth/v1",
        "sub": sub,
        "exp": exp,
        "iat": exp - 3600,
        "role": role,
    }))
}

// Well-formed token the scripted provider will only accept when told to.
pub(crate) fn valid_token(sub: &str) -> String {
    token_with(sub, "authenticated", fixed_clock().0.timestamp() + 3600)
}

// Same shape as a real token; nothing upstream has ever issued it.
pub(crate) fn forged_token(sub: &str) -> String {
    valid_token(sub)
}

pub(crate) fn session_cookie_pair(access_token: &str, refresh_token: Option<&str>) -> String {
    let tokens = SessionTokens {
        access_token: access_token.to_string(),
        refresh_token: refresh_token.map(str::to_string),
    };
    format!("{TEST_COOKIE}={}", tokens.to_cookie_value())
}

pub(crate) fn session_context(
    path: &str,
    access_token: &str,
    refresh_token: Option<&str>,
) -> RequestContext {
    let pair = session_cookie_pair(access_token, refresh_token);
    RequestContext::new(path, RequestCookies::parse([pair.as_str()]))
}

#[derive(Default)]
struct Script {
    // Access token -> user the provider returns for it.
    users: HashMap<String, IdentityUser>,
    rotated_cookies: Vec<String>,
    fail_lookup: bool,
    fail_sign_out: bool,
    stall_lookup: bool,
    lookup_calls: usize,
    sign_out_calls: usize,
}

// Identity provider fake driven by the session cookie, like the real client.
#[derive(Clone, Default)]
pub(crate) struct ScriptedProvider {
    script: Arc<Mutex<Script>>,
}

impl ScriptedProvider {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn with_user(self, access_token: &str, user_id: &str) -> Self {
        self.with_user_role(access_token, user_id, "authenticated")
    }

    pub(crate) fn with_user_role(self, access_token: &str, user_id: &str, role: &str) -> Self {
        {
            let mut script = self.script.lock().expect("script mutex poisoned");
            script.users.insert(
                access_token.to_string(),
                IdentityUser {
                    id: user_id.to_string(),
                    email: Some(format!("{user_id}@example.com")),
                    role: Some(role.to_string()),
                },
            );
        }
        self
    }

    pub(crate) fn with_rotated_cookie(self, cookie: &str) -> Self {
        self.script
            .lock()
            .expect("script mutex poisoned")
            .rotated_cookies
            .push(cookie.to_string());
        self
    }

    pub(crate) fn failing_lookup(self) -> Self {
        self.script.lock().expect("script mutex poisoned").fail_lookup = true;
        self
    }

    pub(crate) fn failing_sign_out(self) -> Self {
        self.script.lock().expect("script mutex poisoned").fail_sign_out = true;
        self
    }

    pub(crate) fn stalling_lookup(self) -> Self {
        self.script.lock().expect("script mutex poisoned").stall_lookup = true;
        self
    }

    pub(crate) fn lookup_calls(&self) -> usize {
        self.script.lock().expect("script mutex poisoned").lookup_calls
    }

    pub(crate) fn sign_out_calls(&self) -> usize {
        self.script.lock().expect("script mutex poisoned").sign_out_calls
    }
}

#[async_trait]
impl IdentityProvider for ScriptedProvider {
    async fn current_user(&self, cookies: &RequestCookies) -> ProviderResult<UserLookup> {
        let stall = {
            let mut script = self.script.lock().expect("script mutex poisoned");
            script.lookup_calls += 1;
            script.stall_lookup
        };
        if stall {
            tokio::time::sleep(Duration::from_secs(30)).await;
        }

        let script = self.script.lock().expect("script mutex poisoned");
        if script.fail_lookup {
            return Err("lookup failed".into());
        }

        let Some(raw) = cookies.session_value(TEST_COOKIE) else {
            return Ok(UserLookup::anonymous());
        };
        let Ok(tokens) = SessionTokens::parse_cookie(&raw) else {
            return Ok(UserLookup::anonymous());
        };

        match script.users.get(&tokens.access_token) {
            Some(user) => Ok(UserLookup {
                user: Some(user.clone()),
                set_cookies: script.rotated_cookies.clone(),
            }),
            None => Ok(UserLookup::anonymous()),
        }
    }

    async fn sign_out(&self, _cookies: &RequestCookies) -> ProviderResult<()> {
        let mut script = self.script.lock().expect("script mutex poisoned");
        script.sign_out_calls += 1;
        if script.fail_sign_out {
            return Err("sign-out failed".into());
        }
        Ok(())
    }
}
