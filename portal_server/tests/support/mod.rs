// Stub identity provider plus a real portal server wired to it.
#![allow(dead_code)]

use axum::{
    Json, Router,
    extract::State,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use serde::Deserialize;
use serde_json::json;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::{SystemTime, UNIX_EPOCH};

pub const ANON_KEY: &str = "anon-key";
pub const SESSION_COOKIE: &str = "sb-stub-auth-token";

#[derive(Default)]
struct StubInner {
    // Access token -> user id.
    users: HashMap<String, String>,
    // Refresh token -> user id.
    refresh_tokens: HashMap<String, String>,
    logout_status: Option<StatusCode>,
    logout_calls: usize,
    refresh_calls: usize,
}

// Minimal GoTrue look-alike: only tokens registered here are "signed".
#[derive(Clone, Default)]
pub struct StubProvider {
    inner: Arc<Mutex<StubInner>>,
}

impl StubProvider {
    pub fn issue(&self, access_token: &str, user_id: &str) {
        let mut inner = self.inner.lock().expect("stub mutex poisoned");
        inner.users.insert(access_token.to_string(), user_id.to_string());
    }

    pub fn issue_refresh(&self, refresh_token: &str, user_id: &str) {
        let mut inner = self.inner.lock().expect("stub mutex poisoned");
        inner
            .refresh_tokens
            .insert(refresh_token.to_string(), user_id.to_string());
    }

    pub fn fail_logout_with(&self, status: StatusCode) {
        self.inner.lock().expect("stub mutex poisoned").logout_status = Some(status);
    }

    pub fn logout_calls(&self) -> usize {
        self.inner.lock().expect("stub mutex poisoned").logout_calls
    }

    pub fn refresh_calls(&self) -> usize {
        self.inner.lock().expect("stub mutex poisoned").refresh_calls
    }
}

fn bearer(headers: &HeaderMap) -> Option<String> {
    if headers.get("apikey").and_then(|v| v.to_str().ok()) != Some(ANON_KEY) {
        return None;
    }
    headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::to_string)
}

fn user_json(user_id: &str) -> serde_json::Value {
    json!({
        "id": user_id,
        "aud": "authenticated",
        "role": "authenticated",
        "email": format!("{user_id}@example.com"),
    })
}

async fn get_user(State(stub): State<StubProvider>, headers: HeaderMap) -> Response {
    let inner = stub.inner.lock().expect("stub mutex poisoned");
    match bearer(&headers).and_then(|token| inner.users.get(&token).cloned()) {
        Some(user_id) => Json(user_json(&user_id)).into_response(),
        None => (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "msg": "invalid JWT" })),
        )
            .into_response(),
    }
}

#[derive(Deserialize)]
struct RefreshBody {
    refresh_token: String,
}

async fn refresh(State(stub): State<StubProvider>, Json(body): Json<RefreshBody>) -> Response {
    let mut inner = stub.inner.lock().expect("stub mutex poisoned");
    inner.refresh_calls += 1;
    // Refresh tokens are single use.
    let Some(user_id) = inner.refresh_tokens.remove(&body.refresh_token) else {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error_description": "Invalid Refresh Token" })),
        )
            .into_response();
    };

    let access_token = jwt(&user_id, now() + 3600);
    let refresh_token = format!("{}-next", body.refresh_token);
    inner.users.insert(access_token.clone(), user_id.clone());
    inner.refresh_tokens.insert(refresh_token.clone(), user_id.clone());

    Json(json!({
        "access_token": access_token,
        "refresh_token": refresh_token,
        "expires_in": 3600,
        "token_type": "bearer",
        "user": user_json(&user_id),
    }))
    .into_response()
}

async fn logout(State(stub): State<StubProvider>) -> StatusCode {
    let mut inner = stub.inner.lock().expect("stub mutex poisoned");
    inner.logout_calls += 1;
    inner.logout_status.unwrap_or(StatusCode::NO_CONTENT)
}

pub async fn spawn_stub(stub: StubProvider) -> String {
    let app = Router::new()
        .route("/auth/v1/user", get(get_user))
        .route("/auth/v1/token", post(refresh))
        .route("/auth/v1/logout", post(logout))
        .with_state(stub);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind ephemeral stub port");
    let addr = listener.local_addr().expect("get local addr");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("stub server failed");
    });
    format!("http://{addr}")
}

// Start the portal against `identity_url` and return its base URL.
pub async fn spawn_portal(identity_url: &str) -> String {
    let identity_url = identity_url.to_string();
    let config = portal_server::Config::from_lookup(|key| match key {
        "IDENTITY_PROVIDER_URL" => Some(identity_url.clone()),
        "IDENTITY_PROVIDER_ANON_KEY" => Some(ANON_KEY.to_string()),
        "SESSION_COOKIE_NAME" => Some(SESSION_COOKIE.to_string()),
        "AUTH_VERIFY_TIMEOUT_MS" => Some("2000".to_string()),
        _ => None,
    })
    .expect("valid test config");
    let state = portal_server::build_state(&config).expect("identity client");

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind ephemeral portal port");
    let addr = listener.local_addr().expect("get local addr");
    tokio::spawn(async move {
        portal_server::serve(listener, state)
            .await
            .expect("portal server failed");
    });
    format!("http://{addr}")
}

// Redirects are asserted on, never followed.
pub fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .redirect(reqwest::redirect::Policy::none())
        .build()
        .expect("test client")
}

pub fn now() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("clock after epoch")
        .as_secs() as i64
}

// Unsigned token; only "valid" if the stub has issued it.
pub fn jwt(sub: &str, exp: i64) -> String {
    let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"HS256","typ":"JWT"}"#);
    let payload = URL_SAFE_NO_PAD.encode(
        json!({
            "iss": "http://stub/auth/v1",
            "sub": sub,
            "exp": exp,
            "iat": exp - 3600,
            "role": "authenticated",
            // Unique per call so refreshed tokens never collide.
            "jti": next_jti(),
        })
        .to_string(),
    );
    format!("{header}.{payload}.c2lnbmF0dXJl")
}

fn next_jti() -> String {
    use std::sync::atomic::{AtomicU64, Ordering};
    static COUNTER: AtomicU64 = AtomicU64::new(0);
    format!("jti-{}", COUNTER.fetch_add(1, Ordering::Relaxed))
}

pub fn session_cookie(access_token: &str, refresh_token: Option<&str>) -> String {
    let value = json!([access_token, refresh_token, null, null, null]).to_string();
    format!("{SESSION_COOKIE}={value}")
}
