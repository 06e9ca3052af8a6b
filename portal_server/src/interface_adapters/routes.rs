use crate::interface_adapters::handlers::{admin, auth, booking, health};
use crate::interface_adapters::middleware::session_gate;
use crate::interface_adapters::state::AppState;
use axum::{
    Router,
    http::StatusCode,
    middleware,
    routing::{get, post},
};
use std::sync::Arc;

pub fn app(state: Arc<AppState>) -> Router {
    // Wire the HTTP routes to their handlers; the gate wraps all of them and
    // answers `/admin` itself, so it has no handler.
    Router::new()
        .route("/health", get(health::health))
        .route("/admin/login", get(admin::login_page))
        .route("/admin/dashboard", get(admin::dashboard))
        .route("/api/auth/logout", post(auth::logout))
        .route("/api/booking-link", get(booking::booking_link))
        .fallback(not_found)
        .layer(middleware::from_fn_with_state(state.clone(), session_gate))
        .with_state(state)
}

// Explicit so unknown `/admin/...` paths still pass through the gate.
async fn not_found() -> StatusCode {
    StatusCode::NOT_FOUND
}
