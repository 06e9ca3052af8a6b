use crate::interface_adapters::http::{append_set_cookies, request_cookies};
use crate::interface_adapters::protocol::LogoutResponse;
use crate::interface_adapters::state::AppState;
use crate::use_cases::logout::LogoutUseCase;
use axum::extract::State;
use axum::http::HeaderMap;
use axum::response::{IntoResponse, Response};
use axum::Json;
use std::sync::Arc;

// Handler for ending an admin session. Succeeds even when the identity
// provider cannot be reached; the expiring cookies are what log the browser out.
#[tracing::instrument(name = "logout", skip_all)]
pub async fn logout(State(state): State<Arc<AppState>>, headers: HeaderMap) -> Response {
    let mut cookies = request_cookies(&headers);
    let use_case = LogoutUseCase {
        provider: state.identity.clone(),
        policy: state.cookies.clone(),
    };

    let outcome = use_case.execute(&mut cookies).await;

    let mut response = Json(LogoutResponse { success: true }).into_response();
    append_set_cookies(response.headers_mut(), &outcome.set_cookies);
    response
}
