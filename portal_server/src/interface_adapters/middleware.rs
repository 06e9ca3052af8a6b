use crate::domain::gate::{DASHBOARD_PATH, LOGIN_PATH};
use crate::domain::{GateDecision, RequestContext};
use crate::interface_adapters::http::{append_set_cookies, request_cookies};
use crate::interface_adapters::state::{AdminSubject, AppState};
use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::{IntoResponse, Redirect, Response};
use std::sync::Arc;

// Runs in front of every route; public paths pass straight through.
pub async fn session_gate(
    State(state): State<Arc<AppState>>,
    mut request: Request,
    next: Next,
) -> Response {
    let ctx = RequestContext::new(request.uri().path(), request_cookies(request.headers()));
    let outcome = state.gate.classify(&ctx).await;

    match outcome.decision {
        GateDecision::Allow => {
            if let Some(subject) = outcome.subject {
                request.extensions_mut().insert(AdminSubject(subject));
            }
            let mut response = next.run(request).await;
            append_set_cookies(response.headers_mut(), &outcome.set_cookies);
            response
        }
        GateDecision::RedirectDashboard => {
            let mut response = Redirect::temporary(DASHBOARD_PATH).into_response();
            append_set_cookies(response.headers_mut(), &outcome.set_cookies);
            response
        }
        GateDecision::RedirectLogin => Redirect::temporary(LOGIN_PATH).into_response(),
    }
}
