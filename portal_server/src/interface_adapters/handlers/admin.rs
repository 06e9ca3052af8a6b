use crate::interface_adapters::state::AdminSubject;
use axum::Extension;

// Page markup lives in the frontend; the server only owns access to it.
pub async fn login_page() -> &'static str {
    "admin login"
}

#[tracing::instrument(name = "dashboard", skip_all, fields(subject = %subject.0))]
pub async fn dashboard(Extension(subject): Extension<AdminSubject>) -> String {
    tracing::debug!("dashboard served");
    format!("admin dashboard for {}", subject.0)
}
