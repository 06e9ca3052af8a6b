// Shared helpers for moving cookies between axum headers and the domain.

use axum::http::header::{COOKIE, SET_COOKIE};
use axum::http::{HeaderMap, HeaderValue};

use crate::domain::RequestCookies;

pub fn request_cookies(headers: &HeaderMap) -> RequestCookies {
    RequestCookies::parse(
        headers
            .get_all(COOKIE)
            .iter()
            .filter_map(|value| value.to_str().ok()),
    )
}

pub fn append_set_cookies(headers: &mut HeaderMap, cookies: &[String]) {
    for cookie in cookies {
        match HeaderValue::from_str(cookie) {
            Ok(value) => {
                headers.append(SET_COOKIE, value);
            }
            Err(err) => tracing::warn!(error = %err, "dropping unrepresentable set-cookie header"),
        }
    }
}
