//! Response helpers for htmx-driven forms.

use axum::{
    http::{HeaderMap, HeaderValue, StatusCode},
    response::{IntoResponse, Redirect, Response},
};

pub const HX_REQUEST: &str = "hx-request";
pub const HX_REDIRECT: &str = "hx-redirect";

pub fn is_htmx(headers: &HeaderMap) -> bool {
    headers
        .get(HX_REQUEST)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v == "true")
}

/// Full-page navigation to `location`: `HX-Redirect` for htmx, `303 See Other` otherwise.
pub fn redirect(headers: &HeaderMap, location: &str) -> Response {
    if !is_htmx(headers) {
        return Redirect::to(location).into_response();
    }

    let mut response = StatusCode::OK.into_response();
    if let Ok(value) = HeaderValue::from_str(location) {
        response.headers_mut().insert(HX_REDIRECT, value);
    }
    response
}
