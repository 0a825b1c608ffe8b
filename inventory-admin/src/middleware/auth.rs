use crate::flash::{Flash, FlashKind};
use crate::htmx;
use crate::services::metrics::SESSION_GATE_TOTAL;
use axum::{extract::Request, middleware::Next, response::Response};
use tower_sessions::Session;

/// Session key set at login for actors allowed into the panel.
pub const PETUGAS_FLAG: &str = "is_petugas";

pub const LOGIN_PATH: &str = "/login";

pub const UNAUTHENTICATED_WARNING: &str = "Anda belum terautentikasi.";

/// Outcome of the gate for a single request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateState {
    Gated,
    Passed,
}

impl GateState {
    pub fn evaluate(flag_present: bool) -> Self {
        if flag_present {
            Self::Passed
        } else {
            Self::Gated
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Gated => "gated",
            Self::Passed => "passed",
        }
    }
}

/// True when the petugas flag is present. Read errors count as absent.
pub async fn has_petugas_flag(session: &Session) -> bool {
    matches!(session.get::<bool>(PETUGAS_FLAG).await, Ok(Some(_)))
}

/// Lets requests carrying the petugas flag through untouched; everything else is
/// redirected to the login page with a warning flash.
pub async fn petugas_gate(session: Session, request: Request, next: Next) -> Response {
    let state = GateState::evaluate(has_petugas_flag(&session).await);
    SESSION_GATE_TOTAL
        .with_label_values(&[state.as_str()])
        .inc();

    match state {
        GateState::Passed => next.run(request).await,
        GateState::Gated => {
            tracing::debug!(path = %request.uri().path(), "No petugas session, redirecting to login");

            if let Err(e) =
                Flash::push(&session, FlashKind::Warning, UNAUTHENTICATED_WARNING).await
            {
                tracing::warn!(error = %e, "Failed to attach login warning");
            }

            htmx::redirect(request.headers(), LOGIN_PATH)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::Body,
        http::{header, Request as HttpRequest, StatusCode},
        middleware::from_fn,
        routing::get,
        Router,
    };
    use std::sync::{
        atomic::{AtomicUsize, Ordering},
        Arc,
    };
    use tower::ServiceExt;
    use tower_sessions::{MemoryStore, SessionManagerLayer};

    fn app(calls: Arc<AtomicUsize>) -> Router {
        let protected = Router::new()
            .route(
                "/protected",
                get(move || {
                    let calls = calls.clone();
                    async move {
                        calls.fetch_add(1, Ordering::SeqCst);
                        (StatusCode::ACCEPTED, [("x-handler", "protected")], "inner body")
                    }
                }),
            )
            .route_layer(from_fn(petugas_gate));

        Router::new()
            .route(
                "/sign-in",
                get(|session: Session| async move {
                    session.insert(PETUGAS_FLAG, true).await.unwrap();
                    "ok"
                }),
            )
            .route(
                "/flash",
                get(|session: Session| async move {
                    Flash::take(&session).await.warning.unwrap_or_default()
                }),
            )
            .merge(protected)
            .layer(SessionManagerLayer::new(MemoryStore::default()).with_secure(false))
    }

    fn session_cookie(response: &axum::response::Response) -> String {
        response.headers()[header::SET_COOKIE]
            .to_str()
            .unwrap()
            .split(';')
            .next()
            .unwrap()
            .to_string()
    }

    async fn body_string(response: axum::response::Response) -> String {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[test]
    fn evaluate_follows_flag_presence() {
        assert_eq!(GateState::evaluate(true), GateState::Passed);
        assert_eq!(GateState::evaluate(false), GateState::Gated);
    }

    #[tokio::test]
    async fn missing_flag_redirects_without_running_handler() {
        let calls = Arc::new(AtomicUsize::new(0));
        let app = app(calls.clone());

        let response = app
            .clone()
            .oneshot(
                HttpRequest::builder()
                    .uri("/protected")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(response.headers()[header::LOCATION], LOGIN_PATH);
        assert_eq!(calls.load(Ordering::SeqCst), 0);

        let cookie = session_cookie(&response);
        let response = app
            .oneshot(
                HttpRequest::builder()
                    .uri("/flash")
                    .header(header::COOKIE, cookie)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(body_string(response).await, UNAUTHENTICATED_WARNING);
    }

    #[tokio::test]
    async fn present_flag_runs_handler_once_and_passes_response_through() {
        let calls = Arc::new(AtomicUsize::new(0));
        let app = app(calls.clone());

        let response = app
            .clone()
            .oneshot(
                HttpRequest::builder()
                    .uri("/sign-in")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        let cookie = session_cookie(&response);

        let response = app
            .oneshot(
                HttpRequest::builder()
                    .uri("/protected")
                    .header(header::COOKIE, cookie)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(response.status(), StatusCode::ACCEPTED);
        assert_eq!(response.headers()["x-handler"], "protected");
        assert_eq!(body_string(response).await, "inner body");
    }

    #[tokio::test]
    async fn htmx_requests_are_redirected_with_hx_redirect() {
        let calls = Arc::new(AtomicUsize::new(0));

        let response = app(calls.clone())
            .oneshot(
                HttpRequest::builder()
                    .uri("/protected")
                    .header(htmx::HX_REQUEST, "true")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.headers()[htmx::HX_REDIRECT], LOGIN_PATH);
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }
}
