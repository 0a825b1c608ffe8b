//! Common test utilities for inventory-admin integration tests.
#![allow(dead_code)]

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    response::Response,
    Router,
};
use inventory_admin::config::SessionSettings;
use inventory_admin::htmx::HX_REQUEST;
use inventory_admin::models::{NewUser, Role};
use inventory_admin::services::{init_metrics, InMemoryStore};
use inventory_admin::startup::build_router;
use inventory_admin::utils::{hash_password, Password};
use http_body_util::BodyExt;
use inventory_admin::AppState;
use once_cell::sync::Lazy;
use std::sync::{Arc, Once};
use tower::ServiceExt;

static INIT: Once = Once::new();

pub const STAFF_EMAIL: &str = "siti@sekolah.id";
pub const STAFF_NAME: &str = "Siti Rahma";
pub const PASSWORD: &str = "rahasia123";

/// One argon2 hash shared by every seeded account.
static PASSWORD_HASH: Lazy<String> = Lazy::new(|| {
    hash_password(&Password::new(PASSWORD.to_string()))
        .expect("Failed to hash test password")
        .into_string()
});

/// Initialize tracing for tests (only once).
pub fn init_tracing() {
    INIT.call_once(|| {
        tracing_subscriber::fmt()
            .with_env_filter("info,inventory_admin=debug")
            .with_test_writer()
            .try_init()
            .ok();
    });
}

/// Router over an in-memory store, with a cookie jar of one session.
pub struct TestApp {
    pub router: Router,
    pub store: Arc<InMemoryStore>,
    cookie: Option<String>,
}

pub fn spawn_app() -> TestApp {
    spawn_app_with(&SessionSettings::default())
}

pub fn spawn_app_with(session: &SessionSettings) -> TestApp {
    init_tracing();
    init_metrics();

    let store = Arc::new(InMemoryStore::new());
    seed_user(&store, STAFF_EMAIL, STAFF_NAME, Role::Staff);

    let router = build_router(
        AppState::new(store.clone()),
        session,
        "static",
    );

    TestApp {
        router,
        store,
        cookie: None,
    }
}

pub fn seed_user(store: &InMemoryStore, email: &str, full_name: &str, role: Role) {
    store.seed_user(&NewUser {
        email: email.to_string(),
        password_hash: PASSWORD_HASH.clone(),
        full_name: full_name.to_string(),
        role,
    });
}

impl TestApp {
    /// Send a request with the current session cookie and keep any cookie the response sets.
    pub async fn send(&mut self, request: Request<Body>) -> Response {
        let mut request = request;
        if let Some(cookie) = &self.cookie {
            request
                .headers_mut()
                .insert(header::COOKIE, cookie.parse().unwrap());
        }

        let response = self.router.clone().oneshot(request).await.unwrap();

        if let Some(set_cookie) = response.headers().get(header::SET_COOKIE) {
            let pair = set_cookie
                .to_str()
                .unwrap()
                .split(';')
                .next()
                .unwrap()
                .to_string();
            self.cookie = Some(pair);
        }

        response
    }

    pub async fn get(&mut self, uri: &str) -> Response {
        self.send(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
    }

    pub async fn form(&mut self, method: Method, uri: &str, body: &str) -> Response {
        self.send(
            Request::builder()
                .method(method)
                .uri(uri)
                .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
    }

    /// Same as `form`, flagged as an htmx request.
    pub async fn htmx_form(&mut self, method: Method, uri: &str, body: &str) -> Response {
        self.send(
            Request::builder()
                .method(method)
                .uri(uri)
                .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
                .header(HX_REQUEST, "true")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
    }

    pub async fn delete(&mut self, uri: &str) -> Response {
        self.send(
            Request::builder()
                .method(Method::DELETE)
                .uri(uri)
                .body(Body::empty())
                .unwrap(),
        )
        .await
    }

    pub async fn login_as(&mut self, email: &str) -> Response {
        let body = serde_urlencoded::to_string([("email", email), ("password", PASSWORD)]).unwrap();
        self.form(Method::POST, "/login", &body).await
    }

    /// Sign in as the seeded staff account.
    pub async fn login(&mut self) {
        let response = self.login_as(STAFF_EMAIL).await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&response), "/categories");
    }

    /// GET a page and return its body.
    pub async fn page(&mut self, uri: &str) -> String {
        let response = self.get(uri).await;
        assert_eq!(response.status(), StatusCode::OK, "GET {uri}");
        body_text(response).await
    }
}

pub fn location(response: &Response) -> &str {
    response.headers()[header::LOCATION].to_str().unwrap()
}

pub async fn body_text(response: Response) -> String {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8(bytes.to_vec()).unwrap()
}
