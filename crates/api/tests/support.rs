//! Shared harness for router tests.

#![allow(dead_code)]

use std::sync::Arc;

use axum::body::{to_bytes, Body};
use axum::http::{header, HeaderMap, Method, Request, StatusCode};
use axum::Router;
use serde_json::Value;
use tempfile::TempDir;
use timesync_api::{build_router, AppContext};
use timesync_domain::Config;
use timesync_infra::StaticSettings;
use tower::ServiceExt;

/// Router over a fresh database, with no provider credentials configured.
pub struct TestApp {
    pub context: Arc<AppContext>,
    router: Router,
    _temp_dir: TempDir,
}

impl TestApp {
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("failed to create temporary test directory");
        let db_path = temp_dir.path().join("timesync.db");
        let config = Config::with_database(db_path.to_string_lossy());

        let context = Arc::new(
            AppContext::with_settings(config, Arc::new(StaticSettings::default()))
                .expect("failed to create test context"),
        );
        let router = build_router(Arc::clone(&context));

        Self { context, router, _temp_dir: temp_dir }
    }

    /// Send a request and return status, headers and raw body.
    pub async fn send_raw(
        &self,
        method: Method,
        uri: &str,
        body: Option<Value>,
    ) -> (StatusCode, HeaderMap, String) {
        let mut builder = Request::builder().method(method).uri(uri);
        let body = match body {
            Some(json) => {
                builder = builder.header(header::CONTENT_TYPE, "application/json");
                Body::from(json.to_string())
            }
            None => Body::empty(),
        };

        let response = self
            .router
            .clone()
            .oneshot(builder.body(body).expect("request should build"))
            .await
            .expect("router is infallible");

        let status = response.status();
        let headers = response.headers().clone();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.expect("body should read");
        (status, headers, String::from_utf8_lossy(&bytes).into_owned())
    }

    /// Send a request and parse the body as JSON (`Null` when empty).
    pub async fn send(
        &self,
        method: Method,
        uri: &str,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let (status, _, text) = self.send_raw(method, uri, body).await;
        let json = if text.is_empty() {
            Value::Null
        } else {
            serde_json::from_str(&text).expect("response should be JSON")
        };
        (status, json)
    }
}
