#![allow(dead_code)]

use std::sync::Arc;

use anyhow::Result;
use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use chrono::Duration;
use serde_json::Value;
use tower::ServiceExt;

use contact_api::auth::{generate_jwt, JwtKeys};
use contact_api::config::AppConfig;
use contact_api::database::{ContactStore, MemoryStore};
use contact_api::{app, AppState};

pub const SECRET: &str = "integration-test-secret";

/// In-process application backed by the in-memory store
pub struct TestApp {
    pub router: Router,
    pub store: Arc<MemoryStore>,
    pub keys: JwtKeys,
}

pub struct TestResponse {
    pub status: StatusCode,
    pub body: Value,
}

impl TestApp {
    pub fn new() -> Self {
        let store = Arc::new(MemoryStore::new());
        let keys = JwtKeys::from_secret(SECRET, 0).expect("test secret");
        let shared: Arc<dyn ContactStore> = store.clone();

        let mut config = AppConfig::default();
        config.api.enable_request_logging = false;

        let router = app(AppState::new(shared, keys.clone()), &config);
        Self { router, store, keys }
    }

    pub fn token(&self, user_id: i64) -> String {
        generate_jwt(&self.keys, user_id, Duration::hours(1)).expect("token")
    }

    /// Send a request as `user` (or anonymously) and decode the JSON body
    pub async fn send(&self, method: Method, uri: &str, user: Option<i64>, body: Option<Value>) -> Result<TestResponse> {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(user_id) = user {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", self.token(user_id)));
        }

        let request = match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(serde_json::to_vec(&json)?))?,
            None => builder.body(Body::empty())?,
        };

        let response = self.router.clone().oneshot(request).await?;
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await?;
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes)?
        };

        Ok(TestResponse { status, body })
    }

    pub async fn get(&self, uri: &str, user: i64) -> Result<TestResponse> {
        self.send(Method::GET, uri, Some(user), None).await
    }

    pub async fn post(&self, uri: &str, user: i64, body: Value) -> Result<TestResponse> {
        self.send(Method::POST, uri, Some(user), Some(body)).await
    }

    pub async fn patch(&self, uri: &str, user: i64, body: Value) -> Result<TestResponse> {
        self.send(Method::PATCH, uri, Some(user), Some(body)).await
    }

    pub async fn put(&self, uri: &str, user: i64, body: Value) -> Result<TestResponse> {
        self.send(Method::PUT, uri, Some(user), Some(body)).await
    }

    pub async fn delete(&self, uri: &str, user: i64) -> Result<TestResponse> {
        self.send(Method::DELETE, uri, Some(user), None).await
    }

    /// Create a contact through the API and return its id
    pub async fn create_contact(&self, user: i64, first_name: &str) -> Result<i64> {
        let res = self.post("/contacts", user, john(first_name)).await?;
        assert_eq!(res.status, StatusCode::CREATED, "create failed: {}", res.body);
        res.body["data"]["id"].as_i64().ok_or_else(|| anyhow::anyhow!("missing id: {}", res.body))
    }
}

pub fn john(first_name: &str) -> Value {
    serde_json::json!({
        "first_name": first_name,
        "last_name": "Doe",
        "email": "john@example.com",
        "phone": "08123456789"
    })
}
