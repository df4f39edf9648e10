//! Shared helpers for the HTTP integration tests.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Arc;

use actix_web::{body::MessageBody, dev::ServiceResponse, http::header, test, web};
use serde_json::json;
use tasklist::{
    auth::{TokenPair, TokenService},
    store::MemoryStore,
    AppState, Config,
};

pub const ACCESS_SECRET: &str = "integration-access-secret";
pub const REFRESH_SECRET: &str = "integration-refresh-secret";

pub fn test_config() -> Config {
    let vars: HashMap<&str, &str> = HashMap::from([
        ("DB_HOST", "localhost"),
        ("DB_PORT", "5432"),
        ("DB_USER", "postgres"),
        ("DB_PASS", "postgres"),
        ("DB_NAME", "tasklist_test"),
        ("JWT_SECRET_KEY", ACCESS_SECRET),
        ("JWT_REFRESH_SECRET_KEY", REFRESH_SECRET),
        // Minimum bcrypt cost keeps the suite fast.
        ("BCRYPT_COST", "4"),
    ]);
    Config::from_lookup(|key| vars.get(key).map(|v| v.to_string()))
        .expect("test configuration is valid")
}

/// Application state over a fresh in-memory store.
pub fn memory_state() -> web::Data<AppState> {
    web::Data::new(AppState::new(&test_config(), Arc::new(MemoryStore::new())))
}

/// A token service using the same secrets as [`test_config`].
pub fn token_service() -> TokenService {
    TokenService::from_config(&test_config())
}

pub fn bearer(token: &str) -> (header::HeaderName, String) {
    (header::AUTHORIZATION, format!("Bearer {}", token))
}

pub async fn body_text<B: MessageBody>(resp: ServiceResponse<B>) -> String {
    String::from_utf8_lossy(&test::read_body(resp).await).into_owned()
}

pub struct TestUser {
    pub id: i32,
    pub login: String,
    pub access_token: String,
    pub refresh_token: String,
}

/// Registers `login` and logs it in, returning its id and tokens.
pub async fn register_and_login<S, B>(app: &S, login: &str, password: &str) -> TestUser
where
    S: actix_web::dev::Service<
        actix_http::Request,
        Response = ServiceResponse<B>,
        Error = actix_web::Error,
    >,
    B: MessageBody,
{
    let req = test::TestRequest::post()
        .uri("/users/")
        .set_json(json!({ "login": login, "password": password }))
        .to_request();
    let resp = test::call_service(app, req).await;
    let status = resp.status();
    let body = test::read_body(resp).await;
    assert_eq!(
        status,
        actix_web::http::StatusCode::CREATED,
        "Registration failed. Body: {:?}",
        String::from_utf8_lossy(&body)
    );
    let user: serde_json::Value = serde_json::from_slice(&body).expect("user JSON");

    let tokens = login_as(app, login, password).await;
    TestUser {
        id: user["id"].as_i64().expect("user id") as i32,
        login: login.to_string(),
        access_token: tokens.access_token,
        refresh_token: tokens.refresh_token,
    }
}

pub async fn login_as<S, B>(app: &S, login: &str, password: &str) -> TokenPair
where
    S: actix_web::dev::Service<
        actix_http::Request,
        Response = ServiceResponse<B>,
        Error = actix_web::Error,
    >,
    B: MessageBody,
{
    let req = test::TestRequest::post()
        .uri("/users/login/")
        .set_form([("username", login), ("password", password)])
        .to_request();
    let resp = test::call_service(app, req).await;
    let status = resp.status();
    let body = test::read_body(resp).await;
    assert_eq!(
        status,
        actix_web::http::StatusCode::OK,
        "Login failed. Body: {:?}",
        String::from_utf8_lossy(&body)
    );
    serde_json::from_slice(&body).expect("token pair JSON")
}
