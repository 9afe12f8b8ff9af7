//! Integration tests for IpuFood.
//!
//! # Running Tests
//!
//! ```bash
//! # Prepare a database and start the server
//! ipufood migrate && ipufood seed
//! IPUFOOD_TRUST_PROXY_HEADERS=true cargo run -p ipufood-server
//!
//! # Run the ignored tests against it
//! IPUFOOD_TEST_BASE_URL=http://localhost:3000 cargo test -p ipufood-integration-tests -- --ignored
//! ```
//!
//! The tests rely on the demo accounts created by `ipufood seed`. Each client
//! sends its own `X-Forwarded-For`, so the server must trust proxy headers or
//! the login rate limit is shared by the whole run.

use reqwest::header::{HeaderMap, HeaderValue};
use reqwest::{Client, Response, StatusCode};
use serde_json::{Value, json};
use uuid::Uuid;

/// Demo administrator created by `ipufood seed`.
pub const ADMIN_EMAIL: &str = "admin@ipufood.com";
pub const ADMIN_PASSWORD: &str = "admin123";

/// Demo customer created by `ipufood seed`.
pub const CUSTOMER_EMAIL: &str = "cliente@ipufood.com";
pub const CUSTOMER_PASSWORD: &str = "cliente123";

/// Base URL of the server under test.
#[must_use]
pub fn base_url() -> String {
    std::env::var("IPUFOOD_TEST_BASE_URL").unwrap_or_else(|_| "http://localhost:3000".to_string())
}

/// URL for `path` on the server under test.
#[must_use]
pub fn url(path: &str) -> String {
    format!("{}{path}", base_url().trim_end_matches('/'))
}

/// A client with its own cookie jar.
///
/// Each client reports a distinct forwarded IP so the login rate limit is
/// per test rather than shared by the whole run.
///
/// # Panics
///
/// Panics if the HTTP client cannot be built.
#[must_use]
pub fn client() -> Client {
    let [a, b, c, ..] = *Uuid::new_v4().as_bytes();
    let mut headers = HeaderMap::new();
    headers.insert(
        "x-forwarded-for",
        HeaderValue::from_str(&format!("10.{a}.{b}.{c}")).expect("valid header"),
    );

    Client::builder()
        .cookie_store(true)
        .default_headers(headers)
        .build()
        .expect("Failed to create HTTP client")
}

/// Log `client` in and return the user JSON.
///
/// # Panics
///
/// Panics if the request fails or the credentials are rejected.
pub async fn login(client: &Client, email: &str, password: &str) -> Value {
    let resp = client
        .post(url("/auth/login"))
        .json(&json!({ "email": email, "password": password }))
        .send()
        .await
        .expect("Failed to log in");
    assert_eq!(resp.status(), StatusCode::OK, "login as {email}");
    resp.json().await.expect("Failed to read user")
}

/// Register a fresh customer with a unique email; the client is left logged in.
///
/// # Panics
///
/// Panics if the request fails or registration is rejected.
pub async fn register_customer(client: &Client) -> Value {
    let email = format!("teste-{}@ipufood.com", Uuid::new_v4().simple());
    let resp = client
        .post(url("/auth/register"))
        .json(&json!({
            "name": "Cliente Integração",
            "email": email,
            "phone": "(11) 98888-7777",
            "address": "Rua dos Testes, 42",
            "password": "segredo1",
            "confirm_password": "segredo1",
        }))
        .send()
        .await
        .expect("Failed to register");
    assert_eq!(resp.status(), StatusCode::CREATED);
    resp.json().await.expect("Failed to read user")
}

/// Read a JSON body, asserting the status first.
///
/// # Panics
///
/// Panics on a status mismatch or a non-JSON body.
pub async fn expect_json(resp: Response, status: StatusCode) -> Value {
    let actual = resp.status();
    let body = resp.text().await.expect("Failed to read body");
    assert_eq!(actual, status, "unexpected status, body: {body}");
    serde_json::from_str(&body).expect("body is not JSON")
}
