//! Integration tests for registration, login and profile editing.
//!
//! Requires a running server over a seeded database; see the crate docs.

#![allow(clippy::unwrap_used)]

use ipufood_integration_tests::{
    ADMIN_EMAIL, ADMIN_PASSWORD, CUSTOMER_EMAIL, client, expect_json, login, register_customer,
    url,
};
use reqwest::StatusCode;
use serde_json::json;

#[tokio::test]
#[ignore = "Requires running server"]
async fn test_health() {
    let resp = client().get(url("/health/ready")).send().await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
}

#[tokio::test]
#[ignore = "Requires running server"]
async fn test_register_logs_in() {
    let client = client();
    let user = register_customer(&client).await;
    assert_eq!(user["role"], "user");

    let resp = client.get(url("/auth/me")).send().await.unwrap();
    let me = expect_json(resp, StatusCode::OK).await;
    assert_eq!(me["email"], user["email"]);
}

#[tokio::test]
#[ignore = "Requires running server"]
async fn test_register_duplicate_email() {
    let resp = client()
        .post(url("/auth/register"))
        .json(&json!({
            "name": "Outro",
            "email": CUSTOMER_EMAIL,
            "phone": "84981568463",
            "address": "Rua B, 2",
            "password": "segredo1",
            "confirm_password": "segredo1",
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::CONFLICT);
}

#[tokio::test]
#[ignore = "Requires running server"]
async fn test_register_reports_field_errors() {
    let resp = client()
        .post(url("/auth/register"))
        .json(&json!({
            "name": "",
            "email": "nao-e-email",
            "phone": "123",
            "address": "Rua C, 3",
            "password": "123",
            "confirm_password": "456",
        }))
        .send()
        .await
        .unwrap();
    let body = expect_json(resp, StatusCode::BAD_REQUEST).await;

    let fields: Vec<&str> = body["fields"]
        .as_array()
        .unwrap()
        .iter()
        .map(|f| f["field"].as_str().unwrap())
        .collect();
    for field in ["name", "email", "phone", "password", "confirm_password"] {
        assert!(fields.contains(&field), "missing {field} in {fields:?}");
    }
}

#[tokio::test]
#[ignore = "Requires running server"]
async fn test_wrong_password() {
    let resp = client()
        .post(url("/auth/login"))
        .json(&json!({ "email": CUSTOMER_EMAIL, "password": "errada123" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
#[ignore = "Requires running server"]
async fn test_logout_clears_session() {
    let client = client();
    register_customer(&client).await;

    let resp = client.post(url("/auth/logout")).send().await.unwrap();
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);

    let resp = client.get(url("/auth/me")).send().await.unwrap();
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
#[ignore = "Requires running server"]
async fn test_profile_update_refreshes_session() {
    let client = client();
    let user = register_customer(&client).await;

    let resp = client
        .put(url("/profile"))
        .json(&json!({
            "name": "Nome Novo",
            "email": user["email"],
            "phone": "84981568463",
            "address": "Rua Nova, 10",
        }))
        .send()
        .await
        .unwrap();
    let updated = expect_json(resp, StatusCode::OK).await;
    assert_eq!(updated["name"], "Nome Novo");
    assert_eq!(updated["phone"], "84981568463");

    let resp = client.get(url("/auth/me")).send().await.unwrap();
    let me = expect_json(resp, StatusCode::OK).await;
    assert_eq!(me["name"], "Nome Novo");
}

#[tokio::test]
#[ignore = "Requires running server"]
async fn test_customer_login() {
    let client = client();
    let user = login(&client, CUSTOMER_EMAIL, ipufood_integration_tests::CUSTOMER_PASSWORD).await;
    assert_eq!(user["email"], CUSTOMER_EMAIL);
}

#[tokio::test]
#[ignore = "Requires running server"]
async fn test_role_changes_apply_to_live_sessions() {
    let admin = client();
    login(&admin, ADMIN_EMAIL, ADMIN_PASSWORD).await;

    let member = client();
    let user = register_customer(&member).await;
    let role_url = url(&format!("/admin/users/{}/role", user["id"]));

    let resp = admin
        .put(&role_url)
        .json(&json!({ "role": "admin" }))
        .send()
        .await
        .unwrap();
    assert_eq!(expect_json(resp, StatusCode::OK).await["role"], "admin");

    // The promotion shows up once the session is refreshed
    let resp = member.get(url("/auth/me")).send().await.unwrap();
    assert_eq!(expect_json(resp, StatusCode::OK).await["role"], "admin");
    let resp = member.get(url("/admin/users")).send().await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    // A demotion takes effect on the very next admin request
    let resp = admin
        .put(&role_url)
        .json(&json!({ "role": "user" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let resp = member.get(url("/admin/users")).send().await.unwrap();
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
    let resp = member.get(url("/auth/me")).send().await.unwrap();
    assert_eq!(expect_json(resp, StatusCode::OK).await["role"], "user");
}
