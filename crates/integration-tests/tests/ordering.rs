//! Integration tests for the catalog, cart, checkout, delivery and reports.
//!
//! Requires a running server over a seeded database; see the crate docs.

#![allow(clippy::unwrap_used, clippy::indexing_slicing)]

use ipufood_integration_tests::{
    ADMIN_EMAIL, ADMIN_PASSWORD, client, expect_json, login, register_customer, url,
};
use reqwest::{Client, StatusCode};
use serde_json::{Value, json};
use uuid::Uuid;

async fn find_product(client: &Client, name: &str) -> Value {
    let resp = client
        .get(url(&format!("/products?q={name}")))
        .send()
        .await
        .unwrap();
    let products = expect_json(resp, StatusCode::OK).await;
    products
        .as_array()
        .unwrap()
        .iter()
        .find(|p| p["name"] == name)
        .cloned()
        .unwrap_or_else(|| panic!("{name} not in the menu; run `ipufood seed`"))
}

#[tokio::test]
#[ignore = "Requires running server"]
async fn test_menu_search_and_categories() {
    let client = client();

    let burger = find_product(&client, "X-Burger").await;
    assert_eq!(burger["price"], "15.00");

    let resp = client.get(url("/products/categories")).send().await.unwrap();
    let categories = expect_json(resp, StatusCode::OK).await;
    assert!(categories.as_array().unwrap().contains(&json!("Bebidas")));

    let resp = client.get(url("/products/999999")).send().await.unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
#[ignore = "Requires running server"]
async fn test_admin_product_lifecycle() {
    let admin = client();
    login(&admin, ADMIN_EMAIL, ADMIN_PASSWORD).await;
    let name = format!("Suco {}", Uuid::new_v4().simple());

    let resp = admin
        .post(url("/products"))
        .json(&json!({
            "name": name,
            "description": "Suco natural",
            "price": "7.50",
            "category": "Bebidas",
        }))
        .send()
        .await
        .unwrap();
    let product = expect_json(resp, StatusCode::CREATED).await;
    assert_eq!(product["available"], true);
    let id = product["id"].as_i64().unwrap();

    let resp = admin
        .put(url(&format!("/products/{id}")))
        .json(&json!({ "price": "8.00", "available": false }))
        .send()
        .await
        .unwrap();
    let product = expect_json(resp, StatusCode::OK).await;
    assert_eq!(product["price"], "8.00");
    assert_eq!(product["available"], false);

    // Unavailable products cannot be added to a cart
    let customer = client();
    let resp = customer
        .post(url("/cart/items"))
        .json(&json!({ "product_id": id }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let resp = admin
        .delete(url(&format!("/products/{id}")))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);

    let resp = admin
        .delete(url(&format!("/products/{id}")))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
#[ignore = "Requires running server"]
async fn test_customer_cannot_edit_menu() {
    let customer = client();
    register_customer(&customer).await;

    let resp = customer
        .post(url("/products"))
        .json(&json!({ "name": "Hack", "description": "x", "price": "1.00" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
#[ignore = "Requires running server"]
async fn test_order_flow() {
    let customer = client();

    // Anonymous cart
    let burger = find_product(&customer, "X-Burger").await;
    let soda = find_product(&customer, "Refrigerante").await;
    for (product, quantity) in [(&burger, 2), (&soda, 1)] {
        let resp = customer
            .post(url("/cart/items"))
            .json(&json!({ "product_id": product["id"], "quantity": quantity }))
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
    }

    let resp = customer.get(url("/cart")).send().await.unwrap();
    let cart = expect_json(resp, StatusCode::OK).await;
    assert_eq!(cart["item_count"], 3);
    assert_eq!(cart["total"], "38.00");

    let resp = customer.post(url("/cart/checkout")).send().await.unwrap();
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    // Registering cycles the session id and keeps the cart
    let user = register_customer(&customer).await;
    let resp = customer
        .post(url("/cart/checkout"))
        .json(&json!({ "payment_method": "pix" }))
        .send()
        .await
        .unwrap();
    let order = expect_json(resp, StatusCode::CREATED).await;
    assert_eq!(order["status"], "pending");
    assert_eq!(order["payment_method"], "pix");
    assert_eq!(order["total"], "38.00");
    assert_eq!(order["user_id"], user["id"]);
    let order_id = order["id"].as_i64().unwrap();

    let resp = customer.get(url("/cart")).send().await.unwrap();
    assert_eq!(expect_json(resp, StatusCode::OK).await["item_count"], 0);

    let resp = customer.get(url("/orders")).send().await.unwrap();
    let orders = expect_json(resp, StatusCode::OK).await;
    assert_eq!(orders[0]["id"], order_id);

    // Another customer cannot see it
    let stranger = client();
    register_customer(&stranger).await;
    let resp = stranger
        .get(url(&format!("/orders/{order_id}")))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    // Admin confirms delivery
    let admin = client();
    login(&admin, ADMIN_EMAIL, ADMIN_PASSWORD).await;
    let resp = admin
        .post(url(&format!("/admin/orders/{order_id}/deliver")))
        .send()
        .await
        .unwrap();
    let delivered = expect_json(resp, StatusCode::OK).await;
    assert_eq!(delivered["status"], "delivered");
    assert!(delivered["delivered_at"].is_string());

    let resp = customer
        .get(url("/reports/purchases?period=week"))
        .send()
        .await
        .unwrap();
    let report = expect_json(resp, StatusCode::OK).await;
    assert_eq!(report["completed_orders"], 1);
    assert_eq!(report["total_spent"], "38.00");
    assert_eq!(report["spending_by_day"].as_array().unwrap().len(), 7);

    let resp = admin.get(url("/admin/reports/sales")).send().await.unwrap();
    let sales = expect_json(resp, StatusCode::OK).await;
    assert!(sales["top_products"].as_array().unwrap().len() <= 4);
    assert!(sales["recent_orders"].as_array().unwrap().len() <= 5);
}

#[tokio::test]
#[ignore = "Requires running server"]
async fn test_admin_order_filter() {
    let admin = client();
    login(&admin, ADMIN_EMAIL, ADMIN_PASSWORD).await;

    let resp = admin
        .get(url("/admin/orders?status=pending"))
        .send()
        .await
        .unwrap();
    let orders = expect_json(resp, StatusCode::OK).await;
    assert!(
        orders
            .as_array()
            .unwrap()
            .iter()
            .all(|o| o["status"] == "pending")
    );
}

#[tokio::test]
#[ignore = "Requires running server"]
async fn test_checkout_after_product_deleted() {
    let admin = client();
    login(&admin, ADMIN_EMAIL, ADMIN_PASSWORD).await;
    let resp = admin
        .post(url("/products"))
        .json(&json!({
            "name": format!("Esfiha {}", Uuid::new_v4().simple()),
            "description": "Esfiha de carne",
            "price": "6.00",
            "category": "Lanches",
        }))
        .send()
        .await
        .unwrap();
    let product = expect_json(resp, StatusCode::CREATED).await;
    let id = product["id"].as_i64().unwrap();

    let customer = client();
    register_customer(&customer).await;
    let resp = customer
        .post(url("/cart/items"))
        .json(&json!({ "product_id": id, "quantity": 2 }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let resp = admin
        .delete(url(&format!("/products/{id}")))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);

    // The cart snapshot still checks out; the item loses its product link
    let resp = customer.post(url("/cart/checkout")).send().await.unwrap();
    let order = expect_json(resp, StatusCode::CREATED).await;
    assert_eq!(order["total"], "12.00");
    assert_eq!(order["items"][0]["product_name"], product["name"]);
    assert!(order["items"][0]["product_id"].is_null());

    let resp = customer.get(url("/cart")).send().await.unwrap();
    assert_eq!(expect_json(resp, StatusCode::OK).await["item_count"], 0);
}
