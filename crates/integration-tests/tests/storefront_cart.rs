//! Integration tests for the cart and coupon flows.
//!
//! These tests require:
//! - A running storefront (cargo run -p polar-scoop-storefront)
//! - Its session-store database (ps-cli migrate)
//! - A reachable platform API with at least one product in the catalog
//!
//! Run with: cargo test -p polar-scoop-integration-tests -- --ignored

use reqwest::StatusCode;
use serde_json::{Value, json};

use polar_scoop_integration_tests::{session_client, storefront_base_url};

/// Fetch the first product id from the catalog.
async fn any_product_id(client: &reqwest::Client) -> String {
    let base_url = storefront_base_url();
    let body: Value = client
        .get(format!("{base_url}/products"))
        .send()
        .await
        .expect("catalog request failed")
        .json()
        .await
        .expect("catalog response was not JSON");

    body["products"][0]["_id"]
        .as_str()
        .expect("catalog has no products")
        .to_string()
}

#[tokio::test]
#[ignore = "Requires running storefront and platform API"]
async fn test_health() {
    let client = session_client();
    let resp = client
        .get(format!("{}/health", storefront_base_url()))
        .send()
        .await
        .expect("health request failed");
    assert_eq!(resp.status(), StatusCode::OK);
}

#[tokio::test]
#[ignore = "Requires running storefront and platform API"]
async fn test_empty_cart_has_flat_shipping_quote() {
    let client = session_client();
    let body: Value = client
        .get(format!("{}/cart", storefront_base_url()))
        .send()
        .await
        .expect("cart request failed")
        .json()
        .await
        .expect("cart response was not JSON");

    assert_eq!(body["items"].as_array().map(Vec::len), Some(0));
    assert_eq!(body["quote"]["subtotal"], "0");
    assert_eq!(body["checkoutBlocked"], false);
}

#[tokio::test]
#[ignore = "Requires running storefront and platform API"]
async fn test_adding_same_product_twice_keeps_one_line() {
    let client = session_client();
    let base_url = storefront_base_url();
    let product_id = any_product_id(&client).await;

    for quantity in [1, 3] {
        let resp = client
            .post(format!("{base_url}/cart/items"))
            .json(&json!({ "productId": product_id, "quantity": quantity }))
            .send()
            .await
            .expect("add-to-cart failed");
        assert_eq!(resp.status(), StatusCode::OK);
    }

    let body: Value = client
        .get(format!("{base_url}/cart"))
        .send()
        .await
        .expect("cart request failed")
        .json()
        .await
        .expect("cart response was not JSON");

    // Upsert: the second add replaced the line, it did not duplicate it
    assert_eq!(body["items"].as_array().map(Vec::len), Some(1));
    assert_eq!(body["items"][0]["quantity"], 3);
}

#[tokio::test]
#[ignore = "Requires running storefront and platform API"]
async fn test_removing_absent_product_is_noop() {
    let client = session_client();
    let base_url = storefront_base_url();

    let resp = client
        .delete(format!("{base_url}/cart/items/does-not-exist"))
        .send()
        .await
        .expect("remove failed");

    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = resp.json().await.expect("cart response was not JSON");
    assert_eq!(body["items"].as_array().map(Vec::len), Some(0));
}

#[tokio::test]
#[ignore = "Requires running storefront and platform API"]
async fn test_invalid_coupon_clears_discount_and_surfaces_message() {
    let client = session_client();
    let base_url = storefront_base_url();
    let product_id = any_product_id(&client).await;

    client
        .post(format!("{base_url}/cart/items"))
        .json(&json!({ "productId": product_id }))
        .send()
        .await
        .expect("add-to-cart failed");

    let resp = client
        .post(format!("{base_url}/cart/coupon"))
        .json(&json!({ "code": "DEFINITELY-NOT-A-CODE" }))
        .send()
        .await
        .expect("coupon request failed");

    assert!(resp.status().is_client_error());
    let body: Value = resp.json().await.expect("error response was not JSON");
    assert!(body["message"].is_string());

    // The cart must report no lingering discount afterwards
    let cart: Value = client
        .get(format!("{base_url}/cart"))
        .send()
        .await
        .expect("cart request failed")
        .json()
        .await
        .expect("cart response was not JSON");
    assert!(cart["coupon"].is_null());
    assert_eq!(cart["quote"]["discount"], "0");
}

#[tokio::test]
#[ignore = "Requires running storefront and platform API"]
async fn test_coupon_on_empty_cart_is_rejected() {
    let client = session_client();

    let resp = client
        .post(format!("{}/cart/coupon", storefront_base_url()))
        .json(&json!({ "code": "SCOOP10" }))
        .send()
        .await
        .expect("coupon request failed");

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}
