//! End-to-end marketplace flows through the HTTP surface
//!
//! Every test drives the real router via oneshot calls, with the identity
//! headers a gateway would forward. No listener is bound.

use axum::body::{Body, to_bytes};
use http::{Request, StatusCode, header};
use serde_json::{Value, json};
use surrealdb::RecordId;

use market_server::ServerState;
use market_server::db::models::{CatalogItem, ItemKind};
use market_server::db::repository::CatalogRepository;
use market_server::routes::{OneshotRouter, build_app};

const BUYER: [(&str, &str); 3] = [
    ("x-user-id", "u-buyer"),
    ("x-profile-id", "cust1"),
    ("x-role", "CUSTOMER"),
];
const SELLER: [(&str, &str); 3] = [
    ("x-user-id", "u-seller"),
    ("x-profile-id", "biz1"),
    ("x-role", "BUSINESS"),
];
const ADMIN: [(&str, &str); 3] = [
    ("x-user-id", "u-admin"),
    ("x-profile-id", "adm1"),
    ("x-role", "ADMIN"),
];
const DEVICE: [(&str, &str); 1] = [("x-device-id", "dev-7")];

async fn seed_item(
    state: &ServerState,
    key: &str,
    seller: &str,
    kind: ItemKind,
    unit_price: f64,
    commission_percent: Option<f64>,
) {
    CatalogRepository::new(state.db.clone())
        .create(CatalogItem {
            id: Some(RecordId::from_table_key("catalog_item", key)),
            kind,
            seller: seller.to_string(),
            name: format!("Item {key}"),
            unit_price,
            commission_percent,
            available: true,
            created_at: 1_000,
            updated_at: 1_000,
        })
        .await
        .unwrap();
}

async fn call(
    state: &ServerState,
    method: &str,
    uri: &str,
    identity: &[(&str, &str)],
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    for (name, value) in identity {
        builder = builder.header(*name, *value);
    }
    let request = match body {
        Some(json) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let mut app = build_app();
    let response = app.oneshot(state, request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

fn bank() -> Value {
    json!({
        "bank_name": "GTBank",
        "account_number": "0123456789",
        "account_name": "Ada Trading Co"
    })
}

#[tokio::test]
async fn test_health_endpoint() {
    let state = ServerState::in_memory().await.unwrap();
    let (status, body) = call(&state, "GET", "/health", &[], None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");

    let (status, body) = call(&state, "GET", "/health/detailed", &[], None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["checks"]["database"]["status"], "ok");
}

#[tokio::test]
async fn test_cart_to_delivery_to_withdrawal() {
    let state = ServerState::in_memory().await.unwrap();
    seed_item(&state, "p1", "biz1", ItemKind::Product, 500.0, Some(10.0)).await;
    seed_item(&state, "p2", "biz1", ItemKind::Product, 1_000.0, Some(20.0)).await;

    // Build the cart: 2 x 500 and 1 x 1000
    let (status, body) = call(
        &state,
        "POST",
        "/api/cart/lines",
        &BUYER,
        Some(json!({"kind": "PRODUCT", "id": "p1", "quantity": 2})),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["code"], "E0000");

    let (status, _) = call(
        &state,
        "POST",
        "/api/cart/lines",
        &BUYER,
        Some(json!({"kind": "PRODUCT", "id": "p2"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    // Grouped view with per-seller subtotal
    let (_, body) = call(&state, "GET", "/api/cart", &BUYER, None).await;
    assert_eq!(body["data"][0]["seller"], "biz1");
    assert_eq!(body["data"][0]["subtotal"], 2_000.0);
    assert_eq!(body["data"][0]["lines"].as_array().unwrap().len(), 2);

    // Preview: standard delivery 300, mean commission 15% of 2000 = 300
    let (_, body) = call(
        &state,
        "POST",
        "/api/checkout/preview",
        &BUYER,
        Some(json!({"seller": "biz1", "delivery_method": "STANDARD"})),
    )
    .await;
    assert_eq!(body["data"]["subtotal"], 2_000.0);
    assert_eq!(body["data"]["delivery_fee"], 300.0);
    assert_eq!(body["data"]["commission"], 300.0);
    assert_eq!(body["data"]["total"], 2_600.0);

    // Place the order
    let (status, body) = call(
        &state,
        "POST",
        "/api/checkout",
        &BUYER,
        Some(json!({
            "seller": "biz1",
            "delivery_method": "STANDARD",
            "delivery_address": "12 Marina Rd, Lagos"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["data"]["status"], "PENDING");
    assert_eq!(body["data"]["total"], 2_600.0);
    assert_eq!(body["data"]["lines"].as_array().unwrap().len(), 2);
    let order_id = body["data"]["id"].as_str().unwrap().to_string();

    // Checkout cleared the seller's slice of the cart
    let (_, body) = call(&state, "GET", "/api/cart", &BUYER, None).await;
    assert_eq!(body["data"].as_array().unwrap().len(), 0);

    // Walk the lifecycle: seller advances, buyer confirms receipt
    for (action, who) in [
        ("confirm", &SELLER),
        ("process", &SELLER),
        ("ship", &SELLER),
        ("deliver", &BUYER),
    ] {
        let uri = format!("/api/orders/{order_id}/{action}");
        let (status, body) = call(&state, "POST", &uri, who, None).await;
        assert_eq!(status, StatusCode::OK, "step {action}: {body}");
    }

    let (_, body) = call(&state, "GET", &format!("/api/orders/{order_id}"), &BUYER, None).await;
    assert_eq!(body["data"]["status"], "DELIVERED");
    assert!(body["data"]["delivered_at"].is_i64());

    // Delivered but unsettled revenue sits in pending
    let (_, body) = call(&state, "GET", "/api/earnings", &SELLER, None).await;
    assert_eq!(body["data"]["gross_revenue"], 2_600.0);
    assert_eq!(body["data"]["total_commission"], 300.0);
    assert_eq!(body["data"]["net_revenue"], 2_300.0);
    assert_eq!(body["data"]["pending_balance"], 2_300.0);
    assert_eq!(body["data"]["available_balance"], 0.0);

    // Admin releases the payout hold
    let (status, _) = call(
        &state,
        "POST",
        &format!("/api/orders/{order_id}/settle"),
        &ADMIN,
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (_, body) = call(&state, "GET", "/api/earnings", &SELLER, None).await;
    assert_eq!(body["data"]["available_balance"], 2_300.0);

    // Withdraw 2000, then fail to overdraw the remaining 300
    let (status, body) = call(
        &state,
        "POST",
        "/api/earnings/withdrawals",
        &SELLER,
        Some(json!({"amount": 2_000.0, "bank": bank()})),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    let withdrawal_id = body["data"]["id"].as_str().unwrap().to_string();

    let (status, body) = call(
        &state,
        "POST",
        "/api/earnings/withdrawals",
        &SELLER,
        Some(json!({"amount": 500.0, "bank": bank()})),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["code"], "E1004");

    // Admin pays the first request out
    for action in ["process", "complete"] {
        let uri = format!("/api/earnings/withdrawals/{withdrawal_id}/{action}");
        let (status, body) = call(&state, "POST", &uri, &ADMIN, None).await;
        assert_eq!(status, StatusCode::OK, "step {action}: {body}");
    }

    let (_, body) = call(
        &state,
        "GET",
        &format!("/api/earnings/withdrawals/{withdrawal_id}"),
        &SELLER,
        None,
    )
    .await;
    assert_eq!(body["data"]["status"], "COMPLETED");
    assert!(body["data"]["completed_at"].is_i64());
}

#[tokio::test]
async fn test_job_quote_to_completion() {
    let state = ServerState::in_memory().await.unwrap();
    seed_item(&state, "s1", "biz1", ItemKind::Service, 5_000.0, Some(15.0)).await;

    // Buyer raises a request against the catalog service
    let (status, body) = call(
        &state,
        "POST",
        "/api/jobs",
        &BUYER,
        Some(json!({
            "service": "s1",
            "title": "Plumbing call-out",
            "description": "Leaking joint under the kitchen counter",
            "location": "12 Marina Rd, Lagos",
            "budget_min": 2_000.0,
            "budget_max": 10_000.0
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["data"]["status"], "REQUESTED");
    assert_eq!(body["data"]["seller"], "biz1");
    assert_eq!(body["data"]["commission_percent"], 15.0);
    let job_id = body["data"]["id"].as_str().unwrap().to_string();

    // Seller quotes, buyer accepts, seller works and completes
    let (status, body) = call(
        &state,
        "POST",
        &format!("/api/jobs/{job_id}/quote"),
        &SELLER,
        Some(json!({"price": 8_000.0})),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["data"]["quoted_price"], 8_000.0);

    for (action, who) in [("accept", &BUYER), ("start", &SELLER)] {
        let uri = format!("/api/jobs/{job_id}/{action}");
        let (status, body) = call(&state, "POST", &uri, who, None).await;
        assert_eq!(status, StatusCode::OK, "step {action}: {body}");
    }

    // Complete without a payload: the quote stands, commission 15% of 8000
    let (status, body) = call(
        &state,
        "POST",
        &format!("/api/jobs/{job_id}/complete"),
        &SELLER,
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["data"]["status"], "COMPLETED");
    assert_eq!(body["data"]["final_price"], 8_000.0);
    assert_eq!(body["data"]["commission"], 1_200.0);

    // Settle and check the seller's snapshot
    let (status, _) = call(
        &state,
        "POST",
        &format!("/api/jobs/{job_id}/settle"),
        &ADMIN,
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (_, body) = call(&state, "GET", "/api/earnings", &SELLER, None).await;
    assert_eq!(body["data"]["gross_revenue"], 8_000.0);
    assert_eq!(body["data"]["total_commission"], 1_200.0);
    assert_eq!(body["data"]["available_balance"], 6_800.0);
}

#[tokio::test]
async fn test_guest_cart_merges_into_profile() {
    let state = ServerState::in_memory().await.unwrap();
    seed_item(&state, "p1", "biz1", ItemKind::Product, 500.0, None).await;
    seed_item(&state, "p2", "biz1", ItemKind::Product, 800.0, None).await;

    // Anonymous device fills a cart
    for (id, quantity) in [("p1", 2), ("p2", 1)] {
        let (status, _) = call(
            &state,
            "POST",
            "/api/cart/lines",
            &DEVICE,
            Some(json!({"kind": "PRODUCT", "id": id, "quantity": quantity})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
    }

    // The buyer already holds one line of the same item
    let (status, _) = call(
        &state,
        "POST",
        "/api/cart/lines",
        &BUYER,
        Some(json!({"kind": "PRODUCT", "id": "p1", "quantity": 1})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    // Sign-in merge folds the device lines in, summing the shared key
    let (status, body) = call(
        &state,
        "POST",
        "/api/cart/merge",
        &BUYER,
        Some(json!({"device_id": "dev-7"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["data"]["merged_lines"], 2);

    let (_, body) = call(&state, "GET", "/api/cart", &BUYER, None).await;
    let lines = body["data"][0]["lines"].as_array().unwrap();
    assert_eq!(lines.len(), 2);
    let p1 = lines
        .iter()
        .find(|line| line["item"]["id"] == "p1")
        .unwrap();
    assert_eq!(p1["quantity"], 3);

    // The device cart is now empty, and re-merging is a no-op
    let (_, body) = call(&state, "GET", "/api/cart", &DEVICE, None).await;
    assert_eq!(body["data"].as_array().unwrap().len(), 0);

    let (_, body) = call(
        &state,
        "POST",
        "/api/cart/merge",
        &BUYER,
        Some(json!({"device_id": "dev-7"})),
    )
    .await;
    assert_eq!(body["data"]["merged_lines"], 0);

    let (_, body) = call(&state, "GET", "/api/cart", &BUYER, None).await;
    let lines = body["data"][0]["lines"].as_array().unwrap();
    let p1 = lines
        .iter()
        .find(|line| line["item"]["id"] == "p1")
        .unwrap();
    assert_eq!(p1["quantity"], 3);
}

#[tokio::test]
async fn test_quantity_zero_removes_line() {
    let state = ServerState::in_memory().await.unwrap();
    seed_item(&state, "p1", "biz1", ItemKind::Product, 500.0, None).await;

    let (_, body) = call(
        &state,
        "POST",
        "/api/cart/lines",
        &BUYER,
        Some(json!({"kind": "PRODUCT", "id": "p1", "quantity": 2})),
    )
    .await;
    let key = body["data"]["id"].as_str().unwrap().to_string();

    // Bump to 5
    let (_, body) = call(
        &state,
        "PATCH",
        &format!("/api/cart/lines/{key}"),
        &BUYER,
        Some(json!({"quantity": 5})),
    )
    .await;
    assert_eq!(body["data"]["quantity"], 5);

    // Zero removes
    let (status, body) = call(
        &state,
        "PATCH",
        &format!("/api/cart/lines/{key}"),
        &BUYER,
        Some(json!({"quantity": 0})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["data"].is_null());

    let (_, body) = call(&state, "GET", "/api/cart", &BUYER, None).await;
    assert_eq!(body["data"].as_array().unwrap().len(), 0);
}
