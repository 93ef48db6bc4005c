use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use axum::Router;
use plaza_api::{app, AppState};
use plaza_catalog::Item;
use plaza_core::{Address, Member};
use plaza_order::repository::{ItemRepository, MemberRepository};
use plaza_store::MemoryStore;
use serde_json::{json, Value};
use std::sync::Arc;
use tower::util::ServiceExt;
use uuid::Uuid;

struct TestApp {
    app: Router,
    member: Member,
    keyboard: Item,
    monitor: Item,
}

async fn test_app() -> TestApp {
    let store = Arc::new(MemoryStore::new());

    let member = Member::new("Hong", Address::new("Seoul", "Teheran-ro", "06234"));
    MemberRepository::save(&*store, &member).await.unwrap();
    let keyboard = Item::new("Keyboard", 30000, 2000);
    let monitor = Item::new("Monitor", 40000, 200);
    ItemRepository::save(&*store, &keyboard).await.unwrap();
    ItemRepository::save(&*store, &monitor).await.unwrap();

    let state = AppState::new(store.clone(), store.clone(), store.clone(), store.clone());
    TestApp {
        app: app(state),
        member,
        keyboard,
        monitor,
    }
}

async fn get_json(app: &Router, uri: &str) -> (StatusCode, Value) {
    let response = app
        .clone()
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

async fn post_json(app: &Router, uri: &str, body: Value) -> (StatusCode, Value) {
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(uri)
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

async fn place(app: &Router, member_id: Uuid, item_id: Uuid, count: i32) -> Uuid {
    let (status, body) = post_json(
        app,
        "/api/orders",
        json!({ "member_id": member_id, "item_id": item_id, "count": count }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    body["order_id"].as_str().unwrap().parse().unwrap()
}

#[tokio::test]
async fn create_order_returns_created_with_id() {
    let t = test_app().await;
    let order_id = place(&t.app, t.member.id, t.keyboard.id, 1).await;

    let (status, body) = get_json(&t.app, "/api/v5/orders").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body[0]["order_id"].as_str().unwrap(), order_id.to_string());
}

#[tokio::test]
async fn create_order_out_of_stock_is_conflict() {
    let t = test_app().await;
    let (status, body) = post_json(
        &t.app,
        "/api/orders",
        json!({ "member_id": t.member.id, "item_id": t.monitor.id, "count": 201 }),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert!(body["error"].as_str().unwrap().contains("Out of stock"));
}

#[tokio::test]
async fn create_order_unknown_member_is_not_found() {
    let t = test_app().await;
    let (status, _) = post_json(
        &t.app,
        "/api/orders",
        json!({ "member_id": Uuid::new_v4(), "item_id": t.keyboard.id, "count": 1 }),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn create_order_with_missing_field_is_bad_request() {
    let t = test_app().await;
    let (status, body) = post_json(
        &t.app,
        "/api/orders",
        json!({ "member_id": t.member.id, "item_id": t.keyboard.id }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().is_some());
}

#[tokio::test]
async fn create_order_zero_count_is_bad_request() {
    let t = test_app().await;
    let (status, _) = post_json(
        &t.app,
        "/api/orders",
        json!({ "member_id": t.member.id, "item_id": t.keyboard.id, "count": 0 }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn cancel_order_then_cancel_again_is_conflict() {
    let t = test_app().await;
    let order_id = place(&t.app, t.member.id, t.keyboard.id, 2).await;

    let (status, body) = post_json(&t.app, &format!("/api/orders/{order_id}/cancel"), json!({})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["order_status"].as_str().unwrap(), "CANCELED");

    let (status, _) = post_json(&t.app, &format!("/api/orders/{order_id}/cancel"), json!({})).await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn cancel_unknown_order_is_not_found() {
    let t = test_app().await;
    let (status, _) = post_json(
        &t.app,
        &format!("/api/orders/{}/cancel", Uuid::new_v4()),
        json!({}),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn every_order_listing_returns_the_same_ids() {
    let t = test_app().await;
    let first = place(&t.app, t.member.id, t.keyboard.id, 1).await;
    let second = place(&t.app, t.member.id, t.monitor.id, 2).await;
    let mut expected = vec![first.to_string(), second.to_string()];
    expected.sort();

    let id_field = |body: &Value, field: &str| {
        let mut ids: Vec<String> = body
            .as_array()
            .unwrap()
            .iter()
            .map(|o| o[field].as_str().unwrap().to_string())
            .collect();
        ids.sort();
        ids
    };

    let (_, v1) = get_json(&t.app, "/api/v1/orders").await;
    assert_eq!(id_field(&v1, "id"), expected);

    for uri in [
        "/api/v2/orders",
        "/api/v3/orders",
        "/api/v3.1/orders",
        "/api/v4/orders",
        "/api/v5/orders",
    ] {
        let (status, body) = get_json(&t.app, uri).await;
        assert_eq!(status, StatusCode::OK, "{uri}");
        assert_eq!(id_field(&body, "order_id"), expected, "{uri}");
    }
}

#[tokio::test]
async fn order_listings_attach_member_name_and_lines() {
    let t = test_app().await;
    place(&t.app, t.member.id, t.keyboard.id, 1).await;

    let (_, body) = get_json(&t.app, "/api/v5/orders").await;
    let order = &body[0];
    assert_eq!(order["member_name"].as_str().unwrap(), "Hong");
    assert_eq!(order["address"]["city"].as_str().unwrap(), "Seoul");
    let line = &order["order_items"][0];
    assert_eq!(line["item_name"].as_str().unwrap(), "Keyboard");
    assert_eq!(line["order_price"].as_i64().unwrap(), 30000);
    assert_eq!(line["count"].as_i64().unwrap(), 1);
}

#[tokio::test]
async fn paged_listing_defaults_and_params() {
    let t = test_app().await;
    for _ in 0..3 {
        place(&t.app, t.member.id, t.keyboard.id, 1).await;
    }

    // Defaults: offset=0, limit=100
    let (status, body) = get_json(&t.app, "/api/v3.1/orders").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 3);

    let (_, page) = get_json(&t.app, "/api/v3.1/orders?offset=1&limit=1").await;
    assert_eq!(page.as_array().unwrap().len(), 1);
    assert_eq!(page[0]["order_id"], body[1]["order_id"]);
}

#[tokio::test]
async fn simple_order_variants_agree() {
    let t = test_app().await;
    let order_id = place(&t.app, t.member.id, t.keyboard.id, 1).await;

    let (status, v1) = get_json(&t.app, "/api/v1/simple-orders").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(v1[0]["id"].as_str().unwrap(), order_id.to_string());

    for uri in [
        "/api/v2/simple-orders",
        "/api/v3/simple-orders",
        "/api/v4/simple-orders",
    ] {
        let (status, body) = get_json(&t.app, uri).await;
        assert_eq!(status, StatusCode::OK, "{uri}");
        assert_eq!(body[0]["order_id"].as_str().unwrap(), order_id.to_string());
        assert_eq!(body[0]["member_name"].as_str().unwrap(), "Hong");
        // To-one views carry no line collection
        assert!(body[0].get("order_items").is_none(), "{uri}");
    }
}

#[tokio::test]
async fn member_orders_lookup() {
    let t = test_app().await;
    let first = place(&t.app, t.member.id, t.keyboard.id, 1).await;
    let second = place(&t.app, t.member.id, t.monitor.id, 1).await;

    let (status, body) = get_json(&t.app, &format!("/api/members/{}/orders", t.member.id)).await;
    assert_eq!(status, StatusCode::OK);
    let ids: Vec<&str> = body["order_ids"]
        .as_array()
        .unwrap()
        .iter()
        .map(|v| v.as_str().unwrap())
        .collect();
    assert_eq!(ids.len(), 2);
    assert!(ids.contains(&first.to_string().as_str()));
    assert!(ids.contains(&second.to_string().as_str()));

    let (status, _) = get_json(&t.app, &format!("/api/members/{}/orders", Uuid::new_v4())).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
