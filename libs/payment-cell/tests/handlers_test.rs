use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use chrono::Utc;
use serde_json::{json, Value};
use tower::ServiceExt;

use payment_cell::payment_routes;
use shared_database::{collections, DocumentStore};
use shared_utils::test_utils::{body_json, TestContext, TestUser};

fn create_test_app(ctx: &TestContext) -> Router {
    payment_routes(ctx.state.clone())
}

fn request(method: &str, uri: &str, token: Option<&str>, body: Option<Value>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header("cookie", format!("token={}", token));
    }
    match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

async fn pay(ctx: &TestContext, user: &TestUser, price: f64, transaction_id: &str) -> StatusCode {
    let token = ctx.token_for(user);
    create_test_app(ctx)
        .oneshot(request(
            "POST",
            "/payments",
            Some(&token),
            Some(json!({ "price": price, "transactionId": transaction_id, "packageName": "gold" })),
        ))
        .await
        .unwrap()
        .status()
}

async fn insert(ctx: &TestContext, collection: &str, document: Value) {
    ctx.store
        .insert_one(collection, document.as_object().unwrap().clone())
        .await
        .unwrap();
}

#[tokio::test]
async fn test_payment_requires_session() {
    let ctx = TestContext::new();

    let response = create_test_app(&ctx)
        .oneshot(request("POST", "/payments", None, Some(json!({ "price": 10, "transactionId": "tx" }))))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert!(ctx.store.dump(collections::PAYMENTS).await.is_empty());
}

#[tokio::test]
async fn test_payment_email_comes_from_session() {
    let ctx = TestContext::new();
    let user = TestUser::member("payer@gym.com");
    let token = ctx.token_for(&user);

    let response = create_test_app(&ctx)
        .oneshot(request(
            "POST",
            "/payments",
            Some(&token),
            Some(json!({ "price": 49.5, "transactionId": "tx-1", "email": "someone@else.com" })),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let stored = ctx.store.dump(collections::PAYMENTS).await;
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0]["email"], "payer@gym.com");
    assert_eq!(stored[0]["price"], 49.5);
    assert_eq!(stored[0]["transactionId"], "tx-1");
}

#[tokio::test]
async fn test_invalid_payments_are_rejected() {
    let ctx = TestContext::new();
    let user = TestUser::member("payer@gym.com");

    assert_eq!(pay(&ctx, &user, 0.0, "tx-1").await, StatusCode::BAD_REQUEST);
    assert_eq!(pay(&ctx, &user, -5.0, "tx-2").await, StatusCode::BAD_REQUEST);
    assert_eq!(pay(&ctx, &user, 10.0, "  ").await, StatusCode::BAD_REQUEST);
    assert!(ctx.store.dump(collections::PAYMENTS).await.is_empty());
}

#[tokio::test]
async fn test_payment_history_is_per_user() {
    let ctx = TestContext::new();
    let alice = TestUser::member("alice@gym.com");
    let bob = TestUser::member("bob@gym.com");
    assert_eq!(pay(&ctx, &alice, 10.0, "a-1").await, StatusCode::OK);
    assert_eq!(pay(&ctx, &alice, 20.0, "a-2").await, StatusCode::OK);
    assert_eq!(pay(&ctx, &bob, 30.0, "b-1").await, StatusCode::OK);

    let token = ctx.token_for(&alice);
    let response = create_test_app(&ctx)
        .oneshot(request("GET", "/payments", Some(&token), None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    let payments = body.as_array().unwrap();
    assert_eq!(payments.len(), 2);
    assert!(payments.iter().all(|p| p["email"] == "alice@gym.com"));
}

#[tokio::test]
async fn test_admin_stats() {
    let ctx = TestContext::new();
    let admin = TestUser::admin("boss@gym.com");
    admin.seed(ctx.store.as_ref()).await;
    TestUser::member("alice@gym.com").seed(ctx.store.as_ref()).await;
    TestUser::member("bob@gym.com").seed(ctx.store.as_ref()).await;

    let alice = TestUser::member("alice@gym.com");
    let bob = TestUser::member("bob@gym.com");
    pay(&ctx, &alice, 10.0, "a-1").await;
    pay(&ctx, &alice, 15.5, "a-2").await;
    pay(&ctx, &bob, 24.5, "b-1").await;

    insert(&ctx, collections::NEWSLETTER, json!({ "name": "N", "email": "n@gym.com" })).await;
    for (email, status) in [("t1@gym.com", "success"), ("t2@gym.com", "pending"), ("t3@gym.com", "success")] {
        insert(
            &ctx,
            collections::TRAINERS,
            json!({ "email": email, "name": email, "status": status, "createdAt": Utc::now() }),
        )
        .await;
    }

    let token = ctx.token_for(&admin);
    let response = create_test_app(&ctx)
        .oneshot(request("GET", "/admin-stats", Some(&token), None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["totalRevenue"], 50.0);
    assert_eq!(body["paidMembers"], 2);
    assert_eq!(body["totalUsers"], 3);
    assert_eq!(body["newsletterSubscribers"], 1);
    assert_eq!(body["totalTrainers"], 2);
}

#[tokio::test]
async fn test_admin_stats_on_empty_store() {
    let ctx = TestContext::new();
    let admin = TestUser::admin("boss@gym.com");
    admin.seed(ctx.store.as_ref()).await;
    let token = ctx.token_for(&admin);

    let response = create_test_app(&ctx)
        .oneshot(request("GET", "/admin-stats", Some(&token), None))
        .await
        .unwrap();

    let body = body_json(response).await;
    assert_eq!(body["totalRevenue"], 0.0);
    assert_eq!(body["paidMembers"], 0);
    assert_eq!(body["totalUsers"], 1);
}

#[tokio::test]
async fn test_admin_stats_forbidden_for_members() {
    let ctx = TestContext::new();
    let member = TestUser::member("m@gym.com");
    member.seed(ctx.store.as_ref()).await;
    let token = ctx.token_for(&member);

    let response = create_test_app(&ctx)
        .oneshot(request("GET", "/admin-stats", Some(&token), None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    assert_eq!(body_json(response).await["message"], "unauthorize access");
}
