use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;

use shared_database::{collections, DocumentStore, Filter};
use shared_utils::test_utils::{body_json, JwtTestUtils, TestContext, TestUser};
use trainer_cell::trainer_routes;

fn create_test_app(ctx: &TestContext) -> Router {
    trainer_routes(ctx.state.clone())
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

fn application_body() -> Value {
    json!({
        "name": "Coach Carter",
        "age": 35,
        "skills": ["Boxing"],
        "slots": [{ "slotName": "Evening", "slotTime": "18:00" }]
    })
}

async fn apply_as(ctx: &TestContext, user: &TestUser) -> String {
    let token = ctx.token_for(user);
    let response = create_test_app(ctx)
        .oneshot(request("POST", "/trainers", Some(&token), Some(application_body())))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    body_json(response).await["insertedId"]
        .as_str()
        .unwrap()
        .to_string()
}

#[tokio::test]
async fn test_apply_requires_session() {
    let ctx = TestContext::new();

    let response = create_test_app(&ctx)
        .oneshot(request("POST", "/trainers", None, Some(application_body())))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(body_json(response).await["message"], "not authorized");
}

#[tokio::test]
async fn test_apply_with_expired_token() {
    let ctx = TestContext::new();
    let user = TestUser::member("late@gym.com");
    let token = JwtTestUtils::create_expired_token(&user, ctx.secret());

    let response = create_test_app(&ctx)
        .oneshot(request("POST", "/trainers", Some(&token), Some(application_body())))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(body_json(response).await["message"], "unauthorized");
}

#[tokio::test]
async fn test_apply_twice_conflicts() {
    let ctx = TestContext::new();
    let user = TestUser::member("coach@gym.com");
    apply_as(&ctx, &user).await;

    let token = ctx.token_for(&user);
    let response = create_test_app(&ctx)
        .oneshot(request("POST", "/trainers", Some(&token), Some(application_body())))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_own_application_status() {
    let ctx = TestContext::new();
    let user = TestUser::member("coach@gym.com");
    apply_as(&ctx, &user).await;

    let token = ctx.token_for(&user);
    let response = create_test_app(&ctx)
        .oneshot(request("GET", "/trainers/application", Some(&token), None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["status"], "pending");
    assert_eq!(body["email"], "coach@gym.com");
}

#[tokio::test]
async fn test_member_cannot_approve() {
    let ctx = TestContext::new();
    let applicant = TestUser::member("coach@gym.com");
    let id = apply_as(&ctx, &applicant).await;

    let member = TestUser::member("m@gym.com");
    member.seed(ctx.store.as_ref()).await;
    let token = ctx.token_for(&member);

    let response = create_test_app(&ctx)
        .oneshot(request("PATCH", &format!("/trainers/{}", id), Some(&token), None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    let stored = ctx
        .store
        .find_one(collections::TRAINERS, &Filter::by_id(&id))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored["status"], "pending");
}

#[tokio::test]
async fn test_admin_claim_without_stored_admin_is_forbidden() {
    let ctx = TestContext::new();
    // token claims admin but the user record says member
    let impostor = TestUser::admin("boss@gym.com");
    TestUser::member("boss@gym.com").seed(ctx.store.as_ref()).await;
    let token = ctx.token_for(&impostor);

    let response = create_test_app(&ctx)
        .oneshot(request("GET", "/trainers/applications", Some(&token), None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_admin_approves_and_trainer_becomes_public() {
    let ctx = TestContext::new();
    let applicant = TestUser::member("coach@gym.com");
    applicant.seed(ctx.store.as_ref()).await;
    let id = apply_as(&ctx, &applicant).await;

    let admin = TestUser::admin("boss@gym.com");
    admin.seed(ctx.store.as_ref()).await;
    let token = ctx.token_for(&admin);

    let pending = create_test_app(&ctx)
        .oneshot(request("GET", "/trainers/applications", Some(&token), None))
        .await
        .unwrap();
    assert_eq!(pending.status(), StatusCode::OK);
    assert_eq!(body_json(pending).await.as_array().unwrap().len(), 1);

    let response = create_test_app(&ctx)
        .oneshot(request("PATCH", &format!("/trainers/{}", id), Some(&token), None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["matchedCount"], 1);

    let listed = create_test_app(&ctx)
        .oneshot(request("GET", "/trainers", None, None))
        .await
        .unwrap();
    let trainers = body_json(listed).await;
    assert_eq!(trainers.as_array().unwrap().len(), 1);
    assert_eq!(trainers[0]["name"], "Coach Carter");

    let single = create_test_app(&ctx)
        .oneshot(request("GET", &format!("/trainers/{}", id), None, None))
        .await
        .unwrap();
    assert_eq!(single.status(), StatusCode::OK);

    let user = ctx
        .store
        .find_one(collections::USERS, &Filter::new().eq("email", "coach@gym.com"))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(user["role"], "trainer");
}

#[tokio::test]
async fn test_admin_rejects_with_feedback() {
    let ctx = TestContext::new();
    let id = apply_as(&ctx, &TestUser::member("coach@gym.com")).await;

    let admin = TestUser::admin("boss@gym.com");
    admin.seed(ctx.store.as_ref()).await;
    let token = ctx.token_for(&admin);

    let response = create_test_app(&ctx)
        .oneshot(request(
            "PATCH",
            &format!("/trainers/{}/reject", id),
            Some(&token),
            Some(json!({ "feedback": "need certification" })),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let stored = ctx
        .store
        .find_one(collections::TRAINERS, &Filter::by_id(&id))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored["status"], "rejected");
    assert_eq!(stored["feedbackMessage"], "need certification");

    // rejected applications are not listed publicly
    let single = create_test_app(&ctx)
        .oneshot(request("GET", &format!("/trainers/{}", id), None, None))
        .await
        .unwrap();
    assert_eq!(single.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_approve_unknown_application() {
    let ctx = TestContext::new();
    let admin = TestUser::admin("boss@gym.com");
    admin.seed(ctx.store.as_ref()).await;
    let token = ctx.token_for(&admin);

    let response = create_test_app(&ctx)
        .oneshot(request("PATCH", "/trainers/missing", Some(&token), None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_admin_removes_trainer() {
    let ctx = TestContext::new();
    let id = apply_as(&ctx, &TestUser::member("coach@gym.com")).await;

    let admin = TestUser::admin("boss@gym.com");
    admin.seed(ctx.store.as_ref()).await;
    let token = ctx.token_for(&admin);

    let response = create_test_app(&ctx)
        .oneshot(request("DELETE", &format!("/trainers/{}", id), Some(&token), None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["deletedCount"], 1);
    assert!(ctx.store.dump(collections::TRAINERS).await.is_empty());
}

#[tokio::test]
async fn test_wrong_method_on_admin_path_is_not_allowed() {
    let ctx = TestContext::new();

    let response = create_test_app(&ctx)
        .oneshot(request("GET", "/trainers/abc/reject", None, None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
}
