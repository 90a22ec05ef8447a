use std::convert::Infallible;

use chrono::{Duration, Utc};
use serde_json::{json, Value};
use warp::http::StatusCode;
use warp::{Filter, Reply};

use fundlink::context::AppContext;
use fundlink::routes::api_routes;

fn setup() -> (
    AppContext,
    impl Filter<Extract = impl Reply, Error = Infallible> + Clone + 'static,
) {
    let ctx = AppContext::in_memory("integration-test-signing-secret");
    let routes = api_routes(ctx.clone());
    (ctx, routes)
}

fn body_json<B: AsRef<[u8]>>(response: &warp::http::Response<B>) -> Value {
    serde_json::from_slice(response.body().as_ref()).expect("response is not valid JSON")
}

async fn login<F>(routes: &F, email: &str, password: &str) -> String
where
    F: Filter<Error = Infallible> + 'static,
    F::Extract: Reply + Send,
{
    let response = warp::test::request()
        .method("POST")
        .path("/auth/login")
        .json(&json!({"email": email, "password": password}))
        .reply(routes)
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    body_json(&response)["token"].as_str().unwrap().to_string()
}

async fn register<F>(routes: &F, email: &str) -> (String, String)
where
    F: Filter<Error = Infallible> + 'static,
    F::Extract: Reply + Send,
{
    let response = warp::test::request()
        .method("POST")
        .path("/auth/register")
        .json(&json!({"name": "Test User", "email": email, "password": "secret1"}))
        .reply(routes)
        .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let body = body_json(&response);
    (
        body["token"].as_str().unwrap().to_string(),
        body["user"]["id"].as_str().unwrap().to_string(),
    )
}

#[tokio::test]
async fn admin_routes_reject_regular_users() {
    let (_ctx, routes) = setup();
    let (token, _) = register(&routes, "user@x.com").await;

    for path in ["/admin/dashboard", "/admin/users", "/admin/documents"] {
        let response = warp::test::request()
            .method("GET")
            .path(path)
            .header("authorization", format!("Bearer {}", token))
            .reply(&routes)
            .await;
        assert_eq!(response.status(), StatusCode::FORBIDDEN, "path {}", path);
        assert_eq!(body_json(&response)["message"], "Not authorized as admin");
    }
}

#[tokio::test]
async fn dashboard_aggregates_counts_and_funds() {
    let (ctx, routes) = setup();
    ctx.ensure_admin("admin@x.com", "admin-pass").await.unwrap();
    let admin_token = login(&routes, "admin@x.com", "admin-pass").await;
    let (user_token, _) = register(&routes, "creator@x.com").await;

    let end_date = (Utc::now() + Duration::days(14)).to_rfc3339();
    let response = warp::test::request()
        .method("POST")
        .path("/projects")
        .header("authorization", format!("Bearer {}", user_token))
        .json(&json!({
            "title": "Clinic expansion",
            "description": "New pediatric wing",
            "category": "Healthcare",
            "targetAmount": 20000.0,
            "endDate": end_date,
        }))
        .reply(&routes)
        .await;
    let project_id = body_json(&response)["project"]["id"]
        .as_str()
        .unwrap()
        .to_string();

    for amount in [100.0, 250.0] {
        let response = warp::test::request()
            .method("POST")
            .path("/investments")
            .header("authorization", format!("Bearer {}", user_token))
            .json(&json!({"projectId": project_id, "amount": amount}))
            .reply(&routes)
            .await;
        assert_eq!(response.status(), StatusCode::CREATED);
    }

    let response = warp::test::request()
        .method("GET")
        .path("/admin/dashboard")
        .header("authorization", format!("Bearer {}", admin_token))
        .reply(&routes)
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(&response);
    // Admin plus one registered creator
    assert_eq!(body["counts"]["users"], 2);
    assert_eq!(body["counts"]["projects"], 1);
    assert_eq!(body["counts"]["investments"], 2);
    assert_eq!(body["counts"]["totalFunds"], 350.0);
    assert_eq!(body["projectStats"]["pending"], 1);
    assert_eq!(
        body["recentActivity"]["projects"].as_array().unwrap().len(),
        1
    );
    assert_eq!(
        body["recentActivity"]["investments"]
            .as_array()
            .unwrap()
            .len(),
        2
    );
}

#[tokio::test]
async fn admin_moderates_user_status() {
    let (ctx, routes) = setup();
    ctx.ensure_admin("admin@x.com", "admin-pass").await.unwrap();
    let admin_token = login(&routes, "admin@x.com", "admin-pass").await;
    let (_, user_id) = register(&routes, "user@x.com").await;

    let response = warp::test::request()
        .method("PUT")
        .path(&format!("/admin/users/{}/status", user_id))
        .header("authorization", format!("Bearer {}", admin_token))
        .json(&json!({"status": "suspended", "reason": "Fraud review"}))
        .reply(&routes)
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(&response);
    assert_eq!(body["status"], "suspended");
    assert_eq!(body["statusReason"], "Fraud review");

    // Unknown status values are rejected before any lookup
    let response = warp::test::request()
        .method("PUT")
        .path(&format!("/admin/users/{}/status", user_id))
        .header("authorization", format!("Bearer {}", admin_token))
        .json(&json!({"status": "banned"}))
        .reply(&routes)
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(&response)["message"], "Invalid status value");

    let response = warp::test::request()
        .method("PUT")
        .path("/admin/users/no-such-user/status")
        .header("authorization", format!("Bearer {}", admin_token))
        .json(&json!({"status": "active"}))
        .reply(&routes)
        .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_json(&response)["message"], "User not found");
}

#[tokio::test]
async fn admin_accounts_cannot_be_moderated() {
    let (ctx, routes) = setup();
    ctx.ensure_admin("admin@x.com", "admin-pass").await.unwrap();
    ctx.ensure_admin("admin2@x.com", "admin-pass").await.unwrap();
    let admin_token = login(&routes, "admin@x.com", "admin-pass").await;
    let target = ctx
        .users
        .get_user_by_email("admin2@x.com")
        .await
        .unwrap()
        .unwrap();

    let response = warp::test::request()
        .method("PUT")
        .path(&format!("/admin/users/{}/status", target.id))
        .header("authorization", format!("Bearer {}", admin_token))
        .json(&json!({"status": "suspended"}))
        .reply(&routes)
        .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    assert_eq!(body_json(&response)["message"], "Cannot update admin status");
}

#[tokio::test]
async fn admin_project_review_records_the_reviewer() {
    let (ctx, routes) = setup();
    ctx.ensure_admin("admin@x.com", "admin-pass").await.unwrap();
    let admin_token = login(&routes, "admin@x.com", "admin-pass").await;
    let admin_id = ctx
        .users
        .get_user_by_email("admin@x.com")
        .await
        .unwrap()
        .unwrap()
        .id;
    let (user_token, _) = register(&routes, "creator@x.com").await;

    let end_date = (Utc::now() + Duration::days(14)).to_rfc3339();
    let response = warp::test::request()
        .method("POST")
        .path("/projects")
        .header("authorization", format!("Bearer {}", user_token))
        .json(&json!({
            "title": "Open textbooks",
            "description": "Free course material",
            "category": "Education",
            "targetAmount": 5000.0,
            "endDate": end_date,
        }))
        .reply(&routes)
        .await;
    let project_id = body_json(&response)["project"]["id"]
        .as_str()
        .unwrap()
        .to_string();

    let response = warp::test::request()
        .method("PUT")
        .path(&format!("/admin/projects/{}", project_id))
        .header("authorization", format!("Bearer {}", admin_token))
        .json(&json!({"status": "approved", "feedback": "Looks solid"}))
        .reply(&routes)
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(&response);
    assert_eq!(body["status"], "approved");
    assert_eq!(body["feedback"], "Looks solid");
    assert_eq!(body["reviewedBy"], admin_id.as_str());
    assert!(!body["reviewedAt"].is_null());
}

#[tokio::test]
async fn document_verification_is_one_shot() {
    let (ctx, routes) = setup();
    ctx.ensure_admin("admin@x.com", "admin-pass").await.unwrap();
    let admin_token = login(&routes, "admin@x.com", "admin-pass").await;
    let (user_token, _) = register(&routes, "user@x.com").await;

    let response = warp::test::request()
        .method("POST")
        .path("/documents")
        .header("authorization", format!("Bearer {}", user_token))
        .json(&json!({
            "title": "Incorporation certificate",
            "fileUrl": "https://files.example/cert.pdf",
            "kind": "identity",
        }))
        .reply(&routes)
        .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let document_id = body_json(&response)["id"].as_str().unwrap().to_string();

    // Regular users cannot verify
    let response = warp::test::request()
        .method("PUT")
        .path(&format!("/documents/{}/verify", document_id))
        .header("authorization", format!("Bearer {}", user_token))
        .json(&json!({"status": "approved"}))
        .reply(&routes)
        .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = warp::test::request()
        .method("PUT")
        .path(&format!("/documents/{}/verify", document_id))
        .header("authorization", format!("Bearer {}", admin_token))
        .json(&json!({"status": "approved"}))
        .reply(&routes)
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(&response);
    assert_eq!(body["status"], "approved");
    assert!(!body["verifiedAt"].is_null());

    // A second review attempt conflicts
    let response = warp::test::request()
        .method("PUT")
        .path(&format!("/documents/{}/verify", document_id))
        .header("authorization", format!("Bearer {}", admin_token))
        .json(&json!({"status": "rejected"}))
        .reply(&routes)
        .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
    assert_eq!(
        body_json(&response)["message"],
        "Document has already been reviewed"
    );
    let stored = ctx.documents.get_document(&document_id).await.unwrap().unwrap();
    assert_eq!(stored.status, fundlink::models::DocumentStatus::Approved);
}
