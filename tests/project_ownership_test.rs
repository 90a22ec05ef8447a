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

async fn create_project<F>(routes: &F, token: &str) -> String
where
    F: Filter<Error = Infallible> + 'static,
    F::Extract: Reply + Send,
{
    let end_date = (Utc::now() + Duration::days(30)).to_rfc3339();
    let response = warp::test::request()
        .method("POST")
        .path("/projects")
        .header("authorization", format!("Bearer {}", token))
        .json(&json!({
            "title": "Solar farm",
            "description": "Community solar installation",
            "category": "Environment",
            "targetAmount": 50000.0,
            "endDate": end_date,
        }))
        .reply(routes)
        .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let body = body_json(&response);
    assert_eq!(body["project"]["status"], "pending");
    assert_eq!(body["project"]["currentAmount"], 0.0);
    body["project"]["id"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn created_project_is_publicly_visible() {
    let (_ctx, routes) = setup();
    let (token, owner_id) = register(&routes, "owner@x.com").await;
    let project_id = create_project(&routes, &token).await;

    // No token needed to read
    let response = warp::test::request()
        .method("GET")
        .path(&format!("/projects/{}", project_id))
        .reply(&routes)
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(&response);
    assert_eq!(body["title"], "Solar farm");
    assert_eq!(body["creator"]["id"], owner_id.as_str());

    let response = warp::test::request()
        .method("GET")
        .path("/projects")
        .reply(&routes)
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(&response).as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn non_owner_cannot_update_or_delete() {
    let (ctx, routes) = setup();
    let (owner_token, _) = register(&routes, "owner@x.com").await;
    let (other_token, _) = register(&routes, "other@x.com").await;
    let project_id = create_project(&routes, &owner_token).await;

    let response = warp::test::request()
        .method("PUT")
        .path(&format!("/projects/{}", project_id))
        .header("authorization", format!("Bearer {}", other_token))
        .json(&json!({"title": "Hijacked"}))
        .reply(&routes)
        .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    assert_eq!(
        body_json(&response)["message"],
        "Not authorized to modify this resource"
    );

    let response = warp::test::request()
        .method("DELETE")
        .path(&format!("/projects/{}", project_id))
        .header("authorization", format!("Bearer {}", other_token))
        .reply(&routes)
        .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    // The project is untouched
    let project = ctx.projects.get_project(&project_id).await.unwrap().unwrap();
    assert_eq!(project.title, "Solar farm");
}

#[tokio::test]
async fn owner_update_respects_field_whitelist() {
    let (_ctx, routes) = setup();
    let (token, _) = register(&routes, "owner@x.com").await;
    let project_id = create_project(&routes, &token).await;

    let response = warp::test::request()
        .method("PUT")
        .path(&format!("/projects/{}", project_id))
        .header("authorization", format!("Bearer {}", token))
        .json(&json!({"title": "Solar farm v2", "targetAmount": 75000.0}))
        .reply(&routes)
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(&response);
    assert_eq!(body["project"]["title"], "Solar farm v2");
    assert_eq!(body["project"]["targetAmount"], 75000.0);

    // Creators cannot self-approve
    let response = warp::test::request()
        .method("PUT")
        .path(&format!("/projects/{}", project_id))
        .header("authorization", format!("Bearer {}", token))
        .json(&json!({"status": "approved"}))
        .reply(&routes)
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn admin_can_modify_any_project() {
    let (ctx, routes) = setup();
    let (owner_token, _) = register(&routes, "owner@x.com").await;
    let project_id = create_project(&routes, &owner_token).await;

    ctx.ensure_admin("admin@x.com", "admin-pass").await.unwrap();
    let response = warp::test::request()
        .method("POST")
        .path("/auth/login")
        .json(&json!({"email": "admin@x.com", "password": "admin-pass"}))
        .reply(&routes)
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let admin_token = body_json(&response)["token"].as_str().unwrap().to_string();

    let response = warp::test::request()
        .method("PUT")
        .path(&format!("/projects/{}", project_id))
        .header("authorization", format!("Bearer {}", admin_token))
        .json(&json!({"description": "Edited by moderation"}))
        .reply(&routes)
        .await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = warp::test::request()
        .method("DELETE")
        .path(&format!("/projects/{}", project_id))
        .header("authorization", format!("Bearer {}", admin_token))
        .reply(&routes)
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(ctx.projects.get_project(&project_id).await.unwrap().is_none());
}

#[tokio::test]
async fn deleting_a_project_cascades_to_its_investments() {
    let (ctx, routes) = setup();
    let (owner_token, _) = register(&routes, "owner@x.com").await;
    let (investor_token, investor_id) = register(&routes, "investor@x.com").await;
    let doomed = create_project(&routes, &owner_token).await;
    let surviving = create_project(&routes, &owner_token).await;

    for (project, amount) in [(&doomed, 100.0), (&surviving, 250.0)] {
        let response = warp::test::request()
            .method("POST")
            .path("/investments")
            .header("authorization", format!("Bearer {}", investor_token))
            .json(&json!({"projectId": project, "amount": amount}))
            .reply(&routes)
            .await;
        assert_eq!(response.status(), StatusCode::CREATED);
    }

    let response = warp::test::request()
        .method("DELETE")
        .path(&format!("/projects/{}", doomed))
        .header("authorization", format!("Bearer {}", owner_token))
        .reply(&routes)
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(&response)["message"], "Project deleted successfully");

    // Only the investment in the surviving project remains
    let remaining = ctx
        .investments
        .list_investments_by_investor(&investor_id)
        .await
        .unwrap();
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].project_id, surviving);
}

#[tokio::test]
async fn investing_requires_an_existing_project() {
    let (_ctx, routes) = setup();
    let (token, _) = register(&routes, "investor@x.com").await;

    let response = warp::test::request()
        .method("POST")
        .path("/investments")
        .header("authorization", format!("Bearer {}", token))
        .json(&json!({"projectId": "no-such-project", "amount": 100.0}))
        .reply(&routes)
        .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_json(&response)["message"], "Project not found");

    let (_, routes) = setup();
    let (token, _) = register(&routes, "investor@x.com").await;
    let response = warp::test::request()
        .method("POST")
        .path("/investments")
        .header("authorization", format!("Bearer {}", token))
        .json(&json!({"projectId": "whatever", "amount": -5.0}))
        .reply(&routes)
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
