//! HTTP route table
//!
//! Composes every endpoint filter, the access-control gate and the
//! rejection handler into a single servable filter.

use std::convert::Infallible;

use serde::Serialize;
use warp::http::StatusCode;
use warp::{Filter, Rejection, Reply};

use crate::auth::gate::{admin_only, authenticated};
use crate::context::AppContext;
use crate::error::ApiError;
use crate::handlers;
use crate::models::PublicUser;

/// Maximum accepted JSON body size
const MAX_BODY_BYTES: u64 = 16 * 1024;

/// Uniform error body: `{success: false, message}`
#[derive(Debug, Serialize)]
struct ErrorBody {
    success: bool,
    message: String,
}

// Helper to include the shared context in a request chain
fn with_ctx(
    ctx: AppContext,
) -> impl Filter<Extract = (AppContext,), Error = Infallible> + Clone {
    warp::any().map(move || ctx.clone())
}

fn json_body<T: serde::de::DeserializeOwned + Send>(
) -> impl Filter<Extract = (T,), Error = Rejection> + Clone {
    warp::body::content_length_limit(MAX_BODY_BYTES).and(warp::body::json())
}

/// Build the complete API with rejection recovery applied
pub fn api_routes(
    ctx: AppContext,
) -> impl Filter<Extract = impl Reply, Error = Infallible> + Clone {
    let health = warp::path!("health").and(warp::get()).map(|| {
        warp::reply::json(&serde_json::json!({
            "status": "ok",
            "message": "Server is running",
            "timestamp": chrono::Utc::now().to_rfc3339(),
        }))
    });

    // Auth
    let register = warp::path!("auth" / "register")
        .and(warp::post())
        .and(with_ctx(ctx.clone()))
        .and(json_body())
        .and_then(handlers::auth::register);
    let login = warp::path!("auth" / "login")
        .and(warp::post())
        .and(with_ctx(ctx.clone()))
        .and(json_body())
        .and_then(handlers::auth::login);
    let me = warp::path!("auth" / "me")
        .and(warp::get())
        .and(with_ctx(ctx.clone()))
        .and(authenticated(&ctx))
        .and_then(handlers::auth::current_user);
    let get_profile = warp::path!("auth" / "profile")
        .and(warp::get())
        .and(with_ctx(ctx.clone()))
        .and(authenticated(&ctx))
        .and_then(handlers::auth::get_profile);
    let update_profile = warp::path!("auth" / "profile")
        .and(warp::put())
        .and(with_ctx(ctx.clone()))
        .and(authenticated(&ctx))
        .and(json_body())
        .and_then(handlers::auth::update_profile);

    // Projects; "mine" is matched before the ":id" capture
    let list_projects = warp::path!("projects")
        .and(warp::get())
        .and(with_ctx(ctx.clone()))
        .and_then(handlers::projects::list_projects);
    let my_projects = warp::path!("projects" / "mine")
        .and(warp::get())
        .and(with_ctx(ctx.clone()))
        .and(authenticated(&ctx))
        .and_then(handlers::projects::list_my_projects);
    let get_project = warp::path!("projects" / String)
        .and(warp::get())
        .and(with_ctx(ctx.clone()))
        .and_then(handlers::projects::get_project);
    let create_project = warp::path!("projects")
        .and(warp::post())
        .and(with_ctx(ctx.clone()))
        .and(authenticated(&ctx))
        .and(json_body())
        .and_then(handlers::projects::create_project);
    let update_project = warp::path!("projects" / String)
        .and(warp::put())
        .and(with_ctx(ctx.clone()))
        .and(authenticated(&ctx))
        .and(json_body())
        .and_then(handlers::projects::update_project);
    let delete_project = warp::path!("projects" / String)
        .and(warp::delete())
        .and(with_ctx(ctx.clone()))
        .and(authenticated(&ctx))
        .and_then(handlers::projects::delete_project);

    // Investments
    let create_investment = warp::path!("investments")
        .and(warp::post())
        .and(with_ctx(ctx.clone()))
        .and(authenticated(&ctx))
        .and(json_body())
        .and_then(handlers::investments::create_investment);
    let my_investments = warp::path!("investments" / "mine")
        .and(warp::get())
        .and(with_ctx(ctx.clone()))
        .and(authenticated(&ctx))
        .and_then(handlers::investments::list_my_investments);

    // Documents
    let create_document = warp::path!("documents")
        .and(warp::post())
        .and(with_ctx(ctx.clone()))
        .and(authenticated(&ctx))
        .and(json_body())
        .and_then(handlers::documents::create_document);
    let my_documents = warp::path!("documents")
        .and(warp::get())
        .and(with_ctx(ctx.clone()))
        .and(authenticated(&ctx))
        .and_then(handlers::documents::list_my_documents);
    let verify_document = warp::path!("documents" / String / "verify")
        .and(warp::put())
        .and(with_ctx(ctx.clone()))
        .and(admin_only(&ctx))
        .and(json_body())
        .and_then(handlers::documents::verify_document);
    let delete_document = warp::path!("documents" / String)
        .and(warp::delete())
        .and(with_ctx(ctx.clone()))
        .and(authenticated(&ctx))
        .and_then(handlers::documents::delete_document);

    // User statistics
    let user_stats = warp::path!("users" / "stats")
        .and(warp::get())
        .and(with_ctx(ctx.clone()))
        .and(authenticated(&ctx))
        .and_then(handlers::users::get_stats);

    // Admin
    let dashboard = warp::path!("admin" / "dashboard")
        .and(warp::get())
        .and(with_ctx(ctx.clone()))
        .and(admin_only(&ctx))
        .and_then(handlers::admin::get_dashboard);
    let admin_users = warp::path!("admin" / "users")
        .and(warp::get())
        .and(with_ctx(ctx.clone()))
        .and(admin_only(&ctx))
        .and_then(handlers::admin::list_users);
    let admin_user_status = warp::path!("admin" / "users" / String / "status")
        .and(warp::put())
        .and(with_ctx(ctx.clone()))
        .and(admin_only(&ctx))
        .and(json_body())
        .and_then(handlers::admin::update_user_status);
    let admin_projects = warp::path!("admin" / "projects")
        .and(warp::get())
        .and(with_ctx(ctx.clone()))
        .and(admin_only(&ctx))
        .and_then(|ctx: AppContext, _caller: PublicUser| {
            handlers::projects::list_projects(ctx)
        });
    let admin_update_project = warp::path!("admin" / "projects" / String)
        .and(warp::put())
        .and(with_ctx(ctx.clone()))
        .and(admin_only(&ctx))
        .and(json_body())
        .and_then(handlers::admin::update_project);
    let admin_documents = warp::path!("admin" / "documents")
        .and(warp::get())
        .and(with_ctx(ctx.clone()))
        .and(admin_only(&ctx))
        .and_then(handlers::documents::list_all_documents);

    // Real-time change feed
    let ws_feed = warp::path!("ws")
        .and(warp::ws())
        .and(with_ctx(ctx))
        .map(|ws: warp::ws::Ws, ctx: AppContext| {
            ws.on_upgrade(move |socket| handlers::ws::handle_ws_client(socket, ctx.events.clone()))
        });

    health
        .or(register)
        .or(login)
        .or(me)
        .or(get_profile)
        .or(update_profile)
        .or(my_projects)
        .or(list_projects)
        .or(create_project)
        .or(get_project)
        .or(update_project)
        .or(delete_project)
        .or(my_investments)
        .or(create_investment)
        .or(create_document)
        .or(my_documents)
        .or(verify_document)
        .or(delete_document)
        .or(user_stats)
        .or(dashboard)
        .or(admin_users)
        .or(admin_user_status)
        .or(admin_update_project)
        .or(admin_projects)
        .or(admin_documents)
        .or(ws_feed)
        .recover(handle_rejection)
}

/// Render every rejection as the uniform JSON error shape
pub async fn handle_rejection(err: Rejection) -> std::result::Result<impl Reply, Infallible> {
    let (status, message) = if let Some(api_err) = err.find::<ApiError>() {
        if api_err.status_code().is_server_error() {
            log::error!("Request failed: {}", api_err);
        }
        (api_err.status_code(), api_err.client_message().to_string())
    } else if err.is_not_found() {
        (StatusCode::NOT_FOUND, "Not found".to_string())
    } else if let Some(body_err) = err.find::<warp::filters::body::BodyDeserializeError>() {
        (StatusCode::BAD_REQUEST, body_err.to_string())
    } else if err.find::<warp::reject::MethodNotAllowed>().is_some() {
        (
            StatusCode::METHOD_NOT_ALLOWED,
            "Method not allowed".to_string(),
        )
    } else if err.find::<warp::reject::PayloadTooLarge>().is_some() {
        (
            StatusCode::PAYLOAD_TOO_LARGE,
            "Request body too large".to_string(),
        )
    } else if err.find::<warp::reject::LengthRequired>().is_some() {
        (
            StatusCode::LENGTH_REQUIRED,
            "Content-Length header is required".to_string(),
        )
    } else {
        log::error!("Unhandled rejection: {:?}", err);
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            "Internal server error".to_string(),
        )
    };

    Ok(warp::reply::with_status(
        warp::reply::json(&ErrorBody {
            success: false,
            message,
        }),
        status,
    ))
}
