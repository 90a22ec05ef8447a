//! Registration, login and profile endpoints

use serde::{Deserialize, Serialize};
use warp::http::StatusCode;
use warp::{Rejection, Reply};

use crate::auth::password::{hash_password, verify_password};
use crate::context::AppContext;
use crate::error::{reject, ApiError, Result};
use crate::events::ChangeEvent;
use crate::models::{PublicUser, Role, UserRecord};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    /// Defaults to `individual`; `admin` is rejected outright
    pub role: Option<Role>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

/// Whitelist of self-service profile fields. Unknown fields (notably
/// `role` and `status`) are rejected at the boundary.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct UpdateProfileRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub success: bool,
    pub token: String,
    pub user: PublicUser,
}

fn validate_registration(req: &RegisterRequest) -> Result<(String, String, String, Role)> {
    let name = req.name.as_deref().map(str::trim).unwrap_or("");
    let email = req.email.as_deref().map(str::trim).unwrap_or("");
    let password = req.password.as_deref().unwrap_or("");

    if name.is_empty() || email.is_empty() || password.is_empty() {
        return Err(ApiError::Validation(
            "Please provide name, email and password".to_string(),
        ));
    }
    if !email.contains('@') {
        return Err(ApiError::Validation("Invalid email address".to_string()));
    }

    // The admin role is only reachable through the provisioning path
    let role = req.role.unwrap_or_default();
    if role == Role::Admin {
        return Err(ApiError::Validation(
            "Cannot register with admin role".to_string(),
        ));
    }

    Ok((
        name.to_string(),
        email.to_string(),
        password.to_string(),
        role,
    ))
}

/// POST /auth/register
pub async fn register(
    ctx: AppContext,
    req: RegisterRequest,
) -> std::result::Result<impl Reply, Rejection> {
    let (name, email, password, role) = validate_registration(&req).map_err(reject)?;

    let password_hash = hash_password(&password).map_err(reject)?;
    let user = UserRecord::new(name, email, password_hash, role);
    let public = user.public();

    ctx.users.create_user(user).await.map_err(reject)?;
    log::info!("Registered user {} ({})", public.id, public.email);

    let token = ctx.tokens.issue(&public.id).map_err(reject)?;
    ctx.events.publish(ChangeEvent::UserCreated {
        user: public.clone(),
    });

    Ok(warp::reply::with_status(
        warp::reply::json(&AuthResponse {
            success: true,
            token,
            user: public,
        }),
        StatusCode::CREATED,
    ))
}

/// POST /auth/login
pub async fn login(
    ctx: AppContext,
    req: LoginRequest,
) -> std::result::Result<impl Reply, Rejection> {
    let (email, password) = match (req.email.as_deref(), req.password.as_deref()) {
        (Some(e), Some(p)) if !e.is_empty() && !p.is_empty() => (e, p),
        _ => {
            return Err(reject(ApiError::Validation(
                "Please provide email and password".to_string(),
            )))
        }
    };

    // The same message covers an unknown email and a wrong password, so
    // login failures do not reveal which accounts exist.
    let invalid = || ApiError::Unauthenticated("Invalid email or password".to_string());

    let user = ctx
        .users
        .get_user_by_email(email)
        .await
        .map_err(reject)?
        .ok_or_else(|| reject(invalid()))?;

    if !verify_password(password, &user.password_hash) {
        return Err(reject(invalid()));
    }

    let token = ctx.tokens.issue(&user.id).map_err(reject)?;
    log::info!("User {} logged in", user.id);

    Ok(warp::reply::json(&AuthResponse {
        success: true,
        token,
        user: user.public(),
    }))
}

/// GET /auth/me
pub async fn current_user(
    _ctx: AppContext,
    caller: PublicUser,
) -> std::result::Result<impl Reply, Rejection> {
    Ok(warp::reply::json(&serde_json::json!({
        "success": true,
        "user": caller,
    })))
}

/// GET /auth/profile
pub async fn get_profile(
    ctx: AppContext,
    caller: PublicUser,
) -> std::result::Result<impl Reply, Rejection> {
    let user = ctx
        .users
        .get_user(&caller.id)
        .await
        .map_err(reject)?
        .ok_or_else(|| reject(ApiError::NotFound("User not found".to_string())))?;
    Ok(warp::reply::json(&user.public()))
}

/// PUT /auth/profile
pub async fn update_profile(
    ctx: AppContext,
    caller: PublicUser,
    req: UpdateProfileRequest,
) -> std::result::Result<impl Reply, Rejection> {
    let mut user = ctx
        .users
        .get_user(&caller.id)
        .await
        .map_err(reject)?
        .ok_or_else(|| reject(ApiError::NotFound("User not found".to_string())))?;

    if let Some(name) = req.name {
        let name = name.trim().to_string();
        if name.is_empty() {
            return Err(reject(ApiError::Validation(
                "Name cannot be empty".to_string(),
            )));
        }
        user.name = name;
    }
    if let Some(email) = req.email {
        let email = email.trim().to_lowercase();
        if !email.contains('@') {
            return Err(reject(ApiError::Validation(
                "Invalid email address".to_string(),
            )));
        }
        user.email = email;
    }
    if let Some(password) = req.password {
        if password.is_empty() {
            return Err(reject(ApiError::Validation(
                "Password cannot be empty".to_string(),
            )));
        }
        user.password_hash = hash_password(&password).map_err(reject)?;
    }

    let public = user.public();
    ctx.users.update_user(user).await.map_err(reject)?;

    Ok(warp::reply::json(&public))
}
