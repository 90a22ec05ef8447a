//! Access-control gate
//!
//! Converts an inbound request's bearer credential into a resolved
//! caller identity and short-circuits the pipeline when a policy
//! predicate fails. Every protected route composes [`authenticated`]
//! (or [`admin_only`]); ownership checks run inside the handlers after
//! the resource is loaded, because ownership is resource-specific.

use warp::Filter;

use crate::auth::token::extract_bearer_token;
use crate::context::AppContext;
use crate::error::{reject, ApiError, Result};
use crate::models::PublicUser;

/// Resolve the caller identity from an optional Authorization header.
///
/// Fails with `Unauthenticated` when the header is absent, the token
/// does not verify, or the subject no longer exists (a stale token
/// referencing a deleted account).
pub async fn resolve_caller(ctx: &AppContext, auth_header: Option<&str>) -> Result<PublicUser> {
    let header = auth_header
        .ok_or_else(|| ApiError::Unauthenticated("Not authorized, no token".to_string()))?;
    let token = extract_bearer_token(header)
        .ok_or_else(|| ApiError::Unauthenticated("Not authorized, no token".to_string()))?;

    let subject_id = ctx.tokens.verify(token)?;

    let user = ctx
        .users
        .get_user(&subject_id)
        .await?
        .ok_or_else(|| ApiError::Unauthenticated("Not authorized, user not found".to_string()))?;

    Ok(user.public())
}

/// Filter that yields the authenticated caller or rejects with 401
pub fn authenticated(
    ctx: &AppContext,
) -> impl Filter<Extract = (PublicUser,), Error = warp::Rejection> + Clone {
    let ctx = ctx.clone();
    warp::header::optional::<String>("authorization").and_then(move |header: Option<String>| {
        let ctx = ctx.clone();
        async move { resolve_caller(&ctx, header.as_deref()).await.map_err(reject) }
    })
}

/// Filter that additionally requires the admin role, rejecting with 403
pub fn admin_only(
    ctx: &AppContext,
) -> impl Filter<Extract = (PublicUser,), Error = warp::Rejection> + Clone {
    authenticated(ctx).and_then(|caller: PublicUser| async move {
        require_admin(&caller).map_err(reject)?;
        Ok::<PublicUser, warp::Rejection>(caller)
    })
}

/// Passes iff the caller holds the admin role
pub fn require_admin(caller: &PublicUser) -> Result<()> {
    if caller.is_admin() {
        Ok(())
    } else {
        Err(ApiError::Forbidden("Not authorized as admin".to_string()))
    }
}

/// Passes iff the caller owns the resource or holds the admin role
pub fn require_owner_or_admin(caller: &PublicUser, owner_id: &str) -> Result<()> {
    if caller.id == owner_id || caller.is_admin() {
        Ok(())
    } else {
        Err(ApiError::Forbidden(
            "Not authorized to modify this resource".to_string(),
        ))
    }
}
