//! Investment endpoints
//!
//! Investments are immutable once created; settlement against a payment
//! provider is out of scope, so records stay `pending` and the project's
//! `current_amount` is untouched here.

use serde::Deserialize;
use warp::http::StatusCode;
use warp::{Rejection, Reply};

use crate::context::AppContext;
use crate::error::{reject, ApiError, Result};
use crate::events::ChangeEvent;
use crate::models::{Investment, InvestmentView, PublicUser, UserBrief};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateInvestmentRequest {
    pub project_id: String,
    pub amount: f64,
}

/// Resolve investor and project references for a batch of investments
pub(crate) async fn investment_views(
    ctx: &AppContext,
    investments: Vec<Investment>,
) -> Result<Vec<InvestmentView>> {
    let mut views = Vec::with_capacity(investments.len());
    for investment in investments {
        let investor = ctx
            .users
            .get_user(&investment.investor_id)
            .await?
            .map(|u| UserBrief::from(&u));
        let project_title = ctx
            .projects
            .get_project(&investment.project_id)
            .await?
            .map(|p| p.title);
        views.push(InvestmentView {
            investment,
            investor,
            project_title,
        });
    }
    Ok(views)
}

/// POST /investments
pub async fn create_investment(
    ctx: AppContext,
    caller: PublicUser,
    req: CreateInvestmentRequest,
) -> std::result::Result<impl Reply, Rejection> {
    if !req.amount.is_finite() || req.amount <= 0.0 {
        return Err(reject(ApiError::Validation(
            "Amount must be a positive number".to_string(),
        )));
    }

    // The investment must reference an existing project
    ctx.projects
        .get_project(&req.project_id)
        .await
        .map_err(reject)?
        .ok_or_else(|| reject(ApiError::NotFound("Project not found".to_string())))?;

    let investment = Investment::new(req.project_id, caller.id.clone(), req.amount);
    ctx.investments
        .create_investment(investment.clone())
        .await
        .map_err(reject)?;
    log::info!(
        "Investment {} of {} created by {}",
        investment.id,
        investment.amount,
        caller.id
    );

    ctx.events.publish(ChangeEvent::InvestmentCreated {
        investment: investment.clone(),
    });

    Ok(warp::reply::with_status(
        warp::reply::json(&serde_json::json!({
            "success": true,
            "investment": investment,
        })),
        StatusCode::CREATED,
    ))
}

/// GET /investments/mine
pub async fn list_my_investments(
    ctx: AppContext,
    caller: PublicUser,
) -> std::result::Result<impl Reply, Rejection> {
    let investments = ctx
        .investments
        .list_investments_by_investor(&caller.id)
        .await
        .map_err(reject)?;
    let views = investment_views(&ctx, investments).await.map_err(reject)?;
    Ok(warp::reply::json(&views))
}
