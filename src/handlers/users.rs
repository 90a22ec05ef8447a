//! Per-user statistics endpoint

use serde::Serialize;
use warp::{Rejection, Reply};

use crate::context::AppContext;
use crate::error::reject;
use crate::models::{InvestmentStatus, ProjectStatus, PublicUser};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserStats {
    pub total_invested: f64,
    pub completed_investments: usize,
    pub pending_investments: usize,
    pub pending_projects: usize,
}

/// GET /users/stats
pub async fn get_stats(
    ctx: AppContext,
    caller: PublicUser,
) -> std::result::Result<impl Reply, Rejection> {
    let investments = ctx
        .investments
        .list_investments_by_investor(&caller.id)
        .await
        .map_err(reject)?;
    let projects = ctx
        .projects
        .list_projects_by_creator(&caller.id)
        .await
        .map_err(reject)?;

    let stats = UserStats {
        total_invested: investments.iter().map(|i| i.amount).sum(),
        completed_investments: investments
            .iter()
            .filter(|i| i.status == InvestmentStatus::Completed)
            .count(),
        pending_investments: investments
            .iter()
            .filter(|i| i.status == InvestmentStatus::Pending)
            .count(),
        pending_projects: projects
            .iter()
            .filter(|p| p.status == ProjectStatus::Pending)
            .count(),
    };

    Ok(warp::reply::json(&stats))
}
