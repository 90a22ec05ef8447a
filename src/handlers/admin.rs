//! Administrator endpoints: dashboard aggregates, user moderation and
//! project review. All routes here sit behind the `admin_only` gate.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use warp::{Rejection, Reply};

use crate::constants::DASHBOARD_RECENT_LIMIT;
use crate::context::AppContext;
use crate::error::{reject, ApiError};
use crate::events::ChangeEvent;
use crate::handlers::investments::investment_views;
use crate::handlers::projects::{apply_project_update, project_view, project_views, UpdateProjectRequest};
use crate::models::{
    AccountStatus, Category, InvestmentView, ProjectStatus, ProjectView, PublicUser,
};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardCounts {
    pub users: usize,
    pub projects: usize,
    pub investments: usize,
    pub total_funds: f64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecentActivity {
    pub projects: Vec<ProjectView>,
    pub investments: Vec<InvestmentView>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub counts: DashboardCounts,
    pub project_stats: HashMap<ProjectStatus, usize>,
    pub recent_activity: RecentActivity,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserStatusRequest {
    /// "active", "inactive" or "suspended"; accepted as a raw string so
    /// an invalid value yields a uniform validation message
    pub status: String,
    pub reason: Option<String>,
}

/// Admin project review: the creator whitelist plus the moderation
/// fields `status` and `feedback`
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct AdminUpdateProjectRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub category: Option<Category>,
    pub target_amount: Option<f64>,
    pub end_date: Option<DateTime<Utc>>,
    pub image: Option<String>,
    pub status: Option<ProjectStatus>,
    pub feedback: Option<String>,
}

/// GET /admin/dashboard
pub async fn get_dashboard(
    ctx: AppContext,
    _caller: PublicUser,
) -> std::result::Result<impl Reply, Rejection> {
    let users = ctx.users.count_users().await.map_err(reject)?;
    let project_count = ctx.projects.count_projects().await.map_err(reject)?;
    let investment_count = ctx.investments.count_investments().await.map_err(reject)?;

    let all_investments = ctx.investments.list_investments().await.map_err(reject)?;
    let total_funds = all_investments.iter().map(|i| i.amount).sum();

    let all_projects = ctx.projects.list_projects().await.map_err(reject)?;
    let mut project_stats: HashMap<ProjectStatus, usize> = HashMap::new();
    for project in &all_projects {
        *project_stats.entry(project.status).or_insert(0) += 1;
    }

    let recent_projects = all_projects
        .into_iter()
        .take(DASHBOARD_RECENT_LIMIT)
        .collect();
    let recent_investments = all_investments
        .into_iter()
        .take(DASHBOARD_RECENT_LIMIT)
        .collect();

    let stats = DashboardStats {
        counts: DashboardCounts {
            users,
            projects: project_count,
            investments: investment_count,
            total_funds,
        },
        project_stats,
        recent_activity: RecentActivity {
            projects: project_views(&ctx, recent_projects).await.map_err(reject)?,
            investments: investment_views(&ctx, recent_investments)
                .await
                .map_err(reject)?,
        },
    };

    Ok(warp::reply::json(&stats))
}

/// GET /admin/users
pub async fn list_users(
    ctx: AppContext,
    _caller: PublicUser,
) -> std::result::Result<impl Reply, Rejection> {
    let users = ctx.users.list_users().await.map_err(reject)?;
    let public: Vec<_> = users.iter().map(|u| u.public()).collect();
    Ok(warp::reply::json(&public))
}

/// PUT /admin/users/:id/status
pub async fn update_user_status(
    user_id: String,
    ctx: AppContext,
    caller: PublicUser,
    req: UpdateUserStatusRequest,
) -> std::result::Result<impl Reply, Rejection> {
    let status = match req.status.as_str() {
        "active" => AccountStatus::Active,
        "inactive" => AccountStatus::Inactive,
        "suspended" => AccountStatus::Suspended,
        _ => {
            return Err(reject(ApiError::Validation(
                "Invalid status value".to_string(),
            )))
        }
    };

    let mut user = ctx
        .users
        .get_user(&user_id)
        .await
        .map_err(reject)?
        .ok_or_else(|| reject(ApiError::NotFound("User not found".to_string())))?;

    // Administrators cannot be moderated, not even by each other
    if user.public().is_admin() {
        return Err(reject(ApiError::Forbidden(
            "Cannot update admin status".to_string(),
        )));
    }

    user.status = status;
    user.status_reason = req.reason.clone();
    user.status_updated_at = Some(Utc::now());
    user.status_updated_by = Some(caller.id.clone());

    let public = user.public();
    ctx.users.update_user(user).await.map_err(reject)?;
    log::info!(
        "User {} status set to {:?} by {}",
        public.id,
        status,
        caller.id
    );

    ctx.events.publish(ChangeEvent::UserUpdated {
        user_id: public.id.clone(),
        status,
        reason: req.reason,
    });

    Ok(warp::reply::json(&public))
}

/// PUT /admin/projects/:id
pub async fn update_project(
    project_id: String,
    ctx: AppContext,
    caller: PublicUser,
    req: AdminUpdateProjectRequest,
) -> std::result::Result<impl Reply, Rejection> {
    let mut project = ctx
        .projects
        .get_project(&project_id)
        .await
        .map_err(reject)?
        .ok_or_else(|| reject(ApiError::NotFound("Project not found".to_string())))?;

    let descriptive = UpdateProjectRequest {
        title: req.title,
        description: req.description,
        category: req.category,
        target_amount: req.target_amount,
        end_date: req.end_date,
        image: req.image,
    };
    apply_project_update(&mut project, descriptive).map_err(reject)?;

    // A status change is a moderation decision and records the reviewer
    if let Some(status) = req.status {
        project.status = status;
        project.feedback = req.feedback;
        project.reviewed_at = Some(Utc::now());
        project.reviewed_by = Some(caller.id.clone());
    }

    ctx.projects
        .update_project(project.clone())
        .await
        .map_err(reject)?;
    log::info!("Project {} reviewed by {}", project.id, caller.id);

    ctx.events.publish(ChangeEvent::ProjectUpdated {
        project: project.clone(),
    });

    let view = project_view(&ctx, project).await.map_err(reject)?;
    Ok(warp::reply::json(&view))
}
