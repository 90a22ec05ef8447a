//! Project CRUD endpoints
//!
//! Mutating handlers follow the shared contract: load the resource,
//! evaluate the ownership predicate, apply whitelisted field changes,
//! persist, then publish a best-effort change event.

use chrono::{DateTime, Utc};
use serde::Deserialize;
use uuid::Uuid;
use warp::http::StatusCode;
use warp::{Rejection, Reply};

use crate::auth::gate::require_owner_or_admin;
use crate::context::AppContext;
use crate::error::{reject, ApiError, Result};
use crate::events::ChangeEvent;
use crate::models::{
    Category, Project, ProjectStatus, ProjectView, PublicUser, UserBrief,
};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateProjectRequest {
    pub title: String,
    pub description: String,
    pub category: Category,
    pub target_amount: f64,
    pub equity: Option<f64>,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: DateTime<Utc>,
    pub image: Option<String>,
}

/// Whitelist of fields a creator may edit. `status` and `feedback` are
/// moderation-only and deliberately absent; unknown fields are rejected
/// at the boundary instead of being silently dropped.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct UpdateProjectRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub category: Option<Category>,
    pub target_amount: Option<f64>,
    pub end_date: Option<DateTime<Utc>>,
    pub image: Option<String>,
}

/// Resolve the creator reference for a single project
pub(crate) async fn project_view(ctx: &AppContext, project: Project) -> Result<ProjectView> {
    let creator = ctx
        .users
        .get_user(&project.creator_id)
        .await?
        .map(|u| UserBrief::from(&u));
    Ok(ProjectView { project, creator })
}

/// Resolve creator references for a batch of projects
pub(crate) async fn project_views(
    ctx: &AppContext,
    projects: Vec<Project>,
) -> Result<Vec<ProjectView>> {
    let mut views = Vec::with_capacity(projects.len());
    for project in projects {
        views.push(project_view(ctx, project).await?);
    }
    Ok(views)
}

fn validate_title(title: &str) -> Result<String> {
    let title = title.trim();
    if title.len() < 3 {
        return Err(ApiError::Validation(
            "Title must be at least 3 characters".to_string(),
        ));
    }
    Ok(title.to_string())
}

fn validate_amount(amount: f64) -> Result<f64> {
    if !amount.is_finite() || amount <= 0.0 {
        return Err(ApiError::Validation(
            "Target amount must be a positive number".to_string(),
        ));
    }
    Ok(amount)
}

/// POST /projects
pub async fn create_project(
    ctx: AppContext,
    caller: PublicUser,
    req: CreateProjectRequest,
) -> std::result::Result<impl Reply, Rejection> {
    let title = validate_title(&req.title).map_err(reject)?;
    let description = req.description.trim().to_string();
    if description.is_empty() {
        return Err(reject(ApiError::Validation(
            "Description is required".to_string(),
        )));
    }
    let target_amount = validate_amount(req.target_amount).map_err(reject)?;

    let now = Utc::now();
    let start_date = req.start_date.unwrap_or(now);
    if req.end_date <= start_date {
        return Err(reject(ApiError::Validation(
            "End date must be after the start date".to_string(),
        )));
    }

    let project = Project {
        id: Uuid::new_v4().to_string(),
        title,
        description,
        category: req.category,
        target_amount,
        current_amount: 0.0,
        equity: req.equity,
        start_date,
        end_date: req.end_date,
        image: req.image,
        creator_id: caller.id.clone(),
        status: ProjectStatus::Pending,
        feedback: None,
        reviewed_at: None,
        reviewed_by: None,
        created_at: now,
        updated_at: now,
    };

    ctx.projects
        .create_project(project.clone())
        .await
        .map_err(reject)?;
    log::info!("Project {} created by {}", project.id, caller.id);

    ctx.events.publish(ChangeEvent::ProjectCreated {
        project: project.clone(),
    });

    Ok(warp::reply::with_status(
        warp::reply::json(&serde_json::json!({
            "success": true,
            "project": project,
        })),
        StatusCode::CREATED,
    ))
}

/// GET /projects
pub async fn list_projects(ctx: AppContext) -> std::result::Result<impl Reply, Rejection> {
    let projects = ctx.projects.list_projects().await.map_err(reject)?;
    let views = project_views(&ctx, projects).await.map_err(reject)?;
    Ok(warp::reply::json(&views))
}

/// GET /projects/mine
pub async fn list_my_projects(
    ctx: AppContext,
    caller: PublicUser,
) -> std::result::Result<impl Reply, Rejection> {
    let projects = ctx
        .projects
        .list_projects_by_creator(&caller.id)
        .await
        .map_err(reject)?;
    let views = project_views(&ctx, projects).await.map_err(reject)?;
    Ok(warp::reply::json(&views))
}

/// GET /projects/:id
pub async fn get_project(
    project_id: String,
    ctx: AppContext,
) -> std::result::Result<impl Reply, Rejection> {
    let project = ctx
        .projects
        .get_project(&project_id)
        .await
        .map_err(reject)?
        .ok_or_else(|| reject(ApiError::NotFound("Project not found".to_string())))?;
    let view = project_view(&ctx, project).await.map_err(reject)?;
    Ok(warp::reply::json(&view))
}

/// Apply a whitelisted update to a project in place
pub(crate) fn apply_project_update(
    project: &mut Project,
    req: UpdateProjectRequest,
) -> Result<()> {
    if let Some(title) = req.title {
        project.title = validate_title(&title)?;
    }
    if let Some(description) = req.description {
        let description = description.trim().to_string();
        if description.is_empty() {
            return Err(ApiError::Validation("Description is required".to_string()));
        }
        project.description = description;
    }
    if let Some(category) = req.category {
        project.category = category;
    }
    if let Some(amount) = req.target_amount {
        project.target_amount = validate_amount(amount)?;
    }
    if let Some(end_date) = req.end_date {
        if end_date <= project.start_date {
            return Err(ApiError::Validation(
                "End date must be after the start date".to_string(),
            ));
        }
        project.end_date = end_date;
    }
    if let Some(image) = req.image {
        project.image = Some(image);
    }
    project.updated_at = Utc::now();
    Ok(())
}

/// PUT /projects/:id (owner or admin)
pub async fn update_project(
    project_id: String,
    ctx: AppContext,
    caller: PublicUser,
    req: UpdateProjectRequest,
) -> std::result::Result<impl Reply, Rejection> {
    let mut project = ctx
        .projects
        .get_project(&project_id)
        .await
        .map_err(reject)?
        .ok_or_else(|| reject(ApiError::NotFound("Project not found".to_string())))?;

    require_owner_or_admin(&caller, &project.creator_id).map_err(reject)?;

    apply_project_update(&mut project, req).map_err(reject)?;

    ctx.projects
        .update_project(project.clone())
        .await
        .map_err(reject)?;

    ctx.events.publish(ChangeEvent::ProjectUpdated {
        project: project.clone(),
    });

    let view = project_view(&ctx, project).await.map_err(reject)?;
    Ok(warp::reply::json(&serde_json::json!({
        "success": true,
        "project": view,
    })))
}

/// DELETE /projects/:id (owner or admin)
///
/// Cascades to the project's investments. The two deletions are
/// independent operations; a crash in between leaves the project intact
/// with its investments already gone, an accepted tradeoff.
pub async fn delete_project(
    project_id: String,
    ctx: AppContext,
    caller: PublicUser,
) -> std::result::Result<impl Reply, Rejection> {
    let project = ctx
        .projects
        .get_project(&project_id)
        .await
        .map_err(reject)?
        .ok_or_else(|| reject(ApiError::NotFound("Project not found".to_string())))?;

    require_owner_or_admin(&caller, &project.creator_id).map_err(reject)?;

    let removed = ctx
        .investments
        .delete_investments_by_project(&project_id)
        .await
        .map_err(reject)?;
    ctx.projects
        .delete_project(&project_id)
        .await
        .map_err(reject)?;

    log::info!(
        "Project {} deleted by {} ({} investments cascaded)",
        project_id,
        caller.id,
        removed
    );

    ctx.events.publish(ChangeEvent::ProjectDeleted {
        project_id: project_id.clone(),
    });

    Ok(warp::reply::json(&serde_json::json!({
        "success": true,
        "message": "Project deleted successfully",
    })))
}
