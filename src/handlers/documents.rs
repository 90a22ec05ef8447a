//! Document endpoints
//!
//! Owners upload and list their verification documents; status
//! transitions are admin-only and one-shot (pending -> approved or
//! pending -> rejected, no un-verify path).

use chrono::Utc;
use serde::Deserialize;
use warp::http::StatusCode;
use warp::{Rejection, Reply};

use crate::auth::gate::require_owner_or_admin;
use crate::context::AppContext;
use crate::error::{reject, ApiError};
use crate::events::ChangeEvent;
use crate::models::{Document, DocumentStatus, PublicUser};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateDocumentRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub file_url: Option<String>,
    pub kind: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifyDocumentRequest {
    /// "approved" or "rejected"; accepted as a raw string so an invalid
    /// value yields a uniform validation message
    pub status: String,
    pub rejection_reason: Option<String>,
}

/// POST /documents
pub async fn create_document(
    ctx: AppContext,
    caller: PublicUser,
    req: CreateDocumentRequest,
) -> std::result::Result<impl Reply, Rejection> {
    let (title, file_url, kind) = match (
        req.title.as_deref().map(str::trim),
        req.file_url.as_deref().map(str::trim),
        req.kind.as_deref().map(str::trim),
    ) {
        (Some(t), Some(u), Some(k)) if !t.is_empty() && !u.is_empty() && !k.is_empty() => {
            (t.to_string(), u.to_string(), k.to_string())
        }
        _ => {
            return Err(reject(ApiError::Validation(
                "Please provide all required fields".to_string(),
            )))
        }
    };

    let mut document = Document::new(caller.id.clone(), title, file_url, kind);
    document.description = req.description;

    ctx.documents
        .create_document(document.clone())
        .await
        .map_err(reject)?;
    log::info!("Document {} uploaded by {}", document.id, caller.id);

    Ok(warp::reply::with_status(
        warp::reply::json(&document),
        StatusCode::CREATED,
    ))
}

/// GET /documents
pub async fn list_my_documents(
    ctx: AppContext,
    caller: PublicUser,
) -> std::result::Result<impl Reply, Rejection> {
    let documents = ctx
        .documents
        .list_documents_by_owner(&caller.id)
        .await
        .map_err(reject)?;
    Ok(warp::reply::json(&documents))
}

/// GET /admin/documents
pub async fn list_all_documents(
    ctx: AppContext,
    _caller: PublicUser,
) -> std::result::Result<impl Reply, Rejection> {
    let documents = ctx.documents.list_documents().await.map_err(reject)?;
    Ok(warp::reply::json(&documents))
}

/// PUT /documents/:id/verify (admin)
pub async fn verify_document(
    document_id: String,
    ctx: AppContext,
    caller: PublicUser,
    req: VerifyDocumentRequest,
) -> std::result::Result<impl Reply, Rejection> {
    let status = match req.status.as_str() {
        "approved" => DocumentStatus::Approved,
        "rejected" => DocumentStatus::Rejected,
        _ => {
            return Err(reject(ApiError::Validation(
                "Invalid status value".to_string(),
            )))
        }
    };

    let mut document = ctx
        .documents
        .get_document(&document_id)
        .await
        .map_err(reject)?
        .ok_or_else(|| reject(ApiError::NotFound("Document not found".to_string())))?;

    // One-shot transition: once reviewed, a document stays reviewed
    if document.status != DocumentStatus::Pending {
        return Err(reject(ApiError::Conflict(
            "Document has already been reviewed".to_string(),
        )));
    }

    document.status = status;
    match status {
        DocumentStatus::Approved => {
            document.verified_at = Some(Utc::now());
            document.verified_by = Some(caller.id.clone());
        }
        DocumentStatus::Rejected => {
            document.rejection_reason = req.rejection_reason;
        }
        DocumentStatus::Pending => unreachable!("status parsed above"),
    }

    ctx.documents
        .update_document(document.clone())
        .await
        .map_err(reject)?;
    log::info!(
        "Document {} marked {:?} by {}",
        document.id,
        document.status,
        caller.id
    );

    ctx.events.publish(ChangeEvent::DocumentUpdated {
        document: document.clone(),
    });

    Ok(warp::reply::json(&document))
}

/// DELETE /documents/:id (owner or admin)
pub async fn delete_document(
    document_id: String,
    ctx: AppContext,
    caller: PublicUser,
) -> std::result::Result<impl Reply, Rejection> {
    let document = ctx
        .documents
        .get_document(&document_id)
        .await
        .map_err(reject)?
        .ok_or_else(|| reject(ApiError::NotFound("Document not found".to_string())))?;

    require_owner_or_admin(&caller, &document.owner_id).map_err(reject)?;

    ctx.documents
        .delete_document(&document_id)
        .await
        .map_err(reject)?;

    Ok(warp::reply::json(&serde_json::json!({
        "success": true,
        "message": "Document removed",
    })))
}
