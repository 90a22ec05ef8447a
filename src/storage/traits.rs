//! Abstract storage interfaces for pluggable backends
//!
//! This module defines the per-entity persistence traits the handlers
//! depend on. The in-memory implementation backs development and tests;
//! a relational or document backend can implement the same traits.

use async_trait::async_trait;

use crate::error::Result;
use crate::models::{Document, Investment, Project, UserRecord};

/// User persistence interface. Email uniqueness (case-insensitive) is
/// enforced by the store on create and update.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Persist a new user; fails with `Conflict` if the email is taken
    async fn create_user(&self, user: UserRecord) -> Result<()>;

    /// Get user by ID
    async fn get_user(&self, user_id: &str) -> Result<Option<UserRecord>>;

    /// Get user by email (matched case-insensitively)
    async fn get_user_by_email(&self, email: &str) -> Result<Option<UserRecord>>;

    /// Replace an existing user record; fails with `Conflict` if the new
    /// email collides with another account
    async fn update_user(&self, user: UserRecord) -> Result<()>;

    /// List all users, newest first
    async fn list_users(&self) -> Result<Vec<UserRecord>>;

    async fn count_users(&self) -> Result<usize>;
}

/// Project persistence interface
#[async_trait]
pub trait ProjectStore: Send + Sync {
    async fn create_project(&self, project: Project) -> Result<()>;

    async fn get_project(&self, project_id: &str) -> Result<Option<Project>>;

    async fn update_project(&self, project: Project) -> Result<()>;

    /// Delete a project; returns false if it did not exist
    async fn delete_project(&self, project_id: &str) -> Result<bool>;

    /// List all projects, newest first
    async fn list_projects(&self) -> Result<Vec<Project>>;

    /// List projects created by a user, newest first
    async fn list_projects_by_creator(&self, creator_id: &str) -> Result<Vec<Project>>;

    async fn count_projects(&self) -> Result<usize>;
}

/// Investment persistence interface. Investments are append-only; the
/// only removal path is the cascade when their project is deleted.
#[async_trait]
pub trait InvestmentStore: Send + Sync {
    async fn create_investment(&self, investment: Investment) -> Result<()>;

    async fn get_investment(&self, investment_id: &str) -> Result<Option<Investment>>;

    /// List investments made by a user, newest first
    async fn list_investments_by_investor(&self, investor_id: &str) -> Result<Vec<Investment>>;

    /// List all investments, newest first
    async fn list_investments(&self) -> Result<Vec<Investment>>;

    /// Remove every investment referencing a project; returns the number
    /// removed
    async fn delete_investments_by_project(&self, project_id: &str) -> Result<usize>;

    async fn count_investments(&self) -> Result<usize>;
}

/// Document persistence interface
#[async_trait]
pub trait DocumentStore: Send + Sync {
    async fn create_document(&self, document: Document) -> Result<()>;

    async fn get_document(&self, document_id: &str) -> Result<Option<Document>>;

    async fn update_document(&self, document: Document) -> Result<()>;

    /// Delete a document; returns false if it did not exist
    async fn delete_document(&self, document_id: &str) -> Result<bool>;

    /// List documents owned by a user, newest first
    async fn list_documents_by_owner(&self, owner_id: &str) -> Result<Vec<Document>>;

    /// List all documents, newest first
    async fn list_documents(&self) -> Result<Vec<Document>>;
}
