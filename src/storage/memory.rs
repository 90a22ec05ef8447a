//! In-memory storage implementation for development and testing
//!
//! Keeps all entities in process memory behind async read/write locks.
//! Suitable for development, tests, or small single-node deployments.

use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;

use super::traits::{DocumentStore, InvestmentStore, ProjectStore, UserStore};
use crate::error::{ApiError, Result};
use crate::models::{Document, Investment, Project, UserRecord};

/// In-memory backend implementing every storage trait
pub struct MemoryStorage {
    users: RwLock<HashMap<String, UserRecord>>,
    projects: RwLock<HashMap<String, Project>>,
    investments: RwLock<HashMap<String, Investment>>,
    documents: RwLock<HashMap<String, Document>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self {
            users: RwLock::new(HashMap::new()),
            projects: RwLock::new(HashMap::new()),
            investments: RwLock::new(HashMap::new()),
            documents: RwLock::new(HashMap::new()),
        }
    }
}

impl Default for MemoryStorage {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl UserStore for MemoryStorage {
    async fn create_user(&self, user: UserRecord) -> Result<()> {
        let mut users = self.users.write().await;
        let email = user.email.to_lowercase();
        if users.values().any(|u| u.email == email) {
            return Err(ApiError::Conflict("User already exists".to_string()));
        }
        users.insert(user.id.clone(), user);
        Ok(())
    }

    async fn get_user(&self, user_id: &str) -> Result<Option<UserRecord>> {
        Ok(self.users.read().await.get(user_id).cloned())
    }

    async fn get_user_by_email(&self, email: &str) -> Result<Option<UserRecord>> {
        let email = email.to_lowercase();
        Ok(self
            .users
            .read()
            .await
            .values()
            .find(|u| u.email == email)
            .cloned())
    }

    async fn update_user(&self, user: UserRecord) -> Result<()> {
        let mut users = self.users.write().await;
        if !users.contains_key(&user.id) {
            return Err(ApiError::NotFound("User not found".to_string()));
        }
        let email = user.email.to_lowercase();
        if users.values().any(|u| u.email == email && u.id != user.id) {
            return Err(ApiError::Conflict("Email already in use".to_string()));
        }
        users.insert(user.id.clone(), user);
        Ok(())
    }

    async fn list_users(&self) -> Result<Vec<UserRecord>> {
        let mut users: Vec<UserRecord> = self.users.read().await.values().cloned().collect();
        users.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(users)
    }

    async fn count_users(&self) -> Result<usize> {
        Ok(self.users.read().await.len())
    }
}

#[async_trait]
impl ProjectStore for MemoryStorage {
    async fn create_project(&self, project: Project) -> Result<()> {
        self.projects
            .write()
            .await
            .insert(project.id.clone(), project);
        Ok(())
    }

    async fn get_project(&self, project_id: &str) -> Result<Option<Project>> {
        Ok(self.projects.read().await.get(project_id).cloned())
    }

    async fn update_project(&self, project: Project) -> Result<()> {
        let mut projects = self.projects.write().await;
        if !projects.contains_key(&project.id) {
            return Err(ApiError::NotFound("Project not found".to_string()));
        }
        projects.insert(project.id.clone(), project);
        Ok(())
    }

    async fn delete_project(&self, project_id: &str) -> Result<bool> {
        Ok(self.projects.write().await.remove(project_id).is_some())
    }

    async fn list_projects(&self) -> Result<Vec<Project>> {
        let mut projects: Vec<Project> = self.projects.read().await.values().cloned().collect();
        projects.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(projects)
    }

    async fn list_projects_by_creator(&self, creator_id: &str) -> Result<Vec<Project>> {
        let mut projects: Vec<Project> = self
            .projects
            .read()
            .await
            .values()
            .filter(|p| p.creator_id == creator_id)
            .cloned()
            .collect();
        projects.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(projects)
    }

    async fn count_projects(&self) -> Result<usize> {
        Ok(self.projects.read().await.len())
    }
}

#[async_trait]
impl InvestmentStore for MemoryStorage {
    async fn create_investment(&self, investment: Investment) -> Result<()> {
        self.investments
            .write()
            .await
            .insert(investment.id.clone(), investment);
        Ok(())
    }

    async fn get_investment(&self, investment_id: &str) -> Result<Option<Investment>> {
        Ok(self.investments.read().await.get(investment_id).cloned())
    }

    async fn list_investments_by_investor(&self, investor_id: &str) -> Result<Vec<Investment>> {
        let mut investments: Vec<Investment> = self
            .investments
            .read()
            .await
            .values()
            .filter(|i| i.investor_id == investor_id)
            .cloned()
            .collect();
        investments.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(investments)
    }

    async fn list_investments(&self) -> Result<Vec<Investment>> {
        let mut investments: Vec<Investment> =
            self.investments.read().await.values().cloned().collect();
        investments.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(investments)
    }

    async fn delete_investments_by_project(&self, project_id: &str) -> Result<usize> {
        let mut investments = self.investments.write().await;
        let before = investments.len();
        investments.retain(|_, i| i.project_id != project_id);
        Ok(before - investments.len())
    }

    async fn count_investments(&self) -> Result<usize> {
        Ok(self.investments.read().await.len())
    }
}

#[async_trait]
impl DocumentStore for MemoryStorage {
    async fn create_document(&self, document: Document) -> Result<()> {
        self.documents
            .write()
            .await
            .insert(document.id.clone(), document);
        Ok(())
    }

    async fn get_document(&self, document_id: &str) -> Result<Option<Document>> {
        Ok(self.documents.read().await.get(document_id).cloned())
    }

    async fn update_document(&self, document: Document) -> Result<()> {
        let mut documents = self.documents.write().await;
        if !documents.contains_key(&document.id) {
            return Err(ApiError::NotFound("Document not found".to_string()));
        }
        documents.insert(document.id.clone(), document);
        Ok(())
    }

    async fn delete_document(&self, document_id: &str) -> Result<bool> {
        Ok(self.documents.write().await.remove(document_id).is_some())
    }

    async fn list_documents_by_owner(&self, owner_id: &str) -> Result<Vec<Document>> {
        let mut documents: Vec<Document> = self
            .documents
            .read()
            .await
            .values()
            .filter(|d| d.owner_id == owner_id)
            .cloned()
            .collect();
        documents.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(documents)
    }

    async fn list_documents(&self) -> Result<Vec<Document>> {
        let mut documents: Vec<Document> =
            self.documents.read().await.values().cloned().collect();
        documents.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(documents)
    }
}
