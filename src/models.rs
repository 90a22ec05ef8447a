//! Domain model types shared by the storage layer and the handlers
//!
//! All wire representations use camelCase field names. Every mutable
//! entity carries an owner/creator reference that the access-control
//! predicates are evaluated against.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Account roles. `Admin` can never be self-assigned: registration and
/// profile updates reject it, leaving the provisioning path as the only
/// way to create an administrator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Individual,
    Institutional,
    Angel,
    Admin,
}

impl Default for Role {
    fn default() -> Self {
        Role::Individual
    }
}

/// Moderation status of an account
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccountStatus {
    Active,
    Inactive,
    Suspended,
}

/// A stored user record, including the password hash. Never serialized
/// onto the wire; handlers project it to [`PublicUser`] first.
#[derive(Debug, Clone)]
pub struct UserRecord {
    pub id: String,
    pub name: String,
    /// Stored lowercase; uniqueness is case-insensitive
    pub email: String,
    pub password_hash: String,
    pub role: Role,
    pub is_verified: bool,
    pub status: AccountStatus,
    pub status_reason: Option<String>,
    pub status_updated_at: Option<DateTime<Utc>>,
    pub status_updated_by: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl UserRecord {
    pub fn new(name: String, email: String, password_hash: String, role: Role) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name,
            email: email.to_lowercase(),
            password_hash,
            role,
            is_verified: true,
            status: AccountStatus::Active,
            status_reason: None,
            status_updated_at: None,
            status_updated_by: None,
            created_at: Utc::now(),
        }
    }

    /// Projection with the password hash excluded
    pub fn public(&self) -> PublicUser {
        PublicUser {
            id: self.id.clone(),
            name: self.name.clone(),
            email: self.email.clone(),
            role: self.role,
            is_verified: self.is_verified,
            status: self.status,
            status_reason: self.status_reason.clone(),
            created_at: self.created_at,
        }
    }
}

/// Public view of a user. Doubles as the resolved caller identity that
/// the access-control gate attaches to each authenticated request.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicUser {
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: Role,
    pub is_verified: bool,
    pub status: AccountStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status_reason: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl PublicUser {
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

/// Compact creator/investor reference embedded in list responses
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserBrief {
    pub id: String,
    pub name: String,
    pub email: String,
}

impl From<&UserRecord> for UserBrief {
    fn from(user: &UserRecord) -> Self {
        Self {
            id: user.id.clone(),
            name: user.name.clone(),
            email: user.email.clone(),
        }
    }
}

/// Fundraising project categories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Category {
    Education,
    Healthcare,
    Environment,
    Technology,
    Social,
    Other,
}

/// Moderation status of a project
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProjectStatus {
    Pending,
    Approved,
    Rejected,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: String,
    pub title: String,
    pub description: String,
    pub category: Category,
    pub target_amount: f64,
    pub current_amount: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub equity: Option<f64>,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    pub creator_id: String,
    pub status: ProjectStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub feedback: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reviewed_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reviewed_by: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Project representation with the creator reference resolved
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectView {
    #[serde(flatten)]
    pub project: Project,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub creator: Option<UserBrief>,
}

/// Lifecycle of an investment. Immutable once created; there is no
/// update handler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InvestmentStatus {
    Pending,
    Completed,
    Failed,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Investment {
    pub id: String,
    pub project_id: String,
    pub investor_id: String,
    pub amount: f64,
    pub status: InvestmentStatus,
    pub created_at: DateTime<Utc>,
}

impl Investment {
    pub fn new(project_id: String, investor_id: String, amount: f64) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            project_id,
            investor_id,
            amount,
            status: InvestmentStatus::Pending,
            created_at: Utc::now(),
        }
    }
}

/// Investment representation with investor and project references resolved
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvestmentView {
    #[serde(flatten)]
    pub investment: Investment,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub investor: Option<UserBrief>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project_title: Option<String>,
}

/// Verification status of an uploaded document. Transitions are
/// admin-only and one-shot: pending -> approved or pending -> rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentStatus {
    Pending,
    Approved,
    Rejected,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    pub id: String,
    pub owner_id: String,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub file_url: String,
    /// File kind, e.g. "pdf" or "png"
    pub kind: String,
    pub status: DocumentStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rejection_reason: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub verified_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub verified_by: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Document {
    pub fn new(owner_id: String, title: String, file_url: String, kind: String) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            owner_id,
            title,
            description: None,
            file_url,
            kind,
            status: DocumentStatus::Pending,
            rejection_reason: None,
            verified_at: None,
            verified_by: None,
            created_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn email_is_stored_lowercase() {
        let user = UserRecord::new(
            "Alice".to_string(),
            "Alice@Example.COM".to_string(),
            "hash".to_string(),
            Role::Individual,
        );
        assert_eq!(user.email, "alice@example.com");
    }

    #[test]
    fn public_projection_has_no_password_hash() {
        let user = UserRecord::new(
            "Bob".to_string(),
            "bob@example.com".to_string(),
            "secret-hash".to_string(),
            Role::Angel,
        );
        let json = serde_json::to_string(&user.public()).unwrap();
        assert!(!json.contains("secret-hash"));
        assert!(json.contains("\"role\":\"angel\""));
    }

    #[test]
    fn role_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Role::Admin).unwrap(), "\"admin\"");
        assert_eq!(
            serde_json::from_str::<Role>("\"institutional\"").unwrap(),
            Role::Institutional
        );
    }
}
