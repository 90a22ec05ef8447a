//! Shared application context threaded through the request filters

use std::sync::Arc;

use crate::auth::password::hash_password;
use crate::auth::token::TokenIssuer;
use crate::constants::EVENT_CHANNEL_CAPACITY;
use crate::error::Result;
use crate::events::EventBus;
use crate::models::{Role, UserRecord};
use crate::storage::memory::MemoryStorage;
use crate::storage::traits::{DocumentStore, InvestmentStore, ProjectStore, UserStore};

/// Everything a handler needs: the per-entity stores, the token issuer
/// and the outbound event bus. Cheap to clone; all members are shared.
#[derive(Clone)]
pub struct AppContext {
    pub users: Arc<dyn UserStore>,
    pub projects: Arc<dyn ProjectStore>,
    pub investments: Arc<dyn InvestmentStore>,
    pub documents: Arc<dyn DocumentStore>,
    pub tokens: Arc<TokenIssuer>,
    pub events: EventBus,
}

impl AppContext {
    /// Build a context backed by a single in-memory store
    pub fn in_memory(jwt_secret: &str) -> Self {
        let storage = Arc::new(MemoryStorage::new());
        Self {
            users: storage.clone(),
            projects: storage.clone(),
            investments: storage.clone(),
            documents: storage,
            tokens: Arc::new(TokenIssuer::new(jwt_secret)),
            events: EventBus::new(EVENT_CHANNEL_CAPACITY),
        }
    }

    /// Provision the administrator account. This is the only path that
    /// creates an identity with the admin role; registration and profile
    /// updates reject it. Idempotent: an existing account is left alone.
    pub async fn ensure_admin(&self, email: &str, password: &str) -> Result<()> {
        if let Some(existing) = self.users.get_user_by_email(email).await? {
            if existing.role != Role::Admin {
                log::warn!(
                    "Account {} exists with role {:?}; not promoting to admin",
                    email,
                    existing.role
                );
            }
            return Ok(());
        }

        let password_hash = hash_password(password)?;
        let admin = UserRecord::new(
            "Admin".to_string(),
            email.to_string(),
            password_hash,
            Role::Admin,
        );
        let admin_id = admin.id.clone();
        self.users.create_user(admin).await?;
        log::info!("Provisioned admin account {} ({})", admin_id, email);
        Ok(())
    }
}
