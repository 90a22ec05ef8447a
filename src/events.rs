//! Outbound change-event bus
//!
//! Handlers publish coarse-grained change events here after a successful
//! mutation; connected WebSocket clients receive them for live UI
//! updates. Delivery is fire-and-forget and purely observational: a
//! publish with no subscribers, or a dropped subscriber, never affects
//! the primary response.

use serde::Serialize;
use tokio::sync::broadcast;

use crate::models::{AccountStatus, Document, Investment, Project, PublicUser};

/// Coarse-grained change events broadcast to connected clients
#[derive(Debug, Clone, Serialize)]
#[serde(
    tag = "event",
    content = "data",
    rename_all = "camelCase",
    rename_all_fields = "camelCase"
)]
pub enum ChangeEvent {
    UserCreated {
        user: PublicUser,
    },
    UserUpdated {
        user_id: String,
        status: AccountStatus,
        #[serde(skip_serializing_if = "Option::is_none")]
        reason: Option<String>,
    },
    ProjectCreated {
        project: Project,
    },
    ProjectUpdated {
        project: Project,
    },
    ProjectDeleted {
        project_id: String,
    },
    InvestmentCreated {
        investment: Investment,
    },
    DocumentUpdated {
        document: Document,
    },
}

/// Broadcast channel the handlers publish to and the WebSocket endpoint
/// subscribes from
#[derive(Debug, Clone)]
pub struct EventBus {
    tx: broadcast::Sender<ChangeEvent>,
}

impl EventBus {
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self { tx }
    }

    /// Best-effort publish. Absence of subscribers is normal and silent.
    pub fn publish(&self, event: ChangeEvent) {
        if let Err(e) = self.tx.send(event) {
            log::debug!("No subscribers for change event: {}", e);
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<ChangeEvent> {
        self.tx.subscribe()
    }

    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }
}
