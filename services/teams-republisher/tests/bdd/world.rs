//! BDD test world for the Teams republisher

use std::sync::Arc;

use cucumber::World;
use teams_republisher::message::ChatMessage;
use teams_republisher::params::RawParams;
use tokio::sync::RwLock;

/// How the fake Teams webhook answers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WebhookBehaviour {
    Accept,
    Reject(u16),
    Unreachable,
}

#[derive(Debug, Default, World)]
pub struct RepublisherWorld {
    // Notification input
    pub raw: RawParams,
    pub link_dir: Option<tempfile::TempDir>,

    // Message building
    pub message_result: Option<teams_republisher::Result<ChatMessage>>,

    // Delivery
    pub webhook: Option<WebhookBehaviour>,
    pub posted: Arc<RwLock<Vec<serde_json::Value>>>,
    pub republish_result: Option<teams_republisher::Result<()>>,
}
