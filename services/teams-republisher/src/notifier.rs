//! Notifier trait for delivering chat messages

use async_trait::async_trait;

use crate::message::ChatMessage;

/// Trait for delivering a built message to a chat destination
#[async_trait]
pub trait Notifier: Send + Sync + std::fmt::Debug {
    /// Get the notifier type name (e.g. "teams")
    fn type_name(&self) -> &str;

    /// Deliver the message, once
    async fn notify(&self, message: &ChatMessage) -> crate::Result<()>;
}
