//! Microsoft Teams incoming-webhook delivery
//!
//! Messages are sent as legacy Office 365 connector cards (`MessageCard`).

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{json, Value};

use crate::io::HttpClient;
use crate::message::ChatMessage;
use crate::notifier::Notifier;

/// Render a message as a connector card
pub fn connector_card(message: &ChatMessage) -> Value {
    let sections: Vec<Value> = message
        .sections
        .iter()
        .map(|section| json!({ "text": section.text() }))
        .collect();

    let mut card = json!({
        "@type": "MessageCard",
        "@context": "https://schema.org/extensions",
        "summary": message.title,
        "title": message.title,
        "themeColor": message.color,
        "sections": sections,
    });

    if !message.links.is_empty() {
        card["potentialAction"] = message
            .links
            .iter()
            .map(|link| {
                json!({
                    "@type": "OpenUri",
                    "name": link.label,
                    "targets": [{ "os": "default", "uri": link.url }],
                })
            })
            .collect();
    }

    card
}

/// Teams incoming-webhook sender
pub struct TeamsNotifier {
    webhook_url: String,
    http: Arc<dyn HttpClient>,
}

impl std::fmt::Debug for TeamsNotifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // the webhook URL embeds its credentials
        f.debug_struct("TeamsNotifier").finish_non_exhaustive()
    }
}

impl TeamsNotifier {
    pub fn new(webhook_url: impl Into<String>, http: Arc<dyn HttpClient>) -> Self {
        Self {
            webhook_url: webhook_url.into(),
            http,
        }
    }
}

#[async_trait]
impl Notifier for TeamsNotifier {
    fn type_name(&self) -> &str {
        "teams"
    }

    async fn notify(&self, message: &ChatMessage) -> crate::Result<()> {
        let card = connector_card(message);

        tracing::info!(
            "Sending Teams message: title='{}', color={}",
            message.title,
            message.color
        );

        let response = self.http.post_json(&self.webhook_url, &card).await?;

        if !response.is_success() {
            return Err(crate::RepublisherError::Delivery(format!(
                "Teams webhook returned status {}: {}",
                response.status, response.body
            )));
        }

        tracing::debug!("Teams message delivered");
        Ok(())
    }
}
