//! Teams republisher - Icinga2 notifications as Microsoft Teams messages
//!
//! Invoked once per notification: validates the Icinga2 macros, builds a
//! message and posts it to a Teams incoming webhook.

pub mod config;
pub mod dashboard;
pub mod error;
pub mod io;
pub mod message;
pub mod notifier;
pub mod params;
pub mod state;
pub mod teams;

pub use config::{load_config, Settings};
pub use error::{RepublisherError, Result};

use std::sync::Arc;

use crate::dashboard::DashboardLinkTable;
use crate::io::HttpClient;
use crate::message::build_message;
use crate::notifier::Notifier;
use crate::params::{Invocation, RawParams};
use crate::teams::TeamsNotifier;

/// Validate, build and deliver one notification
pub async fn run(raw: &RawParams, settings: &Settings, http: Arc<dyn HttpClient>) -> Result<()> {
    let invocation = Invocation::from_raw(raw, settings)?;
    tracing::debug!("Notification: {:?}", invocation.event);

    let links = DashboardLinkTable::load(invocation.event.links.dashboard_config_path.as_deref())?;
    let message = build_message(&invocation.event, &invocation.emoji, &links)?;

    let notifier = TeamsNotifier::new(invocation.webhook_url, http);
    notifier.notify(&message).await?;

    tracing::info!("Delivered '{}' via {}", message.title, notifier.type_name());
    Ok(())
}
