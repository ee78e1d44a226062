//! Message builder: turns a validated notification into a chat message
//!
//! ```text
//! <TYPE> on Host <HOST>
//!   **Service:** **<NAME>**
//!   **State:** <EMOJI> **<STATE>** <EMOJI>
//!   **Output:** <OUTPUT>
//! [Icinga] [Grafana]
//! ```

use std::str::FromStr;

use crate::dashboard::{dashboard_url, DashboardLinkTable};
use crate::params::NotificationEvent;
use crate::state::{state_color, TargetKind};
use crate::{RepublisherError, Result};

/// Longest plugin output shown before truncation, in characters
pub const MAX_OUTPUT_CHARS: usize = 95;

/// Appended to truncated plugin output
pub const TRUNCATION_MARKER: &str = "...";

/// Prefix Icinga2 apply rules add to generated service names
const APPLY_PREFIX: &str = "service_apply_";

const MARKDOWN_SPECIAL: [char; 8] = ['\\', '*', '_', '`', '~', '#', '[', ']'];

/// Notification types that have an emoji
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    Problem,
    Recovery,
    Custom,
    Warning,
}

impl FromStr for NotificationKind {
    type Err = RepublisherError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "problem" => Ok(NotificationKind::Problem),
            "recovery" => Ok(NotificationKind::Recovery),
            "custom" => Ok(NotificationKind::Custom),
            "warning" => Ok(NotificationKind::Warning),
            _ => Err(RepublisherError::Config(format!(
                "no emoji for notification type '{}' (choose from Problem, Recovery, Custom, Warning)",
                s
            ))),
        }
    }
}

/// Emoji per notification type
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmojiSet {
    pub problem: String,
    pub recovery: String,
    pub custom: String,
    pub warning: String,
}

impl Default for EmojiSet {
    fn default() -> Self {
        Self {
            problem: "\u{1F525}".to_string(),
            recovery: "\u{2705}".to_string(),
            custom: "\u{2755}".to_string(),
            warning: "\u{26A0}\u{FE0F}".to_string(),
        }
    }
}

impl EmojiSet {
    /// Replace the emoji of every type for which an override is given
    pub fn with_overrides(
        mut self,
        problem: Option<&str>,
        recovery: Option<&str>,
        custom: Option<&str>,
        warning: Option<&str>,
    ) -> Self {
        let slots = [
            (&mut self.problem, problem),
            (&mut self.recovery, recovery),
            (&mut self.custom, custom),
            (&mut self.warning, warning),
        ];
        for (slot, value) in slots {
            if let Some(value) = value {
                *slot = value.to_string();
            }
        }
        self
    }

    pub fn get(&self, kind: NotificationKind) -> &str {
        match kind {
            NotificationKind::Problem => &self.problem,
            NotificationKind::Recovery => &self.recovery,
            NotificationKind::Custom => &self.custom,
            NotificationKind::Warning => &self.warning,
        }
    }
}

/// The single body section of a message
///
/// `output` and `comment` hold the raw text; markdown is escaped on rendering.
#[derive(Debug, Clone, PartialEq)]
pub struct Section {
    pub label: String,
    pub name: String,
    pub state: String,
    pub emoji: String,
    pub output: String,
    pub comment: Option<String>,
}

impl Section {
    /// Markdown rendering, one fact per paragraph
    pub fn text(&self) -> String {
        let mut lines = vec![
            format!("**{}:** **{}**", self.label, self.name),
            format!("**State:** {} **{}** {}", self.emoji, self.state, self.emoji),
            format!("**Output:** {}", escape_markdown(&self.output)),
        ];
        if let Some(comment) = &self.comment {
            lines.push(format!("**Comment:** {}", escape_markdown(comment)));
        }
        lines.join("\n\n")
    }
}

/// A button opening a URL
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkButton {
    pub label: String,
    pub url: String,
}

/// A chat message ready for delivery
#[derive(Debug, Clone, PartialEq)]
pub struct ChatMessage {
    pub title: String,
    pub color: String,
    pub sections: Vec<Section>,
    pub links: Vec<LinkButton>,
}

/// Strip the apply-rule prefix and replace underscores, which Teams renders as emphasis
pub fn normalize_name(name: &str) -> String {
    name.strip_prefix(APPLY_PREFIX)
        .unwrap_or(name)
        .replace('_', "-")
}

/// Backslash-escape characters Teams would read as markdown
pub fn escape_markdown(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        if MARKDOWN_SPECIAL.contains(&c) {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

/// Cut plugin output to [`MAX_OUTPUT_CHARS`] characters plus [`TRUNCATION_MARKER`]
pub fn truncate_output(output: &str) -> String {
    match output.char_indices().nth(MAX_OUTPUT_CHARS) {
        Some((cut, _)) => format!("{}{}", &output[..cut], TRUNCATION_MARKER),
        None => output.to_string(),
    }
}

/// Build the chat message for one notification
///
/// A check command without a configured dashboard panel only drops the
/// Grafana button; every other problem is returned as an error.
pub fn build_message(
    event: &NotificationEvent,
    emoji: &EmojiSet,
    links: &DashboardLinkTable,
) -> Result<ChatMessage> {
    let kind: NotificationKind = event.notification_type.parse()?;
    let emoji = emoji.get(kind).to_string();

    let name = match &event.service {
        Some(service) => normalize_name(&service.name),
        None => normalize_name(&event.host.display_name),
    };

    let state = event.state_name().ok_or_else(|| {
        RepublisherError::Config(format!(
            "missing {}_state",
            event.target.label().to_ascii_lowercase()
        ))
    })?;
    let color = state_color(state)
        .ok_or_else(|| RepublisherError::Config(format!("no colour for state '{}'", state)))?;

    let comment = match (&event.author, &event.comment) {
        (Some(author), Some(comment)) => Some(format!("{} ({})", comment, author)),
        (None, Some(comment)) => Some(comment.clone()),
        _ => None,
    };

    let section = Section {
        label: event.target.label().to_string(),
        name,
        state: state.to_string(),
        emoji,
        output: truncate_output(event.output()),
        comment,
    };

    let mut buttons = Vec::new();
    if let Some(base) = &event.links.icinga_base_url {
        buttons.push(LinkButton {
            label: "Icinga".to_string(),
            url: icinga_url(base, event)?,
        });
    }
    if let Some(button) = grafana_button(event, links)? {
        buttons.push(button);
    }

    let message = ChatMessage {
        title: format!(
            "{} on Host {}",
            event.notification_type, event.host.display_name
        ),
        color: color.to_string(),
        sections: vec![section],
        links: buttons,
    };

    tracing::debug!(
        "Built message '{}' with {} link(s)",
        message.title,
        message.links.len()
    );
    Ok(message)
}

/// Live view of the addressed host or service in Icinga Web 2
fn icinga_url(base: &str, event: &NotificationEvent) -> Result<String> {
    let base = base.trim_end_matches('/');
    let (path, service) = match (event.target, &event.service) {
        (TargetKind::Service, Some(service)) => ("monitoring/service/show", Some(&service.name)),
        _ => ("monitoring/host/show", None),
    };

    let mut url = reqwest::Url::parse(&format!("{}/{}", base, path))
        .map_err(|e| RepublisherError::Config(format!("invalid Icinga URL '{}': {}", base, e)))?;
    {
        let mut query = url.query_pairs_mut();
        query.append_pair("host", &event.host.name);
        if let Some(service) = service {
            query.append_pair("service", service);
        }
    }
    Ok(url.to_string())
}

fn grafana_button(
    event: &NotificationEvent,
    links: &DashboardLinkTable,
) -> Result<Option<LinkButton>> {
    let (Some(base), Some(_)) = (
        &event.links.dashboard_base_url,
        &event.links.dashboard_config_path,
    ) else {
        return Ok(None);
    };

    let command = event.check_command().unwrap_or_default();
    let panel = match links.lookup(command) {
        Ok(panel) => panel,
        Err(e @ RepublisherError::LinkUnavailable(_)) => {
            tracing::warn!("{}; sending message without Grafana button", e);
            return Ok(None);
        }
        Err(e) => return Err(e),
    };

    // host targets have no service; their check command names the graph instead
    let service = match &event.service {
        Some(service) => service.name.as_str(),
        None => command,
    };

    let url = dashboard_url(
        base,
        panel,
        &event.host.name,
        service,
        event.links.dashboard_lookback_hours,
    )?;
    Ok(Some(LinkButton {
        label: "Grafana".to_string(),
        url,
    }))
}
