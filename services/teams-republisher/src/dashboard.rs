//! Grafana dashboard links keyed by Icinga2 check command
//!
//! The link file is a sequence of blank-line separated blocks:
//!
//! ```text
//! [disk]
//! dashboard = "toru-overview"
//! panelId = "12"
//! ```

use std::collections::HashMap;
use std::io::ErrorKind;
use std::path::Path;

use crate::{RepublisherError, Result};

/// Coordinates of a Grafana panel
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DashboardPanel {
    pub dashboard: String,
    pub panel_id: String,
}

/// One parsed block of the link file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DashboardLink {
    pub check_command: String,
    pub panel: DashboardPanel,
}

/// Parse link file content, skipping malformed blocks
pub fn parse_dashboard_links(content: &str) -> Vec<DashboardLink> {
    let mut links = Vec::new();
    let mut block: Vec<&str> = Vec::new();

    for line in content.lines().chain(std::iter::once("")) {
        let line = line.trim();
        if !line.is_empty() {
            block.push(line);
            continue;
        }
        if block.is_empty() {
            continue;
        }
        match parse_block(&block) {
            Some(link) => links.push(link),
            None => tracing::debug!("Skipping malformed dashboard link block: {:?}", block),
        }
        block.clear();
    }

    links
}

fn parse_block(lines: &[&str]) -> Option<DashboardLink> {
    let [header, dashboard, panel_id] = lines else {
        return None;
    };

    let check_command = header.strip_prefix('[')?.strip_suffix(']')?.trim();
    if check_command.is_empty() {
        return None;
    }

    Some(DashboardLink {
        check_command: check_command.to_string(),
        panel: DashboardPanel {
            dashboard: quoted_value(dashboard, "dashboard")?,
            panel_id: quoted_value(panel_id, "panelId")?,
        },
    })
}

/// Value of a `key = "value"` line, if the key matches
fn quoted_value(line: &str, expected_key: &str) -> Option<String> {
    let (key, value) = line.split_once('=')?;
    if key.trim() != expected_key {
        return None;
    }
    let value = value.trim();
    let value = value
        .strip_prefix('"')
        .and_then(|v| v.strip_suffix('"'))
        .unwrap_or(value);
    if value.is_empty() {
        return None;
    }
    Some(value.to_string())
}

/// Check command to dashboard panel mapping
#[derive(Debug, Clone, Default)]
pub struct DashboardLinkTable {
    panels: HashMap<String, DashboardPanel>,
}

impl DashboardLinkTable {
    pub fn from_links(links: Vec<DashboardLink>) -> Self {
        let mut panels = HashMap::with_capacity(links.len());
        for link in links {
            if panels
                .insert(link.check_command.clone(), link.panel)
                .is_some()
            {
                tracing::debug!(
                    "Duplicate dashboard link for '{}', keeping the last one",
                    link.check_command
                );
            }
        }
        Self { panels }
    }

    /// Load the link file; no path or a missing file gives an empty table
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };

        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                tracing::info!("Dashboard link file {:?} not found, no Grafana links", path);
                return Ok(Self::default());
            }
            Err(e) => return Err(e.into()),
        };

        let table = Self::from_links(parse_dashboard_links(&content));
        tracing::debug!(
            "Loaded {} dashboard link(s) from {:?}",
            table.len(),
            path
        );
        Ok(table)
    }

    pub fn len(&self) -> usize {
        self.panels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.panels.is_empty()
    }

    /// Panel for a check command, or [`RepublisherError::LinkUnavailable`]
    pub fn lookup(&self, check_command: &str) -> Result<&DashboardPanel> {
        self.panels.get(check_command).ok_or_else(|| {
            RepublisherError::LinkUnavailable(format!(
                "no dashboard panel configured for check command '{}'",
                check_command
            ))
        })
    }
}

/// Deep link to a single Grafana panel for a host/service pair
pub fn dashboard_url(
    base: &str,
    panel: &DashboardPanel,
    host: &str,
    service: &str,
    lookback_hours: u32,
) -> Result<String> {
    let mut url = reqwest::Url::parse(base)
        .map_err(|e| RepublisherError::Config(format!("invalid dashboard URL '{}': {}", base, e)))?;
    url.path_segments_mut()
        .map_err(|_| RepublisherError::Config(format!("invalid dashboard URL '{}'", base)))?
        .pop_if_empty()
        .extend(["dashboard", "db", panel.dashboard.as_str()]);

    url.query_pairs_mut()
        .append_pair("var-hostname", host)
        .append_pair("var-service", service)
        .append_pair("from", &format!("now-{}h", lookback_hours))
        .append_pair("to", "now")
        .append_pair("panelId", &panel.panel_id)
        .append_key_only("fullscreen");

    Ok(url.to_string())
}
