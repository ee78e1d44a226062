//! Parameter model: Icinga2 notification macros validated into a typed event
//!
//! Icinga2 passes every runtime macro as a command-line flag. Unset macros
//! usually arrive as empty strings, so empty values are treated as absent.

use std::path::PathBuf;
use std::str::FromStr;

use clap::Args;

use crate::config::Settings;
use crate::message::EmojiSet;
use crate::state::{HostState, ServiceState, StateType, TargetKind};
use crate::{RepublisherError, Result};

const DEFAULT_LOOKBACK_HOURS: u32 = 1;

/// Raw notification flags, as handed over by the Icinga2 notification command
#[derive(Args, Debug, Clone, Default)]
pub struct RawParams {
    /// Incoming webhook URL
    #[arg(long = "webhook_url")]
    pub webhook_url: Option<String>,

    /// Notification target: host or service
    #[arg(long = "notification_target")]
    pub notification_target: Option<String>,

    /// Icinga2 notification.type
    #[arg(long = "notification_type")]
    pub notification_type: Option<String>,

    /// Icinga2 notification.author
    #[arg(long = "notification_author")]
    pub notification_author: Option<String>,

    /// Icinga2 notification.comment
    #[arg(long = "notification_comment")]
    pub notification_comment: Option<String>,

    /// Markup string for notification type Problem
    #[arg(long = "emoji_problem")]
    pub emoji_problem: Option<String>,

    /// Markup string for notification type Recovery
    #[arg(long = "emoji_recovery")]
    pub emoji_recovery: Option<String>,

    /// Markup string for notification type Custom
    #[arg(long = "emoji_custom")]
    pub emoji_custom: Option<String>,

    /// Markup string for notification type Warning
    #[arg(long = "emoji_warning")]
    pub emoji_warning: Option<String>,

    /// Icinga Web 2 base URL, enables the "Icinga" button
    #[arg(long = "icinga_base_url")]
    pub icinga_base_url: Option<String>,

    /// Grafana base URL, enables the "Grafana" button
    #[arg(long = "dashboard_base_url")]
    pub dashboard_base_url: Option<String>,

    /// File mapping check commands to Grafana dashboard panels
    #[arg(long = "dashboard_config_path")]
    pub dashboard_config_path: Option<PathBuf>,

    /// Time range of the Grafana link in hours
    #[arg(long = "dashboard_lookback_hours")]
    pub dashboard_lookback_hours: Option<String>,

    #[command(flatten)]
    pub host: RawHostParams,

    #[command(flatten)]
    pub service: RawServiceParams,
}

/// Icinga2 host runtime macros
#[derive(Args, Debug, Clone, Default)]
#[command(next_help_heading = "Icinga2 Host Parameters")]
pub struct RawHostParams {
    #[arg(id = "host_name", long = "host_name")]
    pub name: Option<String>,
    #[arg(id = "host_display_name", long = "host_display_name")]
    pub display_name: Option<String>,
    #[arg(id = "host_state", long = "host_state")]
    pub state: Option<String>,
    #[arg(id = "host_state_id", long = "host_state_id")]
    pub state_id: Option<String>,
    #[arg(id = "host_state_type", long = "host_state_type")]
    pub state_type: Option<String>,
    #[arg(id = "host_check_attempt", long = "host_check_attempt")]
    pub check_attempt: Option<String>,
    #[arg(id = "host_max_check_attempts", long = "host_max_check_attempts")]
    pub max_check_attempts: Option<String>,
    #[arg(id = "host_last_state", long = "host_last_state")]
    pub last_state: Option<String>,
    #[arg(id = "host_last_state_id", long = "host_last_state_id")]
    pub last_state_id: Option<String>,
    #[arg(id = "host_last_state_type", long = "host_last_state_type")]
    pub last_state_type: Option<String>,
    #[arg(id = "host_last_state_change", long = "host_last_state_change")]
    pub last_state_change: Option<String>,
    #[arg(id = "host_downtime_depth", long = "host_downtime_depth")]
    pub downtime_depth: Option<String>,
    #[arg(id = "host_duration_sec", long = "host_duration_sec")]
    pub duration_sec: Option<String>,
    #[arg(id = "host_latency", long = "host_latency")]
    pub latency: Option<String>,
    #[arg(id = "host_execution_time", long = "host_execution_time")]
    pub execution_time: Option<String>,
    #[arg(id = "host_output", long = "host_output")]
    pub output: Option<String>,
    #[arg(id = "host_perfdata", long = "host_perfdata")]
    pub perfdata: Option<String>,
    #[arg(id = "host_last_check", long = "host_last_check")]
    pub last_check: Option<String>,
    #[arg(id = "host_check_source", long = "host_check_source")]
    pub check_source: Option<String>,
    #[arg(id = "host_check_command", long = "host_check_command")]
    pub check_command: Option<String>,
    #[arg(id = "host_num_services", long = "host_num_services")]
    pub num_services: Option<String>,
    #[arg(id = "host_num_services_ok", long = "host_num_services_ok")]
    pub num_services_ok: Option<String>,
    #[arg(id = "host_num_services_warning", long = "host_num_services_warning")]
    pub num_services_warning: Option<String>,
    #[arg(id = "host_num_services_unknown", long = "host_num_services_unknown")]
    pub num_services_unknown: Option<String>,
    #[arg(id = "host_num_services_critical", long = "host_num_services_critical")]
    pub num_services_critical: Option<String>,
}

/// Icinga2 service runtime macros
#[derive(Args, Debug, Clone, Default)]
#[command(next_help_heading = "Icinga2 Service Parameters")]
pub struct RawServiceParams {
    #[arg(id = "service_name", long = "service_name")]
    pub name: Option<String>,
    #[arg(id = "service_display_name", long = "service_display_name")]
    pub display_name: Option<String>,
    #[arg(id = "service_state", long = "service_state")]
    pub state: Option<String>,
    #[arg(id = "service_state_id", long = "service_state_id")]
    pub state_id: Option<String>,
    #[arg(id = "service_state_type", long = "service_state_type")]
    pub state_type: Option<String>,
    #[arg(id = "service_check_attempt", long = "service_check_attempt")]
    pub check_attempt: Option<String>,
    #[arg(id = "service_max_check_attempts", long = "service_max_check_attempts")]
    pub max_check_attempts: Option<String>,
    #[arg(id = "service_last_state", long = "service_last_state")]
    pub last_state: Option<String>,
    #[arg(id = "service_last_state_id", long = "service_last_state_id")]
    pub last_state_id: Option<String>,
    #[arg(id = "service_last_state_type", long = "service_last_state_type")]
    pub last_state_type: Option<String>,
    #[arg(id = "service_last_state_change", long = "service_last_state_change")]
    pub last_state_change: Option<String>,
    #[arg(id = "service_downtime_depth", long = "service_downtime_depth")]
    pub downtime_depth: Option<String>,
    #[arg(id = "service_duration_sec", long = "service_duration_sec")]
    pub duration_sec: Option<String>,
    #[arg(id = "service_latency", long = "service_latency")]
    pub latency: Option<String>,
    #[arg(id = "service_execution_time", long = "service_execution_time")]
    pub execution_time: Option<String>,
    #[arg(id = "service_output", long = "service_output")]
    pub output: Option<String>,
    #[arg(id = "service_perfdata", long = "service_perfdata")]
    pub perfdata: Option<String>,
    #[arg(id = "service_last_check", long = "service_last_check")]
    pub last_check: Option<String>,
    #[arg(id = "service_check_source", long = "service_check_source")]
    pub check_source: Option<String>,
    #[arg(id = "service_check_command", long = "service_check_command")]
    pub check_command: Option<String>,
}

/// Host fields of a notification
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HostFields {
    pub name: String,
    pub display_name: String,
    pub state: Option<HostState>,
    pub state_id: Option<u32>,
    pub state_type: Option<StateType>,
    pub check_attempt: Option<u32>,
    pub max_check_attempts: Option<u32>,
    pub last_state: Option<HostState>,
    pub last_state_id: Option<u32>,
    pub last_state_type: Option<StateType>,
    pub last_state_change: Option<f64>,
    pub downtime_depth: Option<u32>,
    pub duration_sec: Option<f64>,
    pub latency: Option<f64>,
    pub execution_time: Option<f64>,
    pub output: String,
    pub perfdata: Option<String>,
    pub last_check: Option<f64>,
    pub check_source: Option<String>,
    pub check_command: Option<String>,
    pub num_services: Option<u32>,
    pub num_services_ok: Option<u32>,
    pub num_services_warning: Option<u32>,
    pub num_services_unknown: Option<u32>,
    pub num_services_critical: Option<u32>,
}

/// Service fields of a notification
#[derive(Debug, Clone, PartialEq)]
pub struct ServiceFields {
    pub name: String,
    pub display_name: String,
    pub state: ServiceState,
    pub state_id: Option<u32>,
    pub state_type: Option<StateType>,
    pub check_attempt: Option<u32>,
    pub max_check_attempts: Option<u32>,
    pub last_state: Option<ServiceState>,
    pub last_state_id: Option<u32>,
    pub last_state_type: Option<StateType>,
    pub last_state_change: Option<f64>,
    pub downtime_depth: Option<u32>,
    pub duration_sec: Option<f64>,
    pub latency: Option<f64>,
    pub execution_time: Option<f64>,
    pub output: String,
    pub perfdata: Option<String>,
    pub last_check: Option<f64>,
    pub check_source: Option<String>,
    pub check_command: Option<String>,
}

/// Optional links into Icinga Web 2 and Grafana
#[derive(Debug, Clone, PartialEq)]
pub struct LinkSettings {
    pub icinga_base_url: Option<String>,
    pub dashboard_base_url: Option<String>,
    pub dashboard_config_path: Option<PathBuf>,
    pub dashboard_lookback_hours: u32,
}

impl Default for LinkSettings {
    fn default() -> Self {
        Self {
            icinga_base_url: None,
            dashboard_base_url: None,
            dashboard_config_path: None,
            dashboard_lookback_hours: DEFAULT_LOOKBACK_HOURS,
        }
    }
}

/// One validated notification
#[derive(Debug, Clone, PartialEq)]
pub struct NotificationEvent {
    pub target: TargetKind,
    pub notification_type: String,
    pub author: Option<String>,
    pub comment: Option<String>,
    pub host: HostFields,
    /// Present exactly when `target` is [`TargetKind::Service`]
    pub service: Option<ServiceFields>,
    pub links: LinkSettings,
}

impl NotificationEvent {
    /// Upper-cased state of the addressed target, `None` for a host event without a state
    pub fn state_name(&self) -> Option<&'static str> {
        match &self.service {
            Some(service) => Some(service.state.as_str()),
            None => self.host.state.as_ref().map(HostState::as_str),
        }
    }

    /// Plugin output of the addressed target
    pub fn output(&self) -> &str {
        match &self.service {
            Some(service) => &service.output,
            None => &self.host.output,
        }
    }

    /// Check command of the addressed target
    pub fn check_command(&self) -> Option<&str> {
        match &self.service {
            Some(service) => service.check_command.as_deref(),
            None => self.host.check_command.as_deref(),
        }
    }
}

/// Everything needed for one run: where to send, what to send, how to decorate it
#[derive(Debug, Clone, PartialEq)]
pub struct Invocation {
    pub webhook_url: String,
    pub event: NotificationEvent,
    pub emoji: EmojiSet,
}

impl Invocation {
    /// Validate raw flags, falling back to `settings` for values not given on the command line
    pub fn from_raw(raw: &RawParams, settings: &Settings) -> Result<Self> {
        let webhook_url = present(&raw.webhook_url)
            .or(present(&settings.webhook_url))
            .ok_or_else(|| missing("webhook_url"))?;
        validate_url("webhook_url", webhook_url)?;

        let target: TargetKind = required("notification_target", &raw.notification_target)?.parse()?;
        let notification_type = required("notification_type", &raw.notification_type)?.to_string();

        let host = parse_host(&raw.host, target)?;
        let service = match target {
            TargetKind::Service => Some(parse_service(&raw.service)?),
            TargetKind::Host => None,
        };

        let icinga_base_url = present(&raw.icinga_base_url)
            .or(present(&settings.icinga_base_url))
            .map(|url| validate_url("icinga_base_url", url).map(|_| url.to_string()))
            .transpose()?;
        let dashboard_base_url = present(&raw.dashboard_base_url)
            .or(present(&settings.dashboard_base_url))
            .map(|url| validate_url("dashboard_base_url", url).map(|_| url.to_string()))
            .transpose()?;
        let dashboard_config_path = raw
            .dashboard_config_path
            .clone()
            .filter(|p| !p.as_os_str().is_empty())
            .or_else(|| settings.dashboard_config_path.clone());
        let dashboard_lookback_hours =
            number::<u32>("dashboard_lookback_hours", &raw.dashboard_lookback_hours)?
                .or(settings.dashboard_lookback_hours)
                .unwrap_or(DEFAULT_LOOKBACK_HOURS);

        let event = NotificationEvent {
            target,
            notification_type,
            author: owned(&raw.notification_author),
            comment: owned(&raw.notification_comment),
            host,
            service,
            links: LinkSettings {
                icinga_base_url,
                dashboard_base_url,
                dashboard_config_path,
                dashboard_lookback_hours,
            },
        };

        let emoji = EmojiSet::default().with_overrides(
            present(&raw.emoji_problem).or(present(&settings.emoji.problem)),
            present(&raw.emoji_recovery).or(present(&settings.emoji.recovery)),
            present(&raw.emoji_custom).or(present(&settings.emoji.custom)),
            present(&raw.emoji_warning).or(present(&settings.emoji.warning)),
        );

        tracing::debug!(
            "Validated {:?} notification '{}' for host '{}'",
            event.target,
            event.notification_type,
            event.host.name
        );

        Ok(Self {
            webhook_url: webhook_url.to_string(),
            event,
            emoji,
        })
    }
}

fn parse_host(raw: &RawHostParams, target: TargetKind) -> Result<HostFields> {
    let name = required("host_name", &raw.name)?.to_string();
    let display_name = match target {
        TargetKind::Host => required("host_display_name", &raw.display_name)?.to_string(),
        TargetKind::Service => owned(&raw.display_name).unwrap_or_else(|| name.clone()),
    };
    let state = match target {
        TargetKind::Host => Some(required("host_state", &raw.state)?.parse()?),
        TargetKind::Service => choice(&raw.state)?,
    };

    Ok(HostFields {
        name,
        display_name,
        state,
        state_id: number("host_state_id", &raw.state_id)?,
        state_type: choice(&raw.state_type)?,
        check_attempt: number("host_check_attempt", &raw.check_attempt)?,
        max_check_attempts: number("host_max_check_attempts", &raw.max_check_attempts)?,
        last_state: choice(&raw.last_state)?,
        last_state_id: number("host_last_state_id", &raw.last_state_id)?,
        last_state_type: choice(&raw.last_state_type)?,
        last_state_change: number("host_last_state_change", &raw.last_state_change)?,
        downtime_depth: number("host_downtime_depth", &raw.downtime_depth)?,
        duration_sec: number("host_duration_sec", &raw.duration_sec)?,
        latency: number("host_latency", &raw.latency)?,
        execution_time: number("host_execution_time", &raw.execution_time)?,
        output: owned(&raw.output).unwrap_or_default(),
        perfdata: owned(&raw.perfdata),
        last_check: number("host_last_check", &raw.last_check)?,
        check_source: owned(&raw.check_source),
        check_command: owned(&raw.check_command),
        num_services: number("host_num_services", &raw.num_services)?,
        num_services_ok: number("host_num_services_ok", &raw.num_services_ok)?,
        num_services_warning: number("host_num_services_warning", &raw.num_services_warning)?,
        num_services_unknown: number("host_num_services_unknown", &raw.num_services_unknown)?,
        num_services_critical: number("host_num_services_critical", &raw.num_services_critical)?,
    })
}

fn parse_service(raw: &RawServiceParams) -> Result<ServiceFields> {
    Ok(ServiceFields {
        name: required("service_name", &raw.name)?.to_string(),
        display_name: required("service_display_name", &raw.display_name)?.to_string(),
        state: required("service_state", &raw.state)?.parse()?,
        state_id: number("service_state_id", &raw.state_id)?,
        state_type: choice(&raw.state_type)?,
        check_attempt: number("service_check_attempt", &raw.check_attempt)?,
        max_check_attempts: number("service_max_check_attempts", &raw.max_check_attempts)?,
        last_state: choice(&raw.last_state)?,
        last_state_id: number("service_last_state_id", &raw.last_state_id)?,
        last_state_type: choice(&raw.last_state_type)?,
        last_state_change: number("service_last_state_change", &raw.last_state_change)?,
        downtime_depth: number("service_downtime_depth", &raw.downtime_depth)?,
        duration_sec: number("service_duration_sec", &raw.duration_sec)?,
        latency: number("service_latency", &raw.latency)?,
        execution_time: number("service_execution_time", &raw.execution_time)?,
        output: owned(&raw.output).unwrap_or_default(),
        perfdata: owned(&raw.perfdata),
        last_check: number("service_last_check", &raw.last_check)?,
        check_source: owned(&raw.check_source),
        check_command: owned(&raw.check_command),
    })
}

fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.trim().is_empty())
}

fn owned(value: &Option<String>) -> Option<String> {
    present(value).map(str::to_string)
}

fn missing(field: &str) -> RepublisherError {
    RepublisherError::Config(format!("missing required parameter --{}", field))
}

fn required<'a>(field: &str, value: &'a Option<String>) -> Result<&'a str> {
    present(value).ok_or_else(|| missing(field))
}

fn choice<T>(value: &Option<String>) -> Result<Option<T>>
where
    T: FromStr<Err = RepublisherError>,
{
    present(value).map(str::parse).transpose()
}

fn number<T>(field: &str, value: &Option<String>) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    present(value)
        .map(|v| {
            v.trim().parse::<T>().map_err(|e| {
                RepublisherError::Config(format!("invalid value '{}' for --{}: {}", v, field, e))
            })
        })
        .transpose()
}

fn validate_url(field: &str, value: &str) -> Result<()> {
    reqwest::Url::parse(value)
        .map(|_| ())
        .map_err(|e| RepublisherError::Config(format!("invalid URL '{}' for --{}: {}", value, field, e)))
}
