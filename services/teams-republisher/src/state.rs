//! Icinga2 state enumerations and the state colour table

use std::fmt;
use std::str::FromStr;

use crate::RepublisherError;

/// Whether a notification addresses a host or one of its services
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetKind {
    Host,
    Service,
}

impl TargetKind {
    /// Label shown in front of the target name in the message body
    pub fn label(&self) -> &'static str {
        match self {
            TargetKind::Host => "Host",
            TargetKind::Service => "Service",
        }
    }
}

impl FromStr for TargetKind {
    type Err = RepublisherError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "host" => Ok(TargetKind::Host),
            "service" => Ok(TargetKind::Service),
            other => Err(invalid_choice("notification_target", other, &["host", "service"])),
        }
    }
}

/// Service state as reported by `service.state`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServiceState {
    Ok,
    Warning,
    Critical,
    Unknown,
}

impl ServiceState {
    pub const ALL: [ServiceState; 4] = [
        ServiceState::Ok,
        ServiceState::Warning,
        ServiceState::Critical,
        ServiceState::Unknown,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ServiceState::Ok => "OK",
            ServiceState::Warning => "WARNING",
            ServiceState::Critical => "CRITICAL",
            ServiceState::Unknown => "UNKNOWN",
        }
    }
}

impl FromStr for ServiceState {
    type Err = RepublisherError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let upper = s.trim().to_ascii_uppercase();
        Self::ALL
            .into_iter()
            .find(|state| state.as_str() == upper)
            .ok_or_else(|| {
                invalid_choice("service state", s, &["OK", "WARNING", "CRITICAL", "UNKNOWN"])
            })
    }
}

/// Host state as reported by `host.state`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostState {
    Up,
    Down,
    Unreachable,
}

impl HostState {
    pub const ALL: [HostState; 3] = [HostState::Up, HostState::Down, HostState::Unreachable];

    pub fn as_str(&self) -> &'static str {
        match self {
            HostState::Up => "UP",
            HostState::Down => "DOWN",
            HostState::Unreachable => "UNREACHABLE",
        }
    }
}

impl FromStr for HostState {
    type Err = RepublisherError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let upper = s.trim().to_ascii_uppercase();
        Self::ALL
            .into_iter()
            .find(|state| state.as_str() == upper)
            .ok_or_else(|| invalid_choice("host state", s, &["UP", "DOWN", "UNREACHABLE"]))
    }
}

/// Soft states are still within the retry threshold, hard states are confirmed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StateType {
    Soft,
    Hard,
}

impl FromStr for StateType {
    type Err = RepublisherError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "SOFT" => Ok(StateType::Soft),
            "HARD" => Ok(StateType::Hard),
            _ => Err(invalid_choice("state type", s, &["SOFT", "HARD"])),
        }
    }
}

impl fmt::Display for ServiceState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for HostState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// UNREACHABLE shares UNKNOWN's colour.
const STATE_COLORS: &[(&str, &str)] = &[
    ("OK", "2DC72D"),
    ("WARNING", "FFA500"),
    ("CRITICAL", "E81123"),
    ("UNKNOWN", "8764B8"),
    ("UP", "2DC72D"),
    ("DOWN", "E81123"),
    ("UNREACHABLE", "8764B8"),
];

/// Look up the card colour for an upper-cased state name
pub fn state_color(state: &str) -> Option<&'static str> {
    STATE_COLORS
        .iter()
        .find(|(name, _)| *name == state)
        .map(|(_, color)| *color)
}

fn invalid_choice(what: &str, value: &str, choices: &[&str]) -> RepublisherError {
    RepublisherError::Config(format!(
        "invalid {} '{}' (choose from {})",
        what,
        value,
        choices.join(", ")
    ))
}
