use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(
    Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default,
)]
#[serde(rename_all = "UPPERCASE")]
pub enum RiskLevel {
    Safe,
    Sus,
    Critical,
    #[default]
    Unknown,
}

impl RiskLevel {
    pub fn label(self) -> &'static str {
        match self {
            RiskLevel::Safe => "Safe",
            RiskLevel::Sus => "Suspicious",
            RiskLevel::Critical => "Critical",
            RiskLevel::Unknown => "Unknown",
        }
    }

    /// Upper-case wire token, as the advisor and exports spell it.
    pub fn token(self) -> &'static str {
        match self {
            RiskLevel::Safe => "SAFE",
            RiskLevel::Sus => "SUS",
            RiskLevel::Critical => "CRITICAL",
            RiskLevel::Unknown => "UNKNOWN",
        }
    }

    pub fn is_threat(self) -> bool {
        matches!(self, RiskLevel::Sus | RiskLevel::Critical)
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "UPPERCASE")]
pub enum ProcessStatus {
    Running,
    Stopped,
    Terminated,
    Killed,
}

impl ProcessStatus {
    pub fn is_running(self) -> bool {
        self == ProcessStatus::Running
    }
}

impl fmt::Display for ProcessStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ProcessStatus::Running => "RUNNING",
            ProcessStatus::Stopped => "STOPPED",
            ProcessStatus::Terminated => "TERMINATED",
            ProcessStatus::Killed => "KILLED",
        };
        f.write_str(s)
    }
}

/// A user action against a running record.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "UPPERCASE")]
pub enum ProcessAction {
    Kill,
    Stop,
    Terminate,
}

impl ProcessAction {
    pub fn resulting_status(self) -> ProcessStatus {
        match self {
            ProcessAction::Kill => ProcessStatus::Killed,
            ProcessAction::Stop => ProcessStatus::Stopped,
            ProcessAction::Terminate => ProcessStatus::Terminated,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "UPPERCASE")]
pub enum Protocol {
    Tcp,
    Udp,
}

impl fmt::Display for Protocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Protocol::Tcp => f.write_str("TCP"),
            Protocol::Udp => f.write_str("UDP"),
        }
    }
}

/// Static description of a process the generator may report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CandidateTemplate {
    pub display_name: &'static str,
    pub port: u16,
    pub risk_level: RiskLevel,
    pub description: &'static str,
}

/// Which registry a template belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Origin {
    Benign,
    Suspicious,
}

impl Origin {
    pub fn connected_apps(self) -> &'static [&'static str] {
        match self {
            Origin::Benign => &["Localhost", "System Kernel"],
            Origin::Suspicious => &["External IP (192.168.x.x)", "Unknown Server"],
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ProcessRecord {
    pub id: String,
    pub name: String,
    pub pid: u32,
    pub port: u16,
    pub protocol: Protocol,
    pub status: ProcessStatus,
    pub risk_level: RiskLevel,
    pub description: String,
    pub connected_apps: Vec<String>,
    pub timestamp: DateTime<Utc>,
}

impl ProcessRecord {
    pub fn ref_array(&self) -> Vec<String> {
        vec![
            self.name.clone(),
            self.pid.to_string(),
            self.port.to_string(),
            self.protocol.to_string(),
            self.risk_level.label().to_string(),
            self.status.to_string(),
            self.connected_apps.join(", "),
        ]
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    User,
    Model,
}

#[derive(Debug, Clone)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub text: String,
    pub timestamp: DateTime<Utc>,
}

impl ChatMessage {
    pub fn new(role: ChatRole, text: impl Into<String>) -> Self {
        Self {
            role,
            text: text.into(),
            timestamp: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn actions_map_to_terminal_statuses() {
        assert_eq!(ProcessAction::Kill.resulting_status(), ProcessStatus::Killed);
        assert_eq!(ProcessAction::Stop.resulting_status(), ProcessStatus::Stopped);
        assert_eq!(
            ProcessAction::Terminate.resulting_status(),
            ProcessStatus::Terminated
        );
        for action in [ProcessAction::Kill, ProcessAction::Stop, ProcessAction::Terminate] {
            assert!(!action.resulting_status().is_running());
        }
    }

    #[test]
    fn risk_level_serializes_as_upper_case_token() {
        let json = serde_json::to_string(&RiskLevel::Critical).unwrap();
        assert_eq!(json, "\"CRITICAL\"");
        let back: RiskLevel = serde_json::from_str("\"SUS\"").unwrap();
        assert_eq!(back, RiskLevel::Sus);
    }

    #[test]
    fn only_sus_and_critical_are_threats() {
        assert!(RiskLevel::Sus.is_threat());
        assert!(RiskLevel::Critical.is_threat());
        assert!(!RiskLevel::Safe.is_threat());
        assert!(!RiskLevel::Unknown.is_threat());
    }
}
