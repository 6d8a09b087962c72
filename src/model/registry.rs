use crate::model::common::{CandidateTemplate, Origin, RiskLevel};

pub static BENIGN_TEMPLATES: &[CandidateTemplate] = &[
    CandidateTemplate {
        display_name: "python3 (flask_server)",
        port: 5000,
        risk_level: RiskLevel::Safe,
        description: "Local Python Flask web server",
    },
    CandidateTemplate {
        display_name: "node (react_scripts)",
        port: 3000,
        risk_level: RiskLevel::Safe,
        description: "Node.js development server",
    },
    CandidateTemplate {
        display_name: "postgres",
        port: 5432,
        risk_level: RiskLevel::Safe,
        description: "PostgreSQL Database",
    },
    CandidateTemplate {
        display_name: "docker-proxy",
        port: 8080,
        risk_level: RiskLevel::Safe,
        description: "Docker Container Proxy",
    },
    CandidateTemplate {
        display_name: "chrome-helper",
        port: 9222,
        risk_level: RiskLevel::Safe,
        description: "Google Chrome remote debugging",
    },
    CandidateTemplate {
        display_name: "spotify-connect",
        port: 57621,
        risk_level: RiskLevel::Safe,
        description: "Spotify Connect API",
    },
];

pub static SUSPICIOUS_TEMPLATES: &[CandidateTemplate] = &[
    CandidateTemplate {
        display_name: "unknown_miner.exe",
        port: 6666,
        risk_level: RiskLevel::Critical,
        description: "Suspected Crypto Miner",
    },
    CandidateTemplate {
        display_name: "data-exfil-daemon",
        port: 1337,
        risk_level: RiskLevel::Sus,
        description: "Unverified Data Transfer Tool",
    },
    CandidateTemplate {
        display_name: "keylog_service.py",
        port: 4444,
        risk_level: RiskLevel::Critical,
        description: "Potential Keylogger",
    },
    CandidateTemplate {
        display_name: "ads_injector_v2",
        port: 8899,
        risk_level: RiskLevel::Sus,
        description: "Adware Injection Service",
    },
];

/// Looks a template up by display name in both registries.
pub fn find_template(name: &str) -> Option<(Origin, &'static CandidateTemplate)> {
    BENIGN_TEMPLATES
        .iter()
        .map(|t| (Origin::Benign, t))
        .chain(SUSPICIOUS_TEMPLATES.iter().map(|t| (Origin::Suspicious, t)))
        .find(|(_, t)| t.display_name == name)
}
