pub mod random;

pub use random::{RandomSource, RngSource};

use crate::model::{
    BENIGN_TEMPLATES, CandidateTemplate, Origin, ProcessRecord, ProcessStatus, Protocol,
    RiskLevel, SUSPICIOUS_TEMPLATES,
};

use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, info};

/// Inclusion probability per registry.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Probabilities {
    pub safe: f64,
    pub suspicious: f64,
}

impl Default for Probabilities {
    fn default() -> Self {
        Self {
            safe: 0.7,
            suspicious: 0.4,
        }
    }
}

impl Probabilities {
    /// Clamps both values to [0, 1]; NaN becomes the default.
    pub fn clamped(self) -> Self {
        let defaults = Self::default();
        let clamp = |p: f64, default: f64| if p.is_nan() { default } else { p.clamp(0.0, 1.0) };
        Self {
            safe: clamp(self.safe, defaults.safe),
            suspicious: clamp(self.suspicious, defaults.suspicious),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScanConfig {
    /// Simulated scan time. Has no effect on the result.
    pub delay: Duration,
    pub probabilities: Probabilities,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            delay: Duration::from_millis(1500),
            probabilities: Probabilities::default(),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ScanError {
    #[error("scan task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

/// Runs one scan as its own task so a failure there never reaches the caller's state.
pub async fn run_scan(config: ScanConfig) -> Result<Vec<ProcessRecord>, ScanError> {
    let records = tokio::spawn(async move { generate_scan(&config).await }).await?;
    Ok(records)
}

/// Waits out the simulated scan time, then samples both registries.
pub async fn generate_scan(config: &ScanConfig) -> Vec<ProcessRecord> {
    info!(delay_ms = config.delay.as_millis() as u64, "scan started");
    tokio::time::sleep(config.delay).await;

    let records = sample_candidates(
        BENIGN_TEMPLATES,
        SUSPICIOUS_TEMPLATES,
        config.probabilities,
        &mut RngSource::thread(),
    );

    info!(
        found = records.len(),
        threats = records.iter().filter(|r| r.risk_level != RiskLevel::Safe).count(),
        "scan finished"
    );
    records
}

/// Independently includes each template with its registry's probability and
/// returns the records with every non-SAFE entry ahead of the SAFE ones.
pub fn sample_candidates(
    benign: &[CandidateTemplate],
    suspicious: &[CandidateTemplate],
    probabilities: Probabilities,
    rng: &mut impl RandomSource,
) -> Vec<ProcessRecord> {
    let mut records = Vec::new();

    for (origin, templates, p) in [
        (Origin::Benign, benign, probabilities.safe),
        (Origin::Suspicious, suspicious, probabilities.suspicious),
    ] {
        for template in templates {
            let draw = rng.draw();
            if draw < p {
                records.push(materialize(template, origin, rng.pid()));
            } else {
                debug!(name = template.display_name, draw, "candidate skipped");
            }
        }
    }

    partition_threats_first(records)
}

fn materialize(template: &CandidateTemplate, origin: Origin, pid: u32) -> ProcessRecord {
    ProcessRecord {
        id: uuid::Uuid::new_v4().to_string(),
        name: template.display_name.to_string(),
        pid,
        port: template.port,
        protocol: Protocol::Tcp,
        status: ProcessStatus::Running,
        risk_level: template.risk_level,
        description: template.description.to_string(),
        connected_apps: origin
            .connected_apps()
            .iter()
            .map(|s| s.to_string())
            .collect(),
        timestamp: Utc::now(),
    }
}

fn partition_threats_first(records: Vec<ProcessRecord>) -> Vec<ProcessRecord> {
    let (mut flagged, safe): (Vec<_>, Vec<_>) = records
        .into_iter()
        .partition(|r| r.risk_level != RiskLevel::Safe);
    flagged.extend(safe);
    flagged
}
