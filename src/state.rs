use crate::model::{ProcessAction, ProcessRecord, RiskLevel};

use chrono::{DateTime, Local};
use serde::Serialize;

/// Which records the table shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Filter {
    #[default]
    All,
    Threats,
    Running,
}

impl Filter {
    pub fn label(self) -> &'static str {
        match self {
            Filter::All => "All Processes",
            Filter::Threats => "Sus/Critical Only",
            Filter::Running => "Running Only",
        }
    }

    pub fn next(self) -> Self {
        match self {
            Filter::All => Filter::Threats,
            Filter::Threats => Filter::Running,
            Filter::Running => Filter::All,
        }
    }

    pub fn matches(self, record: &ProcessRecord) -> bool {
        match self {
            Filter::All => true,
            Filter::Threats => record.risk_level.is_threat(),
            Filter::Running => record.status.is_running(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RiskStats {
    pub safe: usize,
    pub sus: usize,
    pub critical: usize,
}

#[derive(Debug)]
pub enum StateEvent {
    ScanStarted,
    ScanCompleted {
        records: Vec<ProcessRecord>,
        at: DateTime<Local>,
    },
    ScanFailed(String),
    Action {
        id: String,
        action: ProcessAction,
    },
    FilterChanged(Filter),
}

#[derive(Debug, Default)]
pub struct DashboardState {
    pub processes: Vec<ProcessRecord>,
    pub filter: Filter,
    pub is_scanning: bool,
    pub last_scan_at: Option<DateTime<Local>>,
    pub last_error: Option<String>,
}

impl DashboardState {
    pub fn reduce(mut self, event: StateEvent) -> Self {
        match event {
            StateEvent::ScanStarted => {
                self.is_scanning = true;
            }
            StateEvent::ScanCompleted { records, at } => {
                self.processes = records;
                self.last_scan_at = Some(at);
                self.is_scanning = false;
                self.last_error = None;
            }
            StateEvent::ScanFailed(message) => {
                self.is_scanning = false;
                self.last_error = Some(message);
            }
            StateEvent::Action { id, action } => {
                self.processes = apply_action(self.processes, &id, action);
            }
            StateEvent::FilterChanged(filter) => {
                self.filter = filter;
            }
        }
        self
    }

    pub fn visible(&self) -> Vec<ProcessRecord> {
        self.processes
            .iter()
            .filter(|p| self.filter.matches(p))
            .cloned()
            .collect()
    }

    pub fn stats(&self) -> RiskStats {
        self.processes
            .iter()
            .fold(RiskStats::default(), |mut acc, p| {
                match p.risk_level {
                    RiskLevel::Safe => acc.safe += 1,
                    RiskLevel::Sus => acc.sus += 1,
                    RiskLevel::Critical => acc.critical += 1,
                    RiskLevel::Unknown => {}
                }
                acc
            })
    }

    pub fn chart_data(&self) -> [(&'static str, u64); 3] {
        let stats = self.stats();
        [
            (RiskLevel::Safe.label(), stats.safe as u64),
            (RiskLevel::Sus.label(), stats.sus as u64),
            (RiskLevel::Critical.label(), stats.critical as u64),
        ]
    }

    /// Critical banner is hidden while a scan is in flight.
    pub fn show_critical_banner(&self) -> bool {
        !self.is_scanning && self.stats().critical > 0
    }

    /// JSON list of `{name, port, risk}` handed to the advisor as context.
    pub fn context_snapshot(&self) -> String {
        #[derive(Serialize)]
        struct Entry<'a> {
            name: &'a str,
            port: u16,
            risk: RiskLevel,
        }

        let entries: Vec<Entry<'_>> = self
            .processes
            .iter()
            .map(|p| Entry {
                name: &p.name,
                port: p.port,
                risk: p.risk_level,
            })
            .collect();
        serde_json::to_string(&entries).unwrap_or_else(|_| "[]".to_string())
    }
}

/// Rewrites the status of the record with `id`; any other id leaves the collection as is.
pub fn apply_action(
    mut processes: Vec<ProcessRecord>,
    id: &str,
    action: ProcessAction,
) -> Vec<ProcessRecord> {
    if let Some(p) = processes.iter_mut().find(|p| p.id == id) {
        p.status = action.resulting_status();
    }
    processes
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{BENIGN_TEMPLATES, ProcessStatus, SUSPICIOUS_TEMPLATES};
    use crate::scan::{Probabilities, RngSource, sample_candidates};
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn full_scan() -> Vec<ProcessRecord> {
        sample_candidates(
            BENIGN_TEMPLATES,
            SUSPICIOUS_TEMPLATES,
            Probabilities {
                safe: 1.0,
                suspicious: 1.0,
            },
            &mut RngSource(StdRng::seed_from_u64(9)),
        )
    }

    fn loaded() -> DashboardState {
        DashboardState::default().reduce(StateEvent::ScanCompleted {
            records: full_scan(),
            at: Local::now(),
        })
    }

    #[test]
    fn kill_changes_only_the_target_record() {
        let before = full_scan();
        let target = before[3].id.clone();

        let after = apply_action(before.clone(), &target, ProcessAction::Kill);

        assert_eq!(after.len(), before.len());
        for (b, a) in before.iter().zip(&after) {
            if b.id == target {
                assert_eq!(a.status, ProcessStatus::Killed);
                let mut restored = a.clone();
                restored.status = b.status;
                assert_eq!(&restored, b);
            } else {
                assert_eq!(a, b);
            }
        }
    }

    #[test]
    fn unknown_id_is_a_no_op() {
        let before = full_scan();
        let after = apply_action(before.clone(), "no-such-id", ProcessAction::Stop);
        assert_eq!(after, before);
    }

    #[test]
    fn failed_scan_keeps_previous_collection() {
        let state = loaded();
        let previous = state.processes.clone();
        let scanned_at = state.last_scan_at;

        let state = state
            .reduce(StateEvent::ScanStarted)
            .reduce(StateEvent::ScanFailed("boom".into()));

        assert_eq!(state.processes, previous);
        assert_eq!(state.last_scan_at, scanned_at);
        assert!(!state.is_scanning);
        assert_eq!(state.last_error.as_deref(), Some("boom"));
    }

    #[test]
    fn completed_scan_replaces_collection_wholesale() {
        let state = loaded().reduce(StateEvent::ScanStarted);
        assert!(state.is_scanning);
        // scanning alone leaves the old records visible
        assert_eq!(state.processes.len(), 10);

        let state = state.reduce(StateEvent::ScanCompleted {
            records: Vec::new(),
            at: Local::now(),
        });
        assert!(state.processes.is_empty());
        assert!(!state.is_scanning);
        assert!(state.last_scan_at.is_some());
    }

    #[test]
    fn filters_select_by_risk_and_status() {
        let mut state = loaded();
        let miner = state
            .processes
            .iter()
            .find(|p| p.name == "unknown_miner.exe")
            .map(|p| p.id.clone())
            .unwrap();
        state = state.reduce(StateEvent::Action {
            id: miner.clone(),
            action: ProcessAction::Terminate,
        });

        state = state.reduce(StateEvent::FilterChanged(Filter::Threats));
        let visible = state.visible();
        assert_eq!(visible.len(), 4);
        assert!(visible.iter().all(|p| p.risk_level.is_threat()));

        state = state.reduce(StateEvent::FilterChanged(Filter::Running));
        let visible = state.visible();
        assert_eq!(visible.len(), 9);
        assert!(visible.iter().all(|p| p.id != miner));

        state = state.reduce(StateEvent::FilterChanged(Filter::All));
        assert_eq!(state.visible().len(), 10);
    }

    #[test]
    fn stats_and_chart_count_by_risk() {
        let state = loaded();
        assert_eq!(
            state.stats(),
            RiskStats {
                safe: 6,
                sus: 2,
                critical: 2
            }
        );
        assert_eq!(
            state.chart_data(),
            [("Safe", 6), ("Suspicious", 2), ("Critical", 2)]
        );
        assert!(state.show_critical_banner());
        assert!(!state.reduce(StateEvent::ScanStarted).show_critical_banner());
    }

    #[test]
    fn context_snapshot_lists_every_record() {
        let state = loaded().reduce(StateEvent::FilterChanged(Filter::Threats));
        let parsed: Vec<serde_json::Value> =
            serde_json::from_str(&state.context_snapshot()).unwrap();
        assert_eq!(parsed.len(), 10);
        let miner = parsed
            .iter()
            .find(|v| v["name"] == "unknown_miner.exe")
            .unwrap();
        assert_eq!(miner["port"], 6666);
        assert_eq!(miner["risk"], "CRITICAL");

        assert_eq!(DashboardState::default().context_snapshot(), "[]");
    }
}
