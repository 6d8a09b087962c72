use crate::export::{ExportFormat, export_to_file};
use crate::model::ProcessRecord;

use csv::Writer;
use std::{
    io::{Result, Write},
    path::{Path, PathBuf},
};

/// Writes the current scan to `snapshots/scan-<timestamp>.<ext>`.
pub fn export_snapshot(
    entries: &[ProcessRecord],
    format: ExportFormat,
    output_dir: Option<&Path>,
) -> Result<PathBuf> {
    export_to_file(entries, format, "scan", output_dir, Some(write_snapshot_csv))
}

fn write_snapshot_csv(file: &mut dyn Write, entries: &[ProcessRecord]) -> Result<()> {
    let mut wtr = Writer::from_writer(file);
    wtr.write_record([
        "Name",
        "PID",
        "Port",
        "Protocol",
        "Risk",
        "Status",
        "Description",
        "Connected Apps",
        "Timestamp",
    ])?;
    for p in entries {
        wtr.write_record([
            p.name.clone(),
            p.pid.to_string(),
            p.port.to_string(),
            p.protocol.to_string(),
            p.risk_level.to_string(),
            p.status.to_string(),
            p.description.clone(),
            p.connected_apps.join("; "),
            p.timestamp.to_rfc3339(),
        ])?;
    }
    wtr.flush()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{BENIGN_TEMPLATES, SUSPICIOUS_TEMPLATES};
    use crate::scan::{Probabilities, RngSource, sample_candidates};
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn records() -> Vec<ProcessRecord> {
        sample_candidates(
            BENIGN_TEMPLATES,
            SUSPICIOUS_TEMPLATES,
            Probabilities {
                safe: 1.0,
                suspicious: 1.0,
            },
            &mut RngSource(StdRng::seed_from_u64(5)),
        )
    }

    #[test]
    fn csv_snapshot_has_header_and_one_row_per_record() {
        let dir = tempfile::tempdir().unwrap();
        let path = export_snapshot(&records(), ExportFormat::Csv, Some(dir.path())).unwrap();

        assert!(path.starts_with(dir.path().join("snapshots")));
        assert_eq!(path.extension().unwrap(), "csv");

        let mut rdr = csv::Reader::from_path(&path).unwrap();
        assert_eq!(rdr.headers().unwrap().get(0), Some("Name"));
        let rows: Vec<_> = rdr.records().map(|r| r.unwrap()).collect();
        assert_eq!(rows.len(), 10);
        assert_eq!(rows[0].get(0), Some("unknown_miner.exe"));
        assert_eq!(rows[0].get(4), Some("CRITICAL"));
        assert_eq!(rows[0].get(5), Some("RUNNING"));
    }

    #[test]
    fn json_snapshot_reads_back_as_records() {
        let dir = tempfile::tempdir().unwrap();
        let original = records();
        let path = export_snapshot(&original, ExportFormat::Json, Some(dir.path())).unwrap();

        let raw = std::fs::read_to_string(path).unwrap();
        let parsed: Vec<ProcessRecord> = serde_json::from_str(&raw).unwrap();
        assert_eq!(parsed, original);
        assert!(raw.contains("\"riskLevel\": \"CRITICAL\""));
    }
}
