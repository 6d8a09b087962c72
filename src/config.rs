use crate::scan::{Probabilities, ScanConfig};

use color_eyre::eyre::WrapErr;
use serde::{Deserialize, Serialize};
use std::{
    env, fs, io,
    path::{Path, PathBuf},
    time::Duration,
};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AdvisorConfig {
    pub model: String,
    pub base_url: String,
    pub timeout_secs: u64,
    /// Only ever read from the environment.
    #[serde(skip)]
    pub api_key: Option<String>,
}

impl Default for AdvisorConfig {
    fn default() -> Self {
        Self {
            model: "gemini-2.5-flash".to_string(),
            base_url: "https://generativelanguage.googleapis.com".to_string(),
            timeout_secs: 30,
            api_key: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub scan_delay_ms: u64,
    pub probabilities: Probabilities,
    pub advisor: AdvisorConfig,
    pub log_file: PathBuf,
    pub snapshot_dir: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            scan_delay_ms: 1500,
            probabilities: Probabilities::default(),
            advisor: AdvisorConfig::default(),
            log_file: PathBuf::from("slimernet.log"),
            snapshot_dir: None,
        }
    }
}

impl AppConfig {
    /// Reads the JSON file named by `SLIMERNET_CONFIG` (default `slimernet.json`),
    /// then applies environment overrides. A missing file means defaults.
    pub fn load() -> color_eyre::Result<Self> {
        let path =
            env::var("SLIMERNET_CONFIG").unwrap_or_else(|_| "slimernet.json".to_string());
        let mut cfg = Self::from_file(Path::new(&path))?;
        cfg.apply_overrides(|key| env::var(key).ok());
        Ok(cfg)
    }

    fn from_file(path: &Path) -> color_eyre::Result<Self> {
        let raw = match fs::read_to_string(path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(e) => {
                return Err(e).wrap_err_with(|| format!("failed to read {}", path.display()));
            }
        };
        serde_json::from_str(&raw).wrap_err_with(|| format!("failed to parse {}", path.display()))
    }

    fn apply_overrides(&mut self, var: impl Fn(&str) -> Option<String>) {
        if let Some(v) = var("SLIMERNET_SAFE_PROBABILITY").and_then(|v| v.parse().ok()) {
            self.probabilities.safe = v;
        }
        if let Some(v) = var("SLIMERNET_SUS_PROBABILITY").and_then(|v| v.parse().ok()) {
            self.probabilities.suspicious = v;
        }
        if let Some(v) = var("SLIMERNET_SCAN_DELAY_MS").and_then(|v| v.parse().ok()) {
            self.scan_delay_ms = v;
        }
        if let Some(v) = var("SLIMERNET_MODEL") {
            self.advisor.model = v;
        }
        if let Some(v) = var("SLIMERNET_API_BASE_URL") {
            self.advisor.base_url = v;
        }
        if let Some(v) = var("SLIMERNET_API_TIMEOUT_SECS").and_then(|v| v.parse().ok()) {
            self.advisor.timeout_secs = v;
        }
        if let Some(v) = var("SLIMERNET_LOG_FILE") {
            self.log_file = PathBuf::from(v);
        }
        if let Some(v) = var("SLIMERNET_SNAPSHOT_DIR") {
            self.snapshot_dir = Some(PathBuf::from(v));
        }
        self.advisor.api_key = var("API_KEY").or_else(|| var("GEMINI_API_KEY"));
        self.probabilities = self.probabilities.clamped();
    }

    pub fn scan(&self) -> ScanConfig {
        ScanConfig {
            delay: Duration::from_millis(self.scan_delay_ms),
            probabilities: self.probabilities,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn overrides(pairs: &[(&str, &str)]) -> AppConfig {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        let mut cfg = AppConfig::default();
        cfg.apply_overrides(|k| vars.get(k).cloned());
        cfg
    }

    #[test]
    fn defaults_match_demo_values() {
        let cfg = AppConfig::default();
        let scan = cfg.scan();
        assert_eq!(scan.delay, Duration::from_millis(1500));
        assert_eq!(scan.probabilities.safe, 0.7);
        assert_eq!(scan.probabilities.suspicious, 0.4);
        assert_eq!(cfg.advisor.model, "gemini-2.5-flash");
    }

    #[test]
    fn env_overrides_are_applied_and_clamped() {
        let cfg = overrides(&[
            ("SLIMERNET_SAFE_PROBABILITY", "2.5"),
            ("SLIMERNET_SUS_PROBABILITY", "0.25"),
            ("SLIMERNET_SCAN_DELAY_MS", "0"),
            ("SLIMERNET_MODEL", "gemini-pro"),
            ("GEMINI_API_KEY", "secret"),
        ]);
        assert_eq!(cfg.probabilities.safe, 1.0);
        assert_eq!(cfg.probabilities.suspicious, 0.25);
        assert_eq!(cfg.scan_delay_ms, 0);
        assert_eq!(cfg.advisor.model, "gemini-pro");
        assert_eq!(cfg.advisor.api_key.as_deref(), Some("secret"));
    }

    #[test]
    fn unparsable_numbers_keep_previous_values() {
        let cfg = overrides(&[("SLIMERNET_SCAN_DELAY_MS", "soon")]);
        assert_eq!(cfg.scan_delay_ms, 1500);
    }

    #[test]
    fn missing_file_means_defaults_but_unreadable_path_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = AppConfig::from_file(&dir.path().join("absent.json")).unwrap();
        assert_eq!(cfg.scan_delay_ms, 1500);

        // a directory exists but cannot be read as a file
        assert!(AppConfig::from_file(dir.path()).is_err());

        let bad = dir.path().join("bad.json");
        fs::write(&bad, "{ not json").unwrap();
        assert!(AppConfig::from_file(&bad).is_err());
    }

    #[test]
    fn nan_probability_falls_back_to_default() {
        let cfg = overrides(&[
            ("SLIMERNET_SAFE_PROBABILITY", "NaN"),
            ("SLIMERNET_SUS_PROBABILITY", "nan"),
        ]);
        assert_eq!(cfg.probabilities, Probabilities::default());
    }

    #[test]
    fn partial_file_fills_in_defaults_and_never_writes_key() {
        let cfg: AppConfig =
            serde_json::from_str(r#"{"scan_delay_ms": 10, "advisor": {"timeout_secs": 5}}"#)
                .unwrap();
        assert_eq!(cfg.scan_delay_ms, 10);
        assert_eq!(cfg.advisor.timeout_secs, 5);
        assert_eq!(cfg.advisor.model, "gemini-2.5-flash");

        let mut cfg = cfg;
        cfg.advisor.api_key = Some("secret".into());
        let written = serde_json::to_string(&cfg).unwrap();
        assert!(!written.contains("secret"));
    }
}
