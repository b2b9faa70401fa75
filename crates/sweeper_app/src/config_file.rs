use std::collections::BTreeSet;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use sweep_logging::sweep_info;
use sweeper_core::SweepConfig;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed config: {0}")]
    Parse(String),
}

/// On-disk mirror of [`SweepConfig`], in RON. Every field is optional and
/// falls back to the core default, so a config file only names what it
/// changes.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
struct ConfigFile {
    min_duration_ms: u64,
    blocked_sources: Vec<String>,
    scan_interval_ms: u64,
    action_delay_ms: u64,
    confirm_wait_ms: u64,
    max_idle_scans: u32,
    backoff_multiplier: f64,
    ledger_capacity: usize,
    trim_interval_ms: u64,
}

impl Default for ConfigFile {
    fn default() -> Self {
        let base = SweepConfig::default();
        Self {
            min_duration_ms: base.min_duration_ms,
            blocked_sources: Vec::new(),
            scan_interval_ms: base.scan_interval_ms,
            action_delay_ms: base.action_delay_ms,
            confirm_wait_ms: base.confirm_wait_ms,
            max_idle_scans: base.max_idle_scans,
            backoff_multiplier: base.backoff_multiplier,
            ledger_capacity: base.ledger_capacity,
            trim_interval_ms: base.trim_interval_ms,
        }
    }
}

impl ConfigFile {
    fn into_config(self) -> SweepConfig {
        SweepConfig {
            min_duration_ms: self.min_duration_ms,
            blocked_sources: self.blocked_sources.into_iter().collect::<BTreeSet<_>>(),
            scan_interval_ms: self.scan_interval_ms,
            action_delay_ms: self.action_delay_ms,
            confirm_wait_ms: self.confirm_wait_ms,
            max_idle_scans: self.max_idle_scans,
            backoff_multiplier: self.backoff_multiplier,
            ledger_capacity: self.ledger_capacity,
            trim_interval_ms: self.trim_interval_ms,
        }
    }
}

pub fn load_config(path: &Path) -> Result<SweepConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    let file: ConfigFile =
        ron::from_str(&content).map_err(|err| ConfigError::Parse(err.to_string()))?;
    let config = file.into_config();
    sweep_info!(
        "loaded config from {:?}: min duration {}ms, {} blocked sources",
        path,
        config.min_duration_ms,
        config.blocked_sources.len()
    );
    Ok(config)
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    fn write_config(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        file.write_all(content.as_bytes()).expect("write config");
        file
    }

    #[test]
    fn full_config_round_trips() {
        let file = write_config(
            r#"(
                min_duration_ms: 150000,
                blocked_sources: ["Podpah", "Cortes do Podpah"],
                scan_interval_ms: 3200,
                action_delay_ms: 900,
                confirm_wait_ms: 2800,
                max_idle_scans: 20,
                backoff_multiplier: 1.5,
                ledger_capacity: 60,
                trim_interval_ms: 90000,
            )"#,
        );

        let config = load_config(file.path()).expect("load config");
        assert_eq!(config.min_duration_ms, 150_000);
        assert_eq!(config.blocked_sources.len(), 2);
        assert!(config.blocked_sources.contains("Podpah"));
        assert_eq!(config.scan_interval_ms, 3_200);
        assert_eq!(config.confirm_wait_ms, 2_800);
        assert_eq!(config.max_idle_scans, 20);
        assert_eq!(config.ledger_capacity, 60);
    }

    #[test]
    fn partial_config_keeps_core_defaults() {
        let file = write_config(r#"(blocked_sources: ["Podpah"])"#);

        let config = load_config(file.path()).expect("load config");
        let defaults = SweepConfig::default();
        assert_eq!(config.min_duration_ms, defaults.min_duration_ms);
        assert_eq!(config.max_idle_scans, defaults.max_idle_scans);
        assert_eq!(config.blocked_sources.len(), 1);
    }

    #[test]
    fn duplicate_blocked_sources_collapse() {
        let file = write_config(r#"(blocked_sources: ["Podpah", "Podpah"])"#);
        let config = load_config(file.path()).expect("load config");
        assert_eq!(config.blocked_sources.len(), 1);
    }

    #[test]
    fn malformed_config_is_a_parse_error() {
        let file = write_config("(min_duration_ms: )");
        assert!(matches!(
            load_config(file.path()),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let missing = Path::new("/nonexistent/sweeper-config.ron");
        assert!(matches!(load_config(missing), Err(ConfigError::Io(_))));
    }
}
