//! Environment-driven configuration.

use std::path::PathBuf;

use splitledger_infra::DEFAULT_KEY_PREFIX;
use splitledger_observability::LogFormat;

pub const DATA_DIR_VAR: &str = "SPLITLEDGER_DATA_DIR";
pub const LOG_FORMAT_VAR: &str = "SPLITLEDGER_LOG_FORMAT";
pub const KEY_PREFIX_VAR: &str = "SPLITLEDGER_KEY_PREFIX";

/// Directory name under the per-user data directory.
const APP_DIR: &str = "splitledger";

/// `{app_data_dir}/splitledger`, falling back to `~/.local/share/splitledger`
/// and finally to `.splitledger` in the working directory.
pub fn default_data_dir() -> PathBuf {
    dirs::data_dir()
        .or_else(|| {
            dirs::home_dir().map(|mut home| {
                home.push(".local");
                home.push("share");
                home
            })
        })
        .map(|base| base.join(APP_DIR))
        .unwrap_or_else(|| PathBuf::from(format!(".{APP_DIR}")))
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CliConfig {
    /// Directory holding the JSON documents.
    pub data_dir: PathBuf,
    pub log_format: LogFormat,
    /// Prefix for store keys (`{prefix}participants`, ...).
    pub key_prefix: String,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            log_format: LogFormat::default(),
            key_prefix: DEFAULT_KEY_PREFIX.to_string(),
        }
    }
}

impl CliConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary variable lookup. Unset or blank variables keep
    /// their defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let mut config = Self::default();

        if let Some(dir) = get(DATA_DIR_VAR) {
            config.data_dir = PathBuf::from(dir);
        }

        // unrecognised formats keep the default; see `report_ignored`
        if let Some(Ok(format)) = get(LOG_FORMAT_VAR).map(|raw| raw.parse()) {
            config.log_format = format;
        }

        if let Some(prefix) = get(KEY_PREFIX_VAR) {
            config.key_prefix = prefix;
        }

        config
    }

    /// Warn about values that were present but ignored.
    pub fn report_ignored(lookup: impl Fn(&str) -> Option<String>) {
        if let Some(raw) = lookup(LOG_FORMAT_VAR) {
            if !raw.trim().is_empty() && raw.parse::<LogFormat>().is_err() {
                tracing::warn!(value = %raw, "{LOG_FORMAT_VAR} not recognised; using pretty logs");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_when_unset() {
        assert_eq!(CliConfig::from_lookup(env(&[])), CliConfig::default());
    }

    #[test]
    fn default_data_dir_is_per_user() {
        let dir = default_data_dir();
        assert!(dir.ends_with(APP_DIR) || dir.ends_with(".splitledger"), "{dir:?}");
        if dirs::data_dir().is_some() {
            assert!(dir.is_absolute(), "{dir:?}");
        }
    }

    #[test]
    fn reads_every_variable() {
        let config = CliConfig::from_lookup(env(&[
            (DATA_DIR_VAR, "/tmp/trip"),
            (LOG_FORMAT_VAR, "json"),
            (KEY_PREFIX_VAR, "trip-"),
        ]));
        assert_eq!(config.data_dir, PathBuf::from("/tmp/trip"));
        assert_eq!(config.log_format, LogFormat::Json);
        assert_eq!(config.key_prefix, "trip-");
    }

    #[test]
    fn unknown_log_format_falls_back() {
        let config = CliConfig::from_lookup(env(&[(LOG_FORMAT_VAR, "xml"), (DATA_DIR_VAR, "  ")]));
        assert_eq!(config.log_format, LogFormat::Pretty);
        assert_eq!(config.data_dir, default_data_dir());
    }
}
