// SocLookup - platform/config.rs
//
// Platform-specific configuration, data directory resolution, and
// config.toml loading with startup validation.
//
// Uses the `directories` crate for XDG (Linux), AppData (Windows),
// Library (macOS) compliance.

use crate::util::constants;
use crate::util::error::ConfigError;
use directories::ProjectDirs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Resolved platform paths for SocLookup data and configuration.
#[derive(Debug, Clone)]
pub struct PlatformPaths {
    /// Configuration directory (e.g. ~/.config/soclookup/ or %APPDATA%\SocLookup\config\)
    pub config_dir: PathBuf,

    /// Data directory holding the persisted catalog overrides and history.
    pub data_dir: PathBuf,
}

impl PlatformPaths {
    /// Resolve platform-appropriate paths.
    ///
    /// Falls back to current directory if platform dirs cannot be determined.
    pub fn resolve() -> Self {
        if let Some(proj_dirs) = ProjectDirs::from("", "", constants::APP_ID) {
            let config_dir = proj_dirs.config_dir().to_path_buf();
            let data_dir = proj_dirs.data_dir().to_path_buf();

            tracing::debug!(
                config = %config_dir.display(),
                data = %data_dir.display(),
                "Platform paths resolved"
            );

            Self {
                config_dir,
                data_dir,
            }
        } else {
            tracing::warn!("Could not determine platform directories, using current directory");
            let fallback = PathBuf::from(".");
            Self {
                config_dir: fallback.clone(),
                data_dir: fallback,
            }
        }
    }

    /// Default location of config.toml.
    pub fn config_file(&self) -> PathBuf {
        self.config_dir.join(constants::CONFIG_FILE_NAME)
    }
}

// =============================================================================
// config.toml loading and validation
// =============================================================================

/// Raw deserialisable shape of config.toml.
///
/// Unknown keys are silently ignored for forward compatibility -- a newer
/// config file can be used with an older binary without crashing.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct RawConfig {
    /// `[history]` section.
    pub history: HistorySection,
    /// `[batch]` section.
    pub batch: BatchSection,
    /// `[browser]` section.
    pub browser: BrowserSection,
    /// `[logging]` section.
    pub logging: LoggingSection,
}

/// `[history]` config section.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct HistorySection {
    /// Maximum number of search records kept.
    pub max_size: Option<usize>,
}

/// `[batch]` config section.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct BatchSection {
    /// Maximum lines processed per batch.
    pub max_items: Option<usize>,
    /// Pause between items in milliseconds.
    pub delay_ms: Option<u64>,
}

/// `[browser]` config section.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct BrowserSection {
    /// Open lookups without stealing focus.
    pub open_in_background: Option<bool>,
    /// Browser command line; the URL is appended (empty = system default).
    pub command: Option<String>,
}

/// `[logging]` config section.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct LoggingSection {
    /// Log level: "error", "warn", "info", "debug", "trace".
    pub level: Option<String>,
    /// Log file path (empty = stderr only).
    pub file: Option<String>,
}

/// Validated application configuration derived from `config.toml`.
///
/// All values are validated against named constants at load time.
/// Invalid values produce actionable warnings and fall back to defaults.
#[derive(Debug, Clone)]
pub struct AppConfig {
    // -- History --
    /// Maximum number of search records kept.
    pub max_history: usize,

    // -- Batch --
    /// Maximum lines processed per batch.
    pub max_batch_items: usize,
    /// Pause between batch items.
    pub batch_delay: Duration,

    // -- Browser --
    /// Open lookups without stealing focus.
    pub open_in_background: bool,
    /// Browser command line (None = system default).
    pub browser_command: Option<String>,

    // -- Logging --
    /// Logging level string (for init before tracing is available).
    pub log_level: Option<String>,
    /// Log file path.
    pub log_file: Option<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            max_history: constants::DEFAULT_MAX_HISTORY,
            max_batch_items: constants::DEFAULT_MAX_BATCH_ITEMS,
            batch_delay: Duration::from_millis(constants::DEFAULT_BATCH_DELAY_MS),
            open_in_background: true,
            browser_command: None,
            log_level: None,
            log_file: None,
        }
    }
}

/// Load and validate the config file at `config_path`.
///
/// Returns `AppConfig` with validated values and a list of non-fatal warnings.
/// If the file does not exist, returns defaults with no warnings (first run).
/// If the file is unreadable or unparseable, returns defaults with a warning:
/// the application still starts but the user is informed.
pub fn load_config(config_path: &Path) -> (AppConfig, Vec<String>) {
    if !config_path.exists() {
        tracing::debug!(path = %config_path.display(), "No config.toml found; using defaults");
        return (AppConfig::default(), Vec::new());
    }

    match read_raw_config(config_path) {
        Ok(raw) => {
            tracing::info!(path = %config_path.display(), "Loaded config.toml");
            validate(raw)
        }
        Err(e) => {
            let msg = format!("{e}. Using defaults.");
            tracing::warn!("{}", msg);
            (AppConfig::default(), vec![msg])
        }
    }
}

/// Read and parse config.toml without validating values.
pub fn read_raw_config(config_path: &Path) -> Result<RawConfig, ConfigError> {
    let content = std::fs::read_to_string(config_path).map_err(|source| ConfigError::Io {
        path: config_path.to_path_buf(),
        source,
    })?;

    toml::from_str(&content).map_err(|source| ConfigError::TomlParse {
        path: config_path.to_path_buf(),
        source,
    })
}

/// Validate each field against named constants, accumulating all warnings.
pub fn validate(raw: RawConfig) -> (AppConfig, Vec<String>) {
    let mut config = AppConfig::default();
    let mut warnings: Vec<String> = Vec::new();

    // -- History: max_size --
    if let Some(size) = raw.history.max_size {
        if (constants::MIN_MAX_HISTORY..=constants::ABSOLUTE_MAX_HISTORY).contains(&size) {
            config.max_history = size;
        } else {
            warnings.push(format!(
                "[history] max_size = {size} is out of range ({}-{}). Using default ({}).",
                constants::MIN_MAX_HISTORY,
                constants::ABSOLUTE_MAX_HISTORY,
                constants::DEFAULT_MAX_HISTORY,
            ));
        }
    }

    // -- Batch: max_items --
    if let Some(items) = raw.batch.max_items {
        if (constants::MIN_MAX_BATCH_ITEMS..=constants::ABSOLUTE_MAX_BATCH_ITEMS).contains(&items)
        {
            config.max_batch_items = items;
        } else {
            warnings.push(format!(
                "[batch] max_items = {items} is out of range ({}-{}). Using default ({}).",
                constants::MIN_MAX_BATCH_ITEMS,
                constants::ABSOLUTE_MAX_BATCH_ITEMS,
                constants::DEFAULT_MAX_BATCH_ITEMS,
            ));
        }
    }

    // -- Batch: delay_ms --
    if let Some(ms) = raw.batch.delay_ms {
        if ms <= constants::MAX_BATCH_DELAY_MS {
            config.batch_delay = Duration::from_millis(ms);
        } else {
            warnings.push(format!(
                "[batch] delay_ms = {ms} is out of range (0-{}). Using default ({}).",
                constants::MAX_BATCH_DELAY_MS,
                constants::DEFAULT_BATCH_DELAY_MS,
            ));
        }
    }

    // -- Browser --
    if let Some(background) = raw.browser.open_in_background {
        config.open_in_background = background;
    }
    if let Some(ref command) = raw.browser.command {
        if !command.trim().is_empty() {
            config.browser_command = Some(command.clone());
        }
    }

    // -- Logging: level --
    if let Some(ref level) = raw.logging.level {
        let valid = ["error", "warn", "info", "debug", "trace"];
        if valid.contains(&level.to_lowercase().as_str()) {
            config.log_level = Some(level.clone());
        } else {
            warnings.push(format!(
                "[logging] level = \"{level}\" is not recognised. \
                 Valid values: error, warn, info, debug, trace. Using default (info).",
            ));
        }
    }

    // -- Logging: file --
    if let Some(ref file) = raw.logging.file {
        if !file.is_empty() {
            config.log_file = Some(file.clone());
        }
    }

    if !warnings.is_empty() {
        tracing::warn!(
            count = warnings.len(),
            "Config validation produced warnings"
        );
    }

    (config, warnings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn load_str(content: &str) -> (AppConfig, Vec<String>) {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(constants::CONFIG_FILE_NAME);
        std::fs::write(&path, content).unwrap();
        load_config(&path)
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = TempDir::new().unwrap();
        let (config, warnings) = load_config(&dir.path().join("absent.toml"));
        assert!(warnings.is_empty());
        assert_eq!(config.max_history, constants::DEFAULT_MAX_HISTORY);
        assert_eq!(config.max_batch_items, constants::DEFAULT_MAX_BATCH_ITEMS);
        assert!(config.open_in_background);
    }

    #[test]
    fn test_valid_values_applied() {
        let (config, warnings) = load_str(
            r#"
            [history]
            max_size = 100

            [batch]
            max_items = 5
            delay_ms = 0

            [browser]
            open_in_background = false
            command = "firefox --new-tab"

            [logging]
            level = "debug"
            "#,
        );
        assert!(warnings.is_empty(), "{warnings:?}");
        assert_eq!(config.max_history, 100);
        assert_eq!(config.max_batch_items, 5);
        assert_eq!(config.batch_delay, Duration::ZERO);
        assert!(!config.open_in_background);
        assert_eq!(config.browser_command.as_deref(), Some("firefox --new-tab"));
        assert_eq!(config.log_level.as_deref(), Some("debug"));
    }

    #[test]
    fn test_out_of_range_values_warn_and_default() {
        let (config, warnings) = load_str(
            r#"
            [history]
            max_size = 0

            [batch]
            max_items = 100000
            delay_ms = 999999

            [logging]
            level = "verbose"
            "#,
        );
        assert_eq!(warnings.len(), 4);
        assert_eq!(config.max_history, constants::DEFAULT_MAX_HISTORY);
        assert_eq!(config.max_batch_items, constants::DEFAULT_MAX_BATCH_ITEMS);
        assert_eq!(
            config.batch_delay,
            Duration::from_millis(constants::DEFAULT_BATCH_DELAY_MS)
        );
        assert!(config.log_level.is_none());
    }

    #[test]
    fn test_unparseable_file_warns() {
        let (config, warnings) = load_str("[history\nmax_size = ");
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].contains("Config parse error"));
        assert_eq!(config.max_history, constants::DEFAULT_MAX_HISTORY);
    }

    #[test]
    fn test_unknown_keys_ignored() {
        let (_, warnings) = load_str("[future]\nflag = true\n[history]\nmax_size = 10\n");
        assert!(warnings.is_empty());
    }
}
